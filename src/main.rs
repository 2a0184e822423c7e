use husk::core::config::Config;
use husk::error::ShellError;
use husk::flags::Flags;
use husk::input::BufferedSource;
use husk::logging;
use husk::process::signal;
use husk::shell::Shell;
use std::env;
use std::io::{self, IsTerminal};
use std::process;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if let Err(e) = run(&args) {
        eprintln!("husk: {}", e);
        process::exit(e.exit_code());
    }
}

fn run(args: &[String]) -> Result<(), ShellError> {
    let mut flags = Flags::new();
    flags.parse(args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("husk {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    logging::init(flags.is_set("debug"));
    let config = Config::load(&flags)?;
    signal::setup_signal_handlers()?;

    if io::stdin().is_terminal() {
        let mut shell = Shell::interactive(config)?;
        shell.watch_children()?;
        shell.run()
    } else {
        let source = BufferedSource::new(io::stdin().lock(), io::stdout());
        let mut shell = Shell::with_source(source, config);
        shell.watch_children()?;
        shell.run()
    }
}
