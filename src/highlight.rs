use inksac::prelude::*;

use crate::core::parser::BACKGROUND_MARKER;

/// Terminal coloring for the command line and for the shell's own messages.
/// Every method returns its input unchanged when color is unavailable.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    fn enabled(&self) -> bool {
        !matches!(self.color_support, ColorSupport::NoColor)
    }

    /// Colors the command word and the background marker. The visible text,
    /// spacing included, is unchanged so the editor's cursor stays aligned.
    pub fn highlight_command(&self, input: &str) -> String {
        if !self.enabled() {
            return input.to_string();
        }

        let mut out = String::with_capacity(input.len());
        let mut seen_command = false;
        for (i, piece) in input.split(' ').enumerate() {
            if i > 0 {
                out.push(' ');
            }
            if piece.is_empty() {
                continue;
            }
            if piece == BACKGROUND_MARKER {
                let marker_style = Style::builder().foreground(Color::Yellow).bold().build();
                out.push_str(&piece.style(marker_style).to_string());
            } else if !seen_command {
                let command_style = Style::builder().foreground(Color::Cyan).bold().build();
                out.push_str(&piece.style(command_style).to_string());
            } else {
                out.push_str(piece);
            }
            seen_command = true;
        }
        out
    }

    pub fn highlight_error(&self, error: &str) -> String {
        if !self.enabled() {
            return error.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();
        error.style(error_style).to_string()
    }

    pub fn highlight_notice(&self, message: &str) -> String {
        if !self.enabled() {
            return message.to_string();
        }

        let notice_style = Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build();
        message.style(notice_style).to_string()
    }
}
