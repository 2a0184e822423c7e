pub mod commands;
pub mod config;
pub mod parser;
pub mod state;
