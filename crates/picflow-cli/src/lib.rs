//! # picflow-cli
//!
//! Command-line surface of PicFlow: argument parsing, session bootstrap
//! (config store, clipboard, plugin loading), and table/JSON output.

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands, Session, open_session};
pub use output::OutputFormat;
