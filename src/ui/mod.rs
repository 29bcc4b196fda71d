//! Terminal output for CLI commands
//!
//! Status lines are `cliclack` logs on a terminal, tagged plain lines in CI
//! or pipes, and suppressed entirely when stdout carries JSON or plain data.

mod context;
mod output;

pub use context::{OutputStyle, Ui};
