//! Status lines for CLI commands

use super::context::{OutputStyle, Ui};
use console::style;
use std::fmt::Display;

#[derive(Clone, Copy)]
enum Level {
    Success,
    Info,
    Warning,
}

impl Ui {
    /// Title line opening a command's output
    pub fn heading(&self, title: &str) {
        match self.style() {
            OutputStyle::Rich => {
                let _ = cliclack::intro(style(title).cyan().bold());
            }
            OutputStyle::Plain => println!("{}", style(title).cyan().bold()),
            OutputStyle::Quiet => {}
        }
    }

    /// Closing line of a long-running command
    pub fn finish(&self, message: &str) {
        match self.style() {
            OutputStyle::Rich => {
                let _ = cliclack::outro(style(message).green().bold());
            }
            OutputStyle::Plain => println!("{} {}", style("[DONE]").green(), message),
            OutputStyle::Quiet => {}
        }
    }

    /// Something completed, with optional detail
    pub fn success(&self, message: &str, detail: Option<&str>) {
        match detail {
            Some(detail) => {
                self.emit(Level::Success, format!("{} ({})", message, style(detail).dim()))
            }
            None => self.emit(Level::Success, message),
        }
    }

    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    /// Something needs attention, with optional advice
    pub fn warn(&self, message: &str, hint: Option<&str>) {
        match hint {
            Some(hint) => {
                self.emit(Level::Warning, format!("{} - {}", message, style(hint).dim()))
            }
            None => self.emit(Level::Warning, message),
        }
    }

    /// Indented `key: value` line
    pub fn field(&self, key: &str, value: &str) {
        if self.style() != OutputStyle::Quiet {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    fn emit(&self, level: Level, text: impl Display) {
        match self.style() {
            OutputStyle::Rich => {
                let _ = match level {
                    Level::Success => cliclack::log::success(text),
                    Level::Info => cliclack::log::info(text),
                    Level::Warning => cliclack::log::warning(text),
                };
            }
            OutputStyle::Plain => {
                let tag = match level {
                    Level::Success => style("[OK]").green(),
                    Level::Info => style("[INFO]").cyan(),
                    Level::Warning => style("[WARN]").yellow(),
                };
                println!("  {} {}", tag, text);
            }
            OutputStyle::Quiet => {}
        }
    }
}
