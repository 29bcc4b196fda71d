//! Choosing how status output is rendered

use crate::cli::args::OutputFormat;
use std::io::IsTerminal;

/// Environment variables set by common CI runners
const CI_MARKERS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "BUILDKITE",
    "JENKINS_URL",
    "TF_BUILD",
];

/// How status lines are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    /// `cliclack` log lines on a terminal
    Rich,
    /// One tagged line per event, for logs and pipes
    Plain,
    /// No status lines; stdout carries command data only
    Quiet,
}

impl OutputStyle {
    /// Rich only on a terminal outside CI
    pub fn select(stdout_is_terminal: bool, in_ci: bool) -> Self {
        if stdout_is_terminal && !in_ci {
            Self::Rich
        } else {
            Self::Plain
        }
    }
}

/// Status output for one command invocation
#[derive(Debug, Clone, Copy)]
pub struct Ui {
    style: OutputStyle,
}

impl Ui {
    pub fn new(style: OutputStyle) -> Self {
        Self { style }
    }

    /// Style for the current process
    pub fn detect() -> Self {
        let in_ci = CI_MARKERS
            .iter()
            .any(|var| std::env::var_os(var).is_some());
        Self::new(OutputStyle::select(std::io::stdout().is_terminal(), in_ci))
    }

    /// Style for a command printing data in `format`.
    ///
    /// Machine-readable formats get no status lines at all.
    pub fn for_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => Self::detect(),
            OutputFormat::Json | OutputFormat::Plain => Self::new(OutputStyle::Quiet),
        }
    }

    pub fn style(&self) -> OutputStyle {
        self.style
    }
}
