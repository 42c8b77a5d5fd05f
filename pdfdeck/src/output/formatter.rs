//! Message formatting and display.
//!
//! Status lines go to stdout, warnings and errors to stderr. Colour is used
//! only when the target stream is a terminal.
//!
//! # Examples
//!
//! ```
//! use pdfdeck::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Splitting report.pdf");
//! formatter.success("Wrote 3 files");
//! ```

use std::io::{self, IsTerminal};

use crate::config::Config;
use crate::document::Artifact;
use crate::error::PdfDeckError;
use crate::utils::format_file_size;

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn color(self) -> Option<&'static str> {
        match self {
            Self::Info => None,
            Self::Success => Some("\x1b[32m"),
            Self::Warning => Some("\x1b[33m"),
            Self::Error => Some("\x1b[31m"),
            Self::Debug => Some("\x1b[36m"),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// Output formatter with configurable verbosity.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    color_stdout: bool,
    color_stderr: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let term = std::env::var_os("TERM").is_some() && std::env::var_os("NO_COLOR").is_none();
        Self {
            quiet,
            verbose,
            color_stdout: term && io::stdout().is_terminal(),
            color_stderr: term && io::stderr().is_terminal(),
        }
    }

    /// Create a formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet, config.verbose)
    }

    /// Create a quiet formatter (only warnings and errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Text of one message line, without the trailing newline.
    pub fn render(&self, level: MessageLevel, message: &str) -> String {
        let colored = if level.to_stderr() {
            self.color_stderr
        } else {
            self.color_stdout
        };
        match level.color() {
            Some(code) if colored => format!("{code}{}{message}\x1b[0m", level.prefix()),
            _ => format!("{}{message}", level.prefix()),
        }
    }

    fn emit(&self, level: MessageLevel, message: &str) {
        let line = self.render(level, message);
        if level.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// Informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.emit(MessageLevel::Info, message);
        }
    }

    /// Success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.emit(MessageLevel::Success, message);
        }
    }

    /// Warning. Always shown.
    pub fn warning(&self, message: &str) {
        self.emit(MessageLevel::Warning, message);
    }

    /// Error. Always shown.
    pub fn error(&self, message: &str) {
        self.emit(MessageLevel::Error, message);
    }

    /// Only shown in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.emit(MessageLevel::Debug, message);
        }
    }

    /// Labelled detail line. Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Section header. Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Numbered list item. Suppressed in quiet mode.
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            println!("  {index}. {message}");
        }
    }

    /// One line per artifact: name and size.
    pub fn artifacts<A: Artifact>(&self, artifacts: &[A]) {
        for (index, artifact) in artifacts.iter().enumerate() {
            self.list_item(
                index + 1,
                &format!(
                    "{} ({})",
                    artifact.file_name(),
                    format_file_size(artifact.bytes().len() as u64)
                ),
            );
        }
    }

    /// Report a failure: the detailed error, then the user message and the
    /// remedy for its kind.
    pub fn failure(&self, err: &PdfDeckError) {
        let record = err.record();
        self.error(&err.to_string());
        self.warning(&record.message);
        if let Some(remedy) = record.remedy {
            self.warning(&remedy);
        }
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}
