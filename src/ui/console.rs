//! Operator-facing console output
//!
//! Every diagnostic line carries a severity tag (`[INFO]`, `[WARN]`,
//! `[ERROR]`, `[DRY-RUN]`) and goes to standard output. Developer
//! diagnostics use the `log` facade instead.

use colored::*;
use is_terminal::IsTerminal;
use std::fmt::Display;

use crate::error::MigrateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    DryRun,
}

impl Level {
    pub fn tag(&self) -> &'static str {
        match self {
            Level::Info => "[INFO]",
            Level::Warn => "[WARN]",
            Level::Error => "[ERROR]",
            Level::DryRun => "[DRY-RUN]",
        }
    }

    fn colored_tag(&self) -> ColoredString {
        match self {
            Level::Info => self.tag().green(),
            Level::Warn => self.tag().yellow().bold(),
            Level::Error => self.tag().red().bold(),
            Level::DryRun => self.tag().cyan().bold(),
        }
    }
}

/// Console sink; either stdout or an in-memory capture
pub struct Console {
    color: bool,
    captured: Option<Vec<String>>,
}

impl Console {
    /// Print to stdout, colouring tags when stdout is a terminal
    pub fn stdout() -> Self {
        Self {
            color: std::io::stdout().is_terminal(),
            captured: None,
        }
    }

    /// Record lines instead of printing them
    pub fn capture() -> Self {
        Self {
            color: false,
            captured: Some(Vec::new()),
        }
    }

    pub fn info(&mut self, message: impl Display) {
        self.tagged(Level::Info, message);
    }

    pub fn warn(&mut self, message: impl Display) {
        self.tagged(Level::Warn, message);
    }

    pub fn error(&mut self, message: impl Display) {
        self.tagged(Level::Error, message);
    }

    pub fn dry_run(&mut self, message: impl Display) {
        self.tagged(Level::DryRun, message);
    }

    pub fn tagged(&mut self, level: Level, message: impl Display) {
        match self.captured.as_mut() {
            Some(lines) => lines.push(format!("{} {}", level.tag(), message)),
            None if self.color => println!("{} {}", level.colored_tag(), message),
            None => println!("{} {}", level.tag(), message),
        }
    }

    /// Report a failed run
    ///
    /// HTTP rejections print as `<status>: <body>`. A missing target prints
    /// nothing here because the candidates were already listed.
    pub fn failure(&mut self, err: &MigrateError) {
        if let MigrateError::NoMatchingTarget { .. } = err {
            return;
        }
        match err.http_failure() {
            Some((status, body)) => self.error(format!("{}: {}", status.as_u16(), body)),
            None => self.error(err),
        }
    }

    /// Untagged continuation line
    pub fn line(&mut self, message: impl Display) {
        match self.captured.as_mut() {
            Some(lines) => lines.push(message.to_string()),
            None => println!("{}", message),
        }
    }

    /// Lines recorded by a capturing console; empty for stdout
    pub fn captured(&self) -> &[String] {
        self.captured.as_deref().unwrap_or(&[])
    }
}
