use std::io::{self, Write};
use colored::*;

/// Output channel of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Failure,
    Success,
}

/// Verbosity switches set once from the command line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verbosity {
    pub silent: bool,
    pub debug: bool,
    pub show_errors: bool,
    pub show_warnings: bool,
    pub show_info: bool,
}

impl Default for Verbosity {
    fn default() -> Self {
        Self {
            silent: false,
            debug: false,
            show_errors: true,
            show_warnings: true,
            show_info: true,
        }
    }
}

impl Verbosity {
    /// Failure and success lines are the result of a probe and are never gated.
    pub fn allows(&self, severity: Severity) -> bool {
        match severity {
            Severity::Debug => !self.silent && self.debug,
            Severity::Info => !self.silent && self.show_info,
            Severity::Warning => !self.silent && self.show_warnings,
            Severity::Error => !self.silent && self.show_errors,
            Severity::Failure | Severity::Success => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub foreground: Color,
    pub background: Option<Color>,
}

impl Style {
    pub fn paint(&self, text: &str) -> ColoredString {
        let painted = text.color(self.foreground);
        match self.background {
            Some(bg) => painted.on_color(bg),
            None => painted,
        }
    }
}

pub fn style_for(severity: Severity) -> Style {
    let (foreground, background) = match severity {
        Severity::Debug => (Color::White, None),
        Severity::Info => (Color::BrightWhite, None),
        Severity::Warning => (Color::BrightYellow, None),
        Severity::Error => (Color::BrightWhite, Some(Color::Red)),
        Severity::Failure => (Color::Red, None),
        Severity::Success => (Color::BrightGreen, None),
    };
    Style { foreground, background }
}

/// Writes one colored line per event, dropping lines the verbosity gates out.
pub struct Reporter<W: Write> {
    verbosity: Verbosity,
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout(verbosity: Verbosity) -> Self {
        Self::new(verbosity, io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(verbosity: Verbosity, out: W) -> Self {
        Self { verbosity, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn emit(&mut self, severity: Severity, message: &str) {
        if !self.verbosity.allows(severity) {
            return;
        }

        let line = style_for(severity).paint(message);
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            tracing::debug!(error = %e, ?severity, "dropped output line");
        }
    }

    pub fn debug(&mut self, message: impl AsRef<str>) {
        self.emit(Severity::Debug, message.as_ref());
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.emit(Severity::Info, message.as_ref());
    }

    pub fn warning(&mut self, message: impl AsRef<str>) {
        self.emit(Severity::Warning, message.as_ref());
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.emit(Severity::Error, message.as_ref());
    }

    pub fn failure(&mut self, message: impl AsRef<str>) {
        self.emit(Severity::Failure, message.as_ref());
    }

    pub fn success(&mut self, message: impl AsRef<str>) {
        self.emit(Severity::Success, message.as_ref());
    }
}
