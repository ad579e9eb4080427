//! Rendering of `error:`/`note:` diagnostics with source excerpts.

use std::fmt::{self, Write as _};

use crate::source::{Range, SourceFile};

/// Writes diagnostics to a caller-supplied sink and remembers whether any
/// errors were emitted. The sink is borrowed for the duration of a pass;
/// each pass returns `None` when `has_errors()` ends up true.
pub struct DiagnosticEngine<'a> {
    file: &'a SourceFile,
    out: &'a mut dyn fmt::Write,
    errors: usize,
}

impl<'a> DiagnosticEngine<'a> {
    pub fn new(file: &'a SourceFile, out: &'a mut dyn fmt::Write) -> Self {
        Self {
            file,
            out,
            errors: 0,
        }
    }

    pub fn error(&mut self, range: Range, message: impl fmt::Display) {
        self.errors += 1;
        self.emit("error", range, &message);
    }

    /// A note attached to the preceding error, same layout.
    pub fn note(&mut self, range: Range, message: impl fmt::Display) {
        self.emit("note", range, &message);
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    fn emit(&mut self, severity: &str, range: Range, message: &dyn fmt::Display) {
        let _ = writeln!(self.out, "{severity}: {message}");
        let _ = writeln!(self.out, "{}", self.file.excerpt(range));
    }
}
