//! Diagnostic accumulator shared by the loader, top resolution and elaboration.

use std::cell::{Cell, RefCell};

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Collects diagnostics in emission order.
///
/// Emitting takes `&self`: elaboration resolvers hold the context immutably
/// while they report. Every pass runs on one thread, so the sink uses plain
/// cells and is not `Sync`.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
    errors: Cell<usize>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity.is_error() {
            self.errors.set(self.errors.get() + 1);
        }
        self.diagnostics.borrow_mut().push(diag);
    }

    /// Appends diagnostics produced elsewhere, keeping their order.
    pub fn extend(&self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    /// Returns `true` if any error was ever emitted, drained or not.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// The number of errors ever emitted.
    pub fn error_count(&self) -> usize {
        self.errors.get()
    }

    /// The number of held diagnostics of one severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Returns `true` if no diagnostics are held.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }

    /// Drains every held diagnostic.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    /// A copy of the held diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}
