use thiserror::Error;

use crate::token::FileId;
use crate::types::FileDiagnostic;

/// Lexing failure for one file. Non-fatal for the run: the file is dropped
/// from the corpus and recorded as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file_id}:{line}:{column}: {message}")]
pub struct LexError {
    pub file_id: FileId,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl LexError {
    pub fn new(file_id: FileId, line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            file_id,
            line,
            column,
            message: message.into(),
        }
    }
}

/// Fatal run errors. Per-file problems never surface here; they become
/// `FileDiagnostic` entries on the outcome instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected before any tokenization starts.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The external cancel flag was raised. No findings are returned since a
    /// partial duplicate set would be misleading; the diagnostics gathered up
    /// to the cancel point ride along.
    #[error("run cancelled ({} diagnostic(s) collected)", diagnostics.len())]
    Cancelled { diagnostics: Vec<FileDiagnostic> },
}
