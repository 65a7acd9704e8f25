use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::Error;
use crate::token::FileId;

/// Knobs for one detection run.
#[derive(Debug, Clone)]
pub struct DetectionOptions {
    /// Minimum duplicated run length, in tokens (inclusive).
    pub min_tokens: usize,
    /// Collapse number/string literal images for comparison.
    pub ignore_literals: bool,
    /// Collapse identifier images for comparison.
    pub ignore_identifiers: bool,
    /// Drop findings whose occurrences all live in a single file.
    pub exclude_same_file: bool,
    /// Drop findings whose widest occurrence spans fewer source lines.
    pub min_lines: u32,
    /// Tokenization worker count.
    pub thread_count: usize,
    /// Cap on reported findings.
    pub max_report_items: usize,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            min_tokens: 50,
            ignore_literals: false,
            ignore_identifiers: false,
            exclude_same_file: false,
            min_lines: 0,
            thread_count: 4,
            max_report_items: 200,
        }
    }
}

impl DetectionOptions {
    /// Validated once up front; a bad configuration fails the whole run
    /// before any file is touched.
    pub fn validate(&self) -> Result<(), Error> {
        if self.min_tokens == 0 {
            return Err(Error::InvalidConfiguration(
                "min_tokens must be a positive integer".to_string(),
            ));
        }
        if self.thread_count == 0 {
            return Err(Error::InvalidConfiguration(
                "thread_count must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

/// External cancellation signal. Checked between file-tokenization tasks and
/// before the finder starts; cheap to clone and share across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    LexFailed,
    UnsupportedLanguage,
}

/// One file that could not take part in the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiagnostic {
    pub file_id: FileId,
    pub path: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// One resolved occurrence of a duplicated token run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingOccurrence {
    pub file_id: FileId,
    pub path: String,
    pub begin_line: u32,
    pub end_line: u32,
}

impl FindingOccurrence {
    pub fn line_count(&self) -> u32 {
        self.end_line.saturating_sub(self.begin_line) + 1
    }
}

/// Externally-visible duplication finding: one matched token run with all of
/// its occurrences resolved to source locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub content_hash: u64,
    pub token_count: usize,
    pub preview: String,
    pub occurrences: Vec<FindingOccurrence>,
}

/// Counters describing what one run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub files_submitted: u64,
    pub files_tokenized: u64,
    pub files_failed: u64,
    pub files_unsupported_language: u64,
    pub files_below_min_tokens: u64,
    pub total_tokens: u64,
    pub candidate_groups: u64,
    pub groups_suppressed: u64,
    pub fingerprint_buckets_truncated: u64,
}

/// Result of a completed run. Zero findings with diagnostics is success, not
/// failure: "no duplicates found" is a meaningful outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub findings: Vec<Finding>,
    pub diagnostics: Vec<FileDiagnostic>,
    pub stats: RunStats,
}
