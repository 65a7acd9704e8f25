use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Error, LexError};
use crate::lang::{LanguageRegistry, Lexer};
use crate::token::{FileId, Token, TokenKind, TokenStream, normalize_stream};
use crate::types::{CancelFlag, DetectionOptions, DiagnosticKind, FileDiagnostic, RunStats};

/// One source file handed to the core. Reading and decoding happened on the
/// caller's side; `text` is the full decoded content.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub file_id: FileId,
    pub path: String,
    pub text: String,
    pub language_id: String,
    pub language_version: Option<String>,
}

#[derive(Debug)]
pub(crate) struct CorpusFile {
    pub(crate) file_id: FileId,
    pub(crate) path: String,
    pub(crate) tokens: Vec<Token>,
    /// Global index of this file's first token in `Corpus::symbols`.
    pub(crate) start: usize,
}

/// All surviving files' token streams concatenated into one flat symbol
/// sequence. Each distinct `(kind, norm_image)` is interned to one symbol;
/// each file is terminated by a sentinel symbol unique to that file, so no
/// equality run can cross a file boundary. Immutable once built.
#[derive(Debug)]
pub struct Corpus {
    pub(crate) symbols: Vec<u32>,
    pub(crate) files: Vec<CorpusFile>,
}

impl Corpus {
    /// Global index range of a file's tokens (sentinel excluded).
    pub(crate) fn file_range(&self, file_idx: usize) -> Range<usize> {
        let file = &self.files[file_idx];
        file.start..file.start + file.tokens.len()
    }

    /// Boundary-table lookup: maps a global token index to
    /// `(file_index, local_token_index)`.
    pub(crate) fn locate(&self, global: usize) -> (usize, usize) {
        let file_idx = self
            .files
            .partition_point(|f| f.start + f.tokens.len() <= global);
        debug_assert!(file_idx < self.files.len(), "index past last file");
        debug_assert!(
            global >= self.files[file_idx].start,
            "index points at a boundary sentinel"
        );
        (file_idx, global - self.files[file_idx].start)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn total_tokens(&self) -> usize {
        self.symbols.len() - self.files.len()
    }
}

enum TaskOutcome {
    Done(TokenStream),
    Failed(LexError),
    Skipped,
}

fn lex_failed_diagnostic(entry: &SourceEntry, err: &LexError) -> FileDiagnostic {
    FileDiagnostic {
        file_id: entry.file_id,
        path: entry.path.clone(),
        kind: DiagnosticKind::LexFailed,
        message: err.to_string(),
    }
}

/// Tokenizes every entry (in parallel, bounded by `thread_count`), applies
/// normalization, and concatenates surviving streams in input order. Per-file
/// failures become diagnostics; only cancellation aborts.
pub(crate) fn build_corpus(
    entries: &[SourceEntry],
    options: &DetectionOptions,
    registry: &LanguageRegistry,
    cancel: &CancelFlag,
    diagnostics: &mut Vec<FileDiagnostic>,
    stats: &mut RunStats,
) -> Result<Corpus, Error> {
    stats.files_submitted = entries.len() as u64;

    // Resolve lexers first, sequentially, so unsupported-language
    // diagnostics come out in input order.
    let mut tasks: Vec<(usize, Arc<dyn Lexer>)> = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        match registry.resolve(&entry.language_id, entry.language_version.as_deref()) {
            Some(lexer) => tasks.push((idx, lexer)),
            None => {
                stats.files_unsupported_language =
                    stats.files_unsupported_language.saturating_add(1);
                diagnostics.push(FileDiagnostic {
                    file_id: entry.file_id,
                    path: entry.path.clone(),
                    kind: DiagnosticKind::UnsupportedLanguage,
                    message: format!("no lexer registered for language `{}`", entry.language_id),
                });
            }
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.thread_count)
        .build()
        .map_err(|err| Error::InvalidConfiguration(format!("worker pool: {err}")))?;

    let ignore_literals = options.ignore_literals;
    let ignore_identifiers = options.ignore_identifiers;

    // Indexed collect keeps input order, so concatenation is deterministic
    // regardless of scheduling.
    let results: Vec<(usize, TaskOutcome)> = pool.install(|| {
        tasks
            .par_iter()
            .map(|(idx, lexer)| {
                if cancel.is_cancelled() {
                    return (*idx, TaskOutcome::Skipped);
                }
                let entry = &entries[*idx];
                match lexer.tokenize(&entry.text, entry.file_id) {
                    Ok(mut stream) => {
                        normalize_stream(&mut stream, ignore_literals, ignore_identifiers);
                        (*idx, TaskOutcome::Done(stream))
                    }
                    Err(err) => (*idx, TaskOutcome::Failed(err)),
                }
            })
            .collect()
    });

    if cancel.is_cancelled() {
        // tasks that finished (and failed) before the cancel point still
        // contribute their diagnostics
        for (idx, outcome) in results {
            if let TaskOutcome::Failed(err) = outcome {
                stats.files_failed = stats.files_failed.saturating_add(1);
                diagnostics.push(lex_failed_diagnostic(&entries[idx], &err));
            }
        }
        return Err(Error::Cancelled {
            diagnostics: std::mem::take(diagnostics),
        });
    }

    let mut interner: HashMap<(TokenKind, String), u32> = HashMap::new();
    let mut symbols: Vec<u32> = Vec::new();
    let mut files: Vec<CorpusFile> = Vec::new();

    for (idx, outcome) in results {
        let entry = &entries[idx];
        let stream = match outcome {
            TaskOutcome::Done(stream) => stream,
            TaskOutcome::Failed(err) => {
                stats.files_failed = stats.files_failed.saturating_add(1);
                diagnostics.push(lex_failed_diagnostic(entry, &err));
                continue;
            }
            // only reachable on a cancelled run, which returned above
            TaskOutcome::Skipped => continue,
        };

        if stream.len() < options.min_tokens {
            stats.files_below_min_tokens = stats.files_below_min_tokens.saturating_add(1);
            continue;
        }

        stats.files_tokenized = stats.files_tokenized.saturating_add(1);
        stats.total_tokens = stats.total_tokens.saturating_add(stream.len() as u64);

        let start = symbols.len();
        for token in &stream.tokens {
            let next = interner.len() as u32;
            let sym = *interner
                .entry((token.kind, token.norm_image.clone()))
                .or_insert(next);
            symbols.push(sym);
        }

        // sentinels grow down from u32::MAX, disjoint from interned symbols
        let sentinel = u32::MAX - files.len() as u32;
        debug_assert!((interner.len() as u64) < u64::from(sentinel));
        symbols.push(sentinel);

        files.push(CorpusFile {
            file_id: entry.file_id,
            path: entry.path.clone(),
            tokens: stream.tokens,
            start,
        });
    }

    tracing::debug!(
        files = files.len(),
        tokens = symbols.len() - files.len(),
        distinct_symbols = interner.len(),
        "corpus assembled"
    );

    Ok(Corpus { symbols, files })
}
