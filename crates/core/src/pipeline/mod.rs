
use crate::corpus::{SourceEntry, build_corpus};
use crate::detect::find_candidate_groups;
use crate::error::Error;
use crate::filter::filter_groups;
use crate::lang::LanguageRegistry;
use crate::report::project_findings;
use crate::types::{CancelFlag, DetectionOptions, RunOutcome, RunStats};

/// Runs the whole duplication pipeline: tokenize, assemble, find, filter,
/// report. Per-file failures become diagnostics on the outcome; only a bad
/// configuration or cancellation makes this return an error.
pub fn detect_duplicates(
    entries: &[SourceEntry],
    options: &DetectionOptions,
    registry: &LanguageRegistry,
) -> Result<RunOutcome, Error> {
    detect_duplicates_with_cancel(entries, options, registry, &CancelFlag::new())
}

/// Like [`detect_duplicates`], checking `cancel` between tokenization tasks
/// and before the finder starts. A cancelled run never yields partial
/// findings.
pub fn detect_duplicates_with_cancel(
    entries: &[SourceEntry],
    options: &DetectionOptions,
    registry: &LanguageRegistry,
    cancel: &CancelFlag,
) -> Result<RunOutcome, Error> {
    options.validate()?;

    let mut diagnostics = Vec::new();
    let mut stats = RunStats::default();

    let corpus = build_corpus(entries, options, registry, cancel, &mut diagnostics, &mut stats)?;

    if cancel.is_cancelled() {
        return Err(Error::Cancelled { diagnostics });
    }

    let groups = find_candidate_groups(&corpus, options, &mut stats);
    let groups = filter_groups(groups, &corpus, options, &mut stats);
    let findings = project_findings(groups, &corpus);

    tracing::debug!(
        findings = findings.len(),
        diagnostics = diagnostics.len(),
        "duplication run complete"
    );

    Ok(RunOutcome {
        findings,
        diagnostics,
        stats,
    })
}
