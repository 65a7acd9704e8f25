use std::io;

use copy_paste_detect_core::{
    DiagnosticKind, FileDiagnostic, Finding, FindingOccurrence, RunOutcome, RunStats,
};
use serde::Serialize;

use crate::walk::WalkStats;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonOccurrence {
    pub(crate) path: String,
    pub(crate) begin_line: u32,
    pub(crate) end_line: u32,
}

impl From<&FindingOccurrence> for JsonOccurrence {
    fn from(occ: &FindingOccurrence) -> Self {
        Self {
            path: occ.path.clone(),
            begin_line: occ.begin_line,
            end_line: occ.end_line,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonFinding {
    pub(crate) content_hash: String,
    pub(crate) token_count: usize,
    pub(crate) preview: String,
    pub(crate) occurrences: Vec<JsonOccurrence>,
}

impl From<&Finding> for JsonFinding {
    fn from(finding: &Finding) -> Self {
        Self {
            content_hash: format!("{:016x}", finding.content_hash),
            token_count: finding.token_count,
            preview: finding.preview.clone(),
            occurrences: finding.occurrences.iter().map(JsonOccurrence::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonDiagnostic {
    pub(crate) path: String,
    pub(crate) kind: &'static str,
    pub(crate) message: String,
}

impl From<&FileDiagnostic> for JsonDiagnostic {
    fn from(diag: &FileDiagnostic) -> Self {
        let kind = match diag.kind {
            DiagnosticKind::LexFailed => "lexFailed",
            DiagnosticKind::UnsupportedLanguage => "unsupportedLanguage",
        };
        Self {
            path: diag.path.clone(),
            kind,
            message: diag.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonRunStats {
    pub(crate) files_submitted: u64,
    pub(crate) files_tokenized: u64,
    pub(crate) files_failed: u64,
    pub(crate) files_unsupported_language: u64,
    pub(crate) files_below_min_tokens: u64,
    pub(crate) total_tokens: u64,
    pub(crate) candidate_groups: u64,
    pub(crate) groups_suppressed: u64,
    pub(crate) fingerprint_buckets_truncated: u64,
    pub(crate) skipped_binary: u64,
    pub(crate) skipped_oversize: u64,
    pub(crate) skipped_unknown_extension: u64,
    pub(crate) skipped_not_found: u64,
    pub(crate) skipped_permission_denied: u64,
    pub(crate) skipped_walk_errors: u64,
}

impl JsonRunStats {
    pub(crate) fn from_parts(stats: &RunStats, walk: &WalkStats) -> Self {
        Self {
            files_submitted: stats.files_submitted,
            files_tokenized: stats.files_tokenized,
            files_failed: stats.files_failed,
            files_unsupported_language: stats.files_unsupported_language,
            files_below_min_tokens: stats.files_below_min_tokens,
            total_tokens: stats.total_tokens,
            candidate_groups: stats.candidate_groups,
            groups_suppressed: stats.groups_suppressed,
            fingerprint_buckets_truncated: stats.fingerprint_buckets_truncated,
            skipped_binary: walk.skipped_binary as u64,
            skipped_oversize: walk.skipped_oversize as u64,
            skipped_unknown_extension: walk.skipped_unknown_extension as u64,
            skipped_not_found: walk.skipped_not_found as u64,
            skipped_permission_denied: walk.skipped_permission_denied as u64,
            skipped_walk_errors: walk.skipped_walk_errors as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonReport {
    pub(crate) findings: Vec<JsonFinding>,
    pub(crate) diagnostics: Vec<JsonDiagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) stats: Option<JsonRunStats>,
}

impl JsonReport {
    pub(crate) fn new(outcome: &RunOutcome, walk: &WalkStats, with_stats: bool) -> Self {
        Self {
            findings: outcome.findings.iter().map(JsonFinding::from).collect(),
            diagnostics: outcome.diagnostics.iter().map(JsonDiagnostic::from).collect(),
            stats: with_stats.then(|| JsonRunStats::from_parts(&outcome.stats, walk)),
        }
    }
}

pub(crate) fn write_json<W: io::Write>(out: &mut W, report: &JsonReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use copy_paste_detect_core::FileId;

    fn sample_outcome() -> RunOutcome {
        RunOutcome {
            findings: vec![Finding {
                content_hash: 0xdead_beef,
                token_count: 61,
                preview: "fn main ( ) {".to_string(),
                occurrences: vec![
                    FindingOccurrence {
                        file_id: FileId(0),
                        path: "a.rs".to_string(),
                        begin_line: 3,
                        end_line: 9,
                    },
                    FindingOccurrence {
                        file_id: FileId(1),
                        path: "b.rs".to_string(),
                        begin_line: 1,
                        end_line: 7,
                    },
                ],
            }],
            diagnostics: vec![FileDiagnostic {
                file_id: FileId(2),
                path: "broken.rs".to_string(),
                kind: DiagnosticKind::LexFailed,
                message: "unterminated string literal".to_string(),
            }],
            stats: RunStats::default(),
        }
    }

    #[test]
    fn report_serializes_camel_case_with_hex_hash() {
        let outcome = sample_outcome();
        let report = JsonReport::new(&outcome, &WalkStats::default(), false);
        let mut buf = Vec::new();
        write_json(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("\"contentHash\": \"00000000deadbeef\""));
        assert!(text.contains("\"tokenCount\": 61"));
        assert!(text.contains("\"beginLine\": 3"));
        assert!(text.contains("\"kind\": \"lexFailed\""));
        assert!(!text.contains("\"stats\""));
    }

    #[test]
    fn stats_section_appears_when_requested() {
        let outcome = sample_outcome();
        let report = JsonReport::new(&outcome, &WalkStats::default(), true);
        let text = serde_json::to_string(&report).unwrap();
        assert!(text.contains("\"filesSubmitted\""));
        assert!(text.contains("\"skippedBinary\""));
    }
}
