use copy_paste_detect_core::{DiagnosticKind, FileDiagnostic, Finding, RunStats};

use crate::walk::WalkStats;

pub(crate) fn format_findings(findings: &[Finding]) -> String {
    let mut out = String::new();
    out.push_str(&format!("duplicate findings: {}\n", findings.len()));

    for finding in findings {
        out.push('\n');
        out.push_str(&format!(
            "hash={:016x} tokens={} occurrences={}\n",
            finding.content_hash,
            finding.token_count,
            finding.occurrences.len()
        ));
        for occ in &finding.occurrences {
            out.push_str(&format!(
                "- {}:{}-{}\n",
                occ.path, occ.begin_line, occ.end_line
            ));
        }
        if !finding.preview.is_empty() {
            out.push_str(&format!("  preview: {}\n", finding.preview));
        }
    }
    out
}

pub(crate) fn format_diagnostics(diagnostics: &[FileDiagnostic]) -> String {
    let mut out = String::new();
    if diagnostics.is_empty() {
        return out;
    }
    out.push_str(&format!("\nfile diagnostics: {}\n", diagnostics.len()));
    for diag in diagnostics {
        let kind = match diag.kind {
            DiagnosticKind::LexFailed => "lex-failed",
            DiagnosticKind::UnsupportedLanguage => "unsupported-language",
        };
        out.push_str(&format!("- [{kind}] {}: {}\n", diag.path, diag.message));
    }
    out
}

pub(crate) fn format_run_stats(stats: &RunStats, walk: &WalkStats) -> String {
    let mut out = String::new();
    out.push_str("== run stats ==\n");
    out.push_str(&format!(
        "submitted={} tokenized={} tokens={}\n",
        stats.files_submitted, stats.files_tokenized, stats.total_tokens
    ));
    out.push_str(&format!(
        "groups: candidates={} suppressed={}\n",
        stats.candidate_groups, stats.groups_suppressed
    ));

    let mut skips: Vec<(&str, u64)> = vec![
        ("lex_failed", stats.files_failed),
        ("unsupported_language", stats.files_unsupported_language),
        ("below_min_tokens", stats.files_below_min_tokens),
        ("buckets_truncated", stats.fingerprint_buckets_truncated),
        ("binary", walk.skipped_binary as u64),
        ("oversize", walk.skipped_oversize as u64),
        ("unknown_extension", walk.skipped_unknown_extension as u64),
        ("not_found", walk.skipped_not_found as u64),
        ("permission_denied", walk.skipped_permission_denied as u64),
        ("walk_errors", walk.skipped_walk_errors as u64),
    ];
    skips.retain(|(_, v)| *v > 0);
    if !skips.is_empty() {
        out.push_str("skipped:\n");
        for (k, v) in skips {
            out.push_str(&format!("- {k}={v}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use copy_paste_detect_core::{FileId, FindingOccurrence};

    #[test]
    fn findings_are_rendered_with_line_ranges() {
        let findings = vec![Finding {
            content_hash: 0xabc,
            token_count: 52,
            preview: "let x = 1 ;".to_string(),
            occurrences: vec![
                FindingOccurrence {
                    file_id: FileId(0),
                    path: "src/a.rs".to_string(),
                    begin_line: 10,
                    end_line: 18,
                },
                FindingOccurrence {
                    file_id: FileId(1),
                    path: "src/b.rs".to_string(),
                    begin_line: 4,
                    end_line: 12,
                },
            ],
        }];

        let text = format_findings(&findings);
        assert!(text.starts_with("duplicate findings: 1\n"));
        assert!(text.contains("hash=0000000000000abc tokens=52 occurrences=2"));
        assert!(text.contains("- src/a.rs:10-18"));
        assert!(text.contains("- src/b.rs:4-12"));
        assert!(text.contains("preview: let x = 1 ;"));
    }

    #[test]
    fn stats_hide_zero_skip_lines() {
        let mut stats = RunStats::default();
        stats.files_submitted = 3;
        stats.files_tokenized = 3;
        let text = format_run_stats(&stats, &WalkStats::default());
        assert!(text.contains("submitted=3 tokenized=3"));
        assert!(!text.contains("skipped:"));

        stats.files_failed = 1;
        let text = format_run_stats(&stats, &WalkStats::default());
        assert!(text.contains("- lex_failed=1"));
    }

    #[test]
    fn diagnostics_section_is_empty_without_entries() {
        assert_eq!(format_diagnostics(&[]), "");
        let diags = vec![FileDiagnostic {
            file_id: FileId(0),
            path: "x.java".to_string(),
            kind: DiagnosticKind::UnsupportedLanguage,
            message: "no lexer registered for language \"cobol\"".to_string(),
        }];
        let text = format_diagnostics(&diags);
        assert!(text.contains("[unsupported-language] x.java"));
    }
}
