use crate::corpus::Corpus;
use crate::detect::MatchGroup;
use crate::types::{Finding, FindingOccurrence};

const PREVIEW_MAX_CHARS: usize = 120;

/// Pure projection from filtered match groups to findings: every mark is
/// resolved through the corpus to a path and a raw-position line span. No
/// filtering happens here; group order is preserved.
pub(crate) fn project_findings(groups: Vec<MatchGroup>, corpus: &Corpus) -> Vec<Finding> {
    groups
        .into_iter()
        .map(|group| {
            let occurrences = group
                .marks
                .iter()
                .map(|mark| {
                    let file = &corpus.files[mark.file_idx];
                    let begin_line = file.tokens.get(mark.start).map_or(1, |t| t.begin_line);
                    let end_line = file
                        .tokens
                        .get(mark.start + group.len.saturating_sub(1))
                        .map_or(begin_line, |t| t.end_line);
                    FindingOccurrence {
                        file_id: file.file_id,
                        path: file.path.clone(),
                        begin_line,
                        end_line,
                    }
                })
                .collect();

            Finding {
                content_hash: group.content_hash,
                token_count: group.len,
                preview: make_preview(&group, corpus),
                occurrences,
            }
        })
        .collect()
}

/// Normalized images of the first occurrence, joined for display and capped.
fn make_preview(group: &MatchGroup, corpus: &Corpus) -> String {
    let Some(first) = group.marks.first() else {
        return String::new();
    };
    let tokens = &corpus.files[first.file_idx].tokens;

    let mut out = String::new();
    for token in tokens.iter().skip(first.start).take(group.len) {
        if !out.is_empty() {
            out.push(' ');
        }
        if out.len() + token.norm_image.len() > PREVIEW_MAX_CHARS {
            out.push_str("...");
            break;
        }
        out.push_str(&token.norm_image);
    }
    out
}
