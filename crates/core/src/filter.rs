use crate::corpus::Corpus;
use crate::detect::{Mark, MatchGroup};
use crate::types::{DetectionOptions, RunStats};

/// Reduces raw candidate groups to the reportable match set: occurrence and
/// policy checks, sub-match suppression, deterministic ordering, report cap.
pub(crate) fn filter_groups(
    mut groups: Vec<MatchGroup>,
    corpus: &Corpus,
    options: &DetectionOptions,
    stats: &mut RunStats,
) -> Vec<MatchGroup> {
    groups.retain(|g| g.marks.len() >= 2);

    if options.exclude_same_file {
        groups.retain(|g| {
            g.marks
                .iter()
                .any(|m| m.file_idx != g.marks[0].file_idx)
        });
    }

    if options.min_lines > 0 {
        groups.retain(|g| {
            g.marks
                .iter()
                .map(|m| mark_line_span(corpus, m, g.len))
                .max()
                .is_some_and(|widest| widest >= options.min_lines)
        });
    }

    for group in &mut groups {
        group.marks.sort_by_key(|m| (m.file_idx, m.start));
    }

    // longest first; equal lengths ordered by first occurrence, which is
    // total since two distinct contents cannot share a start
    groups.sort_by(|a, b| {
        b.len
            .cmp(&a.len)
            .then_with(|| first_mark_key(a).cmp(&first_mark_key(b)))
    });

    let mut kept: Vec<MatchGroup> = Vec::new();
    for group in groups {
        if kept.iter().any(|longer| is_submatch_of(&group, longer)) {
            stats.groups_suppressed = stats.groups_suppressed.saturating_add(1);
            continue;
        }
        kept.push(group);
    }

    kept.truncate(options.max_report_items);
    tracing::debug!(
        kept = kept.len(),
        suppressed = stats.groups_suppressed,
        "match groups filtered"
    );
    kept
}

fn first_mark_key(group: &MatchGroup) -> (usize, usize) {
    group
        .marks
        .first()
        .map(|m| (m.file_idx, m.start))
        .unwrap_or((usize::MAX, usize::MAX))
}

fn mark_line_span(corpus: &Corpus, mark: &Mark, len: usize) -> u32 {
    let tokens = &corpus.files[mark.file_idx].tokens;
    let begin = tokens.get(mark.start).map_or(0, |t| t.begin_line);
    let end = tokens
        .get(mark.start + len.saturating_sub(1))
        .map_or(begin, |t| t.end_line);
    end.saturating_sub(begin) + 1
}

/// True when every mark of `a` sits at one common relative offset inside a
/// mark of the strictly longer `b`: `a` adds no occurrence that `b` does not
/// already cover, so only `b` is reported. Both mark lists must be sorted.
fn is_submatch_of(a: &MatchGroup, b: &MatchGroup) -> bool {
    if a.len >= b.len {
        return false;
    }
    let Some(first) = a.marks.first() else {
        return false;
    };

    b.marks
        .iter()
        .filter(|m| m.file_idx == first.file_idx && m.start <= first.start)
        .filter_map(|m| {
            let offset = first.start - m.start;
            (offset + a.len <= b.len).then_some(offset)
        })
        .any(|offset| {
            a.marks.iter().all(|am| {
                am.start >= offset
                    && b
                        .marks
                        .binary_search_by(|bm| {
                            (bm.file_idx, bm.start).cmp(&(am.file_idx, am.start - offset))
                        })
                        .is_ok()
            })
        })
}
