
use std::collections::{HashMap, HashSet};

use crate::corpus::Corpus;
use crate::types::{DetectionOptions, RunStats};
use crate::util::{canonicalize_pair, fnv1a64_u32, maximal_match, winnowed_fingerprints};

/// One occurrence of a matched run, in file-local token coordinates. Length
/// lives on the group: all marks of one group are equally long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mark {
    pub(crate) file_idx: usize,
    pub(crate) start: usize,
}

/// A set of >= 2 occurrences of one exact normalized token run.
#[derive(Debug)]
pub(crate) struct MatchGroup {
    pub(crate) content_hash: u64,
    pub(crate) len: usize,
    pub(crate) sample: Vec<u32>,
    pub(crate) marks: Vec<Mark>,
    mark_keys: HashSet<(usize, usize)>,
}

impl MatchGroup {
    fn new(content_hash: u64, len: usize, sample: Vec<u32>) -> Self {
        Self {
            content_hash,
            len,
            sample,
            marks: Vec::new(),
            mark_keys: HashSet::new(),
        }
    }

    fn add_mark(&mut self, file_idx: usize, start: usize) {
        if self.mark_keys.insert((file_idx, start)) {
            self.marks.push(Mark { file_idx, start });
        }
    }

    #[cfg(test)]
    pub(crate) fn with_marks(
        content_hash: u64,
        len: usize,
        sample: Vec<u32>,
        marks: &[(usize, usize)],
    ) -> Self {
        let mut group = Self::new(content_hash, len, sample);
        for &(file_idx, start) in marks {
            group.add_mark(file_idx, start);
        }
        group
    }
}

const MAX_BUCKET: usize = 512;

/// Finds every maximal group of >= 2 occurrences of a normalized token run of
/// length >= `min_tokens`.
///
/// Winnowed k-gram fingerprints (k = min(min_tokens, 25), window =
/// min_tokens - k + 1) guarantee that any two occurrences of a run meeting
/// the threshold land in a common fingerprint bucket. Each bucket pair is
/// verified against the actual symbols and extended to its maximal run, never
/// past a file sentinel; identical content coalesces into one group.
pub(crate) fn find_candidate_groups(
    corpus: &Corpus,
    options: &DetectionOptions,
    stats: &mut RunStats,
) -> Vec<MatchGroup> {
    let min_tokens = options.min_tokens.max(1);
    let k = min_tokens.min(25);
    let window_size = min_tokens - k + 1;

    let mut index: HashMap<u64, Vec<usize>> = HashMap::new();
    for file_idx in 0..corpus.file_count() {
        let range = corpus.file_range(file_idx);
        for (hash, pos) in winnowed_fingerprints(&corpus.symbols, range, k, window_size) {
            index.entry(hash).or_default().push(pos);
        }
    }

    let mut seen_pairs: HashSet<(usize, usize, usize)> = HashSet::new();
    let mut groups: HashMap<(u64, usize), Vec<MatchGroup>> = HashMap::new();

    for mut positions in index.into_values() {
        if positions.len() <= 1 {
            continue;
        }
        if positions.len() > MAX_BUCKET {
            stats.fingerprint_buckets_truncated =
                stats.fingerprint_buckets_truncated.saturating_add(1);
            positions = truncate_bucket_round_robin(positions, corpus, MAX_BUCKET);
        }

        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let a_pos = positions[i];
                let b_pos = positions[j];

                let (file_a, _) = corpus.locate(a_pos);
                let (file_b, _) = corpus.locate(b_pos);

                let (start_a, start_b, len) = match maximal_match(
                    &corpus.symbols,
                    &corpus.file_range(file_a),
                    a_pos,
                    &corpus.file_range(file_b),
                    b_pos,
                    k,
                ) {
                    Some(v) => v,
                    None => continue,
                };

                if len < min_tokens {
                    continue;
                }

                // overlapping ranges in one file are the trivial self-match
                if file_a == file_b && start_a < start_b + len && start_b < start_a + len {
                    continue;
                }

                let (first, second) = canonicalize_pair(start_a, start_b);
                if !seen_pairs.insert((first, second, len)) {
                    continue;
                }

                let sample = corpus.symbols[first..first + len].to_vec();
                let content_hash = fnv1a64_u32(&sample);

                let bucket = groups.entry((content_hash, len)).or_default();
                let slot = match bucket.iter().position(|g| g.sample == sample) {
                    Some(slot) => slot,
                    None => {
                        bucket.push(MatchGroup::new(content_hash, len, sample));
                        bucket.len() - 1
                    }
                };
                let group = &mut bucket[slot];

                let (mark_file_a, mark_start_a) = corpus.locate(start_a);
                let (mark_file_b, mark_start_b) = corpus.locate(start_b);
                group.add_mark(mark_file_a, mark_start_a);
                group.add_mark(mark_file_b, mark_start_b);
            }
        }
    }

    let out: Vec<MatchGroup> = groups.into_values().flatten().collect();
    stats.candidate_groups = out.len() as u64;
    tracing::debug!(groups = out.len(), "candidate groups found");
    out
}

/// Caps a pathological fingerprint bucket, keeping occurrences from as many
/// files as possible (round-robin over files in corpus order). Recorded in
/// stats since it can hide matches in degenerate corpora.
fn truncate_bucket_round_robin(
    mut positions: Vec<usize>,
    corpus: &Corpus,
    max_bucket: usize,
) -> Vec<usize> {
    positions.sort_unstable();

    let mut by_file: Vec<Vec<usize>> = Vec::new();
    let mut last_file = usize::MAX;
    for pos in positions {
        let (file_idx, _) = corpus.locate(pos);
        if file_idx != last_file || by_file.is_empty() {
            by_file.push(Vec::new());
            last_file = file_idx;
        }
        if let Some(bucket) = by_file.last_mut() {
            bucket.push(pos);
        }
    }

    let mut idxs = vec![0usize; by_file.len()];
    let mut out = Vec::with_capacity(max_bucket);
    while out.len() < max_bucket {
        let mut progressed = false;
        for (i, bucket) in by_file.iter().enumerate() {
            if idxs[i] < bucket.len() {
                out.push(bucket[idxs[i]]);
                idxs[i] += 1;
                progressed = true;
                if out.len() == max_bucket {
                    break;
                }
            }
        }
        if !progressed {
            break;
        }
    }

    out
}
