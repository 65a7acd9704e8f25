use std::ops::Range;

pub(crate) fn fnv1a64_u32(symbols: &[u32]) -> u64 {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for &sym in symbols {
        for b in sym.to_le_bytes() {
            hash ^= u64::from(b);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

/// Winnowed Karp-Rabin fingerprints over `symbols[range]`: rolling hashes of
/// every k-gram, keeping the minimum of each sliding window of `window_size`
/// start positions. Every duplicated run of length >= k + window_size - 1 is
/// guaranteed to share at least one selected fingerprint. Returned positions
/// are indices into `symbols` (not the range).
pub(crate) fn winnowed_fingerprints(
    symbols: &[u32],
    range: Range<usize>,
    k: usize,
    window_size: usize,
) -> Vec<(u64, usize)> {
    use std::collections::VecDeque;

    let slice = &symbols[range.clone()];
    if k == 0 || window_size == 0 || slice.len() < k {
        return Vec::new();
    }

    const BASE: u64 = 911382323;

    let mut pow = 1u64;
    for _ in 1..k {
        pow = pow.wrapping_mul(BASE);
    }

    let mut hash = 0u64;
    for &sym in &slice[..k] {
        hash = hash
            .wrapping_mul(BASE)
            .wrapping_add(u64::from(sym).wrapping_add(1));
    }

    let mut out = Vec::new();
    let mut deque: VecDeque<(usize, u64)> = VecDeque::new();
    let last_start = slice.len() - k;

    for i in 0..=last_start {
        if i != 0 {
            let out_sym = u64::from(slice[i - 1]).wrapping_add(1);
            let in_sym = u64::from(slice[i + k - 1]).wrapping_add(1);
            hash = hash
                .wrapping_sub(out_sym.wrapping_mul(pow))
                .wrapping_mul(BASE)
                .wrapping_add(in_sym);
        }

        while let Some(&(idx, _)) = deque.front() {
            if idx + window_size <= i {
                deque.pop_front();
            } else {
                break;
            }
        }
        while let Some(&(_, h)) = deque.back() {
            if hash <= h {
                deque.pop_back();
            } else {
                break;
            }
        }
        deque.push_back((i, hash));

        if i + 1 >= window_size {
            let (min_idx, min_hash) = match deque.front() {
                Some(&front) => front,
                None => continue,
            };
            if out.last().map(|&(_, idx)| idx) != Some(range.start + min_idx) {
                out.push((min_hash, range.start + min_idx));
            }
        }
    }

    out
}

/// Verifies the k-gram at two positions (rejecting rolling-hash collisions)
/// and extends the match left and right to its maximal equal run. Extension
/// is bounded by each position's own file range, so a match never crosses a
/// file boundary. Returns `(start_a, start_b, len)` on success.
pub(crate) fn maximal_match(
    symbols: &[u32],
    bounds_a: &Range<usize>,
    a_pos: usize,
    bounds_b: &Range<usize>,
    b_pos: usize,
    k: usize,
) -> Option<(usize, usize, usize)> {
    if k == 0 || a_pos.checked_add(k)? > bounds_a.end || b_pos.checked_add(k)? > bounds_b.end {
        return None;
    }
    if symbols[a_pos..a_pos + k] != symbols[b_pos..b_pos + k] {
        return None;
    }

    let mut start_a = a_pos;
    let mut start_b = b_pos;
    while start_a > bounds_a.start
        && start_b > bounds_b.start
        && symbols[start_a - 1] == symbols[start_b - 1]
    {
        start_a -= 1;
        start_b -= 1;
    }

    let mut end_a = a_pos + k;
    let mut end_b = b_pos + k;
    while end_a < bounds_a.end && end_b < bounds_b.end && symbols[end_a] == symbols[end_b] {
        end_a += 1;
        end_b += 1;
    }

    Some((start_a, start_b, end_a - start_a))
}

/// Orders a pair of occurrences so the smaller global position comes first,
/// giving every unordered pair one canonical key.
pub(crate) fn canonicalize_pair(a_pos: usize, b_pos: usize) -> (usize, usize) {
    if a_pos <= b_pos { (a_pos, b_pos) } else { (b_pos, a_pos) }
}
