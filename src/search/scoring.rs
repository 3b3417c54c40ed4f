//! Search relevance scoring.
//!
//! The relevance of a candidate name to a query combines three signals, compared
//! case-insensitively:
//! - a Ratcliff/Obershelp similarity ratio in `[0, 1]`,
//! - an early-position bonus in `(0, 1]` when the query occurs in the candidate,
//! - a coverage bonus (`query length / candidate length`) for the same case.
//!
//! An exact match therefore scores `3.0`, and a candidate sharing nothing with
//! the query scores `0.0`.

use std::collections::HashMap;

/// Sequences at least this long have their most frequent elements ignored when
/// seeding matches.
const POPULAR_THRESHOLD: usize = 200;

/// Compute the relevance of `candidate` for `query`.
///
/// Deterministic: depends only on the two strings.
pub fn relevance(candidate: &str, query: &str) -> f64 {
    let candidate_lower: Vec<char> = candidate.to_lowercase().chars().collect();
    let query_lower: Vec<char> = query.to_lowercase().chars().collect();

    let mut score = similarity_ratio(&candidate_lower, &query_lower);

    let candidate_len = candidate.chars().count();
    if candidate_len == 0 {
        return score;
    }

    if let Some(position) = find_chars(&candidate_lower, &query_lower) {
        let candidate_len = candidate_len as f64;
        score += 1.0 - position as f64 / candidate_len;
        score += query.chars().count() as f64 / candidate_len;
    }

    score
}

/// Ratcliff/Obershelp similarity: `2 * M / T`, where `M` is the total size of the
/// matching blocks and `T` the combined length. Two empty inputs are identical.
pub fn similarity_ratio<T: Eq + std::hash::Hash>(a: &[T], b: &[T]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = BlockMatcher::new(a, b).matched_len();
    2.0 * matched as f64 / total as f64
}

/// Position (in elements) of the first occurrence of `needle` in `haystack`.
fn find_chars<T: Eq>(haystack: &[T], needle: &[T]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Greedy longest-common-block matcher.
///
/// Finds the longest matching block, then recurses on the unmatched regions to
/// its left and right.
struct BlockMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// Positions of each element of `b`, excluding popular elements.
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + std::hash::Hash> BlockMatcher<'a, T> {
    fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        if b.len() >= POPULAR_THRESHOLD {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    fn matched_len(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        total
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given bounds.
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, then
    /// earliest in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular elements never seed a match but may still extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_k += 1;
        }
        while best_i + best_k < ahi
            && best_j + best_k < bhi
            && self.a[best_i + best_k] == self.b[best_j + best_k]
        {
            best_k += 1;
        }

        (best_i, best_j, best_k)
    }
}
