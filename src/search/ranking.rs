//! Relevance ranking of fetched candidates.

use super::page::{Page, RankedResultPage, paginate};
use super::scoring::relevance;
use crate::error::CatalogError;
use std::collections::HashSet;

/// A candidate to rank: the string shown to the user plus whatever it stands for
/// (a full record, a group key, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCandidate<T> {
    pub display: String,
    pub item: T,
}

impl<T> SearchCandidate<T> {
    pub fn new(display: impl Into<String>, item: T) -> Self {
        Self {
            display: display.into(),
            item,
        }
    }
}

/// A candidate together with its relevance for the current query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<T> {
    pub item: T,
    pub relevance: f64,
}

/// Score every candidate against `query`, sort by descending relevance and cut
/// out the requested page.
///
/// `query` is the text the user typed, not the escaped store pattern. Ties keep
/// fetch order. An empty candidate list is `NotFound`; a page past the end of a
/// non-empty list is simply empty.
pub fn rank_and_paginate<T>(
    candidates: Vec<SearchCandidate<T>>,
    query: &str,
    page: Option<Page>,
    not_found: CatalogError,
) -> Result<RankedResultPage<ScoredCandidate<T>>, CatalogError> {
    if candidates.is_empty() {
        return Err(not_found);
    }

    let mut scored: Vec<ScoredCandidate<T>> = candidates
        .into_iter()
        .map(|candidate| ScoredCandidate {
            relevance: relevance(&candidate.display, query),
            item: candidate.item,
        })
        .collect();

    // `sort_by` is stable, so the store's order breaks ties.
    scored.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));

    let total_count = scored.len();
    let items = paginate(scored, page);

    tracing::debug!(
        query,
        total_count,
        returned = items.len(),
        "Ranked candidates"
    );

    Ok(RankedResultPage {
        query: query.to_string(),
        total_count,
        items,
    })
}

/// Collapse documents to one candidate per distinct group key (first occurrence
/// wins), then rank them like [`rank_and_paginate`].
pub fn distinct_and_rank<D>(
    raw_matches: &[D],
    group_key: impl Fn(&D) -> Option<&str>,
    query: &str,
    page: Option<Page>,
    not_found: CatalogError,
) -> Result<RankedResultPage<ScoredCandidate<String>>, CatalogError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let candidates: Vec<SearchCandidate<String>> = raw_matches
        .iter()
        .filter_map(&group_key)
        .filter(|key| seen.insert(*key))
        .map(|key| SearchCandidate::new(key, key.to_string()))
        .collect();

    tracing::debug!(
        raw = raw_matches.len(),
        distinct = candidates.len(),
        "Grouped candidates"
    );

    rank_and_paginate(candidates, query, page, not_found)
}
