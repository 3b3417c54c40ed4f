//! Relevance-ranked search and pagination.
//!
//! Free-text queries are escaped by [`sanitize`] before they reach the store,
//! scored against the raw query by [`relevance`], and cut into pages by
//! [`Page`]. Sequence queries take their own path through [`match_sequence`].

pub mod page;
pub mod ranking;
pub mod sanitize;
pub mod scoring;
pub mod sequence;

pub use page::{Page, RankedResultPage, paginate};
pub use ranking::{ScoredCandidate, SearchCandidate, distinct_and_rank, rank_and_paginate};
pub use sanitize::{literal_braces, sanitize};
pub use scoring::{relevance, similarity_ratio};
pub use sequence::{AlignmentMatch, match_sequence, validate_sequence};
