//! Sequence alignment collaborator.
//!
//! The catalog treats the aligner as a black box: it sends an uppercased protein
//! sequence and gets back, per matching target, the high-scoring segment pairs
//! (HSPs) the tool reported.

pub mod blast;
pub mod cache;
mod xml;

pub use blast::BlastpAligner;
pub use cache::CachedAligner;
pub use xml::parse_blast_xml;

use crate::error::Result;
use std::future::Future;
use std::sync::Arc;

/// Everything one alignment run reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentReport {
    pub alignments: Vec<Alignment>,
}

/// One target sequence in the reference database that the query aligned to.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Record id of the target structure (the database definition line).
    pub target_id: String,
    /// Length of the target sequence.
    pub length: u64,
    pub hsps: Vec<Hsp>,
}

/// One local alignment region between query and target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsp {
    pub score: f64,
    /// Expectation value; lower is more significant.
    pub expect: f64,
    pub positives: u64,
    pub gaps: u64,
}

impl AlignmentReport {
    pub fn hsp_count(&self) -> usize {
        self.alignments.iter().map(|a| a.hsps.len()).sum()
    }
}

/// Runs a protein sequence against the preconfigured reference database.
pub trait Aligner: Send + Sync + 'static {
    fn align(&self, sequence: &str) -> impl Future<Output = Result<AlignmentReport>> + Send;
}

impl<A: Aligner> Aligner for Arc<A> {
    fn align(&self, sequence: &str) -> impl Future<Output = Result<AlignmentReport>> + Send {
        (**self).align(sequence)
    }
}
