//! Document store collaborators.
//!
//! The catalog never talks to a database directly; it is handed implementations
//! of these traits. [`MemoryStore`] serves JSON exports of the three collections.

pub mod filter;
pub mod memory;

pub use filter::{Field, Filter, compile_pattern};
pub use memory::MemoryStore;

use crate::error::Result;
use crate::model::{Cluster, GenomeSegment, ProteinStructure};
use regex::Regex;
use std::future::Future;

/// Fetches protein structure documents matching a filter, in the store's
/// natural order.
pub trait CandidateFetcher: Send + Sync {
    fn fetch(&self, filter: &Filter) -> impl Future<Output = Result<Vec<ProteinStructure>>> + Send;
}

/// Looks up a single protein structure by record id.
pub trait StructureJoiner: Send + Sync {
    fn get_by_id(
        &self,
        record_id: &str,
    ) -> impl Future<Output = Result<Option<ProteinStructure>>> + Send;
}

/// Genome coordinate segments.
pub trait CoordinateSource: Send + Sync {
    /// Segments holding at least one coordinate of exactly this virus.
    fn segments_for_virus(
        &self,
        virus_name: &str,
    ) -> impl Future<Output = Result<Vec<GenomeSegment>>> + Send;
}

/// Structural-similarity clusters.
pub trait ClusterSource: Send + Sync {
    fn clusters_with_member(
        &self,
        member_pattern: &Regex,
    ) -> impl Future<Output = Result<Vec<Cluster>>> + Send;

    fn cluster_by_id(&self, cluster_id: &str)
    -> impl Future<Output = Result<Option<Cluster>>> + Send;
}

/// Everything the catalog needs from a backing store.
pub trait DocumentStore:
    CandidateFetcher + StructureJoiner + CoordinateSource + ClusterSource + 'static
{
}

impl<T> DocumentStore for T where
    T: CandidateFetcher + StructureJoiner + CoordinateSource + ClusterSource + 'static
{
}
