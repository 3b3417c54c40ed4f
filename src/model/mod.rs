//! Read-only document types for the three collections.

pub mod cluster;
pub mod genome;
pub mod protein;

pub use cluster::{Cluster, ClusterMember};
pub use genome::{GenomeCoordinate, GenomeSegment, natural_cmp, sort_segments};
pub use protein::{Lineage, ProteinStructure};
