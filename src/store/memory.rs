//! In-memory document store loaded from JSON collection exports.

use super::{CandidateFetcher, ClusterSource, CoordinateSource, Filter, StructureJoiner};
use crate::error::Result;
use crate::model::{Cluster, GenomeSegment, ProteinStructure};
use anyhow::Context;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;

pub const PROTEIN_STRUCTURES_FILE: &str = "proteinstructures.json";
pub const GENOME_COORDINATES_FILE: &str = "genome_coordinates.json";
pub const CLUSTERS_FILE: &str = "clusters.json";

/// Read-only store over the three collections.
///
/// Documents keep the order of the export, which is the natural order seen by
/// every query.
#[derive(Debug, Default)]
pub struct MemoryStore {
    structures: Vec<ProteinStructure>,
    by_id: HashMap<String, usize>,
    segments: Vec<GenomeSegment>,
    clusters: Vec<Cluster>,
}

impl MemoryStore {
    pub fn new(
        structures: Vec<ProteinStructure>,
        segments: Vec<GenomeSegment>,
        clusters: Vec<Cluster>,
    ) -> Self {
        let by_id = structures
            .iter()
            .enumerate()
            .map(|(idx, doc)| (doc.record_id.clone(), idx))
            .collect();
        Self {
            structures,
            by_id,
            segments,
            clusters,
        }
    }

    /// Load all collections from `data_dir`.
    ///
    /// The protein structure export is required; genome coordinates and clusters
    /// load as empty when their files are absent.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        let structures: Vec<ProteinStructure> =
            load_collection(&data_dir.join(PROTEIN_STRUCTURES_FILE)).await?;
        let segments = load_optional_collection(&data_dir.join(GENOME_COORDINATES_FILE)).await?;
        let clusters = load_optional_collection(&data_dir.join(CLUSTERS_FILE)).await?;

        tracing::info!(
            data_dir = %data_dir.display(),
            structures = structures.len(),
            segments = segments.len(),
            clusters = clusters.len(),
            "Loaded document store"
        );

        Ok(Self::new(structures, segments, clusters))
    }

    pub fn structure_count(&self) -> usize {
        self.structures.len()
    }
}

async fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read collection at {}", path.display()))?;
    serde_json::from_slice(&content)
        .with_context(|| format!("Failed to parse collection at {}", path.display()))
}

async fn load_optional_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        tracing::warn!(path = %path.display(), "Collection file missing, serving it empty");
        return Ok(Vec::new());
    }
    load_collection(path).await
}

impl CandidateFetcher for MemoryStore {
    async fn fetch(&self, filter: &Filter) -> Result<Vec<ProteinStructure>> {
        let matches: Vec<ProteinStructure> = self
            .structures
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();
        tracing::debug!(filter = %filter, count = matches.len(), "Fetched structures");
        Ok(matches)
    }
}

impl StructureJoiner for MemoryStore {
    async fn get_by_id(&self, record_id: &str) -> Result<Option<ProteinStructure>> {
        Ok(self
            .by_id
            .get(record_id)
            .map(|&idx| self.structures[idx].clone()))
    }
}

impl CoordinateSource for MemoryStore {
    async fn segments_for_virus(&self, virus_name: &str) -> Result<Vec<GenomeSegment>> {
        Ok(self
            .segments
            .iter()
            .filter(|segment| segment.has_virus(virus_name))
            .cloned()
            .collect())
    }
}

impl ClusterSource for MemoryStore {
    async fn clusters_with_member(&self, member_pattern: &Regex) -> Result<Vec<Cluster>> {
        Ok(self
            .clusters
            .iter()
            .filter(|cluster| cluster.has_member_matching(member_pattern))
            .cloned()
            .collect())
    }

    async fn cluster_by_id(&self, cluster_id: &str) -> Result<Option<Cluster>> {
        Ok(self
            .clusters
            .iter()
            .find(|cluster| cluster.cluster_representative == cluster_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Field;
    use assert2::check;

    fn structure(id: &str, name: &str) -> ProteinStructure {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "genbank_name_curated": name,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn fetch_preserves_export_order() {
        let store = MemoryStore::new(
            vec![
                structure("B_2", "Product: VP2"),
                structure("A_1", "Product: VP1"),
                structure("C_3", "capsid"),
            ],
            vec![],
            vec![],
        );

        let filter = Filter::matching(&[Field::ProteinName], "vp").unwrap();
        let ids: Vec<String> = store
            .fetch(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|doc| doc.record_id)
            .collect();
        check!(ids == vec!["B_2", "A_1"]);
    }

    #[tokio::test]
    async fn get_by_id_misses_cleanly() {
        let store = MemoryStore::new(vec![structure("A_1", "VP1")], vec![], vec![]);
        check!(store.get_by_id("A_1").await.unwrap().is_some());
        check!(store.get_by_id("Z_9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn load_tolerates_missing_optional_collections() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROTEIN_STRUCTURES_FILE),
            r#"[{"_id": "A_1", "genbank_name_curated": "VP1"}]"#,
        )
        .unwrap();

        let store = MemoryStore::load(dir.path()).await.unwrap();
        check!(store.structure_count() == 1);
        check!(store.segments_for_virus("anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_requires_structures() {
        let dir = tempfile::tempdir().unwrap();
        check!(MemoryStore::load(dir.path()).await.is_err());
    }
}
