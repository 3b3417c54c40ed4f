//! Structural-similarity clusters.

use serde::{Deserialize, Serialize};

/// A cluster of structurally similar models, keyed by its representative model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(rename = "_id")]
    pub cluster_representative: String,
    #[serde(default)]
    pub cluster_members: Vec<ClusterMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMember {
    pub cluster_rep_id: String,
    pub member_record_id: String,
    #[serde(default)]
    pub protein_length: i64,
    #[serde(default)]
    pub tax_id: i64,
    #[serde(default)]
    pub species: String,
    #[serde(rename = "plDDT_score", default)]
    pub plddt_score: f64,
    #[serde(default)]
    pub virus_name: String,
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub genbank_name_curated: String,
    #[serde(default)]
    pub uniprot_id: String,
    #[serde(default)]
    pub genbank_id: String,
    #[serde(default)]
    pub nucleotide_accession_number: String,
}

impl Cluster {
    pub fn has_member_matching(&self, pattern: &regex::Regex) -> bool {
        self.cluster_members
            .iter()
            .any(|m| pattern.is_match(&m.member_record_id))
    }
}
