//! Predicted protein structure records.

use serde::{Deserialize, Serialize};

/// One predicted protein structure as stored in the `proteinstructures` collection.
///
/// Field names on the wire follow the upstream curation sheet (including the
/// spaced and parenthesised column names); the Rust names are normalised.
/// Lineage ranks and most annotations may be empty or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinStructure {
    #[serde(rename = "_id")]
    pub record_id: String,
    #[serde(default)]
    pub uniprot_id: String,
    #[serde(default)]
    pub pept_cat: String,
    #[serde(default)]
    pub protlen: i64,
    #[serde(default)]
    pub genbank_name_curated: String,
    #[serde(default)]
    pub gene: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(rename = "protein_id", default)]
    pub genbank_id: String,
    #[serde(default)]
    pub mat_pept_id: Option<String>,
    #[serde(default)]
    pub reg_id: Option<String>,
    #[serde(default)]
    pub uniq_id: String,
    #[serde(default)]
    pub uniprot_match_status: String,
    #[serde(default)]
    pub nt_acc: String,
    #[serde(default)]
    pub acc: String,
    #[serde(default)]
    pub seg: Option<String>,
    #[serde(default)]
    pub taxid: i64,
    #[serde(rename = "Sort", default)]
    pub sort: i64,

    #[serde(flatten)]
    pub lineage: Lineage,

    #[serde(rename = "Exemplar or additional isolate", default)]
    pub exemplar_or_additional_isolate: String,
    #[serde(rename = "Virus name(s)", default)]
    pub virus_name: Option<String>,
    #[serde(rename = "Virus name abbreviation(s)", default)]
    pub virus_abbreviation: Option<String>,
    #[serde(rename = "Virus isolate designation", default)]
    pub virus_isolate_designation: Option<String>,
    #[serde(rename = "Virus REFSEQ accession", default)]
    pub virus_refseq_accession: Option<String>,
    #[serde(rename = "Genome coverage", default)]
    pub genome_coverage: String,
    #[serde(rename = "Genome composition", default)]
    pub genome_composition: String,
    #[serde(rename = "Host source", default)]
    pub host_source: String,
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub genbank_genome_coordinates: String,
    #[serde(default)]
    pub genome_coordinates: String,
    #[serde(default)]
    pub protein_coordinates: String,

    #[serde(rename = "esmfold_log_pLDDT", default)]
    pub esmfold_plddt: Option<String>,
    #[serde(rename = "esmfold_log_pTM", default)]
    pub esmfold_ptm: Option<String>,
    #[serde(rename = "colabfold_json_pLDDT", default)]
    pub colabfold_plddt: String,
    #[serde(rename = "colabfold_json_pTM", default)]
    pub colabfold_ptm: String,

    #[serde(rename = "PC1", default)]
    pub pc1: String,
    #[serde(rename = "PC2", default)]
    pub pc2: String,
    #[serde(rename = "PC3", default)]
    pub pc3: String,

    #[serde(default)]
    pub protein_seq: String,
    #[serde(default)]
    pub structure_seq: String,
    #[serde(default)]
    pub genome_length_bp: f64,
}

/// ICTV taxonomy ranks, realm down to species.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    #[serde(rename = "Realm", default)]
    pub realm: Option<String>,
    #[serde(rename = "Subrealm", default)]
    pub subrealm: Option<String>,
    #[serde(rename = "Kingdom", default)]
    pub kingdom: Option<String>,
    #[serde(rename = "Subkingdom", default)]
    pub subkingdom: Option<String>,
    #[serde(rename = "Phylum", default)]
    pub phylum: Option<String>,
    #[serde(rename = "Subphylum", default)]
    pub subphylum: Option<String>,
    #[serde(rename = "Class", default)]
    pub class: Option<String>,
    #[serde(rename = "Subclass", default)]
    pub subclass: Option<String>,
    #[serde(rename = "Order", default)]
    pub order: Option<String>,
    #[serde(rename = "Suborder", default)]
    pub suborder: Option<String>,
    #[serde(rename = "Family", default)]
    pub family: String,
    #[serde(rename = "Subfamily", default)]
    pub subfamily: String,
    #[serde(rename = "Genus", default)]
    pub genus: Option<String>,
    #[serde(rename = "Subgenus", default)]
    pub subgenus: Option<String>,
    #[serde(rename = "Species", default)]
    pub species: String,
}

impl ProteinStructure {
    /// The name shown for this structure's virus: the curated virus name, or the
    /// abbreviation when the name is missing.
    pub fn virus_display_name(&self) -> &str {
        self.virus_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.virus_abbreviation.as_deref())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn deserializes_curation_sheet_columns() {
        let doc = serde_json::json!({
            "_id": "CAI74981.1.4_11505",
            "protein_id": "CAI74981.1",
            "genbank_name_curated": "Pep13 protein",
            "Family": "Birnaviridae",
            "Species": "Telnavirus tellinae",
            "Virus name(s)": "Tellina virus 1",
            "Virus name abbreviation(s)": "TV1",
            "esmfold_log_pLDDT": "61.3",
            "genome_length_bp": 3579.0
        });

        let structure: ProteinStructure = serde_json::from_value(doc).unwrap();
        check!(structure.record_id == "CAI74981.1.4_11505");
        check!(structure.genbank_id == "CAI74981.1");
        check!(structure.lineage.family == "Birnaviridae");
        check!(structure.virus_name.as_deref() == Some("Tellina virus 1"));
        check!(structure.esmfold_plddt.as_deref() == Some("61.3"));
        check!(structure.lineage.genus.is_none());
    }

    #[test]
    fn display_name_falls_back_to_abbreviation() {
        let doc = serde_json::json!({
            "_id": "X_1",
            "Virus name(s)": "",
            "Virus name abbreviation(s)": "GyV4"
        });
        let structure: ProteinStructure = serde_json::from_value(doc).unwrap();
        check!(structure.virus_display_name() == "GyV4");
    }
}
