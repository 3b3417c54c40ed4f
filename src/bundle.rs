//! Downloadable model bundles: predicted model files plus a CSV metadata sheet.
//!
//! A bundle is a deflated zip archive `<bundle_dir>/<name>_<format>.zip`. Its first
//! entry is `<name>_metadata.csv`; then, per record, the `EF-<id><format>` model
//! when it exists followed by the required `CF-<id><format>` model.

use crate::error::{CatalogError, Result};
use crate::model::{ClusterMember, ProteinStructure};
use anyhow::Context;
use serde::Serialize;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Model file flavour, named by its file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// mmCIF (`.cif`).
    Cif,
    /// Relaxed PDB (`_relaxed.pdb`).
    RelaxedPdb,
}

impl ModelFormat {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Cif => ".cif",
            Self::RelaxedPdb => "_relaxed.pdb",
        }
    }
}

impl FromStr for ModelFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            ".cif" => Ok(Self::Cif),
            "_relaxed.pdb" => Ok(Self::RelaxedPdb),
            _ => Err(CatalogError::BadInput(
                "The file extension provided is not available".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Metadata row for one structure of a virus bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureRow {
    pub record_id: String,
    pub protein_name: String,
    pub virus_name: String,
    pub species: String,
    pub family: String,
    pub host: String,
    #[serde(rename = "protein_length (No. of Residues)")]
    pub protein_length: i64,
    pub uniprot_id: String,
    pub genbank_id: String,
    pub taxid: i64,
    pub nucleotide_accession_number: String,
    #[serde(rename = "ESMFold pLDDT Score")]
    pub esmfold_plddt: String,
    #[serde(rename = "ColabFold pLDDT Score")]
    pub colabfold_plddt: String,
}

impl From<&ProteinStructure> for StructureRow {
    fn from(doc: &ProteinStructure) -> Self {
        Self {
            record_id: doc.record_id.clone(),
            protein_name: doc.genbank_name_curated.clone(),
            virus_name: doc.virus_name.clone().unwrap_or_default(),
            species: doc.lineage.species.clone(),
            family: doc.lineage.family.clone(),
            host: doc.host.clone().unwrap_or_default(),
            protein_length: doc.protlen,
            uniprot_id: doc.uniprot_id.clone(),
            genbank_id: doc.genbank_id.clone(),
            taxid: doc.taxid,
            nucleotide_accession_number: doc.nt_acc.clone(),
            esmfold_plddt: doc.esmfold_plddt.clone().unwrap_or_default(),
            colabfold_plddt: doc.colabfold_plddt.clone(),
        }
    }
}

/// Metadata row for one member of a cluster bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRow {
    pub record_id: String,
    pub protein_name: String,
    pub virus_name: String,
    pub species: String,
    pub family: String,
    pub host: String,
    #[serde(rename = "protein_length (No. of Residues)")]
    pub protein_length: i64,
    pub uniprot_id: String,
    pub genbank_id: String,
    pub taxid: i64,
    pub nucleotide_accession_number: String,
}

impl From<&ClusterMember> for MemberRow {
    fn from(member: &ClusterMember) -> Self {
        Self {
            record_id: member.member_record_id.clone(),
            protein_name: member.genbank_name_curated.clone(),
            virus_name: member.virus_name.clone(),
            species: member.species.clone(),
            family: member.family.clone(),
            host: member.host.clone(),
            protein_length: member.protein_length,
            uniprot_id: member.uniprot_id.clone(),
            genbank_id: member.genbank_id.clone(),
            taxid: member.tax_id,
            nucleotide_accession_number: member.nucleotide_accession_number.clone(),
        }
    }
}

/// What a bundle export wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleManifest {
    /// The written zip archive.
    pub archive: PathBuf,
    /// Archive entry holding the CSV sheet.
    pub metadata_csv: String,
    /// Archive entries holding model files, in archive order.
    pub model_files: Vec<String>,
}

/// Writes bundle archives from a model directory into an output root.
#[derive(Debug, Clone)]
pub struct BundleWriter {
    models_dir: PathBuf,
    bundle_dir: PathBuf,
}

impl BundleWriter {
    pub fn new(models_dir: impl Into<PathBuf>, bundle_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            bundle_dir: bundle_dir.into(),
        }
    }

    /// Write `<name>_<format>.zip` holding the CSV sheet for `rows` followed by
    /// the models of `record_ids`.
    ///
    /// A missing `CF-` model fails the export; `EF-` models are added only when
    /// present. Nothing is written on failure.
    pub async fn write<R: Serialize>(
        &self,
        name: &str,
        format: ModelFormat,
        rows: &[R],
        record_ids: &[&str],
    ) -> Result<BundleManifest> {
        let stem = file_stem(name);
        let metadata_csv = format!("{}_metadata.csv", stem);

        let mut entries = vec![(metadata_csv.clone(), metadata_csv_bytes(rows)?)];
        for id in record_ids {
            let esmfold = format!("EF-{}{}", id, format);
            if let Some(bytes) = read_model(&self.models_dir, &esmfold, false).await? {
                entries.push((esmfold, bytes));
            }
            let colabfold = format!("CF-{}{}", id, format);
            if let Some(bytes) = read_model(&self.models_dir, &colabfold, true).await? {
                entries.push((colabfold, bytes));
            }
        }
        let model_files: Vec<String> = entries[1..].iter().map(|(entry, _)| entry.clone()).collect();

        // Deflating a few hundred models is CPU-bound
        let bytes = tokio::task::spawn_blocking(move || zip_entries(entries))
            .await
            .context("Bundle compression task failed")??;

        tokio::fs::create_dir_all(&self.bundle_dir)
            .await
            .with_context(|| format!("Failed to create bundle directory {}", self.bundle_dir.display()))?;
        let archive = self.bundle_dir.join(format!("{}_{}.zip", stem, format));
        tokio::fs::write(&archive, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", archive.display()))?;

        tracing::info!(
            bundle = %archive.display(),
            records = record_ids.len(),
            files = model_files.len(),
            size = bytes.len(),
            "Wrote model bundle"
        );

        Ok(BundleManifest {
            archive,
            metadata_csv,
            model_files,
        })
    }
}

/// Serialize `rows` as CSV with a header row.
pub fn metadata_csv_bytes<R: Serialize>(rows: &[R]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).context("Failed to serialize metadata row")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush metadata CSV: {}", e.error()))
}

/// Read one model file. Returns `None` for an absent optional model.
async fn read_model(models_dir: &Path, file_name: &str, required: bool) -> Result<Option<Vec<u8>>> {
    let source = models_dir.join(file_name);
    if !required && !tokio::fs::try_exists(&source).await.unwrap_or(false) {
        tracing::debug!(model = file_name, "Optional model not present");
        return Ok(None);
    }
    let bytes = tokio::fs::read(&source)
        .await
        .with_context(|| format!("Failed to read model {}", source.display()))?;
    Ok(Some(bytes))
}

/// Deflate `entries` into an in-memory zip archive, in order.
fn zip_entries(entries: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (entry, bytes) in entries {
        zip.start_file(entry.as_str(), options)
            .with_context(|| format!("Failed to add {} to bundle", entry))?;
        zip.write_all(&bytes)
            .with_context(|| format!("Failed to write {} to bundle", entry))?;
    }
    Ok(zip.finish().context("Failed to finish bundle archive")?.into_inner())
}

/// Turn a virus or cluster name into a single path component.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}
