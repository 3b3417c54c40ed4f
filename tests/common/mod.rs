//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Every test gets its own catalog built from the JSON exports in
//! `tests/fixtures/`:
//! - A fresh [`MemoryStore`] (no state shared between tests)
//! - A [`StubAligner`] that replays a fixed report and counts its calls
//! - Temporary model and bundle directories
//!
//! # Available Fixtures
//!
//! - `catalog`: the fixture store with the default alignment report
//! - `models_catalog`: same, with `CF-`/`EF-` model files for the gyrovirus 4
//!   records and the first cluster written to the model directory
//!
//! [`FailingStore`] and [`FailingAligner`] stand in for collaborators that
//! cannot be reached; build a catalog over them with [`catalog_over`].

#![allow(dead_code)] // Helpers used across different integration test crates

use regex::Regex;
use rstest::fixture;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use viro3d_mcp::align::{Aligner, Alignment, AlignmentReport, Hsp};
use viro3d_mcp::bundle::BundleWriter;
use viro3d_mcp::catalog::Catalog;
use viro3d_mcp::model::{Cluster, GenomeSegment, ProteinStructure};
use viro3d_mcp::store::{
    CandidateFetcher, ClusterSource, CoordinateSource, DocumentStore, Filter, MemoryStore,
    StructureJoiner,
};
use viro3d_mcp::store::memory::{CLUSTERS_FILE, GENOME_COORDINATES_FILE, PROTEIN_STRUCTURES_FILE};

/// Returns the directory holding the JSON collection fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture<T: DeserializeOwned>(file: &str) -> Vec<T> {
    let path = fixtures_dir().join(file);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Builds the fixture store synchronously.
pub fn fixture_store() -> MemoryStore {
    MemoryStore::new(
        read_fixture(PROTEIN_STRUCTURES_FILE),
        read_fixture(GENOME_COORDINATES_FILE),
        read_fixture(CLUSTERS_FILE),
    )
}

/// An aligner that returns a canned report and records how often it was asked.
#[derive(Debug, Clone)]
pub struct StubAligner {
    report: AlignmentReport,
    calls: Arc<AtomicUsize>,
    queries: Arc<std::sync::Mutex<Vec<String>>>,
}

impl StubAligner {
    pub fn new(report: AlignmentReport) -> Self {
        Self {
            report,
            calls: Arc::new(AtomicUsize::new(0)),
            queries: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Aligner for StubAligner {
    async fn align(&self, sequence: &str) -> viro3d_mcp::Result<AlignmentReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(sequence.to_string());
        Ok(self.report.clone())
    }
}

/// An aligner whose tool can never be started.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingAligner;

impl Aligner for FailingAligner {
    async fn align(&self, _sequence: &str) -> viro3d_mcp::Result<AlignmentReport> {
        anyhow::bail!("blastp not reachable")
    }
}

/// A store whose every query fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

const STORE_DOWN: &str = "connection refused";

impl CandidateFetcher for FailingStore {
    async fn fetch(&self, _filter: &Filter) -> viro3d_mcp::Result<Vec<ProteinStructure>> {
        anyhow::bail!(STORE_DOWN)
    }
}

impl StructureJoiner for FailingStore {
    async fn get_by_id(&self, _record_id: &str) -> viro3d_mcp::Result<Option<ProteinStructure>> {
        anyhow::bail!(STORE_DOWN)
    }
}

impl CoordinateSource for FailingStore {
    async fn segments_for_virus(&self, _virus_name: &str) -> viro3d_mcp::Result<Vec<GenomeSegment>> {
        anyhow::bail!(STORE_DOWN)
    }
}

impl ClusterSource for FailingStore {
    async fn clusters_with_member(&self, _member_pattern: &Regex) -> viro3d_mcp::Result<Vec<Cluster>> {
        anyhow::bail!(STORE_DOWN)
    }

    async fn cluster_by_id(&self, _cluster_id: &str) -> viro3d_mcp::Result<Option<Cluster>> {
        anyhow::bail!(STORE_DOWN)
    }
}

/// Builds a catalog over arbitrary collaborators. Bundle directories point at
/// paths that are never created.
pub fn catalog_over<S: DocumentStore, A: Aligner>(store: S, aligner: A) -> Catalog<S, A> {
    let unused = std::env::temp_dir().join("viro3d-test-unused");
    Catalog::new(
        Arc::new(store),
        Arc::new(aligner),
        BundleWriter::new(unused.join("models"), unused.join("bundles")),
    )
}

/// Names of the entries of a zip archive, in archive order.
pub fn archive_entries(path: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(std::fs::File::open(path).expect("Failed to open archive"))
        .expect("Failed to read archive");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("Failed to read entry").name().to_string())
        .collect()
}

/// Text content of one zip archive entry.
pub fn read_entry(path: &Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(std::fs::File::open(path).expect("Failed to open archive"))
        .expect("Failed to read archive");
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap_or_else(|e| panic!("Missing entry {}: {}", name, e))
        .read_to_string(&mut content)
        .expect("Failed to read entry");
    content
}

fn hsp(score: f64, expect: f64, positives: u64, gaps: u64) -> Hsp {
    Hsp {
        score,
        expect,
        positives,
        gaps,
    }
}

/// Report with four HSPs over three targets, one of which is not in the store.
///
/// Ascending by evalue the matches are:
/// `CAI74981.1.4_11505` (3.2e-5), `UNKNOWN.1_1` (0.5),
/// `AFO67214.1_12633` (1.7), `AFO67214.1_12633` (4.5).
pub fn default_report() -> AlignmentReport {
    AlignmentReport {
        alignments: vec![
            Alignment {
                target_id: "AFO67214.1_12633".to_string(),
                length: 460,
                hsps: vec![hsp(40.0, 1.7, 7, 0), hsp(35.0, 4.5, 6, 2)],
            },
            Alignment {
                target_id: "CAI74981.1.4_11505".to_string(),
                length: 13,
                hsps: vec![hsp(63.0, 3.2e-5, 13, 0)],
            },
            Alignment {
                target_id: "UNKNOWN.1_1".to_string(),
                length: 99,
                hsps: vec![hsp(41.0, 0.5, 8, 1)],
            },
        ],
    }
}

/// A catalog over the fixture store with its own temp directories.
pub struct TestCatalog {
    pub catalog: Catalog<MemoryStore, StubAligner>,
    pub aligner: Arc<StubAligner>,
    models: TempDir,
    bundles: TempDir,
}

impl TestCatalog {
    pub fn new(report: AlignmentReport) -> Self {
        let models = TempDir::new().expect("Failed to create temp directory");
        let bundles = TempDir::new().expect("Failed to create temp directory");
        let aligner = Arc::new(StubAligner::new(report));
        let catalog = Catalog::new(
            Arc::new(fixture_store()),
            aligner.clone(),
            BundleWriter::new(models.path(), bundles.path()),
        );
        Self {
            catalog,
            aligner,
            models,
            bundles,
        }
    }

    pub fn models_dir(&self) -> &Path {
        self.models.path()
    }

    pub fn bundle_dir(&self) -> &Path {
        self.bundles.path()
    }

    /// Writes a placeholder model file into the model directory.
    pub fn add_model(&self, file_name: &str) {
        std::fs::write(self.models.path().join(file_name), format!("data_{}\n", file_name))
            .expect("Failed to write model file");
    }
}

#[fixture]
pub fn catalog() -> TestCatalog {
    viro3d_mcp::tracing::init();
    TestCatalog::new(default_report())
}

#[fixture]
pub fn models_catalog(catalog: TestCatalog) -> TestCatalog {
    let test = catalog;
    for format in [".cif", "_relaxed.pdb"] {
        test.add_model(&format!("EF-AFO67214.1_12633{}", format));
        test.add_model(&format!("CF-AFO67214.1_12633{}", format));
        test.add_model(&format!("CF-AFO67213.1_12633{}", format));
        test.add_model(&format!("CF-AFU07689.1_4668{}", format));
    }
    test
}
