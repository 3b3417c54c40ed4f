//! `blastp` subprocess runner.

use super::{Aligner, AlignmentReport, parse_blast_xml};
use crate::error::Result;
use anyhow::Context;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;

/// Runs NCBI `blastp` against a local protein database.
///
/// Each run uses `threads` worker threads; at most `max_concurrent` runs execute
/// at once, further requests wait for a permit.
#[derive(Debug, Clone)]
pub struct BlastpAligner {
    program: PathBuf,
    database: PathBuf,
    threads: u32,
    permits: Arc<Semaphore>,
}

impl BlastpAligner {
    pub fn new(program: PathBuf, database: PathBuf, threads: u32, max_concurrent: usize) -> Self {
        Self {
            program,
            database,
            threads,
            permits: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    async fn run(&self, sequence: &str) -> Result<String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .context("Alignment semaphore closed")?;

        tracing::info!(
            program = %self.program.display(),
            database = %self.database.display(),
            query_len = sequence.len(),
            "Running blastp"
        );

        let mut child = tokio::process::Command::new(&self.program)
            .arg("-db")
            .arg(&self.database)
            .arg("-outfmt")
            .arg("5")
            .arg("-num_threads")
            .arg(self.threads.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program.display()))?;

        let mut stdin = child.stdin.take().context("blastp stdin unavailable")?;
        stdin
            .write_all(sequence.as_bytes())
            .await
            .context("Failed to write query to blastp")?;
        stdin.write_all(b"\n").await.context("Failed to write query to blastp")?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .context("Failed to wait for blastp")?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            tracing::error!(
                status = %output.status,
                stderr = %stderr.trim(),
                "blastp failed"
            );
            anyhow::bail!("blastp exited with {}", output.status);
        }
        if !stderr.trim().is_empty() {
            tracing::warn!(stderr = %stderr.trim(), "blastp reported warnings");
        }

        String::from_utf8(output.stdout).context("blastp produced non UTF-8 output")
    }
}

impl Aligner for BlastpAligner {
    async fn align(&self, sequence: &str) -> Result<AlignmentReport> {
        let xml = self.run(sequence).await?;
        let report = parse_blast_xml(&xml)?;
        tracing::debug!(
            alignments = report.alignments.len(),
            hsps = report.hsp_count(),
            "Parsed blastp report"
        );
        Ok(report)
    }
}
