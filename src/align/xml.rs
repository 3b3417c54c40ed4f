//! Parser for BLAST XML output (`-outfmt 5`).

use super::{Alignment, AlignmentReport, Hsp};
use crate::error::Result;
use anyhow::Context;
use serde::Deserialize;

/// Parse a `BlastOutput` document into a report, concatenating the hits of
/// every iteration.
pub fn parse_blast_xml(xml: &str) -> Result<AlignmentReport> {
    anyhow::ensure!(
        xml.contains("<BlastOutput"),
        "Expected BLAST XML output, got: {}",
        xml.lines().next().unwrap_or_default()
    );

    let parsed: BlastOutputXml =
        quick_xml::de::from_str(xml).context("Malformed BLAST XML output")?;

    let alignments = parsed
        .iterations
        .map(|iterations| iterations.iterations)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|iteration| iteration.hits)
        .flat_map(|hits| hits.hits)
        .map(|hit| Alignment {
            target_id: hit.def.trim().to_string(),
            length: hit.len,
            hsps: hit
                .hsps
                .map(|hsps| hsps.hsps)
                .unwrap_or_default()
                .into_iter()
                .map(|hsp| Hsp {
                    score: hsp.score,
                    expect: hsp.evalue,
                    positives: hsp.positive.unwrap_or(0),
                    gaps: hsp.gaps.unwrap_or(0),
                })
                .collect(),
        })
        .collect();

    Ok(AlignmentReport { alignments })
}

#[derive(Debug, Deserialize)]
#[serde(rename = "BlastOutput")]
struct BlastOutputXml {
    #[serde(rename = "BlastOutput_iterations")]
    iterations: Option<IterationsXml>,
}

#[derive(Debug, Deserialize)]
struct IterationsXml {
    #[serde(rename = "Iteration", default)]
    iterations: Vec<IterationXml>,
}

#[derive(Debug, Deserialize)]
struct IterationXml {
    #[serde(rename = "Iteration_hits")]
    hits: Option<HitsXml>,
}

#[derive(Debug, Deserialize)]
struct HitsXml {
    #[serde(rename = "Hit", default)]
    hits: Vec<HitXml>,
}

#[derive(Debug, Deserialize)]
struct HitXml {
    #[serde(rename = "Hit_def")]
    def: String,
    #[serde(rename = "Hit_len")]
    len: u64,
    #[serde(rename = "Hit_hsps")]
    hsps: Option<HspsXml>,
}

#[derive(Debug, Deserialize)]
struct HspsXml {
    #[serde(rename = "Hsp", default)]
    hsps: Vec<HspXml>,
}

#[derive(Debug, Deserialize)]
struct HspXml {
    #[serde(rename = "Hsp_score")]
    score: f64,
    #[serde(rename = "Hsp_evalue")]
    evalue: f64,
    #[serde(rename = "Hsp_positive")]
    positive: Option<u64>,
    #[serde(rename = "Hsp_gaps")]
    gaps: Option<u64>,
}
