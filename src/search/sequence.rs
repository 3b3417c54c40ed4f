//! Sequence-similarity search: validate, align, flatten, join, rank.

use super::page::{Page, RankedResultPage, paginate};
use crate::align::{Aligner, AlignmentReport};
use crate::error::CatalogError;
use crate::model::ProteinStructure;
use crate::store::StructureJoiner;
use serde::Serialize;

/// One HSP of the alignment report, joined to the structure it hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentMatch {
    pub structure_id: String,
    pub score: f64,
    pub evalue: f64,
    pub hit_length: u64,
    pub positives: u64,
    pub gaps: u64,
    /// `None` when the aligner reported a target the store does not know.
    pub protein_structure: Option<ProteinStructure>,
}

/// Check that `sequence` is a bare run of letters and return it uppercased.
///
/// Empty input, whitespace, digits and punctuation are all rejected before the
/// aligner is involved.
pub fn validate_sequence(sequence: &str) -> Result<String, CatalogError> {
    if sequence.is_empty() || !sequence.chars().all(char::is_alphabetic) {
        return Err(CatalogError::BadInput(
            "Sequence must contain only alphabetic characters and no whitespace".to_string(),
        ));
    }
    Ok(sequence.to_uppercase())
}

/// Run a protein sequence through the aligner and shape the hits into one page
/// of matches, most significant (lowest evalue) first.
///
/// Only the matches on the returned page are joined to their structures; the
/// ordering and `total_count` do not depend on the join.
pub async fn match_sequence<A, J>(
    aligner: &A,
    joiner: &J,
    sequence: &str,
    page: Option<Page>,
) -> Result<RankedResultPage<AlignmentMatch>, CatalogError>
where
    A: Aligner,
    J: StructureJoiner,
{
    let query = validate_sequence(sequence)?;

    let report = aligner.align(&query).await?;
    let mut matches = flatten(report);

    if matches.is_empty() {
        return Err(CatalogError::NO_MATCHES);
    }

    // Stable, so equal evalues keep the aligner's order.
    matches.sort_by(|a, b| a.evalue.total_cmp(&b.evalue));

    let total_count = matches.len();
    let mut items = paginate(matches, page);

    for item in &mut items {
        item.protein_structure = joiner.get_by_id(&item.structure_id).await?;
        if item.protein_structure.is_none() {
            tracing::warn!(
                structure_id = %item.structure_id,
                "Alignment target has no matching structure record"
            );
        }
    }

    tracing::debug!(
        query_len = query.len(),
        total_count,
        returned = items.len(),
        "Ranked sequence matches"
    );

    Ok(RankedResultPage {
        query,
        total_count,
        items,
    })
}

/// One match per (alignment, HSP) pair, in report order.
fn flatten(report: AlignmentReport) -> Vec<AlignmentMatch> {
    report
        .alignments
        .into_iter()
        .flat_map(|alignment| {
            let length = alignment.length;
            let target = alignment.target_id;
            alignment.hsps.into_iter().map(move |hsp| AlignmentMatch {
                structure_id: target.clone(),
                score: hsp.score,
                evalue: hsp.expect,
                hit_length: length,
                positives: hsp.positives,
                gaps: hsp.gaps,
                protein_structure: None,
            })
        })
        .collect()
}
