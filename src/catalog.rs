//! The catalog service: every outward query operation over the injected store
//! and aligner.

use crate::align::Aligner;
use crate::bundle::{BundleManifest, BundleWriter, MemberRow, ModelFormat, StructureRow};
use crate::error::CatalogError;
use crate::model::{Cluster, GenomeSegment, ProteinStructure, sort_segments};
use crate::search::{
    AlignmentMatch, Page, RankedResultPage, SearchCandidate, distinct_and_rank, match_sequence,
    paginate, rank_and_paginate, sanitize,
};
use crate::store::{DocumentStore, Field, Filter, compile_pattern};
use serde::Serialize;
use std::sync::Arc;

/// Fields searched by the virus autocomplete listing.
const VIRUS_LISTING_FIELDS: [Field; 3] = [Field::VirusName, Field::VirusAbbreviation, Field::Species];

/// One distinct virus name from the autocomplete listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirusSummary {
    pub virus_name: String,
    pub relevance: f64,
}

/// Genome segments carrying a virus' proteins, in natural segment order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenomeSegments {
    pub virus_name: String,
    pub segments: Vec<GenomeSegment>,
}

/// Clusters holding a member whose record id matches a GenBank id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterMatches {
    pub genbank_id: String,
    pub clusters: Vec<Cluster>,
}

/// Read-only query service over a document store and an aligner.
pub struct Catalog<S, A> {
    store: Arc<S>,
    aligner: Arc<A>,
    bundles: BundleWriter,
}

impl<S, A> Clone for Catalog<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            aligner: self.aligner.clone(),
            bundles: self.bundles.clone(),
        }
    }
}

impl<S, A> std::fmt::Debug for Catalog<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("bundles", &self.bundles)
            .finish_non_exhaustive()
    }
}

impl<S: DocumentStore, A: Aligner> Catalog<S, A> {
    pub fn new(store: Arc<S>, aligner: Arc<A>, bundles: BundleWriter) -> Self {
        Self {
            store,
            aligner,
            bundles,
        }
    }

    /// Structures whose curated protein name contains `query`, most relevant first.
    pub async fn search_protein_name(
        &self,
        query: &str,
        page: Option<Page>,
    ) -> Result<RankedResultPage<ProteinStructure>, CatalogError> {
        let filter = Filter::matching(&[Field::ProteinName], &sanitize(query))?;
        let candidates = self
            .fetch(&filter)
            .await?
            .into_iter()
            .map(|doc| SearchCandidate::new(doc.genbank_name_curated.clone(), doc))
            .collect();

        Ok(rank_and_paginate(candidates, query, page, CatalogError::NO_STRUCTURES)?
            .map_items(|scored| scored.item))
    }

    /// Structures whose virus name or abbreviation contains `query`, most relevant first.
    pub async fn search_virus_name(
        &self,
        query: &str,
        page: Option<Page>,
    ) -> Result<RankedResultPage<ProteinStructure>, CatalogError> {
        let filter = Filter::matching(
            &[Field::VirusName, Field::VirusAbbreviation],
            &sanitize(query),
        )?;
        let candidates = self
            .fetch(&filter)
            .await?
            .into_iter()
            .map(|doc| SearchCandidate::new(doc.virus_display_name().to_string(), doc))
            .collect();

        Ok(rank_and_paginate(candidates, query, page, CatalogError::NO_STRUCTURES)?
            .map_items(|scored| scored.item))
    }

    /// Distinct virus names whose name, abbreviation or species contains `query`.
    pub async fn list_viruses(
        &self,
        query: &str,
        page: Option<Page>,
    ) -> Result<RankedResultPage<VirusSummary>, CatalogError> {
        let filter = Filter::matching(&VIRUS_LISTING_FIELDS, &sanitize(query))?;
        let raw_matches = self.fetch(&filter).await?;

        let ranked = distinct_and_rank(
            &raw_matches,
            |doc| doc.virus_name.as_deref().filter(|name| !name.is_empty()),
            query,
            page,
            CatalogError::NO_MATCHES,
        )?;

        Ok(ranked.map_items(|scored| VirusSummary {
            virus_name: scored.item,
            relevance: scored.relevance,
        }))
    }

    /// Structures whose GenBank protein id contains `query`, in store order.
    pub async fn search_genbank_id(
        &self,
        query: &str,
        page: Option<Page>,
    ) -> Result<RankedResultPage<ProteinStructure>, CatalogError> {
        let filter = Filter::matching(&[Field::GenbankId], &sanitize(query))?;
        let matches = self.fetch(&filter).await?;
        in_store_order(matches, query, page)
    }

    /// Structures of exactly this virus, in store order.
    ///
    /// Follow-up to a pick from [`Self::list_viruses`], so no pattern matching.
    pub async fn virus_structures(
        &self,
        virus_name: &str,
        page: Option<Page>,
    ) -> Result<RankedResultPage<ProteinStructure>, CatalogError> {
        let filter = Filter::exact(Field::VirusName, virus_name);
        let matches = self.fetch(&filter).await?;
        in_store_order(matches, virus_name, page)
    }

    pub async fn get_record(&self, record_id: &str) -> Result<ProteinStructure, CatalogError> {
        self.store
            .get_by_id(record_id)
            .await?
            .ok_or(CatalogError::NO_STRUCTURES)
    }

    /// Align `sequence` against the reference database and page through the hits.
    pub async fn sequence_search(
        &self,
        sequence: &str,
        page: Option<Page>,
    ) -> Result<RankedResultPage<AlignmentMatch>, CatalogError> {
        match_sequence(self.aligner.as_ref(), self.store.as_ref(), sequence, page).await
    }

    pub async fn genome_segments(&self, virus_name: &str) -> Result<GenomeSegments, CatalogError> {
        let mut segments = self.store.segments_for_virus(virus_name).await?;
        if segments.is_empty() {
            return Err(CatalogError::NO_COORDINATES);
        }
        sort_segments(&mut segments);

        tracing::debug!(virus_name, count = segments.len(), "Found genome segments");
        Ok(GenomeSegments {
            virus_name: virus_name.to_string(),
            segments,
        })
    }

    /// Clusters with a member whose record id contains `genbank_id` (case-sensitive).
    pub async fn clusters_for_genbank_id(
        &self,
        genbank_id: &str,
    ) -> Result<ClusterMatches, CatalogError> {
        let pattern = compile_pattern(&sanitize(genbank_id), false)?;
        let clusters = self.store.clusters_with_member(&pattern).await?;
        if clusters.is_empty() {
            return Err(CatalogError::NO_SIMILAR_STRUCTURES);
        }

        tracing::debug!(genbank_id, count = clusters.len(), "Found similar structure clusters");
        Ok(ClusterMatches {
            genbank_id: genbank_id.to_string(),
            clusters,
        })
    }

    /// Bundle every model of exactly this virus.
    pub async fn export_virus_bundle(
        &self,
        virus_name: &str,
        format: &str,
    ) -> Result<BundleManifest, CatalogError> {
        let format: ModelFormat = format.parse()?;

        let structures = self.fetch(&Filter::exact(Field::VirusName, virus_name)).await?;
        if structures.is_empty() {
            return Err(CatalogError::NO_MODELS);
        }

        let rows: Vec<StructureRow> = structures.iter().map(StructureRow::from).collect();
        let ids: Vec<&str> = structures.iter().map(|doc| doc.record_id.as_str()).collect();
        Ok(self.bundles.write(virus_name, format, &rows, &ids).await?)
    }

    /// Bundle the models of every member of one cluster.
    pub async fn export_cluster_bundle(
        &self,
        cluster_id: &str,
        format: &str,
    ) -> Result<BundleManifest, CatalogError> {
        let format: ModelFormat = format.parse()?;

        let cluster = self
            .store
            .cluster_by_id(cluster_id)
            .await?
            .ok_or(CatalogError::NO_MODELS)?;

        let rows: Vec<MemberRow> = cluster.cluster_members.iter().map(MemberRow::from).collect();
        let ids: Vec<&str> = cluster
            .cluster_members
            .iter()
            .map(|member| member.member_record_id.as_str())
            .collect();
        Ok(self.bundles.write(cluster_id, format, &rows, &ids).await?)
    }

    async fn fetch(&self, filter: &Filter) -> Result<Vec<ProteinStructure>, CatalogError> {
        Ok(self.store.fetch(filter).await?)
    }
}

/// Paginate unranked matches, keeping the store's order.
fn in_store_order(
    matches: Vec<ProteinStructure>,
    query: &str,
    page: Option<Page>,
) -> Result<RankedResultPage<ProteinStructure>, CatalogError> {
    if matches.is_empty() {
        return Err(CatalogError::NO_STRUCTURES);
    }
    let total_count = matches.len();
    Ok(RankedResultPage {
        query: query.to_string(),
        total_count,
        items: paginate(matches, page),
    })
}
