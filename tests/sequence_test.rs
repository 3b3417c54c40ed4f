mod common;

use assert2::check;
use common::{TestCatalog, catalog};
use rstest::rstest;
use viro3d_mcp::Page;
use viro3d_mcp::align::AlignmentReport;
use viro3d_mcp::search::AlignmentMatch;

fn evalues(items: &[AlignmentMatch]) -> Vec<f64> {
    items.iter().map(|m| m.evalue).collect()
}

/// Test: Every HSP becomes one match, most significant first.
#[rstest]
#[tokio::test]
async fn matches_sorted_by_evalue(catalog: TestCatalog) {
    let page = catalog
        .catalog
        .sequence_search("asgkplyrnmala", None)
        .await
        .unwrap();

    check!(page.query == "ASGKPLYRNMALA");
    check!(page.total_count == 4);
    check!(evalues(&page.items) == vec![3.2e-5, 0.5, 1.7, 4.5]);

    let ids: Vec<&str> = page.items.iter().map(|m| m.structure_id.as_str()).collect();
    check!(
        ids == vec![
            "CAI74981.1.4_11505",
            "UNKNOWN.1_1",
            "AFO67214.1_12633",
            "AFO67214.1_12633"
        ]
    );
}

/// Test: HSP and alignment fields are carried onto each match.
#[rstest]
#[tokio::test]
async fn match_fields_come_from_hsp_and_alignment(catalog: TestCatalog) {
    let page = catalog
        .catalog
        .sequence_search("ASGKPLYRNMALA", None)
        .await
        .unwrap();

    let last = &page.items[3];
    check!(last.score == 35.0);
    check!(last.hit_length == 460);
    check!(last.positives == 6);
    check!(last.gaps == 2);
}

/// Test: Matches are joined to their structure; unknown targets stay unjoined.
#[rstest]
#[tokio::test]
async fn matches_join_structures(catalog: TestCatalog) {
    let page = catalog
        .catalog
        .sequence_search("ASGKPLYRNMALA", None)
        .await
        .unwrap();

    let first = page.items[0].protein_structure.as_ref().unwrap();
    check!(first.record_id == "CAI74981.1.4_11505");
    check!(page.items[1].protein_structure.is_none());
    check!(page.items[2].protein_structure.is_some());
}

/// Test: The aligner receives the uppercased sequence.
#[rstest]
#[tokio::test]
async fn aligner_gets_uppercase_query(catalog: TestCatalog) {
    catalog
        .catalog
        .sequence_search("mkvLA", None)
        .await
        .unwrap();
    check!(catalog.aligner.queries() == vec!["MKVLA".to_string()]);
}

/// Test: Pagination slices the sorted matches; total_count ignores it.
#[rstest]
#[tokio::test]
async fn matches_paginate(catalog: TestCatalog) {
    let page = catalog
        .catalog
        .sequence_search("ASGK", Some(Page::new(3, 2)))
        .await
        .unwrap();
    check!(page.total_count == 4);
    check!(evalues(&page.items) == vec![4.5]);

    let past_end = catalog
        .catalog
        .sequence_search("ASGK", Some(Page::new(3, 5)))
        .await
        .unwrap();
    check!(past_end.is_empty());
}

/// Test: Sequences with spaces or punctuation are rejected before aligning.
#[rstest]
#[case("NO MATCH")]
#[case("NOMATCH!")]
#[case("")]
#[case("MKV 12")]
#[tokio::test]
async fn invalid_sequence_never_reaches_aligner(catalog: TestCatalog, #[case] sequence: &str) {
    let err = catalog
        .catalog
        .sequence_search(sequence, None)
        .await
        .unwrap_err();

    check!(err.is_bad_input());
    check!(catalog.aligner.calls() == 0);
}

/// Test: A report without hits is NotFound.
#[rstest]
#[tokio::test]
async fn empty_report_is_not_found() {
    let catalog = TestCatalog::new(AlignmentReport::default());
    let err = catalog
        .catalog
        .sequence_search("MKV", None)
        .await
        .unwrap_err();

    check!(err.to_string() == "No Matches Found");
    check!(catalog.aligner.calls() == 1);
}
