//! Genome coordinate annotations, one document per genome segment.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeSegment {
    #[serde(rename = "_id")]
    pub nt_acc: String,
    pub segment: String,
    #[serde(default)]
    pub genome_length_bp: f64,
    #[serde(default)]
    pub isolate_designation: String,
    #[serde(default)]
    pub coordinates: Vec<GenomeCoordinate>,
}

/// Position of one protein on its genome segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeCoordinate {
    pub id: String,
    pub nt_acc: String,
    pub virus_name: String,
    pub gene_name: String,
    pub pept_cat: String,
    pub segment: String,
    pub start: f64,
    pub end: f64,
    pub strand: String,
    pub family: String,
    pub join: String,
}

impl GenomeSegment {
    pub fn has_virus(&self, virus_name: &str) -> bool {
        self.coordinates.iter().any(|c| c.virus_name == virus_name)
    }
}

/// Sort segments by label in natural order, so that "RNA2" precedes "RNA10".
pub fn sort_segments(segments: &mut [GenomeSegment]) {
    segments.sort_by(|a, b| natural_cmp(&a.segment, &b.segment));
}

/// Compare two labels treating runs of ASCII digits as numbers.
///
/// Non-digit runs compare case-insensitively; ties fall back to the raw strings
/// so the ordering stays total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l, r) {
                    (Chunk::Number(x), Chunk::Number(y)) => {
                        let x = x.trim_start_matches('0');
                        let y = y.trim_start_matches('0');
                        x.len().cmp(&y.len()).then_with(|| x.cmp(y))
                    }
                    (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
                    (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
                    (Chunk::Text(x), Chunk::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

enum Chunk<'a> {
    Number(&'a str),
    Text(&'a str),
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    const fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map_or(self.rest.len(), |(i, _)| i);
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(if digits {
            Chunk::Number(head)
        } else {
            Chunk::Text(head)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("RNA2", "RNA10", Ordering::Less)]
    #[case("RNA10", "RNA9", Ordering::Greater)]
    #[case("SegA", "SegB", Ordering::Less)]
    #[case("DNA-A", "dna-b", Ordering::Less)]
    #[case("S1", "S01", Ordering::Greater)]
    #[case("Non-segmented", "Non-segmented", Ordering::Equal)]
    fn natural_ordering(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        check!(natural_cmp(a, b) == expected);
    }

    #[test]
    fn sorts_segment_labels() {
        let mut labels = vec!["RNA10", "RNA1", "RNA2", "RNA3"];
        labels.sort_by(|a, b| natural_cmp(a, b));
        check!(labels == vec!["RNA1", "RNA2", "RNA3", "RNA10"]);
    }
}
