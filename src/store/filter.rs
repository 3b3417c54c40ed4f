//! Store-agnostic query filters over protein structure documents.

use crate::error::CatalogError;
use crate::model::ProteinStructure;
use crate::search::literal_braces;
use regex::{Regex, RegexBuilder};

/// Searchable text fields of a [`ProteinStructure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ProteinName,
    GenbankId,
    VirusName,
    VirusAbbreviation,
    Species,
}

impl Field {
    /// Document key of this field in the `proteinstructures` collection.
    pub const fn key(self) -> &'static str {
        match self {
            Self::ProteinName => "genbank_name_curated",
            Self::GenbankId => "protein_id",
            Self::VirusName => "Virus name(s)",
            Self::VirusAbbreviation => "Virus name abbreviation(s)",
            Self::Species => "Species",
        }
    }

    pub fn value(self, doc: &ProteinStructure) -> Option<&str> {
        match self {
            Self::ProteinName => Some(&doc.genbank_name_curated),
            Self::GenbankId => Some(&doc.genbank_id),
            Self::VirusName => doc.virus_name.as_deref(),
            Self::VirusAbbreviation => doc.virus_abbreviation.as_deref(),
            Self::Species => Some(&doc.lineage.species),
        }
    }
}

/// A document filter.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Any of `fields` matches `pattern`.
    Pattern { fields: Vec<Field>, pattern: Regex },
    /// `field` equals `value` exactly.
    Exact { field: Field, value: String },
}

impl Filter {
    /// Case-insensitive pattern match over one or more fields.
    ///
    /// `pattern` should already be escaped for literal use where that is wanted;
    /// see [`compile_pattern`] for how it is compiled.
    pub fn matching(fields: &[Field], pattern: &str) -> Result<Self, CatalogError> {
        let pattern = compile_pattern(pattern, true)?;
        Ok(Self::Pattern {
            fields: fields.to_vec(),
            pattern,
        })
    }

    pub fn exact(field: Field, value: impl Into<String>) -> Self {
        Self::Exact {
            field,
            value: value.into(),
        }
    }

    pub fn matches(&self, doc: &ProteinStructure) -> bool {
        match self {
            Self::Pattern { fields, pattern } => fields
                .iter()
                .filter_map(|field| field.value(doc))
                .any(|value| pattern.is_match(value)),
            Self::Exact { field, value } => field.value(doc) == Some(value.as_str()),
        }
    }
}

/// Compile a store pattern.
///
/// Braces that do not form a counted repetition match literally. A pattern
/// that still does not compile is rejected as bad input.
pub fn compile_pattern(pattern: &str, case_insensitive: bool) -> Result<Regex, CatalogError> {
    RegexBuilder::new(&literal_braces(pattern))
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| CatalogError::BadInput(format!("Invalid search pattern: {}", e)))
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern { fields, pattern } => {
                let keys: Vec<&str> = fields.iter().map(|field| field.key()).collect();
                write!(f, "[{}] ~ /{}/i", keys.join(" | "), pattern.as_str())
            }
            Self::Exact { field, value } => write!(f, "{} == {:?}", field.key(), value),
        }
    }
}
