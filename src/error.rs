//! Error handling types and utilities.

/// A specialized Result type for collaborator and I/O code.
///
/// This is an alias for `anyhow::Result`; context is added via `.context()` and
/// `.with_context()` and the error is lifted into [`CatalogError::Upstream`] at the
/// service boundary.
pub type Result<T> = anyhow::Result<T>;

/// Failure of a single catalog request.
///
/// The three variants are deliberately distinct: callers must be able to tell
/// "nothing matched" apart from "the question could not be asked".
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The result set was empty before pagination.
    #[error("{what}")]
    NotFound { what: &'static str },

    /// The request was rejected before any I/O took place.
    #[error("{0}")]
    BadInput(String),

    /// The document store or the alignment tool failed.
    #[error("upstream failure: {0:#}")]
    Upstream(#[from] anyhow::Error),
}

impl CatalogError {
    pub const NO_STRUCTURES: Self = Self::NotFound {
        what: "No Structures Found",
    };
    pub const NO_MATCHES: Self = Self::NotFound {
        what: "No Matches Found",
    };
    pub const NO_COORDINATES: Self = Self::NotFound {
        what: "No Coordinates Found",
    };
    pub const NO_SIMILAR_STRUCTURES: Self = Self::NotFound {
        what: "No Similar Structures Found",
    };
    pub const NO_MODELS: Self = Self::NotFound {
        what: "No Models Found",
    };

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub const fn is_bad_input(&self) -> bool {
        matches!(self, Self::BadInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn not_found_displays_user_message() {
        check!(CatalogError::NO_COORDINATES.to_string() == "No Coordinates Found");
        check!(CatalogError::NO_MATCHES.is_not_found());
    }

    #[test]
    fn upstream_keeps_context_chain() {
        let err: CatalogError = anyhow::anyhow!("connection refused")
            .context("blastp run failed")
            .into();
        check!(!err.is_not_found());
        check!(err.to_string() == "upstream failure: blastp run failed: connection refused");
    }
}
