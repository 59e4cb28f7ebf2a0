//! Error types for corpus operations.
//!
//! Errors are split by the scope they abort:
//!
//! - [`ResolutionError`] and [`FetchError`] abort a single company.
//! - [`ExtractionWarning`] never aborts anything and is only reported.
//! - [`CorpusError`] covers configuration, index and storage failures.

use thiserror::Error;

/// Errors raised while mapping a ticker to a registry identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The lookup yielded no identifier or the registry does not know the ticker.
    #[error("No registry identifier found for {0}")]
    NotFound(String),

    /// The candidate identifier is not exactly ten digits.
    #[error("Invalid registry identifier format: {0:?}")]
    InvalidFormat(String),

    /// Network-level failure during lookup or probing.
    #[error("Registry unreachable: {0}")]
    Unreachable(String),
}

/// Errors raised while fetching company facts or profiles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network-level failure or an error status from the remote service.
    #[error("Source unreachable: {0}")]
    Unreachable(String),

    /// The response arrived but could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Non-fatal conditions observed while extracting one concept.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionWarning {
    /// A synonym tag has no facts under the selected unit.
    MissingSynonym {
        /// Canonical key of the concept being extracted.
        concept: String,
        /// The synonym tag that was skipped.
        tag: String,
        /// Unit key that was looked up.
        unit: String,
    },

    /// No candidate matched the year; a zero placeholder was emitted.
    EmptyYear {
        /// Canonical key of the concept being extracted.
        concept: String,
        /// Fiscal year that had no match.
        fiscal_year: i32,
    },

    /// Several candidates with differing values matched the year.
    ConflictingDuplicates {
        /// Canonical key of the concept being extracted.
        concept: String,
        /// Fiscal year with the conflict.
        fiscal_year: i32,
        /// Number of matching candidates.
        candidates: usize,
        /// Value that was kept (latest filing).
        chosen: f64,
    },
}

impl std::fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSynonym { concept, tag, unit } => {
                write!(f, "{concept}: synonym {tag} has no {unit} facts")
            }
            Self::EmptyYear {
                concept,
                fiscal_year,
            } => write!(f, "{concept}: no value for {fiscal_year}"),
            Self::ConflictingDuplicates {
                concept,
                fiscal_year,
                candidates,
                chosen,
            } => write!(
                f,
                "{concept}: {candidates} conflicting values for {fiscal_year}, kept {chosen}"
            ),
        }
    }
}

/// Errors for configuration, index, archive and storage operations.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Identifier resolution failed.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Fetching facts or profiles failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Invalid taxonomy, year range or other configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The company index could not be read or is malformed.
    #[error("Index error: {0}")]
    Index(String),

    /// The corpus could not be written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Error interacting with the raw fact archive.
    #[error("Archive error: {0}")]
    Archive(String),

    /// A company table does not match the corpus columns.
    #[error("Schema mismatch: {0}")]
    Schema(String),
}

/// Result type alias using [`CorpusError`].
pub type Result<T> = std::result::Result<T, CorpusError>;
