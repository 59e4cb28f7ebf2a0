#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/corpus/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the fundamentals training-corpus builder.
//!
//! This crate provides the foundational abstractions shared by every crate in
//! the workspace:
//!
//! - [`FactProvider`](provider::FactProvider) - Company fact graphs
//! - [`IdentifierLookup`](provider::IdentifierLookup) - Ticker → registry identifier
//! - [`RegistryProbe`](provider::RegistryProbe) - Registry identifier validation
//! - [`ProfileProvider`](provider::ProfileProvider) - Sector and industry
//! - [`FactArchive`](archive::FactArchive) - Archive of downloaded facts
//! - [`Throttle`](throttle::Throttle) - Request spacing
//! - [`Taxonomy`](taxonomy::Taxonomy) - Concept synonym groups and display codes
//! - [`TrainingCorpus`](table::TrainingCorpus) - Output tables

/// Archive trait for downloaded company facts.
pub mod archive;
/// Dated backups of files about to be overwritten.
pub mod backup;
/// Extraction settings.
pub mod config;
/// Error types for corpus operations.
pub mod error;
/// Fiscal periods, units, frames and year ranges.
pub mod period;
/// Provider traits for external collaborators.
pub mod provider;
/// Company tables and the training corpus.
pub mod table;
/// Concept synonym groups and display codes.
pub mod taxonomy;
/// Request throttling.
pub mod throttle;
/// Core data types (Ticker, RawFact, CompanyFactSet, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use archive::FactArchive;
pub use config::{ANNUAL_FORM, DEFAULT_NAMESPACE, ExtractionConfig};
pub use error::{CorpusError, ExtractionWarning, FetchError, ResolutionError, Result};
pub use period::{FiscalPeriod, Frame, Unit, YearRange};
pub use provider::{DataProvider, FactProvider, IdentifierLookup, ProfileProvider, RegistryProbe};
pub use table::{CompanyFinancialTable, FinancialRow, TrainingCorpus};
pub use taxonomy::{ConceptSynonymGroup, Taxonomy};
pub use throttle::{FixedDelay, Throttle};
pub use types::{
    CompanyDescriptor, CompanyFactSet, CompanyProfile, LookupRecord, NOT_AVAILABLE, RawFact,
    RegistryId, ResolvedEntity, SicCode, Ticker, YearValue,
};
