#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/corpus/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Fundamentals training-corpus builder.
//!
//! This crate turns the XBRL fact graphs of a list of companies into one
//! training table with a row per company and fiscal year. It re-exports the
//! core types and provider implementations, and provides:
//!
//! - [`IdentifierResolver`] - ticker → validated registry identifier
//! - [`FactExtractor`] - one value per fiscal year for a concept
//! - [`RowAssembler`] - one table per company over every concept
//! - [`CorpusBuilder`] - the whole index, persisted through a [`CorpusStore`]
//!
//! # Features
//!
//! - `edgar` - SEC EDGAR identifier lookup, probe and company facts
//! - `yahoo` - Yahoo Finance sector and industry
//! - `cli` - the `build-corpus` binary (clap flags, `tracing-subscriber` output)
//!
//! # Example
//!
//! ```rust,ignore
//! use corpus::{CorpusBuilder, CorpusConfig, CorpusStore, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let builder = CorpusBuilder::edgar("MyApp/1.0 (contact@example.com)", CorpusConfig::default())
//!         .with_yahoo();
//!
//!     let companies = builder.run(&CorpusStore::new(StoreConfig::default())).await;
//!     println!("{companies} companies written");
//! }
//! ```

// Core types and traits
pub use corpus_core::*;

// Archive implementations
pub use corpus_archive::{FsArchive, InMemoryArchive};

// Providers
#[cfg(feature = "edgar")]
pub use corpus_edgar::EdgarProvider;
#[cfg(feature = "yahoo")]
pub use corpus_yahoo::YahooProvider;

/// Corpus aggregation over a company index.
pub mod aggregator;
/// Per-company table assembly.
pub mod assembler;
/// Per-concept fact extraction.
pub mod extractor;
/// Ticker resolution.
pub mod resolver;
/// CSV index and corpus storage.
pub mod store;

pub use aggregator::{CorpusBuilder, CorpusConfig};
pub use assembler::RowAssembler;
pub use extractor::{ConceptSeries, FactExtractor};
pub use resolver::IdentifierResolver;
pub use store::{CorpusStore, StoreConfig};
