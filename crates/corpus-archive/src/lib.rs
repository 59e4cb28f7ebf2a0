#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/corpus/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Archive implementations for downloaded company facts.
//!
//! This crate provides implementations of the [`FactArchive`] trait from `corpus-core`:
//!
//! - [`FsArchive`] - Persistent JSON file archive
//! - [`InMemoryArchive`] - Simple in-memory archive for testing

/// File system archive implementation.
pub mod fs;
/// In-memory archive implementation.
pub mod memory;

// Re-export the trait for convenience
pub use corpus_core::FactArchive;

// Re-export implementations
pub use fs::FsArchive;
pub use memory::InMemoryArchive;
