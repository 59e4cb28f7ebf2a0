//! Archive trait for storing downloaded company facts.
//!
//! This module defines the [`FactArchive`] trait that provides a unified interface
//! for keeping the raw fact graph of each company between runs.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{CompanyFactSet, Ticker},
};

/// Trait for archiving fetched company facts.
///
/// Implementations can store data in various backends (files, in-memory, etc.)
/// so a corpus can be rebuilt without downloading every company again.
#[async_trait]
pub trait FactArchive: Send + Sync + Debug {
    /// Retrieves the archived facts for a ticker.
    ///
    /// Returns `Ok(Some(facts))` if archived, `Ok(None)` if not.
    async fn load(&self, ticker: &Ticker) -> Result<Option<CompanyFactSet>>;

    /// Stores the facts for a ticker, replacing any previous copy.
    async fn store(&self, ticker: &Ticker, facts: &CompanyFactSet) -> Result<()>;
}
