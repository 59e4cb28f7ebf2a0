//! Provider traits for the external collaborators of the pipeline.
//!
//! This module defines the core provider traits:
//!
//! - [`DataProvider`] - Base trait for all providers
//! - [`IdentifierLookup`] - Ticker → candidate registry identifier and classification
//! - [`RegistryProbe`] - Confirms an identifier exists in the registry
//! - [`FactProvider`] - Registry identifier → company fact graph
//! - [`ProfileProvider`] - Ticker → sector and industry

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::{FetchError, ResolutionError},
    types::{CompanyFactSet, CompanyProfile, LookupRecord, RegistryId, Ticker},
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Looks up the registry identifier and classification of a ticker.
#[async_trait]
pub trait IdentifierLookup: DataProvider {
    /// Returns the unvalidated lookup result for a ticker.
    ///
    /// Implementations return [`ResolutionError::NotFound`] when the source
    /// explicitly reports an unknown ticker and
    /// [`ResolutionError::Unreachable`] on network failure. A page that simply
    /// lacks an identifier yields a record with `candidate_id: None`.
    async fn lookup(&self, ticker: &Ticker) -> Result<LookupRecord, ResolutionError>;
}

/// Confirms that an identifier is known to the registry.
#[async_trait]
pub trait RegistryProbe: DataProvider {
    /// Probes the registry's per-entity index.
    ///
    /// Returns [`ResolutionError::NotFound`] when the registry has no such
    /// entity and [`ResolutionError::Unreachable`] on network failure.
    async fn probe(&self, id: &RegistryId) -> Result<(), ResolutionError>;
}

/// Provider of company fact graphs.
#[async_trait]
pub trait FactProvider: DataProvider {
    /// Fetches every fact reported by the entity.
    async fn fetch_facts(&self, id: &RegistryId) -> Result<CompanyFactSet, FetchError>;
}

/// Provider of sector/industry classification.
#[async_trait]
pub trait ProfileProvider: DataProvider {
    /// Fetches the company profile.
    async fn profile(&self, ticker: &Ticker) -> Result<CompanyProfile, FetchError>;
}
