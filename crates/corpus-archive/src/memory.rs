//! In-memory archive implementation.

use async_trait::async_trait;
use corpus_core::{CompanyFactSet, FactArchive, Result, Ticker};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Simple in-memory archive for testing and single runs.
///
/// Fact sets are stored in a `RwLock`-protected `HashMap` and are lost when
/// the archive is dropped. Fact sets are cloned on load/store.
#[derive(Debug, Default)]
pub struct InMemoryArchive {
    entries: RwLock<HashMap<Ticker, CompanyFactSet>>,
}

impl InMemoryArchive {
    /// Create a new empty in-memory archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FactArchive for InMemoryArchive {
    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn load(&self, ticker: &Ticker) -> Result<Option<CompanyFactSet>> {
        let entries = self.entries.read().await;
        match entries.get(ticker) {
            Some(facts) => {
                debug!("Archive hit");
                Ok(Some(facts.clone()))
            }
            None => {
                debug!("Archive miss");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, facts), fields(ticker = %ticker))]
    async fn store(&self, ticker: &Ticker, facts: &CompanyFactSet) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(ticker.clone(), facts.clone());
        debug!("Archived {} concepts", facts.concept_count());
        Ok(())
    }
}
