//! Builds the training corpus from a company index.

use std::sync::Arc;

use corpus_core::{
    CompanyDescriptor, CompanyFactSet, CompanyFinancialTable, CompanyProfile, ExtractionConfig,
    FactArchive, FactProvider, IdentifierLookup, ProfileProvider, RegistryProbe, ResolvedEntity,
    Result, Taxonomy, Ticker, TrainingCorpus,
};
use tracing::{debug, error, info, instrument, warn};

use crate::assembler::RowAssembler;
use crate::resolver::IdentifierResolver;
use crate::store::CorpusStore;

/// Settings of a corpus build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorpusConfig {
    /// Namespace, annual form and fiscal years to extract.
    pub extraction: ExtractionConfig,
    /// Serve fact sets from the archive before fetching them.
    pub reuse_archived_facts: bool,
}

/// Runs resolution, fetching and assembly for every company of an index.
///
/// Companies are processed one at a time in index order. A company whose
/// identifier cannot be resolved or whose facts cannot be fetched is skipped;
/// a missing profile only degrades its sector and industry to `N/A`.
///
/// # Example
///
/// ```rust,ignore
/// use corpus::{CorpusBuilder, CorpusConfig, CorpusStore, StoreConfig};
///
/// let builder = CorpusBuilder::edgar("MyApp/1.0 (contact@example.com)", CorpusConfig::default())
///     .with_yahoo();
/// let companies = builder.run(&CorpusStore::new(StoreConfig::default())).await;
/// println!("{companies} companies written");
/// ```
pub struct CorpusBuilder {
    resolver: IdentifierResolver,
    facts: Arc<dyn FactProvider>,
    profiles: Option<Arc<dyn ProfileProvider>>,
    archive: Option<Arc<dyn FactArchive>>,
    assembler: RowAssembler,
    reuse_archived_facts: bool,
}

impl std::fmt::Debug for CorpusBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusBuilder")
            .field("resolver", &self.resolver)
            .field("facts", &self.facts.name())
            .field("profiles", &self.profiles.as_ref().map(|p| p.name()))
            .field("archive", &self.archive.as_ref().map(|_| "configured"))
            .field("assembler", &self.assembler)
            .field("reuse_archived_facts", &self.reuse_archived_facts)
            .finish()
    }
}

impl CorpusBuilder {
    /// Create a builder from its collaborators, using the standard taxonomy.
    #[must_use]
    pub fn new(
        resolver: IdentifierResolver,
        facts: Arc<dyn FactProvider>,
        config: CorpusConfig,
    ) -> Self {
        Self {
            resolver,
            facts,
            profiles: None,
            archive: None,
            assembler: RowAssembler::new(Taxonomy::standard(), config.extraction),
            reuse_archived_facts: config.reuse_archived_facts,
        }
    }

    /// Create a builder whose lookup, probe and facts all come from one provider.
    #[must_use]
    pub fn from_provider<P>(provider: Arc<P>, config: CorpusConfig) -> Self
    where
        P: IdentifierLookup + RegistryProbe + FactProvider + 'static,
    {
        let resolver = IdentifierResolver::new(provider.clone(), provider.clone());
        Self::new(resolver, provider, config)
    }

    /// Create a builder backed by SEC EDGAR.
    #[cfg(feature = "edgar")]
    #[must_use]
    pub fn edgar(user_agent: &str, config: CorpusConfig) -> Self {
        Self::from_provider(Arc::new(corpus_edgar::EdgarProvider::new(user_agent)), config)
    }

    /// Set the profile provider.
    #[must_use]
    pub fn with_profiles(mut self, profiles: Arc<dyn ProfileProvider>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    /// Add the Yahoo Finance profile provider.
    #[cfg(feature = "yahoo")]
    #[must_use]
    pub fn with_yahoo(self) -> Self {
        self.with_profiles(Arc::new(corpus_yahoo::YahooProvider::new()))
    }

    /// Set the raw fact archive.
    #[must_use]
    pub fn with_archive(mut self, archive: Arc<dyn FactArchive>) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Replace the concept taxonomy.
    #[must_use]
    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        let config = self.assembler.config().clone();
        self.assembler = RowAssembler::new(taxonomy, config);
        self
    }

    /// Builds the corpus for the given tickers.
    ///
    /// Returns the corpus and the number of companies it holds.
    pub async fn build_corpus(&self, tickers: &[Ticker]) -> (TrainingCorpus, usize) {
        let mut corpus = TrainingCorpus::new(self.assembler.columns());
        let mut succeeded = 0usize;

        for (position, ticker) in tickers.iter().enumerate() {
            info!(
                ticker = %ticker,
                "Processing company {}/{}",
                position + 1,
                tickers.len()
            );
            let table = match self.build_company(ticker).await {
                Ok(table) => table,
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "Skipping company");
                    continue;
                }
            };
            match corpus.push(table) {
                Ok(()) => succeeded += 1,
                Err(e) => warn!(ticker = %ticker, error = %e, "Skipping company"),
            }
        }

        info!(
            companies = succeeded,
            skipped = tickers.len() - succeeded,
            "Corpus built"
        );
        (corpus, succeeded)
    }

    /// Reads the index, builds the corpus and writes it.
    ///
    /// Returns the number of companies written, or 0 when the index cannot be
    /// read or the corpus cannot be written.
    pub async fn run(&self, store: &CorpusStore) -> usize {
        match self.try_run(store).await {
            Ok(count) => count,
            Err(e) => {
                error!(error = %e, "Corpus build failed");
                0
            }
        }
    }

    /// Like [`CorpusBuilder::run`], reporting why nothing was written.
    ///
    /// When no company could be processed nothing is written: the previous
    /// corpus file is neither overwritten with a header-only table nor backed
    /// up, and `Ok(0)` is returned.
    ///
    /// # Errors
    /// Returns [`CorpusError::Index`](corpus_core::CorpusError::Index) for an
    /// unreadable index and
    /// [`CorpusError::Storage`](corpus_core::CorpusError::Storage) when the
    /// corpus cannot be written.
    pub async fn try_run(&self, store: &CorpusStore) -> Result<usize> {
        let tickers = store.read_index()?;
        let (corpus, succeeded) = self.build_corpus(&tickers).await;
        if corpus.is_empty() {
            warn!("No company could be processed, keeping the previous corpus");
            return Ok(0);
        }
        store.persist(&corpus)?;
        Ok(succeeded)
    }

    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn build_company(&self, ticker: &Ticker) -> Result<CompanyFinancialTable> {
        let entity = self.resolver.resolve_entity(ticker).await?;
        let facts = self.company_facts(&entity).await?;
        let profile = self.profile(ticker).await;
        let descriptor = CompanyDescriptor::new(&entity, &profile);
        self.assembler.assemble(&facts, descriptor)
    }

    async fn company_facts(&self, entity: &ResolvedEntity) -> Result<CompanyFactSet> {
        if self.reuse_archived_facts
            && let Some(archive) = &self.archive
        {
            match archive.load(&entity.ticker).await {
                Ok(Some(facts)) => {
                    debug!("Using archived facts");
                    return Ok(facts);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Could not read archived facts"),
            }
        }

        let facts = self.facts.fetch_facts(&entity.registry_id).await?;
        if let Some(archive) = &self.archive
            && let Err(e) = archive.store(&entity.ticker, &facts).await
        {
            warn!(error = %e, "Could not archive facts");
        }
        Ok(facts)
    }

    async fn profile(&self, ticker: &Ticker) -> CompanyProfile {
        let Some(profiles) = &self.profiles else {
            return CompanyProfile::unavailable();
        };
        match profiles.profile(ticker).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "Profile unavailable");
                CompanyProfile::unavailable()
            }
        }
    }
}
