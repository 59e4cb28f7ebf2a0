//! Ticker → validated registry identifier.

use std::sync::Arc;

use corpus_core::{
    IdentifierLookup, RegistryId, RegistryProbe, ResolutionError, ResolvedEntity, Ticker,
};
use tracing::{debug, instrument};

/// Resolves tickers to registry identifiers confirmed by the registry.
///
/// The candidate returned by the lookup must be exactly ten digits and the
/// registry must answer the probe for it. The shape check runs first, so a
/// malformed candidate never reaches the network.
#[derive(Clone)]
pub struct IdentifierResolver {
    lookup: Arc<dyn IdentifierLookup>,
    probe: Arc<dyn RegistryProbe>,
}

impl std::fmt::Debug for IdentifierResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierResolver")
            .field("lookup", &self.lookup.name())
            .field("probe", &self.probe.name())
            .finish()
    }
}

impl IdentifierResolver {
    /// Creates a resolver from a lookup source and a registry probe.
    #[must_use]
    pub fn new(lookup: Arc<dyn IdentifierLookup>, probe: Arc<dyn RegistryProbe>) -> Self {
        Self { lookup, probe }
    }

    /// Resolves a ticker to its registry identifier.
    ///
    /// # Errors
    /// See [`IdentifierResolver::resolve_entity`].
    pub async fn resolve(&self, ticker: &Ticker) -> Result<RegistryId, ResolutionError> {
        self.resolve_entity(ticker).await.map(|e| e.registry_id)
    }

    /// Resolves a ticker to its registry identifier together with the
    /// classification found by the lookup.
    ///
    /// # Errors
    /// - [`ResolutionError::NotFound`] when the lookup has no candidate or the
    ///   registry does not know it
    /// - [`ResolutionError::InvalidFormat`] when the candidate is not ten digits
    /// - [`ResolutionError::Unreachable`] on network failure
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn resolve_entity(&self, ticker: &Ticker) -> Result<ResolvedEntity, ResolutionError> {
        if ticker.is_empty() {
            return Err(ResolutionError::NotFound(String::new()));
        }

        let record = self.lookup.lookup(ticker).await?;
        let candidate = record
            .candidate_id
            .ok_or_else(|| ResolutionError::NotFound(ticker.to_string()))?;

        let registry_id = RegistryId::parse(&candidate)?;
        self.probe.probe(&registry_id).await?;

        debug!(cik = %registry_id, "Resolved registry identifier");
        Ok(ResolvedEntity {
            ticker: ticker.clone(),
            registry_id,
            sic: record.sic,
            activity: record.activity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use corpus_core::{DataProvider, LookupRecord, SicCode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FixedLookup(Result<LookupRecord, ResolutionError>);

    impl DataProvider for FixedLookup {
        fn name(&self) -> &str {
            "fixed lookup"
        }

        fn description(&self) -> &str {
            "returns a canned lookup record"
        }
    }

    #[async_trait]
    impl IdentifierLookup for FixedLookup {
        async fn lookup(&self, _ticker: &Ticker) -> Result<LookupRecord, ResolutionError> {
            self.0.clone()
        }
    }

    #[derive(Debug, Default)]
    struct CountingProbe {
        calls: AtomicUsize,
        missing: bool,
    }

    impl DataProvider for CountingProbe {
        fn name(&self) -> &str {
            "counting probe"
        }

        fn description(&self) -> &str {
            "counts probe calls"
        }
    }

    #[async_trait]
    impl RegistryProbe for CountingProbe {
        async fn probe(&self, id: &RegistryId) -> Result<(), ResolutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.missing {
                Err(ResolutionError::NotFound(id.to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn record(candidate: Option<&str>) -> LookupRecord {
        LookupRecord {
            candidate_id: candidate.map(str::to_string),
            sic: SicCode::parse("2834"),
            activity: Some("PHARMACEUTICAL PREPARATIONS".to_string()),
        }
    }

    fn resolver(
        lookup: Result<LookupRecord, ResolutionError>,
        probe: Arc<CountingProbe>,
    ) -> IdentifierResolver {
        IdentifierResolver::new(Arc::new(FixedLookup(lookup)), probe)
    }

    #[tokio::test]
    async fn test_resolve_valid_candidate() {
        let probe = Arc::new(CountingProbe::default());
        let resolver = resolver(Ok(record(Some("0000078003"))), probe.clone());

        let entity = resolver.resolve_entity(&Ticker::new("pfe")).await.unwrap();
        assert_eq!(entity.registry_id.as_str(), "0000078003");
        assert_eq!(entity.ticker.as_str(), "PFE");
        assert_eq!(entity.sic, SicCode::parse("2834"));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);

        let id = resolver.resolve(&Ticker::new("PFE")).await.unwrap();
        assert_eq!(id.as_str(), "0000078003");
    }

    #[tokio::test]
    async fn test_malformed_candidate_is_never_probed() {
        for candidate in ["78003", "00000780031", "00000780X3", ""] {
            let probe = Arc::new(CountingProbe::default());
            let resolver = resolver(Ok(record(Some(candidate))), probe.clone());

            let result = resolver.resolve(&Ticker::new("PFE")).await;
            assert!(
                matches!(result, Err(ResolutionError::InvalidFormat(_))),
                "{candidate:?} gave {result:?}"
            );
            assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_missing_candidate_is_not_found() {
        let probe = Arc::new(CountingProbe::default());
        let resolver = resolver(Ok(record(None)), probe.clone());
        assert_eq!(
            resolver.resolve(&Ticker::new("ZZZZ")).await,
            Err(ResolutionError::NotFound("ZZZZ".to_string()))
        );
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_probe_rejection_is_not_found() {
        let probe = Arc::new(CountingProbe {
            missing: true,
            ..Default::default()
        });
        let resolver = resolver(Ok(record(Some("0000078003"))), probe);
        assert!(matches!(
            resolver.resolve(&Ticker::new("PFE")).await,
            Err(ResolutionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_errors_propagate() {
        let probe = Arc::new(CountingProbe::default());
        let resolver = resolver(
            Err(ResolutionError::Unreachable("connection reset".to_string())),
            probe,
        );
        assert!(matches!(
            resolver.resolve(&Ticker::new("PFE")).await,
            Err(ResolutionError::Unreachable(_))
        ));
    }
}
