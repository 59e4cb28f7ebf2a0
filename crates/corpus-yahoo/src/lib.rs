#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/corpus/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance profile provider.
//!
//! This crate provides a Yahoo Finance provider that implements the
//! [`DataProvider`] and [`ProfileProvider`] traits from `corpus-core`.
//!
//! # Example
//!
//! ```no_run
//! use corpus_yahoo::YahooProvider;
//! use corpus_core::{ProfileProvider, Ticker};
//!
//! # async fn example() -> Result<(), corpus_core::FetchError> {
//! let provider = YahooProvider::new();
//! let profile = provider.profile(&Ticker::new("AAPL")).await?;
//! println!("{} / {}", profile.sector, profile.industry);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use corpus_core::{
    CompanyProfile, DataProvider, FetchError, FixedDelay, NOT_AVAILABLE, ProfileProvider,
    Throttle, Ticker,
};
use serde::Deserialize;
use tracing::{debug, instrument};

/// Yahoo Finance quote summary API base URL.
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// Default delay between requests.
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(1000);

/// User agent for HTTP requests.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Yahoo Finance data provider.
///
/// Implements [`DataProvider`] and [`ProfileProvider`].
#[derive(Debug)]
pub struct YahooProvider {
    client: reqwest::Client,
    throttle: Arc<dyn Throttle>,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider with default settings.
    ///
    /// Uses built-in rate limiting of 1 request per second.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self::with_client(client)
    }

    /// Create a new Yahoo Finance provider with a custom HTTP client.
    ///
    /// Rate limiting is still applied.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            throttle: Arc::new(FixedDelay::new(DEFAULT_RATE_LIMIT)),
        }
    }

    /// Replaces the request throttle.
    #[must_use]
    pub fn with_throttle(mut self, throttle: Arc<dyn Throttle>) -> Self {
        self.throttle = throttle;
        self
    }

    /// Fetch the asset profile module for a ticker.
    async fn fetch_quote_summary(&self, ticker: &Ticker) -> Result<QuoteSummaryResponse, FetchError> {
        self.throttle.wait().await;

        let url = format!("{QUOTE_SUMMARY_URL}/{ticker}?modules=assetProfile");
        debug!("Fetching quote summary: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Unreachable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::Unreachable(format!(
                "Rate limited while fetching profile for {ticker}"
            )));
        }

        if !response.status().is_success() {
            return Err(FetchError::Unreachable(format!(
                "HTTP {} for {}",
                response.status(),
                ticker
            )));
        }

        response
            .json::<QuoteSummaryResponse>()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn description(&self) -> &str {
        "Yahoo Finance provider for company sector and industry"
    }
}

#[async_trait]
impl ProfileProvider for YahooProvider {
    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn profile(&self, ticker: &Ticker) -> Result<CompanyProfile, FetchError> {
        let summary = self.fetch_quote_summary(ticker).await?;
        profile_from_summary(ticker, summary)
    }
}

/// Reads sector and industry from a quote summary, using `N/A` for blanks.
fn profile_from_summary(
    ticker: &Ticker,
    summary: QuoteSummaryResponse,
) -> Result<CompanyProfile, FetchError> {
    let result = summary
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::InvalidResponse(format!("No quote summary for {ticker}")))?;

    let profile = result.asset_profile.unwrap_or_default();
    let field = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    Ok(CompanyProfile::new(
        field(profile.sector),
        field(profile.industry),
    ))
}

// ============================================================================
// Yahoo Finance API Response Types
// ============================================================================

/// Quote Summary API response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryResult,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    result: Option<Vec<QuoteSummaryData>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryData {
    asset_profile: Option<AssetProfile>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
    industry: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(json: &str) -> QuoteSummaryResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_profile_from_summary() {
        let response = summary(
            r#"{"quoteSummary": {"result": [{"assetProfile": {
                "sector": "Technology",
                "industry": "Consumer Electronics",
                "country": "United States"
            }}], "error": null}}"#,
        );
        let profile = profile_from_summary(&Ticker::new("AAPL"), response).unwrap();
        assert_eq!(profile, CompanyProfile::new("Technology", "Consumer Electronics"));
    }

    #[test]
    fn test_missing_fields_are_not_available() {
        let response = summary(
            r#"{"quoteSummary": {"result": [{"assetProfile": {"sector": "  "}}]}}"#,
        );
        let profile = profile_from_summary(&Ticker::new("XYZ"), response).unwrap();
        assert_eq!(profile, CompanyProfile::unavailable());
    }

    #[test]
    fn test_empty_result_is_invalid() {
        let response = summary(
            r#"{"quoteSummary": {"result": null, "error": {"code": "Not Found"}}}"#,
        );
        assert!(matches!(
            profile_from_summary(&Ticker::new("NOPE"), response),
            Err(FetchError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_provider_info() {
        let provider = YahooProvider::default();
        assert_eq!(provider.name(), "Yahoo Finance");
        assert!(!provider.description().is_empty());
    }
}
