#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/corpus/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR provider for identifiers and company facts.
//!
//! This crate provides access to SEC EDGAR including:
//!
//! - CIK (Central Index Key), SIC code and activity lookup from ticker symbols
//! - CIK validation against the EDGAR archive
//! - Company facts from the XBRL API
//!
//! # Example
//!
//! ```no_run
//! use corpus_edgar::EdgarProvider;
//! use corpus_core::{FactProvider, IdentifierLookup, RegistryId, Ticker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = EdgarProvider::new("MyApp/1.0 (contact@example.com)");
//!
//!     let record = provider.lookup(&Ticker::new("AAPL")).await?;
//!     println!("CIK: {:?}, SIC: {:?}", record.candidate_id, record.sic);
//!
//!     let cik = RegistryId::parse("0000320193")?;
//!     let facts = provider.fetch_facts(&cik).await?;
//!     println!("{} concepts", facts.concept_count());
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use corpus_core::{
    CompanyFactSet, DEFAULT_NAMESPACE, DataProvider, FactProvider, FetchError, FiscalPeriod,
    FixedDelay, IdentifierLookup, LookupRecord, RawFact, RegistryId, RegistryProbe,
    ResolutionError, SicCode, Throttle, Ticker, Unit,
};
use reqwest::StatusCode;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// SEC EDGAR XBRL API base URL
const EDGAR_API_URL: &str = "https://data.sec.gov";

/// SEC EDGAR website base URL
const EDGAR_SITE_URL: &str = "https://www.sec.gov";

/// Markers EDGAR puts on the browse page for unknown tickers.
const UNKNOWN_TICKER_MARKERS: [&str; 2] = [
    "No matching Ticker Symbol",
    "The value you submitted is not valid",
];

static COMPANY_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.companyName").expect("valid selector"));
static IDENT_INFO: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.identInfo").expect("valid selector"));
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid selector"));

/// SEC EDGAR data provider.
///
/// Implements [`IdentifierLookup`], [`RegistryProbe`] and [`FactProvider`].
/// Every request waits on the provider's [`Throttle`]; share one throttle
/// between providers to space all outgoing requests.
#[derive(Debug)]
pub struct EdgarProvider {
    client: reqwest::Client,
    throttle: Arc<dyn Throttle>,
    user_agent: String,
}

impl EdgarProvider {
    /// Create a new EDGAR provider with the specified user agent.
    ///
    /// The SEC requires identifying user agent headers. Format should be:
    /// "AppName/Version (contact@email.com)"
    ///
    /// # Example
    /// ```
    /// use corpus_edgar::EdgarProvider;
    ///
    /// let provider = EdgarProvider::new("MyApp/1.0 (contact@example.com)");
    /// ```
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self::with_client(client, user_agent)
    }

    /// Create a new EDGAR provider with a custom HTTP client.
    pub fn with_client(client: reqwest::Client, user_agent: &str) -> Self {
        Self {
            client,
            throttle: Arc::new(FixedDelay::default()),
            user_agent: user_agent.to_string(),
        }
    }

    /// Replaces the request throttle.
    #[must_use]
    pub fn with_throttle(mut self, throttle: Arc<dyn Throttle>) -> Self {
        self.throttle = throttle;
        self
    }

    /// User agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    async fn get(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        self.throttle.wait().await;
        debug!("GET {}", url);
        self.client.get(url).send().await
    }
}

impl DataProvider for EdgarProvider {
    fn name(&self) -> &str {
        "SEC EDGAR"
    }

    fn description(&self) -> &str {
        "SEC EDGAR identifier lookup and XBRL company facts from annual and quarterly filings"
    }
}

#[async_trait]
impl IdentifierLookup for EdgarProvider {
    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn lookup(&self, ticker: &Ticker) -> Result<LookupRecord, ResolutionError> {
        let url = format!(
            "{EDGAR_SITE_URL}/cgi-bin/browse-edgar?CIK={ticker}&owner=exclude&action=getcompany&Find=Search"
        );

        let response = self
            .get(&url)
            .await
            .map_err(|e| ResolutionError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ResolutionError::Unreachable(format!(
                "Browse page for {ticker}: HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResolutionError::Unreachable(e.to_string()))?;

        if is_unknown_ticker(&body) {
            warn!("EDGAR does not know ticker {}", ticker);
            return Err(ResolutionError::NotFound(ticker.to_string()));
        }

        Ok(parse_browse_page(&body))
    }
}

#[async_trait]
impl RegistryProbe for EdgarProvider {
    #[instrument(skip(self), fields(cik = %id))]
    async fn probe(&self, id: &RegistryId) -> Result<(), ResolutionError> {
        let url = format!("{EDGAR_SITE_URL}/Archives/edgar/data/{id}/index.json");

        let response = self
            .get(&url)
            .await
            .map_err(|e| ResolutionError::Unreachable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(ResolutionError::NotFound(id.to_string())),
            status => Err(ResolutionError::Unreachable(format!(
                "Archive index for CIK {id}: HTTP {status}"
            ))),
        }
    }
}

#[async_trait]
impl FactProvider for EdgarProvider {
    #[instrument(skip(self), fields(cik = %id))]
    async fn fetch_facts(&self, id: &RegistryId) -> Result<CompanyFactSet, FetchError> {
        let url = format!("{EDGAR_API_URL}/api/xbrl/companyfacts/CIK{id}.json");

        let response = self
            .get(&url)
            .await
            .map_err(|e| FetchError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Err(FetchError::InvalidResponse(format!(
                "Company facts for CIK {id}: empty response"
            )));
        }
        if !status.is_success() {
            return Err(FetchError::Unreachable(format!(
                "Company facts for CIK {id}: HTTP {status}"
            )));
        }

        let facts: CompanyFactsResponse = response.json().await.map_err(|e| {
            FetchError::InvalidResponse(format!("Failed to parse company facts: {e}"))
        })?;

        convert_company_facts(facts)
    }
}

/// Returns true if the browse page reports an unknown ticker.
fn is_unknown_ticker(body: &str) -> bool {
    UNKNOWN_TICKER_MARKERS.iter().any(|m| body.contains(m))
}

/// Extracts the CIK, SIC code and activity from an EDGAR company browse page.
///
/// The CIK follows `CIK#:` in the company name header. The SIC code is the
/// first link of the identification block and the activity is the text after
/// it, with commas replaced by ` &`. Anything missing is left as `None`.
fn parse_browse_page(html: &str) -> LookupRecord {
    let document = Html::parse_document(html);

    let candidate_id = document.select(&COMPANY_NAME).next().and_then(|span| {
        let text = span.text().collect::<String>();
        text.split("CIK#:")
            .nth(1)
            .and_then(|rest| rest.split_whitespace().next())
            .map(str::to_string)
    });

    let sic_link = document
        .select(&IDENT_INFO)
        .next()
        .and_then(|info| info.select(&LINK).next());

    let sic = sic_link.and_then(|link| {
        let code = link.text().collect::<String>();
        let parsed = SicCode::parse(&code);
        if parsed.is_none() {
            debug!("Ignoring malformed SIC code {:?}", code);
        }
        parsed
    });

    let activity = sic_link
        .and_then(|link| link.next_sibling())
        .and_then(|node| node.value().as_text().map(|t| t.to_string()))
        .and_then(|text| {
            text.split("- ")
                .nth(1)
                .map(|a| a.trim().replace(',', " &"))
        })
        .filter(|a| !a.is_empty());

    LookupRecord {
        candidate_id,
        sic,
        activity,
    }
}

/// Converts the API response into a [`CompanyFactSet`].
///
/// Facts under unit keys other than currency, per-share and share counts are
/// dropped. Filing dates that do not parse are kept as `None`.
fn convert_company_facts(response: CompanyFactsResponse) -> Result<CompanyFactSet, FetchError> {
    if !response.facts.contains_key(DEFAULT_NAMESPACE) {
        return Err(FetchError::InvalidResponse(format!(
            "Company facts have no {DEFAULT_NAMESPACE} namespace"
        )));
    }

    let mut set = CompanyFactSet::new();
    if let Some(name) = response.entity_name {
        set = set.with_entity_name(name);
    }

    for (namespace, concepts) in response.facts {
        for (concept, tag_facts) in concepts {
            let Some(units) = tag_facts.units else {
                continue;
            };
            for (unit_key, values) in units {
                let Some(unit) = Unit::from_key(&unit_key) else {
                    continue;
                };
                let facts = values.into_iter().map(|v| v.into_raw_fact(unit));
                set.insert(namespace.as_str(), concept.as_str(), unit_key, facts);
            }
        }
    }

    debug!("Converted {} concepts", set.concept_count());
    Ok(set)
}

/// Response from the SEC EDGAR Company Facts API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyFactsResponse {
    /// Entity name
    #[serde(default)]
    entity_name: Option<String>,
    /// Facts organized by taxonomy and tag
    #[serde(default)]
    facts: HashMap<String, HashMap<String, TagFacts>>,
}

/// Facts for a specific XBRL tag.
#[derive(Debug, Deserialize)]
struct TagFacts {
    /// Units (USD, shares, etc.) containing the actual fact values
    #[serde(default)]
    units: Option<HashMap<String, Vec<FactValue>>>,
}

/// A single fact value with metadata.
#[derive(Debug, Clone, Deserialize)]
struct FactValue {
    /// Value
    val: f64,
    /// Fiscal year
    #[serde(default)]
    fy: Option<i32>,
    /// Fiscal period
    #[serde(default)]
    fp: Option<String>,
    /// Form type
    #[serde(default)]
    form: Option<String>,
    /// Filed date
    #[serde(default)]
    filed: Option<String>,
    /// Frame (instant or duration)
    #[serde(default)]
    frame: Option<String>,
}

impl FactValue {
    fn into_raw_fact(self, unit: Unit) -> RawFact {
        let mut fact = RawFact::new(self.val, self.form.unwrap_or_default(), unit);
        fact.fiscal_year = self.fy;
        fact.fiscal_period = self.fp.as_deref().and_then(FiscalPeriod::from_code);
        fact.filed = self
            .filed
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
        fact.frame = self.frame;
        fact
    }
}

// =============================================================================
// Tests
// =============================================================================
