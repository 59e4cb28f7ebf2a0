//! Core data types for company facts.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Ticker`] - Trading symbol identifying a company in the index
//! - [`RegistryId`] - Validated ten-digit registry identifier (CIK)
//! - [`SicCode`] - Four-digit standard industrial classification code
//! - [`RawFact`] - One reported data point for a taxonomy concept
//! - [`CompanyFactSet`] - All raw facts for one company, grouped by namespace, concept and unit
//! - [`YearValue`] - Resolved value of one concept for one fiscal year
//! - [`CompanyProfile`] - Sector and industry of a company
//! - [`ResolvedEntity`] - Registry identifier plus the classification scraped with it
//! - [`CompanyDescriptor`] - Descriptive columns attached to every table row

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ResolutionError;
use crate::period::{FiscalPeriod, Frame, Unit};

/// Placeholder written for descriptive values that could not be obtained.
pub const NOT_AVAILABLE: &str = "N/A";

/// A trading symbol/ticker.
///
/// Tickers are trimmed and uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Creates a new ticker from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the ticker is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ticker {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Registry identifier (CIK) of a filing entity.
///
/// Always exactly ten ASCII digits; construct with [`RegistryId::parse`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistryId(String);

impl RegistryId {
    /// Number of digits in a registry identifier.
    pub const LEN: usize = 10;

    /// Validates a candidate identifier.
    ///
    /// # Errors
    /// Returns [`ResolutionError::InvalidFormat`] unless the candidate is exactly
    /// ten ASCII digits.
    pub fn parse(candidate: &str) -> Result<Self, ResolutionError> {
        if candidate.len() == Self::LEN && candidate.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(candidate.to_string()))
        } else {
            Err(ResolutionError::InvalidFormat(candidate.to_string()))
        }
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RegistryId {
    type Error = ResolutionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegistryId> for String {
    fn from(id: RegistryId) -> Self {
        id.0
    }
}

/// Four-digit standard industrial classification code.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SicCode(String);

impl SicCode {
    /// Validates a candidate code, returning `None` unless it is exactly four digits.
    #[must_use]
    pub fn parse(candidate: &str) -> Option<Self> {
        let candidate = candidate.trim();
        (candidate.len() == 4 && candidate.bytes().all(|b| b.is_ascii_digit()))
            .then(|| Self(candidate.to_string()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One reported data point for a taxonomy concept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawFact {
    /// Reported value, as received.
    pub value: f64,
    /// Fiscal year of the filing that reported the fact.
    pub fiscal_year: Option<i32>,
    /// Fiscal period of the filing.
    pub fiscal_period: Option<FiscalPeriod>,
    /// Form type of the filing (e.g. "10-K").
    pub form: String,
    /// Date the filing was submitted.
    pub filed: Option<NaiveDate>,
    /// Calendar-period label (e.g. "CY2014", "CY2013Q4I").
    pub frame: Option<String>,
    /// Unit the value is expressed in.
    pub unit: Unit,
}

impl RawFact {
    /// Creates a fact with the required fields.
    #[must_use]
    pub fn new(value: f64, form: impl Into<String>, unit: Unit) -> Self {
        Self {
            value,
            fiscal_year: None,
            fiscal_period: None,
            form: form.into(),
            filed: None,
            frame: None,
            unit,
        }
    }

    /// Sets the frame label.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.frame = Some(frame.into());
        self
    }

    /// Sets the filing date.
    #[must_use]
    pub const fn with_filed(mut self, filed: NaiveDate) -> Self {
        self.filed = Some(filed);
        self
    }

    /// Parses the frame label, if any.
    #[must_use]
    pub fn parsed_frame(&self) -> Option<Frame> {
        self.frame.as_deref().map(Frame::parse)
    }
}

/// Facts of one concept, keyed by unit key.
type UnitFacts = HashMap<String, Vec<RawFact>>;

/// All raw facts reported by one company.
///
/// Facts are grouped namespace → concept → unit key → facts, mirroring the
/// registry's company-facts graph. Fact order inside each array is preserved.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyFactSet {
    /// Entity name reported by the registry.
    pub entity_name: Option<String>,
    facts: HashMap<String, HashMap<String, UnitFacts>>,
}

impl CompanyFactSet {
    /// Creates an empty fact set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entity name.
    #[must_use]
    pub fn with_entity_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    /// Appends facts for a concept under a unit key.
    pub fn insert(
        &mut self,
        namespace: impl Into<String>,
        concept: impl Into<String>,
        unit_key: impl Into<String>,
        facts: impl IntoIterator<Item = RawFact>,
    ) {
        self.facts
            .entry(namespace.into())
            .or_default()
            .entry(concept.into())
            .or_default()
            .entry(unit_key.into())
            .or_default()
            .extend(facts);
    }

    /// Returns the facts for a concept under a unit key.
    #[must_use]
    pub fn facts(&self, namespace: &str, concept: &str, unit_key: &str) -> Option<&[RawFact]> {
        self.facts
            .get(namespace)?
            .get(concept)?
            .get(unit_key)
            .map(Vec::as_slice)
    }

    /// Returns true if the namespace is present.
    #[must_use]
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.facts.contains_key(namespace)
    }

    /// Number of concepts across all namespaces.
    #[must_use]
    pub fn concept_count(&self) -> usize {
        self.facts.values().map(HashMap::len).sum()
    }
}

/// Resolved value of one concept for one fiscal year.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Resolved value; zero when nothing was reported.
    pub value: f64,
}

impl YearValue {
    /// Creates a new year value.
    #[must_use]
    pub const fn new(fiscal_year: i32, value: f64) -> Self {
        Self { fiscal_year, value }
    }

    /// Zero placeholder for a year with no reported value.
    #[must_use]
    pub const fn placeholder(fiscal_year: i32) -> Self {
        Self::new(fiscal_year, 0.0)
    }
}

/// Sector and industry classification from the profile source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Business sector.
    pub sector: String,
    /// Industry within the sector.
    pub industry: String,
}

impl CompanyProfile {
    /// Creates a new profile.
    #[must_use]
    pub fn new(sector: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            sector: sector.into(),
            industry: industry.into(),
        }
    }

    /// Profile used when the source could not be reached.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(NOT_AVAILABLE, NOT_AVAILABLE)
    }
}

/// Raw result of an identifier lookup, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupRecord {
    /// Candidate registry identifier, unvalidated.
    pub candidate_id: Option<String>,
    /// Industrial classification code, if one was found and is well formed.
    pub sic: Option<SicCode>,
    /// Free-text activity description attached to the classification.
    pub activity: Option<String>,
}

/// A ticker resolved to a validated registry identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedEntity {
    /// Ticker that was resolved.
    pub ticker: Ticker,
    /// Validated registry identifier.
    pub registry_id: RegistryId,
    /// Industrial classification code.
    pub sic: Option<SicCode>,
    /// Activity description.
    pub activity: Option<String>,
}

/// Descriptive columns attached to every row of a company table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDescriptor {
    /// Company ticker.
    pub ticker: Ticker,
    /// Business sector.
    pub sector: String,
    /// Industry within the sector.
    pub industry: String,
    /// Registry identifier.
    pub registry_id: RegistryId,
    /// Industrial classification code, `N/A` when unknown.
    pub sic: String,
    /// Activity description, `N/A` when unknown.
    pub activity: String,
}

impl CompanyDescriptor {
    /// Combines a resolved entity with its profile.
    #[must_use]
    pub fn new(entity: &ResolvedEntity, profile: &CompanyProfile) -> Self {
        Self {
            ticker: entity.ticker.clone(),
            sector: profile.sector.clone(),
            industry: profile.industry.clone(),
            registry_id: entity.registry_id.clone(),
            sic: entity
                .sic
                .as_ref()
                .map_or_else(|| NOT_AVAILABLE.to_string(), ToString::to_string),
            activity: entity
                .activity
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_normalization() {
        assert_eq!(Ticker::new(" aapl ").as_str(), "AAPL");
        assert!(Ticker::new("  ").is_empty());
    }

    #[test]
    fn test_registry_id_requires_ten_digits() {
        assert!(RegistryId::parse("0000320193").is_ok());
        assert_eq!(
            RegistryId::parse("320193"),
            Err(ResolutionError::InvalidFormat("320193".to_string()))
        );
        assert!(RegistryId::parse("00003201930").is_err());
        assert!(RegistryId::parse("000032019A").is_err());
        assert!(RegistryId::parse("").is_err());
    }

    #[test]
    fn test_sic_code_requires_four_digits() {
        assert_eq!(SicCode::parse("3571").map(|s| s.to_string()), Some("3571".into()));
        assert!(SicCode::parse("357").is_none());
        assert!(SicCode::parse("35A1").is_none());
    }

    #[test]
    fn test_fact_set_preserves_order() {
        let mut facts = CompanyFactSet::new();
        facts.insert(
            "us-gaap",
            "Revenues",
            "USD",
            vec![
                RawFact::new(1.0, "10-K", Unit::Currency),
                RawFact::new(2.0, "10-Q", Unit::Currency),
            ],
        );
        facts.insert(
            "us-gaap",
            "Revenues",
            "USD",
            vec![RawFact::new(3.0, "10-K", Unit::Currency)],
        );

        let values: Vec<f64> = facts
            .facts("us-gaap", "Revenues", "USD")
            .unwrap()
            .iter()
            .map(|f| f.value)
            .collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        assert!(facts.facts("us-gaap", "Revenues", "shares").is_none());
        assert!(facts.has_namespace("us-gaap"));
        assert_eq!(facts.concept_count(), 1);
    }

    #[test]
    fn test_descriptor_fills_missing_values() {
        let entity = ResolvedEntity {
            ticker: Ticker::new("abc"),
            registry_id: RegistryId::parse("0000000001").unwrap(),
            sic: None,
            activity: None,
        };
        let descriptor = CompanyDescriptor::new(&entity, &CompanyProfile::unavailable());
        assert_eq!(descriptor.sic, NOT_AVAILABLE);
        assert_eq!(descriptor.activity, NOT_AVAILABLE);
        assert_eq!(descriptor.sector, NOT_AVAILABLE);
    }
}
