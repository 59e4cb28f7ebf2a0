//! Extraction settings shared by the extractor and the assembler.

use crate::period::YearRange;

/// Taxonomy namespace the financial statement concepts live in.
pub const DEFAULT_NAMESPACE: &str = "us-gaap";

/// Form type of annual reports.
pub const ANNUAL_FORM: &str = "10-K";

/// Which facts are read and which fiscal years are produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Taxonomy namespace read from the fact graph.
    pub namespace: String,
    /// Form type accepted as an annual filing.
    pub annual_form: String,
    /// Fiscal years that become table rows.
    pub years: YearRange,
}

impl ExtractionConfig {
    /// Creates a config for the given years with the default namespace and form.
    #[must_use]
    pub fn new(years: YearRange) -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            annual_form: ANNUAL_FORM.to_string(),
            years,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new(YearRange::default())
    }
}
