//! Per-concept extraction of one value per fiscal year.
//!
//! The extractor pools the annual-filing facts of every synonym tag in a
//! [`ConceptSynonymGroup`], keeps those whose frame maps to the target year and
//! settles duplicates:
//!
//! - no candidate: a zero placeholder
//! - one candidate, or several with the same value: that value
//! - several differing values: the most recently filed one, earliest pooled on ties
//!
//! A fact without a filing date ranks below every dated fact.

use corpus_core::{
    CompanyFactSet, ConceptSynonymGroup, ExtractionConfig, ExtractionWarning, RawFact, YearValue,
};
use tracing::{debug, trace};

/// Extracted year series of one concept.
#[derive(Clone, Debug, PartialEq)]
pub struct ConceptSeries {
    /// Canonical key of the concept.
    pub canonical: String,
    /// One value per configured fiscal year, in year order.
    pub values: Vec<YearValue>,
    /// Conditions noticed while extracting.
    pub warnings: Vec<ExtractionWarning>,
}

impl ConceptSeries {
    /// Value for a fiscal year.
    #[must_use]
    pub fn value(&self, fiscal_year: i32) -> Option<f64> {
        self.values
            .iter()
            .find(|v| v.fiscal_year == fiscal_year)
            .map(|v| v.value)
    }
}

/// A pooled candidate together with the fiscal year its frame maps to.
struct Candidate<'a> {
    fact: &'a RawFact,
    fiscal_year: Option<i32>,
}

/// Resolves raw facts into one value per fiscal year.
#[derive(Clone, Debug, Default)]
pub struct FactExtractor {
    config: ExtractionConfig,
}

impl FactExtractor {
    /// Creates an extractor.
    #[must_use]
    pub const fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extraction settings.
    #[must_use]
    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extracts the year series of one concept.
    ///
    /// Every configured year gets a value; conflicts are settled within their
    /// own year.
    #[must_use]
    pub fn extract(&self, group: &ConceptSynonymGroup, facts: &CompanyFactSet) -> ConceptSeries {
        let concept = group.canonical().to_string();
        let mut warnings = Vec::new();
        let pool = self.pool(group, facts, &mut warnings);
        trace!(concept = %concept, candidates = pool.len(), "Pooled annual facts");

        let mut values = Vec::with_capacity(self.config.years.len());
        for year in self.config.years.years() {
            let matches: Vec<&RawFact> = pool
                .iter()
                .filter(|c| c.fiscal_year == Some(year))
                .map(|c| c.fact)
                .collect();

            let value = match matches.as_slice() {
                [] => {
                    warnings.push(ExtractionWarning::EmptyYear {
                        concept: concept.clone(),
                        fiscal_year: year,
                    });
                    values.push(YearValue::placeholder(year));
                    continue;
                }
                [only] => only.value,
                [first, rest @ ..] if rest.iter().all(|f| f.value == first.value) => first.value,
                _ => {
                    let chosen = latest_filed(&matches);
                    debug!(
                        concept = %concept,
                        fiscal_year = year,
                        candidates = matches.len(),
                        chosen,
                        "Resolved conflicting duplicates"
                    );
                    warnings.push(ExtractionWarning::ConflictingDuplicates {
                        concept: concept.clone(),
                        fiscal_year: year,
                        candidates: matches.len(),
                        chosen,
                    });
                    chosen
                }
            };
            values.push(YearValue::new(year, value));
        }

        ConceptSeries {
            canonical: concept,
            values,
            warnings,
        }
    }

    /// Collects the annual-filing facts of every tag, in group order then
    /// array order.
    fn pool<'a>(
        &self,
        group: &ConceptSynonymGroup,
        facts: &'a CompanyFactSet,
        warnings: &mut Vec<ExtractionWarning>,
    ) -> Vec<Candidate<'a>> {
        let unit_key = group.unit().key();
        let mut pool = Vec::new();
        for tag in group.tags() {
            let Some(reported) = facts.facts(&self.config.namespace, tag, unit_key) else {
                warnings.push(ExtractionWarning::MissingSynonym {
                    concept: group.canonical().to_string(),
                    tag: tag.clone(),
                    unit: unit_key.to_string(),
                });
                continue;
            };
            pool.extend(
                reported
                    .iter()
                    .filter(|f| f.form == self.config.annual_form)
                    .map(|fact| Candidate {
                        fact,
                        fiscal_year: fact.parsed_frame().and_then(|f| f.fiscal_year()),
                    }),
            );
        }
        pool
    }
}

/// Value of the most recently filed fact; the earliest pooled one wins ties.
///
/// `facts` must not be empty.
fn latest_filed(facts: &[&RawFact]) -> f64 {
    let mut best = facts[0];
    for &fact in &facts[1..] {
        // `None < Some(_)`, so undated facts never displace a dated one.
        if fact.filed > best.filed {
            best = fact;
        }
    }
    best.value
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use corpus_core::{Unit, YearRange};

    fn extractor(start: i32, end: i32) -> FactExtractor {
        FactExtractor::new(ExtractionConfig::new(YearRange::new(start, end).unwrap()))
    }

    fn annual(value: f64, frame: &str) -> RawFact {
        RawFact::new(value, "10-K", Unit::Currency).with_frame(frame)
    }

    fn filed(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn facts_for(tag: &str, unit: &str, facts: Vec<RawFact>) -> CompanyFactSet {
        let mut set = CompanyFactSet::new();
        set.insert("us-gaap", tag, unit, facts);
        set
    }

    fn revenues() -> ConceptSynonymGroup {
        ConceptSynonymGroup::currency(["Revenues", "SalesRevenueNet"]).unwrap()
    }

    fn assets() -> ConceptSynonymGroup {
        ConceptSynonymGroup::currency(["Assets"]).unwrap()
    }

    #[test]
    fn test_missing_year_is_zero() {
        let facts = facts_for("Revenues", "USD", vec![annual(1000.0, "CY2020")]);
        let series = extractor(2019, 2022).extract(&revenues(), &facts);

        assert_eq!(
            series.values,
            vec![
                YearValue::new(2019, 0.0),
                YearValue::new(2020, 1000.0),
                YearValue::new(2021, 0.0),
            ]
        );
        assert!(series.warnings.contains(&ExtractionWarning::EmptyYear {
            concept: "Revenues".to_string(),
            fiscal_year: 2019,
        }));
    }

    #[test]
    fn test_identical_duplicates_collapse() {
        let facts = facts_for(
            "Assets",
            "USD",
            vec![
                annual(750.0, "CY2018"),
                annual(750.0, "CY2018").with_filed(filed(2020, 2, 1)),
                annual(750.0, "CY2018"),
            ],
        );
        let series = extractor(2018, 2019).extract(&assets(), &facts);
        assert_eq!(series.values, vec![YearValue::new(2018, 750.0)]);
        assert!(series.warnings.is_empty());
    }

    #[test]
    fn test_conflict_keeps_latest_filing() {
        let facts = facts_for(
            "Assets",
            "USD",
            vec![
                annual(500.0, "CY2019").with_filed(filed(2020, 1, 10)),
                annual(520.0, "CY2019").with_filed(filed(2020, 3, 1)),
            ],
        );
        let series = extractor(2019, 2020).extract(&assets(), &facts);
        assert_eq!(series.value(2019), Some(520.0));
        assert!(matches!(
            series.warnings.as_slice(),
            [ExtractionWarning::ConflictingDuplicates {
                candidates: 2,
                chosen,
                ..
            }] if *chosen == 520.0
        ));
    }

    #[test]
    fn test_conflict_tie_keeps_pooling_order() {
        let facts = facts_for(
            "Revenues",
            "USD",
            vec![
                annual(10.0, "CY2019").with_filed(filed(2020, 3, 1)),
                annual(11.0, "CY2019").with_filed(filed(2020, 3, 1)),
                annual(9.0, "CY2019").with_filed(filed(2020, 1, 1)),
            ],
        );
        let series = extractor(2019, 2020).extract(&revenues(), &facts);
        assert_eq!(series.value(2019), Some(10.0));
    }

    #[test]
    fn test_undated_fact_ranks_below_dated() {
        let facts = facts_for(
            "Assets",
            "USD",
            vec![
                annual(2.0, "CY2019"),
                annual(1.0, "CY2019").with_filed(filed(2020, 3, 1)),
            ],
        );
        let series = extractor(2019, 2020).extract(&assets(), &facts);
        assert_eq!(series.value(2019), Some(1.0));
    }

    #[test]
    fn test_undated_conflict_stays_in_its_year() {
        let facts = facts_for(
            "Assets",
            "USD",
            vec![
                annual(100.0, "CY2019"),
                annual(7.0, "CY2020"),
                annual(8.0, "CY2020"),
                annual(300.0, "CY2021").with_filed(filed(2022, 2, 1)),
            ],
        );
        let series = extractor(2019, 2022).extract(&assets(), &facts);
        assert_eq!(
            series.values,
            vec![
                YearValue::new(2019, 100.0),
                YearValue::new(2020, 7.0),
                YearValue::new(2021, 300.0),
            ]
        );
        assert_eq!(
            series
                .warnings
                .iter()
                .filter(|w| matches!(w, ExtractionWarning::ConflictingDuplicates { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_instant_frame_counts_for_next_year() {
        let facts = facts_for("Assets", "USD", vec![annual(42.0, "CY2013Q4I")]);
        let series = extractor(2013, 2015).extract(&assets(), &facts);
        assert_eq!(series.value(2013), Some(0.0));
        assert_eq!(series.value(2014), Some(42.0));
    }

    #[test]
    fn test_quarterly_forms_and_frames_are_ignored() {
        let facts = facts_for(
            "Revenues",
            "USD",
            vec![
                RawFact::new(5.0, "10-Q", Unit::Currency).with_frame("CY2020"),
                annual(6.0, "CY2020Q3"),
                RawFact::new(7.0, "10-K/A", Unit::Currency).with_frame("CY2020"),
            ],
        );
        let series = extractor(2020, 2021).extract(&revenues(), &facts);
        assert_eq!(series.value(2020), Some(0.0));
    }

    #[test]
    fn test_synonyms_are_pooled() {
        let mut facts = facts_for("SalesRevenueNet", "USD", vec![annual(300.0, "CY2015")]);
        facts.insert("us-gaap", "Revenues", "USD", [annual(400.0, "CY2016")]);

        let series = extractor(2015, 2017).extract(&revenues(), &facts);
        assert_eq!(series.value(2015), Some(300.0));
        assert_eq!(series.value(2016), Some(400.0));
        assert!(!series.warnings.iter().any(|w| matches!(
            w,
            ExtractionWarning::MissingSynonym { .. }
        )));
    }

    #[test]
    fn test_missing_synonym_warns() {
        let facts = facts_for("Revenues", "USD", vec![annual(1.0, "CY2020")]);
        let series = extractor(2020, 2021).extract(&revenues(), &facts);
        assert_eq!(
            series.warnings,
            vec![ExtractionWarning::MissingSynonym {
                concept: "Revenues".to_string(),
                tag: "SalesRevenueNet".to_string(),
                unit: "USD".to_string(),
            }]
        );
    }

    #[test]
    fn test_unit_follows_group() {
        let eps = ConceptSynonymGroup::new(["EarningsPerShareDiluted"], Unit::PerShare).unwrap();
        let mut facts = facts_for(
            "EarningsPerShareDiluted",
            "USD/shares",
            vec![RawFact::new(3.28, "10-K", Unit::PerShare).with_frame("CY2020")],
        );
        facts.insert(
            "us-gaap",
            "EarningsPerShareDiluted",
            "USD",
            [annual(99.0, "CY2020")],
        );

        let series = extractor(2020, 2021).extract(&eps, &facts);
        assert_eq!(series.value(2020), Some(3.28));
    }

    #[test]
    fn test_other_namespace_is_ignored() {
        let mut facts = CompanyFactSet::new();
        facts.insert("ifrs-full", "Revenues", "USD", [annual(8.0, "CY2020")]);
        let series = extractor(2020, 2021).extract(&revenues(), &facts);
        assert_eq!(series.value(2020), Some(0.0));
    }
}
