//! Joins per-concept year series into one table per company.

use std::collections::HashSet;

use corpus_core::{
    CompanyDescriptor, CompanyFactSet, CompanyFinancialTable, ConceptSynonymGroup,
    ExtractionConfig, ExtractionWarning, FinancialRow, Result, Taxonomy,
};
use tracing::{debug, info};

use crate::extractor::{ConceptSeries, FactExtractor};

/// Builds [`CompanyFinancialTable`]s by extracting every concept of a taxonomy.
#[derive(Clone, Debug, Default)]
pub struct RowAssembler {
    taxonomy: Taxonomy,
    extractor: FactExtractor,
}

impl RowAssembler {
    /// Creates an assembler for the given taxonomy and extraction settings.
    #[must_use]
    pub const fn new(taxonomy: Taxonomy, config: ExtractionConfig) -> Self {
        Self {
            taxonomy,
            extractor: FactExtractor::new(config),
        }
    }

    /// Taxonomy the columns are built from.
    #[must_use]
    pub const fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Extraction settings.
    #[must_use]
    pub const fn config(&self) -> &ExtractionConfig {
        self.extractor.config()
    }

    /// Concept groups that become columns; a repeated canonical key keeps its
    /// first group.
    pub fn concepts(&self) -> impl Iterator<Item = &ConceptSynonymGroup> {
        let mut seen = HashSet::new();
        self.taxonomy
            .groups()
            .iter()
            .filter(move |g| seen.insert(g.canonical()))
    }

    /// Output column names, in order.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.concepts()
            .map(|g| self.taxonomy.display_code(g.canonical()).to_string())
            .collect()
    }

    /// Builds the table of one company.
    ///
    /// The table always holds one row per configured fiscal year.
    ///
    /// # Errors
    /// Returns [`CorpusError::Schema`](corpus_core::CorpusError::Schema) if the
    /// rows cannot be assembled into a table.
    pub fn assemble(
        &self,
        facts: &CompanyFactSet,
        descriptor: CompanyDescriptor,
    ) -> Result<CompanyFinancialTable> {
        let config = self.extractor.config();
        let series: Vec<ConceptSeries> = self
            .concepts()
            .map(|group| {
                let series = self.extractor.extract(group, facts);
                report(&descriptor, &series.warnings);
                series
            })
            .collect();

        let rows = config
            .years
            .years()
            .enumerate()
            .map(|(index, fiscal_year)| FinancialRow {
                fiscal_year,
                values: series.iter().map(|s| s.values[index].value).collect(),
            })
            .collect();

        debug!(
            ticker = %descriptor.ticker,
            concepts = series.len(),
            years = config.years.len(),
            "Assembled company table"
        );
        CompanyFinancialTable::new(descriptor, self.columns(), rows)
    }
}

fn report(descriptor: &CompanyDescriptor, warnings: &[ExtractionWarning]) {
    for warning in warnings {
        match warning {
            ExtractionWarning::ConflictingDuplicates { .. } => {
                info!(ticker = %descriptor.ticker, "{}", warning);
            }
            ExtractionWarning::MissingSynonym { .. } | ExtractionWarning::EmptyYear { .. } => {
                debug!(ticker = %descriptor.ticker, "{}", warning);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use corpus_core::{
        CompanyProfile, RawFact, RegistryId, ResolvedEntity, SicCode, Ticker, Unit, YearRange,
    };
    use std::collections::BTreeMap;

    fn descriptor() -> CompanyDescriptor {
        let entity = ResolvedEntity {
            ticker: Ticker::new("ACME"),
            registry_id: RegistryId::parse("0000000042").unwrap(),
            sic: SicCode::parse("3571"),
            activity: None,
        };
        CompanyDescriptor::new(&entity, &CompanyProfile::unavailable())
    }

    fn assembler(start: i32, end: i32) -> RowAssembler {
        RowAssembler::new(
            Taxonomy::standard(),
            ExtractionConfig::new(YearRange::new(start, end).unwrap()),
        )
    }

    #[test]
    fn test_single_revenue_fact() {
        let mut facts = CompanyFactSet::new();
        facts.insert(
            "us-gaap",
            "Revenues",
            "USD",
            [RawFact::new(1000.0, "10-K", Unit::Currency).with_frame("CY2020")],
        );

        let table = assembler(2018, 2022).assemble(&facts, descriptor()).unwrap();
        assert_eq!(table.fiscal_years().collect::<Vec<_>>(), vec![2018, 2019, 2020, 2021]);
        assert_eq!(table.value(2020, "REVENUES"), Some(1000.0));
        for year in [2018, 2019, 2021] {
            assert_eq!(table.value(year, "REVENUES"), Some(0.0));
        }
        assert_eq!(table.descriptor().sector, "N/A");
        assert_eq!(table.descriptor().activity, "N/A");
        assert_eq!(table.descriptor().sic, "3571");
    }

    #[test]
    fn test_empty_facts_keep_every_year() {
        let assembler = assembler(2009, 2024);
        let table = assembler.assemble(&CompanyFactSet::new(), descriptor()).unwrap();
        assert_eq!(table.rows().len(), 15);
        assert!(table.rows().iter().all(|r| r.values.iter().all(|v| *v == 0.0)));
        assert_eq!(table.columns().len(), assembler.columns().len());
    }

    #[test]
    fn test_columns_use_display_codes() {
        let columns = assembler(2020, 2021).columns();
        assert_eq!(columns[0], "REVENUES");
        assert!(columns.contains(&"EPS".to_string()));
        assert!(columns.contains(&"IncomeTaxExpenseBenefit".to_string()));
        assert!(columns.contains(&"NetIncomeLoss".to_string()));
        assert!(!columns.contains(&"Revenues".to_string()));
    }

    #[test]
    fn test_duplicate_canonical_keys_keep_first() {
        let taxonomy = Taxonomy::new(
            vec![
                ConceptSynonymGroup::currency(["Revenues", "SalesRevenueNet"]).unwrap(),
                ConceptSynonymGroup::currency(["Assets"]).unwrap(),
                ConceptSynonymGroup::currency(["Revenues"]).unwrap(),
            ],
            BTreeMap::from([("Revenues".to_string(), "REVENUES".to_string())]),
        )
        .unwrap();
        let mut facts = CompanyFactSet::new();
        facts.insert(
            "us-gaap",
            "SalesRevenueNet",
            "USD",
            [RawFact::new(3.0, "10-K", Unit::Currency).with_frame("CY2020")],
        );

        let assembler = RowAssembler::new(
            taxonomy,
            ExtractionConfig::new(YearRange::new(2020, 2021).unwrap()),
        );
        assert_eq!(assembler.columns(), vec!["REVENUES", "Assets"]);

        let table = assembler.assemble(&facts, descriptor()).unwrap();
        assert_eq!(table.value(2020, "REVENUES"), Some(3.0));
    }

    #[test]
    fn test_undated_conflict_keeps_other_years_and_columns() {
        let mut facts = CompanyFactSet::new();
        facts.insert(
            "us-gaap",
            "Assets",
            "USD",
            [
                RawFact::new(100.0, "10-K", Unit::Currency).with_frame("CY2018Q4I"),
                RawFact::new(1.0, "10-K", Unit::Currency)
                    .with_frame("CY2019Q4I")
                    .with_filed(NaiveDate::from_ymd_opt(2020, 2, 1).unwrap()),
                RawFact::new(2.0, "10-K", Unit::Currency).with_frame("CY2019Q4I"),
            ],
        );
        facts.insert(
            "us-gaap",
            "Goodwill",
            "USD",
            [RawFact::new(7.0, "10-K", Unit::Currency).with_frame("CY2019Q4I")],
        );

        let table = assembler(2019, 2021).assemble(&facts, descriptor()).unwrap();
        assert_eq!(table.value(2019, "ASSETS"), Some(100.0));
        assert_eq!(table.value(2020, "ASSETS"), Some(1.0));
        assert_eq!(table.value(2020, "GOODWILL"), Some(7.0));
    }
}
