//! Per-company tables and the training corpus.
//!
//! A [`CompanyFinancialTable`] holds one [`FinancialRow`] per fiscal year and one
//! value column per concept. The [`TrainingCorpus`] concatenates company tables
//! that share the same concept columns and converts them into a polars
//! [`DataFrame`] with the layout:
//!
//! `FY, <concept codes…>, TICKER, SECTOR, INDUSTRY, CIK, SIC, ACTIVITY`

use polars::prelude::*;

use crate::error::{CorpusError, Result};
use crate::types::CompanyDescriptor;

/// Name of the fiscal-year column.
pub const FISCAL_YEAR_COLUMN: &str = "FY";

/// Names of the descriptive columns, in output order.
pub const DESCRIPTOR_COLUMNS: [&str; 6] = ["TICKER", "SECTOR", "INDUSTRY", "CIK", "SIC", "ACTIVITY"];

/// Concept values for one fiscal year.
#[derive(Clone, Debug, PartialEq)]
pub struct FinancialRow {
    /// Fiscal year of the row.
    pub fiscal_year: i32,
    /// One value per concept column, in column order.
    pub values: Vec<f64>,
}

/// Wide table of one company: rows are fiscal years, columns are concepts.
#[derive(Clone, Debug, PartialEq)]
pub struct CompanyFinancialTable {
    descriptor: CompanyDescriptor,
    columns: Vec<String>,
    rows: Vec<FinancialRow>,
}

impl CompanyFinancialTable {
    /// Creates a table, checking that every row has one value per column.
    ///
    /// # Errors
    /// Returns [`CorpusError::Schema`] when a row has the wrong width.
    pub fn new(
        descriptor: CompanyDescriptor,
        columns: Vec<String>,
        rows: Vec<FinancialRow>,
    ) -> Result<Self> {
        if let Some(row) = rows.iter().find(|r| r.values.len() != columns.len()) {
            return Err(CorpusError::Schema(format!(
                "Row {} of {} has {} values for {} columns",
                row.fiscal_year,
                descriptor.ticker,
                row.values.len(),
                columns.len()
            )));
        }
        Ok(Self {
            descriptor,
            columns,
            rows,
        })
    }

    /// Descriptive columns of the company.
    #[must_use]
    pub const fn descriptor(&self) -> &CompanyDescriptor {
        &self.descriptor
    }

    /// Concept column names, in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in fiscal-year order.
    #[must_use]
    pub fn rows(&self) -> &[FinancialRow] {
        &self.rows
    }

    /// Fiscal years covered by the table.
    pub fn fiscal_years(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.iter().map(|r| r.fiscal_year)
    }

    /// Value of a concept column for a fiscal year.
    #[must_use]
    pub fn value(&self, fiscal_year: i32, column: &str) -> Option<f64> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|r| r.fiscal_year == fiscal_year)
            .map(|r| r.values[index])
    }

    /// Converts the table into a DataFrame.
    ///
    /// # Errors
    /// Returns [`CorpusError::Storage`] if polars rejects the columns.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        frame_from_tables(&self.columns, std::slice::from_ref(self))
    }
}

/// Concatenation of company tables sharing the same concept columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingCorpus {
    columns: Vec<String>,
    tables: Vec<CompanyFinancialTable>,
}

impl TrainingCorpus {
    /// Creates an empty corpus with the given concept columns.
    #[must_use]
    pub const fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            tables: Vec::new(),
        }
    }

    /// Appends a company table.
    ///
    /// # Errors
    /// Returns [`CorpusError::Schema`] if the table's columns differ from the
    /// corpus columns.
    pub fn push(&mut self, table: CompanyFinancialTable) -> Result<()> {
        if table.columns != self.columns {
            return Err(CorpusError::Schema(format!(
                "Table for {} has columns {:?}, expected {:?}",
                table.descriptor.ticker, table.columns, self.columns
            )));
        }
        self.tables.push(table);
        Ok(())
    }

    /// Concept column names, in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Company tables in insertion order.
    #[must_use]
    pub fn tables(&self) -> &[CompanyFinancialTable] {
        &self.tables
    }

    /// Number of companies in the corpus.
    #[must_use]
    pub fn company_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of company-year rows in the corpus.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|t| t.rows.len()).sum()
    }

    /// Returns true if no company was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Converts the corpus into a single DataFrame, companies in insertion order.
    ///
    /// # Errors
    /// Returns [`CorpusError::Storage`] if polars rejects the columns.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        frame_from_tables(&self.columns, &self.tables)
    }
}

fn frame_from_tables(columns: &[String], tables: &[CompanyFinancialTable]) -> Result<DataFrame> {
    let rows = || tables.iter().flat_map(|t| t.rows.iter().map(move |r| (t, r)));

    let mut frame_columns = Vec::with_capacity(columns.len() + DESCRIPTOR_COLUMNS.len() + 1);
    frame_columns.push(Column::new(
        FISCAL_YEAR_COLUMN.into(),
        rows().map(|(_, r)| r.fiscal_year).collect::<Vec<i32>>(),
    ));

    for (index, name) in columns.iter().enumerate() {
        frame_columns.push(Column::new(
            name.as_str().into(),
            rows().map(|(_, r)| r.values[index]).collect::<Vec<f64>>(),
        ));
    }

    let descriptor_fields: [fn(&CompanyDescriptor) -> &str; 6] = [
        |d| d.ticker.as_str(),
        |d| d.sector.as_str(),
        |d| d.industry.as_str(),
        |d| d.registry_id.as_str(),
        |d| d.sic.as_str(),
        |d| d.activity.as_str(),
    ];
    for (name, field) in DESCRIPTOR_COLUMNS.iter().zip(descriptor_fields) {
        frame_columns.push(Column::new(
            (*name).into(),
            rows()
                .map(|(t, _)| field(&t.descriptor))
                .collect::<Vec<&str>>(),
        ));
    }

    DataFrame::new(frame_columns).map_err(|e| CorpusError::Storage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompanyProfile, RegistryId, ResolvedEntity, SicCode, Ticker};

    fn descriptor(ticker: &str) -> CompanyDescriptor {
        let entity = ResolvedEntity {
            ticker: Ticker::new(ticker),
            registry_id: RegistryId::parse("0000320193").unwrap(),
            sic: SicCode::parse("3571"),
            activity: Some("ELECTRONIC COMPUTERS".to_string()),
        };
        CompanyDescriptor::new(&entity, &CompanyProfile::new("Technology", "Hardware"))
    }

    fn table(ticker: &str) -> CompanyFinancialTable {
        CompanyFinancialTable::new(
            descriptor(ticker),
            vec!["REVENUES".to_string(), "ASSETS".to_string()],
            vec![
                FinancialRow {
                    fiscal_year: 2019,
                    values: vec![10.0, 0.0],
                },
                FinancialRow {
                    fiscal_year: 2020,
                    values: vec![20.0, 5.0],
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_table_value_lookup() {
        let table = table("AAPL");
        assert_eq!(table.value(2020, "REVENUES"), Some(20.0));
        assert_eq!(table.value(2019, "ASSETS"), Some(0.0));
        assert_eq!(table.value(2021, "ASSETS"), None);
        assert_eq!(table.value(2020, "EPS"), None);
        assert_eq!(table.fiscal_years().collect::<Vec<_>>(), vec![2019, 2020]);
    }

    #[test]
    fn test_row_width_is_checked() {
        let result = CompanyFinancialTable::new(
            descriptor("AAPL"),
            vec!["REVENUES".to_string()],
            vec![FinancialRow {
                fiscal_year: 2020,
                values: vec![],
            }],
        );
        assert!(matches!(result, Err(CorpusError::Schema(_))));
    }

    #[test]
    fn test_corpus_rejects_mismatched_columns() {
        let mut corpus = TrainingCorpus::new(vec!["REVENUES".to_string()]);
        assert!(corpus.push(table("AAPL")).is_err());
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_corpus_dataframe_layout() {
        let mut corpus = TrainingCorpus::new(vec!["REVENUES".to_string(), "ASSETS".to_string()]);
        corpus.push(table("AAPL")).unwrap();
        corpus.push(table("MSFT")).unwrap();

        assert_eq!(corpus.company_count(), 2);
        assert_eq!(corpus.row_count(), 4);

        let df = corpus.to_dataframe().unwrap();
        assert_eq!(df.height(), 4);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "FY", "REVENUES", "ASSETS", "TICKER", "SECTOR", "INDUSTRY", "CIK", "SIC",
                "ACTIVITY"
            ]
        );

        let tickers: Vec<Option<&str>> = df
            .column("TICKER")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            tickers,
            vec![Some("AAPL"), Some("AAPL"), Some("MSFT"), Some("MSFT")]
        );
    }
}
