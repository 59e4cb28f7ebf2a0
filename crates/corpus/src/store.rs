//! CSV storage for the company index and the training corpus.

use std::fs::File;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use corpus_core::{CorpusError, Result, Ticker, TrainingCorpus, backup};
use polars::prelude::*;
use tracing::{debug, info, instrument, warn};

/// Default company index file.
pub const DEFAULT_INDEX_PATH: &str = "data/00_COMPANIES_INDEX.csv";

/// Default corpus output file.
pub const DEFAULT_CORPUS_PATH: &str = "data/01_EDGAR_TRAINING_TABLE.csv";

/// Default directory for dated backups.
pub const DEFAULT_BACKUP_DIR: &str = "data/backup";

/// Locations of the files the corpus builder reads and writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// CSV with a header row and one ticker per row in the first column.
    pub index_path: PathBuf,
    /// CSV the corpus is written to.
    pub corpus_path: PathBuf,
    /// Directory receiving `{stem}_{YYYYMMDD}.{ext}` copies of replaced files.
    pub backup_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            index_path: DEFAULT_INDEX_PATH.into(),
            corpus_path: DEFAULT_CORPUS_PATH.into(),
            backup_dir: DEFAULT_BACKUP_DIR.into(),
        }
    }
}

/// Reads the company index and persists the corpus as CSV.
#[derive(Clone, Debug, Default)]
pub struct CorpusStore {
    config: StoreConfig,
}

impl CorpusStore {
    /// Creates a store.
    #[must_use]
    pub const fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// File locations.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Reads the tickers listed in the index, in file order.
    ///
    /// Blank cells are skipped.
    ///
    /// # Errors
    /// Returns [`CorpusError::Index`] if the file is missing, is not CSV or has
    /// no columns.
    #[instrument(skip(self), fields(path = %self.config.index_path.display()))]
    pub fn read_index(&self) -> Result<Vec<Ticker>> {
        let path = &self.config.index_path;
        if !path.is_file() {
            return Err(CorpusError::Index(format!(
                "{} does not exist",
                path.display()
            )));
        }

        let index_error = |e: PolarsError| CorpusError::Index(format!("{}: {e}", path.display()));
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.clone()))
            .map_err(index_error)?
            .finish()
            .map_err(index_error)?;

        let first = df
            .get_columns()
            .first()
            .ok_or_else(|| CorpusError::Index(format!("{} has no columns", path.display())))?;
        let tickers = first
            .as_materialized_series()
            .cast(&DataType::String)
            .map_err(index_error)?;

        let tickers: Vec<Ticker> = tickers
            .str()
            .map_err(index_error)?
            .into_iter()
            .flatten()
            .map(Ticker::new)
            .filter(|t| !t.is_empty())
            .collect();

        debug!("Read {} tickers", tickers.len());
        Ok(tickers)
    }

    /// Writes the corpus, backing up any previous copy under today's date.
    ///
    /// # Errors
    /// See [`CorpusStore::persist_on`].
    pub fn persist(&self, corpus: &TrainingCorpus) -> Result<()> {
        self.persist_on(corpus, Local::now().date_naive())
    }

    /// Writes the corpus, backing up any previous copy under `date`.
    ///
    /// A failed backup is logged and does not stop the write.
    ///
    /// # Errors
    /// Returns [`CorpusError::Storage`] if the corpus cannot be written.
    #[instrument(skip(self, corpus), fields(path = %self.config.corpus_path.display()))]
    pub fn persist_on(&self, corpus: &TrainingCorpus, date: NaiveDate) -> Result<()> {
        let path = &self.config.corpus_path;
        if let Err(e) = backup::backup_existing(path, &self.config.backup_dir, date) {
            warn!("Could not back up previous corpus: {}", e);
        }

        let storage_error =
            |e: &dyn std::fmt::Display| CorpusError::Storage(format!("{}: {e}", path.display()));

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| storage_error(&e))?;
        }

        let mut df = corpus.to_dataframe()?;
        let mut file = File::create(path).map_err(|e| storage_error(&e))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| storage_error(&e))?;

        info!(
            companies = corpus.company_count(),
            rows = corpus.row_count(),
            "Wrote training corpus"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_core::{
        CompanyDescriptor, CompanyFinancialTable, CompanyProfile, FinancialRow, RegistryId,
        ResolvedEntity,
    };
    use std::path::Path;

    fn store(dir: &Path) -> CorpusStore {
        CorpusStore::new(StoreConfig {
            index_path: dir.join("index.csv"),
            corpus_path: dir.join("out").join("corpus.csv"),
            backup_dir: dir.join("backup"),
        })
    }

    fn corpus(value: f64) -> TrainingCorpus {
        let entity = ResolvedEntity {
            ticker: Ticker::new("AAPL"),
            registry_id: RegistryId::parse("0000320193").unwrap(),
            sic: None,
            activity: Some("ELECTRONIC COMPUTERS".to_string()),
        };
        let table = CompanyFinancialTable::new(
            CompanyDescriptor::new(&entity, &CompanyProfile::new("Technology", "Hardware")),
            vec!["REVENUES".to_string()],
            vec![FinancialRow {
                fiscal_year: 2020,
                values: vec![value],
            }],
        )
        .unwrap();
        let mut corpus = TrainingCorpus::new(vec!["REVENUES".to_string()]);
        corpus.push(table).unwrap();
        corpus
    }

    #[test]
    fn test_read_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("index.csv"),
            "TICKER,NAME\naapl,Apple\nMSFT,Microsoft\n,Blank\nPFE,Pfizer\n",
        )
        .unwrap();

        let tickers = store(dir.path()).read_index().unwrap();
        assert_eq!(
            tickers,
            vec![Ticker::new("AAPL"), Ticker::new("MSFT"), Ticker::new("PFE")]
        );
    }

    #[test]
    fn test_missing_index_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            store(dir.path()).read_index(),
            Err(CorpusError::Index(_))
        ));
    }

    #[test]
    fn test_persist_writes_header_and_backs_up() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

        store.persist_on(&corpus(1.0), date).unwrap();
        assert!(!dir.path().join("backup").exists());

        let written = std::fs::read_to_string(&store.config().corpus_path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("FY,REVENUES,TICKER,SECTOR,INDUSTRY,CIK,SIC,ACTIVITY")
        );
        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(row[0], "2020");
        assert_eq!(row[1].parse::<f64>().unwrap(), 1.0);
        assert_eq!(
            &row[2..],
            ["AAPL", "Technology", "Hardware", "0000320193", "N/A", "ELECTRONIC COMPUTERS"]
        );

        store.persist_on(&corpus(2.0), date).unwrap();
        let backup = dir.path().join("backup").join("corpus_20240502.csv");
        assert_eq!(std::fs::read_to_string(backup).unwrap(), written);
    }
}
