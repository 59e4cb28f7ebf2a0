//! File system archive implementation.

use async_trait::async_trait;
use chrono::Local;
use corpus_core::{CompanyFactSet, CorpusError, FactArchive, Result, Ticker, backup};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Extension of archived documents.
const EXTENSION: &str = "json";

/// Archive storing one JSON document per ticker.
///
/// Documents live at `{root}/{TICKER}.json`. When a backup directory is set,
/// a document about to be replaced is first copied to
/// `{backup_dir}/{TICKER}_{YYYYMMDD}.json`.
#[derive(Debug, Clone)]
pub struct FsArchive {
    root: PathBuf,
    backup_dir: Option<PathBuf>,
}

impl FsArchive {
    /// Create an archive rooted at the given directory.
    ///
    /// The directory is created on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            backup_dir: None,
        }
    }

    /// Keep dated copies of replaced documents in `dir`.
    #[must_use]
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(dir.into());
        self
    }

    /// Path of the document for a ticker.
    pub fn document_path(&self, ticker: &Ticker) -> PathBuf {
        self.root.join(format!("{}.{EXTENSION}", ticker.as_str()))
    }
}

fn archive_error(context: &str, path: &Path, err: impl std::fmt::Display) -> CorpusError {
    CorpusError::Archive(format!("{context} {}: {err}", path.display()))
}

#[async_trait]
impl FactArchive for FsArchive {
    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn load(&self, ticker: &Ticker) -> Result<Option<CompanyFactSet>> {
        let path = self.document_path(ticker);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Archive miss");
                return Ok(None);
            }
            Err(e) => return Err(archive_error("Failed to read", &path, e)),
        };

        let facts = serde_json::from_slice(&bytes)
            .map_err(|e| archive_error("Failed to parse", &path, e))?;
        debug!("Archive hit");
        Ok(Some(facts))
    }

    #[instrument(skip(self, facts), fields(ticker = %ticker))]
    async fn store(&self, ticker: &Ticker, facts: &CompanyFactSet) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| archive_error("Failed to create", &self.root, e))?;

        let path = self.document_path(ticker);
        if let Some(backup_dir) = &self.backup_dir
            && let Err(e) = backup::backup_existing(&path, backup_dir, Local::now().date_naive())
        {
            warn!("Could not back up {}: {}", path.display(), e);
        }

        let json = serde_json::to_vec_pretty(facts)
            .map_err(|e| archive_error("Failed to serialize", &path, e))?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| archive_error("Failed to write", &path, e))?;
        debug!("Archived {} concepts to {}", facts.concept_count(), path.display());
        Ok(())
    }

}
