//! Builds the fundamentals training corpus from a company index.
//!
//! ```text
//! build-corpus --index data/00_COMPANIES_INDEX.csv \
//!     --output data/01_EDGAR_TRAINING_TABLE.csv \
//!     --user-agent "MyApp/1.0 (contact@example.com)"
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use corpus::{
    CorpusBuilder, CorpusConfig, CorpusStore, EdgarProvider, ExtractionConfig, FixedDelay,
    FsArchive, StoreConfig, Throttle, YahooProvider, YearRange,
    store::{DEFAULT_BACKUP_DIR, DEFAULT_CORPUS_PATH, DEFAULT_INDEX_PATH},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Build a per-company, per-fiscal-year table of SEC EDGAR fundamentals.
#[derive(Debug, Parser)]
#[command(name = "build-corpus", version, about)]
struct Args {
    /// CSV listing one ticker per row in its first column.
    #[arg(long, default_value = DEFAULT_INDEX_PATH)]
    index: PathBuf,

    /// CSV the corpus is written to.
    #[arg(long, default_value = DEFAULT_CORPUS_PATH)]
    output: PathBuf,

    /// Directory for dated backups of replaced files.
    #[arg(long, default_value = DEFAULT_BACKUP_DIR)]
    backup_dir: PathBuf,

    /// Directory where downloaded company facts are archived.
    #[arg(long)]
    archive_dir: Option<PathBuf>,

    /// User agent sent to SEC EDGAR, e.g. "AppName/1.0 (contact@example.com)".
    #[arg(long, env = "EDGAR_USER_AGENT")]
    user_agent: String,

    /// First fiscal year of the corpus.
    #[arg(long, default_value_t = corpus::period::DEFAULT_START_YEAR)]
    start_year: i32,

    /// First fiscal year after the corpus; defaults to the current year.
    #[arg(long)]
    end_year: Option<i32>,

    /// Minimum delay between requests, in milliseconds.
    #[arg(long, default_value_t = corpus::throttle::DEFAULT_REQUEST_DELAY.as_millis() as u64)]
    delay_ms: u64,

    /// Read company facts from the archive before downloading them.
    #[arg(long, requires = "archive_dir")]
    reuse_archive: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let end_year = args
        .end_year
        .unwrap_or_else(|| YearRange::through_last_year().end());
    let years = match YearRange::new(args.start_year, end_year) {
        Ok(years) => years,
        Err(e) => {
            error!(error = %e, "Invalid year range");
            return ExitCode::FAILURE;
        }
    };

    let throttle: Arc<dyn Throttle> =
        Arc::new(FixedDelay::new(Duration::from_millis(args.delay_ms)));
    let edgar = Arc::new(EdgarProvider::new(&args.user_agent).with_throttle(throttle.clone()));
    let yahoo = Arc::new(YahooProvider::new().with_throttle(throttle));

    let config = CorpusConfig {
        extraction: ExtractionConfig::new(years),
        reuse_archived_facts: args.reuse_archive,
    };
    let mut builder = CorpusBuilder::from_provider(edgar, config).with_profiles(yahoo);
    if let Some(dir) = &args.archive_dir {
        let archive = FsArchive::new(dir).with_backup_dir(args.backup_dir.join("raw"));
        builder = builder.with_archive(Arc::new(archive));
    }

    let store = CorpusStore::new(StoreConfig {
        index_path: args.index,
        corpus_path: args.output,
        backup_dir: args.backup_dir,
    });

    info!(
        start = years.start(),
        end = years.end(),
        index = %store.config().index_path.display(),
        "Building training corpus"
    );
    let companies = builder.run(&store).await;
    println!("{companies} companies written to {}", store.config().corpus_path.display());

    if companies == 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
