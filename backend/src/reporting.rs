//! Offline report generation.
//!
//! Loads every snapshot, prints the basic statistics and writes the content
//! and views charts to `{prefix}_1.png` and `{prefix}_2.png`. An empty store
//! produces no files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::charts::{ChartError, Visualizer};
use crate::domain::ports::{SnapshotRepository, SnapshotRepositoryError};
use crate::domain::{Analyzer, BasicStats};
use crate::outbound::persistence::{DbPool, DieselSnapshotRepository, PoolConfig, PoolError};

/// Default output prefix for chart files.
pub const DEFAULT_OUTPUT_PREFIX: &str = "web/static/plots";

/// Inputs for a report run.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub database_path: String,
    pub output_prefix: PathBuf,
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self {
            database_path: crate::outbound::persistence::DEFAULT_DATABASE_PATH.to_owned(),
            output_prefix: PathBuf::from(DEFAULT_OUTPUT_PREFIX),
        }
    }
}

/// What a report run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSummary {
    /// The store held no snapshots.
    Empty,
    /// Statistics were computed and charts written.
    Written {
        stats: BasicStats,
        files: Vec<PathBuf>,
    },
}

/// Errors surfaced by report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Repository(#[from] SnapshotRepositoryError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("report task failed: {message}")]
    Task { message: String },
}

/// Open the database named in `request` and generate the report.
///
/// # Errors
///
/// See [`generate_report`]; additionally fails with [`ReportError::Pool`]
/// when the pool cannot be built.
pub async fn run_report(
    request: &ReportRequest,
    visualizer: Visualizer,
) -> Result<ReportSummary, ReportError> {
    let pool = DbPool::new(PoolConfig::new(request.database_path.clone())).await?;
    let repository: Arc<dyn SnapshotRepository> = Arc::new(DieselSnapshotRepository::new(pool));
    generate_report(repository, visualizer, &request.output_prefix).await
}

/// Load, analyse and chart the store behind `repository`.
///
/// # Errors
///
/// Repository failures abort before any file is written. Chart failures
/// abort at the first figure that cannot be rendered or written.
pub async fn generate_report(
    repository: Arc<dyn SnapshotRepository>,
    visualizer: Visualizer,
    prefix: &Path,
) -> Result<ReportSummary, ReportError> {
    let analyzer = Analyzer::new(repository);
    let frame = analyzer.load().await?;
    let Some(stats) = analyzer.basic_stats(&frame) else {
        info!("store is empty; no charts written");
        return Ok(ReportSummary::Empty);
    };
    let daily = analyzer.daily_stats(&frame);
    let prefix = prefix.to_path_buf();

    let files = tokio::task::spawn_blocking(move || {
        let figures = vec![
            visualizer.plot_content_evolution(&frame),
            visualizer.plot_views(&daily),
        ];
        visualizer.save_plots(figures, &prefix)
    })
    .await
    .map_err(|err| ReportError::Task {
        message: err.to_string(),
    })??;

    info!(entries = stats.total_entries, files = files.len(), "report written");
    Ok(ReportSummary::Written { stats, files })
}
