//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! the snapshot port and the pure analysis/rendering stages.

use std::sync::Arc;

use crate::charts::{ChartStyle, Visualizer};
use crate::domain::Analyzer;
use crate::domain::ports::SnapshotRepository;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub snapshots: Arc<dyn SnapshotRepository>,
    pub analyzer: Analyzer,
    pub visualizer: Visualizer,
}

impl HttpState {
    /// Build state around a repository and an explicit chart style.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use wiki_history::charts::ChartStyle;
    /// use wiki_history::domain::ports::FixtureSnapshotRepository;
    /// use wiki_history::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixtureSnapshotRepository::default()), ChartStyle::default());
    /// let _analyzer = state.analyzer.clone();
    /// ```
    pub fn new(snapshots: Arc<dyn SnapshotRepository>, style: ChartStyle) -> Self {
        Self {
            analyzer: Analyzer::new(Arc::clone(&snapshots)),
            visualizer: Visualizer::new(style),
            snapshots,
        }
    }

    /// Reuse an existing visualizer so font discovery happens once.
    pub fn with_visualizer(snapshots: Arc<dyn SnapshotRepository>, visualizer: Visualizer) -> Self {
        Self {
            analyzer: Analyzer::new(Arc::clone(&snapshots)),
            visualizer,
            snapshots,
        }
    }
}
