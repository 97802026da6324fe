//! Test helpers for inbound HTTP components.

use std::sync::{Arc, OnceLock};

use actix_web::web;

use crate::charts::Visualizer;
use crate::domain::Snapshot;
use crate::domain::ports::{FixtureSnapshotRepository, SnapshotRepository};
use crate::domain::test_fixtures::snapshot_with;

use super::state::HttpState;

/// Visualizer shared across tests so system fonts are scanned once.
fn shared_visualizer() -> Visualizer {
    static VISUALIZER: OnceLock<Visualizer> = OnceLock::new();
    VISUALIZER.get_or_init(Visualizer::default).clone()
}

/// Wrap `repository` in handler state.
pub fn state_for(repository: Arc<dyn SnapshotRepository>) -> web::Data<HttpState> {
    web::Data::new(HttpState::with_visualizer(repository, shared_visualizer()))
}

/// Handler state over an in-memory set of snapshots.
pub fn state_with(snapshots: Vec<Snapshot>) -> web::Data<HttpState> {
    state_for(Arc::new(FixtureSnapshotRepository::new(snapshots)))
}

/// Three consecutive daily observations with views 100, 150 and 120.
pub fn three_days() -> Vec<Snapshot> {
    vec![
        snapshot_with(1, "2024-01-01T08:00:00", 1_000, 100, 3_000),
        snapshot_with(2, "2024-01-02T08:00:00", 1_100, 150, 3_200),
        snapshot_with(3, "2024-01-03T08:00:00", 1_050, 120, 3_100),
    ]
}
