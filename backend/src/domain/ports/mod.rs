//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod snapshot_repository;

#[cfg(test)]
pub use snapshot_repository::MockSnapshotRepository;
pub use snapshot_repository::{
    FixtureSnapshotRepository, SnapshotRepository, SnapshotRepositoryError,
};
