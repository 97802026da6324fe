//! HTTP inbound adapter exposing the read-only REST endpoints.

pub mod docs;
pub mod error;
pub mod health;
pub mod history;
pub mod plots;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
