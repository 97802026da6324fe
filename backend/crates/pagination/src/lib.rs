//! Offset pagination primitives shared by list endpoints.
//!
//! Query strings arrive as raw text, so [`PageRequest::parse`] accepts the
//! optional `skip` and `limit` values exactly as the client sent them and
//! turns them into a validated request or a [`PaginationError`] describing
//! which field was rejected.
//!
//! ```
//! use pagination::{PageRequest, DEFAULT_LIMIT};
//!
//! let page = PageRequest::parse(Some("10"), None).expect("valid page");
//! assert_eq!(page.skip(), 10);
//! assert_eq!(page.limit(), DEFAULT_LIMIT);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the client omits `limit`.
pub const DEFAULT_LIMIT: u32 = 5;

/// Largest page size any endpoint will serve.
pub const MAX_LIMIT: u32 = 5;

/// Validation failures raised while building a [`PageRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// A value was not an integer.
    #[error("{field} must be an integer, got {value:?}")]
    NotAnInteger {
        /// Name of the offending query parameter.
        field: &'static str,
        /// Raw value supplied by the client.
        value: String,
    },
    /// `skip` was negative.
    #[error("skip must not be negative, got {value}")]
    NegativeSkip {
        /// Rejected offset.
        value: i64,
    },
    /// `limit` fell outside `0..=max`.
    #[error("limit must be between 0 and {max}, got {value}")]
    LimitOutOfRange {
        /// Rejected page size.
        value: i64,
        /// Inclusive upper bound that was exceeded.
        max: u32,
    },
}

impl PaginationError {
    /// Name of the query parameter that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NotAnInteger { field, .. } => *field,
            Self::NegativeSkip { .. } => "skip",
            Self::LimitOutOfRange { .. } => "limit",
        }
    }

    /// Stable machine-readable code for error envelopes.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotAnInteger { .. } => "not_an_integer",
            Self::NegativeSkip { .. } => "negative_skip",
            Self::LimitOutOfRange { .. } => "limit_out_of_range",
        }
    }
}

/// Validated offset page: skip `skip` rows, then return at most `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    skip: u64,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a page from already-parsed integers.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::NegativeSkip`] when `skip < 0` and
    /// [`PaginationError::LimitOutOfRange`] when `limit` is negative or larger
    /// than [`MAX_LIMIT`].
    pub fn new(skip: i64, limit: i64) -> Result<Self, PaginationError> {
        let checked_skip =
            u64::try_from(skip).map_err(|_| PaginationError::NegativeSkip { value: skip })?;
        let checked_limit = u32::try_from(limit)
            .ok()
            .filter(|candidate| *candidate <= MAX_LIMIT)
            .ok_or(PaginationError::LimitOutOfRange {
                value: limit,
                max: MAX_LIMIT,
            })?;
        Ok(Self {
            skip: checked_skip,
            limit: checked_limit,
        })
    }

    /// Parse raw query-string values, applying defaults for missing ones.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::NotAnInteger`] for non-numeric input and the
    /// range errors documented on [`PageRequest::new`].
    pub fn parse(skip: Option<&str>, limit: Option<&str>) -> Result<Self, PaginationError> {
        let raw_skip = parse_integer("skip", skip)?.unwrap_or(0);
        let raw_limit = parse_integer("limit", limit)?.unwrap_or(i64::from(DEFAULT_LIMIT));
        Self::new(raw_skip, raw_limit)
    }

    /// Number of rows to skip.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.skip
    }

    /// Maximum number of rows to return.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Offset as the signed integer SQL `OFFSET` clauses expect.
    #[must_use]
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.skip).unwrap_or(i64::MAX)
    }

    /// Page size as the signed integer SQL `LIMIT` clauses expect.
    #[must_use]
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

fn parse_integer(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, PaginationError> {
    raw.map(str::trim)
        .map(|value| {
            value
                .parse::<i64>()
                .map_err(|_| PaginationError::NotAnInteger {
                    field,
                    value: value.to_owned(),
                })
        })
        .transpose()
}
