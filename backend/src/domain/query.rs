//! Listing query: title filter, sort selection and page window.

use std::str::FromStr;

use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Column a listing may be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Record identifier.
    #[default]
    Id,
    /// Observation time.
    Timestamp,
    /// Total views counter.
    TotalViews,
    /// Average daily views counter.
    AverageDailyViews,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// Raised when a sort key or order is not one of the enumerated values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be one of {allowed}, got {value:?}")]
pub struct UnknownSortValue {
    /// Query parameter name.
    pub field: &'static str,
    /// Rejected raw value.
    pub value: String,
    /// Comma-separated list of accepted values.
    pub allowed: &'static str,
}

impl SortKey {
    /// Every accepted key, in documentation order.
    pub const ALL: [Self; 4] = [
        Self::Id,
        Self::Timestamp,
        Self::TotalViews,
        Self::AverageDailyViews,
    ];

    /// Wire name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Timestamp => "timestamp",
            Self::TotalViews => "total_views",
            Self::AverageDailyViews => "average_daily_views",
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSortValue {
                field: "sort_by",
                value: s.to_owned(),
                allowed: "id, timestamp, total_views, average_daily_views",
            })
    }
}

impl SortOrder {
    /// Wire name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = UnknownSortValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(UnknownSortValue {
                field: "order",
                value: other.to_owned(),
                allowed: "asc, desc",
            }),
        }
    }
}

/// Validated listing query handed to the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotQuery {
    /// Optional substring match on the title, ASCII case-insensitive.
    pub title: Option<String>,
    /// Column to order by.
    pub sort_by: SortKey,
    /// Direction of the ordering.
    pub order: SortOrder,
    /// Offset window.
    pub page: PageRequest,
}

impl SnapshotQuery {
    /// Query with the given page and default ordering.
    #[must_use]
    pub fn with_page(page: PageRequest) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Set the title filter, treating blank text as no filter.
    #[must_use]
    pub fn title_contains(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|value| !value.is_empty());
        self
    }

    /// Set the ordering.
    #[must_use]
    pub fn sorted(mut self, sort_by: SortKey, order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.order = order;
        self
    }
}
