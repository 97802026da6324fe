//! Load-normalise-aggregate stage of the reporting pipeline.
//!
//! [`Analyzer::load`] pulls every snapshot into a [`SnapshotFrame`]; the
//! remaining operations are pure functions of that frame.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Snapshot;
use super::ports::{SnapshotRepository, SnapshotRepositoryError};

/// Date format used for `last_update`.
pub const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d";

/// In-memory table of decoded snapshots in store order (ascending id).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotFrame {
    rows: Vec<Snapshot>,
}

impl SnapshotFrame {
    /// Wrap already-ordered rows.
    #[must_use]
    pub fn new(rows: Vec<Snapshot>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[Snapshot] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(timestamp, char_count)` pairs in row order.
    pub fn char_count_series(&self) -> impl Iterator<Item = (NaiveDateTime, i64)> + '_ {
        self.rows
            .iter()
            .map(|row| (row.timestamp(), row.char_count()))
    }
}

/// Headline figures over the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BasicStats {
    /// Number of snapshots.
    #[schema(example = 3)]
    pub total_entries: u64,
    /// Mean character count, truncated toward zero.
    #[schema(example = 84_120)]
    pub average_char_count: i64,
    /// Highest `total_views` observed. This is a maximum, not a sum.
    #[schema(example = 150)]
    pub total_views: i64,
    /// Latest snapshot date as `YYYY-MM-DD`.
    #[schema(example = "2024-01-03")]
    pub last_update: String,
}

/// Per-calendar-day summary. Gap days carry `None` values.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyAggregate {
    #[schema(value_type = String, example = "2024-01-02")]
    pub day: NaiveDate,
    /// Last observed character count that day.
    pub char_count: Option<i64>,
    /// Last observed total views that day.
    pub total_views: Option<i64>,
    /// Mean of the average-daily-views samples that day.
    pub average_daily_views: Option<f64>,
}

impl DailyAggregate {
    fn empty(day: NaiveDate) -> Self {
        Self {
            day,
            char_count: None,
            total_views: None,
            average_daily_views: None,
        }
    }
}

/// Chronological, gap-filled sequence of [`DailyAggregate`] values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct DailySeries {
    days: Vec<DailyAggregate>,
}

impl DailySeries {
    #[must_use]
    pub fn days(&self) -> &[DailyAggregate] {
        &self.days
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// First and last day covered.
    #[must_use]
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.days.first()?.day, self.days.last()?.day))
    }
}

#[derive(Default)]
struct DayAccumulator {
    char_count: Option<i64>,
    total_views: Option<i64>,
    average_sum: i64,
    samples: i64,
}

/// Loads snapshots and derives statistics from them.
#[derive(Clone)]
pub struct Analyzer {
    repository: Arc<dyn SnapshotRepository>,
}

impl Analyzer {
    /// Create an analyzer reading through `repository`.
    pub fn new(repository: Arc<dyn SnapshotRepository>) -> Self {
        Self { repository }
    }

    /// Read the whole store into a frame.
    ///
    /// # Errors
    ///
    /// Propagates repository failures, including decode errors. No row is
    /// skipped.
    pub async fn load(&self) -> Result<SnapshotFrame, SnapshotRepositoryError> {
        let rows = self.repository.load_all().await?;
        Ok(SnapshotFrame::new(rows))
    }

    /// Headline figures, or `None` for an empty frame.
    #[must_use]
    pub fn basic_stats(&self, frame: &SnapshotFrame) -> Option<BasicStats> {
        let rows = frame.rows();
        let last_update = rows.iter().map(Snapshot::timestamp).max()?;
        let total_views = rows.iter().map(Snapshot::total_views).max()?;
        let count = i64::try_from(rows.len()).ok()?;
        let char_total: i64 = rows.iter().map(Snapshot::char_count).sum();
        Some(BasicStats {
            total_entries: u64::try_from(rows.len()).ok()?,
            average_char_count: char_total.checked_div(count)?,
            total_views,
            last_update: last_update.format(LAST_UPDATE_FORMAT).to_string(),
        })
    }

    /// One aggregate per calendar day from the first to the last snapshot.
    #[must_use]
    pub fn daily_stats(&self, frame: &SnapshotFrame) -> DailySeries {
        let mut buckets: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
        for row in frame.rows() {
            let bucket = buckets.entry(row.timestamp().date()).or_default();
            bucket.char_count = Some(row.char_count());
            bucket.total_views = Some(row.total_views());
            bucket.average_sum += row.average_daily_views();
            bucket.samples += 1;
        }

        let (Some(first), Some(last)) = (
            buckets.keys().next().copied(),
            buckets.keys().next_back().copied(),
        ) else {
            return DailySeries::default();
        };

        let days = first
            .iter_days()
            .take_while(|day| *day <= last)
            .map(|day| {
                buckets
                    .remove(&day)
                    .map_or_else(|| DailyAggregate::empty(day), |acc| finish_day(day, &acc))
            })
            .collect();
        DailySeries { days }
    }
}

// View counters stay far below 2^52, so the f64 conversion is exact.
fn finish_day(day: NaiveDate, acc: &DayAccumulator) -> DailyAggregate {
    let average = (acc.samples > 0).then(|| acc.average_sum as f64 / acc.samples as f64);
    DailyAggregate {
        day,
        char_count: acc.char_count,
        total_views: acc.total_views,
        average_daily_views: average,
    }
}
