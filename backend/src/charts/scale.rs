//! Data-to-pixel mapping and tick placement.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Tick label format for date axes.
pub const DATE_TICK_FORMAT: &str = "%m-%d";

const MAX_DATE_TICKS: i64 = 12;
const VALUE_TICKS: f64 = 6.0;

/// Linear map from a data interval onto a pixel interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Build a scale. A degenerate domain is widened by one unit each way.
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (lo, hi) = domain;
        let widened = if (hi - lo).abs() < f64::EPSILON {
            (lo - 1.0, hi + 1.0)
        } else {
            (lo.min(hi), lo.max(hi))
        };
        Self {
            domain: widened,
            range,
        }
    }

    /// Padded scale over `values`, or `None` when there are none.
    #[must_use]
    pub fn padded(values: impl IntoIterator<Item = f64>, range: (f64, f64)) -> Option<Self> {
        let (lo, hi) = values.into_iter().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })?;
        let pad = (hi - lo) * 0.05;
        Some(Self::new((lo - pad, hi + pad), range))
    }

    /// Pixel position of `value`.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Pixels covered by `span` data units.
    #[must_use]
    pub fn extent(&self, span: f64) -> f64 {
        (self.map(span) - self.map(0.0)).abs()
    }

    /// Evenly spaced "nice" ticks within the domain (1, 2 or 5 times a power
    /// of ten).
    #[must_use]
    pub fn value_ticks(&self) -> Vec<f64> {
        let (lo, hi) = self.domain;
        let raw_step = (hi - lo) / VALUE_TICKS;
        let magnitude = 10_f64.powf(raw_step.log10().floor());
        let step = [1.0, 2.0, 5.0, 10.0]
            .into_iter()
            .map(|m| m * magnitude)
            .find(|candidate| *candidate >= raw_step)
            .unwrap_or(raw_step);
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }
        let mut ticks = Vec::new();
        let mut tick = (lo / step).ceil() * step;
        while tick <= hi {
            ticks.push(tick);
            tick += step;
        }
        ticks
    }
}

/// Seconds since the epoch as a float, for time axes.
#[must_use]
pub fn epoch_seconds(at: NaiveDateTime) -> f64 {
    at.and_utc().timestamp() as f64
}

/// Midnight of `day` in epoch seconds.
#[must_use]
pub fn day_start(day: NaiveDate) -> f64 {
    epoch_seconds(day.and_time(chrono::NaiveTime::MIN))
}

/// Midnight-aligned date ticks covering `[first, last]`, thinned so at most a
/// dozen labels appear.
#[must_use]
pub fn date_ticks(first: NaiveDateTime, last: NaiveDateTime) -> Vec<NaiveDate> {
    let start = first.date();
    let end = last.date();
    let span = (end - start).num_days().max(0);
    let stride = (span / MAX_DATE_TICKS) + 1;
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .step_by(usize::try_from(stride).unwrap_or(1))
        .collect()
}

/// Pad a time domain by half a day each side so edge markers stay visible.
#[must_use]
pub fn padded_time_domain(first: NaiveDateTime, last: NaiveDateTime) -> (f64, f64) {
    let half_day = Duration::hours(12);
    (epoch_seconds(first - half_day), epoch_seconds(last + half_day))
}

/// Tick label: whole numbers without a fraction, anything else to one decimal.
#[must_use]
pub fn value_label(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(raw: &str) -> NaiveDateTime {
        raw.parse().expect("valid timestamp")
    }

    #[rstest]
    fn maps_domain_ends_onto_range_ends() {
        let scale = LinearScale::new((2_500.0, 4_500.0), (700.0, 400.0));
        assert!((scale.map(2_500.0) - 700.0).abs() < 1e-9);
        assert!((scale.map(4_500.0) - 400.0).abs() < 1e-9);
        assert!((scale.map(3_500.0) - 550.0).abs() < 1e-9);
    }

    #[rstest]
    fn degenerate_domain_is_widened() {
        let scale = LinearScale::new((10.0, 10.0), (0.0, 100.0));
        assert!(scale.map(9.0).abs() < 1e-9);
        assert!((scale.map(10.0) - 50.0).abs() < 1e-9);
        assert!((scale.map(11.0) - 100.0).abs() < 1e-9);
    }

    #[rstest]
    fn padded_scale_needs_values() {
        assert!(LinearScale::padded(std::iter::empty(), (0.0, 1.0)).is_none());
    }

    #[rstest]
    #[case(2_500.0, 4_500.0, vec![2_500.0, 3_000.0, 3_500.0, 4_000.0, 4_500.0])]
    #[case(0.0, 10.0, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0])]
    fn value_ticks_are_round(#[case] lo: f64, #[case] hi: f64, #[case] expected: Vec<f64>) {
        let ticks = LinearScale::new((lo, hi), (0.0, 1.0)).value_ticks();
        assert_eq!(ticks, expected);
    }

    #[rstest]
    fn date_ticks_cover_each_day_of_short_spans() {
        let ticks = date_ticks(at("2024-01-01T09:00:00"), at("2024-01-03T18:00:00"));
        let labels: Vec<String> = ticks
            .iter()
            .map(|d| d.format(DATE_TICK_FORMAT).to_string())
            .collect();
        assert_eq!(labels, ["01-01", "01-02", "01-03"]);
    }

    #[rstest]
    fn date_ticks_are_thinned_for_long_spans() {
        let ticks = date_ticks(at("2024-01-01T00:00:00"), at("2024-03-01T00:00:00"));
        assert!(ticks.len() <= 13);
        assert!(ticks.len() >= 2);
    }

    #[rstest]
    #[case(3_000.0, "3000")]
    #[case(2.5, "2.5")]
    fn labels_drop_trailing_zero_fraction(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(value_label(value), expected);
    }
}
