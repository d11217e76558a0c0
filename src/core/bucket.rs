//! Period scoping and calendar-day rollups for the consumption chart.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::{core::reading::Reading, quantity::volume::CubicMeters};

/// One chart bar: the sum of register values over a local calendar day.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub value: CubicMeters,
}

/// Keep the readings whose local calendar day falls into `start..=end`,
/// regardless of the time-of-day component.
///
/// Apply this *before* sequencing when usage totals are scoped to a
/// period: filtering sequenced records would silently drop the first
/// in-range delta of meters that straddle the boundary.
pub fn range_filter(readings: Vec<Reading>, start: NaiveDate, end: NaiveDate) -> Vec<Reading> {
    readings
        .into_iter()
        .filter(|reading| {
            let date = reading.timestamp.date_naive();
            start <= date && date <= end
        })
        .collect()
}

/// Sum the register values per local calendar day, across all meters,
/// ascending by date.
///
/// Chart material only: summing cumulative registers means something very
/// different from summing usage, so these values never feed the billing
/// totals.
pub fn bucket_by_day(readings: &[Reading]) -> Vec<DailyBucket> {
    let mut days: BTreeMap<NaiveDate, CubicMeters> = BTreeMap::new();
    for reading in readings {
        *days.entry(reading.timestamp.date_naive()).or_insert(CubicMeters::ZERO) +=
            reading.cumulative;
    }
    days.into_iter().map(|(date, value)| DailyBucket { date, value }).collect()
}

/// One chart bar for the coarser rollup: a whole calendar month.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyBucket {
    /// First day of the month.
    pub month: NaiveDate,
    pub value: CubicMeters,
}

/// Same as [`bucket_by_day`], per calendar month.
pub fn bucket_by_month(readings: &[Reading]) -> Vec<MonthlyBucket> {
    let mut months: BTreeMap<NaiveDate, CubicMeters> = BTreeMap::new();
    for reading in readings {
        let month = reading.timestamp.date_naive().with_day(1).unwrap_or_else(|| {
            reading.timestamp.date_naive()
        });
        *months.entry(month).or_insert(CubicMeters::ZERO) += reading.cumulative;
    }
    months.into_iter().map(|(month, value)| MonthlyBucket { month, value }).collect()
}

/// Mean bucket value, the chart's average line.
pub fn daily_average(buckets: &[DailyBucket]) -> Option<CubicMeters> {
    if buckets.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = buckets.len() as f64;
    Some(buckets.iter().map(|bucket| bucket.value).sum::<CubicMeters>() / n)
}
