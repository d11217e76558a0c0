//! Cross-meter grouping and billing totals.

use std::collections::BTreeMap;

use crate::{
    core::reading::UsageRecord,
    quantity::{cost::Tenge, rate::CubicMeterRate, volume::CubicMeters},
};

/// Aggregation root: everything known about one meter over the period.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct MeterGroup {
    pub meter_id: String,

    /// Chronological.
    pub records: Vec<UsageRecord>,

    /// Sum of strictly positive usage. Zero, negative (rollover) and
    /// unresolved usage never count towards the bill.
    pub total_usage: CubicMeters,
    pub total_cost: Tenge,
}

/// Group sequenced records by meter and compute the billing totals.
///
/// Tolerates unsorted input: the same partition + stable sort as the
/// sequencer is applied again, so the call is idempotent. Aggregating
/// twice yields equal groups.
pub fn aggregate(records: &[UsageRecord], tariff: CubicMeterRate) -> BTreeMap<String, MeterGroup> {
    let mut partitions: BTreeMap<String, Vec<UsageRecord>> = BTreeMap::new();
    for record in records {
        partitions.entry(record.reading.meter_id.clone()).or_default().push(record.clone());
    }
    partitions
        .into_iter()
        .map(|(meter_id, mut records)| {
            records.sort_by_key(|record| record.reading.timestamp);
            let total_usage =
                records.iter().filter_map(UsageRecord::billable_usage).sum::<CubicMeters>();
            let group = MeterGroup {
                meter_id: meter_id.clone(),
                records,
                total_usage,
                total_cost: total_usage * tariff,
            };
            (meter_id, group)
        })
        .collect()
}
