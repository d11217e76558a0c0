//! Orders readings per meter and resolves per-interval usage.

use std::collections::BTreeMap;

use crate::core::reading::{Reading, UsageRecord};

/// Partition the readings by meter, sort each partition by timestamp and
/// resolve the usage of every record.
///
/// The sort is stable: readings with equal timestamps keep their input
/// order, which pins down the delta signs. Partitions are emitted in
/// meter-id order, so the whole output is deterministic.
pub fn sequence(readings: Vec<Reading>) -> Vec<UsageRecord> {
    partition(readings).into_values().flat_map(sequence_partition).collect()
}

pub(crate) fn partition(readings: Vec<Reading>) -> BTreeMap<String, Vec<Reading>> {
    let mut partitions: BTreeMap<String, Vec<Reading>> = BTreeMap::new();
    for reading in readings {
        partitions.entry(reading.meter_id.clone()).or_default().push(reading);
    }
    partitions
}

pub(crate) fn sequence_partition(mut readings: Vec<Reading>) -> Vec<UsageRecord> {
    readings.sort_by_key(|reading| reading.timestamp);
    let mut records = Vec::with_capacity(readings.len());
    let mut previous = None;
    for reading in readings {
        // The first record of a partition never has usage, even when the
        // firmware reported a delta for it: there is nothing to bill it
        // against within the requested period.
        let usage = previous.and(
            reading.reported_delta.or_else(|| previous.map(|previous| reading.cumulative - previous)),
        );
        previous = Some(reading.cumulative);
        records.push(UsageRecord { reading, usage });
    }
    records
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, TimeZone};
    use itertools::Itertools;

    use super::*;
    use crate::quantity::volume::CubicMeters;

    fn at(seconds: i64) -> DateTime<Local> {
        Local.timestamp_opt(seconds, 0).unwrap()
    }

    fn reading(meter_id: &str, seconds: i64, cumulative: f64, delta: Option<f64>) -> Reading {
        Reading {
            meter_id: meter_id.to_string(),
            timestamp: at(seconds),
            cumulative: CubicMeters::from(cumulative),
            reported_delta: delta.map(CubicMeters::from),
        }
    }

    #[test]
    fn test_computed_delta() {
        let records =
            sequence(vec![reading("a", 100, 10.0, None), reading("a", 200, 14.5, None)]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].usage, None);
        assert_eq!(records[1].usage, Some(CubicMeters::from(4.5)));
    }

    #[test]
    fn test_reported_delta_preferred() {
        let records =
            sequence(vec![reading("a", 100, 10.0, None), reading("a", 200, 14.5, Some(3.0))]);
        assert_eq!(records[1].usage, Some(CubicMeters::from(3.0)));
    }

    #[test]
    fn test_first_record_has_no_usage_despite_reported_delta() {
        let records =
            sequence(vec![reading("a", 100, 10.0, Some(2.0)), reading("a", 200, 11.0, None)]);
        assert_eq!(records[0].usage, None);
        assert_eq!(records[1].usage, Some(CubicMeters::from(1.0)));
    }

    #[test]
    fn test_unsorted_input_is_ordered_per_meter() {
        let records = sequence(vec![
            reading("a", 300, 12.0, None),
            reading("b", 150, 5.0, None),
            reading("a", 100, 10.0, None),
        ]);
        for (_, partition) in &records.iter().chunk_by(|record| record.reading.meter_id.clone()) {
            assert!(partition.map(|record| record.reading.timestamp).is_sorted());
        }
        let a: Vec<_> =
            records.iter().filter(|record| record.reading.meter_id == "a").collect();
        assert_eq!(a[1].usage, Some(CubicMeters::from(2.0)));
    }

    #[test]
    fn test_rollover_is_not_clamped() {
        let records =
            sequence(vec![reading("a", 100, 10.0, None), reading("a", 200, 4.0, None)]);
        assert_eq!(records[1].usage, Some(CubicMeters::from(-6.0)));
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let records = sequence(vec![
            reading("a", 100, 10.0, None),
            reading("a", 100, 12.0, None),
            reading("a", 200, 13.0, None),
        ]);
        let cumulative: Vec<_> =
            records.iter().map(|record| record.reading.cumulative.0).collect();
        assert_eq!(cumulative, [10.0, 12.0, 13.0]);
        assert_eq!(records[1].usage, Some(CubicMeters::from(2.0)));
        assert_eq!(records[2].usage, Some(CubicMeters::from(1.0)));
    }

    #[test]
    fn test_deterministic() {
        let input = vec![
            reading("b", 150, 5.0, None),
            reading("a", 200, 14.5, None),
            reading("a", 100, 10.0, Some(1.0)),
        ];
        assert_eq!(sequence(input.clone()), sequence(input));
    }

    #[test]
    fn test_empty() {
        assert!(sequence(Vec::new()).is_empty());
    }
}
