mod aggregate;
mod bucket;
mod normalize;
mod reading;
mod sequence;

pub use self::{
    aggregate::{MeterGroup, aggregate},
    bucket::{DailyBucket, MonthlyBucket, bucket_by_day, bucket_by_month, daily_average, range_filter},
    normalize::{FieldPolicy, IdField, RawMessage, TimeField, normalize, normalize_all},
    reading::{Reading, UsageRecord},
    sequence::sequence,
};

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use serde_json::json;

    use super::*;
    use crate::quantity::rate::CubicMeterRate;

    /// The whole pipeline over a small mixed batch.
    #[test]
    fn test_raw_batch_to_billing_totals() {
        let batch: Vec<RawMessage> = serde_json::from_value(json!([
            {"meter_number": "A", "datetime": 100, "in1": 10},
            {"meter_number": "A", "datetime": 200, "in1": 12.5},
            {"meter_number": "B", "datetime": 150, "in1": 5},
        ]))
        .unwrap();

        let readings = normalize_all(&batch, FieldPolicy::default());
        let records = sequence(readings);
        let groups = aggregate(&records, CubicMeterRate::from(120.0));

        assert_eq!(groups.len(), 2);
        assert_abs_diff_eq!(groups["A"].total_usage.0, 2.5);
        assert_abs_diff_eq!(groups["A"].total_cost.0, 300.0);
        assert_abs_diff_eq!(groups["B"].total_usage.0, 0.0);
        assert_abs_diff_eq!(groups["B"].total_cost.0, 0.0);
    }

    /// Running the same multiset through twice yields identical output.
    #[test]
    fn test_pipeline_determinism() {
        let batch: Vec<RawMessage> = serde_json::from_value(json!([
            {"meter_number": "B", "datetime": 150, "in1": 5, "delta_in1": 1.5},
            {"meter_number": "A", "datetime": 200, "in1": 12.5},
            {"meter_number": "A", "datetime": 100, "in1": 10},
            {"meter_number": "A", "datetime": 100, "in1": "oops"},
        ]))
        .unwrap();

        let run = || sequence(normalize_all(&batch, FieldPolicy::default()));
        assert_eq!(run(), run());
    }
}
