//! Flattens aggregated meter groups into spreadsheet rows.

use std::collections::BTreeMap;

use crate::{api::Batch, core::MeterGroup};

const HEADER: &str = "meter_id,name,address,timestamp,register_m3,usage_m3,total_usage_m3,total_cost_kzt";

/// One CSV document: a row per usage record, totals repeated per row so
/// the sheet filters cleanly per meter.
pub fn to_csv(groups: &BTreeMap<String, MeterGroup>, batch: &Batch) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for group in groups.values() {
        let info = batch.info_for(&group.meter_id);
        let name = info.and_then(|info| info.name.as_deref()).unwrap_or_default();
        let address = info.and_then(|info| info.address.as_deref()).unwrap_or_default();
        for record in &group.records {
            let usage =
                record.usage.map(|usage| format!("{:.3}", usage.0)).unwrap_or_default();
            out.push_str(&format!(
                "{},{},{},{},{:.3},{},{:.3},{:.2}\n",
                escape(&group.meter_id),
                escape(name),
                escape(address),
                record.reading.timestamp.to_rfc3339(),
                record.reading.cumulative.0,
                usage,
                group.total_usage.0,
                group.total_cost.0,
            ));
        }
    }
    out
}

/// RFC 4180 quoting, applied only when the field needs it.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::{
        core::{Reading, UsageRecord, aggregate},
        quantity::{rate::CubicMeterRate, volume::CubicMeters},
    };

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("Almaty, Abay 10"), "\"Almaty, Abay 10\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_row_shape() {
        let records = [
            UsageRecord {
                reading: Reading {
                    meter_id: "A".to_string(),
                    timestamp: Local.timestamp_opt(100, 0).unwrap(),
                    cumulative: CubicMeters::from(10.0),
                    reported_delta: None,
                },
                usage: None,
            },
            UsageRecord {
                reading: Reading {
                    meter_id: "A".to_string(),
                    timestamp: Local.timestamp_opt(200, 0).unwrap(),
                    cumulative: CubicMeters::from(12.5),
                    reported_delta: None,
                },
                usage: Some(CubicMeters::from(2.5)),
            },
        ];
        let groups = aggregate(&records, CubicMeterRate::from(120.0));
        let csv = to_csv(&groups, &Batch::default());
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("A,,,"));
        assert!(lines[1].ends_with(",10.000,,2.500,300.00"));
        assert!(lines[2].contains(",12.500,2.500,2.500,300.00"));
    }
}
