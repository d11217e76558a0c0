//! Consumer-side boundary of the metering API: one raw message in,
//! one validated [`Reading`] out, or nothing. Never an error.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Deserialize;
use serde_json::Value;

use crate::{core::reading::Reading, quantity::volume::CubicMeters};

/// One element of the `data.messages.data` array, as the backend sends it.
///
/// Device firmware versions disagree on field names and types, so every
/// field is optional and numbers may arrive as strings.
#[must_use]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawMessage {
    pub device_id: Option<Value>,
    pub meter_number: Option<Value>,

    /// Unix seconds.
    pub datetime: Option<Value>,

    /// ISO datetime string.
    pub datetime_at_hour: Option<String>,

    /// The cumulative register value.
    pub in1: Option<Value>,

    /// Usage computed upstream. Zero means «zero», not «missing».
    pub delta_in1: Option<Value>,
}

/// Which raw fields carry the meter identity and the timestamp.
/// The non-selected field is still accepted as a fallback.
#[must_use]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldPolicy {
    pub id_field: IdField,
    pub time_field: TimeField,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum IdField {
    /// The physical serial number (`meter_number`).
    #[default]
    MeterNumber,

    /// The backend device id (`device_id`).
    DeviceId,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum TimeField {
    /// Unix seconds (`datetime`).
    #[default]
    Datetime,

    /// ISO datetime string (`datetime_at_hour`).
    DatetimeAtHour,
}

/// Validate and canonicalize one raw message.
///
/// Returns [`None`] when the identity is missing, the timestamp cannot be
/// parsed, or the register value is not a finite number. Malformed records
/// are dropped, never fail the batch.
pub fn normalize(raw: &RawMessage, policy: FieldPolicy) -> Option<Reading> {
    let meter_id = match policy.id_field {
        IdField::MeterNumber => {
            identity(raw.meter_number.as_ref()).or_else(|| identity(raw.device_id.as_ref()))
        }
        IdField::DeviceId => {
            identity(raw.device_id.as_ref()).or_else(|| identity(raw.meter_number.as_ref()))
        }
    }?;
    let timestamp = match policy.time_field {
        TimeField::Datetime => unix_timestamp(raw.datetime.as_ref())
            .or_else(|| iso_timestamp(raw.datetime_at_hour.as_deref())),
        TimeField::DatetimeAtHour => iso_timestamp(raw.datetime_at_hour.as_deref())
            .or_else(|| unix_timestamp(raw.datetime.as_ref())),
    }?;
    let cumulative = CubicMeters::from(finite(raw.in1.as_ref())?);
    ensure_non_negative(cumulative)?;
    Some(Reading {
        meter_id,
        timestamp,
        cumulative,
        reported_delta: finite(raw.delta_in1.as_ref()).map(CubicMeters::from),
    })
}

/// Normalize a batch, preserving the relative order of valid entries.
pub fn normalize_all(raw: &[RawMessage], policy: FieldPolicy) -> Vec<Reading> {
    raw.iter().filter_map(|message| normalize(message, policy)).collect()
}

const fn ensure_non_negative(value: CubicMeters) -> Option<()> {
    if value.0 >= 0.0 { Some(()) } else { None }
}

fn identity(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(string) => {
            let string = string.trim();
            (!string.is_empty()).then(|| string.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn finite(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(string) => string.trim().parse().ok(),
        _ => None,
    }
    .filter(|value| value.is_finite())
}

fn unix_timestamp(value: Option<&Value>) -> Option<DateTime<Local>> {
    let seconds = match value? {
        Value::Number(number) => number.as_i64(),
        Value::String(string) => string.trim().parse().ok(),
        _ => None,
    }?;
    Local.timestamp_opt(seconds, 0).single()
}

fn iso_timestamp(value: Option<&str>) -> Option<DateTime<Local>> {
    let value = value?.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Local));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| naive.and_local_timezone(Local).single())
}
