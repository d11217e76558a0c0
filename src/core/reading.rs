use chrono::{DateTime, Local};

use crate::quantity::volume::CubicMeters;

/// One validated register sample of one meter.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    /// Stable meter identity: a serial number or a device id,
    /// depending on the field policy.
    pub meter_id: String,

    /// Canonicalized to unix-second precision.
    pub timestamp: DateTime<Local>,

    /// The cumulative register value.
    pub cumulative: CubicMeters,

    /// Usage already computed upstream, when the firmware reports it.
    /// Zero is a reported value, not an absent one.
    pub reported_delta: Option<CubicMeters>,
}

/// A [`Reading`] with its resolved per-interval usage.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct UsageRecord {
    pub reading: Reading,

    /// `None` for the first record of a meter's sequence.
    /// Negative on register rollover, passed through unclamped.
    pub usage: Option<CubicMeters>,
}

impl UsageRecord {
    /// Usage that counts towards the billing total:
    /// strictly positive numeric usage only.
    pub fn billable_usage(&self) -> Option<CubicMeters> {
        self.usage.filter(|usage| *usage > CubicMeters::ZERO)
    }
}
