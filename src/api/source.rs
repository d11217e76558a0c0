//! Fetch strategies for the readings batch.
//!
//! Older firmware deployments only answer per-device message queries,
//! newer ones serve the whole company in one call. Both present the core
//! with a single already-resolved batch.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone};

use crate::{
    api::metering::{Api, MessagesRequest},
    core::RawMessage,
    prelude::*,
};

/// Everything one fetch cycle produced: the raw messages plus whatever
/// display metadata the strategy could gather along the way.
#[must_use]
#[derive(Default)]
pub struct Batch {
    pub messages: Vec<RawMessage>,

    /// Keyed by the backend device id, rendered as a string.
    pub meters: BTreeMap<String, MeterInfo>,
}

#[must_use]
#[derive(Clone, Debug, Default)]
pub struct MeterInfo {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub address: Option<String>,
}

impl Batch {
    /// Look up the metadata for an aggregated meter id, whichever identity
    /// key produced it.
    pub fn info_for(&self, meter_id: &str) -> Option<&MeterInfo> {
        self.meters.get(meter_id).or_else(|| {
            self.meters
                .values()
                .find(|info| info.serial_number.as_deref() == Some(meter_id))
        })
    }
}

#[async_trait]
pub trait ReadingSource: Sync {
    async fn fetch(&self, period: Option<(NaiveDate, NaiveDate)>) -> Result<Batch>;
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum SourceKind {
    /// One `device/messages` call for the whole company.
    #[default]
    Bulk,

    /// A `metering_devices` listing, then one messages call per device,
    /// with name and address enrichment.
    PerDevice,
}

impl SourceKind {
    pub fn into_source(self, api: Api) -> Box<dyn ReadingSource> {
        match self {
            Self::Bulk => Box::new(BulkSource(api)),
            Self::PerDevice => Box::new(PerDeviceSource(api)),
        }
    }
}

pub struct BulkSource(pub Api);

#[async_trait]
impl ReadingSource for BulkSource {
    #[instrument(skip_all)]
    async fn fetch(&self, period: Option<(NaiveDate, NaiveDate)>) -> Result<Batch> {
        let request = MessagesRequest::builder()
            .per_page(200)
            .maybe_start_date(period.map(|(start, _)| unix_day_start(start)))
            .maybe_stop_date(period.map(|(_, stop)| unix_day_end(stop)))
            .build();
        let messages = self.0.get_messages(&request).await?;
        Ok(Batch { messages, meters: BTreeMap::new() })
    }
}

pub struct PerDeviceSource(pub Api);

#[async_trait]
impl ReadingSource for PerDeviceSource {
    #[instrument(skip_all)]
    async fn fetch(&self, period: Option<(NaiveDate, NaiveDate)>) -> Result<Batch> {
        let mut batch = Batch::default();
        for device in self.0.get_metering_devices().await? {
            // A flaky registry entry should not fail the whole batch.
            let name = match self.0.get_device_name(device.id).await {
                Ok(name) => name,
                Err(error) => {
                    warn!(device_id = device.id, "failed to fetch the device name: {error:#}");
                    None
                }
            };
            batch.meters.insert(
                device.id.to_string(),
                MeterInfo {
                    name,
                    serial_number: device.serial_number.clone(),
                    address: device.address.and_then(|address| address.unrestricted_value),
                },
            );

            let request = MessagesRequest::builder()
                .device_id(device.id)
                .maybe_start_date(period.map(|(start, _)| unix_day_start(start)))
                .maybe_stop_date(period.map(|(_, stop)| unix_day_end(stop)))
                .build();
            match self.0.get_messages(&request).await {
                Ok(messages) => batch.messages.extend(messages),
                Err(error) => {
                    warn!(device_id = device.id, "failed to fetch the messages: {error:#}");
                }
            }
        }
        Ok(batch)
    }
}

fn unix_day_start(date: NaiveDate) -> i64 {
    chrono::Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
        .earliest()
        .map_or(0, |timestamp| timestamp.timestamp())
}

fn unix_day_end(date: NaiveDate) -> i64 {
    chrono::Local
        .from_local_datetime(&date.and_hms_opt(23, 59, 59).unwrap())
        .latest()
        .map_or(0, |timestamp| timestamp.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_for_falls_back_to_serial_number() {
        let mut batch = Batch::default();
        batch.meters.insert(
            "42".to_string(),
            MeterInfo {
                name: Some("Kitchen".to_string()),
                serial_number: Some("100500".to_string()),
                address: None,
            },
        );
        assert_eq!(batch.info_for("42").unwrap().name.as_deref(), Some("Kitchen"));
        assert_eq!(batch.info_for("100500").unwrap().name.as_deref(), Some("Kitchen"));
        assert!(batch.info_for("nope").is_none());
    }

    #[test]
    fn test_day_bounds_cover_the_whole_day() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(unix_day_end(date) - unix_day_start(date), 24 * 3600 - 1);
    }
}
