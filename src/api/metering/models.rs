//! Wire models of the metering cloud.

use serde::Deserialize;

/// One entry of `data.metering_devices`.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct Device {
    pub id: i64,

    /// The physical serial number.
    #[serde(rename = "deviceID")]
    pub serial_number: Option<String>,

    pub address: Option<Address>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Address {
    pub unrestricted_value: Option<String>,
}

/// One entry of `data.users`.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct User {
    pub name: Option<String>,
    pub email: Option<String>,
    pub job_title: Option<String>,
    pub phone_number: Option<String>,
    pub company_title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_deserialize_device_ok() -> Result {
        // language=JSON
        const DEVICE: &str = r#"
            {
                "id": 4221,
                "deviceID": "100500",
                "address": {"unrestricted_value": "Almaty, Abay 10"},
                "firmware": "2.1"
            }
        "#;
        let device: Device = serde_json::from_str(DEVICE)?;
        assert_eq!(device.id, 4221);
        assert_eq!(device.serial_number.as_deref(), Some("100500"));
        assert_eq!(
            device.address.and_then(|address| address.unrestricted_value).as_deref(),
            Some("Almaty, Abay 10"),
        );
        Ok(())
    }

    #[test]
    fn test_deserialize_bare_device_ok() -> Result {
        // language=JSON
        const DEVICE: &str = r#"{"id": 1}"#;
        let device: Device = serde_json::from_str(DEVICE)?;
        assert_eq!(device.serial_number, None);
        Ok(())
    }
}
