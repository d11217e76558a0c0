//! Metering cloud client.

pub mod models;
mod response;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use self::{
    models::{Device, User},
    response::Envelope,
};
use crate::{api::client, core::RawMessage, prelude::*};

pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    /// Build an authenticated client (bearer token on every request).
    pub fn try_new(base_url: Url, access_token: &str) -> Result<Self> {
        Ok(Self { client: client::try_new_with_token(access_token)?, base_url })
    }

    /// Build a client for the endpoints that do not require a session.
    pub fn try_new_anonymous(base_url: Url) -> Result<Self> {
        Ok(Self { client: client::try_new()?, base_url })
    }

    #[instrument(skip_all, fields(email = email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        #[derive(Serialize)]
        struct LoginRequest<'a> {
            email: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct LoginData {
            access_token: Option<String>,
        }

        let data: LoginData = self
            .call("api/auth/login", &LoginRequest { email, password })
            .await
            .context("failed to log in")?;
        data.access_token.context("the backend returned no access token")
    }

    #[instrument(skip_all, fields(email = request.email))]
    pub async fn signup(&self, request: &SignupRequest<'_>) -> Result {
        let _: serde_json::Value =
            self.call("api/auth/signup", request).await.context("failed to sign up")?;
        Ok(())
    }

    #[instrument(skip_all, fields(email = email))]
    pub async fn request_password_reset(&self, email: &str) -> Result {
        #[derive(Serialize)]
        struct PasswordResetRequest<'a> {
            email: &'a str,
        }

        let _: serde_json::Value = self
            .call("api/auth/password/create", &PasswordResetRequest { email })
            .await
            .context("failed to request the password reset")?;
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn get_metering_devices(&self) -> Result<Vec<Device>> {
        #[derive(Serialize)]
        struct DevicesRequest {
            paginate: bool,
        }

        #[derive(Deserialize)]
        struct DevicesData {
            metering_devices: Vec<Device>,
        }

        let data: DevicesData = self
            .call("api/device/metering_devices", &DevicesRequest { paginate: false })
            .await
            .context("failed to list the metering devices")?;
        info!(n_devices = data.metering_devices.len(), "fetched");
        Ok(data.metering_devices)
    }

    /// Fetch the display name of one device. The registry is flaky about
    /// this endpoint, hence the `Option`.
    #[instrument(skip_all, fields(device_id = device_id))]
    pub async fn get_device_name(&self, device_id: i64) -> Result<Option<String>> {
        #[derive(Serialize)]
        struct DeviceDetailRequest<'a> {
            only: &'a [&'a str],
        }

        #[derive(Deserialize)]
        struct DeviceDetailData {
            metering_device: DeviceDetail,
        }

        #[derive(Deserialize)]
        struct DeviceDetail {
            name: Option<String>,
        }

        let data: DeviceDetailData = self
            .call(
                &format!("api/device/metering_device/{device_id}"),
                &DeviceDetailRequest { only: &["name"] },
            )
            .await
            .context("failed to fetch the device details")?;
        Ok(data.metering_device.name)
    }

    #[instrument(skip_all, fields(device_id = request.device_id))]
    pub async fn get_messages(&self, request: &MessagesRequest) -> Result<Vec<RawMessage>> {
        #[derive(Deserialize)]
        struct MessagesData {
            messages: MessagesPage,
        }

        #[derive(Deserialize)]
        struct MessagesPage {
            data: Vec<RawMessage>,
        }

        let data: MessagesData = self
            .call("api/device/messages", request)
            .await
            .context("failed to fetch the messages")?;
        info!(n_messages = data.messages.data.len(), "fetched");
        Ok(data.messages.data)
    }

    #[instrument(skip_all)]
    pub async fn get_company_users(&self) -> Result<Vec<User>> {
        #[derive(Deserialize)]
        struct UsersData {
            users: Vec<User>,
        }

        let data: UsersData = self
            .call("api/company/users", &serde_json::Map::new())
            .await
            .context("failed to fetch the company users")?;
        Ok(data.users)
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(path = path))]
    async fn call<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let url = self.base_url.join(path).with_context(|| format!("invalid path `{path}`"))?;
        // The backend reports failures inside the body rather than via the
        // status code, so the envelope is parsed unconditionally.
        self.client
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to call `{path}`"))?
            .json::<Envelope<R>>()
            .await
            .with_context(|| format!("failed to deserialize the `{path}` response"))?
            .into()
    }
}

/// `POST api/auth/signup` payload.
#[derive(Serialize)]
pub struct SignupRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirmation: &'a str,
    pub name: &'a str,
    pub company_name: &'a str,
    pub user_time_zone: i32,
    pub company_type_id: i32,
}

/// `POST api/device/messages` payload.
#[serde_with::skip_serializing_none]
#[derive(bon::Builder, Serialize)]
pub struct MessagesRequest {
    pub device_id: Option<i64>,

    #[builder(default = 1)]
    #[serde(rename = "msgType")]
    pub msg_type: u8,

    #[builder(default = 0)]
    #[serde(rename = "msgGroup")]
    pub msg_group: u8,

    /// Unix seconds.
    #[serde(rename = "startDate")]
    pub start_date: Option<i64>,

    /// Unix seconds.
    #[serde(rename = "stopDate")]
    pub stop_date: Option<i64>,

    #[builder(default = true)]
    pub paginate: bool,

    #[builder(default = 100)]
    pub per_page: u32,

    #[builder(default = 0)]
    pub profile_type: u8,

    #[builder(default = true)]
    pub with_transformation_ratio: bool,

    #[builder(default = true)]
    pub with_loss_factor: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_request_defaults() {
        let request = MessagesRequest::builder().device_id(42).build();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["device_id"], 42);
        assert_eq!(body["msgType"], 1);
        assert_eq!(body["per_page"], 100);
        assert_eq!(body.get("startDate"), None);
    }

    #[test]
    fn test_messages_request_period() {
        let request = MessagesRequest::builder().start_date(100).stop_date(200).build();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["startDate"], 100);
        assert_eq!(body["stopDate"], 200);
        assert_eq!(body.get("device_id"), None);
    }
}
