use std::time::Duration;

use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::prelude::*;

/// Build a client for the unauthenticated endpoints.
pub fn try_new() -> Result<Client> {
    Ok(builder().build()?)
}

/// Build a client that sends the bearer token with every request.
pub fn try_new_with_token(access_token: &str) -> Result<Client> {
    let mut headers = HeaderMap::new();
    let mut authorization = HeaderValue::from_str(&format!("Bearer {access_token}"))?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);
    Ok(builder().default_headers(headers).build()?)
}

fn builder() -> reqwest::ClientBuilder {
    Client::builder().user_agent("saiga").timeout(Duration::from_secs(10))
}
