//! Shared HTTP plumbing for the providers.

use std::time::Duration;

use devdash_core::config::Capability;
use devdash_core::error::{DashError, Result};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

pub(crate) fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("devdash/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .build()
}

pub(crate) fn construction_error(capability: Capability, message: impl Into<String>) -> DashError {
    DashError::ProviderConstruction {
        provider: capability.name().to_string(),
        message: message.into(),
    }
}

pub(crate) fn fetch_error(capability: Capability, message: impl std::fmt::Display) -> DashError {
    DashError::ProviderFetch {
        provider: capability.name().to_string(),
        message: message.to_string(),
    }
}

/// Parse a base URL, rejecting anything that is not http(s).
pub(crate) fn parse_http_url(capability: Capability, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| construction_error(capability, format!("invalid address '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(construction_error(
            capability,
            format!("unsupported scheme '{other}' in '{raw}'"),
        )),
    }
}

/// Send a request and decode a JSON body, treating non-2xx statuses as errors.
pub(crate) async fn send_json<T: DeserializeOwned>(
    capability: Capability,
    request: RequestBuilder,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| fetch_error(capability, e))?;
    let response = response
        .error_for_status()
        .map_err(|e| fetch_error(capability, e))?;
    response.json().await.map_err(|e| fetch_error(capability, e))
}

/// Append path segments to `base`, percent-encoding each one.
pub(crate) fn join_segments(capability: Capability, base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| fetch_error(capability, format!("'{base}' cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
