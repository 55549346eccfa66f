// src/core/reputation/transport.rs

use crate::config::{Config, ConfigError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CACHE_CONTROL};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

const API_KEY_HEADER: &str = "x-apikey";

/// Failures surfaced by the service client. None of these leave the
/// orchestrator as errors; they are shaped into `ScanOutcome::TransientError`.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("rate limit exceeded (HTTP 429): {body}")]
    RateLimited { body: String },

    #[error("service rejected the request with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("cannot build endpoint from base URL {0}")]
    InvalidEndpoint(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

/// A successful (2xx) reply, body kept as text for the result shaper.
#[derive(Debug, Clone)]
pub struct ServiceReply {
    pub status: u16,
    pub body: String,
}

/// Authenticated client for the reputation service REST API.
///
/// Every request carries the API key, `Accept: application/json` and
/// `Cache-Control: no-cache`. The underlying pool lives as long as the client.
/// Uploads get their own deadline since a large file can outlast the
/// request timeout on a slow uplink.
pub struct VtClient {
    http: Client,
    base_url: Url,
    upload_timeout: Duration,
}

impl VtClient {
    /// Builds the client with the default headers and the request timeout.
    ///
    /// # Errors
    /// * `ConfigError::MissingApiKey` - the key is blank.
    /// * `ConfigError::InvalidApiKey` - the key cannot be sent as a header value.
    /// * `ConfigError::HttpClient` - reqwest failed to build the client.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let mut api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| ConfigError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let http = Client::builder()
            .user_agent(concat!("SentinelRS/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            upload_timeout: config.upload_timeout,
        })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET to the endpoint named by `segments`.
    ///
    /// # Arguments
    /// * `segments` - Path segments appended to the base URL, e.g. `["urls", id]`.
    ///
    /// # Returns
    /// The 2xx reply with its body as text. 429 is `RateLimited`, any other
    /// non-2xx status is `Rejected`, and timeouts and connection failures
    /// map to `Timeout` and `Network`.
    pub async fn get(&self, segments: &[&str]) -> Result<ServiceReply, TransportError> {
        let url = self.endpoint(segments)?;
        debug!(%url, "GET reputation endpoint.");
        let response = self.http.get(url).send().await?;
        read_reply(response).await
    }

    /// Uploads a file as a multipart form under the `file` field.
    ///
    /// The request runs under the upload deadline instead of the request timeout.
    /// Status handling matches [`VtClient::get`].
    pub async fn post_file(
        &self,
        segments: &[&str],
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<ServiceReply, TransportError> {
        let url = self.endpoint(segments)?;
        debug!(%url, filename, size = bytes.len(), "POST file upload.");

        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(url)
            .timeout(self.upload_timeout)
            .multipart(form)
            .send()
            .await?;
        read_reply(response).await
    }
}

async fn read_reply(response: Response) -> Result<ServiceReply, TransportError> {
    let status = response.status();
    let body = response.text().await?;

    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!(%status, "Reputation service rate limit hit.");
        return Err(TransportError::RateLimited { body });
    }
    if !status.is_success() {
        warn!(%status, "Reputation service rejected the request.");
        return Err(TransportError::Rejected { status: status.as_u16(), body });
    }

    Ok(ServiceReply { status: status.as_u16(), body })
}
