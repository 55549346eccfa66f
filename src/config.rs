// src/config.rs

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default reputation-service endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.virustotal.com/api/v3";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 300;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_MAX_FILE_MB: u64 = 32;
const DEFAULT_WAF_TIMEOUT_SECS: u64 = 3;
const DEFAULT_WAFW00F_BIN: &str = "wafw00f";

/// Errors raised while building the configuration or the clients that consume it.
/// These are the only failures allowed to abort construction.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("VT_API_KEY is not set. Cannot send requests to the reputation service.")]
    MissingApiKey,

    #[error("VT_API_KEY contains characters that are not valid in an HTTP header")]
    InvalidApiKey,

    #[error("Invalid base URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    #[error("Invalid value for {key}: '{value}' is not a positive integer")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Runtime settings for the reputation scanner and the auxiliary tools.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: Url,
    pub request_timeout: Duration,
    /// Deadline for a file upload, body transfer included.
    pub upload_timeout: Duration,
    pub probe_timeout: Duration,
    pub max_file_megabytes: u64,
    pub wafw00f_bin: String,
    pub waf_timeout_secs: u64,
}

impl Config {
    /// Builds a configuration with defaults for everything but the credential.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            upload_timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            max_file_megabytes: DEFAULT_MAX_FILE_MB,
            wafw00f_bin: DEFAULT_WAFW00F_BIN.to_string(),
            waf_timeout_secs: DEFAULT_WAF_TIMEOUT_SECS,
        })
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(lookup("VT_API_KEY").unwrap_or_default())?;

        if let Some(base) = lookup("VT_API_BASE_URL") {
            config.base_url = parse_base_url(&base)?;
        }
        if let Some(secs) = read_number(&lookup, "SENTINEL_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = read_number(&lookup, "SENTINEL_UPLOAD_TIMEOUT_SECS")? {
            config.upload_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = read_number(&lookup, "SENTINEL_PROBE_TIMEOUT_SECS")? {
            config.probe_timeout = Duration::from_secs(secs);
        }
        if let Some(mb) = read_number(&lookup, "SENTINEL_MAX_FILE_MB")? {
            config.max_file_megabytes = mb;
        }
        if let Some(secs) = read_number(&lookup, "SENTINEL_WAF_TIMEOUT_SECS")? {
            config.waf_timeout_secs = secs;
        }
        if let Some(bin) = lookup("SENTINEL_WAFW00F_BIN").filter(|b| !b.trim().is_empty()) {
            config.wafw00f_bin = bin;
        }

        Ok(config)
    }

    /// Points the scanner at another service root (used by tests and proxies).
    pub fn with_base_url(mut self, base: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base)?;
        Ok(self)
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl {
            value: value.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

fn read_number<F>(lookup: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(ConfigError::InvalidNumber { key, value: raw }),
        },
    }
}
