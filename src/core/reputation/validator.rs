// src/core/reputation/validator.rs

use crate::config::ConfigError;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use reqwest::{redirect, Client, Method};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;
use tracing::debug;
use url::Url;

const MAX_REDIRECTS: usize = 10;

/// Parses `candidate` as an absolute URL that has both a scheme and a host.
pub fn parse_absolute_url(candidate: &str) -> Option<Url> {
    Url::parse(candidate).ok().filter(|url| url.has_host())
}

/// Best-effort reachability check for URLs before they are submitted.
///
/// Uses its own client so the service credential never travels to the probed host.
pub struct UrlProber {
    client: Client,
}

impl UrlProber {
    /// Builds a keyless client that follows up to 10 redirects.
    ///
    /// # Arguments
    /// * `timeout` - Deadline for each individual probe request.
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .user_agent(concat!("SentinelRS/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }

    /// True when the URL is well formed and answers a HEAD or, failing that,
    /// a GET with a 2xx or 3xx status.
    pub async fn is_eligible_url(&self, candidate: &str) -> bool {
        let Some(url) = parse_absolute_url(candidate) else {
            debug!(candidate, "URL rejected: missing scheme or host.");
            return false;
        };

        // Some servers refuse HEAD outright, so GET gets a second chance.
        self.probe(Method::HEAD, &url).await || self.probe(Method::GET, &url).await
    }

    async fn probe(&self, method: Method, url: &Url) -> bool {
        match self.client.request(method.clone(), url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                debug!(%url, %method, %status, "Reachability probe answered.");
                status.is_success() || status.is_redirection()
            }
            Err(e) => {
                debug!(%url, %method, error = %e, "Reachability probe failed.");
                false
            }
        }
    }
}

/// Parses `candidate` and keeps it only if it is a globally routable address.
pub fn eligible_ip(candidate: &str) -> Option<IpAddr> {
    candidate.parse::<IpAddr>().ok().filter(is_global)
}

/// True when `candidate` parses as an IP address that is publicly routable.
///
/// Private, loopback, link-local, shared, documentation, benchmarking,
/// reserved, multicast, unspecified and IPv4-mapped addresses are all
/// rejected.
pub fn is_eligible_ip(candidate: &str) -> bool {
    eligible_ip(candidate).is_some()
}

/// True iff `0 < len <= max_megabytes MiB`.
pub fn is_eligible_file(bytes: &[u8], max_megabytes: u64) -> bool {
    let len = bytes.len() as u64;
    len > 0 && len <= max_megabytes.saturating_mul(1024 * 1024)
}

fn is_global(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_global_v4(v4),
        IpAddr::V6(v6) => is_global_v6(v6),
    }
}

fn is_global_v4(ip: &Ipv4Addr) -> bool {
    let o = ip.octets();
    let shared = o[0] == 100 && (o[1] & 0xc0) == 64; // 100.64.0.0/10
    let protocol_assignments = o[0] == 192 && o[1] == 0 && o[2] == 0 && !matches!(o[3], 9 | 10);
    let benchmarking = o[0] == 198 && (o[1] & 0xfe) == 18; // 198.18.0.0/15
    let reserved = o[0] >= 240;

    !(o[0] == 0
        || ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_documentation()
        || ip.is_multicast()
        || shared
        || protocol_assignments
        || benchmarking
        || reserved)
}

fn is_global_v6(ip: &Ipv6Addr) -> bool {
    let s = ip.segments();

    let ietf_protocol = s[0] == 0x2001 && s[1] < 0x200; // 2001::/23
    let ietf_global_exceptions = (s[0] == 0x2001 && s[1] == 1 && s[2..7] == [0; 5] && matches!(s[7], 1 | 2))
        || (s[0] == 0x2001 && s[1] == 3)
        || (s[0] == 0x2001 && s[1] == 4 && s[2] == 0x112)
        || (s[0] == 0x2001 && matches!(s[1] & 0xfff0, 0x20 | 0x30));

    !(ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_multicast()
        || ip.to_ipv4_mapped().is_some()
        || (s[0] == 0x64 && s[1] == 0xff9b && s[2] == 1) // 64:ff9b:1::/48
        || (s[0] == 0x100 && s[1..4] == [0; 3]) // 100::/64 discard-only
        || (ietf_protocol && !ietf_global_exceptions)
        || (s[0] == 0x2001 && s[1] == 0xdb8) // documentation
        || (s[0] == 0x3fff && (s[1] & 0xf000) == 0) // documentation
        || s[0] == 0x2002 // 6to4
        || (s[0] & 0xfe00) == 0xfc00 // unique local
        || (s[0] & 0xffc0) == 0xfe80) // link local
}
