// src/core/reputation/mod.rs

// Reputation lookups against the external scanning service.
pub mod encoder;
pub mod shaper;
pub mod transport;
pub mod validator;

use crate::config::{Config, ConfigError};
use crate::core::models::{Ineligibility, ScanOutcome, ScanTarget};
use self::shaper::Stage;
use self::transport::VtClient;
use self::validator::UrlProber;
use tracing::{info, warn};

/// Runs URL, IP and file lookups.
///
/// Each flow is linear: validate locally, talk to the service, shape the reply.
/// Nothing is retried and no failure escapes as an error; the caller always
/// gets a `ScanOutcome`.
pub struct ReputationScanner {
    client: VtClient,
    prober: UrlProber,
    max_file_megabytes: u64,
}

impl ReputationScanner {
    /// Builds the authenticated service client and the keyless reachability prober.
    ///
    /// # Errors
    /// Fails with `ConfigError::MissingApiKey` when the credential is blank, or when
    /// either HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            client: VtClient::new(config)?,
            prober: UrlProber::new(config.probe_timeout)?,
            max_file_megabytes: config.max_file_megabytes,
        })
    }

    /// Dispatches a target to the matching lookup flow.
    pub async fn scan(&self, target: ScanTarget) -> ScanOutcome {
        match target {
            ScanTarget::Url(url) => self.scan_url(&url).await,
            ScanTarget::IpAddress(ip) => self.scan_ip(&ip).await,
            ScanTarget::FileBlob { bytes, filename } => self.scan_file(bytes, &filename).await,
        }
    }

    /// Looks up the reputation of a URL.
    ///
    /// The URL must parse with a scheme and host and answer a reachability probe
    /// before anything is sent to the service. The report is addressed by the
    /// unpadded URL-safe base64 of the URL text.
    ///
    /// # Arguments
    /// * `url` - The absolute URL as typed by the user.
    ///
    /// # Returns
    /// `Ineligible(Url)` without contacting the service when validation fails,
    /// otherwise the shaped report reply.
    pub async fn scan_url(&self, url: &str) -> ScanOutcome {
        info!(subject = url, "URL reputation lookup requested.");

        if !self.prober.is_eligible_url(url).await {
            warn!(subject = url, "URL failed validation, nothing submitted.");
            return ScanOutcome::Ineligible(Ineligibility::Url);
        }

        let id = encoder::url_identifier(url);
        let outcome = self.fetch_report(&["urls", &id]).await;
        log_outcome(url, &outcome);
        outcome
    }

    /// Looks up the reputation of a globally routable IPv4 or IPv6 address.
    ///
    /// # Arguments
    /// * `ip` - The address text, sent verbatim in the request path once it validates.
    ///
    /// # Returns
    /// `Ineligible(Ip)` for malformed, private, loopback, reserved or multicast
    /// addresses, otherwise the shaped report reply.
    pub async fn scan_ip(&self, ip: &str) -> ScanOutcome {
        info!(subject = ip, "IP reputation lookup requested.");

        if !validator::is_eligible_ip(ip) {
            warn!(subject = ip, "IP failed validation, nothing submitted.");
            return ScanOutcome::Ineligible(Ineligibility::Ip);
        }

        let outcome = self.fetch_report(&["ip_addresses", ip]).await;
        log_outcome(ip, &outcome);
        outcome
    }

    /// Uploads the blob, then fetches its report exactly once. An analysis that
    /// is still queued shows up as `NoReport`.
    pub async fn scan_file(&self, bytes: Vec<u8>, filename: &str) -> ScanOutcome {
        let size = bytes.len();
        info!(subject = filename, size, "File reputation lookup requested.");

        if !validator::is_eligible_file(&bytes, self.max_file_megabytes) {
            warn!(subject = filename, size, "File rejected before upload.");
            return ScanOutcome::Ineligible(Ineligibility::File {
                size,
                limit_mb: self.max_file_megabytes,
            });
        }

        let reply = match self.client.post_file(&["files"], bytes, filename).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(subject = filename, error = %e, "File upload failed.");
                return shaper::shape_failure(Stage::Upload, &e);
            }
        };

        let handle = match shaper::shape_upload(&reply) {
            Ok(handle) => handle,
            Err(message) => {
                warn!(subject = filename, "Upload reply carried no id.");
                return ScanOutcome::TransientError(message);
            }
        };

        let report_id = match encoder::report_identifier(&handle) {
            Ok(id) => id,
            Err(e) => {
                warn!(subject = filename, handle = handle.as_str(), error = %e, "Could not decode upload handle.");
                return ScanOutcome::TransientError(format!("{}: {}", Stage::Report, e));
            }
        };
        info!(subject = filename, resource = %report_id, "File uploaded, fetching report.");

        let outcome = self.fetch_report(&["files", &report_id]).await;
        let outcome = outcome.with_resource_id(report_id);
        log_outcome(filename, &outcome);
        outcome
    }

    async fn fetch_report(&self, segments: &[&str]) -> ScanOutcome {
        match self.client.get(segments).await {
            Ok(reply) => shaper::shape_report(&reply),
            Err(e) => shaper::shape_failure(Stage::Report, &e),
        }
    }
}

fn log_outcome(subject: &str, outcome: &ScanOutcome) {
    match outcome {
        ScanOutcome::Report { .. } => info!(subject, %outcome, "Report acquired."),
        _ => warn!(subject, %outcome, "No report acquired."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ReputationStats;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn stats_body(malicious: u32, suspicious: u32, harmless: u32, undetected: u32) -> serde_json::Value {
        json!({
            "data": {
                "attributes": {
                    "last_analysis_stats": {
                        "malicious": malicious,
                        "suspicious": suspicious,
                        "harmless": harmless,
                        "undetected": undetected
                    }
                }
            }
        })
    }

    fn scanner_for(server: &MockServer) -> ReputationScanner {
        let config = Config::new("test-key")
            .unwrap()
            .with_base_url(&format!("{}/api/v3", server.uri()))
            .unwrap();
        ReputationScanner::new(&config).unwrap()
    }

    async fn api_requests(server: &MockServer) -> Vec<wiremock::Request> {
        server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.url.path().starts_with("/api/v3/"))
            .collect()
    }

    #[test]
    fn missing_key_is_a_construction_error() {
        let mut config = Config::new("k").unwrap();
        config.api_key = String::new();
        assert!(matches!(ReputationScanner::new(&config), Err(ConfigError::MissingApiKey)));
    }

    #[tokio::test]
    async fn url_report_is_returned() {
        let server = MockServer::start().await;
        let target = format!("{}/landing", server.uri());

        Mock::given(method("HEAD"))
            .and(path("/landing"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/api/v3/urls/{}", encoder::url_identifier(&target))))
            .and(header("x-apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_body(0, 0, 70, 5)))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = scanner_for(&server).scan_url(&target).await;
        assert_eq!(
            outcome,
            ScanOutcome::report(ReputationStats { malicious: 0, suspicious: 0, harmless: 70, undetected: 5 })
        );
    }

    #[tokio::test]
    async fn unreachable_url_is_not_submitted() {
        let server = MockServer::start().await;
        let outcome = scanner_for(&server).scan_url("http://127.0.0.1:1/nowhere").await;

        assert_eq!(outcome, ScanOutcome::Ineligible(Ineligibility::Url));
        assert!(api_requests(&server).await.is_empty());
    }

    #[tokio::test]
    async fn ip_without_data_is_no_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/ip_addresses/8.8.8.8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"meta": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = scanner_for(&server).scan_ip("8.8.8.8").await;
        assert!(matches!(outcome, ScanOutcome::NoReport(_)));
    }

    #[tokio::test]
    async fn ip_path_uses_the_address_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/ip_addresses/2001:4860:4860::8888"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_body(1, 0, 60, 9)))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = scanner_for(&server).scan_ip("2001:4860:4860::8888").await;
        assert_eq!(outcome.stats().map(|s| s.malicious), Some(1));
    }

    #[tokio::test]
    async fn private_ip_is_not_submitted() {
        let server = MockServer::start().await;
        let outcome = scanner_for(&server).scan_ip("192.168.0.10").await;

        assert_eq!(outcome, ScanOutcome::Ineligible(Ineligibility::Ip));
        assert!(api_requests(&server).await.is_empty());
    }

    #[tokio::test]
    async fn rate_limit_is_transient_for_every_flow() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(path("/api/v3/urls/".to_string() + &encoder::url_identifier(&format!("{}/page", server.uri()))))
            .respond_with(ResponseTemplate::new(429).set_body_string("QuotaExceededError"))
            .mount(&server)
            .await;
        Mock::given(path("/api/v3/ip_addresses/1.1.1.1"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        Mock::given(path("/api/v3/files"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let scanner = scanner_for(&server);
        let outcomes = [
            scanner.scan_url(&format!("{}/page", server.uri())).await,
            scanner.scan_ip("1.1.1.1").await,
            scanner.scan_file(b"payload".to_vec(), "a.bin").await,
        ];
        for outcome in outcomes {
            match outcome {
                ScanOutcome::TransientError(message) => assert!(message.contains("rate limit"), "{}", message),
                other => panic!("expected TransientError, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn empty_file_is_rejected_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = scanner_for(&server).scan_file(Vec::new(), "empty.txt").await;
        assert_eq!(outcome, ScanOutcome::Ineligible(Ineligibility::File { size: 0, limit_mb: 32 }));
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn file_report_targets_the_decoded_prefix() {
        let server = MockServer::start().await;
        let handle = STANDARD.encode("e4b681fbfb48f19a92b1460b93f42106:1619362242");

        Mock::given(method("POST"))
            .and(path("/api/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"type": "analysis", "id": handle}})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v3/files/e4b681fbfb48f19a92b1460b93f42106"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_body(3, 1, 10, 50)))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = scanner_for(&server).scan_file(b"X5O!P%@AP".to_vec(), "eicar.com").await;
        assert_eq!(
            outcome,
            ScanOutcome::Report {
                stats: ReputationStats { malicious: 3, suspicious: 1, harmless: 10, undetected: 50 },
                resource_id: Some("e4b681fbfb48f19a92b1460b93f42106".to_string()),
            }
        );

        let requests = api_requests(&server).await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].url.path(), "/api/v3/files/e4b681fbfb48f19a92b1460b93f42106");
    }

    #[tokio::test]
    async fn pending_analysis_is_no_report() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": STANDARD.encode("abc123:1")}})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v3/files/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = scanner_for(&server).scan_file(b"data".to_vec(), "a.bin").await;
        assert!(matches!(outcome, ScanOutcome::NoReport(_)));
    }

    #[tokio::test]
    async fn upload_and_report_failures_are_distinguishable() {
        let upload_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&upload_server)
            .await;
        let upload_outcome = scanner_for(&upload_server).scan_file(b"data".to_vec(), "a.bin").await;

        let report_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": STANDARD.encode("abc:1")}})))
            .mount(&report_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&report_server)
            .await;
        let report_outcome = scanner_for(&report_server).scan_file(b"data".to_vec(), "a.bin").await;

        assert!(matches!(upload_outcome, ScanOutcome::TransientError(ref m) if m.starts_with("upload failed")));
        assert!(matches!(report_outcome, ScanOutcome::TransientError(ref m) if m.starts_with("report fetch failed")));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_report_stage_error() {
        let config = Config::new("test-key")
            .unwrap()
            .with_base_url("http://127.0.0.1:1/api/v3")
            .unwrap();
        let outcome = ReputationScanner::new(&config).unwrap().scan_ip("8.8.8.8").await;
        assert!(
            matches!(outcome, ScanOutcome::TransientError(ref m) if m.starts_with("report fetch failed: ")),
            "{:?}",
            outcome
        );
    }

    #[tokio::test]
    async fn null_data_is_no_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/ip_addresses/9.9.9.9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = scanner_for(&server).scan_ip("9.9.9.9").await;
        assert!(matches!(outcome, ScanOutcome::NoReport(_)));
    }

    #[tokio::test]
    async fn oversize_file_is_rejected_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = Config::new("test-key")
            .unwrap()
            .with_base_url(&format!("{}/api/v3", server.uri()))
            .unwrap();
        config.max_file_megabytes = 1;
        let size = 1024 * 1024 + 1;
        let outcome = ReputationScanner::new(&config)
            .unwrap()
            .scan_file(vec![0u8; size], "big.iso")
            .await;

        assert_eq!(outcome, ScanOutcome::Ineligible(Ineligibility::File { size, limit_mb: 1 }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn scan_dispatches_on_target_kind() {
        let server = MockServer::start().await;
        let outcome = scanner_for(&server).scan(ScanTarget::IpAddress("127.0.0.1".into())).await;
        assert_eq!(outcome, ScanOutcome::Ineligible(Ineligibility::Ip));
    }
}
