// src/core/tools/waf_detector.rs

use crate::core::models::{WafResults, WafVerdict};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, error, info};

// Patterns for the plain-text (`--no-colors`) output of wafw00f.
static RE_WAF_FOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\+\] The site (https?://\S+) is behind (.+?)(?: and/or (.+?))? WAF\.").unwrap()
});
static RE_WAF_NOT_FOUND: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[-\]").unwrap());
static RE_REQUESTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[~\] Number of requests: (\d+)").unwrap());

/// Fingerprints web application firewalls by driving the `wafw00f` tool.
pub struct WafDetector {
    binary: String,
    timeout_secs: u64,
}

impl WafDetector {
    pub fn new(binary: impl Into<String>, timeout_secs: u64) -> Self {
        Self { binary: binary.into(), timeout_secs }
    }

    /// Runs `wafw00f -a -T <secs> --no-colors <url>` and parses its report.
    pub async fn detect(&self, url: &str) -> WafResults {
        info!(url = url, binary = %self.binary, "Starting WAF fingerprint.");

        let output = Command::new(&self.binary)
            .arg("-a")
            .arg("-T")
            .arg(self.timeout_secs.to_string())
            .arg("--no-colors")
            .arg(url)
            .kill_on_drop(true)
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                error!(binary = %self.binary, error = %e, "Failed to run WAF fingerprinting tool.");
                return WafResults {
                    target: url.to_string(),
                    verdict: Err(format!("failed to run {}: {}", self.binary, e)),
                    requests: None,
                };
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(status = %output.status, bytes = stdout.len(), "WAF fingerprinting tool finished.");

        let (verdict, requests) = parse_wafw00f_output(&stdout);
        info!(url = url, verdict = ?verdict, "WAF fingerprint finished.");
        WafResults { target: url.to_string(), verdict: Ok(verdict), requests }
    }
}

/// Reads the verdict and request count out of wafw00f's report.
pub fn parse_wafw00f_output(output: &str) -> (WafVerdict, Option<u32>) {
    let requests = RE_REQUESTS
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok());

    let verdict = if let Some(caps) = RE_WAF_FOUND.captures(output) {
        WafVerdict::Detected {
            site: caps[1].to_string(),
            primary: caps[2].trim().to_string(),
            secondary: caps.get(3).map(|m| m.as_str().trim().to_string()),
        }
    } else if RE_WAF_NOT_FOUND.is_match(output) {
        WafVerdict::NotDetected
    } else {
        WafVerdict::Unreachable
    };

    (verdict, requests)
}
