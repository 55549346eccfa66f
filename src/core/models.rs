// src/core/models.rs

use serde::{Deserialize, Serialize};
use std::fmt;

// --- Scan Targets ---

// The three kinds of resource the reputation service can be asked about.
// Created per request and discarded once the outcome is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    Url(String),
    IpAddress(String),
    FileBlob { bytes: Vec<u8>, filename: String },
}

impl ScanTarget {
    // A short label for logs; file contents are never printed.
    pub fn label(&self) -> String {
        match self {
            ScanTarget::Url(url) => url.clone(),
            ScanTarget::IpAddress(ip) => ip.clone(),
            ScanTarget::FileBlob { bytes, filename } => format!("{} ({} bytes)", filename, bytes.len()),
        }
    }
}

// Identifier handed back by the files endpoint after an upload. It is only
// meaningful inside the file scan that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadHandle(String);

impl UploadHandle {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// --- Reputation Data ---

/// Engine-vote counters from the service's last analysis.
///
/// All four fields are required when deserializing, so a report is either
/// complete or rejected as malformed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReputationStats {
    pub malicious: u32,
    pub suspicious: u32,
    pub harmless: u32,
    pub undetected: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Alert,
    Safe,
}

impl ReputationStats {
    pub fn risk(&self) -> RiskLevel {
        if self.malicious > 0 || self.suspicious > 2 {
            RiskLevel::Alert
        } else {
            RiskLevel::Safe
        }
    }

    /// Sum of all four counters. Widened so service-supplied values cannot overflow.
    pub fn total(&self) -> u64 {
        self.flagged() + u64::from(self.harmless) + u64::from(self.undetected)
    }

    /// Engines that voted malicious or suspicious.
    pub fn flagged(&self) -> u64 {
        u64::from(self.malicious) + u64::from(self.suspicious)
    }

    /// Share of engines that flagged the resource, in percent (0 to 100).
    pub fn detection_ratio(&self) -> u16 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        ((self.flagged() * 100) / total) as u16
    }
}

// --- Outcomes ---

// Why a target was rejected before any request to the service was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ineligibility {
    Url,
    Ip,
    File { size: usize, limit_mb: u64 },
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::Url => write!(f, "URL is malformed or not reachable"),
            Ineligibility::Ip => write!(f, "IP address is invalid or not publicly routable"),
            Ineligibility::File { size, limit_mb } => write!(
                f,
                "upload rejected: file must be between 1 byte and {} MiB (got {} bytes)",
                limit_mb, size
            ),
        }
    }
}

/// The single result type of every reputation lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Local validation rejected the target; nothing was sent.
    Ineligible(Ineligibility),
    /// The service holds an analysis. `resource_id` is set by the file flow.
    Report {
        stats: ReputationStats,
        resource_id: Option<String>,
    },
    /// The service answered but has no analysis for the target.
    NoReport(String),
    /// Rate limit, rejected request or transport failure.
    TransientError(String),
}

impl ScanOutcome {
    pub fn report(stats: ReputationStats) -> Self {
        ScanOutcome::Report { stats, resource_id: None }
    }

    /// Attaches the resolved identifier to a report; other outcomes pass through.
    pub fn with_resource_id(self, id: impl Into<String>) -> Self {
        match self {
            ScanOutcome::Report { stats, .. } => ScanOutcome::Report {
                stats,
                resource_id: Some(id.into()),
            },
            other => other,
        }
    }

    pub fn stats(&self) -> Option<&ReputationStats> {
        match self {
            ScanOutcome::Report { stats, .. } => Some(stats),
            _ => None,
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanOutcome::Ineligible(reason) => write!(f, "ineligible: {}", reason),
            ScanOutcome::Report { stats, .. } => write!(
                f,
                "report: malicious={} suspicious={} harmless={} undetected={}",
                stats.malicious, stats.suspicious, stats.harmless, stats.undetected
            ),
            ScanOutcome::NoReport(detail) => write!(f, "no report: {}", detail),
            ScanOutcome::TransientError(message) => write!(f, "error: {}", message),
        }
    }
}

// --- WAF Fingerprint Models ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WafVerdict {
    Detected {
        site: String,
        primary: String,
        secondary: Option<String>,
    },
    NotDetected,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WafResults {
    pub target: String,
    pub verdict: Result<WafVerdict, String>,
    pub requests: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(malicious: u32, suspicious: u32) -> ReputationStats {
        ReputationStats { malicious, suspicious, harmless: 60, undetected: 10 }
    }

    #[test]
    fn any_malicious_vote_is_an_alert() {
        assert_eq!(stats(1, 0).risk(), RiskLevel::Alert);
    }

    #[test]
    fn suspicious_votes_alert_above_two() {
        assert_eq!(stats(0, 2).risk(), RiskLevel::Safe);
        assert_eq!(stats(0, 3).risk(), RiskLevel::Alert);
    }

    #[test]
    fn detection_ratio_handles_empty_stats() {
        assert_eq!(ReputationStats::default().detection_ratio(), 0);
        let s = ReputationStats { malicious: 5, suspicious: 5, harmless: 80, undetected: 10 };
        assert_eq!(s.detection_ratio(), 10);
    }

    #[test]
    fn counters_near_u32_max_do_not_overflow() {
        let s = ReputationStats { malicious: u32::MAX, suspicious: 1, harmless: u32::MAX, undetected: u32::MAX };
        assert_eq!(s.flagged(), u64::from(u32::MAX) + 1);
        assert_eq!(s.total(), 3 * u64::from(u32::MAX) + 1);
        assert_eq!(s.detection_ratio(), 33);
        assert_eq!(s.risk(), RiskLevel::Alert);

        let all_flagged = ReputationStats { malicious: u32::MAX, suspicious: u32::MAX, harmless: 0, undetected: 0 };
        assert_eq!(all_flagged.detection_ratio(), 100);
    }

    #[test]
    fn resource_id_only_attaches_to_reports() {
        let report = ScanOutcome::report(stats(0, 0)).with_resource_id("abc");
        assert!(matches!(report, ScanOutcome::Report { resource_id: Some(ref id), .. } if id == "abc"));

        let missing = ScanOutcome::NoReport("pending".into()).with_resource_id("abc");
        assert_eq!(missing, ScanOutcome::NoReport("pending".into()));
    }

    #[test]
    fn file_blob_label_hides_contents() {
        let target = ScanTarget::FileBlob { bytes: vec![1, 2, 3], filename: "a.bin".into() };
        assert_eq!(target.label(), "a.bin (3 bytes)");
    }
}
