//! Static, read-only catalog of every verdict a lookup can end in,
//! with the wording shown to the user and a link builder for the
//! service's own report pages.

use crate::core::models::{Ineligibility, RiskLevel, ScanOutcome};
use sha2::{Digest, Sha256};
use std::fmt;

/// Root of the service's web interface.
pub const GUI_BASE_URL: &str = "https://www.virustotal.com/gui";

/// The distinct ways a lookup can end, as presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictKind {
    Alert,
    Safe,
    NoReport,
    Ineligible,
    UploadRejected,
    ServiceError,
}

impl fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictKind::Alert => write!(f, "Alert"),
            VerdictKind::Safe => write!(f, "Safe"),
            VerdictKind::NoReport => write!(f, "No Report"),
            VerdictKind::Ineligible => write!(f, "Ineligible"),
            VerdictKind::UploadRejected => write!(f, "Upload Rejected"),
            VerdictKind::ServiceError => write!(f, "Service Error"),
        }
    }
}

/// Human-readable text for one verdict.
pub struct VerdictDetail {
    pub kind: VerdictKind,
    pub title: &'static str,
    pub description: &'static str,
    pub advice: &'static str,
}

static VERDICTS: &[VerdictDetail] = &[
    VerdictDetail {
        kind: VerdictKind::Alert,
        title: "Flagged by security vendors",
        description: "At least one engine marked the target as malicious, or more than two engines found it suspicious.",
        advice: "Do not open, visit or run it. Follow the report link to see which engines flagged it and why.",
    },
    VerdictDetail {
        kind: VerdictKind::Safe,
        title: "No engine raised an alarm",
        description: "The last analysis found nothing malicious and at most two suspicious votes.",
        advice: "A clean report is not a guarantee. New threats are often undetected for a while, so stay sharp.",
    },
    VerdictDetail {
        kind: VerdictKind::NoReport,
        title: "No report on record",
        description: "The service answered but holds no analysis for this target yet. Freshly uploaded files may still be queued.",
        advice: "Try again in a few minutes, or request a scan directly on the service's website.",
    },
    VerdictDetail {
        kind: VerdictKind::Ineligible,
        title: "Target rejected",
        description: "The input failed local checks: the URL is malformed or unreachable, or the IP address is invalid or not publicly routable.",
        advice: "Check the spelling. URLs need a scheme such as https://, and private or reserved addresses cannot be looked up.",
    },
    VerdictDetail {
        kind: VerdictKind::UploadRejected,
        title: "File not uploaded",
        description: "The file is empty or larger than the upload limit, so it was never sent.",
        advice: "Submit a non-empty file within the size limit, or upload large files through the service's website.",
    },
    VerdictDetail {
        kind: VerdictKind::ServiceError,
        title: "Lookup failed",
        description: "The service could not be reached, rejected the request, or the request rate limit was exceeded.",
        advice: "Wait a moment and try again. Repeated rate-limit errors mean the API quota is used up for now.",
    },
];

/// Classifies an outcome for display.
///
/// Reports split on the risk rule, and a rejected file gets its own kind
/// so the advice can mention the upload limit.
pub fn verdict_kind(outcome: &ScanOutcome) -> VerdictKind {
    match outcome {
        ScanOutcome::Report { stats, .. } => match stats.risk() {
            RiskLevel::Alert => VerdictKind::Alert,
            RiskLevel::Safe => VerdictKind::Safe,
        },
        ScanOutcome::NoReport(_) => VerdictKind::NoReport,
        ScanOutcome::Ineligible(Ineligibility::File { .. }) => VerdictKind::UploadRejected,
        ScanOutcome::Ineligible(_) => VerdictKind::Ineligible,
        ScanOutcome::TransientError(_) => VerdictKind::ServiceError,
    }
}

/// Retrieves the detail for a verdict from the catalog.
pub fn get_verdict_detail(kind: VerdictKind) -> Option<&'static VerdictDetail> {
    VERDICTS.iter().find(|v| v.kind == kind)
}

/// Catalog entry for an outcome. Shorthand for `get_verdict_detail(verdict_kind(outcome))`.
pub fn verdict_for(outcome: &ScanOutcome) -> Option<&'static VerdictDetail> {
    get_verdict_detail(verdict_kind(outcome))
}

/// What a permalink points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Url,
    IpAddress,
    File,
}

/// Link to the service's page for a resource. URLs are addressed by the
/// SHA-256 of the URL text, files by their resolved identifier.
pub fn permalink(kind: ResourceKind, subject: &str) -> String {
    match kind {
        ResourceKind::Url => format!("{}/url/{}", GUI_BASE_URL, hex::encode(Sha256::digest(subject.as_bytes()))),
        ResourceKind::IpAddress => format!("{}/ip-address/{}", GUI_BASE_URL, subject),
        ResourceKind::File => format!("{}/file/{}", GUI_BASE_URL, subject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ReputationStats;

    #[test]
    fn every_verdict_has_an_entry() {
        for kind in [
            VerdictKind::Alert,
            VerdictKind::Safe,
            VerdictKind::NoReport,
            VerdictKind::Ineligible,
            VerdictKind::UploadRejected,
            VerdictKind::ServiceError,
        ] {
            assert!(get_verdict_detail(kind).is_some(), "missing {:?}", kind);
        }
    }

    #[test]
    fn outcomes_map_to_distinct_verdicts() {
        let alert = ScanOutcome::report(ReputationStats { malicious: 2, ..Default::default() });
        let safe = ScanOutcome::report(ReputationStats { harmless: 70, ..Default::default() });
        assert_eq!(verdict_kind(&alert), VerdictKind::Alert);
        assert_eq!(verdict_kind(&safe), VerdictKind::Safe);
        assert_eq!(verdict_kind(&ScanOutcome::NoReport(String::new())), VerdictKind::NoReport);
        assert_eq!(verdict_kind(&ScanOutcome::Ineligible(Ineligibility::Ip)), VerdictKind::Ineligible);
        assert_eq!(
            verdict_kind(&ScanOutcome::Ineligible(Ineligibility::File { size: 0, limit_mb: 32 })),
            VerdictKind::UploadRejected
        );
        assert_eq!(verdict_kind(&ScanOutcome::TransientError("x".into())), VerdictKind::ServiceError);
    }

    #[test]
    fn url_permalink_uses_sha256() {
        // sha256("https://example.com")
        assert_eq!(
            permalink(ResourceKind::Url, "https://example.com"),
            "https://www.virustotal.com/gui/url/100680ad546ce6a577f42f52df33b4cfdca756859e664b8d7de329b150d09ce9"
        );
    }

    #[test]
    fn ip_and_file_permalinks_embed_the_subject() {
        assert_eq!(permalink(ResourceKind::IpAddress, "8.8.8.8"), "https://www.virustotal.com/gui/ip-address/8.8.8.8");
        assert_eq!(permalink(ResourceKind::File, "abc"), "https://www.virustotal.com/gui/file/abc");
    }
}
