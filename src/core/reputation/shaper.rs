// src/core/reputation/shaper.rs

//! Turns service replies and transport failures into `ScanOutcome` values.

use super::transport::{ServiceReply, TransportError};
use crate::core::models::{ReputationStats, ScanOutcome, UploadHandle};
use serde::Deserialize;
use strum::Display;

/// Which step of a lookup failed; used as the message prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    #[strum(to_string = "upload failed")]
    Upload,
    #[strum(to_string = "report fetch failed")]
    Report,
}

#[derive(Deserialize)]
struct ReportEnvelope {
    data: Option<ReportData>,
}

#[derive(Deserialize)]
struct ReportData {
    attributes: ReportAttributes,
}

#[derive(Deserialize)]
struct ReportAttributes {
    last_analysis_stats: ReputationStats,
}

#[derive(Deserialize)]
struct UploadEnvelope {
    data: Option<UploadData>,
}

#[derive(Deserialize)]
struct UploadData {
    id: Option<String>,
}

/// Shapes a 2xx report reply.
///
/// A `data` object yields a `Report` only if all four counters are present;
/// anything short of that is a `TransientError`, never a partial report.
pub fn shape_report(reply: &ServiceReply) -> ScanOutcome {
    match serde_json::from_str::<ReportEnvelope>(&reply.body) {
        Ok(ReportEnvelope { data: Some(data) }) => ScanOutcome::report(data.attributes.last_analysis_stats),
        Ok(ReportEnvelope { data: None }) => ScanOutcome::NoReport(format!(
            "HTTP {} without analysis data: {}",
            reply.status,
            reply.body.trim()
        )),
        Err(e) => ScanOutcome::TransientError(format!(
            "{}: unexpected response from the service: {}",
            Stage::Report,
            e
        )),
    }
}

/// Extracts the upload handle from a 2xx upload reply.
pub fn shape_upload(reply: &ServiceReply) -> Result<UploadHandle, String> {
    let id = serde_json::from_str::<UploadEnvelope>(&reply.body)
        .ok()
        .and_then(|envelope| envelope.data)
        .and_then(|data| data.id)
        .filter(|id| !id.is_empty());

    match id {
        Some(id) => Ok(UploadHandle::new(id)),
        None => Err(format!(
            "{}: HTTP {} without an upload id: {}",
            Stage::Upload,
            reply.status,
            reply.body.trim()
        )),
    }
}

/// Turns a transport failure into a `TransientError` labelled with the stage
/// it happened in, e.g. `upload failed: rate limit exceeded (HTTP 429): ...`.
///
/// # Arguments
/// * `stage` - Whether the upload or the report fetch failed.
/// * `error` - The transport error; its message is kept verbatim.
pub fn shape_failure(stage: Stage, error: &TransportError) -> ScanOutcome {
    ScanOutcome::TransientError(format!("{}: {}", stage, error))
}
