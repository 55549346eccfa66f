// src/core/reputation/encoder.rs

//! Resource identifiers in the service's addressing scheme.

use crate::core::models::UploadHandle;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use thiserror::Error;

/// Upload handles come back as standard base64; padding is not always present.
const HANDLE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const SEPARATOR: u8 = b':';

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodeError {
    #[error("upload handle is not valid base64: {0}")]
    InvalidHandle(String),

    #[error("decoded identifier is not valid UTF-8")]
    NotUtf8,

    #[error("decoded identifier is empty")]
    Empty,
}

/// URL-safe base64 of the URL bytes with `=` padding stripped.
pub fn url_identifier(url: &str) -> String {
    URL_SAFE_NO_PAD.encode(url.as_bytes())
}

/// Derives the file report identifier from an upload handle.
///
/// The handle decodes to `<id>:<suffix>`; only the part before the first `:`
/// addresses the report. A handle without a separator is used whole.
pub fn report_identifier(handle: &UploadHandle) -> Result<String, EncodeError> {
    let decoded = HANDLE_ENGINE
        .decode(handle.as_str())
        .map_err(|e| EncodeError::InvalidHandle(e.to_string()))?;

    let prefix = decoded.split(|b| *b == SEPARATOR).next().unwrap_or_default();
    let id = String::from_utf8(prefix.to_vec()).map_err(|_| EncodeError::NotUtf8)?;

    if id.is_empty() {
        return Err(EncodeError::Empty);
    }
    Ok(id)
}
