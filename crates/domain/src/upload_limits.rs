//! Size limits for child media uploads.

use storyteller_core::{AppError, AppResult};

use crate::security::SensitiveOperation;

const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

/// Largest decoded drawing upload, in bytes.
pub const DRAWING_MAX_BYTES: u64 = 5 * BYTES_PER_MEGABYTE;

/// Largest decoded voice recording upload, in bytes.
pub const VOICE_RECORDING_MAX_BYTES: u64 = 10 * BYTES_PER_MEGABYTE;

impl SensitiveOperation {
    /// Returns the decoded byte limit for operations that carry a media payload.
    #[must_use]
    pub fn upload_limit_bytes(&self) -> Option<u64> {
        match self {
            Self::DrawingUpload => Some(DRAWING_MAX_BYTES),
            Self::VoiceRecording => Some(VOICE_RECORDING_MAX_BYTES),
            Self::ProfileUpdate | Self::DataExport => None,
        }
    }
}

/// Returns whether a base64 payload decodes to at most `max_bytes`.
///
/// The decoded size is estimated as three bytes per four encoded characters
/// over the whole string, data URL prefix included.
#[must_use]
pub fn fits_upload_limit(base64_payload: &str, max_bytes: u64) -> bool {
    let encoded_len = u64::try_from(base64_payload.len()).unwrap_or(u64::MAX);
    encoded_len.saturating_mul(3) <= max_bytes.saturating_mul(4)
}

/// Checks an upload payload against the limit of its operation.
///
/// Operations without a media payload always pass.
pub fn validate_upload_size(operation: SensitiveOperation, base64_payload: &str) -> AppResult<()> {
    let Some(max_bytes) = operation.upload_limit_bytes() else {
        return Ok(());
    };

    if fits_upload_limit(base64_payload, max_bytes) {
        return Ok(());
    }

    Err(AppError::Validation(format!(
        "{} exceeds the allowed size of {} MB",
        operation.label(),
        max_bytes / BYTES_PER_MEGABYTE
    )))
}
