//! Domain entities and the COPPA compliance policy engine.

#![forbid(unsafe_code)]

mod account;
mod compliance;
mod data_minimization;
mod guardian_email;
mod preferences;
mod privacy_notice;
mod redaction;
mod retention;
mod security;
mod text_sanitizer;
mod upload_limits;

pub use account::{
    Account, AccountId, DISPLAY_NAME_MAX_LENGTH, DISPLAY_NAME_MIN_LENGTH, DisplayName,
    GuardianPermissions,
};
pub use compliance::{
    COPPA_AGE_THRESHOLD, ComplianceDecision, CompliancePolicy, MAX_PLAUSIBLE_AGE,
    MAX_RETENTION_DAYS, MINOR_RETENTION_DAYS, RetentionSchedule, STANDARD_RETENTION_DAYS,
    evaluate_compliance, is_regulated_minor,
};
pub use data_minimization::{
    PROHIBITED_REQUEST_FIELDS, find_prohibited_fields, is_data_minimized, strip_prohibited_fields,
};
pub use guardian_email::{CHILD_EMAIL_DOMAINS, validate_guardian_email};
pub use preferences::{
    AccountPreferences, ColorTheme, FontSize, MAX_FAVORITE_THEMES, ReadingLevel, StoryTheme,
};
pub use privacy_notice::privacy_notice;
pub use redaction::{AccountView, REDACTED_ACCOUNT_FIELDS, RedactedAccount, redact_for_minor};
pub use retention::is_data_expired;
pub use security::{
    Allowed, ComplianceAuditAction, DeniedReason, SensitiveOperation, is_permitted_operation,
};
pub use text_sanitizer::sanitize_text_content;
pub use upload_limits::{
    DRAWING_MAX_BYTES, VOICE_RECORDING_MAX_BYTES, fits_upload_limit, validate_upload_size,
};
