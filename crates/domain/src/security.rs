use std::str::FromStr;

use serde::{Deserialize, Serialize};
use storyteller_core::AppError;

use crate::account::Account;
use crate::compliance::CompliancePolicy;

/// Operations that need guardian permission beyond base consent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SensitiveOperation {
    /// Capturing a voice recording.
    VoiceRecording,
    /// Uploading a drawing.
    DrawingUpload,
    /// Editing the child's profile.
    ProfileUpdate,
    /// Exporting the child's data.
    DataExport,
}

impl SensitiveOperation {
    /// Returns the stable transport value for this operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VoiceRecording => "voice-recording",
            Self::DrawingUpload => "drawing-upload",
            Self::ProfileUpdate => "profile-update",
            Self::DataExport => "data-export",
        }
    }

    /// Returns a human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::VoiceRecording => "Voice recording",
            Self::DrawingUpload => "Drawing upload",
            Self::ProfileUpdate => "Profile update",
            Self::DataExport => "Data export",
        }
    }

    /// Returns all known sensitive operations.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[SensitiveOperation] = &[
            SensitiveOperation::VoiceRecording,
            SensitiveOperation::DrawingUpload,
            SensitiveOperation::ProfileUpdate,
            SensitiveOperation::DataExport,
        ];

        ALL
    }
}

impl FromStr for SensitiveOperation {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "voice-recording" => Ok(Self::VoiceRecording),
            "drawing-upload" => Ok(Self::DrawingUpload),
            "profile-update" => Ok(Self::ProfileUpdate),
            "data-export" => Ok(Self::DataExport),
            _ => Err(AppError::Validation(format!(
                "unknown sensitive operation '{value}'"
            ))),
        }
    }
}

/// Marker returned when a sensitive operation may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allowed;

/// Why a sensitive operation was refused.
///
/// These are expected policy outcomes, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeniedReason {
    /// A regulated minor has no guardian consent on file.
    ConsentRequired,
    /// A guardian consented but never configured capability settings.
    PermissionsNotConfigured,
    /// The guardian switched the capability off.
    OperationDisabledByGuardian,
}

impl DeniedReason {
    /// Returns the stable machine-readable reason code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConsentRequired => "consent_required",
            Self::PermissionsNotConfigured => "permissions_not_configured",
            Self::OperationDisabledByGuardian => "operation_disabled_by_guardian",
        }
    }
}

/// Stable audit actions emitted by compliance use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceAuditAction {
    /// A regulated minor's data was accessed.
    #[serde(rename = "compliance.minor.data_accessed")]
    MinorDataAccessed,
    /// A request was refused for missing guardian consent.
    #[serde(rename = "compliance.consent.denied")]
    ConsentDenied,
    /// A sensitive operation was refused.
    #[serde(rename = "compliance.operation.denied")]
    OperationDenied,
    /// Prohibited fields were removed from a request body.
    #[serde(rename = "compliance.request.fields_stripped")]
    ProhibitedFieldsStripped,
    /// The retention sweep purged an account.
    #[serde(rename = "compliance.retention.account_purged")]
    RetentionAccountPurged,
}

impl ComplianceAuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinorDataAccessed => "compliance.minor.data_accessed",
            Self::ConsentDenied => "compliance.consent.denied",
            Self::OperationDenied => "compliance.operation.denied",
            Self::ProhibitedFieldsStripped => "compliance.request.fields_stripped",
            Self::RetentionAccountPurged => "compliance.retention.account_purged",
        }
    }

    /// Returns all known audit actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ComplianceAuditAction] = &[
            ComplianceAuditAction::MinorDataAccessed,
            ComplianceAuditAction::ConsentDenied,
            ComplianceAuditAction::OperationDenied,
            ComplianceAuditAction::ProhibitedFieldsStripped,
            ComplianceAuditAction::RetentionAccountPurged,
        ];

        ALL
    }
}

impl CompliancePolicy {
    /// Decides whether an account may perform a sensitive operation.
    pub fn is_permitted_operation(
        &self,
        account: &Account,
        operation: SensitiveOperation,
    ) -> Result<Allowed, DeniedReason> {
        if !self.is_regulated_account(account) {
            return Ok(Allowed);
        }

        if !self.is_consent_satisfied(account) {
            return Err(DeniedReason::ConsentRequired);
        }

        match account.guardian_permissions() {
            None => Err(DeniedReason::PermissionsNotConfigured),
            Some(permissions) if permissions.allows(operation) => Ok(Allowed),
            Some(_) => Err(DeniedReason::OperationDisabledByGuardian),
        }
    }
}

/// Decides a sensitive operation against the COPPA policy.
pub fn is_permitted_operation(
    account: &Account,
    operation: SensitiveOperation,
) -> Result<Allowed, DeniedReason> {
    CompliancePolicy::COPPA.is_permitted_operation(account, operation)
}
