//! Account snapshot read by the compliance policy engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use storyteller_core::{AppError, AppResult};
use uuid::Uuid;

use crate::compliance::{ComplianceDecision, MAX_PLAUSIBLE_AGE};
use crate::preferences::AccountPreferences;
use crate::security::SensitiveOperation;

/// Unique identifier for an account record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Creates a new random account identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Minimum display name length.
pub const DISPLAY_NAME_MIN_LENGTH: usize = 3;

/// Maximum display name length.
pub const DISPLAY_NAME_MAX_LENGTH: usize = 20;

/// Words a child may not use in a display name, matched case-insensitively.
static RESERVED_NAME_WORDS: &[&str] = &["admin", "moderator", "staff", "official"];

/// Validated display name. The only name a child account carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Creates a validated display name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        let length = trimmed.chars().count();

        if !(DISPLAY_NAME_MIN_LENGTH..=DISPLAY_NAME_MAX_LENGTH).contains(&length) {
            return Err(AppError::Validation(format!(
                "display name must be between {DISPLAY_NAME_MIN_LENGTH} and {DISPLAY_NAME_MAX_LENGTH} characters"
            )));
        }

        if !trimmed
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || character == '_')
        {
            return Err(AppError::Validation(
                "display name can only contain letters, numbers, and underscores".to_owned(),
            ));
        }

        let lowered = trimmed.to_ascii_lowercase();
        if let Some(word) = RESERVED_NAME_WORDS
            .iter()
            .find(|word| lowered.contains(**word))
        {
            return Err(AppError::Validation(format!(
                "display name must not contain reserved word '{word}'"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the display name string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for DisplayName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

/// Capabilities a guardian has switched on for a child account.
///
/// A flag missing from serialized input is treated as disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardianPermissions {
    /// Voice recordings may be captured.
    pub voice_recording: bool,
    /// Drawings may be uploaded.
    pub drawing_upload: bool,
    /// The child may edit their profile.
    pub profile_update: bool,
    /// The child may export their data.
    pub data_export: bool,
}

impl GuardianPermissions {
    /// Returns every capability enabled.
    #[must_use]
    pub fn all_enabled() -> Self {
        Self {
            voice_recording: true,
            drawing_upload: true,
            profile_update: true,
            data_export: true,
        }
    }

    /// Returns the flag a guardian set for one operation.
    #[must_use]
    pub fn allows(&self, operation: SensitiveOperation) -> bool {
        match operation {
            SensitiveOperation::VoiceRecording => self.voice_recording,
            SensitiveOperation::DrawingUpload => self.drawing_upload,
            SensitiveOperation::ProfileUpdate => self.profile_update,
            SensitiveOperation::DataExport => self.data_export,
        }
    }
}

/// Serialized field names claimed by [`Account`]; extra attributes may not reuse them.
const ACCOUNT_FIELD_NAMES: &[&str] = &[
    "id",
    "username_display",
    "age_years",
    "guardian_email_on_file",
    "guardian_consent_timestamp",
    "account_created_at",
    "last_modified_at",
    "guardian_permissions",
    "preferences",
    "compliance_snapshot",
];

/// Account snapshot owned by the surrounding application.
///
/// The engine only reads accounts. Construction validates age and timestamps
/// so every policy operation over an `Account` is infallible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AccountRecord")]
pub struct Account {
    id: AccountId,
    username_display: DisplayName,
    age_years: i32,
    guardian_email_on_file: Option<String>,
    guardian_consent_timestamp: Option<DateTime<Utc>>,
    account_created_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
    guardian_permissions: Option<GuardianPermissions>,
    preferences: Option<AccountPreferences>,
    compliance_snapshot: Option<ComplianceDecision>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

#[derive(Deserialize)]
struct AccountRecord {
    id: AccountId,
    username_display: DisplayName,
    age_years: i32,
    #[serde(default)]
    guardian_email_on_file: Option<String>,
    #[serde(default)]
    guardian_consent_timestamp: Option<DateTime<Utc>>,
    account_created_at: DateTime<Utc>,
    #[serde(default)]
    last_modified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    guardian_permissions: Option<GuardianPermissions>,
    #[serde(default)]
    preferences: Option<AccountPreferences>,
    #[serde(default)]
    compliance_snapshot: Option<ComplianceDecision>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl TryFrom<AccountRecord> for Account {
    type Error = AppError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        let mut account = Self::new(
            record.id,
            record.username_display,
            record.age_years,
            record.account_created_at,
        )?
        .with_guardian_email(record.guardian_email_on_file)
        .with_guardian_permissions(record.guardian_permissions);

        if let Some(consented_at) = record.guardian_consent_timestamp {
            account = account.with_guardian_consent_timestamp(consented_at);
        }
        if let Some(modified_at) = record.last_modified_at {
            account = account.with_last_modified_at(modified_at)?;
        }
        if let Some(preferences) = record.preferences {
            account = account.with_preferences(preferences);
        }
        if let Some(snapshot) = record.compliance_snapshot {
            account = account.with_compliance_snapshot(snapshot);
        }

        // Named fields were consumed by serde, so flattened keys never collide.
        account.attributes = record.attributes;
        Ok(account)
    }
}

impl Account {
    /// Creates an account snapshot with no guardian data attached.
    pub fn new(
        id: AccountId,
        username_display: DisplayName,
        age_years: i32,
        account_created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        validate_age(age_years)?;

        Ok(Self {
            id,
            username_display,
            age_years,
            guardian_email_on_file: None,
            guardian_consent_timestamp: None,
            account_created_at,
            last_modified_at: account_created_at,
            guardian_permissions: None,
            preferences: None,
            compliance_snapshot: None,
            attributes: Map::new(),
        })
    }

    /// Attaches the guardian email on file. Blank values count as absent.
    #[must_use]
    pub fn with_guardian_email(mut self, email: Option<String>) -> Self {
        self.guardian_email_on_file = email
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        self
    }

    /// Records when guardian consent was given.
    #[must_use]
    pub fn with_guardian_consent_timestamp(mut self, consented_at: DateTime<Utc>) -> Self {
        self.guardian_consent_timestamp = Some(consented_at);
        self
    }

    /// Attaches guardian capability settings.
    #[must_use]
    pub fn with_guardian_permissions(mut self, permissions: Option<GuardianPermissions>) -> Self {
        self.guardian_permissions = permissions;
        self
    }

    /// Attaches reader preferences.
    #[must_use]
    pub fn with_preferences(mut self, preferences: AccountPreferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Attaches the last compliance decision computed for this account.
    #[must_use]
    pub fn with_compliance_snapshot(mut self, snapshot: ComplianceDecision) -> Self {
        self.compliance_snapshot = Some(snapshot);
        self
    }

    /// Sets the last modification time.
    pub fn with_last_modified_at(mut self, modified_at: DateTime<Utc>) -> AppResult<Self> {
        if modified_at < self.account_created_at {
            return Err(AppError::Validation(
                "last_modified_at must not precede account_created_at".to_owned(),
            ));
        }

        self.last_modified_at = modified_at;
        Ok(self)
    }

    /// Adds a free-form profile attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> AppResult<Self> {
        let key = key.into();
        if ACCOUNT_FIELD_NAMES.contains(&key.as_str()) {
            return Err(AppError::Validation(format!(
                "attribute '{key}' collides with an account field"
            )));
        }

        self.attributes.insert(key, value);
        Ok(self)
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn username_display(&self) -> &DisplayName {
        &self.username_display
    }

    /// Returns the age in whole years at evaluation time.
    #[must_use]
    pub fn age_years(&self) -> i32 {
        self.age_years
    }

    /// Returns the guardian email on file.
    #[must_use]
    pub fn guardian_email_on_file(&self) -> Option<&str> {
        self.guardian_email_on_file.as_deref()
    }

    /// Returns when guardian consent was recorded.
    #[must_use]
    pub fn guardian_consent_timestamp(&self) -> Option<DateTime<Utc>> {
        self.guardian_consent_timestamp
    }

    /// Returns the creation time used for retention.
    #[must_use]
    pub fn account_created_at(&self) -> DateTime<Utc> {
        self.account_created_at
    }

    /// Returns the last modification time.
    #[must_use]
    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.last_modified_at
    }

    /// Returns guardian capability settings, if configured.
    #[must_use]
    pub fn guardian_permissions(&self) -> Option<&GuardianPermissions> {
        self.guardian_permissions.as_ref()
    }

    /// Returns reader preferences.
    #[must_use]
    pub fn preferences(&self) -> Option<&AccountPreferences> {
        self.preferences.as_ref()
    }

    /// Returns the attached compliance snapshot.
    #[must_use]
    pub fn compliance_snapshot(&self) -> Option<&ComplianceDecision> {
        self.compliance_snapshot.as_ref()
    }

    /// Returns free-form profile attributes.
    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

/// Rejects ages the policy engine cannot evaluate.
pub(crate) fn validate_age(age_years: i32) -> AppResult<()> {
    if age_years < 0 {
        return Err(AppError::Validation(format!(
            "age must not be negative, got {age_years}"
        )));
    }

    if age_years > MAX_PLAUSIBLE_AGE {
        return Err(AppError::Validation(format!(
            "age must not exceed {MAX_PLAUSIBLE_AGE}, got {age_years}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("test"))
    }

    fn display_name(value: &str) -> DisplayName {
        DisplayName::new(value).unwrap_or_else(|error| panic!("test: {error}"))
    }

    #[test]
    fn display_name_is_trimmed() {
        assert_eq!(display_name("  star_reader ").as_str(), "star_reader");
    }

    #[test]
    fn display_name_rejects_reserved_words() {
        assert!(DisplayName::new("SuperAdmin").is_err());
        assert!(DisplayName::new("the_staff").is_err());
    }

    #[test]
    fn display_name_rejects_bad_characters_and_lengths() {
        assert!(DisplayName::new("ab").is_err());
        assert!(DisplayName::new("a".repeat(21)).is_err());
        assert!(DisplayName::new("space ship").is_err());
        assert!(DisplayName::new("rocket-kid").is_err());
    }

    #[test]
    fn negative_age_is_rejected() {
        let result = Account::new(AccountId::new(), display_name("reader1"), -1, created_at());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn implausible_age_is_rejected() {
        let result = Account::new(
            AccountId::new(),
            display_name("reader1"),
            MAX_PLAUSIBLE_AGE + 1,
            created_at(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn blank_guardian_email_counts_as_absent() {
        let account = Account::new(AccountId::new(), display_name("reader1"), 9, created_at())
            .unwrap_or_else(|error| panic!("test: {error}"))
            .with_guardian_email(Some("   ".to_owned()));
        assert_eq!(account.guardian_email_on_file(), None);
    }

    #[test]
    fn last_modified_before_creation_is_rejected() {
        let account = Account::new(AccountId::new(), display_name("reader1"), 9, created_at())
            .unwrap_or_else(|error| panic!("test: {error}"));
        let earlier = created_at() - chrono::TimeDelta::days(1);
        assert!(account.with_last_modified_at(earlier).is_err());
    }

    #[test]
    fn attribute_colliding_with_field_is_rejected() {
        let account = Account::new(AccountId::new(), display_name("reader1"), 9, created_at())
            .unwrap_or_else(|error| panic!("test: {error}"));
        assert!(
            account
                .with_attribute("guardian_email_on_file", json!("x@example.com"))
                .is_err()
        );
    }

    #[test]
    fn deserialization_validates_and_keeps_extra_attributes() {
        let id = AccountId::new();
        let parsed: Account = serde_json::from_value(json!({
            "id": id,
            "username_display": "moon_reader",
            "age_years": 10,
            "guardian_email_on_file": "parent@example.com",
            "account_created_at": "2025-03-01T08:00:00Z",
            "guardian_permissions": { "voice_recording": true },
            "school_name": "Hill Elementary"
        }))
        .unwrap_or_else(|error| panic!("test: {error}"));

        assert_eq!(parsed.id(), id);
        assert_eq!(parsed.last_modified_at(), parsed.account_created_at());
        assert_eq!(
            parsed.guardian_permissions().copied(),
            Some(GuardianPermissions {
                voice_recording: true,
                ..GuardianPermissions::default()
            })
        );
        assert_eq!(
            parsed.attributes().get("school_name"),
            Some(&json!("Hill Elementary"))
        );

        let negative: Result<Account, _> = serde_json::from_value(json!({
            "id": id,
            "username_display": "moon_reader",
            "age_years": -4,
            "account_created_at": "2025-03-01T08:00:00Z"
        }));
        assert!(negative.is_err());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let parsed: Result<Account, _> = serde_json::from_value(json!({
            "id": AccountId::new(),
            "username_display": "moon_reader",
            "account_created_at": "2025-03-01T08:00:00Z"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn permission_flags_map_to_operations() {
        let permissions = GuardianPermissions {
            drawing_upload: true,
            ..GuardianPermissions::default()
        };
        assert!(permissions.allows(SensitiveOperation::DrawingUpload));
        assert!(!permissions.allows(SensitiveOperation::VoiceRecording));
        assert!(GuardianPermissions::all_enabled().allows(SensitiveOperation::DataExport));
    }
}
