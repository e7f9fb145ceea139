//! Allow-list redaction of account data for regulated minors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{Account, AccountId, DisplayName};
use crate::compliance::{ComplianceDecision, CompliancePolicy};

/// Fields a redacted account exposes. Anything else is dropped.
pub const REDACTED_ACCOUNT_FIELDS: &[&str] = &[
    "id",
    "username_display",
    "age_years",
    "compliance_snapshot",
    "account_created_at",
    "last_modified_at",
];

/// Account projection safe to send for a regulated minor.
///
/// The type carries only allow-listed fields, so guardian contact data,
/// preferences and free-form attributes cannot reach a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedactedAccount {
    /// Account identifier.
    pub id: AccountId,
    /// Display name.
    pub username_display: DisplayName,
    /// Age in whole years.
    pub age_years: i32,
    /// Last attached compliance decision.
    pub compliance_snapshot: Option<ComplianceDecision>,
    /// Creation time.
    pub account_created_at: DateTime<Utc>,
    /// Last modification time.
    pub last_modified_at: DateTime<Utc>,
}

impl From<&Account> for RedactedAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            username_display: account.username_display().clone(),
            age_years: account.age_years(),
            compliance_snapshot: account.compliance_snapshot().copied(),
            account_created_at: account.account_created_at(),
            last_modified_at: account.last_modified_at(),
        }
    }
}

/// Account data as it may be serialized to a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AccountView {
    /// Every field, for accounts outside the regulated age range.
    Full(Account),
    /// Allow-listed fields only.
    Redacted(RedactedAccount),
}

impl AccountView {
    /// Returns whether fields were removed.
    #[must_use]
    pub fn is_redacted(&self) -> bool {
        matches!(self, Self::Redacted(_))
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn id(&self) -> AccountId {
        match self {
            Self::Full(account) => account.id(),
            Self::Redacted(account) => account.id,
        }
    }
}

impl CompliancePolicy {
    /// Shapes an account for a response according to minor status.
    #[must_use]
    pub fn redact(&self, account: &Account) -> AccountView {
        if self.is_regulated_account(account) {
            AccountView::Redacted(RedactedAccount::from(account))
        } else {
            AccountView::Full(account.clone())
        }
    }
}

/// Redacts an account against the COPPA policy.
#[must_use]
pub fn redact_for_minor(account: &Account) -> AccountView {
    CompliancePolicy::COPPA.redact(account)
}
