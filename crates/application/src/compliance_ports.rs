use async_trait::async_trait;
use chrono::{DateTime, Utc};
use storyteller_core::AppResult;
use storyteller_domain::{Account, AccountId, ComplianceAuditAction};

/// Immutable compliance audit event emitted by application services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceAuditEvent {
    /// Account the event concerns, when known.
    pub account_id: Option<AccountId>,
    /// Stable audit action identifier.
    pub action: ComplianceAuditAction,
    /// Optional detail payload.
    pub detail: Option<String>,
    /// When the event happened.
    pub occurred_at: DateTime<Utc>,
}

/// Port for persisting append-only compliance audit events.
#[async_trait]
pub trait ComplianceAuditRepository: Send + Sync {
    /// Persists one audit event.
    async fn append_event(&self, event: ComplianceAuditEvent) -> AppResult<()>;
}

/// Repository port the retention sweep reads and deletes through.
#[async_trait]
pub trait AccountRetentionRepository: Send + Sync {
    /// Lists every stored account snapshot.
    async fn list_accounts(&self) -> AppResult<Vec<Account>>;

    /// Deletes one account. Returns `false` when it was already gone.
    async fn delete_account(&self, account_id: AccountId) -> AppResult<bool>;
}
