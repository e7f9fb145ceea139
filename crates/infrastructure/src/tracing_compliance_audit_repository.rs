//! Audit adapter that writes compliance events to tracing output.

use async_trait::async_trait;
use storyteller_application::{ComplianceAuditEvent, ComplianceAuditRepository};
use storyteller_core::AppResult;
use tracing::info;

/// Compliance audit log backed by structured tracing records.
#[derive(Clone)]
pub struct TracingComplianceAuditRepository;

impl TracingComplianceAuditRepository {
    /// Creates a new tracing audit log.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingComplianceAuditRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComplianceAuditRepository for TracingComplianceAuditRepository {
    async fn append_event(&self, event: ComplianceAuditEvent) -> AppResult<()> {
        let account_id = event
            .account_id
            .map(|account_id| account_id.to_string())
            .unwrap_or_default();

        info!(
            target: "storyteller::compliance_audit",
            action = event.action.as_str(),
            account_id = %account_id,
            detail = event.detail.as_deref().unwrap_or_default(),
            occurred_at = %event.occurred_at.to_rfc3339(),
            "compliance audit event"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use storyteller_domain::{AccountId, ComplianceAuditAction};

    use super::*;

    #[tokio::test]
    async fn append_event_always_succeeds() {
        let repository = TracingComplianceAuditRepository::new();
        let result = repository
            .append_event(ComplianceAuditEvent {
                account_id: Some(AccountId::new()),
                action: ComplianceAuditAction::MinorDataAccessed,
                detail: None,
                occurred_at: Utc::now(),
            })
            .await;

        assert!(result.is_ok());
    }
}
