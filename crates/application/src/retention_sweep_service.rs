use std::sync::Arc;

use chrono::{DateTime, Utc};
use storyteller_core::AppResult;
use storyteller_domain::{ComplianceAuditAction, CompliancePolicy, is_data_expired};
use tracing::{info, warn};

use crate::{AccountRetentionRepository, ComplianceAuditEvent, ComplianceAuditRepository};

/// Counters produced by one retention sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionSweepReport {
    /// Accounts inspected.
    pub scanned: u32,
    /// Accounts past their retention period.
    pub expired: u32,
    /// Expired accounts deleted.
    pub purged: u32,
    /// Expired accounts whose deletion failed.
    pub failed: u32,
}

/// Application service deleting accounts past their retention period.
#[derive(Clone)]
pub struct RetentionSweepService {
    policy: CompliancePolicy,
    repository: Arc<dyn AccountRetentionRepository>,
    audit_repository: Arc<dyn ComplianceAuditRepository>,
}

impl RetentionSweepService {
    /// Creates a new retention sweep service.
    #[must_use]
    pub fn new(
        policy: CompliancePolicy,
        repository: Arc<dyn AccountRetentionRepository>,
        audit_repository: Arc<dyn ComplianceAuditRepository>,
    ) -> Self {
        Self {
            policy,
            repository,
            audit_repository,
        }
    }

    /// Runs one sweep at `now`.
    ///
    /// A failed delete is logged and counted without stopping the sweep.
    /// Failing to list accounts aborts it.
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> AppResult<RetentionSweepReport> {
        info!("starting data retention sweep");
        let accounts = self.repository.list_accounts().await?;
        let mut report = RetentionSweepReport::default();

        for account in accounts {
            report.scanned = report.scanned.saturating_add(1);

            let retention_days = self.policy.evaluate(&account, now).retention().period_days();
            if !is_data_expired(account.account_created_at(), retention_days, now) {
                continue;
            }
            report.expired = report.expired.saturating_add(1);

            match self.repository.delete_account(account.id()).await {
                Ok(true) => {
                    report.purged = report.purged.saturating_add(1);
                    info!(
                        account_id = %account.id(),
                        retention_days,
                        "deleted account past retention period"
                    );
                    if let Err(error) = self
                        .audit_repository
                        .append_event(ComplianceAuditEvent {
                            account_id: Some(account.id()),
                            action: ComplianceAuditAction::RetentionAccountPurged,
                            detail: Some(format!("retention_days={retention_days}")),
                            occurred_at: now,
                        })
                        .await
                    {
                        warn!(
                            account_id = %account.id(),
                            error = %error,
                            "failed to audit retention purge"
                        );
                    }
                }
                Ok(false) => {}
                Err(error) => {
                    report.failed = report.failed.saturating_add(1);
                    warn!(
                        account_id = %account.id(),
                        error = %error,
                        "failed to delete account past retention period"
                    );
                }
            }
        }

        info!(
            scanned = report.scanned,
            expired = report.expired,
            purged = report.purged,
            failed = report.failed,
            "data retention sweep finished"
        );

        Ok(report)
    }
}
