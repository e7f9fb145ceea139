//! Request-time compliance gate.
//!
//! Wraps the pure policy engine with audit trail and structured logging for
//! the middleware and response layers that consume it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use storyteller_core::{AppError, AppResult};
use storyteller_domain::{
    Account, AccountId, AccountView, ComplianceAuditAction, ComplianceDecision, CompliancePolicy,
    DeniedReason, SensitiveOperation, strip_prohibited_fields,
};
use tracing::{info, warn};

use crate::{ComplianceAuditEvent, ComplianceAuditRepository, ComplianceConfig};

/// Application service gating requests on compliance decisions.
#[derive(Clone)]
pub struct ComplianceService {
    config: ComplianceConfig,
    audit_repository: Arc<dyn ComplianceAuditRepository>,
}

impl ComplianceService {
    /// Creates a new compliance service.
    #[must_use]
    pub fn new(config: ComplianceConfig, audit_repository: Arc<dyn ComplianceAuditRepository>) -> Self {
        Self {
            config,
            audit_repository,
        }
    }

    /// Returns the policy this service evaluates against.
    #[must_use]
    pub fn policy(&self) -> CompliancePolicy {
        self.config.policy
    }

    /// Computes the compliance decision without side effects.
    #[must_use]
    pub fn evaluate(&self, account: &Account, now: DateTime<Utc>) -> ComplianceDecision {
        self.config.policy.evaluate(account, now)
    }

    /// Lets a request proceed only when consent requirements are met.
    ///
    /// Returns the decision so callers can attach it to the request.
    pub async fn require_consent(
        &self,
        account: &Account,
        now: DateTime<Utc>,
    ) -> AppResult<ComplianceDecision> {
        let decision = self.evaluate(account, now);

        if !decision.consent_satisfied() {
            warn!(
                account_id = %account.id(),
                age_years = account.age_years(),
                "parental consent required"
            );
            self.append_event(
                Some(account.id()),
                ComplianceAuditAction::ConsentDenied,
                None,
                now,
            )
            .await?;

            return Err(denial(
                DeniedReason::ConsentRequired,
                format!(
                    "parental consent required for users under {}",
                    self.config.policy.age_threshold()
                ),
            ));
        }

        if decision.is_regulated_minor() && self.config.audit_minor_access {
            info!(account_id = %account.id(), "child data access");
            self.append_event(
                Some(account.id()),
                ComplianceAuditAction::MinorDataAccessed,
                None,
                now,
            )
            .await?;
        }

        Ok(decision)
    }

    /// Ensures the account may perform a sensitive operation.
    pub async fn require_operation(
        &self,
        account: &Account,
        operation: SensitiveOperation,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let reason = match self.config.policy.is_permitted_operation(account, operation) {
            Ok(_) => return Ok(()),
            Err(reason) => reason,
        };

        warn!(
            account_id = %account.id(),
            operation = operation.as_str(),
            reason = reason.code(),
            "sensitive operation denied"
        );
        self.append_event(
            Some(account.id()),
            ComplianceAuditAction::OperationDenied,
            Some(format!("{}:{}", operation.as_str(), reason.code())),
            now,
        )
        .await?;

        let message = match reason {
            DeniedReason::ConsentRequired => "parental consent required".to_owned(),
            DeniedReason::PermissionsNotConfigured => "parental settings not configured".to_owned(),
            DeniedReason::OperationDisabledByGuardian => {
                format!("{} not permitted by parent", operation.label())
            }
        };

        Err(denial(reason, message))
    }

    /// Shapes an account for a response.
    #[must_use]
    pub fn redact_for_response(&self, account: &Account) -> AccountView {
        self.config.policy.redact(account)
    }

    /// Removes prohibited personal-data keys from a request body.
    ///
    /// Returns the removed keys. A clean body produces no audit event.
    pub async fn sanitize_request_body(
        &self,
        account_id: Option<AccountId>,
        body: &mut Map<String, Value>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<&'static str>> {
        let stripped = strip_prohibited_fields(body);
        if stripped.is_empty() {
            return Ok(stripped);
        }

        for field in &stripped {
            warn!(field = *field, "prohibited field removed from request");
        }
        self.append_event(
            account_id,
            ComplianceAuditAction::ProhibitedFieldsStripped,
            Some(stripped.join(",")),
            now,
        )
        .await?;

        Ok(stripped)
    }

    async fn append_event(
        &self,
        account_id: Option<AccountId>,
        action: ComplianceAuditAction,
        detail: Option<String>,
        occurred_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(ComplianceAuditEvent {
                account_id,
                action,
                detail,
                occurred_at,
            })
            .await
    }
}

fn denial(reason: DeniedReason, message: String) -> AppError {
    AppError::PolicyDenied {
        code: reason.code(),
        message,
    }
}
