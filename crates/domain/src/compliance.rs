//! COPPA status, consent and retention evaluation.
//!
//! Every operation is a pure function of its arguments. Time-sensitive
//! operations take `now` explicitly so identical inputs always produce
//! identical decisions.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use storyteller_core::{AppError, AppResult};

use crate::account::Account;

/// Users strictly younger than this are regulated minors.
pub const COPPA_AGE_THRESHOLD: i32 = 13;

/// Retention period for regulated minors.
pub const MINOR_RETENTION_DAYS: u32 = 365;

/// Retention period for everyone else.
pub const STANDARD_RETENTION_DAYS: u32 = 1825;

/// Oldest age an account may report.
pub const MAX_PLAUSIBLE_AGE: i32 = 150;

/// Longest retention period a policy may configure.
pub const MAX_RETENTION_DAYS: u32 = 36_500;

/// Policy constants the engine evaluates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompliancePolicy {
    age_threshold: i32,
    minor_retention_days: u32,
    standard_retention_days: u32,
}

impl Default for CompliancePolicy {
    fn default() -> Self {
        Self::COPPA
    }
}

impl CompliancePolicy {
    /// The COPPA policy: threshold 13, 365 days for minors, 1825 otherwise.
    pub const COPPA: Self = Self {
        age_threshold: COPPA_AGE_THRESHOLD,
        minor_retention_days: MINOR_RETENTION_DAYS,
        standard_retention_days: STANDARD_RETENTION_DAYS,
    };

    /// Creates a validated policy.
    pub fn new(
        age_threshold: i32,
        minor_retention_days: u32,
        standard_retention_days: u32,
    ) -> AppResult<Self> {
        if !(1..=MAX_PLAUSIBLE_AGE).contains(&age_threshold) {
            return Err(AppError::Validation(format!(
                "age threshold must be between 1 and {MAX_PLAUSIBLE_AGE}, got {age_threshold}"
            )));
        }

        for (label, days) in [
            ("minor retention", minor_retention_days),
            ("standard retention", standard_retention_days),
        ] {
            if !(1..=MAX_RETENTION_DAYS).contains(&days) {
                return Err(AppError::Validation(format!(
                    "{label} must be between 1 and {MAX_RETENTION_DAYS} days, got {days}"
                )));
            }
        }

        Ok(Self {
            age_threshold,
            minor_retention_days,
            standard_retention_days,
        })
    }

    /// Returns the regulatory age threshold.
    #[must_use]
    pub fn age_threshold(&self) -> i32 {
        self.age_threshold
    }

    /// Returns the retention period for regulated minors.
    #[must_use]
    pub fn minor_retention_days(&self) -> u32 {
        self.minor_retention_days
    }

    /// Returns the retention period for everyone else.
    #[must_use]
    pub fn standard_retention_days(&self) -> u32 {
        self.standard_retention_days
    }

    /// Returns whether an age falls under the threshold.
    ///
    /// Negative ages are rejected. Any age at or above the threshold is not
    /// a regulated minor; the plausibility cap applies to stored accounts.
    pub fn is_regulated_minor(&self, age_years: i32) -> AppResult<bool> {
        if age_years < 0 {
            return Err(AppError::Validation(format!(
                "age must not be negative, got {age_years}"
            )));
        }

        Ok(age_years < self.age_threshold)
    }

    /// Returns whether a validated account belongs to a regulated minor.
    #[must_use]
    pub fn is_regulated_account(&self, account: &Account) -> bool {
        account.age_years() < self.age_threshold
    }

    /// Returns whether consent requirements are met for an account.
    #[must_use]
    pub fn is_consent_satisfied(&self, account: &Account) -> bool {
        !self.is_regulated_account(account) || account.guardian_email_on_file().is_some()
    }

    /// Returns the retention period selected by minor status.
    #[must_use]
    pub fn retention_days(&self, is_regulated_minor: bool) -> u32 {
        if is_regulated_minor {
            self.minor_retention_days
        } else {
            self.standard_retention_days
        }
    }

    /// Computes the full compliance decision for one account snapshot.
    #[must_use]
    pub fn evaluate(&self, account: &Account, now: DateTime<Utc>) -> ComplianceDecision {
        let is_regulated_minor = self.is_regulated_account(account);
        let consent_satisfied = self.is_consent_satisfied(account);
        let period_days = self.retention_days(is_regulated_minor);

        ComplianceDecision {
            is_regulated_minor,
            consent_satisfied,
            retention: RetentionSchedule::starting_at(now, period_days),
            privacy_notice_acknowledged: true,
            guardian_consent_recorded_at: if is_regulated_minor && consent_satisfied {
                account.guardian_consent_timestamp()
            } else {
                None
            },
        }
    }
}

/// Retention period and the next purge time derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionSchedule {
    period_days: u32,
    next_purge_at: DateTime<Utc>,
}

impl RetentionSchedule {
    fn starting_at(now: DateTime<Utc>, period_days: u32) -> Self {
        let next_purge_at = now
            .checked_add_signed(TimeDelta::days(i64::from(period_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            period_days,
            next_purge_at,
        }
    }

    /// Returns the retention period in days.
    #[must_use]
    pub fn period_days(&self) -> u32 {
        self.period_days
    }

    /// Returns `now + period_days` as a plain additive duration.
    #[must_use]
    pub fn next_purge_at(&self) -> DateTime<Utc> {
        self.next_purge_at
    }
}

/// Compliance decision for one account snapshot. Never partially populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceDecision {
    is_regulated_minor: bool,
    consent_satisfied: bool,
    retention: RetentionSchedule,
    privacy_notice_acknowledged: bool,
    guardian_consent_recorded_at: Option<DateTime<Utc>>,
}

impl ComplianceDecision {
    /// Returns whether the account is under the age threshold.
    #[must_use]
    pub fn is_regulated_minor(&self) -> bool {
        self.is_regulated_minor
    }

    /// Returns whether consent is satisfied.
    #[must_use]
    pub fn consent_satisfied(&self) -> bool {
        self.consent_satisfied
    }

    /// Returns the retention schedule.
    #[must_use]
    pub fn retention(&self) -> RetentionSchedule {
        self.retention
    }

    /// Always `true`; acknowledgement is not yet tracked per account.
    #[must_use]
    pub fn privacy_notice_acknowledged(&self) -> bool {
        self.privacy_notice_acknowledged
    }

    /// Returns the recorded consent time for consenting regulated minors.
    #[must_use]
    pub fn guardian_consent_recorded_at(&self) -> Option<DateTime<Utc>> {
        self.guardian_consent_recorded_at
    }
}

/// Returns whether an age is under the COPPA threshold.
pub fn is_regulated_minor(age_years: i32) -> AppResult<bool> {
    CompliancePolicy::COPPA.is_regulated_minor(age_years)
}

/// Evaluates an account against the COPPA policy.
#[must_use]
pub fn evaluate_compliance(account: &Account, now: DateTime<Utc>) -> ComplianceDecision {
    CompliancePolicy::COPPA.evaluate(account, now)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use proptest::prelude::*;

    use super::*;
    use crate::account::{AccountId, DisplayName};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("test"))
    }

    fn account(age_years: i32, guardian_email: Option<&str>) -> Account {
        let name = DisplayName::new("story_fan").unwrap_or_else(|error| panic!("test: {error}"));
        Account::new(AccountId::new(), name, age_years, now() - TimeDelta::days(40))
            .unwrap_or_else(|error| panic!("test: {error}"))
            .with_guardian_email(guardian_email.map(str::to_owned))
    }

    #[test]
    fn threshold_boundary_is_strict() {
        assert!(matches!(is_regulated_minor(12), Ok(true)));
        assert!(matches!(is_regulated_minor(13), Ok(false)));
        assert!(matches!(is_regulated_minor(0), Ok(true)));
    }

    #[test]
    fn negative_age_is_a_caller_error() {
        assert!(matches!(
            is_regulated_minor(-1),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn ages_beyond_account_range_are_not_minors() {
        assert!(matches!(is_regulated_minor(MAX_PLAUSIBLE_AGE + 1), Ok(false)));
        assert!(matches!(is_regulated_minor(i32::MAX), Ok(false)));
    }

    #[test]
    fn minor_without_guardian_email_lacks_consent() {
        let decision = evaluate_compliance(&account(9, None), now());
        assert!(decision.is_regulated_minor());
        assert!(!decision.consent_satisfied());
        assert_eq!(decision.retention().period_days(), 365);
        assert_eq!(
            decision.retention().next_purge_at(),
            now() + TimeDelta::days(365)
        );
        assert!(decision.privacy_notice_acknowledged());
    }

    #[test]
    fn minor_with_guardian_email_has_consent() {
        let consented_at = now() - TimeDelta::days(2);
        let account = account(9, Some("parent@example.com"))
            .with_guardian_consent_timestamp(consented_at);
        let decision = evaluate_compliance(&account, now());
        assert!(decision.consent_satisfied());
        assert_eq!(decision.guardian_consent_recorded_at(), Some(consented_at));
    }

    #[test]
    fn teen_uses_standard_retention() {
        let decision = evaluate_compliance(&account(15, None), now());
        assert!(!decision.is_regulated_minor());
        assert!(decision.consent_satisfied());
        assert_eq!(decision.retention().period_days(), 1825);
        assert_eq!(decision.guardian_consent_recorded_at(), None);
    }

    #[test]
    fn evaluation_is_referentially_transparent() {
        let account = account(11, Some("parent@example.com"));
        assert_eq!(
            evaluate_compliance(&account, now()),
            evaluate_compliance(&account, now())
        );
    }

    #[test]
    fn policy_rejects_out_of_range_values() {
        assert!(CompliancePolicy::new(0, 365, 1825).is_err());
        assert!(CompliancePolicy::new(13, 0, 1825).is_err());
        assert!(CompliancePolicy::new(13, 365, MAX_RETENTION_DAYS + 1).is_err());
        assert!(CompliancePolicy::new(16, 30, 730).is_ok());
    }

    #[test]
    fn custom_policy_moves_the_threshold() {
        let policy = CompliancePolicy::new(16, 30, 730).unwrap_or_else(|error| panic!("test: {error}"));
        let decision = policy.evaluate(&account(14, None), now());
        assert!(decision.is_regulated_minor());
        assert_eq!(decision.retention().period_days(), 30);
    }

    proptest! {
        #[test]
        fn minor_status_depends_only_on_age(age in 0_i32..=MAX_PLAUSIBLE_AGE) {
            let expected = age < COPPA_AGE_THRESHOLD;
            prop_assert_eq!(is_regulated_minor(age).ok(), Some(expected));
        }

        #[test]
        fn ages_at_or_above_threshold_are_never_minors(age in COPPA_AGE_THRESHOLD..=i32::MAX) {
            prop_assert_eq!(is_regulated_minor(age).ok(), Some(false));
        }

        #[test]
        fn retention_is_one_of_two_values(age in 0_i32..=MAX_PLAUSIBLE_AGE, has_email in any::<bool>()) {
            let email = has_email.then_some("parent@example.com");
            let decision = evaluate_compliance(&account(age, email), now());
            let expected = if decision.is_regulated_minor() {
                MINOR_RETENTION_DAYS
            } else {
                STANDARD_RETENTION_DAYS
            };
            prop_assert_eq!(decision.retention().period_days(), expected);
        }
    }
}
