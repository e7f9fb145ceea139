use std::env;
use std::str::FromStr;

use storyteller_core::{AppError, AppResult};
use storyteller_domain::{
    COPPA_AGE_THRESHOLD, CompliancePolicy, MINOR_RETENTION_DAYS, STANDARD_RETENTION_DAYS,
};

/// Environment key for the regulatory age threshold.
pub const AGE_THRESHOLD_ENV: &str = "COPPA_AGE_THRESHOLD";
/// Environment key for the regulated-minor retention period.
pub const MINOR_RETENTION_DAYS_ENV: &str = "COPPA_MINOR_RETENTION_DAYS";
/// Environment key for the standard retention period.
pub const STANDARD_RETENTION_DAYS_ENV: &str = "COPPA_STANDARD_RETENTION_DAYS";
/// Environment key toggling minor data-access auditing.
pub const AUDIT_MINOR_ACCESS_ENV: &str = "COPPA_AUDIT_MINOR_ACCESS";

/// Runtime configuration for compliance services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceConfig {
    /// Policy constants evaluated on every request.
    pub policy: CompliancePolicy,
    /// Whether every access to a regulated minor's data is audited.
    pub audit_minor_access: bool,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            policy: CompliancePolicy::COPPA,
            audit_minor_access: true,
        }
    }
}

impl ComplianceConfig {
    /// Loads configuration from process environment variables.
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// Missing or blank keys fall back to the COPPA constants. Values that are
    /// present but invalid are rejected.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let age_threshold = parse_or(read(AGE_THRESHOLD_ENV), AGE_THRESHOLD_ENV, COPPA_AGE_THRESHOLD)?;
        let minor_retention_days = parse_or(
            read(MINOR_RETENTION_DAYS_ENV),
            MINOR_RETENTION_DAYS_ENV,
            MINOR_RETENTION_DAYS,
        )?;
        let standard_retention_days = parse_or(
            read(STANDARD_RETENTION_DAYS_ENV),
            STANDARD_RETENTION_DAYS_ENV,
            STANDARD_RETENTION_DAYS,
        )?;

        let audit_minor_access = match read(AUDIT_MINOR_ACCESS_ENV) {
            None => true,
            Some(value) if value.eq_ignore_ascii_case("true") => true,
            Some(value) if value.eq_ignore_ascii_case("false") => false,
            Some(value) => {
                return Err(AppError::Validation(format!(
                    "{AUDIT_MINOR_ACCESS_ENV} must be 'true' or 'false', got '{value}'"
                )));
            }
        };

        let policy = CompliancePolicy::new(age_threshold, minor_retention_days, standard_retention_days)
            .map_err(|error| {
                AppError::Validation(format!("invalid compliance policy configuration: {error}"))
            })?;

        Ok(Self {
            policy,
            audit_minor_access,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {key} '{value}': {error}"))),
    }
}
