//! Application services and ports.

#![forbid(unsafe_code)]

mod compliance_config;
mod compliance_ports;
mod compliance_service;
mod retention_sweep_service;

pub use compliance_config::{
    AGE_THRESHOLD_ENV, AUDIT_MINOR_ACCESS_ENV, ComplianceConfig, MINOR_RETENTION_DAYS_ENV,
    STANDARD_RETENTION_DAYS_ENV,
};
pub use compliance_ports::{
    AccountRetentionRepository, ComplianceAuditEvent, ComplianceAuditRepository,
};
pub use compliance_service::ComplianceService;
pub use retention_sweep_service::{RetentionSweepReport, RetentionSweepService};
