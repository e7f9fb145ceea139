//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_account_repository;
mod tracing_compliance_audit_repository;

pub use in_memory_account_repository::InMemoryAccountRepository;
pub use tracing_compliance_audit_repository::TracingComplianceAuditRepository;
