use chrono::{DateTime, TimeDelta, Utc};

/// Returns whether data created at `created_at` has outlived its retention.
///
/// Strictly greater-than: data exactly `retention_days` old is kept.
#[must_use]
pub fn is_data_expired(created_at: DateTime<Utc>, retention_days: u32, now: DateTime<Utc>) -> bool {
    let age = now.signed_duration_since(created_at);
    age > TimeDelta::days(i64::from(retention_days))
}
