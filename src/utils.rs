//! Shared helpers and constants will live here.

use chrono::Utc;

pub fn now_utc_iso() -> String {
    Utc::now().to_rfc3339()
}

/// RFC 3339 timestamp `days` in the past, used as a lower bound for
/// recent-content queries. Out-of-range windows clamp to now.
pub fn days_ago_utc_iso(days: i64) -> String {
    let delta = chrono::Duration::try_days(days).unwrap_or_else(chrono::Duration::zero);
    (Utc::now() - delta).to_rfc3339()
}
