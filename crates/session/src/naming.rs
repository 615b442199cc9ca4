use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

const SESSION_NAME_PREFIX: &str = "Chat Session";

/// `Chat Session YYYY-MM-DD HH:MM:SS` (UTC, second precision)
pub fn session_name(now: DateTime<Utc>) -> String {
    format!("{SESSION_NAME_PREFIX} {}", now.format("%Y-%m-%d %H:%M:%S"))
}

/// RFC 3339 with milliseconds and a `Z` suffix
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Store timestamps are unix milliseconds; out-of-range values clamp to the epoch.
pub fn timestamp_from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
