use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Seconds since the Unix epoch, with fractional milliseconds.
///
/// This is the unit the session table stores expiries in (`to_timestamp`
/// takes a double).
pub fn now_epoch_seconds() -> f64 {
    now_ms() as f64 / 1000.0
}
