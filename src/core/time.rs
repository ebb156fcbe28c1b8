//! Wall-clock helpers for report timestamps.

use std::time::{SystemTime, UNIX_EPOCH};

/// Whole unix-epoch seconds, used in report file names.
pub fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Fractional unix-epoch seconds, used inside verdict payloads.
pub fn now_epoch_f64() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
