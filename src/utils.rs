use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt;

/// Current wall-clock time in epoch milliseconds.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current wall-clock time in epoch milliseconds.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Format an epoch-millisecond timestamp as `YYYY-MM-DD HH:MM` in the user's local time.
pub fn format_drawn_at(epoch_ms: f64) -> String {
    format_drawn_at_in(epoch_ms, &Local)
}

/// Format an epoch-millisecond timestamp as `YYYY-MM-DD HH:MM` in `zone`.
pub fn format_drawn_at_in<Tz: TimeZone>(epoch_ms: f64, zone: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    if !epoch_ms.is_finite() || epoch_ms <= 0.0 {
        return "unknown".to_string();
    }
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64) {
        Some(utc) => utc.with_timezone(zone).format("%Y-%m-%d %H:%M").to_string(),
        None => "unknown".to_string(),
    }
}
