//! Lenient field readers for persisted records

use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Format written by the browser-era `Date.toDateString()`
const LEGACY_DATE_FORMAT: &str = "%a %b %d %Y";

/// First present field among `names`
pub(crate) fn field<'a>(record: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| record.get(*name))
}

/// Non-negative count clamped to `max`; anything unreadable counts as zero
pub(crate) fn restore_count(value: Option<&Value>, max: u32) -> u32 {
    match value.and_then(Value::as_i64) {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX).min(max),
        _ => 0,
    }
}

/// A missing date means the record predates rollover tracking and is taken
/// as today. A date that cannot be read at all is pushed into the past so the
/// next reconcile zeroes its counter.
pub(crate) fn restore_date(value: Option<&Value>, today: NaiveDate) -> NaiveDate {
    match value {
        None | Some(Value::Null) => today,
        Some(Value::String(raw)) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(raw, LEGACY_DATE_FORMAT))
            .unwrap_or(NaiveDate::MIN),
        Some(_) => NaiveDate::MIN,
    }
}
