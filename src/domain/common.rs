use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

/// Monetary amount in whole XAF units.
pub type Amount = i64;

/// Identifies documents that expose a stable store identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Parses a stored due date, truncating timestamps to the calendar day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// values. Anything else yields `None`.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.date())
}

/// Day of a document-store timestamp object (`{"seconds", "nanoseconds"}`,
/// with or without leading underscores), taken in UTC.
pub fn timestamp_day(fields: &serde_json::Map<String, serde_json::Value>) -> Option<NaiveDate> {
    let seconds = timestamp_field(fields, "seconds")?.as_i64()?;
    let nanos = timestamp_field(fields, "nanoseconds")
        .and_then(serde_json::Value::as_u64)
        .and_then(|nanos| u32::try_from(nanos).ok())
        .unwrap_or(0);
    DateTime::from_timestamp(seconds, nanos).map(|stamp| stamp.date_naive())
}

fn timestamp_field<'m>(
    fields: &'m serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Option<&'m serde_json::Value> {
    fields
        .get(name)
        .or_else(|| fields.get(format!("_{name}").as_str()))
}

/// Serde adapter for optional due dates that tolerates malformed values.
///
/// Malformed or missing dates deserialize to `None` so the document still
/// loads; the fetch layer drops such items.
pub mod lenient_day {
    use serde_json::Value;

    use super::*;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<Value> = Option::deserialize(deserializer)?;
        let day = match &raw {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(text)) => parse_day(text),
            Some(Value::Object(fields)) => timestamp_day(fields),
            Some(_) => None,
        };
        if day.is_none() {
            if let Some(value) = raw {
                tracing::debug!(value = %value, "discarding unreadable due date");
            }
        }
        Ok(day)
    }
}
