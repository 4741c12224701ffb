//! Sensor readings and their normalization from raw feed records.
//!
//! Feeds deliver loosely-typed records: `tds` and `temperature` may be
//! numbers, numeric strings, or missing entirely, and the timestamp may be
//! absent. [`normalize`] turns such a record into a [`Reading`] whose values
//! are always finite numbers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Layouts with an explicit offset that RFC 3339 parsing rejects, such as
/// `+0200` or a missing seconds field.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Naive timestamp layouts accepted when a record carries no UTC offset
/// (or just a `Z`). Such timestamps are interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A bare date is read as midnight UTC.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One normalized sensor sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// When the sample was produced (or received, if the source omitted it).
    pub timestamp: DateTime<Utc>,
    /// Total dissolved solids in mg/L.
    pub tds: f64,
    /// Water temperature in °C.
    pub temperature: f64,
}

impl Reading {
    /// Create a reading from already-typed values.
    pub fn new(timestamp: DateTime<Utc>, tds: f64, temperature: f64) -> Self {
        Self {
            timestamp,
            tds,
            temperature,
        }
    }
}

/// A record as delivered by a feed, before normalization.
///
/// Fields are kept as untyped JSON so that strings, numbers and garbage
/// all survive until [`normalize`] decides what to make of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tds: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
}

impl RawReading {
    /// Build a raw record from an arbitrary JSON payload.
    ///
    /// Returns `None` for a JSON `null`, which feeds use to signal that the
    /// sensor record is absent. Any other non-object value yields a record
    /// with every field missing.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(mut map) => Some(Self {
                tds: map.remove("tds"),
                temperature: map.remove("temperature"),
                timestamp: map.remove("timestamp"),
            }),
            other => {
                debug!("Non-object payload treated as empty record: {}", other);
                Some(Self::default())
            }
        }
    }
}

/// Normalize a raw record into a [`Reading`].
///
/// Missing or non-numeric `tds`/`temperature` values become `0.0`; this is
/// lenient on purpose and never fails. A missing or unparseable timestamp
/// falls back to `now`.
pub fn normalize(raw: &RawReading, now: DateTime<Utc>) -> Reading {
    let tds = coerce_number(raw.tds.as_ref());
    let temperature = coerce_number(raw.temperature.as_ref());
    let timestamp = parse_timestamp(raw.timestamp.as_ref()).unwrap_or(now);

    Reading {
        timestamp,
        tds,
        temperature,
    }
}

/// Coerce a JSON value to a finite number, defaulting to zero.
fn coerce_number(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                s.parse::<f64>().ok()
            }
        }
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    match number.filter(|n| n.is_finite()) {
        Some(n) => n,
        None => {
            if value.is_some_and(|v| !v.is_null()) {
                debug!("Coerced malformed numeric field to 0: {:?}", value);
            }
            0.0
        }
    }
}

/// Parse a record timestamp: RFC 3339 or a close ISO 8601 relative, a naive
/// UTC date-time, a bare date, or epoch millis.
fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(naive, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn raw(value: Value) -> RawReading {
        RawReading::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_numeric_fields() {
        let reading = normalize(
            &raw(json!({"tds": 300, "temperature": 22.5, "timestamp": "2024-05-01T11:59:30Z"})),
            now(),
        );
        assert_eq!(reading.tds, 300.0);
        assert_eq!(reading.temperature, 22.5);
        assert_eq!(
            reading.timestamp,
            Utc.with_ymd_and_hms(2024, 5, 1, 11, 59, 30).unwrap()
        );
    }

    #[test]
    fn test_normalize_numeric_strings() {
        let reading = normalize(&raw(json!({"tds": " 412.5 ", "temperature": "18"})), now());
        assert_eq!(reading.tds, 412.5);
        assert_eq!(reading.temperature, 18.0);
    }

    #[test]
    fn test_malformed_fields_become_zero() {
        // {tds: "abc", temperature: undefined}
        let reading = normalize(&raw(json!({"tds": "abc"})), now());
        assert_eq!(reading.tds, 0.0);
        assert_eq!(reading.temperature, 0.0);
    }

    #[test]
    fn test_non_finite_and_structured_values_become_zero() {
        let reading = normalize(&raw(json!({"tds": "NaN", "temperature": [1, 2]})), now());
        assert_eq!(reading.tds, 0.0);
        assert_eq!(reading.temperature, 0.0);

        let reading = normalize(&raw(json!({"tds": "inf", "temperature": {"c": 20}})), now());
        assert_eq!(reading.tds, 0.0);
        assert_eq!(reading.temperature, 0.0);
    }

    #[test]
    fn test_bool_and_null_fields() {
        let reading = normalize(&raw(json!({"tds": true, "temperature": null})), now());
        assert_eq!(reading.tds, 1.0);
        assert_eq!(reading.temperature, 0.0);
    }

    #[test]
    fn test_missing_timestamp_uses_now() {
        let reading = normalize(&raw(json!({"tds": 1, "temperature": 2})), now());
        assert_eq!(reading.timestamp, now());
    }

    #[test]
    fn test_invalid_timestamp_uses_now() {
        let reading = normalize(&raw(json!({"timestamp": "yesterday-ish"})), now());
        assert_eq!(reading.timestamp, now());
    }

    #[test]
    fn test_timestamp_with_offset() {
        let reading = normalize(&raw(json!({"timestamp": "2024-05-01T14:00:00+02:00"})), now());
        assert_eq!(reading.timestamp, now());
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let reading = normalize(&raw(json!({"timestamp": "2024-05-01T11:00:00.250"})), now());
        assert_eq!(
            reading.timestamp,
            Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap() + chrono::TimeDelta::milliseconds(250)
        );
    }

    #[test]
    fn test_timestamp_without_seconds() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 11, 59, 0).unwrap();

        let reading = normalize(&raw(json!({"timestamp": "2024-05-01T11:59Z"})), now());
        assert_eq!(reading.timestamp, expected);

        let reading = normalize(&raw(json!({"timestamp": "2024-05-01T13:59+02:00"})), now());
        assert_eq!(reading.timestamp, expected);

        let reading = normalize(&raw(json!({"timestamp": "2024-05-01T11:59"})), now());
        assert_eq!(reading.timestamp, expected);
    }

    #[test]
    fn test_timestamp_compact_offset() {
        let reading = normalize(&raw(json!({"timestamp": "2024-05-01T14:00:00+0200"})), now());
        assert_eq!(reading.timestamp, now());
    }

    #[test]
    fn test_date_only_timestamp_is_midnight_utc() {
        let reading = normalize(&raw(json!({"timestamp": "2024-05-01"})), now());
        assert_eq!(
            reading.timestamp,
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_epoch_millis_timestamp() {
        let millis = now().timestamp_millis() - 5_000;
        let reading = normalize(&raw(json!({"timestamp": millis})), now());
        assert_eq!(reading.timestamp.timestamp_millis(), millis);
    }

    #[test]
    fn test_from_value_null_is_absent() {
        assert!(RawReading::from_value(Value::Null).is_none());
    }

    #[test]
    fn test_from_value_scalar_is_empty_record() {
        let record = RawReading::from_value(json!(42)).unwrap();
        assert_eq!(record, RawReading::default());

        let reading = normalize(&record, now());
        assert_eq!(reading, Reading::new(now(), 0.0, 0.0));
    }

    #[test]
    fn test_deserialize_raw_reading() {
        let record: RawReading =
            serde_json::from_str(r#"{"tds": "250", "temperature": 21.0, "extra": true}"#).unwrap();
        assert_eq!(record.tds, Some(json!("250")));
        assert_eq!(record.temperature, Some(json!(21.0)));
        assert!(record.timestamp.is_none());
    }
}
