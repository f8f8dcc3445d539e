//! Response normalization.
//!
//! Upstream feeds disagree on layout. NOAA SWPC products are a table whose
//! first row names the columns, other services return arrays of records or a
//! single record. [`normalize`] accepts any of these and yields the most
//! recent [`Reading`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::{NormalizeError, Reading};

/// Where to find the time and value of a metric inside a payload.
///
/// Field names are matched case-insensitively after trimming. In tables the
/// time field matches any column *containing* it, the value field matches a
/// column equal to or *starting with* it. Fallbacks are tried in order after
/// the primary name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    pub time_field: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub time_field_fallbacks: Vec<String>,
    pub value_field: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value_field_fallbacks: Vec<String>,
}

impl Schema {
    /// Create a schema with no fallbacks.
    pub fn new(time_field: impl Into<String>, value_field: impl Into<String>) -> Self {
        Self {
            time_field: time_field.into(),
            time_field_fallbacks: Vec::new(),
            value_field: value_field.into(),
            value_field_fallbacks: Vec::new(),
        }
    }

    /// Add an alternate name for the time field.
    pub fn time_fallback(mut self, name: impl Into<String>) -> Self {
        self.time_field_fallbacks.push(name.into());
        self
    }

    /// Add an alternate name for the value field.
    pub fn value_fallback(mut self, name: impl Into<String>) -> Self {
        self.value_field_fallbacks.push(name.into());
        self
    }

    fn time_candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.time_field.as_str())
            .chain(self.time_field_fallbacks.iter().map(String::as_str))
    }

    fn value_candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.value_field.as_str())
            .chain(self.value_field_fallbacks.iter().map(String::as_str))
    }
}

/// The layouts the normalizer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Array of arrays, first row is a header of column names.
    Table,
    /// Array of objects.
    Records,
    /// A bare object, treated as a one-element record sequence.
    Record,
}

impl PayloadShape {
    /// Classify a payload, or explain why it fits no known shape.
    pub fn detect(payload: &Value) -> Result<Self, NormalizeError> {
        match payload {
            Value::Array(items) => match items.first() {
                None => Err(NormalizeError::UnrecognizedPayloadShape(
                    "empty array".to_string(),
                )),
                Some(Value::Array(_)) => Ok(PayloadShape::Table),
                Some(Value::Object(_)) => Ok(PayloadShape::Records),
                Some(other) => Err(NormalizeError::UnrecognizedPayloadShape(format!(
                    "array of {}",
                    json_kind(other)
                ))),
            },
            Value::Object(_) => Ok(PayloadShape::Record),
            other => Err(NormalizeError::UnrecognizedPayloadShape(
                json_kind(other).to_string(),
            )),
        }
    }
}

/// Outcome of [`normalize_or_default`]: always a reading, sometimes a notice.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub reading: Reading,
    /// Set when `reading` is the sentinel rather than real data.
    pub notice: Option<NormalizeError>,
}

impl Normalized {
    /// True when the reading came from the payload.
    pub fn is_clean(&self) -> bool {
        self.notice.is_none()
    }
}

/// Extract the most recent reading from a payload.
pub fn normalize(payload: &Value, schema: &Schema) -> Result<Reading, NormalizeError> {
    let shape = PayloadShape::detect(payload)?;
    match (shape, payload) {
        (PayloadShape::Table, Value::Array(rows)) => normalize_table(rows, schema),
        // Detection only looked at the first element.
        (PayloadShape::Records, Value::Array(records)) => match records.last() {
            Some(Value::Object(record)) => normalize_record(record, schema),
            other => Err(NormalizeError::UnrecognizedPayloadShape(format!(
                "last record is {}",
                other.map_or("missing", json_kind)
            ))),
        },
        (_, Value::Object(record)) => normalize_record(record, schema),
        (_, other) => Err(NormalizeError::UnrecognizedPayloadShape(
            json_kind(other).to_string(),
        )),
    }
}

/// Like [`normalize`], but never fails.
///
/// On error the reading is [`Reading::sentinel`] and the error is returned as
/// a notice for the caller to surface.
pub fn normalize_or_default(payload: &Value, schema: &Schema) -> Normalized {
    match normalize(payload, schema) {
        Ok(reading) => Normalized {
            reading,
            notice: None,
        },
        Err(e) => Normalized {
            reading: Reading::sentinel(),
            notice: Some(e),
        },
    }
}

/// Parse an ISO-8601 timestamp onto a naive UTC clock.
///
/// A trailing `Z` means UTC, explicit offsets are applied and dropped, and
/// timestamps without an offset are taken to already be UTC. The date and
/// time may be separated by `T` or a single space.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, NormalizeError> {
    const OFFSET_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M%:z",
    ];
    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    let mut text = raw.trim().to_string();
    if text.as_bytes().get(10) == Some(&b' ') {
        text.replace_range(10..11, "T");
    }
    if text.ends_with('Z') || text.ends_with('z') {
        text.pop();
        text.push_str("+00:00");
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&text, fmt) {
            return Ok(dt.naive_utc());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&text, fmt) {
            return Ok(dt);
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight);
    }

    Err(NormalizeError::TimestampParse(raw.to_string()))
}

fn normalize_table(rows: &[Value], schema: &Schema) -> Result<Reading, NormalizeError> {
    let header = table_header(rows)?;
    if rows.len() < 2 {
        return Err(NormalizeError::UnrecognizedPayloadShape(
            "table has a header but no rows".to_string(),
        ));
    }

    let time_idx = find_column(&header, schema.time_candidates(), |col, key| {
        col.contains(key)
    })
    .ok_or_else(|| NormalizeError::MissingField(schema.time_field.clone()))?;
    let value_idx = find_column(&header, schema.value_candidates(), |col, key| {
        col == key || col.starts_with(key)
    })
    .ok_or_else(|| NormalizeError::MissingField(schema.value_field.clone()))?;

    let Some(Value::Array(last)) = rows.last() else {
        return Err(NormalizeError::UnrecognizedPayloadShape(
            "last table row is not an array".to_string(),
        ));
    };

    let time = last
        .get(time_idx)
        .filter(|v| !v.is_null())
        .ok_or_else(|| NormalizeError::MissingField(header[time_idx].clone()))?;
    let value = last
        .get(value_idx)
        .filter(|v| !v.is_null())
        .ok_or_else(|| NormalizeError::MissingField(header[value_idx].clone()))?;

    Ok(Reading {
        value: to_number(value, &header[value_idx])?,
        timestamp: to_timestamp(time)?,
    })
}

/// Column names of the first row, trimmed and lower-cased.
fn table_header(rows: &[Value]) -> Result<Vec<String>, NormalizeError> {
    let not_a_header =
        || NormalizeError::UnrecognizedPayloadShape("table without a header row".to_string());

    let Some(Value::Array(first)) = rows.first() else {
        return Err(not_a_header());
    };
    first
        .iter()
        .map(|cell| cell.as_str().map(|s| s.trim().to_lowercase()).ok_or_else(not_a_header))
        .collect()
}

fn find_column<'a>(
    header: &[String],
    candidates: impl Iterator<Item = &'a str>,
    matches: impl Fn(&str, &str) -> bool,
) -> Option<usize> {
    for candidate in candidates {
        let key = candidate.trim().to_lowercase();
        if let Some(idx) = header.iter().position(|col| matches(col, &key)) {
            return Some(idx);
        }
    }
    None
}

fn normalize_record(record: &Map<String, Value>, schema: &Schema) -> Result<Reading, NormalizeError> {
    let (_, time) = lookup(record, schema.time_candidates())
        .ok_or_else(|| NormalizeError::MissingField(schema.time_field.clone()))?;
    let (value_key, value) = lookup(record, schema.value_candidates())
        .ok_or_else(|| NormalizeError::MissingField(schema.value_field.clone()))?;

    Ok(Reading {
        value: to_number(value, value_key)?,
        timestamp: to_timestamp(time)?,
    })
}

/// First non-null entry among the candidate keys. Exact key first, then a
/// case-insensitive match.
fn lookup<'a, 'k>(
    record: &'a Map<String, Value>,
    candidates: impl Iterator<Item = &'k str>,
) -> Option<(&'a str, &'a Value)> {
    for candidate in candidates {
        let found = record.iter().find(|(k, _)| k.as_str() == candidate).or_else(|| {
            record
                .iter()
                .find(|(k, _)| k.trim().eq_ignore_ascii_case(candidate.trim()))
        });
        if let Some((k, v)) = found {
            if !v.is_null() {
                return Some((k.as_str(), v));
            }
        }
    }
    None
}

fn to_number(value: &Value, field: &str) -> Result<f64, NormalizeError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| NormalizeError::InvalidValue {
            field: field.to_string(),
            raw: value.to_string(),
        })
}

fn to_timestamp(value: &Value) -> Result<NaiveDateTime, NormalizeError> {
    match value {
        Value::String(s) => parse_timestamp(s),
        other => Err(NormalizeError::TimestampParse(other.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn kp_schema() -> Schema {
        Schema::new("time_tag", "kp_index").value_fallback("kp")
    }

    fn mag_schema() -> Schema {
        Schema::new("time_tag", "bz_gse").value_fallback("bz_gsm")
    }

    #[test]
    fn test_table_takes_last_row() {
        let payload = json!([
            ["time_tag", "Kp", "a_running", "station_count"],
            ["2024-05-10 09:00:00.000", "2.67", "12", "8"],
            ["2024-05-10 12:00:00.000", "4.33", "32", "8"],
        ]);

        let reading = normalize(&payload, &kp_schema()).unwrap();
        assert_eq!(reading.value, 4.33);
        assert_eq!(reading.timestamp, at(2024, 5, 10, 12, 0, 0));
    }

    #[test]
    fn test_table_header_ignores_case_and_whitespace() {
        let payload = json!([
            ["  TIME_TAG ", "  Kp\t", "A_Running"],
            ["2024-05-10T03:00:00Z", "5.0", "48"],
        ]);

        let reading = normalize(&payload, &kp_schema()).unwrap();
        assert_eq!(reading.value, 5.0);
        assert_eq!(reading.timestamp, at(2024, 5, 10, 3, 0, 0));
    }

    #[test]
    fn test_table_time_column_matched_by_substring() {
        let payload = json!([
            ["observation_time_tag_utc", "kp"],
            ["2024-05-10T06:00:00Z", 1.33],
        ]);

        let reading = normalize(&payload, &kp_schema()).unwrap();
        assert_eq!(reading.value, 1.33);
    }

    #[test]
    fn test_table_value_fallback_column() {
        let payload = json!([
            ["time_tag", "bx_gsm", "by_gsm", "bz_gsm", "lon_gsm", "lat_gsm", "bt"],
            ["2024-05-10 17:05:00.000", "1.2", "-3.4", "-6.75", "289", "-48", "9.1"],
        ]);

        let reading = normalize(&payload, &mag_schema()).unwrap();
        assert_eq!(reading.value, -6.75);
    }

    #[test]
    fn test_table_prefers_primary_value_column() {
        let payload = json!([
            ["time_tag", "bz_gsm", "bz_gse"],
            ["2024-05-10 17:05:00.000", "-1.0", "2.0"],
        ]);

        let reading = normalize(&payload, &mag_schema()).unwrap();
        assert_eq!(reading.value, 2.0);
    }

    #[test]
    fn test_table_missing_value_column() {
        let payload = json!([["time_tag", "bt"], ["2024-05-10 17:05:00.000", "9.1"]]);

        let err = normalize(&payload, &mag_schema()).unwrap_err();
        assert_eq!(err, NormalizeError::MissingField("bz_gse".to_string()));
    }

    #[test]
    fn test_table_header_only() {
        let payload = json!([["time_tag", "kp"]]);
        let err = normalize(&payload, &kp_schema()).unwrap_err();
        assert!(matches!(err, NormalizeError::UnrecognizedPayloadShape(_)));
    }

    #[test]
    fn test_table_without_header_row() {
        let payload = json!([["2024-05-10 17:05:00.000", 3.0], ["2024-05-10 18:05:00.000", 4.0]]);
        let err = normalize(&payload, &kp_schema()).unwrap_err();
        assert!(matches!(err, NormalizeError::UnrecognizedPayloadShape(_)));
    }

    #[test]
    fn test_table_null_cell_is_missing() {
        let payload = json!([["time_tag", "bz_gsm"], ["2024-05-10 17:05:00.000", null]]);
        let err = normalize(&payload, &mag_schema()).unwrap_err();
        assert_eq!(err, NormalizeError::MissingField("bz_gsm".to_string()));
    }

    #[test]
    fn test_records_take_last_element() {
        let payload = json!([
            { "time_tag": "2024-05-10T00:00:00", "kp_index": 1 },
            { "time_tag": "2024-05-10T03:00:00", "kp_index": 2 },
            { "time_tag": "2024-05-10T06:00:00", "kp_index": 8 },
        ]);

        let reading = normalize(&payload, &kp_schema()).unwrap();
        assert_eq!(reading.value, 8.0);
        assert_eq!(reading.timestamp, at(2024, 5, 10, 6, 0, 0));
    }

    #[test]
    fn test_records_never_use_earlier_element() {
        // Earlier records are valid, the last one is not: no silent fallback.
        let payload = json!([
            { "time_tag": "2024-05-10T00:00:00", "kp": 3 },
            { "time_tag": "2024-05-10T03:00:00" },
        ]);

        let err = normalize(&payload, &kp_schema()).unwrap_err();
        assert_eq!(err, NormalizeError::MissingField("kp_index".to_string()));
    }

    #[test]
    fn test_records_primary_key_wins_over_fallback() {
        let payload = json!([{ "time_tag": "2024-05-10T00:00:00", "kp": 4, "kp_index": 9 }]);
        let reading = normalize(&payload, &kp_schema()).unwrap();
        assert_eq!(reading.value, 9.0);
    }

    #[test]
    fn test_records_primary_key_skips_string_fallback() {
        let payload = json!([{
            "time_tag": "2024-05-10T18:00:00",
            "kp_index": 8,
            "estimated_kp": 8.33,
            "kp": "8P"
        }]);
        let reading = normalize(&payload, &kp_schema()).unwrap();
        assert_eq!(reading.value, 8.0);
        assert_eq!(reading.timestamp, at(2024, 5, 10, 18, 0, 0));
    }

    #[test]
    fn test_records_null_primary_uses_fallback() {
        let payload = json!([{ "time_tag": "2024-05-10T00:00:00", "kp_index": null, "kp": 6 }]);
        let reading = normalize(&payload, &kp_schema()).unwrap();
        assert_eq!(reading.value, 6.0);
    }

    #[test]
    fn test_single_record_object() {
        let payload = json!({
            "lat": 50.7,
            "lon": 9.3,
            "date_iso": "2024-05-10T12:00:00Z",
            "date": 1715342400,
            "value": 6.41
        });

        let reading = normalize(&payload, &Schema::new("date_iso", "value")).unwrap();
        assert_eq!(reading.value, 6.41);
        assert_eq!(reading.timestamp, at(2024, 5, 10, 12, 0, 0));
    }

    #[test]
    fn test_non_numeric_value() {
        let payload = json!([{ "time_tag": "2024-05-10T00:00:00", "kp": "n/a" }]);
        let err = normalize(&payload, &kp_schema()).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidValue { ref field, .. } if field == "kp"));
    }

    #[test]
    fn test_unrecognized_shapes() {
        for payload in [json!([]), json!("hello"), json!(42), json!(null), json!([1, 2])] {
            let err = normalize(&payload, &kp_schema()).unwrap_err();
            assert!(
                matches!(err, NormalizeError::UnrecognizedPayloadShape(_)),
                "{payload} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_normalize_or_default_degrades() {
        let before = Utc::now().naive_utc();
        let result = normalize_or_default(&json!({"unexpected": true}), &kp_schema());
        let after = Utc::now().naive_utc();

        assert!(!result.is_clean());
        assert_eq!(result.reading.value, 0.0);
        assert!(result.reading.timestamp >= before && result.reading.timestamp <= after);
        assert_eq!(
            result.notice,
            Some(NormalizeError::MissingField("time_tag".to_string()))
        );
    }

    #[test]
    fn test_normalize_or_default_clean() {
        let payload = json!([["time_tag", "kp"], ["2024-05-10 12:00:00.000", "3.0"]]);
        let result = normalize_or_default(&payload, &kp_schema());
        assert!(result.is_clean());
        assert_eq!(result.reading.value, 3.0);
    }

    #[test]
    fn test_timestamp_z_matches_explicit_offset() {
        for stamp in [
            "2024-05-10T12:34:56",
            "2024-05-10T12:34:56.789",
            "2024-05-10T00:00:00.000000",
            "2024-12-31T23:59",
        ] {
            let zulu = parse_timestamp(&format!("{stamp}Z")).unwrap();
            let explicit = DateTime::parse_from_str(
                &format!("{stamp}+00:00"),
                if stamp.len() == 16 {
                    "%Y-%m-%dT%H:%M%:z"
                } else {
                    "%Y-%m-%dT%H:%M:%S%.f%:z"
                },
            )
            .unwrap()
            .naive_utc();
            assert_eq!(zulu, explicit, "{stamp}");
        }
    }

    #[test]
    fn test_timestamp_offset_converted_to_utc() {
        let ts = parse_timestamp("2024-05-10T14:00:00+02:00").unwrap();
        assert_eq!(ts, at(2024, 5, 10, 12, 0, 0));
    }

    #[test]
    fn test_timestamp_space_separator_and_fraction() {
        let ts = parse_timestamp("2024-05-10 12:00:00.000").unwrap();
        assert_eq!(ts, at(2024, 5, 10, 12, 0, 0));
    }

    #[test]
    fn test_timestamp_date_only() {
        assert_eq!(parse_timestamp("2024-05-10").unwrap(), at(2024, 5, 10, 0, 0, 0));
    }

    #[test]
    fn test_timestamp_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert_eq!(err, NormalizeError::TimestampParse("yesterday".to_string()));
    }

    #[test]
    fn test_timestamp_not_a_string() {
        let payload = json!([{ "time_tag": 1715342400, "kp": 3 }]);
        let err = normalize(&payload, &kp_schema()).unwrap_err();
        assert!(matches!(err, NormalizeError::TimestampParse(_)));
    }

    #[test]
    fn test_detect_shapes() {
        assert_eq!(PayloadShape::detect(&json!([["a"]])).unwrap(), PayloadShape::Table);
        assert_eq!(PayloadShape::detect(&json!([{}])).unwrap(), PayloadShape::Records);
        assert_eq!(PayloadShape::detect(&json!({})).unwrap(), PayloadShape::Record);
    }
}
