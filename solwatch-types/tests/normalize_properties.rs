//! Property tests for the normalizer over generated payloads.

use chrono::{DateTime, NaiveDate};
use proptest::prelude::*;
use serde_json::{json, Value};
use solwatch_types::{normalize, normalize_or_default, parse_timestamp, MetricKind};

/// `name` with each letter upper- or lower-cased at random.
fn scrambled_case(name: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), name.len()).prop_map(move |upper| {
        name.chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

/// A header cell for `name` with random casing and surrounding whitespace.
fn header_cell(name: &'static str) -> impl Strategy<Value = String> {
    (scrambled_case(name), "[ \t]{0,3}", "[ \t]{0,3}")
        .prop_map(|(name, left, right)| format!("{left}{name}{right}"))
}

fn kp_value() -> impl Strategy<Value = f64> {
    (0u32..=900).prop_map(|n| f64::from(n) / 100.0)
}

fn minute_stamp(minute: usize) -> String {
    format!("2024-05-10T12:{minute:02}:00Z")
}

/// Payloads that fit neither the table nor the record layout.
fn unrecognized_payload() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        ".{0,20}".prop_map(Value::from),
        proptest::collection::vec(any::<i64>(), 0..5).prop_map(|v| json!(v)),
    ]
}

proptest! {
    /// Header casing and padding never change which columns are picked
    #[test]
    fn table_header_matching_ignores_case_and_padding(
        time_header in header_cell("time_tag"),
        kp_header in header_cell("kp"),
        kp in kp_value(),
    ) {
        let payload = json!([
            [time_header, kp_header, "a_running"],
            ["2024-05-10 15:00:00.000", kp.to_string(), "12"],
        ]);

        let reading = normalize(&payload, &MetricKind::Kp.schema()).unwrap();
        prop_assert_eq!(reading.value, kp);
        prop_assert_eq!(reading.timestamp, parse_timestamp("2024-05-10T15:00:00Z").unwrap());
    }

    /// The last table row is the observation, whatever came before it
    #[test]
    fn table_uses_last_row(values in proptest::collection::vec(kp_value(), 1..30)) {
        let mut rows = vec![json!(["time_tag", "Kp"])];
        rows.extend(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| json!([minute_stamp(i), v.to_string()])),
        );

        let reading = normalize(&Value::Array(rows), &MetricKind::Kp.schema()).unwrap();
        prop_assert_eq!(Some(reading.value), values.last().copied());
        prop_assert_eq!(reading.timestamp, parse_timestamp(&minute_stamp(values.len() - 1)).unwrap());
    }

    /// The last record is the observation, never an earlier one
    #[test]
    fn records_use_last_element(values in proptest::collection::vec(kp_value(), 1..30)) {
        let records: Vec<Value> = values
            .iter()
            .enumerate()
            .map(|(i, v)| json!({"time_tag": minute_stamp(i), "kp_index": v, "kp": format!("{v}P")}))
            .collect();

        let reading = normalize(&Value::Array(records), &MetricKind::Kp.schema()).unwrap();
        prop_assert_eq!(Some(reading.value), values.last().copied());
        prop_assert_eq!(reading.timestamp, parse_timestamp(&minute_stamp(values.len() - 1)).unwrap());
    }

    /// A trailing `Z` means the same instant as an explicit `+00:00`
    #[test]
    fn zulu_equals_explicit_utc_offset(
        days in 0i64..40_000,
        secs in 0u32..86_400,
        millis in proptest::option::of(0u32..1000),
    ) {
        let date = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() + chrono::Duration::days(days);
        let time = chrono::NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap();
        let mut stamp = format!("{}T{}", date.format("%Y-%m-%d"), time.format("%H:%M:%S"));
        if let Some(ms) = millis {
            stamp.push_str(&format!(".{ms:03}"));
        }

        let zulu = parse_timestamp(&format!("{stamp}Z")).unwrap();
        let explicit = DateTime::parse_from_rfc3339(&format!("{stamp}+00:00")).unwrap().naive_utc();
        prop_assert_eq!(zulu, explicit);
    }

    /// Unusable payloads degrade to the sentinel with a notice, never a panic
    #[test]
    fn unrecognized_payloads_degrade(payload in unrecognized_payload()) {
        prop_assert!(normalize(&payload, &MetricKind::Kp.schema()).is_err());

        let result = normalize_or_default(&payload, &MetricKind::Kp.schema());
        prop_assert!(!result.is_clean());
        prop_assert_eq!(result.reading.value, 0.0);
    }
}
