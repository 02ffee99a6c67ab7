//! Property-list payload decoders.
//!
//! The "where froms" attribute is a plist array of short strings; the
//! download-date attribute is a plist array holding exactly one date.
//! Both decoders validate shape strictly and report the offending
//! element by index and type.

use std::io::Cursor;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use plist::Value;

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "array",
        Value::Dictionary(_) => "dictionary",
        Value::Boolean(_) => "boolean",
        Value::Data(_) => "data",
        Value::Date(_) => "date",
        Value::Real(_) => "real",
        Value::Integer(_) => "integer",
        Value::String(_) => "string",
        Value::Uid(_) => "uid",
        _ => "unknown",
    }
}

/// A string the property-list layer could not transcode becomes this
/// placeholder instead of failing the whole decode.
fn canonical_string(s: &str) -> String {
    if s.contains('\u{0}') {
        "???".to_string()
    } else {
        s.to_string()
    }
}

/// Decode a payload that must be an array of strings.
///
/// Fails fast: the first non-string element discards everything
/// already decoded and reports that element's index and actual type.
pub fn decode_string_list(data: &[u8]) -> Result<Vec<String>, String> {
    let value = Value::from_reader(Cursor::new(data)).map_err(|e| e.to_string())?;
    let Value::Array(items) = value else {
        return Err(format!(
            "Property list is {}, not array",
            type_name(&value)
        ));
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::String(s) => out.push(canonical_string(s)),
            other => {
                return Err(format!(
                    "Array element {i} is {}, not string",
                    type_name(other)
                ));
            }
        }
    }
    Ok(out)
}

fn timestamp_of(date: plist::Date) -> (i64, u16) {
    let system: SystemTime = date.into();
    let dt = DateTime::<Utc>::from(system);
    (dt.timestamp(), dt.timestamp_subsec_millis() as u16)
}

/// Decode a payload that must be a one-element array holding a date.
///
/// Returns `(seconds, milliseconds)` since the UNIX epoch. Wrong
/// element types and extra elements produce an error message; the
/// first error wins, but every element is still scanned and counted.
pub fn decode_single_date(data: &[u8]) -> Result<(i64, u16), String> {
    let value = Value::from_reader(Cursor::new(data)).map_err(|e| e.to_string())?;
    let Value::Array(items) = value else {
        return Err(format!(
            "Property list is {}, not array",
            type_name(&value)
        ));
    };

    let mut error: Option<String> = None;
    let mut found: Option<(i64, u16)> = None;
    let mut count = 0usize;

    for (i, item) in items.iter().enumerate() {
        count += 1;
        match item {
            Value::Date(d) => {
                if found.is_none() {
                    found = Some(timestamp_of(*d));
                }
            }
            other => {
                if error.is_none() {
                    error = Some(format!(
                        "Array element {i} is {}, not date",
                        type_name(other)
                    ));
                }
            }
        }
    }

    if let Some(e) = error {
        return Err(e);
    }
    if count != 1 {
        return Err(format!("Expected array of length 1, but got {count}"));
    }
    found.ok_or_else(|| "Expected array of length 1, but got 0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn binary(value: &Value) -> Vec<u8> {
        let mut buf = Vec::new();
        value.to_writer_binary(&mut buf).expect("serialize plist");
        buf
    }

    fn strings(items: &[&str]) -> Value {
        Value::Array(items.iter().map(|s| Value::String((*s).to_string())).collect())
    }

    #[test]
    fn test_string_list_decodes_in_order() {
        let data = binary(&strings(&["http://a/", "http://b/"]));
        assert_eq!(
            decode_string_list(&data).unwrap(),
            vec!["http://a/".to_string(), "http://b/".to_string()]
        );
    }

    #[test]
    fn test_string_list_fails_fast_on_wrong_element() {
        let data = binary(&Value::Array(vec![
            Value::String("a".into()),
            Value::String("b".into()),
            Value::Integer(7.into()),
            Value::String("c".into()),
        ]));
        let err = decode_string_list(&data).unwrap_err();
        assert_eq!(err, "Array element 2 is integer, not string");
    }

    #[test]
    fn test_string_list_rejects_non_array() {
        let data = binary(&Value::String("just a string".into()));
        let err = decode_string_list(&data).unwrap_err();
        assert_eq!(err, "Property list is string, not array");
    }

    #[test]
    fn test_string_list_rejects_garbage_payload() {
        assert!(decode_string_list(b"\x00\x01not a plist").is_err());
    }

    #[test]
    fn test_single_date_round_trips_with_millis() {
        let when = SystemTime::UNIX_EPOCH + Duration::from_millis(1_595_550_524_250);
        let data = binary(&Value::Array(vec![Value::Date(plist::Date::from(when))]));
        let (secs, millis) = decode_single_date(&data).unwrap();
        assert_eq!(secs, 1_595_550_524);
        assert_eq!(millis, 250);
    }

    #[test]
    fn test_single_date_rejects_extra_elements() {
        let when = SystemTime::UNIX_EPOCH + Duration::from_secs(1000);
        let data = binary(&Value::Array(vec![
            Value::Date(plist::Date::from(when)),
            Value::Date(plist::Date::from(when)),
        ]));
        let err = decode_single_date(&data).unwrap_err();
        assert_eq!(err, "Expected array of length 1, but got 2");
    }

    #[test]
    fn test_single_date_element_error_wins_over_length() {
        let when = SystemTime::UNIX_EPOCH + Duration::from_secs(1000);
        let data = binary(&Value::Array(vec![
            Value::Date(plist::Date::from(when)),
            Value::Integer(3.into()),
        ]));
        let err = decode_single_date(&data).unwrap_err();
        assert_eq!(err, "Array element 1 is integer, not date");
    }

    #[test]
    fn test_single_date_rejects_empty_array() {
        let data = binary(&Value::Array(vec![]));
        let err = decode_single_date(&data).unwrap_err();
        assert_eq!(err, "Expected array of length 1, but got 0");
    }
}
