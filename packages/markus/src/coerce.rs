//! Conversions between call-time argument values, wire strings and
//! response leaves.
//!
//! Arguments arrive as loosely typed `serde_json::Value`s. Every conversion
//! either produces the exact wire text or fails with
//! `MarkusError::InvalidArgument`; nothing falls back to a default.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::error::{MarkusError, Result};

/// Wire format of dates sent to the API (`dd.MM.yyyy`).
pub const WIRE_DATE_FORMAT: &str = "%d.%m.%Y";

/// ISO date prefix: YYYY-MM-DD, optionally followed by a time part.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ISO_DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:[T ].*)?$").expect("valid regex"));

/// Wire date pattern: dd.MM.yyyy.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WIRE_DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("valid regex"));

/// Render a boolean the way the API expects it.
///
/// # Examples
/// ```
/// use markus_client::coerce::bool_to_wire;
///
/// assert_eq!(bool_to_wire(true), "true");
/// assert_eq!(bool_to_wire(false), "false");
/// ```
#[must_use]
pub fn bool_to_wire(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Read a boolean argument.
///
/// Accepts JSON booleans and the strings `"true"` / `"false"`.
pub fn as_bool(key: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(MarkusError::invalid_argument(
            key,
            format!("expected a boolean, got {other}"),
        )),
    }
}

/// Read an optional flag argument.
///
/// Missing and `null` count as `false`; any other value must be a boolean.
///
/// # Examples
/// ```
/// use markus_client::coerce::read_flag;
/// use serde_json::json;
///
/// let args = json!({"coming_soon": true, "bad": "yes"});
/// let args = args.as_object().unwrap();
///
/// assert!(read_flag(args, "coming_soon").unwrap());
/// assert!(!read_flag(args, "missing").unwrap());
/// assert!(read_flag(args, "bad").is_err());
/// ```
pub fn read_flag(args: &serde_json::Map<String, Value>, key: &str) -> Result<bool> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(value) => as_bool(key, value),
    }
}

/// Convert a boolean argument to its wire text.
pub fn bool_value_to_wire(key: &str, value: &Value) -> Result<String> {
    as_bool(key, value).map(|b| bool_to_wire(b).to_string())
}

/// Convert a date argument to `dd.MM.yyyy`.
///
/// Accepts `YYYY-MM-DD`, ISO datetimes (`2014-04-05T10:00:00`) and dates
/// already in wire format.
///
/// # Examples
/// ```
/// use markus_client::coerce::date_to_wire;
/// use serde_json::json;
///
/// assert_eq!(date_to_wire("date", &json!("2014-04-05")).unwrap(), "05.04.2014");
/// assert_eq!(date_to_wire("date", &json!("2014-04-05T18:30:00")).unwrap(), "05.04.2014");
/// assert!(date_to_wire("date", &json!("2014-13-05")).is_err());
/// ```
pub fn date_to_wire(key: &str, value: &Value) -> Result<String> {
    let Value::String(text) = value else {
        return Err(MarkusError::invalid_argument(
            key,
            format!("expected a date string, got {value}"),
        ));
    };

    let date = if let Some(captures) = ISO_DATE_PREFIX.captures(text) {
        NaiveDate::parse_from_str(&captures[1], "%Y-%m-%d").ok()
    } else if WIRE_DATE_PATTERN.is_match(text) {
        NaiveDate::parse_from_str(text, WIRE_DATE_FORMAT).ok()
    } else {
        None
    };

    date.map(|d| d.format(WIRE_DATE_FORMAT).to_string())
        .ok_or_else(|| {
            MarkusError::invalid_argument(key, format!("'{text}' is not a valid date (YYYY-MM-DD)"))
        })
}

/// Convert an integer argument (such as a day count) to its wire text.
///
/// Accepts JSON integers and strings holding an integer.
pub fn integer_to_wire(key: &str, value: &Value) -> Result<String> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.map(|n| n.to_string()).ok_or_else(|| {
        MarkusError::invalid_argument(key, format!("expected an integer, got {value}"))
    })
}

/// Convert an identifier-like argument to its wire text.
///
/// Strings pass through verbatim, numbers are written in decimal and
/// booleans as `true`/`false`. Arrays and objects are rejected.
pub fn identifier_to_wire(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(bool_to_wire(*b).to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(MarkusError::invalid_argument(
            key,
            format!("expected a scalar value, got {value}"),
        )),
    }
}

/// Parse an integer response leaf.
///
/// Fails loudly instead of defaulting to zero.
pub fn parse_integer(text: &str, context: &str) -> Result<i64> {
    text.trim().parse::<i64>().map_err(|_| {
        MarkusError::malformed(context, format!("expected an integer, found '{text}'"))
    })
}

/// Reduce an ISO date or datetime response leaf to its `YYYY-MM-DD` part.
///
/// # Examples
/// ```
/// use markus_client::coerce::iso_date;
///
/// assert_eq!(iso_date("2014-04-18T00:00:00", "Event").unwrap(), "2014-04-18");
/// assert_eq!(iso_date("2014-04-18", "Event").unwrap(), "2014-04-18");
/// assert!(iso_date("18.04.2014", "Event").is_err());
/// assert!(iso_date("2014-13-45T00:00:00", "Event").is_err());
/// ```
pub fn iso_date(text: &str, context: &str) -> Result<String> {
    ISO_DATE_PREFIX
        .captures(text.trim())
        .and_then(|captures| NaiveDate::parse_from_str(&captures[1], "%Y-%m-%d").ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| MarkusError::malformed(context, format!("expected an ISO date, found '{text}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_bool() {
        assert!(as_bool("flag", &json!(true)).unwrap());
        assert!(!as_bool("flag", &json!("false")).unwrap());
        assert!(as_bool("flag", &json!(1)).is_err());
        assert!(as_bool("flag", &json!("yes")).is_err());
    }

    #[test]
    fn test_read_flag() {
        let args = json!({"on": true, "off": false, "text": "true", "null": null, "junk": 3});
        let args = args.as_object().unwrap();

        assert!(read_flag(args, "on").unwrap());
        assert!(read_flag(args, "text").unwrap());
        assert!(!read_flag(args, "off").unwrap());
        assert!(!read_flag(args, "null").unwrap());
        assert!(!read_flag(args, "missing").unwrap());

        let err = read_flag(args, "junk").unwrap_err();
        assert!(matches!(err, MarkusError::InvalidArgument { ref key, .. } if key == "junk"));
    }

    #[test]
    fn test_date_to_wire_wire_format_passthrough() {
        assert_eq!(date_to_wire("date", &json!("05.04.2014")).unwrap(), "05.04.2014");
        assert!(date_to_wire("date", &json!("31.02.2014")).is_err());
    }

    #[test]
    fn test_date_to_wire_rejects_non_strings() {
        let err = date_to_wire("date", &json!(20140405)).unwrap_err();
        assert!(matches!(err, MarkusError::InvalidArgument { ref key, .. } if key == "date"));
    }

    #[test]
    fn test_integer_to_wire() {
        assert_eq!(integer_to_wire("days", &json!(12)).unwrap(), "12");
        assert_eq!(integer_to_wire("days", &json!("7")).unwrap(), "7");
        assert!(integer_to_wire("days", &json!(1.5)).is_err());
        assert!(integer_to_wire("days", &json!("seven")).is_err());
    }

    #[test]
    fn test_identifier_to_wire() {
        assert_eq!(identifier_to_wire("area", &json!(1000)).unwrap(), "1000");
        assert_eq!(identifier_to_wire("area", &json!("1012")).unwrap(), "1012");
        assert_eq!(identifier_to_wire("area", &json!(true)).unwrap(), "true");
        assert!(identifier_to_wire("area", &json!([1, 2])).is_err());
        assert!(identifier_to_wire("area", &json!({"id": 1})).is_err());
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("301312", "Event").unwrap(), 301312);
        assert_eq!(parse_integer(" 42 ", "Event").unwrap(), 42);

        let err = parse_integer("abc", "Event").unwrap_err();
        assert!(matches!(err, MarkusError::MalformedResponse { .. }));
        assert!(parse_integer("", "Event").is_err());
    }

    #[test]
    fn test_iso_date_rejects_impossible_dates() {
        assert_eq!(iso_date(" 2014-02-28 10:00:00 ", "Show").unwrap(), "2014-02-28");

        for text in ["2014-13-45T00:00:00", "2014-02-30", "2014-00-10T12:00:00"] {
            let err = iso_date(text, "Show.date").unwrap_err();
            assert!(
                matches!(err, MarkusError::MalformedResponse { ref context, .. } if context == "Show.date"),
                "accepted {text}"
            );
        }
    }
}
