//! Serde helper functions for request payloads.
//!
//! These functions handle the quirks of form-style submissions where empty
//! strings should be treated as None and binary data arrives base64-encoded.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize a flag sent either as a JSON bool or as a form string
/// (`"true"`, `"on"`, `"1"`, `"false"`, `"off"`, `"0"`, `""`).
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Flag::Bool(b)) => Ok(b),
        Some(Flag::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "1" => Ok(true),
            "false" | "off" | "0" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!("invalid flag: {other}"))),
        },
    }
}

/// Deserialize an optional number sent either as a JSON number or a form
/// string, treating empty strings as None.
pub fn deserialize_optional_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + Deserialize<'de>,
    T::Err: std::fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number<T> {
        Value(T),
        Text(String),
    }

    match Option::<Number<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Number::Value(v)) => Ok(Some(v)),
        Some(Number::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Number::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Deserialize base64 text into bytes.
pub fn deserialize_base64<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let encoded = match s.split_once(";base64,") {
        Some((_, data)) => data,
        None => s.as_str(),
    };
    STANDARD
        .decode(encoded.trim())
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        string_field: Option<String>,
        #[serde(default, deserialize_with = "deserialize_flag")]
        flag_field: bool,
        #[serde(default, deserialize_with = "deserialize_optional_number")]
        number_field: Option<u32>,
        #[serde(default, deserialize_with = "deserialize_optional_number")]
        float_field: Option<f64>,
    }

    fn parse(json: &str) -> TestStruct {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_deserialize_optional_string_empty() {
        assert_eq!(parse(r#"{"string_field": "  "}"#).string_field, None);
        assert_eq!(
            parse(r#"{"string_field": "hello"}"#).string_field,
            Some("hello".to_string())
        );
    }

    #[test]
    fn test_deserialize_flag_variants() {
        assert!(parse(r#"{"flag_field": true}"#).flag_field);
        assert!(parse(r#"{"flag_field": "on"}"#).flag_field);
        assert!(parse(r#"{"flag_field": "TRUE"}"#).flag_field);
        assert!(!parse(r#"{"flag_field": "0"}"#).flag_field);
        assert!(!parse(r#"{"flag_field": null}"#).flag_field);
        assert!(!parse("{}").flag_field);
    }

    #[test]
    fn test_deserialize_flag_rejects_garbage() {
        let result: Result<TestStruct, _> = serde_json::from_str(r#"{"flag_field": "maybe"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_optional_number_variants() {
        assert_eq!(parse(r#"{"number_field": 12}"#).number_field, Some(12));
        assert_eq!(parse(r#"{"number_field": "15"}"#).number_field, Some(15));
        assert_eq!(parse(r#"{"number_field": ""}"#).number_field, None);
        assert_eq!(parse(r#"{"float_field": "2.5"}"#).float_field, Some(2.5));
        assert_eq!(parse("{}").number_field, None);
    }

    #[test]
    fn test_deserialize_base64_accepts_data_url() {
        #[derive(Deserialize)]
        struct Blob {
            #[serde(deserialize_with = "deserialize_base64")]
            data: Vec<u8>,
        }

        let plain: Blob = serde_json::from_str(r#"{"data": "YWJj"}"#).unwrap();
        let url: Blob = serde_json::from_str(r#"{"data": "data:image/png;base64,YWJj"}"#).unwrap();

        assert_eq!(plain.data, b"abc");
        assert_eq!(url.data, b"abc");
    }
}
