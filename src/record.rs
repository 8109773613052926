use chrono::{DateTime, Local};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const UNKNOWN_USER: &str = "unknown";
pub const ZERO_COUNT: &str = "0";

/// A curated TikTok video as persisted in the feed document.
///
/// Deserialization is lenient about what older writers produced: numeric ids
/// and counts become strings and `null` falls back to the field default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(deserialize_with = "required_text")]
    pub id: String,
    pub url: String,
    #[serde(default = "unknown_user", deserialize_with = "text_or_unknown")]
    pub username: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub description: String,
    #[serde(default = "today", deserialize_with = "text_or_today")]
    pub date: String,
    #[serde(default = "zero_count", deserialize_with = "text_or_zero")]
    pub likes: String,
    #[serde(default = "zero_count", deserialize_with = "text_or_zero")]
    pub comments: String,
    #[serde(default = "zero_count", deserialize_with = "text_or_zero")]
    pub shares: String,
    #[serde(default, deserialize_with = "bool_or_false")]
    pub verified: bool,
    /// Set by the store when the record is first inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_date: Option<String>,
}

impl VideoRecord {
    /// Record with every optional field at its default.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            username: unknown_user(),
            description: String::new(),
            date: today(),
            likes: zero_count(),
            comments: zero_count(),
            shares: zero_count(),
            verified: false,
            added_date: None,
        }
    }
}

/// Values supplied by hand that override whatever the URL yields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualFields {
    pub username: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub likes: Option<String>,
    pub comments: Option<String>,
    pub shares: Option<String>,
    pub verified: Option<bool>,
}

/// Local calendar date as `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Local ISO-8601 timestamp with microseconds and no offset.
pub fn timestamp_now() -> String {
    format_timestamp(&Local::now())
}

pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Strings and numbers as text, `null` as absent.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) => Ok(Some(number.to_string())),
        other => Err(D::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

fn required_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar_text(deserializer)?
        .filter(|text| !text.is_empty())
        .ok_or_else(|| D::Error::custom("missing value"))
}

fn text_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(deserializer)?.unwrap_or_else(unknown_user))
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(deserializer)?.unwrap_or_default())
}

fn text_or_today<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(deserializer)?.unwrap_or_else(today))
}

fn text_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(deserializer)?.unwrap_or_else(zero_count))
}

fn bool_or_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

fn unknown_user() -> String {
    UNKNOWN_USER.to_string()
}

fn zero_count() -> String {
    ZERO_COUNT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let record: VideoRecord =
            serde_json::from_str(r#"{"id": "1", "url": "https://www.tiktok.com/t/abc"}"#).unwrap();

        assert_eq!(record.username, "unknown");
        assert_eq!(record.likes, "0");
        assert_eq!(record.comments, "0");
        assert_eq!(record.shares, "0");
        assert!(!record.verified);
        assert_eq!(record.date.len(), 10);
        assert!(record.added_date.is_none());
    }

    #[test]
    fn numeric_values_and_nulls_are_tolerated() {
        let record: VideoRecord = serde_json::from_str(
            r#"{"id": 7300000000000000001, "url": "https://www.tiktok.com/@a/video/7300000000000000001",
                "username": null, "description": null, "likes": 1200, "verified": null}"#,
        )
        .unwrap();

        assert_eq!(record.id, "7300000000000000001");
        assert_eq!(record.username, "unknown");
        assert_eq!(record.description, "");
        assert_eq!(record.likes, "1200");
        assert!(!record.verified);
    }

    #[test]
    fn unusable_id_is_rejected() {
        for json in [
            r#"{"id": null, "url": "u"}"#,
            r#"{"id": {"nested": 1}, "url": "u"}"#,
            r#"{"url": "u"}"#,
        ] {
            assert!(serde_json::from_str::<VideoRecord>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn added_date_is_omitted_until_set() {
        let record = VideoRecord::new("1", "https://www.tiktok.com/t/abc");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("added_date").is_none());
    }

    #[test]
    fn timestamp_has_microsecond_precision() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_timestamp(&at), "2024-03-09T07:05:01.000000");
    }
}
