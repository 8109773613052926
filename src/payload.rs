//! Best-effort extraction of video records from search API payloads.
//!
//! The provider's response shape is unstable, so every field is read through
//! an ordered list of extractors. The first one that yields a value wins and
//! the field default applies when none does. Nothing in here fails.

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::record::{today, VideoRecord, UNKNOWN_USER, ZERO_COUNT};

type Extractor<T> = fn(&Value) -> Option<T>;

const FALLBACK_URL: &str = "https://www.tiktok.com";
const UNKNOWN_ID: &str = "unknown";

const ITEM_LISTS: &[&[&str]] = &[
    &["data", "aweme_list"],
    &["aweme_list"],
    &["data", "videos"],
    &["videos"],
];

const ID: &[Extractor<String>] = &[
    |item| id_at(item, &["aweme_id"]),
    |item| id_at(item, &["id"]),
    |item| id_at(item, &["video_id"]),
];

const USERNAME: &[Extractor<String>] = &[
    |item| str_at(item, &["author", "unique_id"]),
    |item| str_at(item, &["author", "nickname"]),
    |item| str_at(item, &["user", "unique_id"]),
    |item| str_at(item, &["user", "nickname"]),
];

const DESCRIPTION: &[Extractor<String>] = &[
    |item| str_at(item, &["desc"]),
    |item| str_at(item, &["description"]),
    |item| str_at(item, &["title"]),
];

const CREATED_AT: &[Extractor<i64>] = &[
    |item| int_at(item, &["create_time"]),
    |item| int_at(item, &["createTime"]),
];

const LIKES: &[Extractor<Value>] = &[
    |item| value_at(item, &["statistics", "digg_count"]),
    |item| value_at(item, &["stats", "likes"]),
    |item| value_at(item, &["digg_count"]),
];

const COMMENTS: &[Extractor<Value>] = &[
    |item| value_at(item, &["statistics", "comment_count"]),
    |item| value_at(item, &["stats", "comments"]),
    |item| value_at(item, &["comment_count"]),
];

const SHARES: &[Extractor<Value>] = &[
    |item| value_at(item, &["statistics", "share_count"]),
    |item| value_at(item, &["stats", "shares"]),
    |item| value_at(item, &["share_count"]),
];

const VERIFIED: &[Extractor<bool>] = &[
    |item| value_at(item, &["author", "verified"]).and_then(|v| v.as_bool()),
    |item| value_at(item, &["user", "verified"]).and_then(|v| v.as_bool()),
];

const URL: &[Extractor<String>] = &[
    |item| {
        lookup(item, &["video", "play_addr", "url_list"])
            .and_then(Value::as_array)
            .and_then(|urls| urls.first())
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    },
    |item| str_at(item, &["share_url"]),
    |item| str_at(item, &["web_url"]),
    |item| {
        let id = id_at(item, &["aweme_id"])?;
        let author = first_of(item, USERNAME).unwrap_or_else(|| UNKNOWN_USER.to_string());
        Some(format!("https://www.tiktok.com/@{author}/video/{id}"))
    },
];

/// Locate the list of video items inside a search response.
pub fn video_items(payload: &Value) -> Vec<&Value> {
    ITEM_LISTS
        .iter()
        .filter_map(|path| lookup(payload, path).and_then(Value::as_array))
        .find(|items| !items.is_empty())
        .map(|items| items.iter().collect())
        .unwrap_or_default()
}

/// Turn every item of a search response into a record.
pub fn records_from_payload(payload: &Value) -> Vec<VideoRecord> {
    video_items(payload)
        .into_iter()
        .map(record_from_item)
        .collect()
}

pub fn record_from_item(item: &Value) -> VideoRecord {
    let id = first_of(item, ID).unwrap_or_else(|| UNKNOWN_ID.to_string());
    let url = first_of(item, URL).unwrap_or_else(|| FALLBACK_URL.to_string());

    let mut record = VideoRecord::new(id, url);
    record.username = first_of(item, USERNAME).unwrap_or_else(|| UNKNOWN_USER.to_string());
    record.description = first_of(item, DESCRIPTION).unwrap_or_default();
    record.date = first_of(item, CREATED_AT)
        .and_then(local_date)
        .unwrap_or_else(today);
    record.likes = count_of(item, LIKES);
    record.comments = count_of(item, COMMENTS);
    record.shares = count_of(item, SHARES);
    record.verified = first_of(item, VERIFIED).unwrap_or(false);
    record
}

/// Render an engagement count the way TikTok displays it ("1.5K", "2.5M").
///
/// Integers, floats and numeric strings are accepted; anything else is "0".
pub fn format_count(value: &Value) -> String {
    match count_value(value) {
        Some(count) => format_number(count),
        None => ZERO_COUNT.to_string(),
    }
}

pub fn format_number(count: i64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

fn count_of(item: &Value, extractors: &[Extractor<Value>]) -> String {
    first_of(item, extractors)
        .map(|value| format_count(&value))
        .unwrap_or_else(|| ZERO_COUNT.to_string())
}

fn count_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn local_date(timestamp: i64) -> Option<String> {
    if timestamp == 0 {
        return None;
    }
    let at = DateTime::from_timestamp(timestamp, 0)?.with_timezone(&Local);
    Some(at.format("%Y-%m-%d").to_string())
}

fn first_of<T>(item: &Value, extractors: &[Extractor<T>]) -> Option<T> {
    extractors.iter().find_map(|extract| extract(item))
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

fn value_at(item: &Value, path: &[&str]) -> Option<Value> {
    lookup(item, path).filter(|v| !v.is_null()).cloned()
}

fn str_at(item: &Value, path: &[&str]) -> Option<String> {
    lookup(item, path)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn id_at(item: &Value, path: &[&str]) -> Option<String> {
    match lookup(item, path)? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn int_at(item: &Value, path: &[&str]) -> Option<i64> {
    lookup(item, path).and_then(count_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_counts_with_suffixes() {
        assert_eq!(format_count(&json!(999)), "999");
        assert_eq!(format_count(&json!(1500)), "1.5K");
        assert_eq!(format_count(&json!(2500000)), "2.5M");
        assert_eq!(format_count(&json!(1000)), "1.0K");
        assert_eq!(format_count(&json!("12345")), "12.3K");
        assert_eq!(format_count(&json!(42.9)), "42");
    }

    #[test]
    fn non_numeric_count_is_zero() {
        assert_eq!(format_count(&json!("lots")), "0");
        assert_eq!(format_count(&json!(null)), "0");
        assert_eq!(format_count(&json!({"n": 1})), "0");
    }

    #[test]
    fn finds_items_under_known_paths() {
        let nested = json!({"data": {"aweme_list": [{"aweme_id": "1"}]}});
        assert_eq!(video_items(&nested).len(), 1);

        let flat = json!({"aweme_list": [], "videos": [{"id": 1}, {"id": 2}]});
        assert_eq!(video_items(&flat).len(), 2);

        let unknown = json!({"data": "nope"});
        assert!(video_items(&unknown).is_empty());
    }

    #[test]
    fn extracts_full_aweme_item() {
        let item = json!({
            "aweme_id": "7300000000000000001",
            "desc": "Sports day at St. Louis Demo JHS",
            "create_time": 1700000000,
            "author": {"unique_id": "stlouis", "nickname": "St Louis", "verified": true},
            "statistics": {"digg_count": 15300, "comment_count": 87, "share_count": 1200000},
            "share_url": "https://www.tiktok.com/@stlouis/video/7300000000000000001"
        });

        let record = record_from_item(&item);
        assert_eq!(record.id, "7300000000000000001");
        assert_eq!(record.username, "stlouis");
        assert_eq!(record.description, "Sports day at St. Louis Demo JHS");
        assert_eq!(record.likes, "15.3K");
        assert_eq!(record.comments, "87");
        assert_eq!(record.shares, "1.2M");
        assert!(record.verified);
        assert_eq!(
            record.url,
            "https://www.tiktok.com/@stlouis/video/7300000000000000001"
        );
        assert_eq!(record.date.len(), 10);
        assert!(record.date.starts_with("2023-11-1"));
    }

    #[test]
    fn falls_through_alternate_keys() {
        let item = json!({
            "id": 55,
            "title": "Graduation",
            "user": {"nickname": "grad_cam", "verified": "yes"},
            "stats": {"likes": "2000", "comments": null},
            "share_count": 3
        });

        let record = record_from_item(&item);
        assert_eq!(record.id, "55");
        assert_eq!(record.username, "grad_cam");
        assert_eq!(record.description, "Graduation");
        assert_eq!(record.likes, "2.0K");
        assert_eq!(record.comments, "0");
        assert_eq!(record.shares, "3");
        assert!(!record.verified);
        assert_eq!(record.url, "https://www.tiktok.com");
    }

    #[test]
    fn play_address_wins_and_url_can_be_built() {
        let with_play = json!({
            "aweme_id": "9",
            "video": {"play_addr": {"url_list": ["https://cdn.example.com/9.mp4"]}},
            "share_url": "https://www.tiktok.com/@a/video/9"
        });
        assert_eq!(record_from_item(&with_play).url, "https://cdn.example.com/9.mp4");

        let built = json!({"aweme_id": "9", "author": {"unique_id": "a"}});
        assert_eq!(record_from_item(&built).url, "https://www.tiktok.com/@a/video/9");

        let anonymous = json!({"aweme_id": 9, "video": {"play_addr": {"url_list": []}}});
        assert_eq!(
            record_from_item(&anonymous).url,
            "https://www.tiktok.com/@unknown/video/9"
        );
    }

    #[test]
    fn empty_item_degrades_to_defaults() {
        let record = record_from_item(&json!("not an object"));
        assert_eq!(record.id, "unknown");
        assert_eq!(record.username, "unknown");
        assert_eq!(record.description, "");
        assert_eq!(record.likes, "0");
        assert_eq!(record.date, today());
        assert!(!record.verified);
    }
}
