use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::record::{ManualFields, VideoRecord};

/// Share URL shapes, tried in order; the first capture is the video id.
static ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"tiktok\.com/@[^/]+/video/(\d+)",
        r"vm\.tiktok\.com/([A-Za-z0-9]+)",
        r"tiktok\.com/t/([A-Za-z0-9]+)",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("static id pattern"))
    .collect()
});

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"tiktok\.com/@([^/?#]+)").expect("static username pattern"));

/// Build a record from a share URL plus optional hand-entered data.
///
/// Manual fields win over the `description` argument, which wins over
/// anything derived from the URL. Nothing is persisted here.
pub fn normalize(
    url: &str,
    description: Option<&str>,
    manual: Option<&ManualFields>,
) -> Result<VideoRecord> {
    let url = url.trim();
    let id = extract_video_id(url).ok_or_else(|| Error::InvalidUrl(url.to_string()))?;

    let mut record = VideoRecord::new(id, url);
    if let Some(username) = extract_username(url) {
        record.username = username;
    }
    if let Some(description) = description {
        record.description = description.to_string();
    }

    if let Some(manual) = manual {
        apply_manual(&mut record, manual);
    }

    Ok(record)
}

pub fn extract_video_id(url: &str) -> Option<String> {
    ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}

pub fn extract_username(url: &str) -> Option<String> {
    USERNAME_PATTERN
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|user| user.as_str().to_string())
        .filter(|user| !user.is_empty())
}

fn apply_manual(record: &mut VideoRecord, manual: &ManualFields) {
    let overrides = [
        (&mut record.username, &manual.username),
        (&mut record.description, &manual.description),
        (&mut record.date, &manual.date),
        (&mut record.likes, &manual.likes),
        (&mut record.comments, &manual.comments),
        (&mut record.shares, &manual.shares),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            field.clone_from(value);
        }
    }

    if let Some(verified) = manual.verified {
        record.verified = verified;
    }
}
