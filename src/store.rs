use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;
use crate::record::{timestamp_now, VideoRecord};

#[derive(Debug, Serialize)]
struct FeedDocument<'a> {
    last_updated: String,
    total_videos: usize,
    videos: &'a [VideoRecord],
}

/// Ordered, id-unique collection of curated videos backed by a JSON file.
#[derive(Debug, Clone)]
pub struct VideoStore {
    path: PathBuf,
    videos: Vec<VideoRecord>,
}

impl VideoStore {
    /// Open the store at `path`, starting empty when nothing usable is there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let videos = Self::load(&path);
        Self { path, videos }
    }

    /// Read the persisted records. Missing or malformed data yields nothing.
    pub fn load(path: &Path) -> Vec<VideoRecord> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                if path.exists() {
                    warn!(path = %path.display(), error = %err, "could not read video store");
                }
                return Vec::new();
            }
        };

        let document = match serde_json::from_str::<Value>(&contents) {
            Ok(document) => document,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring malformed video store");
                return Vec::new();
            }
        };

        stored_records(document)
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(path = %path.display(), index, error = %err, "skipping unusable video record");
                    None
                }
            })
            .collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn videos(&self) -> &[VideoRecord] {
        &self.videos
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.videos.iter().any(|video| video.id == id)
    }

    /// Append `record` unless its id is already stored.
    pub fn add(&mut self, mut record: VideoRecord) -> bool {
        if self.contains(&record.id) {
            return false;
        }

        if record.added_date.is_none() {
            record.added_date = Some(timestamp_now());
        }
        self.videos.push(record);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        match self.videos.iter().position(|video| video.id == id) {
            Some(index) => {
                self.videos.remove(index);
                true
            }
            None => false,
        }
    }

    /// Overwrite the backing file with the current records.
    ///
    /// Data is written to a sibling temporary file first and then renamed
    /// over the target.
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let document = FeedDocument {
            last_updated: timestamp_now(),
            total_videos: self.videos.len(),
            videos: &self.videos,
        };
        let json = serde_json::to_string_pretty(&document)?;

        let staging = staging_path(&self.path);
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;

        info!(path = %self.path.display(), total = self.videos.len(), "saved videos");
        Ok(())
    }
}

/// Raw records of either layout: a bare array (legacy) or `{"videos": [...]}`.
fn stored_records(document: Value) -> Vec<Value> {
    match document {
        Value::Array(items) => items,
        Value::Object(mut fields) => match fields.remove("videos") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
