use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate};
use tera::{Context, Tera};
use tracing::{info, warn};

use crate::error::Result;
use crate::record::VideoRecord;

const PAGE_TEMPLATE: &str = include_str!("../templates/feed.html");

/// Build the static embed page for `videos`, in the order given.
///
/// Every record field is HTML-escaped by the template engine.
pub fn render_page(videos: &[VideoRecord], generated_on: NaiveDate) -> Result<String> {
    let mut context = Context::new();
    context.insert("videos", videos);
    context.insert("generated_on", &generated_on.format("%B %d, %Y").to_string());

    Ok(Tera::one_off(PAGE_TEMPLATE, &context, true)?)
}

/// Render `videos` to `path`. Nothing is written for an empty list.
pub fn write_page(path: &Path, videos: &[VideoRecord]) -> Result<bool> {
    if videos.is_empty() {
        warn!("no videos to generate HTML for");
        return Ok(false);
    }

    let html = render_page(videos, Local::now().date_naive())?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, html)?;
    info!(path = %path.display(), total = videos.len(), "generated HTML page");
    Ok(true)
}
