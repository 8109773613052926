use std::collections::HashSet;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::payload::records_from_payload;
use crate::record::VideoRecord;
use crate::samples::fallback_videos;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0.0.0 Safari/537.36";

pub const DEFAULT_API_HOST: &str = "tiktok-scraper7.p.rapidapi.com";

/// Requests allowed per month on the provider's basic plan.
pub const MONTHLY_REQUEST_LIMIT: usize = 300;

pub fn default_terms() -> Vec<String> {
    vec!["St. Louis Demo JHS".into(), "Demonstration JHS".into()]
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub api_key: String,
    pub api_host: String,
    /// URL scheme used to reach `api_host`.
    pub scheme: String,
    pub terms: Vec<String>,
    pub region: String,
    pub count: u32,
    /// 0 = all time, 1 = past day, 7 = past week.
    pub publish_time: String,
    /// 0 = relevance, 1 = most liked, 2 = newest.
    pub sort_type: String,
    pub request_timeout: Duration,
    pub request_delay: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_host: DEFAULT_API_HOST.to_string(),
            scheme: "https".to_string(),
            terms: default_terms(),
            region: "US".to_string(),
            count: 50,
            publish_time: "0".to_string(),
            sort_type: "0".to_string(),
            request_timeout: Duration::from_secs(30),
            request_delay: Duration::from_millis(600),
        }
    }
}

/// Queries the TikTok search API once per configured term.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    config: SearchConfig,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search every term in order and return the relevant, id-unique records.
    pub async fn run(&self) -> Vec<VideoRecord> {
        let terms = &self.config.terms;
        info!(
            terms = terms.len(),
            monthly_limit = MONTHLY_REQUEST_LIMIT,
            "starting TikTok search"
        );

        let mut batches = Vec::with_capacity(terms.len());
        for (calls, term) in terms.iter().enumerate().map(|(idx, term)| (idx + 1, term)) {
            info!(term = %term, "processing search term {}/{}", calls, terms.len());
            batches.push(self.search_term(term).await);
            info!(
                calls,
                remaining = MONTHLY_REQUEST_LIMIT.saturating_sub(calls),
                "API calls made"
            );
        }

        let total: usize = batches.iter().map(Vec::len).sum();
        let relevant = aggregate(batches, terms);
        info!(
            relevant = relevant.len(),
            total,
            "found unique relevant videos"
        );
        relevant
    }

    /// Records for a single term, falling back to the fixed data set when the
    /// API gives nothing usable.
    pub async fn search_term(&self, term: &str) -> Vec<VideoRecord> {
        let videos = match self.fetch_payload(term).await {
            Some(payload) => {
                let videos = records_from_payload(&payload);
                info!(term, found = videos.len(), "search returned videos");
                videos
            }
            None => {
                warn!(term, "using fallback videos");
                fallback_videos(term)
            }
        };

        sleep(self.config.request_delay).await;
        videos
    }

    /// Raw search response for `term`, or `None` when the call fails in any way.
    pub async fn fetch_payload(&self, term: &str) -> Option<Value> {
        match self.try_fetch(term).await {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!(term, error = %err, "search request failed");
                None
            }
        }
    }

    async fn try_fetch(&self, term: &str) -> Result<Value> {
        let url = self.search_url(term)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::SearchStatus {
                term: term.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn search_url(&self, term: &str) -> Result<Url> {
        let base = format!(
            "{}://{}/feed/search",
            self.config.scheme, self.config.api_host
        );
        let count = self.config.count.to_string();
        let url = Url::parse_with_params(
            &base,
            [
                ("keywords", term),
                ("region", self.config.region.as_str()),
                ("count", count.as_str()),
                ("publish_time", self.config.publish_time.as_str()),
                ("sort_type", self.config.sort_type.as_str()),
            ],
        )?;
        Ok(url)
    }
}

fn build_http_client(config: &SearchConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    let key = HeaderValue::from_str(&config.api_key)
        .map_err(|_| Error::InvalidHeader("x-rapidapi-key"))?;
    let host = HeaderValue::from_str(&config.api_host)
        .map_err(|_| Error::InvalidHeader("x-rapidapi-host"))?;
    headers.insert("x-rapidapi-key", key);
    headers.insert("x-rapidapi-host", host);

    let client = Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .default_headers(headers)
        .timeout(config.request_timeout)
        .build()?;

    Ok(client)
}

/// Merge per-term results: concatenate, keep the first record per id, then
/// keep only records whose description mentions one of `terms`.
///
/// The mention check is a case-insensitive substring match on the whole term,
/// so results the upstream search matched more loosely are dropped.
pub fn aggregate(batches: Vec<Vec<VideoRecord>>, terms: &[String]) -> Vec<VideoRecord> {
    let mut seen = HashSet::new();
    let needles: Vec<String> = terms.iter().map(|term| term.to_lowercase()).collect();

    batches
        .into_iter()
        .flatten()
        .filter(|video| seen.insert(video.id.clone()))
        .filter(|video| mentions_any(&video.description, &needles))
        .collect()
}

fn mentions_any(description: &str, needles: &[String]) -> bool {
    let description = description.to_lowercase();
    needles.iter().any(|needle| description.contains(needle.as_str()))
}
