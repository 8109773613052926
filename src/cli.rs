use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::error::Error;
use crate::record::ManualFields;
use crate::search::{default_terms, SearchConfig, DEFAULT_API_HOST};

/// Command line arguments supported by the tikd-feed binary.
#[derive(Debug, Parser)]
#[command(
    name = "tikd-feed",
    about = "Curate TikTok videos about the school and publish an embed page.",
    version,
    author,
    arg_required_else_help = true
)]
pub struct Cli {
    /// JSON document holding the curated videos.
    #[arg(long, value_name = "PATH", default_value = "public/tiktok-videos.json")]
    pub data: PathBuf,

    /// Where the generated HTML embed page is written.
    #[arg(long, value_name = "PATH", default_value = "public/tiktok-videos.html")]
    pub html: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a single video by share URL.
    Add(AddArgs),
    /// List stored videos.
    List,
    /// Remove a video by id.
    Remove {
        #[arg(value_name = "VIDEO_ID")]
        id: String,
    },
    /// Regenerate the HTML page from the stored videos.
    Generate,
    /// Add the demonstration videos.
    Sample,
    /// Search the TikTok API and add relevant videos.
    Scrape(ScrapeArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// TikTok share URL.
    #[arg(value_name = "VIDEO_URL")]
    pub url: String,

    /// Free-text description shown with the embed.
    #[arg(value_name = "DESCRIPTION")]
    pub description: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    /// Upload date, YYYY-MM-DD.
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    #[arg(long, value_name = "COUNT")]
    pub likes: Option<String>,

    #[arg(long, value_name = "COUNT")]
    pub comments: Option<String>,

    #[arg(long, value_name = "COUNT")]
    pub shares: Option<String>,

    /// Mark the author as verified.
    #[arg(long)]
    pub verified: bool,
}

impl AddArgs {
    /// Hand-entered overrides, or `None` when no flag was given.
    pub fn manual_fields(&self) -> Option<ManualFields> {
        let manual = ManualFields {
            username: self.username.clone(),
            description: None,
            date: self.date.clone(),
            likes: self.likes.clone(),
            comments: self.comments.clone(),
            shares: self.shares.clone(),
            verified: self.verified.then_some(true),
        };

        (manual != ManualFields::default()).then_some(manual)
    }
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Search term; repeat for several. Defaults to the school's names.
    #[arg(long = "term", value_name = "TERM")]
    pub terms: Vec<String>,

    /// RapidAPI key for the TikTok scraper API.
    #[arg(long, env = "RAPIDAPI_KEY", hide_env_values = true, default_value = "")]
    pub api_key: String,

    #[arg(long, value_name = "HOST", default_value = DEFAULT_API_HOST)]
    pub api_host: String,

    /// Videos requested per search term.
    #[arg(long, value_name = "NUM", default_value_t = 50)]
    pub count: u32,

    /// Pause after each search request.
    #[arg(long, value_name = "MILLISECONDS", default_value_t = 600)]
    pub delay_ms: u64,

    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl ScrapeArgs {
    pub fn search_terms(&self) -> Vec<String> {
        if self.terms.is_empty() {
            return default_terms();
        }
        self.terms
            .iter()
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty())
            .collect()
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            api_key: self.api_key.clone(),
            api_host: self.api_host.clone(),
            terms: self.search_terms(),
            count: self.count,
            request_timeout: Duration::from_secs(self.timeout_secs.max(1)),
            request_delay: Duration::from_millis(self.delay_ms),
            ..SearchConfig::default()
        }
    }
}

impl Cli {
    /// Reject argument values clap cannot check on its own.
    pub fn validate(&self) -> Result<(), Error> {
        match &self.command {
            Command::Add(args) => match args.date.as_deref() {
                Some(date) if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() => {
                    Err(Error::InvalidDate(date.to_string()))
                }
                _ => Ok(()),
            },
            Command::Scrape(args) => {
                if args.count == 0 {
                    return Err(Error::InvalidCount);
                }
                if args.search_terms().is_empty() {
                    return Err(Error::NoSearchTerms);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
