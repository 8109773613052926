use clap::Parser;

use tikd_feed::cli::{AddArgs, Cli, Command, ScrapeArgs};
use tikd_feed::error::Result;
use tikd_feed::normalizer::normalize;
use tikd_feed::record::VideoRecord;
use tikd_feed::render::write_page;
use tikd_feed::samples::curated_samples;
use tikd_feed::search::SearchClient;
use tikd_feed::store::VideoStore;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let cli = Cli::parse();
    cli.validate()?;

    let mut store = VideoStore::open(&cli.data);

    match &cli.command {
        Command::Add(args) => {
            if add_video(&mut store, args)? {
                store.flush()?;
                write_page(&cli.html, store.videos())?;
            }
        }
        Command::List => list_videos(store.videos()),
        Command::Remove { id } => {
            if store.remove(id) {
                println!("Removed video: {id}");
                store.flush()?;
            } else {
                println!("Video not found: {id}");
            }
        }
        Command::Generate => generate(&cli, &store)?,
        Command::Sample => {
            let added = add_samples(&mut store)?;
            println!("Added {added} sample videos");
            if added > 0 {
                store.flush()?;
                generate(&cli, &store)?;
            }
        }
        Command::Scrape(args) => {
            let added = scrape(&mut store, args).await?;
            println!("Added {added} new videos ({} total)", store.len());
            store.flush()?;
            generate(&cli, &store)?;
        }
    }

    Ok(())
}

fn add_video(store: &mut VideoStore, args: &AddArgs) -> Result<bool> {
    let manual = args.manual_fields();
    let record = normalize(&args.url, args.description.as_deref(), manual.as_ref())?;
    Ok(insert(store, record))
}

fn add_samples(store: &mut VideoStore) -> Result<usize> {
    let mut added = 0;
    for sample in curated_samples() {
        let record = normalize(sample.url, Some(sample.description), Some(&sample.manual))?;
        if insert(store, record) {
            added += 1;
        }
    }
    Ok(added)
}

async fn scrape(store: &mut VideoStore, args: &ScrapeArgs) -> Result<usize> {
    let client = SearchClient::new(args.search_config())?;
    let mut added = 0;
    for record in client.run().await {
        if insert(store, record) {
            added += 1;
        }
    }
    Ok(added)
}

fn insert(store: &mut VideoStore, record: VideoRecord) -> bool {
    let id = record.id.clone();
    if store.add(record) {
        println!("Added video: {id}");
        true
    } else {
        println!("Video {id} already exists");
        false
    }
}

fn generate(cli: &Cli, store: &VideoStore) -> Result<()> {
    if write_page(&cli.html, store.videos())? {
        println!("Generated HTML page: {}", cli.html.display());
    } else {
        println!("No videos to generate HTML for");
    }
    Ok(())
}

fn list_videos(videos: &[VideoRecord]) {
    if videos.is_empty() {
        println!("No videos found");
        return;
    }

    println!("Found {} videos:", videos.len());
    println!("{}", "-".repeat(80));
    for (idx, video) in videos.iter().enumerate() {
        println!("{:2}. ID: {}", idx + 1, video.id);
        println!("    @{}", video.username);
        println!("    {}", truncate(&video.description, 60));
        println!(
            "    {} | likes {} | comments {}",
            video.date, video.likes, video.comments
        );
        println!("    {}", video.url);
        println!();
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
