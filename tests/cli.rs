use std::path::PathBuf;

use clap::Parser;

use tikd_feed::cli::{Cli, Command};

#[test]
fn cli_uses_public_paths_by_default() {
    let cli = Cli::try_parse_from(["tikd-feed", "list"]).unwrap();

    assert_eq!(cli.data, PathBuf::from("public/tiktok-videos.json"));
    assert_eq!(cli.html, PathBuf::from("public/tiktok-videos.html"));
    assert!(matches!(cli.command, Command::List));
    assert!(cli.validate().is_ok());
}

#[test]
fn cli_requires_a_command() {
    assert!(Cli::try_parse_from(["tikd-feed"]).is_err());
}

#[test]
fn cli_add_collects_manual_fields() {
    let cli = Cli::try_parse_from([
        "tikd-feed",
        "add",
        "https://www.tiktok.com/@user/video/123",
        "Assembly day",
        "--likes",
        "2.1K",
        "--verified",
    ])
    .unwrap();

    let Command::Add(args) = &cli.command else {
        panic!("expected add command");
    };
    assert_eq!(args.description.as_deref(), Some("Assembly day"));

    let manual = args.manual_fields().unwrap();
    assert_eq!(manual.likes.as_deref(), Some("2.1K"));
    assert_eq!(manual.verified, Some(true));
    assert!(manual.username.is_none());
}

#[test]
fn cli_add_without_flags_has_no_manual_fields() {
    let cli =
        Cli::try_parse_from(["tikd-feed", "add", "https://vm.tiktok.com/ZMabc/"]).unwrap();

    let Command::Add(args) = &cli.command else {
        panic!("expected add command");
    };
    assert!(args.manual_fields().is_none());
}

#[test]
fn cli_rejects_malformed_date() {
    let cli = Cli::try_parse_from([
        "tikd-feed",
        "add",
        "https://www.tiktok.com/@user/video/123",
        "--date",
        "12/01/2024",
    ])
    .unwrap();

    assert!(cli.validate().is_err());
}

#[test]
fn cli_scrape_defaults_to_school_terms() {
    let cli = Cli::try_parse_from(["tikd-feed", "scrape", "--api-key", "k"]).unwrap();

    let Command::Scrape(args) = &cli.command else {
        panic!("expected scrape command");
    };
    let config = args.search_config();
    assert_eq!(config.terms, ["St. Louis Demo JHS", "Demonstration JHS"]);
    assert_eq!(config.api_key, "k");
    assert_eq!(config.count, 50);
    assert!(cli.validate().is_ok());
}

#[test]
fn cli_scrape_rejects_blank_terms_and_zero_count() {
    let blank = Cli::try_parse_from(["tikd-feed", "scrape", "--term", "  "]).unwrap();
    assert!(blank.validate().is_err());

    let zero = Cli::try_parse_from(["tikd-feed", "scrape", "--count", "0"]).unwrap();
    assert!(zero.validate().is_err());
}
