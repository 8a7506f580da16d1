//! # LA Times Scraper
//!
//! Searches the Los Angeles Times for a phrase, narrows the results to one
//! topic, and saves every listed article to a spreadsheet together with its
//! picture and two derived metrics.
//!
//! ## Usage
//!
//! ```sh
//! latimes_scraper --phrase IPL --topic Sports -o ./output
//! ```
//!
//! ## Architecture
//!
//! The run is a straight pipeline, every step awaited before the next:
//! 1. **Search**: drive the site's search, sort and topic filter in a browser
//! 2. **Extract**: read each result's title, date and description, download
//!    its picture, count phrase matches and detect money amounts
//! 3. **Report**: write `news_data.xlsx` in one piece
//!
//! A search without results stops the run before anything is extracted. Any
//! other failure is logged and stops the run without touching the report.

use clap::Parser;
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

mod analysis;
mod browser;
mod cli;
mod download;
mod errors;
mod extraction;
mod models;
mod observer;
mod outputs;
mod scrapers;
mod utils;
mod work_item;

use analysis::PhraseMatcher;
use browser::chrome::{ChromeSession, LaunchOptions};
use browser::html::HtmlSnapshot;
use browser::{BrowserSession, PageElement};
use cli::Cli;
use download::HttpDownloader;
use errors::ScrapeError;
use extraction::Extractor;
use models::{Article, SearchParams};
use observer::TracingObserver;
use scrapers::latimes::{self, LaTimes, ARTICLE_SELECTORS};
use utils::ensure_writable_dir;
use work_item::WorkItemPayload;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    // Without a usable output directory the run still logs to stdout.
    match open_run_log(&args) {
        Ok(log_file) => init_tracing(Some(log_file)),
        Err(e) => {
            init_tracing(None);
            error!(error = %e, details = ?e, "Output directory is not usable");
            return Err(e.into());
        }
    }

    let start_time = Instant::now();
    info!("latimes_scraper starting up");

    let result = match search_params(&args).await {
        Ok(params) => run(&args, &params).await,
        Err(e) => Err(e),
    };

    let elapsed = start_time.elapsed();
    match result {
        Ok(count) => {
            info!(
                ?elapsed,
                articles = count,
                report = %args.report_path().display(),
                "Execution complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(?elapsed, error = %e, details = ?e, "Scraping run failed");
            Err(e.into())
        }
    }
}

/// Create the output directory and open the run log for appending.
fn open_run_log(args: &Cli) -> errors::Result<File> {
    ensure_writable_dir(&args.output_dir)?;
    let path = args.log_path();
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| ScrapeError::Write { path, source })
}

/// Log to stdout, and append to the run log file when there is one.
fn init_tracing(log_file: Option<File>) {
    let writer = match log_file {
        Some(file) => BoxMakeWriter::new(std::io::stdout.and(Mutex::new(file))),
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(writer)
        .init();
}

/// Phrase and topic from the command line, overridden by the work item.
async fn search_params(args: &Cli) -> errors::Result<SearchParams> {
    let defaults = SearchParams {
        phrase: args.phrase.clone(),
        topic: args.topic.clone(),
    };
    let params = match &args.work_item {
        Some(path) => WorkItemPayload::load(path).await?.apply(defaults),
        None => defaults,
    };
    info!(phrase = %params.phrase, topic = %params.topic, "Resolved search parameters");
    Ok(params)
}

/// Scrape and write the report; returns the number of articles written.
#[instrument(level = "info", skip_all, fields(phrase = %params.phrase, topic = %params.topic))]
async fn run(args: &Cli, params: &SearchParams) -> errors::Result<usize> {
    let matcher = PhraseMatcher::new(&params.phrase)?;

    let articles = match &args.from_html {
        Some(path) => replay_saved_page(args, path, &matcher).await?,
        None => scrape_live(args, params, &matcher).await?,
    };

    outputs::xlsx::write_report(&articles, &args.report_path()).await?;
    info!(count = articles.len(), "News data saved to spreadsheet");
    Ok(articles.len())
}

/// Drive a real browser through the search and extract the results.
async fn scrape_live(
    args: &Cli,
    params: &SearchParams,
    matcher: &PhraseMatcher,
) -> errors::Result<Vec<Article>> {
    info!("Initializing browser");
    let session = ChromeSession::launch(LaunchOptions {
        headless: args.headless,
        maximized: true,
    })
    .await?;
    let site = LaTimes::new(session, args.timeout());

    let outcome = search_and_extract(&site, args, params, matcher).await;

    // The browser is closed whether or not the search worked.
    if let Err(e) = site.close().await {
        warn!(error = %e, "Failed to close browser");
    }
    outcome
}

async fn search_and_extract<S: BrowserSession>(
    site: &LaTimes<S>,
    args: &Cli,
    params: &SearchParams,
    matcher: &PhraseMatcher,
) -> errors::Result<Vec<Article>> {
    site.open(&args.url).await?;
    site.search(&params.phrase).await?;
    site.sort_by_latest().await?;
    site.select_category(&params.topic).await?;

    let elements = site.result_elements(args.settle()).await?;
    let base_url = site.session().base_url().await?;
    extract(&elements, args, matcher, &base_url).await
}

/// Extract from a results page saved to disk, without a browser.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
async fn replay_saved_page(
    args: &Cli,
    path: &Path,
    matcher: &PhraseMatcher,
) -> errors::Result<Vec<Article>> {
    let snapshot = HtmlSnapshot::load(path, Url::parse(&args.url)?).await?;

    let notice = latimes::no_results_notice(matcher.phrase());
    if snapshot.contains_text("div", &notice)? {
        return Err(ScrapeError::NoResults {
            phrase: matcher.phrase().to_string(),
        });
    }

    let elements = snapshot.select(latimes::RESULTS)?;
    info!(count = elements.len(), "Listed saved search results");
    extract(&elements, args, matcher, snapshot.url()).await
}

async fn extract<E: PageElement>(
    elements: &[E],
    args: &Cli,
    matcher: &PhraseMatcher,
    base_url: &Url,
) -> errors::Result<Vec<Article>> {
    let downloader = HttpDownloader::new();
    let extractor = Extractor {
        matcher,
        selectors: ARTICLE_SELECTORS,
        downloader: &downloader,
        observer: &TracingObserver,
        picture_dir: &args.output_dir,
        base_url,
    };
    extractor.extract_articles(elements).await
}
