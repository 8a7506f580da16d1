//! Command-line interface definitions for the LA Times scraper.
//!
//! Every option can be given as a flag or through the environment. The
//! search phrase and topic can additionally come from a work-item payload
//! (see [`crate::work_item`]), which takes precedence.

use crate::scrapers::latimes::HOME_URL;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Search the LA Times and save the filtered results to a spreadsheet.
///
/// # Examples
///
/// ```sh
/// # Default run: phrase "IPL", topic "Sports", output in ./output
/// latimes_scraper
///
/// # Custom search without a visible browser window
/// latimes_scraper --phrase "wildfire" --topic "California" --headless
///
/// # Inputs from a work item
/// latimes_scraper --work-item ./work-item.json
///
/// # Extract from a results page saved earlier, no browser
/// latimes_scraper --from-html ./results.html --phrase "IPL"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Phrase to search for
    #[arg(short, long, env = "PHRASE", default_value = "IPL")]
    pub phrase: String,

    /// Topic to narrow the results to
    #[arg(short, long, env = "TOPIC", default_value = "Sports")]
    pub topic: String,

    /// JSON work-item payload with `PHRASE` and `TOPIC` keys
    #[arg(short, long, env = "WORK_ITEM_PATH")]
    pub work_item: Option<PathBuf>,

    /// Site home page
    #[arg(long, default_value = HOME_URL)]
    pub url: String,

    /// Directory for the report, pictures and log file
    #[arg(short, long, env = "OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Run the browser without a visible window
    #[arg(long)]
    pub headless: bool,

    /// Seconds to wait for an element to appear
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Seconds to let the filtered results settle before reading them
    #[arg(long, default_value_t = 5)]
    pub settle_secs: u64,

    /// Extract from a saved search-results page instead of a live browser
    #[arg(long)]
    pub from_html: Option<PathBuf>,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join("news_data.xlsx")
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join("la_times.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["latimes_scraper"]);

        assert_eq!(cli.url, "https://www.latimes.com/");
        assert_eq!(cli.output_dir, PathBuf::from("output"));
        assert!(!cli.headless);
        assert_eq!(cli.timeout(), Duration::from_secs(10));
        assert_eq!(cli.settle(), Duration::from_secs(5));
        assert_eq!(cli.report_path(), PathBuf::from("output/news_data.xlsx"));
        assert_eq!(cli.log_path(), PathBuf::from("output/la_times.log"));
        assert!(cli.from_html.is_none());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "latimes_scraper",
            "--phrase",
            "wildfire",
            "--topic",
            "California",
            "--output-dir",
            "/tmp/run",
            "--headless",
            "--timeout-secs",
            "30",
        ]);

        assert_eq!(cli.phrase, "wildfire");
        assert_eq!(cli.topic, "California");
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/run"));
        assert!(cli.headless);
        assert_eq!(cli.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "latimes_scraper",
            "-p",
            "Lakers",
            "-t",
            "Sports",
            "-w",
            "/tmp/item.json",
        ]);

        assert_eq!(cli.phrase, "Lakers");
        assert_eq!(cli.topic, "Sports");
        assert_eq!(cli.work_item, Some(PathBuf::from("/tmp/item.json")));
    }
}
