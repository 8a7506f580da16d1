//! Progress reporting for the extraction engine.
//!
//! The engine never logs directly. It reports what happens to each result
//! through a [`ScrapeObserver`], and the binary plugs in [`TracingObserver`].

use crate::models::Article;
use crate::utils::truncate_for_log;
use std::path::Path;
use tracing::{debug, info};

pub trait ScrapeObserver {
    /// Called once before the first result is processed.
    fn extraction_started(&self, _total: usize) {}

    /// A result had no picture element; the sentinel was used.
    fn picture_missing(&self, _index: usize) {}

    /// A picture was saved to `path`.
    fn picture_saved(&self, _index: usize, _path: &Path) {}

    /// A result was turned into an [`Article`].
    fn article_extracted(&self, _index: usize, _article: &Article) {}
}

/// Forwards engine events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScrapeObserver for TracingObserver {
    fn extraction_started(&self, total: usize) {
        info!(total, "Extracting search results");
    }

    fn picture_missing(&self, index: usize) {
        debug!(index, "No picture for result");
    }

    fn picture_saved(&self, index: usize, path: &Path) {
        debug!(index, path = %path.display(), "Picture saved");
    }

    fn article_extracted(&self, index: usize, article: &Article) {
        info!(
            index,
            title = %truncate_for_log(&article.title, 80),
            search_phrase_count = article.search_phrase_count,
            contains_money = %article.contains_money,
            "Extracted article"
        );
    }
}
