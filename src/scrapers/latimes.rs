//! LA Times search workflow.
//!
//! Drives the site's own search UI: open the home page, submit the search
//! phrase, sort by newest, narrow to one topic, then hand the listed results
//! to the extraction engine.
//!
//! # Selectors
//!
//! Result parts are read with CSS selectors relative to each `<li>` of the
//! results menu. Text-matching lookups (the no-results notice, the topics
//! filter) use XPath because CSS cannot match on text.

use crate::browser::{BrowserSession, Locator};
use crate::errors::{Result, ScrapeError};
use crate::extraction::ArticleSelectors;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument};

pub const HOME_URL: &str = "https://www.latimes.com/";

const SEARCH_BUTTON: &str = "button[data-element='search-button']";
const SEARCH_INPUT: &str = "input[data-element='search-form-input']";
const SEARCH_SUBMIT: &str = "button[data-element='search-submit-button']";
const RESULTS_HEADING: &str = "//h1[text()='Search results for']";
const SORT_SELECT: &str = "select.select-input";
const TOPICS_SECTION: &str =
    "//div[@class='search-filter']//p[contains(text(), 'Topics')]/parent::*";

/// Every result item on the search page.
pub const RESULTS: &str = "ul.search-results-module-results-menu li";

/// Option value of "Newest" in the sort dropdown.
const SORT_NEWEST: &str = "1";

pub const ARTICLE_SELECTORS: ArticleSelectors = ArticleSelectors {
    title: "h3 a.link",
    date: "p.promo-timestamp",
    description: "p.promo-description",
    picture: "img",
};

/// The notice the site shows when a search matches nothing.
pub fn no_results_notice(phrase: &str) -> String {
    format!("There are not any results that match \"{}\".", phrase)
}

fn no_results_locator(phrase: &str) -> Locator {
    Locator::xpath(format!(
        "//div[contains(text(), {})]",
        xpath_literal(&no_results_notice(phrase))
    ))
}

fn see_all_topics_locator() -> Locator {
    Locator::xpath(format!("{}//span[@class='see-all-text']", TOPICS_SECTION))
}

fn topic_locator(topic: &str) -> Locator {
    Locator::xpath(format!(
        "{}//span[text()={}]",
        TOPICS_SECTION,
        xpath_literal(topic)
    ))
}

/// Quote `value` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so a value holding both quote kinds is
/// assembled with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// The LA Times search workflow over any [`BrowserSession`].
#[derive(Debug)]
pub struct LaTimes<S> {
    session: S,
    timeout: Duration,
}

impl<S: BrowserSession> LaTimes<S> {
    /// `timeout` bounds every wait for an element to appear.
    pub fn new(session: S, timeout: Duration) -> Self {
        Self { session, timeout }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub async fn close(self) -> Result<()> {
        self.session.close().await
    }

    async fn wait_for(&self, locator: &Locator) -> Result<()> {
        self.session.wait_until_present(locator, self.timeout).await
    }

    /// Open `url` and wait until the search button is usable.
    #[instrument(level = "info", skip(self))]
    pub async fn open(&self, url: &str) -> Result<()> {
        self.session.navigate(url).await?;
        self.wait_for(&Locator::css(SEARCH_BUTTON)).await?;
        info!("Opened site");
        Ok(())
    }

    /// Submit a search for `phrase`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::NoResults`] when the site reports that nothing
    /// matches the phrase.
    #[instrument(level = "info", skip(self))]
    pub async fn search(&self, phrase: &str) -> Result<()> {
        self.session.click(&Locator::css(SEARCH_BUTTON)).await?;
        let input = Locator::css(SEARCH_INPUT);
        self.wait_for(&input).await?;
        self.session.input_text(&input, phrase).await?;
        self.session.click(&Locator::css(SEARCH_SUBMIT)).await?;
        self.wait_for(&Locator::xpath(RESULTS_HEADING)).await?;

        if self.session.is_present(&no_results_locator(phrase)).await? {
            return Err(ScrapeError::NoResults {
                phrase: phrase.to_string(),
            });
        }
        info!("Search phrase entered");
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    pub async fn sort_by_latest(&self) -> Result<()> {
        self.session
            .select_value(&Locator::css(SORT_SELECT), SORT_NEWEST)
            .await?;
        self.wait_for(&Locator::css(RESULTS)).await?;
        info!("Results sorted by latest");
        Ok(())
    }

    /// Narrow the results to the topic labelled exactly `topic`.
    #[instrument(level = "info", skip(self))]
    pub async fn select_category(&self, topic: &str) -> Result<()> {
        self.session.click(&see_all_topics_locator()).await?;
        self.session.click(&topic_locator(topic)).await?;
        self.wait_for(&Locator::css(RESULTS)).await?;
        info!("Category selected");
        Ok(())
    }

    /// Give the filtered list `settle` to finish re-rendering, then list it.
    #[instrument(level = "info", skip(self))]
    pub async fn result_elements(&self, settle: Duration) -> Result<Vec<S::Element>> {
        sleep(settle).await;
        let elements = self.session.elements(&Locator::css(RESULTS)).await?;
        info!(count = elements.len(), "Listed search results");
        Ok(elements)
    }
}
