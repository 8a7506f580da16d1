//! Capability interfaces over a browser and the elements it returns.
//!
//! The scraping workflow and the extraction engine only depend on the two
//! traits defined here:
//!
//! - [`BrowserSession`]: page-level operations (navigate, click, type, wait,
//!   list elements, close)
//! - [`PageElement`]: element-level lookups (find a descendant, read text,
//!   read an attribute)
//!
//! # Backends
//!
//! | Backend | Module | Used for |
//! |---------|--------|----------|
//! | Chrome over CDP | [`chrome`] | Live runs |
//! | Static HTML | [`html`] | Replaying a saved results page, tests |
//!
//! Descendant lookups always use CSS selectors. Page-level lookups take a
//! [`Locator`], which may also be an XPath expression for the few places
//! that match on visible text.

use crate::errors::{Result, ScrapeError};
use std::fmt;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;
use url::Url;

pub mod chrome;
pub mod html;

/// Delay between two presence checks in [`BrowserSession::wait_until_present`].
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How to find an element on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{}`", s),
            Locator::XPath(s) => write!(f, "xpath `{}`", s),
        }
    }
}

/// An element of a rendered page.
pub trait PageElement: Sized {
    /// First descendant matching the CSS `selector`, or `None`.
    async fn find(&self, selector: &str) -> Result<Option<Self>>;

    /// Rendered text of the element, whitespace-trimmed.
    async fn text(&self) -> Result<String>;

    /// Value of the attribute `name`, or `None` when it is not set.
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Text of the first descendant matching `selector`, or `None` when no
    /// descendant matches.
    async fn field_text(&self, selector: &str) -> Result<Option<String>> {
        match self.find(selector).await? {
            Some(child) => Ok(Some(child.text().await?)),
            None => Ok(None),
        }
    }
}

/// An open browser tab that the scraping workflow drives.
pub trait BrowserSession: Sized {
    type Element: PageElement;

    async fn navigate(&self, url: &str) -> Result<()>;

    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Focus the element and type `text` into it.
    async fn input_text(&self, locator: &Locator, text: &str) -> Result<()>;

    /// Choose the option with `value` in a `<select>` element.
    async fn select_value(&self, locator: &Locator, value: &str) -> Result<()>;

    async fn is_present(&self, locator: &Locator) -> Result<bool>;

    /// All elements currently matching `locator`, in document order.
    async fn elements(&self, locator: &Locator) -> Result<Vec<Self::Element>>;

    /// URL of the current page, used to resolve relative links.
    async fn base_url(&self) -> Result<Url>;

    async fn close(self) -> Result<()>;

    /// Poll until `locator` matches something or `timeout` elapses.
    async fn wait_until_present(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_present(locator).await? {
                debug!(%locator, "Element present");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::Timeout {
                    locator: locator.to_string(),
                    timeout,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

/// In-memory stand-ins for a browser, shared by the test modules.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    /// A hand-built element tree keyed by selector.
    #[derive(Debug, Clone, Default)]
    pub struct FakeElement {
        pub text: String,
        pub attributes: HashMap<String, String>,
        pub children: HashMap<String, FakeElement>,
    }

    impl FakeElement {
        pub fn with_text(text: &str) -> Self {
            Self {
                text: text.to_string(),
                ..Default::default()
            }
        }

        pub fn child(mut self, selector: &str, child: FakeElement) -> Self {
            self.children.insert(selector.to_string(), child);
            self
        }

        pub fn attr(mut self, name: &str, value: &str) -> Self {
            self.attributes.insert(name.to_string(), value.to_string());
            self
        }
    }

    impl PageElement for FakeElement {
        async fn find(&self, selector: &str) -> Result<Option<Self>> {
            Ok(self.children.get(selector).cloned())
        }

        async fn text(&self) -> Result<String> {
            Ok(self.text.clone())
        }

        async fn attribute(&self, name: &str) -> Result<Option<String>> {
            Ok(self.attributes.get(name).cloned())
        }
    }

    /// A scripted session that records every action it receives.
    #[derive(Debug, Default)]
    pub struct FakeSession {
        pub present: HashSet<Locator>,
        pub results: Vec<FakeElement>,
        pub actions: RefCell<Vec<String>>,
    }

    impl FakeSession {
        pub fn with_present(locators: impl IntoIterator<Item = Locator>) -> Self {
            Self {
                present: locators.into_iter().collect(),
                ..Default::default()
            }
        }

        pub fn actions(&self) -> Vec<String> {
            self.actions.borrow().clone()
        }

        fn record(&self, action: String) {
            self.actions.borrow_mut().push(action);
        }
    }

    impl BrowserSession for FakeSession {
        type Element = FakeElement;

        async fn navigate(&self, url: &str) -> Result<()> {
            self.record(format!("navigate {}", url));
            Ok(())
        }

        async fn click(&self, locator: &Locator) -> Result<()> {
            self.record(format!("click {}", locator));
            Ok(())
        }

        async fn input_text(&self, locator: &Locator, text: &str) -> Result<()> {
            self.record(format!("input {} <- {}", locator, text));
            Ok(())
        }

        async fn select_value(&self, locator: &Locator, value: &str) -> Result<()> {
            self.record(format!("select {} = {}", locator, value));
            Ok(())
        }

        async fn is_present(&self, locator: &Locator) -> Result<bool> {
            Ok(self.present.contains(locator))
        }

        async fn elements(&self, locator: &Locator) -> Result<Vec<FakeElement>> {
            self.record(format!("elements {}", locator));
            Ok(self.results.clone())
        }

        async fn base_url(&self) -> Result<Url> {
            Ok(Url::parse("https://www.latimes.com/search?q=test")?)
        }

        async fn close(self) -> Result<()> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FakeElement, FakeSession};
    use super::*;

    #[test]
    fn test_locator_display() {
        assert_eq!(Locator::css("p.promo-timestamp").to_string(), "css `p.promo-timestamp`");
        assert_eq!(Locator::xpath("//h1").to_string(), "xpath `//h1`");
    }

    #[tokio::test]
    async fn test_field_text_is_none_when_missing() {
        let element = FakeElement::default().child("h3 a.link", FakeElement::with_text("Headline"));
        assert_eq!(
            element.field_text("h3 a.link").await.unwrap(),
            Some("Headline".to_string())
        );
        assert_eq!(element.field_text("p.promo-description").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_wait_until_present_returns_when_found() {
        let locator = Locator::css("button.search");
        let session = FakeSession::with_present([locator.clone()]);
        session
            .wait_until_present(&locator, Duration::from_millis(10))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_until_present_times_out() {
        let session = FakeSession::default();
        let locator = Locator::css("h1.missing");
        let err = session
            .wait_until_present(&locator, Duration::from_millis(50))
            .await
            .unwrap_err();
        match err {
            ScrapeError::Timeout { locator, timeout } => {
                assert!(locator.contains("h1.missing"));
                assert_eq!(timeout, Duration::from_millis(50));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
