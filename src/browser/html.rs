//! Static HTML backend built on `scraper`.
//!
//! Parses a saved copy of a results page so the extraction engine can run
//! without a browser. Text is read the way a browser renders it: all text
//! nodes joined, whitespace runs collapsed to single spaces, then trimmed.

use super::PageElement;
use crate::errors::{Result, ScrapeError};
use scraper::{ElementRef, Html, Selector};
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

/// A parsed HTML document and the URL it was saved from.
pub struct HtmlSnapshot {
    document: Html,
    url: Url,
}

impl std::fmt::Debug for HtmlSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlSnapshot")
            .field("url", &self.url.as_str())
            .finish()
    }
}

impl HtmlSnapshot {
    pub fn parse(html: &str, url: Url) -> Self {
        Self {
            document: Html::parse_document(html),
            url,
        }
    }

    /// Read and parse a saved page from disk.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path, url: Url) -> Result<Self> {
        let html = tokio::fs::read_to_string(path).await?;
        info!(bytes = html.len(), "Loaded saved page");
        Ok(Self::parse(&html, url))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// All elements matching the CSS `selector`, in document order.
    pub fn select(&self, selector: &str) -> Result<Vec<HtmlElement<'_>>> {
        let selector = parse_selector(selector)?;
        Ok(self
            .document
            .select(&selector)
            .map(|inner| HtmlElement { inner })
            .collect())
    }

    /// Whether any element matching `selector` has rendered text containing
    /// `needle`.
    pub fn contains_text(&self, selector: &str, needle: &str) -> Result<bool> {
        Ok(self
            .select(selector)?
            .iter()
            .any(|element| element.rendered_text().contains(needle)))
    }
}

/// An element borrowed from an [`HtmlSnapshot`].
#[derive(Debug, Clone, Copy)]
pub struct HtmlElement<'a> {
    inner: ElementRef<'a>,
}

impl HtmlElement<'_> {
    fn rendered_text(&self) -> String {
        let raw = self.inner.text().collect::<String>();
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl PageElement for HtmlElement<'_> {
    async fn find(&self, selector: &str) -> Result<Option<Self>> {
        let selector = parse_selector(selector)?;
        Ok(self
            .inner
            .select(&selector)
            .next()
            .map(|inner| HtmlElement { inner }))
    }

    async fn text(&self) -> Result<String> {
        Ok(self.rendered_text())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.inner.value().attr(name).map(str::to_string))
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <ul class="search-results-module-results-menu">
            <li>
              <h3><a class="link" href="/story/1">  IPL  <b>Final</b>
                 begins </a></h3>
              <img src="/images/one.jpg">
            </li>
            <li><h3><a class="link" href="/story/2">Second</a></h3></li>
          </ul>
          <div class="no-results">Nothing else here.</div>
        </body></html>
    "#;

    fn snapshot() -> HtmlSnapshot {
        HtmlSnapshot::parse(PAGE, Url::parse("https://www.latimes.com/search").unwrap())
    }

    #[tokio::test]
    async fn test_select_keeps_document_order() {
        let snapshot = snapshot();
        let items = snapshot.select("ul.search-results-module-results-menu li").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[1].field_text("h3 a.link").await.unwrap(),
            Some("Second".to_string())
        );
    }

    #[tokio::test]
    async fn test_text_collapses_whitespace_and_inline_tags() {
        let snapshot = snapshot();
        let items = snapshot.select("li").unwrap();
        let title = items[0].field_text("h3 a.link").await.unwrap();
        assert_eq!(title, Some("IPL Final begins".to_string()));
    }

    #[tokio::test]
    async fn test_missing_descendant_is_none() {
        let snapshot = snapshot();
        let items = snapshot.select("li").unwrap();
        assert!(items[1].find("img").await.unwrap().is_none());
        let img = items[0].find("img").await.unwrap().unwrap();
        assert_eq!(
            img.attribute("src").await.unwrap(),
            Some("/images/one.jpg".to_string())
        );
        assert_eq!(img.attribute("alt").await.unwrap(), None);
    }

    #[test]
    fn test_contains_text() {
        let snapshot = snapshot();
        assert!(snapshot.contains_text("div", "Nothing else").unwrap());
        assert!(!snapshot.contains_text("div", "IPL").unwrap());
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let snapshot = snapshot();
        let err = snapshot.select("ul[[").unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidSelector { .. }));
    }
}
