//! Live browser backend driving Chrome over the DevTools protocol.
//!
//! A [`ChromeSession`] owns one launched browser and a single tab. The
//! protocol handler has to be polled for the browser to make progress, so it
//! runs on its own task for the lifetime of the session. All page work still
//! happens one awaited call at a time.

use super::{BrowserSession, Locator, PageElement};
use crate::errors::{Result, ScrapeError};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Launch options for [`ChromeSession::launch`].
#[derive(Debug, Clone, Copy)]
pub struct LaunchOptions {
    pub headless: bool,
    pub maximized: bool,
}

pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl std::fmt::Debug for ChromeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromeSession").finish()
    }
}

impl ChromeSession {
    /// Start a browser with one blank tab.
    #[instrument(level = "info")]
    pub async fn launch(options: LaunchOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !options.headless {
            builder = builder.with_head();
        }
        if options.maximized {
            builder = builder.arg("--start-maximized").window_size(1920, 1080);
        }
        let config = builder.build().map_err(ScrapeError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!(error = %e, "Browser handler event error");
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        info!(headless = options.headless, "Browser launched");
        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Element>> {
        let found = match locator {
            Locator::Css(selector) => self.page.find_elements(selector.as_str()).await?,
            Locator::XPath(expression) => self.page.find_xpaths(expression.as_str()).await?,
        };
        Ok(found)
    }

    async fn find_one(&self, locator: &Locator) -> Result<Element> {
        self.find_all(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ScrapeError::ElementNotFound(locator.to_string()))
    }
}

/// JS function that sets `this.value` and dispatches `event`.
fn assign_value_function(value: &str, event: &str) -> Result<String> {
    Ok(format!(
        "function() {{ this.value = {}; this.dispatchEvent(new Event({}, {{ bubbles: true }})); }}",
        serde_json::to_string(value)?,
        serde_json::to_string(event)?
    ))
}

impl BrowserSession for ChromeSession {
    type Element = Element;

    #[instrument(level = "debug", skip(self))]
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(%locator))]
    async fn click(&self, locator: &Locator) -> Result<()> {
        let element = self.find_one(locator).await?;
        element.scroll_into_view().await?;
        element.click().await?;
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(%locator))]
    async fn input_text(&self, locator: &Locator, text: &str) -> Result<()> {
        let element = self.find_one(locator).await?;
        element
            .call_js_fn(assign_value_function("", "input")?, false)
            .await?;
        element.click().await?.type_str(text).await?;
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(%locator))]
    async fn select_value(&self, locator: &Locator, value: &str) -> Result<()> {
        let element = self.find_one(locator).await?;
        element
            .call_js_fn(assign_value_function(value, "change")?, false)
            .await?;
        Ok(())
    }

    async fn is_present(&self, locator: &Locator) -> Result<bool> {
        Ok(!self.find_all(locator).await?.is_empty())
    }

    #[instrument(level = "debug", skip_all, fields(%locator))]
    async fn elements(&self, locator: &Locator) -> Result<Vec<Element>> {
        let found = self.find_all(locator).await?;
        debug!(count = found.len(), "Listed elements");
        Ok(found)
    }

    async fn base_url(&self) -> Result<Url> {
        let current = self.page.url().await?.unwrap_or_else(|| "about:blank".to_string());
        Ok(Url::parse(&current)?)
    }

    #[instrument(level = "info", skip_all)]
    async fn close(self) -> Result<()> {
        let ChromeSession {
            mut browser,
            page: _,
            handler_task,
        } = self;
        browser.close().await?;
        if let Err(e) = browser.wait().await {
            warn!(error = %e, "Browser process did not exit cleanly");
        }
        handler_task.abort();
        info!("Browser closed");
        Ok(())
    }
}

impl PageElement for Element {
    async fn find(&self, selector: &str) -> Result<Option<Self>> {
        Ok(self.find_elements(selector).await?.into_iter().next())
    }

    async fn text(&self) -> Result<String> {
        Ok(self
            .inner_text()
            .await?
            .map(|t| t.trim().to_string())
            .unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(Element::attribute(self, name).await?)
    }
}
