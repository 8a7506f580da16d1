//! The extraction engine: turns result elements into [`Article`] records.
//!
//! Each element is processed on its own, in input order, and produces exactly
//! one article:
//!
//! 1. title, date and description are read from descendant elements; a
//!    missing descendant yields an empty string
//! 2. the picture is downloaded to `article_{n}.jpeg` (1-based `n`) when the
//!    element has one, otherwise the article gets no picture
//! 3. phrase count and money flag are derived from title + description
//!
//! A missing element is never an error. A failed download of a picture that
//! does exist is, and it aborts the whole extraction.

use crate::analysis::{compute_derived_fields, PhraseMatcher};
use crate::browser::PageElement;
use crate::download::Downloader;
use crate::errors::{Result, ScrapeError};
use crate::models::{picture_path, Article};
use crate::observer::ScrapeObserver;
use std::path::{Path, PathBuf};
use tracing::instrument;
use url::Url;

/// CSS selectors for the parts of one result, relative to the result element.
#[derive(Debug, Clone, Copy)]
pub struct ArticleSelectors {
    pub title: &'static str,
    pub date: &'static str,
    pub description: &'static str,
    pub picture: &'static str,
}

/// Everything the engine needs besides the elements themselves.
pub struct Extractor<'a, D, O: ?Sized> {
    pub matcher: &'a PhraseMatcher,
    pub selectors: ArticleSelectors,
    pub downloader: &'a D,
    pub observer: &'a O,
    /// Directory pictures are saved into.
    pub picture_dir: &'a Path,
    /// Page URL that relative picture sources are resolved against.
    pub base_url: &'a Url,
}

/// Text of the first descendant matching `selector`, or `""` when none does.
pub async fn extract_field<E: PageElement>(element: &E, selector: &str) -> Result<String> {
    Ok(element.field_text(selector).await?.unwrap_or_default())
}

impl<D, O> Extractor<'_, D, O>
where
    D: Downloader,
    O: ScrapeObserver + ?Sized,
{
    /// Extract one article per element, preserving order.
    #[instrument(level = "info", skip_all, fields(phrase = %self.matcher.phrase(), count = elements.len()))]
    pub async fn extract_articles<E: PageElement>(&self, elements: &[E]) -> Result<Vec<Article>> {
        self.observer.extraction_started(elements.len());
        let mut articles = Vec::with_capacity(elements.len());
        for (offset, element) in elements.iter().enumerate() {
            let article = self.extract_article(element, offset + 1).await?;
            articles.push(article);
        }
        Ok(articles)
    }

    /// Build the article for the element at 1-based `index`.
    pub async fn extract_article<E: PageElement>(&self, element: &E, index: usize) -> Result<Article> {
        let title = extract_field(element, self.selectors.title).await?;
        let date = extract_field(element, self.selectors.date).await?;
        let description = extract_field(element, self.selectors.description).await?;
        let destination = picture_path(self.picture_dir, index);
        let profile_picture = self
            .resolve_profile_picture(element, &destination, index)
            .await?;

        let derived = compute_derived_fields(&title, &description, self.matcher);
        let article = Article {
            title,
            date,
            description,
            profile_picture,
            search_phrase_count: derived.search_phrase_count,
            contains_money: derived.contains_money,
        };
        self.observer.article_extracted(index, &article);
        Ok(article)
    }

    /// Download the element's picture to `destination`.
    ///
    /// Returns `Ok(None)` when the element has no picture. Returns the exact
    /// `destination` once the download succeeded.
    pub async fn resolve_profile_picture<E: PageElement>(
        &self,
        element: &E,
        destination: &Path,
        index: usize,
    ) -> Result<Option<PathBuf>> {
        let Some(picture) = element.find(self.selectors.picture).await? else {
            self.observer.picture_missing(index);
            return Ok(None);
        };

        let source = picture
            .attribute("src")
            .await?
            .filter(|src| !src.trim().is_empty())
            .ok_or(ScrapeError::MissingImageSource { index })?;
        let url = self.base_url.join(source.trim())?;

        self.downloader.download(url.as_str(), destination).await?;
        self.observer.picture_saved(index, destination);
        Ok(Some(destination.to_path_buf()))
    }
}
