//! Data models for scraped search results.
//!
//! - [`Article`]: one row of the final report
//! - [`MoneyMention`]: whether an article's text mentions an amount of money
//! - [`SearchParams`]: the phrase and topic a run searches for
//!
//! Articles carry no identifier. Their position in the result list is their
//! identity, and the report keeps that order.

use std::fmt;
use std::path::{Path, PathBuf};

/// Whether the combined title and description mention an amount of money.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyMention {
    Present,
    Absent,
}

impl MoneyMention {
    /// The literal written to the report: `"Yes"` or `"No"`.
    pub fn as_str(self) -> &'static str {
        match self {
            MoneyMention::Present => "Yes",
            MoneyMention::Absent => "No",
        }
    }
}

impl From<bool> for MoneyMention {
    fn from(present: bool) -> Self {
        if present {
            MoneyMention::Present
        } else {
            MoneyMention::Absent
        }
    }
}

impl fmt::Display for MoneyMention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single search result as extracted from the results page.
///
/// Missing text fields are empty strings, never a null marker. A missing
/// picture is `None`, which the report renders as an empty cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// The headline as rendered on the results page.
    pub title: String,
    /// The timestamp text exactly as the site renders it.
    pub date: String,
    /// The promo description, empty when the result has none.
    pub description: String,
    /// Where the article's picture was saved, if it had one.
    pub profile_picture: Option<PathBuf>,
    /// Case-insensitive matches of the search phrase in title + description.
    pub search_phrase_count: usize,
    /// Whether title + description mention an amount of money.
    pub contains_money: MoneyMention,
}

impl Article {
    /// The picture path as report text, or the empty sentinel.
    pub fn profile_picture_text(&self) -> String {
        self.profile_picture
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

/// The inputs of one run: what to search for and which topic to filter on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub phrase: String,
    pub topic: String,
}

/// Path of the picture saved for the article at 1-based `index`.
///
/// Pictures are named `article_{index}.jpeg` inside the output directory.
pub fn picture_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("article_{}.jpeg", index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_mention_literals() {
        assert_eq!(MoneyMention::Present.to_string(), "Yes");
        assert_eq!(MoneyMention::Absent.to_string(), "No");
        assert_eq!(MoneyMention::from(true), MoneyMention::Present);
        assert_eq!(MoneyMention::from(false), MoneyMention::Absent);
    }

    #[test]
    fn test_picture_path_is_one_based_jpeg() {
        let path = picture_path(Path::new("output"), 1);
        assert_eq!(path, PathBuf::from("output/article_1.jpeg"));
        let path = picture_path(Path::new("/tmp/run"), 12);
        assert_eq!(path, PathBuf::from("/tmp/run/article_12.jpeg"));
    }

    #[test]
    fn test_missing_picture_renders_empty() {
        let article = Article {
            title: "Weather update".to_string(),
            date: "May 6, 2025".to_string(),
            description: String::new(),
            profile_picture: None,
            search_phrase_count: 0,
            contains_money: MoneyMention::Absent,
        };
        assert_eq!(article.profile_picture_text(), "");
    }
}
