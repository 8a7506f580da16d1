//! Derived text metrics for a scraped article.
//!
//! Both metrics are computed over the same combined text: the title, followed
//! by a single space and the description when the description is non-empty.
//!
//! # Phrase matching
//!
//! The search phrase is compiled as a regular expression as-is, without
//! escaping, and matched case-insensitively. A phrase such as `I.L` therefore
//! also counts `IPL`. Matches are non-overlapping. A phrase that can match
//! empty text (`x?`, `IPL|`) counts an empty match right after a non-empty
//! one, but never two empty matches at the same position.
//!
//! # Money detection
//!
//! Text mentions money when it contains any of:
//! - `$` followed by digits and commas, with optional decimals (`$50,000.25`)
//! - a whole number followed by ` dollars` (`50 dollars`)
//! - a whole number followed by ` USD` (`20 USD`, case-sensitive unit)

use crate::errors::{Result, ScrapeError};
use crate::models::MoneyMention;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;

static MONEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$[0-9,]+(\.[0-9]+)?|\b[0-9]+ dollars\b|\b[0-9]+ USD\b")
        .expect("money pattern is a valid regex")
});

/// The search phrase compiled once for the whole run.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    phrase: String,
    pattern: Regex,
}

impl PhraseMatcher {
    /// Compile `phrase` as a case-insensitive pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidPhrase`] when the phrase is not a valid
    /// regular expression.
    pub fn new(phrase: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(phrase)
            .case_insensitive(true)
            .build()
            .map_err(|source| ScrapeError::InvalidPhrase {
                phrase: phrase.to_string(),
                source,
            })?;
        Ok(Self {
            phrase: phrase.to_string(),
            pattern,
        })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Number of non-overlapping matches of the phrase in `text`.
    pub fn count(&self, text: &str) -> usize {
        let mut count = 0;
        let mut position = 0;
        let mut last_empty_at = None;

        while let Some(found) = self.pattern.find_at(text, position) {
            if found.is_empty() && last_empty_at == Some(found.start()) {
                // Retry from the next character.
                match text[found.start()..].chars().next() {
                    Some(c) => position = found.start() + c.len_utf8(),
                    None => break,
                }
                continue;
            }
            count += 1;
            last_empty_at = found.is_empty().then_some(found.end());
            position = found.end();
        }
        count
    }
}

/// The two metrics derived from an article's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedFields {
    pub search_phrase_count: usize,
    pub contains_money: MoneyMention,
}

/// Join title and description the way both metrics expect.
pub fn combined_text<'a>(title: &'a str, description: &str) -> Cow<'a, str> {
    if description.is_empty() {
        Cow::Borrowed(title)
    } else {
        Cow::Owned(format!("{} {}", title, description))
    }
}

pub fn contains_money(text: &str) -> MoneyMention {
    MoneyMention::from(MONEY_PATTERN.is_match(text))
}

/// Compute phrase count and money flag for one article.
pub fn compute_derived_fields(
    title: &str,
    description: &str,
    matcher: &PhraseMatcher,
) -> DerivedFields {
    let text = combined_text(title, description);
    DerivedFields {
        search_phrase_count: matcher.count(&text),
        contains_money: contains_money(&text),
    }
}
