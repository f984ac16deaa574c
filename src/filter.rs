//! Preference-based article filtering.
//!
//! [`filter_articles`] is a pure function over a merged result list. An
//! article survives when all of the following hold, checked in order:
//!
//! 1. Its source is one of the selected sources
//! 2. Its category is selected, or it has no category
//! 3. No excluded writer matches its author as a whole word
//!
//! Writer matching is case-sensitive and bounded by `\b` on both sides, so
//! excluding `John` removes `John Smith` and `Smith, John` but keeps
//! `Johnny Cash`.

use crate::models::{Category, NewsArticle, Source};
use regex::Regex;
use tracing::{debug, warn};

/// The preference slice the filter reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPreferences {
    pub excluded_writers: Vec<String>,
    pub selected_sources: Vec<Source>,
    pub selected_categories: Vec<Category>,
}

/// Keep the articles allowed by `prefs`, preserving their order.
pub fn filter_articles(articles: &[NewsArticle], prefs: &FilterPreferences) -> Vec<NewsArticle> {
    let writers = writer_patterns(&prefs.excluded_writers);

    let kept: Vec<NewsArticle> = articles
        .iter()
        .filter(|a| prefs.selected_sources.contains(&a.source))
        .filter(|a| {
            a.category
                .is_none_or(|c| prefs.selected_categories.contains(&c))
        })
        .filter(|a| match a.author.as_deref() {
            Some(author) => !writers.iter().any(|w| w.is_match(author)),
            None => true,
        })
        .cloned()
        .collect();

    debug!(
        before = articles.len(),
        after = kept.len(),
        "Filtered articles by preferences"
    );
    kept
}

/// Whole-word pattern for each non-blank writer name.
fn writer_patterns(writers: &[String]) -> Vec<Regex> {
    writers
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .filter_map(|w| match Regex::new(&format!(r"\b{}\b", regex::escape(w))) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(writer = w, error = %e, "Skipping unusable excluded writer");
                None
            }
        })
        .collect()
}
