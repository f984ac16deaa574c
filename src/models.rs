//! Data models shared by every news source and by the preference store.
//!
//! This module defines the provider-agnostic vocabulary of the application:
//! - [`NewsArticle`]: One normalized article, whatever provider it came from
//! - [`Source`]: The closed set of providers, with their identifier and display name
//! - [`Category`]: The application's category taxonomy
//! - [`Theme`]: The colour theme stored alongside the other preferences
//! - [`SearchParams`], [`SearchMeta`], [`SearchResult`]: The search contract
//!
//! # Naming
//!
//! Every provider has exactly two spellings. The identifier (`guardian`,
//! `nyt`, `newsapi`, `gnews`) is what preferences and the command line use;
//! the display name (`Guardian`, `New York Times`, `NewsAPI`, `GNews`) is what
//! articles and errors carry. Both are derived from the [`Source`] enum, so
//! the two vocabularies cannot drift apart.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Page size used when a search does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on `totalResults` reported by any source (100 pages of 10).
///
/// Providers disagree wildly on how deep they let clients paginate; capping
/// every source at the same ceiling keeps page counts comparable.
pub const MAX_PAGINATABLE_ARTICLES: u32 = DEFAULT_PAGE_SIZE * 100;

/// A news provider known to the application.
///
/// Variants are declared in registry order, which is also the order used to
/// merge results and report errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "guardian")]
    Guardian,
    #[serde(rename = "nyt")]
    NewYorkTimes,
    #[serde(rename = "newsapi")]
    NewsApi,
    #[serde(rename = "gnews")]
    GNews,
}

impl Source {
    /// All sources in registry order.
    pub const ALL: [Source; 4] = [
        Source::Guardian,
        Source::NewYorkTimes,
        Source::NewsApi,
        Source::GNews,
    ];

    /// Stable identifier used by preferences and the CLI.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Guardian => "guardian",
            Self::NewYorkTimes => "nyt",
            Self::NewsApi => "newsapi",
            Self::GNews => "gnews",
        }
    }

    /// Human-readable name stamped on articles and errors.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Guardian => "Guardian",
            Self::NewYorkTimes => "New York Times",
            Self::NewsApi => "NewsAPI",
            Self::GNews => "GNews",
        }
    }

    /// Look a source up by its exact identifier (`"nyt"`).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Look a source up by its exact display name (`"New York Times"`).
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.display_name() == name)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Source {
    type Err = String;

    /// Accepts either spelling, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|src| {
                src.id().eq_ignore_ascii_case(wanted)
                    || src.display_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                format!(
                    "unknown source '{wanted}' (expected one of: {})",
                    Self::ALL.map(Source::id).join(", ")
                )
            })
    }
}

/// The application's category taxonomy.
///
/// Each provider has its own vocabulary (Guardian sections, NYT desks,
/// NewsAPI source lists); the per-source tables in [`crate::sources`] map
/// between those and this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// Identifier used in preferences, on the command line and by GNews.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::General => "general",
            Self::Health => "health",
            Self::Science => "science",
            Self::Sports => "sports",
            Self::Technology => "technology",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Entertainment => "Entertainment",
            Self::General => "General",
            Self::Health => "Health",
            Self::Science => "Science",
            Self::Sports => "Sports",
            Self::Technology => "Technology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "unknown category '{wanted}' (expected one of: {})",
                    Self::ALL.map(Category::as_str).join(", ")
                )
            })
    }
}

/// Colour theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}

/// A news article normalized from any provider.
///
/// Articles are built fresh from each provider response and never mutated
/// afterwards.
///
/// # Fields
///
/// * `id` - Deterministic hash of the canonical URL (or title when the URL is missing)
/// * `description` - Empty string when the provider omits it
/// * `source` - The provider; serialized as its display name
/// * `category` - `None` when unknown; serialized as `""`
/// * `date` - Publication time as an ISO-8601 string, passed through from the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub author: Option<String>,
    #[serde(with = "source_display_name")]
    pub source: Source,
    #[serde(with = "category_or_empty")]
    pub category: Option<Category>,
    pub date: String,
}

impl NewsArticle {
    /// Publication time, or `None` when the provider sent something unparsable.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_article_date(&self.date)
    }
}

/// Parse the date formats the supported providers emit.
///
/// Accepts RFC 3339 (`2025-01-15T12:00:00Z`), the NYT offset form without a
/// colon (`2025-01-15T12:00:00+0000`), and bare calendar dates.
pub fn parse_article_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Most recent first; articles with unparsable dates sort after all others.
///
/// Equal keys compare `Equal`, so a stable sort keeps registry order for ties.
pub fn compare_by_date_desc(a: &NewsArticle, b: &NewsArticle) -> Ordering {
    match (a.published_at(), b.published_at()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Parameters for one search submission.
///
/// Empty `keyword`, `None` category and `None` dates mean "no filter".
/// An empty `sources` list means every registered source. `page` is
/// zero-based; each source translates it to its own convention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub keyword: String,
    pub category: Option<Category>,
    pub sources: Vec<Source>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl SearchParams {
    /// Parameters searching for `keyword` across every source, first page.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    /// Restrict the search to `category`.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Query only `sources`. An empty list means every source.
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources = sources.into_iter().collect();
        self
    }

    /// Restrict publication dates to `from..=to`; either bound may be open.
    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Select a zero-based `page`.
    ///
    /// # Arguments
    ///
    /// * `page` - Zero-based page index; sources numbering from one add one themselves
    /// * `page_size` - Results per source, or `None` for [`DEFAULT_PAGE_SIZE`]
    pub fn with_page(mut self, page: u32, page_size: Option<u32>) -> Self {
        self.page = Some(page);
        self.page_size = page_size;
        self
    }

    /// Trimmed keyword, or `None` when the search is unscoped by text.
    pub fn keyword(&self) -> Option<&str> {
        let k = self.keyword.trim();
        (!k.is_empty()).then_some(k)
    }

    /// Zero-based page, defaulting to the first.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    /// Requested page size; zero or unset gives [`DEFAULT_PAGE_SIZE`].
    pub fn page_size(&self) -> u32 {
        self.page_size.filter(|n| *n > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Pagination metadata reported by one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
    pub total_results: u32,
    pub page_size: u32,
}

impl SearchMeta {
    /// Build metadata with `total_results` capped at [`MAX_PAGINATABLE_ARTICLES`].
    pub fn clamped(total_results: u64, page_size: u32) -> Self {
        let capped = total_results.min(u64::from(MAX_PAGINATABLE_ARTICLES));
        Self {
            total_results: capped as u32,
            page_size,
        }
    }

    /// Number of pages the source can serve.
    ///
    /// # Returns
    ///
    /// `ceil(total_results / page_size)`, or 0 when the page size is zero.
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_results.div_ceil(self.page_size)
    }
}

/// What a single source returns for one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub articles: Vec<NewsArticle>,
    pub meta: Option<SearchMeta>,
}

mod source_display_name {
    use super::Source;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(source: &Source, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(source.display_name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Source, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(D::Error::custom)
    }
}

mod category_or_empty {
    use super::Category;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(category: &Option<Category>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(category.map(Category::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Category>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(date: &str) -> NewsArticle {
        NewsArticle {
            id: date.to_string(),
            title: "Title".to_string(),
            description: String::new(),
            url: "https://example.com".to_string(),
            image_url: None,
            author: None,
            source: Source::Guardian,
            category: None,
            date: date.to_string(),
        }
    }

    #[test]
    fn test_source_spellings_are_consistent() {
        for source in Source::ALL {
            assert_eq!(Source::from_id(source.id()), Some(source));
            assert_eq!(Source::from_display_name(source.display_name()), Some(source));
        }
        assert_eq!(Source::NewYorkTimes.display_name(), "New York Times");
        assert_eq!(Source::NewsApi.id(), "newsapi");
    }

    #[test]
    fn test_source_from_str_accepts_both_spellings() {
        assert_eq!("nyt".parse::<Source>(), Ok(Source::NewYorkTimes));
        assert_eq!("new york times".parse::<Source>(), Ok(Source::NewYorkTimes));
        assert_eq!("GNews".parse::<Source>(), Ok(Source::GNews));
        assert!("reuters".parse::<Source>().is_err());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Sports".parse::<Category>(), Ok(Category::Sports));
        assert!("weather".parse::<Category>().is_err());
    }

    #[test]
    fn test_article_serializes_display_name_and_empty_category() {
        let json = serde_json::to_value(article("2025-01-01T00:00:00Z")).unwrap();
        assert_eq!(json["source"], "Guardian");
        assert_eq!(json["category"], "");
        assert_eq!(json["imageUrl"], serde_json::Value::Null);
    }

    #[test]
    fn test_article_deserializes_category() {
        let mut a = article("2025-01-01T00:00:00Z");
        a.category = Some(Category::Science);
        a.source = Source::NewYorkTimes;
        let json = serde_json::to_string(&a).unwrap();
        let back: NewsArticle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn test_parse_article_date_formats() {
        let rfc = parse_article_date("2025-01-15T12:00:00Z").unwrap();
        let nyt = parse_article_date("2025-01-15T12:00:00+0000").unwrap();
        assert_eq!(rfc, nyt);
        assert!(parse_article_date("2025-01-15").is_some());
        assert!(parse_article_date("yesterday").is_none());
        assert!(parse_article_date("").is_none());
    }

    #[test]
    fn test_compare_by_date_desc_puts_unparsable_last() {
        let mut articles = vec![
            article("not a date"),
            article("2025-01-01T00:00:00Z"),
            article("2025-03-01T00:00:00Z"),
        ];
        articles.sort_by(compare_by_date_desc);
        let order: Vec<_> = articles.iter().map(|a| a.date.as_str()).collect();
        assert_eq!(
            order,
            vec!["2025-03-01T00:00:00Z", "2025-01-01T00:00:00Z", "not a date"]
        );
    }

    #[test]
    fn test_search_meta_is_clamped() {
        let meta = SearchMeta::clamped(2_500_000, 10);
        assert_eq!(meta.total_results, MAX_PAGINATABLE_ARTICLES);
        assert_eq!(meta.total_pages(), 100);
        assert_eq!(SearchMeta::clamped(35, 10).total_pages(), 4);
    }

    #[test]
    fn test_search_params_defaults() {
        let params = SearchParams::new("   ");
        assert_eq!(params.keyword(), None);
        assert_eq!(params.page(), 0);
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
        let params = SearchParams::new(" rust ").with_page(2, Some(0));
        assert_eq!(params.keyword(), Some("rust"));
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
    }
}
