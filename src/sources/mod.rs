//! News source adapters.
//!
//! Every provider is wrapped in an adapter implementing [`NewsSource`]. Each
//! adapter module follows the same three-step shape:
//!
//! 1. **Request building**: translate [`SearchParams`] into the provider's
//!    query vocabulary, including its category table and date syntax
//! 2. **Fetching**: one GET through the shared [`HttpClient`], no retries
//! 3. **Normalizing**: map each provider record onto [`NewsArticle`]
//!
//! # Supported Sources
//!
//! | Source | Module | Endpoint | Category mapping |
//! |--------|--------|----------|------------------|
//! | Guardian | [`guardian`] | `/search` | section ids, pipe-joined |
//! | New York Times | [`nyt`] | `/articlesearch.json` | `fq` on `section.name` |
//! | NewsAPI | [`newsapi`] | `/everything` | source ids, comma-joined |
//! | GNews | [`gnews`] | `/top-headlines` | 1:1 category names |
//!
//! The [`SourceRegistry`] holds the active adapters in a fixed order.

pub mod gnews;
pub mod guardian;
pub mod newsapi;
pub mod nyt;

use crate::api::{HttpClient, HttpRequest};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{Category, SearchParams, SearchResult, Source};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

/// Boxed future returned by [`NewsSource::search`].
pub type SearchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SearchResult, ApiError>> + Send + 'a>>;

/// A provider category table: app category to provider identifiers.
pub type CategoryTable = &'static [(Category, &'static [&'static str])];

/// Identity of one provider request, used to share and cache responses.
///
/// Holds every parameter that changes what a provider returns. Two searches
/// with equal keys against the same source are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub keyword: String,
    pub category: Option<Category>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: u32,
    pub page_size: u32,
}

impl FetchKey {
    /// Key of the request `params` produce, with the keyword trimmed and defaults filled in.
    pub fn from_params(params: &SearchParams) -> Self {
        Self {
            keyword: params.keyword().unwrap_or_default().to_string(),
            category: params.category,
            date_from: params.date_from,
            date_to: params.date_to,
            page: params.page(),
            page_size: params.page_size(),
        }
    }
}

/// Capability shared by every provider adapter.
pub trait NewsSource: Send + Sync {
    /// Which provider this adapter talks to.
    fn name(&self) -> Source;

    /// Run one search against the provider.
    ///
    /// Failures are returned as an [`ApiError`] attributed to [`Self::name`].
    fn search<'a>(&'a self, params: &'a SearchParams) -> SearchFuture<'a>;

    /// Key identifying the request `params` would produce.
    fn fetch_key(&self, params: &SearchParams) -> FetchKey {
        FetchKey::from_params(params)
    }
}

/// Ordered list of active adapters.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn NewsSource>>,
}

impl SourceRegistry {
    /// Registry over `sources`, kept in the given order.
    pub fn new(sources: Vec<Arc<dyn NewsSource>>) -> Self {
        Self { sources }
    }

    /// The four built-in adapters, in [`Source::ALL`] order.
    pub fn from_config(config: &AppConfig, http: Arc<dyn HttpClient>) -> Self {
        let timeout = config.timeout();
        Self::new(vec![
            Arc::new(guardian::GuardianSource::new(
                Arc::clone(&http),
                config.guardian.clone(),
                timeout,
            )),
            Arc::new(nyt::NytSource::new(
                Arc::clone(&http),
                config.nyt.clone(),
                timeout,
            )),
            Arc::new(newsapi::NewsApiSource::new(
                Arc::clone(&http),
                config.newsapi.clone(),
                timeout,
            )),
            Arc::new(gnews::GnewsSource::new(http, config.gnews.clone(), timeout)),
        ])
    }

    /// Adapters to query for `requested`; all of them when `requested` is empty.
    pub fn active(&self, requested: &[Source]) -> Vec<Arc<dyn NewsSource>> {
        self.sources
            .iter()
            .filter(|s| requested.is_empty() || requested.contains(&s.name()))
            .cloned()
            .collect()
    }

    /// Registered sources, in registry order.
    pub fn names(&self) -> Vec<Source> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Deterministic article id from a URL (or title).
///
/// 64-bit FNV-1a rendered in base 36. Equal inputs always give equal ids;
/// collisions are possible but not expected at news-feed volumes.
pub fn generate_article_id(input: &str) -> String {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let hash = input.bytes().fold(OFFSET_BASIS, |acc, byte| {
        (acc ^ u64::from(byte)).wrapping_mul(PRIME)
    });
    to_base36(hash)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::with_capacity(13);
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Reverse a category table into provider id -> category.
///
/// Keys are lowercased so lookups can be case-insensitive.
pub fn reverse_lookup(table: CategoryTable) -> HashMap<String, Category> {
    table
        .iter()
        .flat_map(|(category, ids)| ids.iter().map(move |id| (id.to_lowercase(), *category)))
        .collect()
}

/// Provider identifiers for `category`, if the table has any.
pub fn provider_ids(table: CategoryTable, category: Option<Category>) -> Option<&'static [&'static str]> {
    let category = category?;
    table
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, ids)| *ids)
}

/// App category for a provider section id; [`Category::General`] when unknown.
pub fn category_for_id(map: &HashMap<String, Category>, id: Option<&str>) -> Category {
    id.and_then(|id| map.get(&id.trim().to_lowercase()).copied())
        .unwrap_or(Category::General)
}

/// Execute `request` and decode a JSON body, attributing failures to `source`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    http: &dyn HttpClient,
    request: HttpRequest,
    source: Source,
) -> Result<T, ApiError> {
    let response = http
        .execute(request)
        .await
        .map_err(|e| e.with_source(source))?;
    debug!(%source, bytes = response.body.len(), "Decoding provider response");
    serde_json::from_str(&response.body).map_err(|e| ApiError::malformed(source, &e))
}

/// Treat `None` and blank strings alike.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
