//! New York Times Article Search adapter.
//!
//! The Article Search API pages in fixed blocks of ten and numbers pages from
//! zero, so the requested page size is ignored and the page is sent as is.
//! Category scoping goes through a Lucene-style filter query on
//! `section.name`, and dates use the compact `YYYYMMDD` form.

use super::{
    CategoryTable, FetchKey, NewsSource, SearchFuture, category_for_id, fetch_json,
    generate_article_id, non_empty, provider_ids, reverse_lookup,
};
use crate::api::{HttpClient, HttpRequest};
use crate::config::ProviderConfig;
use crate::error::ApiError;
use crate::models::{
    Category, DEFAULT_PAGE_SIZE, NewsArticle, SearchMeta, SearchParams, SearchResult, Source,
};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

const WEB_ROOT: &str = "https://www.nytimes.com/";

/// NYT section names making up each category.
pub const CATEGORY_SECTIONS: CategoryTable = &[
    (
        Category::Business,
        &["Business", "Business Day", "Your Money", "Job Market", "DealBook"],
    ),
    (
        Category::Entertainment,
        &["Arts", "Movies", "Theater", "Style", "T Magazine", "Fashion"],
    ),
    (
        Category::General,
        &["U.S.", "World", "New York", "Opinion", "Politics"],
    ),
    (Category::Health, &["Health", "Well"]),
    (Category::Science, &["Science", "Climate"]),
    (Category::Sports, &["Sports"]),
    (Category::Technology, &["Technology"]),
];

static SECTION_TO_CATEGORY: Lazy<HashMap<String, Category>> =
    Lazy::new(|| reverse_lookup(CATEGORY_SECTIONS));

#[derive(Debug, Deserialize)]
struct NytResponseDto {
    status: String,
    response: Option<NytBodyDto>,
}

#[derive(Debug, Deserialize)]
struct NytBodyDto {
    #[serde(default)]
    docs: Option<Vec<NytDocDto>>,
    #[serde(default, alias = "meta")]
    metadata: NytMetadataDto,
}

#[derive(Debug, Default, Deserialize)]
struct NytMetadataDto {
    #[serde(default)]
    hits: u64,
}

#[derive(Debug, Deserialize)]
struct NytDocDto {
    #[serde(rename = "abstract", default)]
    summary: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    headline: NytHeadlineDto,
    #[serde(default)]
    byline: Option<NytBylineDto>,
    #[serde(default)]
    multimedia: Value,
    #[serde(default)]
    pub_date: String,
    #[serde(default)]
    web_url: String,
    #[serde(default)]
    section_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NytHeadlineDto {
    #[serde(default)]
    main: String,
}

#[derive(Debug, Deserialize)]
struct NytBylineDto {
    original: Option<String>,
}

/// `fq` filter restricting results to the sections of `category`.
///
/// `Some(Business)` gives `section.name:("Business", "Business Day", ...)`.
pub fn filter_query_for(category: Option<Category>) -> Option<String> {
    let sections = provider_ids(CATEGORY_SECTIONS, category)?;
    let quoted: Vec<String> = sections.iter().map(|s| format!("\"{s}\"")).collect();
    Some(format!("section.name:({})", quoted.join(", ")))
}

/// Build the `/articlesearch.json` request for `params`.
pub fn build_request(config: &ProviderConfig, api_key: &str, params: &SearchParams) -> HttpRequest {
    let mut request = HttpRequest::get(format!("{}/articlesearch.json", config.base_url()))
        .with_query("api-key", api_key)
        .with_query("sort", "newest")
        .with_query("page", params.page());

    if let Some(keyword) = params.keyword() {
        request = request.with_query("q", keyword);
    }
    if let Some(fq) = filter_query_for(params.category) {
        request = request.with_query("fq", fq);
    }
    if let Some(from) = params.date_from {
        request = request.with_query("begin_date", from.format("%Y%m%d"));
    }
    if let Some(to) = params.date_to {
        request = request.with_query("end_date", to.format("%Y%m%d"));
    }
    request
}

/// Lead image URL.
///
/// Current responses carry an object with a `default` rendition; older ones
/// a list of renditions with site-relative URLs.
fn image_url(multimedia: &Value) -> Option<String> {
    if let Some(url) = multimedia.pointer("/default/url").and_then(Value::as_str) {
        return non_empty(Some(url.to_string()));
    }
    let url = multimedia.pointer("/0/url").and_then(Value::as_str)?;
    if url.trim().is_empty() {
        None
    } else if url.starts_with("http") {
        Some(url.to_string())
    } else {
        Some(format!("{WEB_ROOT}{}", url.trim_start_matches('/')))
    }
}

fn normalize(doc: NytDocDto, requested: Option<Category>) -> NewsArticle {
    let category = requested
        .unwrap_or_else(|| category_for_id(&SECTION_TO_CATEGORY, doc.section_name.as_deref()));
    let description = non_empty(doc.summary)
        .or_else(|| non_empty(doc.snippet))
        .unwrap_or_default();

    NewsArticle {
        id: generate_article_id(&doc.web_url),
        title: doc.headline.main,
        description,
        image_url: image_url(&doc.multimedia),
        url: doc.web_url,
        author: non_empty(doc.byline.and_then(|b| b.original)),
        source: Source::NewYorkTimes,
        category: Some(category),
        date: doc.pub_date,
    }
}

/// Adapter for the NYT Article Search API.
pub struct NytSource {
    http: Arc<dyn HttpClient>,
    config: ProviderConfig,
    timeout: Duration,
}

impl NytSource {
    /// Adapter sending requests through `http`, each bounded by `timeout`.
    pub fn new(http: Arc<dyn HttpClient>, config: ProviderConfig, timeout: Duration) -> Self {
        Self {
            http,
            config,
            timeout,
        }
    }

    #[instrument(
        level = "info",
        name = "nyt_search",
        skip_all,
        fields(keyword = ?params.keyword(), category = ?params.category, page = params.page())
    )]
    async fn run(&self, params: &SearchParams) -> Result<SearchResult, ApiError> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| ApiError::missing_api_key(Source::NewYorkTimes))?;
        let request = build_request(&self.config, api_key, params).with_timeout(self.timeout);

        let dto: NytResponseDto =
            fetch_json(self.http.as_ref(), request, Source::NewYorkTimes).await?;
        let body = match dto.response {
            Some(body) if dto.status == "OK" => body,
            _ => {
                return Err(
                    ApiError::new("NYT API returned an error").with_source(Source::NewYorkTimes)
                );
            }
        };

        let hits = body.metadata.hits;
        let articles: Vec<NewsArticle> = body
            .docs
            .unwrap_or_default()
            .into_iter()
            .map(|doc| normalize(doc, params.category))
            .collect();
        info!(count = articles.len(), hits, "Fetched NYT articles");

        Ok(SearchResult {
            articles,
            meta: Some(SearchMeta::clamped(hits, DEFAULT_PAGE_SIZE)),
        })
    }
}

impl NewsSource for NytSource {
    fn name(&self) -> Source {
        Source::NewYorkTimes
    }

    fn search<'a>(&'a self, params: &'a SearchParams) -> SearchFuture<'a> {
        Box::pin(self.run(params))
    }

    /// Page size never reaches the provider, so it does not split the cache.
    fn fetch_key(&self, params: &SearchParams) -> FetchKey {
        FetchKey {
            page_size: DEFAULT_PAGE_SIZE,
            ..FetchKey::from_params(params)
        }
    }
}
