//! The Guardian Open Platform adapter.
//!
//! Queries the content API's `/search` endpoint. Categories map onto sets of
//! Guardian section ids, sent pipe-joined in the `section` parameter; the
//! same table is reversed to categorize results when the search was not
//! scoped to a category.
//!
//! # Response Shape
//!
//! Everything of interest sits under a top-level `response` object. The
//! optional `fields` block is only populated for the names listed in
//! `show-fields`, which is why the request always asks for them.

use super::{
    CategoryTable, NewsSource, SearchFuture, category_for_id, fetch_json, generate_article_id,
    non_empty, provider_ids, reverse_lookup,
};
use crate::api::{HttpClient, HttpRequest};
use crate::config::ProviderConfig;
use crate::error::ApiError;
use crate::models::{Category, NewsArticle, SearchMeta, SearchParams, SearchResult, Source};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

const SHOW_FIELDS: &str = "headline,trailText,byline,thumbnail";

/// Guardian sections making up each category.
pub const CATEGORY_SECTIONS: CategoryTable = &[
    (
        Category::Business,
        &["business", "business-to-business", "money", "small-business-network"],
    ),
    (
        Category::Entertainment,
        &[
            "culture",
            "film",
            "music",
            "stage",
            "tv-and-radio",
            "games",
            "artanddesign",
            "fashion",
        ],
    ),
    (
        Category::General,
        &[
            "news",
            "uk-news",
            "us-news",
            "australia-news",
            "world",
            "politics",
            "commentisfree",
        ],
    ),
    (
        Category::Health,
        &["healthcare-network", "wellness", "us-wellness", "lifeandstyle"],
    ),
    (Category::Science, &["science", "environment"]),
    (Category::Sports, &["sport", "football"]),
    (Category::Technology, &["technology"]),
];

static SECTION_TO_CATEGORY: Lazy<HashMap<String, Category>> =
    Lazy::new(|| reverse_lookup(CATEGORY_SECTIONS));

#[derive(Debug, Deserialize)]
struct GuardianResponseDto {
    response: GuardianBodyDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianBodyDto {
    status: String,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    results: Option<Vec<GuardianResultDto>>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianResultDto {
    #[serde(default)]
    section_id: Option<String>,
    #[serde(default)]
    web_publication_date: String,
    #[serde(default)]
    web_title: String,
    #[serde(default)]
    web_url: String,
    #[serde(default)]
    fields: Option<GuardianFieldsDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianFieldsDto {
    headline: Option<String>,
    trail_text: Option<String>,
    byline: Option<String>,
    thumbnail: Option<String>,
}

/// Pipe-joined section ids for `category`.
pub fn sections_for(category: Option<Category>) -> Option<String> {
    provider_ids(CATEGORY_SECTIONS, category).map(|ids| ids.join("|"))
}

/// Build the `/search` request for `params`.
pub fn build_request(config: &ProviderConfig, api_key: &str, params: &SearchParams) -> HttpRequest {
    let mut request = HttpRequest::get(format!("{}/search", config.base_url()))
        .with_query("api-key", api_key)
        .with_query("page-size", params.page_size())
        .with_query("page", params.page() + 1)
        .with_query("show-fields", SHOW_FIELDS)
        .with_query("order-by", "newest");

    if let Some(keyword) = params.keyword() {
        request = request.with_query("q", keyword);
    }
    if let Some(sections) = sections_for(params.category) {
        request = request.with_query("section", sections);
    }
    if let Some(from) = params.date_from {
        request = request.with_query("from-date", from.format("%Y-%m-%d"));
    }
    if let Some(to) = params.date_to {
        request = request.with_query("to-date", to.format("%Y-%m-%d"));
    }
    request
}

fn normalize(result: GuardianResultDto, requested: Option<Category>) -> NewsArticle {
    let fields = result.fields.unwrap_or_default();
    let category = requested
        .unwrap_or_else(|| category_for_id(&SECTION_TO_CATEGORY, result.section_id.as_deref()));

    NewsArticle {
        id: generate_article_id(&result.web_url),
        title: non_empty(fields.headline).unwrap_or(result.web_title),
        description: fields.trail_text.unwrap_or_default(),
        url: result.web_url,
        image_url: non_empty(fields.thumbnail),
        author: non_empty(fields.byline),
        source: Source::Guardian,
        category: Some(category),
        date: result.web_publication_date,
    }
}

/// Adapter for the Guardian content API.
pub struct GuardianSource {
    http: Arc<dyn HttpClient>,
    config: ProviderConfig,
    timeout: Duration,
}

impl GuardianSource {
    /// Create the adapter.
    ///
    /// # Arguments
    ///
    /// * `http` - Transport shared with the other adapters
    /// * `config` - Base URL and API key; a missing key fails every search
    /// * `timeout` - Per-request deadline
    pub fn new(http: Arc<dyn HttpClient>, config: ProviderConfig, timeout: Duration) -> Self {
        Self {
            http,
            config,
            timeout,
        }
    }

    #[instrument(
        level = "info",
        name = "guardian_search",
        skip_all,
        fields(keyword = ?params.keyword(), category = ?params.category, page = params.page())
    )]
    async fn run(&self, params: &SearchParams) -> Result<SearchResult, ApiError> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| ApiError::missing_api_key(Source::Guardian))?;
        let request = build_request(&self.config, api_key, params).with_timeout(self.timeout);

        let dto: GuardianResponseDto = fetch_json(self.http.as_ref(), request, Source::Guardian).await?;
        let body = dto.response;
        if body.status != "ok" {
            let message = body
                .message
                .unwrap_or_else(|| "Guardian API returned an error".to_string());
            return Err(ApiError::new(message).with_source(Source::Guardian));
        }

        let articles: Vec<NewsArticle> = body
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|r| normalize(r, params.category))
            .collect();
        debug!(total = body.total, "Guardian reported total results");
        info!(count = articles.len(), "Fetched Guardian articles");

        Ok(SearchResult {
            articles,
            meta: Some(SearchMeta::clamped(body.total, params.page_size())),
        })
    }
}

impl NewsSource for GuardianSource {
    fn name(&self) -> Source {
        Source::Guardian
    }

    fn search<'a>(&'a self, params: &'a SearchParams) -> SearchFuture<'a> {
        Box::pin(self.run(params))
    }
}
