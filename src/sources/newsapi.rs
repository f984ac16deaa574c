//! NewsAPI adapter.
//!
//! Uses the `/everything` endpoint, which has no notion of categories. A
//! category is emulated by restricting the search to the NewsAPI sources
//! known to cover it. The endpoint also refuses requests carrying none of
//! `q`, `sources` or `domains`, so an unscoped search falls back to every
//! source in the table.

use super::{
    CategoryTable, NewsSource, SearchFuture, category_for_id, fetch_json, generate_article_id,
    non_empty, provider_ids, reverse_lookup,
};
use crate::api::{HttpClient, HttpRequest};
use crate::config::ProviderConfig;
use crate::error::ApiError;
use crate::models::{Category, NewsArticle, SearchMeta, SearchParams, SearchResult, Source};
use itertools::Itertools;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Title NewsAPI substitutes for articles pulled by the publisher.
const REMOVED_PLACEHOLDER: &str = "[Removed]";

/// NewsAPI source ids covering each category.
pub const CATEGORY_SOURCES: CategoryTable = &[
    (
        Category::General,
        &[
            "abc-news",
            "abc-news-au",
            "aftenposten",
            "al-jazeera-english",
            "ansa",
            "ary-news",
            "associated-press",
            "axios",
            "bbc-news",
            "bild",
            "blasting-news-br",
            "breitbart-news",
            "cbc-news",
            "cbs-news",
            "cnn",
            "cnn-es",
            "der-tagesspiegel",
            "el-mundo",
            "focus",
            "fox-news",
            "globo",
            "google-news",
            "google-news-ar",
            "google-news-au",
            "google-news-br",
            "google-news-ca",
            "google-news-fr",
            "google-news-in",
            "google-news-is",
            "google-news-it",
            "google-news-ru",
            "google-news-sa",
            "google-news-uk",
            "goteborgs-posten",
            "independent",
            "infobae",
            "la-gaceta",
            "la-nacion",
            "la-repubblica",
            "le-monde",
            "lenta",
            "liberation",
            "msnbc",
            "national-review",
            "nbc-news",
            "news24",
            "news-com-au",
            "newsweek",
            "new-york-magazine",
            "nrk",
            "politico",
            "rbc",
            "reddit-r-all",
            "reuters",
            "rt",
            "rte",
            "rtl-nieuws",
            "sabq",
            "spiegel-online",
            "svenska-dagbladet",
            "the-american-conservative",
            "the-globe-and-mail",
            "the-hill",
            "the-hindu",
            "the-huffington-post",
            "the-irish-times",
            "the-jerusalem-post",
            "the-times-of-india",
            "the-washington-post",
            "the-washington-times",
            "time",
            "usa-today",
            "vice-news",
            "xinhua-net",
            "ynet",
        ],
    ),
    (
        Category::Business,
        &[
            "argaam",
            "australian-financial-review",
            "bloomberg",
            "business-insider",
            "die-zeit",
            "financial-post",
            "fortune",
            "handelsblatt",
            "il-sole-24-ore",
            "info-money",
            "les-echos",
            "the-wall-street-journal",
            "wirtschafts-woche",
        ],
    ),
    (
        Category::Technology,
        &[
            "ars-technica",
            "crypto-coins-news",
            "engadget",
            "gruenderszene",
            "hacker-news",
            "recode",
            "t3n",
            "techcrunch",
            "techcrunch-cn",
            "techradar",
            "the-next-web",
            "the-verge",
            "wired",
            "wired-de",
        ],
    ),
    (
        Category::Sports,
        &[
            "bbc-sport",
            "bleacher-report",
            "espn",
            "espn-cric-info",
            "football-italia",
            "four-four-two",
            "fox-sports",
            "lequipe",
            "marca",
            "nfl-news",
            "nhl-news",
            "talksport",
            "the-sport-bible",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "buzzfeed",
            "entertainment-weekly",
            "ign",
            "mashable",
            "mtv-news",
            "mtv-news-uk",
            "polygon",
            "the-lad-bible",
        ],
    ),
    (Category::Health, &["medical-news-today"]),
    (
        Category::Science,
        &["national-geographic", "new-scientist", "next-big-future"],
    ),
];

static SOURCE_TO_CATEGORY: Lazy<HashMap<String, Category>> =
    Lazy::new(|| reverse_lookup(CATEGORY_SOURCES));

static ALL_SOURCES: Lazy<String> = Lazy::new(|| {
    CATEGORY_SOURCES
        .iter()
        .flat_map(|(_, ids)| ids.iter())
        .join(",")
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponseDto {
    status: String,
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    articles: Vec<NewsApiArticleDto>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticleDto {
    #[serde(default)]
    source: Option<NewsApiSourceDto>,
    author: Option<String>,
    #[serde(default)]
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    url_to_image: Option<String>,
    #[serde(default)]
    published_at: String,
}

#[derive(Debug, Deserialize)]
struct NewsApiSourceDto {
    id: Option<String>,
}

/// Comma-joined NewsAPI source ids for `category`.
pub fn sources_for(category: Option<Category>) -> Option<String> {
    provider_ids(CATEGORY_SOURCES, category).map(|ids| ids.join(","))
}

/// Every source id in the table, comma-joined.
pub fn all_sources() -> &'static str {
    ALL_SOURCES.as_str()
}

/// Build the `/everything` request for `params`.
pub fn build_request(config: &ProviderConfig, api_key: &str, params: &SearchParams) -> HttpRequest {
    let mut request = HttpRequest::get(format!("{}/everything", config.base_url()))
        .with_query("apiKey", api_key)
        .with_query("pageSize", params.page_size())
        .with_query("page", params.page() + 1)
        .with_query("sortBy", "publishedAt")
        .with_query("language", "en");

    let keyword = params.keyword();
    if let Some(keyword) = keyword {
        request = request.with_query("q", keyword);
    }
    match sources_for(params.category) {
        Some(sources) => request = request.with_query("sources", sources),
        None if keyword.is_none() => request = request.with_query("sources", all_sources()),
        None => {}
    }
    if let Some(from) = params.date_from {
        request = request.with_query("from", from.format("%Y-%m-%d"));
    }
    if let Some(to) = params.date_to {
        request = request.with_query("to", to.format("%Y-%m-%d"));
    }
    request
}

fn normalize(article: NewsApiArticleDto, requested: Option<Category>) -> Option<NewsArticle> {
    let title = article.title.unwrap_or_default();
    if title.trim() == REMOVED_PLACEHOLDER {
        return None;
    }
    let url = article.url.unwrap_or_default();
    let id = if url.is_empty() {
        generate_article_id(&title)
    } else {
        generate_article_id(&url)
    };
    let category = requested.unwrap_or_else(|| {
        let source_id = article.source.and_then(|s| s.id);
        category_for_id(&SOURCE_TO_CATEGORY, source_id.as_deref())
    });

    Some(NewsArticle {
        id,
        title,
        description: article.description.unwrap_or_default(),
        url,
        image_url: non_empty(article.url_to_image),
        author: non_empty(article.author),
        source: Source::NewsApi,
        category: Some(category),
        date: article.published_at,
    })
}

/// Adapter for NewsAPI.
pub struct NewsApiSource {
    http: Arc<dyn HttpClient>,
    config: ProviderConfig,
    timeout: Duration,
}

impl NewsApiSource {
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
        name = "newsapi_search",
        skip_all,
        fields(keyword = ?params.keyword(), category = ?params.category, page = params.page())
    )]
    async fn run(&self, params: &SearchParams) -> Result<SearchResult, ApiError> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| ApiError::missing_api_key(Source::NewsApi))?;
        let request = build_request(&self.config, api_key, params).with_timeout(self.timeout);

        let dto: NewsApiResponseDto = fetch_json(self.http.as_ref(), request, Source::NewsApi).await?;
        if dto.status == "error" {
            let message = dto
                .message
                .unwrap_or_else(|| "NewsAPI returned an error".to_string());
            return Err(ApiError::new(message).with_source(Source::NewsApi));
        }

        let received = dto.articles.len();
        let articles: Vec<NewsArticle> = dto
            .articles
            .into_iter()
            .filter_map(|a| normalize(a, params.category))
            .collect();
        if articles.len() < received {
            debug!(dropped = received - articles.len(), "Dropped removed NewsAPI articles");
        }
        info!(count = articles.len(), "Fetched NewsAPI articles");

        Ok(SearchResult {
            articles,
            meta: Some(SearchMeta::clamped(dto.total_results, params.page_size())),
        })
    }
}

impl NewsSource for NewsApiSource {
    fn name(&self) -> Source {
        Source::NewsApi
    }

    fn search<'a>(&'a self, params: &'a SearchParams) -> SearchFuture<'a> {
        Box::pin(self.run(params))
    }
}
