//! GNews adapter.
//!
//! GNews shares the application's category names, so categories pass
//! through unchanged to `/top-headlines`. Dates are sent as full-day UTC
//! bounds. Results carry no category of their own; articles get the
//! requested one, or none.

use super::{NewsSource, SearchFuture, fetch_json, generate_article_id, non_empty};
use crate::api::{HttpClient, HttpRequest};
use crate::config::ProviderConfig;
use crate::error::ApiError;
use crate::models::{Category, NewsArticle, SearchMeta, SearchParams, SearchResult, Source};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GnewsResponseDto {
    #[serde(default)]
    total_articles: u64,
    #[serde(default)]
    articles: Option<Vec<GnewsArticleDto>>,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GnewsArticleDto {
    #[serde(default)]
    title: String,
    description: Option<String>,
    #[serde(default)]
    url: String,
    image: Option<String>,
    #[serde(default)]
    published_at: String,
    source: Option<GnewsSourceDto>,
}

#[derive(Debug, Deserialize)]
struct GnewsSourceDto {
    name: Option<String>,
}

/// Build the `/top-headlines` request for `params`.
pub fn build_request(config: &ProviderConfig, api_key: &str, params: &SearchParams) -> HttpRequest {
    let mut request = HttpRequest::get(format!("{}/top-headlines", config.base_url()))
        .with_query("apikey", api_key)
        .with_query("lang", "en")
        .with_query("max", params.page_size())
        .with_query("page", params.page() + 1);

    if let Some(keyword) = params.keyword() {
        request = request.with_query("q", keyword);
    }
    if let Some(category) = params.category {
        request = request.with_query("category", category.as_str());
    }
    if let Some(from) = params.date_from {
        request = request.with_query("from", from.format("%Y-%m-%dT00:00:00Z"));
    }
    if let Some(to) = params.date_to {
        request = request.with_query("to", to.format("%Y-%m-%dT23:59:59Z"));
    }
    request
}

fn normalize(article: GnewsArticleDto, requested: Option<Category>) -> NewsArticle {
    NewsArticle {
        id: generate_article_id(&article.url),
        title: article.title,
        description: article.description.unwrap_or_default(),
        url: article.url,
        image_url: non_empty(article.image),
        author: non_empty(article.source.and_then(|s| s.name)),
        source: Source::GNews,
        category: requested,
        date: article.published_at,
    }
}

/// Adapter for the GNews API.
pub struct GnewsSource {
    http: Arc<dyn HttpClient>,
    config: ProviderConfig,
    timeout: Duration,
}

impl GnewsSource {
    pub fn new(http: Arc<dyn HttpClient>, config: ProviderConfig, timeout: Duration) -> Self {
        Self {
            http,
            config,
            timeout,
        }
    }

    #[instrument(
        level = "info",
        name = "gnews_search",
        skip_all,
        fields(keyword = ?params.keyword(), category = ?params.category, page = params.page())
    )]
    async fn run(&self, params: &SearchParams) -> Result<SearchResult, ApiError> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| ApiError::missing_api_key(Source::GNews))?;
        let request = build_request(&self.config, api_key, params).with_timeout(self.timeout);

        let dto: GnewsResponseDto = fetch_json(self.http.as_ref(), request, Source::GNews).await?;
        if let Some(message) = dto.errors.into_iter().next() {
            return Err(ApiError::new(message).with_source(Source::GNews));
        }

        let articles: Vec<NewsArticle> = dto
            .articles
            .unwrap_or_default()
            .into_iter()
            .map(|a| normalize(a, params.category))
            .collect();
        info!(count = articles.len(), "Fetched GNews articles");

        Ok(SearchResult {
            articles,
            meta: Some(SearchMeta::clamped(dto.total_articles, params.page_size())),
        })
    }
}

impl NewsSource for GnewsSource {
    fn name(&self) -> Source {
        Source::GNews
    }

    fn search<'a>(&'a self, params: &'a SearchParams) -> SearchFuture<'a> {
        Box::pin(self.run(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GNEWS_BASE_URL;
    use crate::sources::testing::RecordingHttpClient;
    use chrono::NaiveDate;

    const BODY: &str = r#"{
        "totalArticles": 54,
        "articles": [
            {
                "id": "abc",
                "title": "Team wins final",
                "description": "Late goal",
                "content": "...",
                "url": "https://sports.example.com/final",
                "image": "https://sports.example.com/final.jpg",
                "publishedAt": "2025-01-15T20:00:00Z",
                "lang": "en",
                "source": {"id": "s1", "name": "Sports Daily", "url": "https://sports.example.com"}
            }
        ]
    }"#;

    fn source(http: Arc<RecordingHttpClient>) -> GnewsSource {
        GnewsSource::new(
            http,
            ProviderConfig::new(GNEWS_BASE_URL).with_api_key("key"),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_build_request_uses_day_bounds() {
        let config = ProviderConfig::new(GNEWS_BASE_URL);
        let params = SearchParams::new("final")
            .with_category(Category::Sports)
            .with_date_range(NaiveDate::from_ymd_opt(2025, 1, 10), NaiveDate::from_ymd_opt(2025, 1, 15));
        let request = build_request(&config, "k", &params);

        assert_eq!(request.url, "https://gnews.io/api/v4/top-headlines");
        assert_eq!(request.query_value("apikey"), Some("k"));
        assert_eq!(request.query_value("category"), Some("sports"));
        assert_eq!(request.query_value("from"), Some("2025-01-10T00:00:00Z"));
        assert_eq!(request.query_value("to"), Some("2025-01-15T23:59:59Z"));
        assert_eq!(request.query_value("lang"), Some("en"));
        assert_eq!(request.query_value("max"), Some("10"));
        assert_eq!(request.query_value("page"), Some("1"));
    }

    #[tokio::test]
    async fn test_search_uses_publisher_as_author() {
        let params = SearchParams::new("final").with_category(Category::Sports);
        let result = source(Arc::new(RecordingHttpClient::ok(BODY)))
            .search(&params)
            .await
            .unwrap();

        let article = &result.articles[0];
        assert_eq!(article.author.as_deref(), Some("Sports Daily"));
        assert_eq!(article.category, Some(Category::Sports));
        assert_eq!(article.source, Source::GNews);
        assert_eq!(result.meta, Some(SearchMeta { total_results: 54, page_size: 10 }));
    }

    #[tokio::test]
    async fn test_uncategorized_search_leaves_category_unknown() {
        let result = source(Arc::new(RecordingHttpClient::ok(BODY)))
            .search(&SearchParams::new("final"))
            .await
            .unwrap();
        assert_eq!(result.articles[0].category, None);
    }

    #[tokio::test]
    async fn test_errors_field_is_rejected() {
        let http = Arc::new(RecordingHttpClient::ok(r#"{"errors":["Invalid API key"]}"#));
        let err = source(http).search(&SearchParams::default()).await.unwrap_err();
        assert_eq!(err.message, "Invalid API key");
        assert_eq!(err.provider, Some(Source::GNews));
    }
}
