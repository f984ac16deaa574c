//! Multi-source search aggregation.
//!
//! [`NewsSearch`] fans a single [`SearchParams`] submission out to every
//! active adapter, lets them settle independently and in any order, and
//! republishes the merged view after each one.
//!
//! # States
//!
//! ```text
//! Idle --search()--> Searching --last adapter settles--> Settled
//!                        ^                                  |
//!                        +------------search()/retry()------+
//! ```
//!
//! # Request Sharing
//!
//! Every adapter call is keyed by `(source, fetch key)` and stored as a
//! [`Shared`] future. A second search producing the same key awaits the
//! existing future instead of issuing another request. Successful responses
//! stay cached; failed ones are evicted as soon as they settle so that
//! [`NewsSearch::retry`] reaches the provider again.
//!
//! # Superseding
//!
//! Each submission takes a new generation number. A search only publishes
//! while its generation is current, so results for stale parameters never
//! overwrite the view of a newer search. Stale requests are not cancelled:
//! every shared request is driven by its own background task, so it still
//! completes (and a failure is still evicted) after the search that started
//! it has given up.

use crate::error::ApiError;
use crate::models::{
    NewsArticle, SearchMeta, SearchParams, SearchResult, Source, compare_by_date_desc,
};
use crate::sources::{FetchKey, NewsSource, SourceRegistry};
use futures::future::{BoxFuture, FutureExt, Shared};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

type CacheKey = (Source, FetchKey);
type SharedSearch = Shared<BoxFuture<'static, Result<SearchResult, ApiError>>>;
type RequestCache = Arc<Mutex<HashMap<CacheKey, SharedSearch>>>;

/// Lifecycle of the most recent submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    Settled,
}

/// Published view of the current search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    pub phase: SearchPhase,
    /// Parameters of the search this view belongs to.
    pub params: Option<SearchParams>,
    /// Sources queried, in registry order.
    pub sources: Vec<Source>,
    /// Sources that have not settled yet.
    pub pending: Vec<Source>,
    /// Merged articles, most recent first.
    pub articles: Vec<NewsArticle>,
    /// One error per failed source, in registry order.
    pub source_errors: Vec<ApiError>,
    pub meta: BTreeMap<Source, SearchMeta>,
    pub has_searched: bool,
}

impl SearchSnapshot {
    /// Some queried source has not settled yet.
    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Searching
    }

    /// At least one queried source failed.
    pub fn is_error(&self) -> bool {
        !self.source_errors.is_empty()
    }

    /// Message of the first failed source, for top-level display.
    pub fn error_message(&self) -> Option<&str> {
        self.source_errors.first().map(|e| e.message.as_str())
    }

    /// Every queried source failed and nothing came back.
    pub fn is_total_failure(&self) -> bool {
        self.phase == SearchPhase::Settled
            && self.articles.is_empty()
            && !self.source_errors.is_empty()
            && self.source_errors.len() == self.sources.len()
    }

    /// Page count of the deepest source.
    pub fn total_pages(&self) -> u32 {
        self.meta
            .values()
            .map(SearchMeta::total_pages)
            .max()
            .unwrap_or(0)
    }
}

/// How a call to [`NewsSearch::search`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Every adapter settled while this search was still current.
    Settled(SearchSnapshot),
    /// A newer search was submitted before this one settled.
    Superseded,
}

impl SearchOutcome {
    /// The settled snapshot, or `None` when superseded.
    pub fn into_snapshot(self) -> Option<SearchSnapshot> {
        match self {
            Self::Settled(snapshot) => Some(snapshot),
            Self::Superseded => None,
        }
    }
}

#[derive(Debug, Default)]
struct Control {
    generation: u64,
    last_params: Option<SearchParams>,
}

struct Slot {
    source: Source,
    outcome: Option<Result<SearchResult, ApiError>>,
}

/// The search state machine.
pub struct NewsSearch {
    registry: SourceRegistry,
    cache: RequestCache,
    control: Mutex<Control>,
    tx: watch::Sender<SearchSnapshot>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl NewsSearch {
    /// Create an idle search over `registry`.
    ///
    /// Nothing is fetched until [`search`](Self::search) is called. Must be used
    /// from within a Tokio runtime, since every new request is driven by a spawned
    /// task.
    pub fn new(registry: SourceRegistry) -> Self {
        let (tx, _rx) = watch::channel(SearchSnapshot::default());
        Self {
            registry,
            cache: Arc::new(Mutex::new(HashMap::new())),
            control: Mutex::new(Control::default()),
            tx,
        }
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.tx.subscribe()
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.tx.borrow().clone()
    }

    /// Submit a search and drive it to settlement.
    ///
    /// Publishes a `Searching` snapshot immediately, another each time an
    /// adapter settles, and a final `Settled` one.
    ///
    /// # Returns
    ///
    /// [`SearchOutcome::Settled`] with the final snapshot, or
    /// [`SearchOutcome::Superseded`] as soon as a newer submission is seen.
    /// Per-source failures never fail the call; they are listed in
    /// [`SearchSnapshot::source_errors`].
    #[instrument(
        level = "info",
        skip_all,
        fields(keyword = ?params.keyword(), category = ?params.category, page = params.page())
    )]
    pub async fn search(&self, params: SearchParams) -> SearchOutcome {
        let generation = self.begin(&params);
        let active = self.registry.active(&params.sources);
        let mut slots: Vec<Slot> = active
            .iter()
            .map(|s| Slot {
                source: s.name(),
                outcome: None,
            })
            .collect();
        info!(sources = ?slots.iter().map(|s| s.source.id()).collect::<Vec<_>>(), "Searching");

        let searching = build_snapshot(SearchPhase::Searching, &params, &slots);
        if !self.publish(generation, searching) {
            return SearchOutcome::Superseded;
        }

        let mut in_flight: FuturesUnordered<_> = active
            .iter()
            .enumerate()
            .map(|(idx, source)| {
                let (key, request) = self.request(source, &params);
                async move {
                    let result = request.clone().await;
                    (idx, key, request, result)
                }
            })
            .collect();

        while let Some((idx, key, request, result)) = in_flight.next().await {
            let source = slots[idx].source;
            match &result {
                Ok(found) => debug!(%source, count = found.articles.len(), "Source settled"),
                Err(e) => {
                    warn!(%source, status = ?e.status, error = %e.message, "Source failed");
                    self.evict(&key, &request);
                }
            }
            slots[idx].outcome = Some(result);

            let partial = build_snapshot(SearchPhase::Searching, &params, &slots);
            if !self.publish(generation, partial) {
                debug!(generation, "Search superseded");
                return SearchOutcome::Superseded;
            }
        }

        let settled = build_snapshot(SearchPhase::Settled, &params, &slots);
        if !self.publish(generation, settled.clone()) {
            return SearchOutcome::Superseded;
        }
        info!(
            articles = settled.articles.len(),
            errors = settled.source_errors.len(),
            "Search settled"
        );
        SearchOutcome::Settled(settled)
    }

    /// Re-issue the last submitted search; `None` before the first one.
    pub async fn retry(&self) -> Option<SearchOutcome> {
        let params = lock(&self.control).last_params.clone()?;
        info!("Retrying last search");
        Some(self.search(params).await)
    }

    fn begin(&self, params: &SearchParams) -> u64 {
        let mut control = lock(&self.control);
        control.generation += 1;
        control.last_params = Some(params.clone());
        control.generation
    }

    /// Publish `snapshot` if `generation` is still current.
    fn publish(&self, generation: u64, snapshot: SearchSnapshot) -> bool {
        let control = lock(&self.control);
        if control.generation != generation {
            return false;
        }
        self.tx.send_replace(snapshot);
        true
    }

    fn request(&self, source: &Arc<dyn NewsSource>, params: &SearchParams) -> (CacheKey, SharedSearch) {
        let key = (source.name(), source.fetch_key(params));
        let mut cache = lock(&self.cache);
        if let Some(existing) = cache.get(&key) {
            debug!(source = %key.0, "Reusing request");
            return (key, existing.clone());
        }

        let source = Arc::clone(source);
        let owned = params.clone();
        let request = async move { source.search(&owned).await }.boxed().shared();
        cache.insert(key.clone(), request.clone());
        drop(cache);

        // Keeps the request moving once no search is polling it any more.
        let driver = request.clone();
        let driver_key = key.clone();
        let driver_cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
            if driver.clone().await.is_err() {
                evict(&driver_cache, &driver_key, &driver);
            }
        });
        (key, request)
    }

    fn evict(&self, key: &CacheKey, request: &SharedSearch) {
        evict(&self.cache, key, request);
    }
}

/// Drop `request` from `cache`, unless a newer request took its key.
fn evict(cache: &Mutex<HashMap<CacheKey, SharedSearch>>, key: &CacheKey, request: &SharedSearch) {
    let mut cache = lock(cache);
    if cache.get(key).is_some_and(|cached| cached.ptr_eq(request)) {
        cache.remove(key);
    }
}

fn build_snapshot(phase: SearchPhase, params: &SearchParams, slots: &[Slot]) -> SearchSnapshot {
    let mut snapshot = SearchSnapshot {
        phase,
        params: Some(params.clone()),
        sources: slots.iter().map(|s| s.source).collect(),
        has_searched: true,
        ..SearchSnapshot::default()
    };

    for slot in slots {
        match &slot.outcome {
            None => snapshot.pending.push(slot.source),
            Some(Ok(result)) => {
                snapshot.articles.extend(result.articles.iter().cloned());
                if let Some(meta) = result.meta {
                    snapshot.meta.insert(slot.source, meta);
                }
            }
            Some(Err(e)) => snapshot.source_errors.push(e.clone().with_source(slot.source)),
        }
    }
    snapshot.articles.sort_by(compare_by_date_desc);
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::sources::SearchFuture;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    fn article(id: &str, source: Source, date: &str) -> NewsArticle {
        NewsArticle {
            id: id.to_string(),
            title: format!("Title {id}"),
            description: String::new(),
            url: format!("https://example.com/{id}"),
            image_url: None,
            author: None,
            source,
            category: Some(Category::General),
            date: date.to_string(),
        }
    }

    struct FakeSource {
        name: Source,
        responses: Mutex<VecDeque<Result<SearchResult, ApiError>>>,
        fallback: Result<SearchResult, ApiError>,
        calls: AtomicUsize,
        completed: AtomicUsize,
        gate: Option<Arc<Semaphore>>,
    }

    impl FakeSource {
        fn new(name: Source, fallback: Result<SearchResult, ApiError>) -> Self {
            Self {
                name,
                responses: Mutex::new(VecDeque::new()),
                fallback,
                calls: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn ok(name: Source, articles: Vec<NewsArticle>) -> Self {
            let total = articles.len() as u64;
            Self::new(
                name,
                Ok(SearchResult {
                    articles,
                    meta: Some(SearchMeta::clamped(total, 10)),
                }),
            )
        }

        fn failing(name: Source, message: &str) -> Self {
            Self::new(name, Err(ApiError::new(message).with_source(name)))
        }

        fn then(self, first: Result<SearchResult, ApiError>) -> Self {
            lock(&self.responses).push_back(first);
            self
        }

        fn gated(mut self, gate: Arc<Semaphore>) -> Self {
            self.gate = Some(gate);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn completed(&self) -> usize {
            self.completed.load(Ordering::SeqCst)
        }
    }

    impl NewsSource for FakeSource {
        fn name(&self) -> Source {
            self.name
        }

        fn search<'a>(&'a self, _params: &'a SearchParams) -> SearchFuture<'a> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if let Some(gate) = &self.gate {
                    gate.acquire().await.expect("gate should stay open").forget();
                }
                let queued = lock(&self.responses).pop_front();
                self.completed.fetch_add(1, Ordering::SeqCst);
                queued.unwrap_or_else(|| self.fallback.clone())
            })
        }
    }

    fn registry(sources: Vec<Arc<FakeSource>>) -> SourceRegistry {
        SourceRegistry::new(
            sources
                .into_iter()
                .map(|s| s as Arc<dyn NewsSource>)
                .collect(),
        )
    }

    async fn wait_for_calls(source: &FakeSource, n: usize) {
        while source.calls() < n {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_new_search_is_idle() {
        let search = NewsSearch::new(SourceRegistry::default());
        let snapshot = search.snapshot();
        assert_eq!(snapshot.phase, SearchPhase::Idle);
        assert!(!snapshot.has_searched);
        assert!(!snapshot.is_loading());
        assert!(!snapshot.is_error());
    }

    #[tokio::test]
    async fn test_retry_before_first_search_is_none() {
        let search = NewsSearch::new(SourceRegistry::default());
        assert!(search.retry().await.is_none());
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successful_articles() {
        let guardian = Arc::new(FakeSource::ok(
            Source::Guardian,
            vec![
                article("old", Source::Guardian, "2025-01-01T00:00:00Z"),
                article("new", Source::Guardian, "2025-03-01T00:00:00Z"),
                article("mid", Source::Guardian, "2025-02-01T00:00:00Z"),
            ],
        ));
        let nyt = Arc::new(FakeSource::failing(Source::NewYorkTimes, "Invalid ApiKey"));
        let search = NewsSearch::new(registry(vec![guardian, nyt]));

        let snapshot = search
            .search(SearchParams::new("rust"))
            .await
            .into_snapshot()
            .unwrap();

        let ids: Vec<_> = snapshot.articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert_eq!(snapshot.source_errors.len(), 1);
        assert_eq!(snapshot.source_errors[0].provider, Some(Source::NewYorkTimes));
        assert!(snapshot.is_error());
        assert!(!snapshot.articles.is_empty());
        assert!(!snapshot.is_total_failure());
        assert_eq!(snapshot.error_message(), Some("Invalid ApiKey"));
        assert_eq!(snapshot.phase, SearchPhase::Settled);
        assert!(snapshot.has_searched);
        assert!(snapshot.pending.is_empty());
        assert_eq!(search.snapshot(), snapshot);
    }

    #[tokio::test]
    async fn test_ties_keep_registry_order() {
        let date = "2025-01-01T00:00:00Z";
        let guardian = Arc::new(FakeSource::ok(Source::Guardian, vec![article("g", Source::Guardian, date)]));
        let gnews = Arc::new(FakeSource::ok(Source::GNews, vec![article("n", Source::GNews, date)]));
        let search = NewsSearch::new(registry(vec![guardian, gnews]));

        let snapshot = search.search(SearchParams::default()).await.into_snapshot().unwrap();
        let ids: Vec<_> = snapshot.articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["g", "n"]);
    }

    #[tokio::test]
    async fn test_only_requested_sources_are_queried() {
        let guardian = Arc::new(FakeSource::ok(Source::Guardian, vec![]));
        let gnews = Arc::new(FakeSource::ok(Source::GNews, vec![]));
        let search = NewsSearch::new(registry(vec![Arc::clone(&guardian), Arc::clone(&gnews)]));

        let snapshot = search
            .search(SearchParams::new("x").with_sources([Source::GNews]))
            .await
            .into_snapshot()
            .unwrap();

        assert_eq!(snapshot.sources, vec![Source::GNews]);
        assert_eq!(guardian.calls(), 0);
        assert_eq!(gnews.calls(), 1);
    }

    #[tokio::test]
    async fn test_total_failure_and_retry_refetches_failed_sources_only() {
        let guardian = Arc::new(
            FakeSource::ok(
                Source::Guardian,
                vec![article("g", Source::Guardian, "2025-01-01T00:00:00Z")],
            )
            .then(Err(ApiError::no_response())),
        );
        let gnews = Arc::new(FakeSource::failing(Source::GNews, "quota"));
        let search = NewsSearch::new(registry(vec![Arc::clone(&guardian), Arc::clone(&gnews)]));

        let first = search.search(SearchParams::new("a")).await.into_snapshot().unwrap();
        assert!(first.is_total_failure());
        assert_eq!(first.source_errors[0].provider, Some(Source::Guardian));

        let second = search.retry().await.unwrap().into_snapshot().unwrap();
        assert_eq!(second.articles.len(), 1);
        assert_eq!(second.source_errors.len(), 1);
        assert!(!second.is_total_failure());
        assert_eq!(guardian.calls(), 2);
        assert_eq!(gnews.calls(), 2);

        // Guardian's success is now cached.
        search.retry().await.unwrap();
        assert_eq!(guardian.calls(), 2);
        assert_eq!(gnews.calls(), 3);
    }

    #[tokio::test]
    async fn test_identical_requests_share_one_call() {
        let gate = Arc::new(Semaphore::new(0));
        let guardian = Arc::new(
            FakeSource::ok(Source::Guardian, vec![article("g", Source::Guardian, "2025-01-01T00:00:00Z")])
                .gated(Arc::clone(&gate)),
        );
        let search = Arc::new(NewsSearch::new(registry(vec![Arc::clone(&guardian)])));

        let first = tokio::spawn({
            let search = Arc::clone(&search);
            async move { search.search(SearchParams::new("same")).await }
        });
        wait_for_calls(&guardian, 1).await;
        let second = tokio::spawn({
            let search = Arc::clone(&search);
            async move { search.search(SearchParams::new("same")).await }
        });
        while lock(&search.control).generation < 2 {
            tokio::task::yield_now().await;
        }
        gate.add_permits(10);

        assert_eq!(first.await.unwrap(), SearchOutcome::Superseded);
        let settled = second.await.unwrap().into_snapshot().unwrap();
        assert_eq!(settled.articles.len(), 1);
        assert_eq!(guardian.calls(), 1);
    }

    #[tokio::test]
    async fn test_newer_search_supersedes_older() {
        let gate = Arc::new(Semaphore::new(0));
        let guardian = Arc::new(FakeSource::ok(Source::Guardian, vec![]).gated(Arc::clone(&gate)));
        let search = Arc::new(NewsSearch::new(registry(vec![Arc::clone(&guardian)])));
        let mut rx = search.subscribe();

        let old = tokio::spawn({
            let search = Arc::clone(&search);
            async move { search.search(SearchParams::new("old")).await }
        });
        wait_for_calls(&guardian, 1).await;
        assert!(search.snapshot().is_loading());

        let new = tokio::spawn({
            let search = Arc::clone(&search);
            async move { search.search(SearchParams::new("new")).await }
        });
        wait_for_calls(&guardian, 2).await;
        gate.add_permits(2);

        assert_eq!(old.await.unwrap(), SearchOutcome::Superseded);
        assert!(matches!(new.await.unwrap(), SearchOutcome::Settled(_)));

        assert!(rx.has_changed().unwrap());
        let latest = rx.borrow_and_update().clone();
        assert_eq!(latest.phase, SearchPhase::Settled);
        assert_eq!(latest.params.unwrap().keyword, "new");
    }

    #[tokio::test]
    async fn test_sources_settling_out_of_order_publish_partial_results() {
        let date = "2025-01-01T00:00:00Z";
        let guardian_gate = Arc::new(Semaphore::new(0));
        let gnews_gate = Arc::new(Semaphore::new(0));
        let guardian = Arc::new(
            FakeSource::ok(Source::Guardian, vec![article("g", Source::Guardian, date)])
                .gated(Arc::clone(&guardian_gate)),
        );
        let gnews = Arc::new(
            FakeSource::ok(Source::GNews, vec![article("n", Source::GNews, date)])
                .gated(Arc::clone(&gnews_gate)),
        );
        let search = Arc::new(NewsSearch::new(registry(vec![
            Arc::clone(&guardian),
            Arc::clone(&gnews),
        ])));
        let mut rx = search.subscribe();

        let handle = tokio::spawn({
            let search = Arc::clone(&search);
            async move { search.search(SearchParams::new("tie")).await }
        });
        wait_for_calls(&guardian, 1).await;
        wait_for_calls(&gnews, 1).await;

        gnews_gate.add_permits(1);
        let partial = rx
            .wait_for(|s| s.pending == vec![Source::Guardian])
            .await
            .unwrap()
            .clone();
        let ids: Vec<_> = partial.articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["n"]);
        assert!(partial.is_loading());

        guardian_gate.add_permits(1);
        let settled = handle.await.unwrap().into_snapshot().unwrap();
        let ids: Vec<_> = settled.articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["g", "n"]);
        assert!(settled.pending.is_empty());
    }

    #[tokio::test]
    async fn test_superseded_requests_still_complete_and_stay_cached() {
        let date = "2025-01-01T00:00:00Z";
        let guardian_gate = Arc::new(Semaphore::new(0));
        let gnews_gate = Arc::new(Semaphore::new(0));
        let guardian = Arc::new(
            FakeSource::ok(Source::Guardian, vec![article("g", Source::Guardian, date)])
                .gated(Arc::clone(&guardian_gate)),
        );
        let nyt = Arc::new(FakeSource::ok(
            Source::NewYorkTimes,
            vec![article("t", Source::NewYorkTimes, date)],
        ));
        let gnews = Arc::new(
            FakeSource::ok(Source::GNews, vec![article("n", Source::GNews, date)])
                .gated(Arc::clone(&gnews_gate)),
        );
        let search = Arc::new(NewsSearch::new(registry(vec![
            Arc::clone(&guardian),
            Arc::clone(&nyt),
            Arc::clone(&gnews),
        ])));
        let stale = SearchParams::new("x").with_sources([Source::Guardian, Source::GNews]);

        let first = tokio::spawn({
            let search = Arc::clone(&search);
            let params = stale.clone();
            async move { search.search(params).await }
        });
        wait_for_calls(&guardian, 1).await;
        wait_for_calls(&gnews, 1).await;

        let newer = search
            .search(SearchParams::new("y").with_sources([Source::NewYorkTimes]))
            .await;
        assert!(matches!(newer, SearchOutcome::Settled(_)));

        gnews_gate.add_permits(1);
        assert_eq!(first.await.unwrap(), SearchOutcome::Superseded);

        guardian_gate.add_permits(1);
        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while guardian.completed() < 1 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("abandoned Guardian request should finish in the background");

        let repeat = search.search(stale).await.into_snapshot().unwrap();
        assert!(repeat.source_errors.is_empty());
        let ids: Vec<_> = repeat.articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["g", "n"]);
        assert_eq!(guardian.calls(), 1);
        assert_eq!(gnews.calls(), 1);
    }

    #[test]
    fn test_total_pages_uses_deepest_source() {
        let mut snapshot = SearchSnapshot::default();
        snapshot.meta.insert(Source::Guardian, SearchMeta::clamped(35, 10));
        snapshot.meta.insert(Source::GNews, SearchMeta::clamped(120, 10));
        assert_eq!(snapshot.total_pages(), 12);
        assert_eq!(SearchSnapshot::default().total_pages(), 0);
    }
}
