use super::error::FetchError;
use super::model::{Article, Headlines};
use super::render_articles;
use crate::cache::CacheStore;
use crate::config::NewsApiConfig;
use crate::render::{Quota, Region, Renderer};
use anyhow::{Context, Result};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use futures_util::StreamExt;
use reqwest::{Client, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use url::Url;

/// How long an error banner stays up.
pub const ERROR_DISPLAY: Duration = Duration::from_secs(5);

const RATE_LIMIT_HEADER: &str = "x-ratelimit-remaining";
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Success,
    Failure,
}

/// What a `fetch_news` call ended up rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Fetched from the API and written to the cache.
    Fresh(Vec<Article>),
    /// Served from a cache entry within its TTL; no request made.
    Cached(Vec<Article>),
    /// The fetch failed and the last snapshot was rendered instead.
    Fallback { error: FetchError, articles: Vec<Article> },
    /// The fetch failed with nothing cached to show.
    Unavailable(FetchError),
    /// No usable credential; nothing attempted.
    Misconfigured(FetchError),
}

type InFlight = Shared<BoxFuture<'static, FetchOutcome>>;

pub struct NewsFetcher {
    api: NewsApiConfig,
    endpoint: Url,
    client: Client,
    cache: CacheStore,
    renderer: Arc<dyn Renderer>,
    state: Mutex<FetchState>,
    in_flight: Mutex<Option<InFlight>>,
    error_generation: Arc<AtomicU64>,
}

impl NewsFetcher {
    pub fn new(api: NewsApiConfig, cache: CacheStore, renderer: Arc<dyn Renderer>) -> Result<Self> {
        let endpoint = Url::parse(&api.api_base)
            .with_context(|| format!("invalid api_base: {}", api.api_base))?;
        let client = Client::builder()
            .user_agent("news-desk/0.1")
            .gzip(true)
            .connect_timeout(api.timeout.min(Duration::from_secs(5)))
            .timeout(api.timeout)
            .build()?;
        Ok(Self {
            api,
            endpoint,
            client,
            cache,
            renderer,
            state: Mutex::new(FetchState::Idle),
            in_flight: Mutex::new(None),
            error_generation: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn state(&self) -> FetchState {
        *lock(&self.state)
    }

    /// Load headlines and render them. A call made while another is still
    /// running joins it instead of issuing a second request.
    pub async fn fetch_news(self: &Arc<Self>, force_refresh: bool) -> FetchOutcome {
        let pending = {
            let mut slot = lock(&self.in_flight);
            match slot.as_ref() {
                Some(pending) => {
                    tracing::debug!("joining in-flight fetch");
                    pending.clone()
                }
                None => {
                    let this = Arc::clone(self);
                    let fut = async move {
                        let outcome = this.run(force_refresh).await;
                        lock(&this.in_flight).take();
                        outcome
                    }
                    .boxed()
                    .shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };
        pending.await
    }

    async fn run(&self, force_refresh: bool) -> FetchOutcome {
        let Some(key) = self.api.credential() else {
            let err = FetchError::Config("api_key is missing or still the placeholder".into());
            tracing::error!(error = %err, "cannot fetch headlines");
            self.report(&err);
            self.set_state(FetchState::Failure);
            return FetchOutcome::Misconfigured(err);
        };

        if !force_refresh {
            if let Some(entry) = self.cache.get().filter(|e| !e.articles().is_empty()) {
                tracing::info!(articles = entry.articles().len(), "using cached news data");
                render_articles(self.renderer.as_ref(), entry.articles());
                self.set_state(FetchState::Success);
                return FetchOutcome::Cached(entry.data.articles);
            }
        }

        self.set_state(FetchState::Loading);
        self.renderer.clear_error();
        self.renderer.show_loading();

        match self.request(key).await {
            Ok(data) => {
                tracing::info!(articles = data.articles.len(), "fetched headlines");
                if let Err(err) = self.cache.put(&data) {
                    tracing::warn!(error = %format!("{err:#}"), "failed to update cache");
                }
                render_articles(self.renderer.as_ref(), &data.articles);
                self.set_state(FetchState::Success);
                FetchOutcome::Fresh(data.articles)
            }
            Err(err) => {
                tracing::warn!(error = %err, "fetch failed");
                self.report(&err);
                self.set_state(FetchState::Failure);
                self.fall_back(err)
            }
        }
    }

    async fn request(&self, key: &str) -> Result<Headlines, FetchError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("country", &self.api.country)
            .append_pair("pageSize", &self.api.page_size.to_string())
            .append_pair("apiKey", key);

        tracing::debug!(endpoint = %self.endpoint, "requesting headlines");
        let resp = self.client.get(url).send().await?;

        let remaining = remaining_quota(&resp);
        tracing::info!(
            "Remaining requests: {}/{}",
            remaining.map_or_else(|| "Unknown".to_string(), |n| n.to_string()),
            self.api.daily_quota
        );
        self.renderer.show_quota(Quota {
            remaining,
            limit: self.api.daily_quota,
        });
        // Checked before the status: a spent quota is a failure even on 200.
        if remaining == Some(0) {
            return Err(FetchError::QuotaExhausted);
        }

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = read_capped(resp, MAX_BODY_BYTES).await?;
        let data: Headlines = serde_json::from_slice(&body)
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;
        if data.articles.is_empty() {
            return Err(FetchError::EmptyResult);
        }
        Ok(data)
    }

    fn fall_back(&self, error: FetchError) -> FetchOutcome {
        match self.cache.get_stale().filter(|e| !e.articles().is_empty()) {
            Some(entry) => {
                tracing::info!(cached_at = %entry.timestamp, "rendering last cached snapshot");
                render_articles(self.renderer.as_ref(), entry.articles());
                FetchOutcome::Fallback {
                    error,
                    articles: entry.data.articles,
                }
            }
            None => {
                tracing::warn!("no cached snapshot to fall back to");
                self.renderer.show_hero(Region::Unavailable);
                self.renderer.show_peeks(Vec::new());
                self.renderer.show_categories(Region::Unavailable);
                FetchOutcome::Unavailable(error)
            }
        }
    }

    /// Show the error banner and schedule its removal. A later error resets
    /// the timer for the banner it replaced.
    fn report(&self, err: &FetchError) {
        self.renderer.show_error(&err.user_message());
        let generation = self.error_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.error_generation);
        let renderer = Arc::clone(&self.renderer);
        tokio::spawn(async move {
            tokio::time::sleep(ERROR_DISPLAY).await;
            if current.load(Ordering::SeqCst) == generation {
                renderer.clear_error();
            }
        });
    }

    fn set_state(&self, next: FetchState) {
        let mut state = lock(&self.state);
        let prev = *state;
        tracing::debug!(from = ?prev, to = ?next, "fetch state");
        *state = next;
    }
}

fn remaining_quota(resp: &Response) -> Option<u32> {
    resp.headers()
        .get(RATE_LIMIT_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

async fn read_capped(resp: Response, max: usize) -> Result<Vec<u8>, FetchError> {
    let mut stream = resp.bytes_stream();
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > max {
            return Err(FetchError::Network(format!("response larger than {max} bytes")));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FileStore;
    use crate::news::category::Category;
    use crate::news::layout::{CategorySection, HeroView, PeekView};
    use crate::render::Surface;
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::{tempdir, TempDir};
    use time::OffsetDateTime;
    use tracing_test::traced_test;

    const PATH: &str = "/v2/top-headlines";

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Loading,
        Hero(Region<HeroView>),
        Peeks(Vec<PeekView>),
        Categories(Region<Vec<CategorySection>>),
        Error(String),
        ClearError,
        Quota(Quota),
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<Event>>,
    }

    impl Recorder {
        fn push(&self, e: Event) {
            self.events.lock().unwrap().push(e);
        }

        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        fn position(&self, pred: impl Fn(&Event) -> bool) -> Option<usize> {
            self.events().iter().position(pred)
        }
    }

    impl Renderer for Recorder {
        fn show_loading(&self) {
            self.push(Event::Loading);
        }
        fn show_hero(&self, hero: Region<HeroView>) {
            self.push(Event::Hero(hero));
        }
        fn show_peeks(&self, peeks: Vec<PeekView>) {
            self.push(Event::Peeks(peeks));
        }
        fn show_categories(&self, sections: Region<Vec<CategorySection>>) {
            self.push(Event::Categories(sections));
        }
        fn show_error(&self, message: &str) {
            self.push(Event::Error(message.to_string()));
        }
        fn clear_error(&self) {
            self.push(Event::ClearError);
        }
        fn show_quota(&self, quota: Quota) {
            self.push(Event::Quota(quota));
        }
    }

    struct Harness {
        fetcher: Arc<NewsFetcher>,
        recorder: Arc<Recorder>,
        cache: CacheStore,
        _dir: TempDir,
    }

    fn api(base: String, key: Option<&str>) -> NewsApiConfig {
        NewsApiConfig {
            api_key: key.map(str::to_string),
            api_base: base,
            country: "us".into(),
            page_size: 100,
            timeout: Duration::from_secs(10),
            daily_quota: 100,
        }
    }

    fn harness(base: String, key: Option<&str>) -> Harness {
        harness_with(api(base, key))
    }

    fn harness_with(api: NewsApiConfig) -> Harness {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(Arc::new(FileStore::new(dir.path())));
        let recorder = Arc::new(Recorder::default());
        let fetcher = NewsFetcher::new(api, cache.clone(), recorder.clone()).unwrap();
        Harness {
            fetcher: Arc::new(fetcher),
            recorder,
            cache,
            _dir: dir,
        }
    }

    fn headlines(title: &str, source: &str, n: usize) -> Headlines {
        let body = json!({
            "status": "ok",
            "totalResults": n,
            "articles": (0..n)
                .map(|_| json!({"title": title, "source": {"id": null, "name": source}}))
                .collect::<Vec<_>>(),
        });
        serde_json::from_value(body).unwrap()
    }

    async fn mock_headlines(server: &mut ServerGuard, body: &Headlines, hits: usize) -> Mock {
        server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(body).unwrap())
            .expect(hits)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn success_renders_and_caches() {
        let mut server = Server::new_async().await;
        let payload = headlines(&"A".repeat(100), "BBC News", 10);
        let mock = server
            .mock("GET", PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("country".into(), "us".into()),
                Matcher::UrlEncoded("pageSize".into(), "100".into()),
                Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_body(serde_json::to_string(&payload).unwrap())
            .create_async()
            .await;
        let h = harness(format!("{}{PATH}", server.url()), Some("test-key"));

        let outcome = h.fetcher.fetch_news(false).await;

        mock.assert_async().await;
        assert_eq!(outcome, FetchOutcome::Fresh(payload.articles.clone()));
        assert_eq!(h.fetcher.state(), FetchState::Success);
        assert_eq!(h.cache.get().unwrap().data, payload);

        let events = h.recorder.events();
        assert_eq!(events[0], Event::ClearError);
        assert_eq!(events[1], Event::Loading);
        assert_eq!(events[2], Event::Quota(Quota { remaining: None, limit: 100 }));
        match &events[3] {
            Event::Hero(Region::Ready(hero)) => assert_eq!(hero.title, "A".repeat(100)),
            other => panic!("expected hero, got {other:?}"),
        }
        match &events[4] {
            Event::Peeks(peeks) => {
                assert_eq!(peeks.len(), 3);
                assert!(peeks.iter().all(|p| p.title == format!("{}...", "A".repeat(30))));
            }
            other => panic!("expected peeks, got {other:?}"),
        }
        match &events[5] {
            Event::Categories(Region::Ready(sections)) => {
                assert_eq!(sections.len(), 1);
                assert_eq!(sections[0].category, Category::General);
                assert_eq!(sections[0].articles.len(), 10);
            }
            other => panic!("expected categories, got {other:?}"),
        }
        assert!(!events.iter().any(|e| matches!(e, Event::Error(_))));
    }

    #[tokio::test]
    #[traced_test]
    async fn fresh_cache_skips_network() {
        let mut server = Server::new_async().await;
        let mock = mock_headlines(&mut server, &headlines("net", "CNN", 2), 0).await;
        let h = harness(format!("{}{PATH}", server.url()), Some("k"));
        let cached = headlines("cached", "ESPN", 4);
        h.cache
            .put_at(&cached, OffsetDateTime::now_utc() - time::Duration::minutes(10))
            .unwrap();

        let outcome = h.fetcher.fetch_news(false).await;

        mock.assert_async().await;
        assert_eq!(outcome, FetchOutcome::Cached(cached.articles.clone()));
        assert!(!h.recorder.events().contains(&Event::Loading));
        assert!(logs_contain("using cached news data"));
    }

    #[tokio::test]
    async fn force_refresh_bypasses_fresh_cache() {
        let mut server = Server::new_async().await;
        let live = headlines("live", "Wired", 3);
        let mock = mock_headlines(&mut server, &live, 1).await;
        let h = harness(format!("{}{PATH}", server.url()), Some("k"));
        h.cache.put(&headlines("cached", "ESPN", 4)).unwrap();

        let outcome = h.fetcher.fetch_news(true).await;

        mock.assert_async().await;
        assert_eq!(outcome, FetchOutcome::Fresh(live.articles.clone()));
        assert_eq!(h.cache.get().unwrap().data, live);
    }

    #[tokio::test]
    async fn expired_cache_triggers_fetch() {
        let mut server = Server::new_async().await;
        let live = headlines("live", "Wired", 3);
        let mock = mock_headlines(&mut server, &live, 1).await;
        let h = harness(format!("{}{PATH}", server.url()), Some("k"));
        h.cache
            .put_at(&headlines("old", "ESPN", 4), OffsetDateTime::now_utc() - time::Duration::hours(2))
            .unwrap();

        let outcome = h.fetcher.fetch_news(false).await;

        mock.assert_async().await;
        assert_eq!(outcome, FetchOutcome::Fresh(live.articles));
    }

    #[tokio::test]
    async fn zero_quota_fails_even_on_ok_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("X-RateLimit-Remaining", "0")
            .with_body(serde_json::to_string(&headlines("t", "CNN", 5)).unwrap())
            .create_async()
            .await;
        let h = harness(format!("{}{PATH}", server.url()), Some("k"));

        let outcome = h.fetcher.fetch_news(false).await;

        mock.assert_async().await;
        assert_eq!(outcome, FetchOutcome::Unavailable(FetchError::QuotaExhausted));
        assert!(h.cache.get_stale().is_none());
        assert!(h.recorder.events().contains(&Event::Quota(Quota {
            remaining: Some(0),
            limit: 100
        })));
        assert_eq!(h.fetcher.state(), FetchState::Failure);
    }

    #[tokio::test]
    async fn zero_quota_falls_back_to_stale_snapshot_untouched() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("X-RateLimit-Remaining", "0")
            .with_body(serde_json::to_string(&headlines("new", "CNN", 5)).unwrap())
            .create_async()
            .await;
        let h = harness(format!("{}{PATH}", server.url()), Some("k"));
        let stale_at = OffsetDateTime::now_utc() - time::Duration::hours(3);
        let stale = headlines("stale", "Forbes", 2);
        h.cache.put_at(&stale, stale_at).unwrap();

        let outcome = h.fetcher.fetch_news(false).await;

        assert_eq!(
            outcome,
            FetchOutcome::Fallback {
                error: FetchError::QuotaExhausted,
                articles: stale.articles.clone(),
            }
        );
        let entry = h.cache.get_stale().unwrap();
        assert_eq!(entry.data, stale);
        assert!(entry.timestamp < OffsetDateTime::now_utc() - time::Duration::hours(2));

        let error_at = h.recorder.position(|e| matches!(e, Event::Error(_))).unwrap();
        let hero_at = h
            .recorder
            .position(|e| matches!(e, Event::Hero(Region::Ready(_))))
            .unwrap();
        assert!(error_at < hero_at);
    }

    #[tokio::test]
    async fn http_error_without_cache_shows_unavailable() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"status":"error","code":"apiKeyInvalid"}"#)
            .create_async()
            .await;
        let h = harness(format!("{}{PATH}", server.url()), Some("bad"));

        let outcome = h.fetcher.fetch_news(false).await;

        let err = FetchError::Api {
            status: 401,
            text: "Unauthorized".into(),
        };
        assert_eq!(outcome, FetchOutcome::Unavailable(err.clone()));

        let events = h.recorder.events();
        let error_at = events
            .iter()
            .position(|e| *e == Event::Error(err.user_message()))
            .unwrap();
        let hero_at = events
            .iter()
            .position(|e| *e == Event::Hero(Region::Unavailable))
            .unwrap();
        assert!(error_at < hero_at);
        assert!(events.contains(&Event::Categories(Region::Unavailable)));
    }

    #[tokio::test]
    async fn empty_article_list_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = mock_headlines(&mut server, &headlines("x", "CNN", 0), 1).await;
        let h = harness(format!("{}{PATH}", server.url()), Some("k"));

        let outcome = h.fetcher.fetch_news(false).await;

        assert_eq!(outcome, FetchOutcome::Unavailable(FetchError::EmptyResult));
        assert!(h.cache.get_stale().is_none());
    }

    #[tokio::test]
    async fn unparseable_body_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;
        let h = harness(format!("{}{PATH}", server.url()), Some("k"));

        let outcome = h.fetcher.fetch_news(false).await;

        assert!(matches!(
            outcome,
            FetchOutcome::Unavailable(FetchError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        let h = harness("http://127.0.0.1:1/v2/top-headlines".into(), Some("k"));

        let outcome = h.fetcher.fetch_news(false).await;

        assert!(matches!(outcome, FetchOutcome::Unavailable(FetchError::Network(_))));
    }

    #[tokio::test]
    async fn stalled_server_times_out_as_network_error() {
        // Accepts connections but never answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming().flatten() {
                held.push(stream);
            }
        });
        let h = harness_with(NewsApiConfig {
            timeout: Duration::from_secs(1),
            ..api(format!("http://{addr}{PATH}"), Some("k"))
        });

        let started = std::time::Instant::now();
        let outcome = h.fetcher.fetch_news(false).await;

        assert_eq!(
            outcome,
            FetchOutcome::Unavailable(FetchError::Network("request timed out".into()))
        );
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(h.cache.get_stale().is_none());
    }

    #[tokio::test]
    async fn oversized_body_is_network_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(vec![b' '; MAX_BODY_BYTES + 1])
            .create_async()
            .await;
        let h = harness(format!("{}{PATH}", server.url()), Some("k"));

        let outcome = h.fetcher.fetch_news(false).await;

        assert!(matches!(outcome, FetchOutcome::Unavailable(FetchError::Network(_))));
        assert!(h.cache.get_stale().is_none());
    }

    #[tokio::test]
    async fn body_at_the_cap_is_read() {
        let mut server = Server::new_async().await;
        let live = headlines("live", "CNN", 2);
        let mut body = serde_json::to_vec(&live).unwrap();
        body.resize(MAX_BODY_BYTES, b' ');
        let _mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;
        let h = harness(format!("{}{PATH}", server.url()), Some("k"));

        let outcome = h.fetcher.fetch_news(false).await;

        assert_eq!(outcome, FetchOutcome::Fresh(live.articles));
    }

    #[tokio::test]
    async fn missing_key_makes_no_request() {
        let mut server = Server::new_async().await;
        let mock = mock_headlines(&mut server, &headlines("x", "CNN", 1), 0).await;
        for key in [None, Some(""), Some(crate::config::PLACEHOLDER_API_KEY)] {
            let h = harness(format!("{}{PATH}", server.url()), key);
            let outcome = h.fetcher.fetch_news(true).await;

            assert!(matches!(outcome, FetchOutcome::Misconfigured(FetchError::Config(_))));
            let events = h.recorder.events();
            assert_eq!(events.len(), 1);
            assert!(matches!(events[0], Event::Error(_)));
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn concurrent_calls_share_one_request() {
        let mut server = Server::new_async().await;
        let live = headlines("live", "TMZ", 4);
        let mock = mock_headlines(&mut server, &live, 1).await;
        let h = harness(format!("{}{PATH}", server.url()), Some("k"));

        let (a, b) = tokio::join!(h.fetcher.fetch_news(true), h.fetcher.fetch_news(true));

        mock.assert_async().await;
        assert_eq!(a, FetchOutcome::Fresh(live.articles.clone()));
        assert_eq!(a, b);
        assert!(lock(&h.fetcher.in_flight).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn error_banner_clears_after_display_window() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(Arc::new(FileStore::new(dir.path())));
        let surface = Arc::new(Surface::new());
        let fetcher = Arc::new(
            NewsFetcher::new(api("http://localhost/".into(), None), cache, surface.clone()).unwrap(),
        );

        fetcher.fetch_news(false).await;
        assert!(surface.snapshot().error.is_some());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(surface.snapshot().error.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(surface.snapshot().error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_error_keeps_its_own_window() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(Arc::new(FileStore::new(dir.path())));
        let surface = Arc::new(Surface::new());
        let fetcher = Arc::new(
            NewsFetcher::new(api("http://localhost/".into(), None), cache, surface.clone()).unwrap(),
        );

        fetcher.fetch_news(false).await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        fetcher.fetch_news(false).await;

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(surface.snapshot().error.is_some());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(surface.snapshot().error.is_none());
    }
}
