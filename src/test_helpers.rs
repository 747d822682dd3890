//! Shared test doubles for the fetch seam and the application context.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::app::AppContext;
use crate::net::error::ApiError;
use crate::net::fetch::{Fetch, HttpRequest, HttpResponse};
use crate::util::navigate::HistoryNavigator;
use crate::util::storage::{KeyValueStore, MemoryStore};

pub const TEST_BASE_URL: &str = "http://api.test";

/// Scripted fetch: replays queued results in order and records every request.
/// Once the queue is empty it answers `200 {}`.
#[derive(Default)]
pub struct MockFetch {
    responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockFetch {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn replying(responses: Vec<Result<HttpResponse, ApiError>>) -> Arc<Self> {
        Arc::new(Self { responses: Mutex::new(responses.into()), requests: Mutex::new(Vec::new()) })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Fetch for MockFetch {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, "{}")))
    }
}

/// Memory store that counts removals, to observe how often logout ran.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    removals: AtomicUsize,
}

impl CountingStore {
    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        self.inner.set_item(key, value);
    }

    fn remove_item(&self, key: &str) {
        self.removals.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_item(key);
    }
}

pub struct TestApp {
    pub ctx: AppContext,
    pub fetch: Arc<MockFetch>,
    pub store: Arc<CountingStore>,
    pub navigator: Arc<HistoryNavigator>,
}

/// Context wired to a memory-backed store, a recording navigator, and `fetch`
/// as the ambient fetch.
pub fn test_app(fetch: Arc<MockFetch>) -> TestApp {
    let store = Arc::new(CountingStore::default());
    let navigator = Arc::new(HistoryNavigator::new());
    let ctx = AppContext::new(TEST_BASE_URL, Some(store.clone()), navigator.clone(), fetch.clone());
    TestApp { ctx, fetch, store, navigator }
}

/// Same as [`test_app`] with a logged-in session.
pub fn logged_in_app(fetch: Arc<MockFetch>) -> TestApp {
    let app = test_app(fetch);
    app.ctx.session.login("tok-123");
    app
}
