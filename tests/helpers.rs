// Shared test helpers: in-memory stores, scripted strategies and state builders.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;

use clip_audit::resolver::StrategyChain;
use clip_audit::server::AppState;
use clip_audit::{
    run_migrations, AnalysisLogEntry, Config, DatabaseError, Endpoints, FetchContext, LogStore,
    NewLogEntry, PostTarget, ProbeClient, Resolver, SqliteLogStore, Strategy, StrategyError,
    VideoInfo, VideoVariant, VulnerabilityScanner,
};

/// Creates a test database pool with migrations applied.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Config whose third-party endpoints all point at `base` (a mock server).
#[allow(dead_code)]
pub fn config_at(base: &str) -> Config {
    Config {
        endpoints: Endpoints::all_at(base),
        timeout_seconds: 5,
        ..Config::default()
    }
}

/// Fetch context whose endpoints all point at `base`.
#[allow(dead_code)]
pub fn context_at(base: &str) -> FetchContext {
    FetchContext::new(reqwest::Client::new(), &config_at(base))
}

/// A one-variant video with the given URL.
#[allow(dead_code)]
pub fn sample_video(id: &str, url: &str) -> VideoInfo {
    VideoInfo {
        id: id.to_string(),
        title: "Sample clip".to_string(),
        thumbnail: Some("https://img.example/thumb.jpg".to_string()),
        variants: vec![VideoVariant::mp4(url, Some(2_500_000))],
        author: Some("sampler".to_string()),
        duration: Some(12.5),
    }
}

/// What a [`ScriptedStrategy`] does when invoked.
#[allow(dead_code)]
#[derive(Clone)]
pub enum Script {
    Succeed(VideoInfo),
    Fail,
    /// Sleeps this long, then succeeds
    Stall(Duration, VideoInfo),
}

/// Strategy with a fixed outcome that counts its invocations.
#[allow(dead_code)]
pub struct ScriptedStrategy {
    name: &'static str,
    script: Script,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptedStrategy {
    pub fn new(name: &'static str, script: Script) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                script,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    pub fn boxed(name: &'static str, script: Script) -> (Box<dyn Strategy>, Arc<AtomicUsize>) {
        let (strategy, calls) = Self::new(name, script);
        (Box::new(strategy), calls)
    }
}

#[async_trait]
impl Strategy for ScriptedStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn attempt(
        &self,
        _target: &PostTarget,
        _ctx: &FetchContext,
    ) -> Result<VideoInfo, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Succeed(video) => Ok(video.clone()),
            Script::Fail => Err(StrategyError::Status(503)),
            Script::Stall(delay, video) => {
                tokio::time::sleep(*delay).await;
                Ok(video.clone())
            }
        }
    }
}

/// Resolver over explicit chains, with no network access of its own.
#[allow(dead_code)]
pub fn resolver_with(x_chain: StrategyChain, instagram_chain: StrategyChain) -> Resolver {
    Resolver::with_chains(x_chain, instagram_chain, context_at("http://127.0.0.1:9"))
}

/// Log store whose every operation fails.
#[allow(dead_code)]
pub struct FailingStore;

#[async_trait]
impl LogStore for FailingStore {
    async fn append(&self, _entry: NewLogEntry) -> Result<AnalysisLogEntry, DatabaseError> {
        Err(DatabaseError::FileCreationError("disk gone".to_string()))
    }

    async fn list(&self) -> Result<Vec<AnalysisLogEntry>, DatabaseError> {
        Err(DatabaseError::FileCreationError("disk gone".to_string()))
    }
}

/// Scanner with a guarded probe client: loopback video URLs are never probed.
#[allow(dead_code)]
pub fn guarded_scanner() -> VulnerabilityScanner {
    let probe = ProbeClient::new(&Config::default()).expect("probe client builds");
    VulnerabilityScanner::new(probe)
}

/// Server state over the given resolver and store.
#[allow(dead_code)]
pub fn app_state(resolver: Resolver, store: Arc<dyn LogStore>) -> AppState {
    AppState {
        resolver: Arc::new(resolver),
        scanner: Arc::new(guarded_scanner()),
        store,
    }
}

/// Server state backed by a fresh in-memory SQLite store.
#[allow(dead_code)]
pub async fn sqlite_state(resolver: Resolver) -> (AppState, SqliteLogStore) {
    let store = SqliteLogStore::new(create_test_pool().await);
    (app_state(resolver, Arc::new(store.clone())), store)
}
