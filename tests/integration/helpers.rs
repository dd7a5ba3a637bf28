//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use licensegate_core::config::{AppConfig, DatabaseConfig};
use licensegate_core::error::AppError;
use licensegate_core::result::AppResult;
use licensegate_core::traits::{Clock, SystemClock};
use licensegate_database::{LedgerManager, LedgerStore, MemoryLedgerStore};
use licensegate_service::{GenerationRequest, LicenseRegistry, QuotaEnforcer, TextGenerator};

/// Peer address of a request made from the same host.
pub const LOOPBACK_PEER: &str = "127.0.0.1:50000";
/// Peer address of a request made from elsewhere.
pub const REMOTE_PEER: &str = "203.0.113.7:50000";

/// Canned text generator that counts its calls
#[derive(Debug)]
pub struct FakeGenerator {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl FakeGenerator {
    /// A generator that always answers with `reply`
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A generator whose backend is always down
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generate calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| AppError::external_service("Generation backend unavailable"))
    }
}

static CLOCK: LazyLock<Arc<SystemClock>> = LazyLock::new(|| Arc::new(SystemClock::new()));

/// Clock shared by every service a test builds
pub fn clock() -> Arc<dyn Clock> {
    Arc::clone(&*CLOCK) as Arc<dyn Clock>
}

/// Open a fresh ledger store by provider name
pub async fn open_store(provider: &str) -> Arc<dyn LedgerStore> {
    match provider {
        "memory" => Arc::new(MemoryLedgerStore::new()),
        _ => LedgerManager::open(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to open in-memory SQLite ledger")
            .store(),
    }
}

/// Open a SQLite ledger in a file under `dir`, with the default WAL pool
pub async fn open_file_store(dir: &TempDir) -> Arc<dyn LedgerStore> {
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("ledger.db").display()),
        ..DatabaseConfig::default()
    };
    LedgerManager::open(&config)
        .await
        .expect("Failed to open file-backed SQLite ledger")
        .store()
}

/// Every ledger flavour, each freshly opened.
///
/// The returned directory holds the file-backed database; keep it alive
/// for as long as the stores are used.
pub async fn all_stores() -> (TempDir, Vec<(&'static str, Arc<dyn LedgerStore>)>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let stores = vec![
        ("sqlite-file", open_file_store(&dir).await),
        ("sqlite", open_store("sqlite").await),
        ("memory", open_store("memory").await),
    ];
    (dir, stores)
}

/// Registry over `store` with default license settings
pub fn registry(store: &Arc<dyn LedgerStore>) -> LicenseRegistry {
    LicenseRegistry::new(
        Arc::clone(store),
        clock(),
        AppConfig::default().license,
    )
}

/// Enforcer over `store`
pub fn enforcer(store: &Arc<dyn LedgerStore>) -> QuotaEnforcer {
    QuotaEnforcer::new(Arc::clone(store), clock())
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Ledger store for direct inspection
    pub store: Arc<dyn LedgerStore>,
    /// The generator behind `/api/generate`
    pub generator: Arc<FakeGenerator>,
}

impl TestApp {
    /// Create a test application over SQLite with a working generator
    pub async fn new() -> Self {
        Self::with_generator("sqlite", FakeGenerator::replying("Once upon a time")).await
    }

    /// Create a test application with a specific provider and generator
    pub async fn with_generator(provider: &str, generator: FakeGenerator) -> Self {
        let config = AppConfig::default();
        let store = open_store(provider).await;
        registry(&store)
            .seed_defaults(&config.license.seed)
            .await
            .expect("Failed to seed default licenses");

        let generator = Arc::new(generator);
        let cors = config.server.cors.clone();
        let state = licensegate_api::AppState::new(
            config,
            Arc::clone(&store),
            clock(),
            Arc::clone(&generator) as Arc<dyn TextGenerator>,
        );

        Self {
            router: licensegate_api::build_app(state, &cors),
            store,
            generator,
        }
    }

    /// Make a request from the loopback interface
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        license_key: Option<&str>,
    ) -> TestResponse {
        self.request_from(LOOPBACK_PEER, method, path, body, license_key)
            .await
    }

    /// Make a request as if it arrived from `peer`
    pub async fn request_from(
        &self,
        peer: &str,
        method: &str,
        path: &str,
        body: Option<Value>,
        license_key: Option<&str>,
    ) -> TestResponse {
        let peer: SocketAddr = peer.parse().expect("Invalid peer address");

        let mut req = Request::builder().method(method).uri(path);

        if body.is_some() {
            req = req.header("Content-Type", "application/json");
        }
        if let Some(key) = license_key {
            req = req.header("x-license-key", key);
        }

        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        let mut req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        req.extensions_mut().insert(ConnectInfo(peer));

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Current usage of the license with `key`
    pub async fn usage_of(&self, key: &str) -> i64 {
        self.store
            .find_license_by_key(key)
            .await
            .expect("Lookup failed")
            .expect("License missing")
            .usage
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
