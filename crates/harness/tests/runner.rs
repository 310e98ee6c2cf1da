// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Integration tests for the batch runner using a mock Axum server.

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Router,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{delete, get, patch, post, put},
};
use barrage_harness::{
    call::CallSpec,
    config::{AuthConfig, BenchConfig},
    error::BenchError,
    runner::{BatchRunner, RunState},
    token::TOKEN_CACHE_KEY,
};
use barrage_infrastructure::cache::{InMemoryTokenCache, TokenCache};
use reqwest::Method;
use rstest::rstest;
use serde_json::json;

#[derive(Debug, Default)]
struct TestServerState {
    auth_calls: AtomicUsize,
    verb_calls: AtomicUsize,
    fail_delete: AtomicBool,
    concurrent: AtomicUsize,
    max_concurrent: AtomicUsize,
    bearer_headers: Mutex<Vec<Option<String>>>,
}

impl TestServerState {
    async fn record_verb(&self, headers: &HeaderMap) {
        let entered = self.concurrent.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_concurrent.fetch_max(entered, Ordering::SeqCst);

        self.verb_calls.fetch_add(1, Ordering::SeqCst);
        let bearer = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);
        self.bearer_headers.lock().unwrap().push(bearer);

        // Hold the slot briefly so concurrency is observable
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.concurrent.fetch_sub(1, Ordering::SeqCst);
    }
}

fn create_router(state: Arc<TestServerState>) -> Router {
    let verb_handler = |state: Arc<TestServerState>| {
        move |headers: HeaderMap| async move {
            state.record_verb(&headers).await;
            Json(json!({"ok": true}))
        }
    };

    let delete_state = state.clone();
    let auth_state = state.clone();

    Router::new()
        .route("/get", get(verb_handler(state.clone())))
        .route("/post", post(verb_handler(state.clone())))
        .route("/put", put(verb_handler(state.clone())))
        .route("/patch", patch(verb_handler(state.clone())))
        .route(
            "/delete",
            delete(move |headers: HeaderMap| {
                let state = delete_state.clone();
                async move {
                    state.record_verb(&headers).await;
                    if state.fail_delete.load(Ordering::SeqCst) {
                        (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
                    } else {
                        Json(json!({"ok": true})).into_response()
                    }
                }
            }),
        )
        .route(
            "/upload",
            post(move || async move { Json(json!({"stored": true})) }),
        )
        .route(
            "/token",
            post(move |body: String| {
                let state = auth_state.clone();
                async move {
                    state.auth_calls.fetch_add(1, Ordering::SeqCst);
                    assert!(body.contains("username="));
                    Json(json!({"access_token": "test-token-1"}))
                }
            }),
        )
        .route(
            "/token-missing-field",
            post(move || async move { Json(json!({"token_type": "bearer"})) }),
        )
}

async fn start_test_server(state: Arc<TestServerState>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test server");
    let addr = listener.local_addr().expect("missing local addr");

    tokio::spawn(async move {
        axum::serve(listener, create_router(state).into_make_service())
            .await
            .expect("test server failed");
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

fn five_verb_suite() -> Vec<CallSpec> {
    vec![
        CallSpec::new("GET", Method::GET, "/get"),
        CallSpec::new("POST", Method::POST, "/post"),
        CallSpec::new("PUT", Method::PUT, "/put"),
        CallSpec::new("PATCH", Method::PATCH, "/patch"),
        CallSpec::new("DELETE", Method::DELETE, "/delete"),
    ]
}

fn test_config(addr: SocketAddr) -> BenchConfig {
    BenchConfig {
        base_url: format!("http://{addr}"),
        workers: 2,
        iterations: 1,
        concurrency: 25,
        timeout_secs: 5,
        ..Default::default()
    }
}

fn auth_config(addr: SocketAddr) -> AuthConfig {
    AuthConfig {
        url: format!("http://{addr}/token"),
        username: "bench".to_string(),
        password: "secret".to_string(),
    }
}

#[rstest]
#[tokio::test]
async fn test_all_success_scenario_two_workers_five_verbs() {
    let state = Arc::new(TestServerState::default());
    let addr = start_test_server(state.clone()).await;

    let mut runner = BatchRunner::new(test_config(addr), Arc::new(InMemoryTokenCache::new()))
        .with_suite(five_verb_suite());
    let stats = runner.run().await.expect("run failed");

    assert_eq!(stats.total_issued, 10);
    assert_eq!(stats.total_succeeded, 10);
    assert_eq!(stats.total_failed, 0);
    assert_eq!(runner.state(), RunState::Finalized);
    assert_eq!(state.verb_calls.load(Ordering::SeqCst), 10);
}

#[rstest]
#[tokio::test]
async fn test_failing_delete_is_isolated_per_worker() {
    let state = Arc::new(TestServerState::default());
    state.fail_delete.store(true, Ordering::SeqCst);
    let addr = start_test_server(state.clone()).await;

    let mut runner = BatchRunner::new(test_config(addr), Arc::new(InMemoryTokenCache::new()))
        .with_suite(five_verb_suite());
    let stats = runner.run().await.expect("run failed");

    // One DELETE per worker fails; every other call still completes
    assert_eq!(stats.total_issued, 10);
    assert_eq!(stats.total_failed, 2);
    assert_eq!(stats.total_succeeded, 8);
}

#[rstest]
#[case(1, 1)]
#[case(3, 2)]
#[case(2, 5)]
#[tokio::test]
async fn test_issued_always_equals_shape(#[case] workers: usize, #[case] iterations: usize) {
    let state = Arc::new(TestServerState::default());
    state.fail_delete.store(true, Ordering::SeqCst);
    let addr = start_test_server(state.clone()).await;

    let config = BenchConfig {
        workers,
        iterations,
        ..test_config(addr)
    };
    let mut runner = BatchRunner::new(config, Arc::new(InMemoryTokenCache::new()))
        .with_suite(five_verb_suite());
    let stats = runner.run().await.expect("run failed");

    assert_eq!(stats.total_issued, workers * iterations * 5);
    assert_eq!(stats.total_succeeded + stats.total_failed, stats.total_issued);
}

#[rstest]
#[tokio::test]
async fn test_default_suite_with_upload() {
    let state = Arc::new(TestServerState::default());
    let addr = start_test_server(state.clone()).await;

    let config = BenchConfig {
        upload_url: Some(format!("http://{addr}/upload")),
        workers: 1,
        iterations: 2,
        ..test_config(addr)
    };
    let mut runner = BatchRunner::new(config, Arc::new(InMemoryTokenCache::new()));
    let stats = runner.run().await.expect("run failed");

    // GET/POST/PUT/PATCH/DELETE/HEAD plus the upload, twice
    assert_eq!(stats.total_issued, 14);
    assert_eq!(stats.total_failed, 0);
}

#[rstest]
#[tokio::test]
async fn test_concurrent_calls_never_exceed_limit() {
    let state = Arc::new(TestServerState::default());
    let addr = start_test_server(state.clone()).await;

    let config = BenchConfig {
        workers: 4,
        iterations: 3,
        concurrency: 3,
        ..test_config(addr)
    };
    let mut runner = BatchRunner::new(config, Arc::new(InMemoryTokenCache::new()))
        .with_suite(five_verb_suite());
    let stats = runner.run().await.expect("run failed");

    assert_eq!(stats.total_issued, 60);
    assert!(state.max_concurrent.load(Ordering::SeqCst) <= 3);
}

#[rstest]
#[tokio::test]
async fn test_authenticated_run_attaches_bearer_token() {
    let state = Arc::new(TestServerState::default());
    let addr = start_test_server(state.clone()).await;

    let config = BenchConfig {
        auth: Some(auth_config(addr)),
        ..test_config(addr)
    };
    let mut runner = BatchRunner::new(config, Arc::new(InMemoryTokenCache::new()))
        .with_suite(five_verb_suite());
    let stats = runner.run().await.expect("run failed");

    assert_eq!(stats.total_succeeded, 10);
    assert_eq!(state.auth_calls.load(Ordering::SeqCst), 1);

    let bearers = state.bearer_headers.lock().unwrap();
    assert_eq!(bearers.len(), 10);
    assert!(bearers
        .iter()
        .all(|b| b.as_deref() == Some("Bearer test-token-1")));
}

#[rstest]
#[tokio::test]
async fn test_warm_cache_issues_zero_auth_calls() {
    let state = Arc::new(TestServerState::default());
    let addr = start_test_server(state.clone()).await;

    let cache = Arc::new(InMemoryTokenCache::new());
    cache
        .set(TOKEN_CACHE_KEY, "cached-token".to_string(), Duration::from_secs(3600))
        .await
        .unwrap();

    let config = BenchConfig {
        auth: Some(auth_config(addr)),
        ..test_config(addr)
    };
    let mut runner = BatchRunner::new(config, cache).with_suite(five_verb_suite());
    let stats = runner.run().await.expect("run failed");

    assert_eq!(stats.total_succeeded, 10);
    assert_eq!(state.auth_calls.load(Ordering::SeqCst), 0);

    let bearers = state.bearer_headers.lock().unwrap();
    assert!(bearers
        .iter()
        .all(|b| b.as_deref() == Some("Bearer cached-token")));
}

#[rstest]
#[tokio::test]
async fn test_exchange_without_token_field_fails_before_any_verb_call() {
    let state = Arc::new(TestServerState::default());
    let addr = start_test_server(state.clone()).await;

    // The exchange answers 2xx JSON without `access_token`
    let config = BenchConfig {
        auth: Some(AuthConfig {
            url: format!("http://{addr}/token-missing-field"),
            username: "bench".to_string(),
            password: "secret".to_string(),
        }),
        ..test_config(addr)
    };
    let mut runner = BatchRunner::new(config, Arc::new(InMemoryTokenCache::new()))
        .with_suite(five_verb_suite());

    match runner.run().await {
        Err(BenchError::Auth(_)) => {}
        other => panic!("expected Auth error, got {other:?}"),
    }
    assert_eq!(runner.state(), RunState::Failed);
    assert_eq!(state.verb_calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn test_exchange_bad_status_fails_fast() {
    let state = Arc::new(TestServerState::default());
    let addr = start_test_server(state.clone()).await;

    // No route at /missing: the exchange sees a non-2xx status
    let config = BenchConfig {
        auth: Some(AuthConfig {
            url: format!("http://{addr}/missing"),
            username: "bench".to_string(),
            password: "secret".to_string(),
        }),
        ..test_config(addr)
    };
    let mut runner = BatchRunner::new(config, Arc::new(InMemoryTokenCache::new()))
        .with_suite(five_verb_suite());

    match runner.run().await {
        Err(BenchError::Auth(message)) => assert!(message.contains("status")),
        other => panic!("expected Auth error, got {other:?}"),
    }
    assert_eq!(state.verb_calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn test_unreachable_server_fails_all_calls_but_completes() {
    // Bind then drop a listener so the port is very likely unoccupied
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut runner = BatchRunner::new(test_config(addr), Arc::new(InMemoryTokenCache::new()))
        .with_suite(five_verb_suite());
    let stats = runner.run().await.expect("run should complete");

    assert_eq!(stats.total_issued, 10);
    assert_eq!(stats.total_failed, 10);
    assert_eq!(stats.total_succeeded, 0);
    assert_eq!(runner.state(), RunState::Finalized);
}
