//! Failure injection tests for the failover fetcher.
//!
//! These drive `FailoverFetcher` with an in-order endpoint set so the
//! attempt sequence is deterministic.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dservice_client::http::{AttemptFailure, FetchError, RequestOptions};
use dservice_client::load_balancer::EndpointSet;
use dservice_client::resilience::FailoverFetcher;
use reqwest::{Method, StatusCode};

mod common;

fn fetcher() -> FailoverFetcher {
    let http = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();
    FailoverFetcher::new(http)
}

fn in_order(urls: &[String]) -> EndpointSet {
    EndpointSet::in_order(urls.to_vec())
}

#[tokio::test]
async fn test_server_error_fails_over_in_order() {
    let first = common::start_fixed_backend(500, "boom").await;
    let second = common::start_fixed_backend(200, "ok").await;

    let endpoints = in_order(&[first.url(), second.url()]);

    let res = fetcher()
        .fetch(&endpoints, "/data", &RequestOptions::get())
        .await
        .expect("second endpoint should answer");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "ok");
    assert_eq!(first.hits(), 1);
    assert_eq!(second.hits(), 1);
}

#[tokio::test]
async fn test_client_error_is_not_failed_over() {
    let first = common::start_fixed_backend(404, "missing").await;
    let second = common::start_fixed_backend(200, "ok").await;
    let endpoints = in_order(&[first.url(), second.url()]);

    let err = fetcher()
        .fetch(&endpoints, "/missing", &RequestOptions::get())
        .await
        .unwrap_err();

    match err {
        FetchError::Client { status, status_text, endpoint } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(status_text, "Not Found");
            assert_eq!(endpoint, first.url());
        }
        other => panic!("expected client error, got {other}"),
    }
    assert_eq!(first.hits(), 1);
    assert_eq!(second.hits(), 0, "second endpoint must never be contacted");
}

#[tokio::test]
async fn test_transport_error_fails_over() {
    let dead = common::dead_endpoint().await;
    let live = common::start_fixed_backend(200, "alive").await;
    let endpoints = in_order(&[dead, live.url()]);

    let res = fetcher()
        .fetch(&endpoints, "/", &RequestOptions::get())
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "alive");
    assert_eq!(live.hits(), 1);
}

#[tokio::test]
async fn test_last_server_error_is_raised() {
    let first = common::dead_endpoint().await;
    let last = common::start_fixed_backend(503, "down").await;
    let endpoints = in_order(&[first, last.url()]);

    let err = fetcher()
        .fetch(&endpoints, "/", &RequestOptions::get())
        .await
        .unwrap_err();

    match err {
        FetchError::AllEndpointsFailed { attempts, last: failure } => {
            assert_eq!(attempts, 2);
            assert!(matches!(
                failure,
                AttemptFailure::Status { status: StatusCode::SERVICE_UNAVAILABLE, .. }
            ));
        }
        other => panic!("expected exhaustion, got {other}"),
    }
}

#[tokio::test]
async fn test_last_transport_error_is_raised() {
    let first = common::start_fixed_backend(502, "bad gateway").await;
    let last = common::dead_endpoint().await;
    let endpoints = in_order(&[first.url(), last.clone()]);

    let err = fetcher()
        .fetch(&endpoints, "/", &RequestOptions::get())
        .await
        .unwrap_err();

    match err {
        FetchError::AllEndpointsFailed { attempts, last: failure } => {
            assert_eq!(attempts, 2);
            assert_eq!(failure.endpoint(), last);
            assert!(matches!(failure, AttemptFailure::Transport { .. }));
        }
        other => panic!("expected exhaustion, got {other}"),
    }
    assert_eq!(first.hits(), 1);
}

#[tokio::test]
async fn test_every_call_restarts_from_first_endpoint() {
    let calls = Arc::new(AtomicU32::new(0));
    let cc = calls.clone();
    let flaky = common::start_programmable_backend(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (500, "still down".to_string())
        }
    })
    .await;
    let healthy = common::start_fixed_backend(200, "ok").await;
    let endpoints = in_order(&[flaky.url(), healthy.url()]);
    let fetcher = fetcher();

    for _ in 0..3 {
        let res = fetcher.fetch(&endpoints, "/", &RequestOptions::get()).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(healthy.hits(), 3);
}

#[tokio::test]
async fn test_attempt_timeout_moves_to_next_endpoint() {
    let slow = common::start_programmable_backend(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, "too late".to_string())
    })
    .await;
    let fast = common::start_fixed_backend(200, "fast").await;
    let endpoints = in_order(&[slow.url(), fast.url()]);

    let fetcher = fetcher().with_attempt_timeout(Some(Duration::from_millis(200)));
    let res = fetcher.fetch(&endpoints, "/", &RequestOptions::get()).await.unwrap();
    assert_eq!(res.text().await.unwrap(), "fast");
}

#[tokio::test]
async fn test_deadline_bounds_whole_call() {
    let slow = || async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, "too late".to_string())
    };
    let a = common::start_programmable_backend(slow).await;
    let b = common::start_programmable_backend(slow).await;
    let endpoints = in_order(&[a.url(), b.url()]);

    let options = RequestOptions::get().with_deadline(Duration::from_millis(300));
    let started = std::time::Instant::now();
    let err = fetcher().fetch(&endpoints, "/", &options).await.unwrap_err();

    match err {
        FetchError::DeadlineExceeded { attempts, last, .. } => {
            assert_eq!(attempts, 1);
            assert!(matches!(last, Some(AttemptFailure::Timeout { ref endpoint, .. }) if *endpoint == a.url()));
        }
        other => panic!("expected deadline, got {other}"),
    }
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(b.hits(), 0);
}

#[tokio::test]
async fn test_deadline_on_last_endpoint_keeps_its_failure() {
    let first = common::start_fixed_backend(502, "bad gateway").await;
    let last = common::start_programmable_backend(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, "too late".to_string())
    })
    .await;
    let endpoints = in_order(&[first.url(), last.url()]);

    let options = RequestOptions::get().with_deadline(Duration::from_millis(300));
    let err = fetcher().fetch(&endpoints, "/", &options).await.unwrap_err();

    match err {
        FetchError::DeadlineExceeded { attempts, last: failure, .. } => {
            assert_eq!(attempts, 2);
            let failure = failure.expect("last attempt should be reported");
            assert_eq!(failure.endpoint(), last.url());
            assert!(matches!(failure, AttemptFailure::Timeout { .. }));
        }
        other => panic!("expected deadline, got {other}"),
    }
}

#[tokio::test]
async fn test_request_options_replayed_on_failover() {
    let first = common::start_fixed_backend(503, "busy").await;
    let second = common::start_fixed_backend(201, "created").await;
    let endpoints = in_order(&[first.url(), second.url()]);

    let options = RequestOptions::method(Method::POST)
        .with_json(&serde_json::json!({ "title": "home" }))
        .unwrap();
    let res = fetcher().fetch(&endpoints, "/pages", &options).await.unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(first.hits(), 1);
    assert_eq!(second.hits(), 1);

    // Both endpoints saw the same method, path and payload.
    let expected_body = serde_json::to_vec(&serde_json::json!({ "title": "home" })).unwrap();
    for backend in [&first, &second] {
        let received = backend.requests();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].method, "POST");
        assert_eq!(received[0].path, "/pages");
        assert_eq!(received[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(received[0].body, expected_body);
    }
}
