//! Retry behavior of the HTTP fetcher

use crate::fast_fetcher;
use reg_watch::monitor::{Fetch, FetchError, FetchResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FETCHER_TARGET: &str = "reg_watch::monitor::fetcher";

/// Counts WARN and ERROR events emitted by the fetcher
#[derive(Clone, Default)]
struct FetcherEventCounter {
    warnings: Arc<AtomicUsize>,
    errors: Arc<AtomicUsize>,
}

impl FetcherEventCounter {
    fn warnings(&self) -> usize {
        self.warnings.load(Ordering::SeqCst)
    }

    fn errors(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for FetcherEventCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target() != FETCHER_TARGET {
            return;
        }
        match *metadata.level() {
            Level::WARN => {
                self.warnings.fetch_add(1, Ordering::SeqCst);
            }
            Level::ERROR => {
                self.errors.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }
    }
}

/// Installs a counter as this thread's subscriber until the guard drops
///
/// `#[tokio::test]` runs on a current-thread runtime, so every fetch in the
/// test reports to it.
fn count_fetcher_events() -> (FetcherEventCounter, tracing::subscriber::DefaultGuard) {
    let counter = FetcherEventCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (counter, guard)
}

#[tokio::test]
async fn test_success_on_first_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept-language"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<main>Hello</main>", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = fast_fetcher()
        .fetch(&format!("{}/page", mock_server.uri()))
        .await;

    match result {
        FetchResult::Success {
            status_code,
            content_type,
            body,
            attempts,
        } => {
            assert_eq!(status_code, 200);
            assert!(content_type.starts_with("text/html"));
            assert_eq!(body, "<main>Hello</main>");
            assert_eq!(attempts, 1);
        }
        other => panic!("Expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fail_twice_then_succeed() {
    let mock_server = MockServer::start().await;

    // Mounted first, so it answers the first two requests
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&mock_server)
        .await;

    let result = fast_fetcher()
        .fetch(&format!("{}/flaky", mock_server.uri()))
        .await;

    assert!(result.is_success());
    assert_eq!(result.attempts(), 3);
    assert_eq!(result.retries(), 2);
    assert_eq!(result.into_body().unwrap(), "recovered");
}

#[tokio::test]
async fn test_always_failing_stops_after_three_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let result = fast_fetcher()
        .fetch(&format!("{}/down", mock_server.uri()))
        .await;

    assert!(!result.is_success());
    assert_eq!(result.attempts(), 3);
    assert_eq!(result.into_body(), Err(FetchError::Status(503)));
}

#[tokio::test]
async fn test_not_found_reported_as_status() {
    let mock_server = MockServer::start().await;

    let result = fast_fetcher()
        .fetch(&format!("{}/missing", mock_server.uri()))
        .await;

    match result {
        FetchResult::Failed { error, attempts } => {
            assert_eq!(error, FetchError::Status(404));
            assert_eq!(attempts, 3);
        }
        other => panic!("Expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fail_twice_then_succeed_logs_two_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&mock_server)
        .await;

    let (counter, _guard) = count_fetcher_events();
    let result = fast_fetcher()
        .fetch(&format!("{}/flaky", mock_server.uri()))
        .await;

    assert!(result.is_success());
    assert_eq!(counter.warnings(), 2);
    assert_eq!(counter.errors(), 0);
}

#[tokio::test]
async fn test_always_failing_logs_retries_and_final_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let (counter, _guard) = count_fetcher_events();
    let result = fast_fetcher()
        .fetch(&format!("{}/down", mock_server.uri()))
        .await;

    assert!(!result.is_success());
    assert_eq!(counter.warnings(), 2);
    assert_eq!(counter.errors(), 1);
}
