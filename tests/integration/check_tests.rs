//! End-to-end check runs against a mock site

use crate::fast_fetcher;
use reg_watch::config::{Source, SourceKind, StateStore, TomlStore, Version, WatchConfig};
use reg_watch::monitor::{add_page_source, check_updates, fingerprint};
use reg_watch::{CheckStatus, WatchError};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/transport/documents";
const ORIGINAL_PATH: &str = "/docs/2021/03/un-regulation-no-155-original";
const AMENDMENT_PATH: &str = "/docs/2023/07/standards/un-regulation-no-155-amend3";

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

async fn mount_site(server: &MockServer) {
    let listing = format!(
        r#"<html><body>
            <a href="{}">Original</a>
            <a href="{}">Amendment 3</a>
            <a href="/docs/2023/07/regulation-156">Other regulation</a>
        </body></html>"#,
        ORIGINAL_PATH, AMENDMENT_PATH
    );
    mount_page(server, LISTING_PATH, &listing).await;
    mount_page(
        server,
        ORIGINAL_PATH,
        "<html><body><nav>menu</nav><main>Original text</main></body></html>",
    )
    .await;
    mount_page(
        server,
        AMENDMENT_PATH,
        "<html><body><main>Amendment text <script>track()</script></main></body></html>",
    )
    .await;
}

fn listing_config(base: &str) -> WatchConfig {
    let mut config: WatchConfig = toml::from_str("").unwrap();
    config.sources.push(Source {
        name: "UN-R155".to_string(),
        kind: SourceKind::Listing,
        base_url: format!("{}{}", base, LISTING_PATH),
        selector: None,
        patterns: vec!["un-regulation-no-155".to_string()],
        versions: vec![Version::new(
            format!("{}{}", base, ORIGINAL_PATH),
            "original",
            Some("2021-03".to_string()),
        )],
    });
    config
}

#[tokio::test]
async fn test_full_check_run_with_discovery() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let base = mock_server.uri();

    let dir = tempdir().unwrap();
    let store = TomlStore::new(dir.path().join("config.toml"));
    let mut config = listing_config(&base);
    let fetcher = fast_fetcher();

    let results = check_updates(&fetcher, &store, &mut config).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.status == CheckStatus::FirstCheck));
    assert_eq!(results[1].url, format!("{}{}", base, AMENDMENT_PATH));
    assert_eq!(results[1].label, "new_version_2");
    assert_eq!(results[1].date.as_deref(), Some("2023-07"));

    let saved = store.load().unwrap();
    assert_eq!(saved, config);
    let versions = &saved.sources[0].versions;
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].fingerprint, fingerprint("Original text"));
    assert_eq!(versions[1].fingerprint, fingerprint("Amendment text"));
}

#[tokio::test]
async fn test_second_run_is_unchanged() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let dir = tempdir().unwrap();
    let store = TomlStore::new(dir.path().join("config.toml"));
    let mut config = listing_config(&mock_server.uri());
    let fetcher = fast_fetcher();

    check_updates(&fetcher, &store, &mut config).await.unwrap();
    let mut reloaded = store.load().unwrap();
    let results = check_updates(&fetcher, &store, &mut reloaded).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.status == CheckStatus::Unchanged));
    assert_eq!(reloaded, config);
}

#[tokio::test]
async fn test_content_change_detected_across_runs() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_page(
        &mock_server,
        ORIGINAL_PATH,
        "<html><body><main>Revised text</main></body></html>",
    )
    .await;

    let dir = tempdir().unwrap();
    let store = TomlStore::new(dir.path().join("config.toml"));
    let mut config = listing_config(&base);
    config.sources[0].versions[0].fingerprint = fingerprint("Original text");
    let fetcher = fast_fetcher();

    // The listing page is missing: discovery is skipped, checks still run
    let results = check_updates(&fetcher, &store, &mut config).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, CheckStatus::Changed);
    assert_eq!(
        store.load().unwrap().sources[0].versions[0].fingerprint,
        fingerprint("Revised text")
    );
}

#[tokio::test]
async fn test_unreachable_version_keeps_baseline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ORIGINAL_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let store = TomlStore::new(dir.path().join("config.toml"));
    let mut config = listing_config(&mock_server.uri());
    config.sources[0].versions[0].fingerprint = "abc123".to_string();
    let fetcher = fast_fetcher();

    let results = check_updates(&fetcher, &store, &mut config).await.unwrap();

    assert_eq!(results[0].status, CheckStatus::FetchFailed);
    assert_eq!(
        store.load().unwrap().sources[0].versions[0].fingerprint,
        "abc123"
    );
}

#[tokio::test]
async fn test_add_page_source_then_check() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/guideline",
        r#"<html><body><div id="body-text">Guideline</div><main>Landing</main></body></html>"#,
    )
    .await;
    let url = format!("{}/guideline", mock_server.uri());

    let dir = tempdir().unwrap();
    let store = TomlStore::new(dir.path().join("config.toml"));
    let mut config: WatchConfig = toml::from_str("").unwrap();
    let fetcher = fast_fetcher();

    add_page_source(&fetcher, &mut config, "Guideline", &url, "body-text")
        .await
        .unwrap();
    store.save(&config).unwrap();

    let mut reloaded = store.load().unwrap();
    let results = check_updates(&fetcher, &store, &mut reloaded).await.unwrap();

    // Checks always extract with the default hint, not the registered selector
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, CheckStatus::FirstCheck);
    assert_eq!(
        reloaded.sources[0].versions[0].fingerprint,
        fingerprint("Landing")
    );
}

#[tokio::test]
async fn test_add_page_source_rejects_selector_miss() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/empty", "<html><body><p>Nothing</p></body></html>").await;
    let url = format!("{}/empty", mock_server.uri());

    let mut config: WatchConfig = toml::from_str("").unwrap();
    let result = add_page_source(&fast_fetcher(), &mut config, "Empty", &url, "missing").await;

    assert!(matches!(result, Err(WatchError::SelectorMiss { .. })));
    assert!(config.sources.is_empty());
}
