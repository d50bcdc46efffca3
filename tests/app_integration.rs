use aurum::core::{PurityTier, RateSource, SystemClock};
use aurum::providers::BackendRateSource;
use aurum::rate_cache::{CachePolicy, CacheStatus, RateCache};
use aurum::store::{MemorySnapshotStore, SnapshotStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const RATES_JSON: &str = r#"{
        "rates": {"24k": 6500, "22k": 5950, "18k": 4875, "14k": 3790},
        "updated_at": "2026-10-15T06:30:00Z"
    }"#;

    pub const REFRESH_JSON: &str = r#"{
        "rates": {"24k": 6600, "22k": 6050, "18k": 4950, "14k": 3850},
        "updated_at": "2026-10-15T07:00:00Z",
        "price_update": {
            "success": true,
            "updated_count": 120,
            "error_count": 2,
            "skipped_count": 8,
            "errors": ["ring-7: missing weight", {"product_id": "chain-3", "error": "no purity"}]
        }
    }"#;

    pub async fn mount(
        server: &MockServer,
        http_method: &str,
        url_path: &str,
        body: &str,
        status: u16,
    ) {
        Mock::given(method(http_method))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    pub async fn create_rates_server() -> MockServer {
        let server = MockServer::start().await;
        mount(&server, "GET", "/api/gold-rates", RATES_JSON, 200).await;
        mount(&server, "POST", "/api/gold-rates/refresh", REFRESH_JSON, 200).await;
        server
    }

    pub async fn create_failing_server() -> MockServer {
        let server = MockServer::start().await;
        mount(&server, "GET", "/api/gold-rates", "Service Unavailable", 503).await;
        mount(&server, "POST", "/api/gold-rates/refresh", "Service Unavailable", 503).await;
        server
    }

    pub fn write_config(dir: &std::path::Path, base_url: &str) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let config_content = format!(
            r#"
            api:
              base_url: {}
              token: "admin-token"
            data_path: "{}"
            "#,
            base_url,
            dir.join("data").display()
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_with_mock() {
    let mock_server = test_utils::create_rates_server().await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let result = aurum::run_command(
        aurum::AppCommand::Rates {
            force: false,
            persist: true,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
    assert!(temp_dir.path().join("data").join("cache").exists());
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_survives_backend_outage() {
    let mock_server = test_utils::create_failing_server().await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let result = aurum::run_command(
        aurum::AppCommand::Rates {
            force: true,
            persist: false,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Passive read should not fail: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_refresh_flow_with_mock() {
    let mock_server = test_utils::create_rates_server().await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let result = aurum::run_command(
        aurum::AppCommand::Refresh,
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );

    let requests = mock_server.received_requests().await.unwrap();
    let refresh = requests
        .iter()
        .find(|r| r.url.path() == "/api/gold-rates/refresh")
        .expect("refresh endpoint was not called");
    assert_eq!(
        refresh
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer admin-token")
    );
}

#[test_log::test(tokio::test)]
async fn test_refresh_flow_reports_failure() {
    let mock_server = test_utils::create_failing_server().await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let result = aurum::run_command(
        aurum::AppCommand::Refresh,
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("refresh against a failing backend should fail");
    assert_eq!(err.to_string(), "Failed to refresh gold rates");
    assert!(format!("{err:#}").contains("503"));
}

#[test_log::test(tokio::test)]
async fn test_quote_and_watch_flows_with_mock() {
    let mock_server = test_utils::create_rates_server().await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());
    let config_path = config_path.to_str().unwrap();

    let result = aurum::run_command(
        aurum::AppCommand::Quote {
            tier: PurityTier::K22,
            grams: 12.5,
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "Quote failed with: {:?}", result.err());

    let result = aurum::run_command(
        aurum::AppCommand::Watch {
            every: Duration::from_millis(10),
            count: Some(2),
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "Watch failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("nope.yaml");

    let result = aurum::run_command(
        aurum::AppCommand::Refresh,
        Some(missing.to_str().unwrap()),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_out_of_range_cache_config_is_an_error() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        "cache:\n  offline_max_age_days: 1000000000000\n",
    )
    .expect("Failed to write config file");

    let result = aurum::run_command(
        aurum::AppCommand::Rates {
            force: false,
            persist: false,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("an out of range cache window should be rejected");
    assert!(err.to_string().contains("offline_max_age_days"), "{err}");
}

#[test_log::test(tokio::test)]
async fn test_cache_degrades_through_fallback_tiers() {
    let mock_server = test_utils::create_rates_server().await;
    let config = aurum::core::config::ApiConfig {
        base_url: mock_server.uri(),
        token: None,
    };
    let source: Arc<dyn RateSource> = Arc::new(BackendRateSource::new(&config).unwrap());
    let store = Arc::new(MemorySnapshotStore::new());

    let cache = RateCache::new(
        Arc::clone(&source),
        store.clone(),
        Arc::new(SystemClock),
        CachePolicy::default(),
    );
    let fresh = cache.get(false).await;
    info!(?fresh, "Fetched fresh rates");
    assert_eq!(fresh.rates.get(PurityTier::K24), 6500.0);
    assert!(fresh.fetch_error.is_none());
    assert!(store.load().await.unwrap().is_some());

    // Backend goes down: the in-memory snapshot is served with an advisory
    mock_server.reset().await;
    test_utils::mount(
        &mock_server,
        "GET",
        "/api/gold-rates",
        "Service Unavailable",
        503,
    )
    .await;
    let stale = cache.get(false).await;
    assert_eq!(stale.rates, fresh.rates);
    assert!(stale.fetch_error.is_some());
    assert_eq!(cache.status().await, CacheStatus::StaleWithError);

    // A new process has no memory snapshot and falls back to storage
    let restarted = RateCache::new(
        source,
        store.clone(),
        Arc::new(SystemClock),
        CachePolicy::default(),
    );
    let offline = restarted.get(false).await;
    assert_eq!(offline.rates, fresh.rates);
    assert!(
        offline
            .fetch_error
            .as_deref()
            .is_some_and(|m| m.contains("offline rates")),
        "{offline:?}"
    );
    assert_eq!(restarted.status().await, CacheStatus::FallbackWithError);

    // Without storage only the zero sentinel is left
    let empty = RateCache::new(
        Arc::new(BackendRateSource::new(&config).unwrap()),
        Arc::new(MemorySnapshotStore::new()),
        Arc::new(SystemClock),
        CachePolicy::default(),
    );
    let sentinel = empty.get(false).await;
    assert!(sentinel.rates.is_zero());
    assert_eq!(empty.status().await, CacheStatus::ErrorSentinel);

    let stored = store.load().await.unwrap().unwrap();
    assert_eq!(stored.rates, fresh.rates);
}
