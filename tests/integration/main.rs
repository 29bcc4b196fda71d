//! Integration tests for offline-bundle

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn offline_bundle() -> Command {
        let mut cmd = cargo_bin_cmd!("offline-bundle");
        cmd.env_remove("OFFLINE_BUNDLE_SCOPE")
            .env_remove("OFFLINE_BUNDLE_CONFIG");
        cmd
    }

    /// Config file pointing the store at a temp directory
    fn temp_config(temp: &TempDir) -> std::path::PathBuf {
        let path = temp.path().join("config.toml");
        let store = temp.path().join("store");
        std::fs::write(
            &path,
            format!("[store]\ndir = {:?}\n", store.display().to_string()),
        )
        .unwrap();
        path
    }

    #[test]
    fn help_displays() {
        offline_bundle()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("versioned offline caches"));
    }

    #[test]
    fn version_displays() {
        offline_bundle()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("offline-bundle"));
    }

    #[test]
    fn config_path_uses_flag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        offline_bundle()
            .args(["config", "path", "--config"])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml"));
    }

    #[test]
    fn config_init_writes_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        offline_bundle()
            .args(["config", "init", "--config"])
            .arg(&path)
            .assert()
            .success();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[deployment]"));
        assert!(content.contains("grace_period_ms = 1000"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        offline_bundle()
            .args(["config", "show", "--config"])
            .arg(temp_config(&temp))
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"));
    }

    #[test]
    fn list_empty_store() {
        let temp = TempDir::new().unwrap();
        offline_bundle()
            .args(["list", "--scope", "https://example.com/", "--config"])
            .arg(temp_config(&temp))
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached versions"));
    }

    #[test]
    fn list_empty_store_json() {
        let temp = TempDir::new().unwrap();
        offline_bundle()
            .args(["list", "--format", "json", "--scope", "https://example.com/"])
            .arg("--config")
            .arg(temp_config(&temp))
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn missing_scope_fails_with_hint() {
        let temp = TempDir::new().unwrap();
        offline_bundle()
            .args(["prune", "--config"])
            .arg(temp_config(&temp))
            .assert()
            .failure()
            .stderr(predicate::str::contains("No deployment scope configured"))
            .stderr(predicate::str::contains("--scope"));
    }

    #[test]
    fn unreachable_manifest_suggests_retry() {
        let temp = TempDir::new().unwrap();
        offline_bundle()
            .args(["update", "--scope", "http://127.0.0.1:9/app/", "--config"])
            .arg(temp_config(&temp))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to fetch manifest"))
            .stderr(predicate::str::contains("Retry:"));
    }

    #[test]
    fn invalid_scope_fails() {
        let temp = TempDir::new().unwrap();
        offline_bundle()
            .args(["list", "--scope", "not a url", "--config"])
            .arg(temp_config(&temp))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid deployment scope"));
    }
}

mod lifecycle_tests {
    use offline_bundle::config::Config;
    use offline_bundle::factory::OfflineBundle;
    use offline_bundle::fetch::{CacheMode, Fetcher, StubFetcher};
    use offline_bundle::router::{Request, Source};
    use offline_bundle::scope::Scope;
    use offline_bundle::session::KnownClients;
    use offline_bundle::store::{CacheStore, DiskStore, MemoryStore};
    use offline_bundle::update::UpdateStatus;
    use std::sync::Arc;

    const SCOPE: &str = "https://example.com/";
    const MANIFEST: &str = "https://example.com/offline.js";
    const A_JS: &str = "https://example.com/a.js";
    const B_CSS: &str = "https://example.com/b.css";

    fn config() -> Config {
        let mut config = Config::default();
        config.build.grace_period_ms = 0;
        config
    }

    fn bundle(store: Arc<dyn CacheStore>, stub: Arc<StubFetcher>) -> OfflineBundle {
        let fetcher: Arc<dyn Fetcher> = stub;
        OfflineBundle::assemble(Scope::parse(SCOPE).unwrap(), store, fetcher, &config())
    }

    fn serve_v(stub: &StubFetcher, version: u64) {
        stub.manifest(MANIFEST, version, &["a.js", "b.css"]);
        stub.respond(A_JS, 200, format!("a v{version}"));
        stub.respond(B_CSS, 200, format!("b v{version}"));
    }

    fn cache_name(version: u64) -> String {
        format!("offline-{SCOPE}-v{version}")
    }

    #[tokio::test]
    async fn activation_builds_and_serves_version() {
        let store = Arc::new(MemoryStore::new());
        let stub = Arc::new(StubFetcher::new());
        serve_v(&stub, 5);
        let bundle = bundle(store.clone(), stub.clone());

        let cache = bundle.updater.activate(&KnownClients::none()).await.unwrap();
        assert_eq!(cache.version(), 5);
        assert_eq!(store.keys().await.unwrap(), vec![cache_name(5)]);

        let served = bundle
            .router
            .handle(&Request::sub_resource(A_JS, "tab-1"))
            .await
            .unwrap();
        assert_eq!(served.response.body, b"a v5");
        assert!(matches!(served.source, Source::Cache(ref k) if k.version == 5));

        // First load goes through the HTTP cache, the manifest never does
        let modes = stub.requests();
        assert!(modes
            .iter()
            .any(|(url, mode)| url.starts_with(MANIFEST) && *mode == CacheMode::NoStore));
        assert!(modes
            .iter()
            .any(|(url, mode)| url == A_JS && *mode == CacheMode::Default));
    }

    #[tokio::test]
    async fn failed_file_publishes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let stub = Arc::new(StubFetcher::new());
        serve_v(&stub, 5);
        stub.respond(B_CSS, 500, "boom");
        let bundle = bundle(store.clone(), stub.clone());

        assert!(bundle.updater.activate(&KnownClients::none()).await.is_none());
        assert!(store.keys().await.unwrap().is_empty());

        // Sessions fall through to the network
        let served = bundle
            .router
            .handle(&Request::sub_resource(A_JS, "tab-1"))
            .await
            .unwrap();
        assert_eq!(served.source, Source::Network);
    }

    #[tokio::test]
    async fn main_page_is_cached_on_activation() {
        let store = Arc::new(MemoryStore::new());
        let stub = Arc::new(StubFetcher::new());
        serve_v(&stub, 1);
        stub.respond("https://example.com/index.html", 200, "home");
        let bundle = bundle(store, stub);

        let clients = KnownClients::new(vec!["https://example.com/index.html".to_string()]);
        let cache = bundle.updater.activate(&clients).await.unwrap();

        let mut entries = cache.handle().entries().await.unwrap();
        entries.sort();
        assert_eq!(
            entries,
            vec![
                A_JS.to_string(),
                B_CSS.to_string(),
                "https://example.com/index.html".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn session_stays_pinned_across_update() {
        let store = Arc::new(MemoryStore::new());
        let stub = Arc::new(StubFetcher::new());
        serve_v(&stub, 1);
        stub.respond(SCOPE, 200, "home");
        let bundle = bundle(store, stub.clone());
        bundle.updater.activate(&KnownClients::none()).await.unwrap();

        let before = bundle
            .router
            .handle(&Request::sub_resource(A_JS, "old-tab"))
            .await
            .unwrap();
        assert_eq!(before.response.body, b"a v1");

        serve_v(&stub, 2);
        assert_eq!(
            bundle.updater.check_for_update(SCOPE).await,
            UpdateStatus::Updated(2)
        );

        let pinned = bundle
            .router
            .handle(&Request::sub_resource(A_JS, "old-tab"))
            .await
            .unwrap();
        assert_eq!(pinned.response.body, b"a v1");

        let fresh = bundle
            .router
            .handle(&Request::sub_resource(A_JS, "new-tab"))
            .await
            .unwrap();
        assert_eq!(fresh.response.body, b"a v2");
    }

    #[tokio::test]
    async fn newest_version_wins_regardless_of_build_order() {
        let store = Arc::new(MemoryStore::new());
        let stub = Arc::new(StubFetcher::new());
        stub.respond(SCOPE, 200, "home");
        let bundle = bundle(store.clone(), stub.clone());

        for version in [1, 3, 2] {
            serve_v(&stub, version);
            assert_eq!(
                bundle.updater.check_for_update(SCOPE).await,
                UpdateStatus::Updated(version)
            );
        }

        let served = bundle
            .router
            .handle(&Request::sub_resource(B_CSS, "tab"))
            .await
            .unwrap();
        assert_eq!(served.response.body, b"b v3");

        let newest = bundle.gc.prune_to_newest().await.unwrap().unwrap();
        assert_eq!(newest.version(), 3);
        assert_eq!(store.keys().await.unwrap(), vec![cache_name(3)]);
    }

    #[tokio::test]
    async fn repeated_update_check_fetches_nothing() {
        let store = Arc::new(MemoryStore::new());
        let stub = Arc::new(StubFetcher::new());
        serve_v(&stub, 4);
        stub.respond(SCOPE, 200, "home");
        let bundle = bundle(store.clone(), stub.clone());

        assert_eq!(
            bundle.updater.check_for_update(SCOPE).await,
            UpdateStatus::Updated(4)
        );
        stub.reset_requests();

        assert_eq!(
            bundle.updater.check_for_update(SCOPE).await,
            UpdateStatus::UpToDate(4)
        );
        assert_eq!(stub.count(MANIFEST), 1);
        assert_eq!(stub.count(A_JS), 0);
        assert_eq!(stub.count(B_CSS), 0);
        assert_eq!(store.keys().await.unwrap(), vec![cache_name(4)]);
    }

    #[tokio::test]
    async fn navigation_prunes_and_updates_in_background() {
        let store = Arc::new(MemoryStore::new());
        let stub = Arc::new(StubFetcher::new());
        stub.respond(SCOPE, 200, "home");
        let bundle = bundle(store.clone(), stub.clone());

        serve_v(&stub, 1);
        bundle.updater.check_for_update(SCOPE).await;
        serve_v(&stub, 2);
        bundle.updater.check_for_update(SCOPE).await;
        serve_v(&stub, 3);

        let served = bundle.router.handle(&Request::navigate(SCOPE)).await.unwrap();
        assert!(matches!(served.source, Source::Cache(ref k) if k.version == 2));

        let status = served.update_check.unwrap().await.unwrap();
        assert_eq!(status, UpdateStatus::Updated(3));
        assert_eq!(
            store.keys().await.unwrap(),
            vec![cache_name(2), cache_name(3)]
        );
    }

    #[tokio::test]
    async fn disk_store_survives_restart() {
        let temp = tempfile::TempDir::new().unwrap();
        let stub = Arc::new(StubFetcher::new());
        serve_v(&stub, 7);

        {
            let store: Arc<dyn CacheStore> = Arc::new(DiskStore::new(temp.path()));
            let bundle = bundle(store, stub.clone());
            bundle.updater.activate(&KnownClients::none()).await.unwrap();
        }

        // Network is gone after the restart
        stub.fail(A_JS, "offline");
        let store: Arc<dyn CacheStore> = Arc::new(DiskStore::new(temp.path()));
        let bundle = bundle(store, stub);

        let served = bundle
            .router
            .handle(&Request::sub_resource(A_JS, "tab"))
            .await
            .unwrap();
        assert_eq!(served.response.body, b"a v7");
        assert!(matches!(served.source, Source::Cache(ref k) if k.version == 7));
    }
}

mod http_tests {
    use offline_bundle::config::Config;
    use offline_bundle::factory::OfflineBundle;
    use offline_bundle::fetch::{CacheMode, FetchOptions, Fetcher, HttpFetcher};
    use offline_bundle::router::{Request, Source};
    use offline_bundle::scope::Scope;
    use offline_bundle::session::KnownClients;
    use offline_bundle::store::{CacheStore, MemoryStore};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn http_fetcher() -> Arc<HttpFetcher> {
        Arc::new(HttpFetcher::new(Duration::from_secs(5)))
    }

    #[tokio::test]
    async fn error_status_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.js"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&server)
            .await;

        let response = http_fetcher()
            .fetch(&format!("{}/missing.js", server.uri()), FetchOptions::default())
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_ok());
        assert_eq!(response.body, b"nope");
    }

    #[tokio::test]
    async fn reload_sends_no_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.js"))
            .and(header("cache-control", "no-cache"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fresh"))
            .expect(1)
            .mount(&server)
            .await;

        let response = http_fetcher()
            .fetch(
                &format!("{}/a.js", server.uri()),
                FetchOptions::with_cache(CacheMode::Reload),
            )
            .await
            .unwrap();

        assert!(response.is_ok());
        assert_eq!(response.body, b"fresh");
    }

    #[tokio::test]
    async fn install_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app/offline.js"))
            .and(header("cache-control", "no-store"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"version": 9, "files": ["app.js", "style.css"]}"#),
            )
            .expect(1)
            .mount(&server)
            .await;
        for (file, body) in [("/app/app.js", "js"), ("/app/style.css", "css")] {
            Mock::given(method("GET"))
                .and(path(file))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .expect(1)
                .mount(&server)
                .await;
        }

        let mut config = Config::default();
        config.build.grace_period_ms = 0;
        let scope = Scope::parse(&format!("{}/app/", server.uri())).unwrap();
        let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
        let fetcher: Arc<dyn Fetcher> = http_fetcher();
        let bundle = OfflineBundle::assemble(scope, store, fetcher, &config);

        let cache = bundle.updater.activate(&KnownClients::none()).await.unwrap();
        assert_eq!(cache.version(), 9);

        // Served from the cache; the mock expectations fail on a second fetch
        let served = bundle
            .router
            .handle(&Request::sub_resource(
                format!("{}/app/style.css", server.uri()),
                "tab",
            ))
            .await
            .unwrap();
        assert_eq!(served.response.body, b"css");
        assert!(matches!(served.source, Source::Cache(_)));
    }

    #[tokio::test]
    async fn large_files_are_cached() {
        const SIZE: usize = 11 * 1024 * 1024;
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app/offline.js"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"version": 1, "files": ["big.wasm"]}"#),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/app/big.wasm"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; SIZE]))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.build.grace_period_ms = 0;
        let scope = Scope::parse(&format!("{}/app/", server.uri())).unwrap();
        let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
        let fetcher: Arc<dyn Fetcher> = http_fetcher();
        let bundle = OfflineBundle::assemble(scope, store.clone(), fetcher, &config);

        let cache = bundle.updater.try_activate(&KnownClients::none()).await.unwrap();
        assert_eq!(cache.version(), 1);

        let wasm = cache
            .lookup(&format!("{}/app/big.wasm", server.uri()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(wasm.body.len(), SIZE);
        assert_eq!(store.keys().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn body_over_limit_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/huge.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 4096]))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).with_body_limit(1024);
        let result = fetcher
            .fetch(&format!("{}/huge.bin", server.uri()), FetchOptions::default())
            .await;

        assert!(result.is_err());
    }
}
