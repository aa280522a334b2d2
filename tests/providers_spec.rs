use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use folio::api::{create_router, middleware::SecurityConfig};
use folio::db::Database;
use folio::defaults;
use folio::models::*;
use folio::providers::*;
use tempfile::TempDir;

/// Nothing listens on the discard port.
const DEAD_URL: &str = "http://127.0.0.1:9/api";

async fn spawn_api() -> String {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    db.seed_if_empty().expect("Failed to seed");
    let app = create_router(db, SecurityConfig::disabled());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });
    format!("http://{}/api", addr)
}

fn project(title: &str) -> Project {
    Project {
        id: 1,
        title: title.to_string(),
        description: String::new(),
        tech_stack: vec![],
        repo_url: None,
        demo_url: None,
        featured: true,
        created_at: Utc::now(),
    }
}

async fn wait_until_ready(providers: &Providers) {
    for _ in 0..200 {
        if providers.is_ready() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("providers never finished loading");
}

mod load {
    use super::*;

    #[tokio::test]
    async fn uses_fresh_cache_without_fetching() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path());
        cache.put("projects", &vec![project("Cached")]).unwrap();

        let fetched = AtomicBool::new(false);

        let (value, origin) = load(
            "projects",
            Some(&cache),
            DEFAULT_TTL,
            || async {
                fetched.store(true, Ordering::SeqCst);
                Ok(vec![])
            },
            defaults::fallback_projects,
        )
        .await;

        assert_eq!(origin, Origin::Cache);
        assert!(!fetched.load(Ordering::SeqCst));
        assert_eq!(value[0].title, "Cached");
    }

    #[tokio::test]
    async fn refetches_and_caches_when_stale() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path());
        let old = Utc::now() - chrono::Duration::hours(25);
        cache.put_at("projects", &vec![project("Old")], old).unwrap();

        let (value, origin) = load(
            "projects",
            Some(&cache),
            DEFAULT_TTL,
            || async { Ok(vec![project("New")]) },
            defaults::fallback_projects,
        )
        .await;

        assert_eq!(origin, Origin::Network);
        assert_eq!(value[0].title, "New");
        let stored: Cached<Vec<Project>> = cache.get("projects").unwrap().unwrap();
        assert_eq!(stored.value[0].title, "New");
        assert!(stored.stored_at > old);
    }

    #[tokio::test]
    async fn falls_back_to_stale_cache_when_fetch_fails() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path());
        let old = Utc::now() - chrono::Duration::days(3);
        cache.put_at("projects", &vec![project("Old")], old).unwrap();

        let (value, origin) = load(
            "projects",
            Some(&cache),
            DEFAULT_TTL,
            || async { Err(anyhow::anyhow!("rate limited")) },
            defaults::fallback_projects,
        )
        .await;

        assert_eq!(origin, Origin::StaleCache);
        assert_eq!(value[0].title, "Old");
    }

    #[tokio::test]
    async fn falls_back_to_defaults_without_cache() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path());

        let (value, origin) = load(
            "skills",
            Some(&cache),
            DEFAULT_TTL,
            || async { Err(anyhow::anyhow!("offline")) },
            defaults::fallback_skills,
        )
        .await;

        assert_eq!(origin, Origin::Defaults);
        assert_eq!(value, defaults::fallback_skills());
    }

    #[tokio::test]
    async fn treats_corrupt_cache_as_missing() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("skills.json"), "garbage").unwrap();
        let cache = DiskCache::new(tmp.path());

        let (_, origin) = load(
            "skills",
            Some(&cache),
            DEFAULT_TTL,
            || async { Err(anyhow::anyhow!("offline")) },
            defaults::fallback_skills,
        )
        .await;

        assert_eq!(origin, Origin::Defaults);
    }
}

mod client {
    use super::*;

    #[tokio::test]
    async fn reads_every_category_from_the_api() {
        let client = PortfolioClient::new(spawn_api().await);

        assert!(client.health().await.unwrap());
        assert_eq!(client.list_projects().await.unwrap().len(), 3);
        assert_eq!(client.list_skills().await.unwrap().len(), defaults::skills().len());
        assert_eq!(client.list_experience().await.unwrap()[0].order, 1);
        assert_eq!(
            client.list_certifications().await.unwrap()[0].name,
            "Cloud Practitioner"
        );
    }

    #[tokio::test]
    async fn maps_missing_project_to_not_found() {
        let client = PortfolioClient::new(spawn_api().await);

        let err = client.get_project(9999).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn maps_invalid_contact_to_bad_request() {
        let client = PortfolioClient::new(spawn_api().await);

        let ok = client
            .send_contact(&CreateMessageInput {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                message: "Hello".to_string(),
            })
            .await
            .unwrap();
        assert!(ok.success);

        let err = client
            .send_contact(&CreateMessageInput {
                name: "Ada".to_string(),
                email: "nope".to_string(),
                message: "Hello".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::BadRequest(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_an_http_error() {
        let client = PortfolioClient::new(DEAD_URL);
        assert!(matches!(
            client.list_projects().await.unwrap_err(),
            ClientError::Http(_)
        ));
    }
}

mod providers {
    use super::*;

    #[tokio::test]
    async fn loads_from_the_api_and_fills_the_cache() {
        let tmp = TempDir::new().unwrap();
        let source = Source::Api(PortfolioClient::new(spawn_api().await));

        let providers = Providers::spawn(source, Some(DiskCache::new(tmp.path())), DEFAULT_TTL);
        wait_until_ready(&providers).await;

        let projects = providers.projects().loaded().unwrap();
        assert_eq!(projects[0].title, "Hybrid Portfolio");
        assert!(tmp.path().join("api-projects.json").exists());
        assert!(tmp.path().join("api-certifications.json").exists());
    }

    #[tokio::test]
    async fn falls_back_to_defaults_when_the_api_is_down() {
        let source = Source::Api(PortfolioClient::new(DEAD_URL));

        let providers = Providers::spawn(source, None, DEFAULT_TTL);
        wait_until_ready(&providers).await;

        assert_eq!(
            providers.timeline().loaded(),
            Some(defaults::fallback_timeline())
        );
        assert_eq!(
            providers.projects().loaded(),
            Some(defaults::fallback_projects())
        );
    }

    #[tokio::test]
    async fn prefers_stale_cache_over_defaults() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path());
        let old = Utc::now() - chrono::Duration::days(2);
        cache
            .put_at("api-projects", &vec![project("From last week")], old)
            .unwrap();

        let source = Source::Api(PortfolioClient::new(DEAD_URL));
        let providers = Providers::spawn(source, Some(cache), DEFAULT_TTL);
        wait_until_ready(&providers).await;

        assert_eq!(
            providers.projects().loaded().unwrap()[0].title,
            "From last week"
        );
    }
}
