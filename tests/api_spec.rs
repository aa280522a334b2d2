use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use folio::api::create_router;
use folio::api::middleware::SecurityConfig;
use folio::db::Database;
use folio::models::*;
use serde_json::json;

fn setup_with(security: SecurityConfig) -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    db.seed_if_empty().expect("Failed to seed");
    let app = create_router(db, security);
    TestServer::new(app).expect("Failed to create test server")
}

fn setup() -> TestServer {
    setup_with(SecurityConfig::disabled())
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();

        let response = server.get("/api/health").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }
}

mod projects {
    use super::*;

    #[tokio::test]
    async fn lists_seeded_projects_newest_first() {
        let server = setup();

        let response = server.get("/api/projects").await;

        response.assert_status_ok();
        let projects: Vec<Project> = response.json();
        let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Hybrid Portfolio", "E-Commerce Dashboard", "DevTools CLI"]
        );
        assert_eq!(projects[0].tech_stack, vec!["Rust", "Axum", "SQLite", "Tokio"]);
    }

    #[tokio::test]
    async fn uses_camel_case_field_names() {
        let server = setup();

        let body: serde_json::Value = server.get("/api/projects").await.json();

        let mut keys: Vec<_> = body[0]
            .as_object()
            .expect("project should be an object")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "createdAt",
                "demoUrl",
                "description",
                "featured",
                "id",
                "repoUrl",
                "techStack",
                "title"
            ]
        );
    }

    #[tokio::test]
    async fn gets_a_project_by_id() {
        let server = setup();
        let projects: Vec<Project> = server.get("/api/projects").await.json();

        let response = server
            .get(&format!("/api/projects/{}", projects[1].id))
            .await;

        response.assert_status_ok();
        let project: Project = response.json();
        assert_eq!(project, projects[1]);
    }

    #[tokio::test]
    async fn returns_404_for_unknown_project() {
        let server = setup();

        let response = server.get("/api/projects/9999").await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_text("Project not found");
    }

    #[tokio::test]
    async fn rejects_non_numeric_ids() {
        let server = setup();

        let response = server.get("/api/projects/abc").await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

mod skills {
    use super::*;

    #[tokio::test]
    async fn lists_skills_by_category_then_name() {
        let server = setup();

        let skills: Vec<Skill> = server.get("/api/skills").await.json();

        let pairs: Vec<_> = skills
            .iter()
            .map(|s| (s.category.as_str(), s.name.as_str()))
            .collect();
        let mut sorted = pairs.clone();
        sorted.sort();
        assert_eq!(pairs, sorted);
        assert_eq!(pairs[0], ("Backend", "Node.js"));
    }
}

mod experience {
    use super::*;

    #[tokio::test]
    async fn lists_entries_by_order() {
        let server = setup();

        let entries: Vec<TimelineEntry> = server.get("/api/experience").await.json();

        let orders: Vec<_> = entries.iter().map(|e| e.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(entries[0].company, "TechCorp Inc.");
    }
}

mod certifications {
    use super::*;

    #[tokio::test]
    async fn lists_certifications_in_insertion_order() {
        let server = setup();

        let certs: Vec<Certification> = server.get("/api/certifications").await.json();

        assert_eq!(certs[0].name, "Cloud Practitioner");
        assert_eq!(certs[0].expiry_date.as_deref(), Some("Mar 2027"));
    }
}

mod contact {
    use super::*;

    #[tokio::test]
    async fn accepts_a_valid_message() {
        let server = setup();

        let response = server
            .post("/api/contact")
            .json(&json!({
                "name": "Ada",
                "email": "ada@example.com",
                "message": "Hello there"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ContactResponse = response.json();
        assert!(body.success);
        assert_eq!(body.message, "Message sent successfully");
    }

    #[tokio::test]
    async fn reports_the_invalid_field() {
        let server = setup();

        let response = server
            .post("/api/contact")
            .json(&json!({
                "name": "Ada",
                "email": "not-an-email",
                "message": "Hello there"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let err: ValidationError = response.json();
        assert_eq!(err.field, "email");
    }

    #[tokio::test]
    async fn treats_missing_fields_as_empty() {
        let server = setup();

        let response = server.post("/api/contact").json(&json!({})).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let err: ValidationError = response.json();
        assert_eq!(err.field, "name");
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let server = setup();

        let response = server
            .post("/api/contact")
            .text("{ not json")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let err: ValidationError = response.json();
        assert_eq!(err.field, "body");
    }

    #[tokio::test]
    async fn rate_limits_repeated_submissions() {
        let server = setup_with(SecurityConfig::with_rate_limit(2));
        let body = json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "Hello there"
        });

        for _ in 0..2 {
            server
                .post("/api/contact")
                .json(&body)
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.post("/api/contact").json(&body).await;
        response.assert_status(StatusCode::TOO_MANY_REQUESTS);

        // Content endpoints are not limited.
        server.get("/api/projects").await.assert_status_ok();
    }

    fn forwarded_for(i: u32) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_str(&format!("10.0.0.{i}")).unwrap(),
        )
    }

    #[tokio::test]
    async fn ignores_client_supplied_forwarding_headers() {
        let server = setup_with(SecurityConfig::with_rate_limit(1));
        let body = json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "Hello there"
        });

        let mut created = 0;
        for i in 0..20 {
            let (name, value) = forwarded_for(i);
            let response = server
                .post("/api/contact")
                .add_header(name, value)
                .json(&body)
                .await;
            if response.status_code() == StatusCode::CREATED {
                created += 1;
            } else {
                response.assert_status(StatusCode::TOO_MANY_REQUESTS);
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn limits_per_forwarded_client_behind_a_proxy() {
        let server = setup_with(SecurityConfig::with_rate_limit(1).behind_proxy());
        let body = json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "Hello there"
        });

        for i in 0..3 {
            let (name, value) = forwarded_for(i);
            server
                .post("/api/contact")
                .add_header(name, value)
                .json(&body)
                .await
                .assert_status(StatusCode::CREATED);
        }

        let (name, value) = forwarded_for(0);
        server
            .post("/api/contact")
            .add_header(name, value)
            .json(&body)
            .await
            .assert_status(StatusCode::TOO_MANY_REQUESTS);
    }
}
