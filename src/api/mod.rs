mod handlers;
pub mod middleware;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;
use middleware::SecurityConfig;

pub fn create_router(db: Database, security: SecurityConfig) -> Router {
    let mut contact = Router::new().route("/contact", post(handlers::create_contact));
    if let Some(limiter) = security.rate_limiter.clone() {
        contact = contact.route_layer(axum::middleware::from_fn_with_state(
            (limiter, security.trust_proxy),
            middleware::rate_limit_middleware,
        ));
    }

    let api = Router::new()
        // Projects
        .route("/projects", get(handlers::list_projects))
        .route("/projects/{id}", get(handlers::get_project))
        // Skills
        .route("/skills", get(handlers::list_skills))
        // Experience timeline
        .route("/experience", get(handlers::list_experience))
        // Certifications
        .route("/certifications", get(handlers::list_certifications))
        // Health
        .route("/health", get(handlers::health))
        .merge(contact);

    Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&security)),
        )
        .with_state(db)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let Some(origins) = &security.cors_origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
