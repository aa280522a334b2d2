use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::db::Database;
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn bad_request(err: ValidationError) -> Response {
    tracing::warn!("Validation error on {}: {}", err.field, err.message);
    (StatusCode::BAD_REQUEST, Json(err)).into_response()
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Content
// ============================================================

pub async fn list_projects(
    State(db): State<Database>,
) -> Result<Json<Vec<Project>>, (StatusCode, String)> {
    db.get_all_projects().map(Json).map_err(internal_error)
}

pub async fn get_project(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Project>, (StatusCode, String)> {
    db.get_project(id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Project not found".to_string()))
}

pub async fn list_skills(
    State(db): State<Database>,
) -> Result<Json<Vec<Skill>>, (StatusCode, String)> {
    db.get_all_skills().map(Json).map_err(internal_error)
}

pub async fn list_experience(
    State(db): State<Database>,
) -> Result<Json<Vec<TimelineEntry>>, (StatusCode, String)> {
    db.get_timeline().map(Json).map_err(internal_error)
}

pub async fn list_certifications(
    State(db): State<Database>,
) -> Result<Json<Vec<Certification>>, (StatusCode, String)> {
    db.get_certifications().map(Json).map_err(internal_error)
}

// ============================================================
// Contact
// ============================================================

pub async fn create_contact(
    State(db): State<Database>,
    payload: Result<Json<CreateMessageInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return bad_request(ValidationError::new("body", &rejection.body_text())),
    };

    if let Err(err) = input.validate() {
        return bad_request(err);
    }

    match db.create_message(input) {
        Ok(message) => {
            tracing::info!("Stored contact message {} from {}", message.id, message.email);
            (
                StatusCode::CREATED,
                Json(ContactResponse {
                    success: true,
                    message: "Message sent successfully".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => internal_error(e).into_response(),
    }
}
