//! HTTP client for the folio content API.
//!
//! Configuration is via environment variables:
//! - `FOLIO_API_URL` - Base URL (default: `http://127.0.0.1:3000/api`)

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::*;

/// Default URL for local development.
pub const DEFAULT_URL: &str = "http://127.0.0.1:3000/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited, try again later")]
    RateLimited,

    #[error("Server error: {0}")]
    Server(String),
}

/// HTTP client for the folio API.
#[derive(Debug, Clone)]
pub struct PortfolioClient {
    base_url: String,
    client: Client,
}

impl PortfolioClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        let base_url = std::env::var("FOLIO_API_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        Self::new(base_url)
    }

    /// Create with an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
                StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
                StatusCode::TOO_MANY_REQUESTS => Err(ClientError::RateLimited),
                _ => Err(ClientError::Server(format!("{}: {}", status, body))),
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.request(reqwest::Method::GET, path).send().await?;
        self.handle_response(response).await
    }

    // ============================================================
    // Content
    // ============================================================

    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.get("/projects").await
    }

    pub async fn get_project(&self, id: i64) -> Result<Project, ClientError> {
        self.get(&format!("/projects/{}", id)).await
    }

    pub async fn list_skills(&self) -> Result<Vec<Skill>, ClientError> {
        self.get("/skills").await
    }

    pub async fn list_experience(&self) -> Result<Vec<TimelineEntry>, ClientError> {
        self.get("/experience").await
    }

    pub async fn list_certifications(&self) -> Result<Vec<Certification>, ClientError> {
        self.get("/certifications").await
    }

    // ============================================================
    // Contact
    // ============================================================

    /// Submit a contact-form message.
    pub async fn send_contact(
        &self,
        input: &CreateMessageInput,
    ) -> Result<ContactResponse, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/contact")
            .json(input)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Returns true if the server answered the health check.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let response = self.request(reqwest::Method::GET, "/health").send().await?;
        Ok(response.status().is_success())
    }
}

impl Default for PortfolioClient {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}
