use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project shown in the portfolio.
///
/// Projects are listed newest first. The terminal shows `featured` projects
/// unless asked for all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Languages and frameworks, most significant first.
    pub tech_stack: Vec<String>,
    /// Source repository (e.g., `https://github.com/user/repo`).
    pub repo_url: Option<String>,
    /// Live deployment.
    pub demo_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}
