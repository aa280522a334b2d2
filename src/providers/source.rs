use std::path::PathBuf;

use anyhow::{Context, Result};

use super::client::PortfolioClient;
use super::github::GitHubClient;
use crate::defaults;
use crate::models::{Certification, Project, Skill, TimelineEntry};

/// Where provider data comes from.
#[derive(Debug, Clone)]
pub enum Source {
    /// The folio HTTP API.
    Api(PortfolioClient),
    /// A GitHub account for projects and skills. Timeline is built in;
    /// certifications come from a JSON file when one is configured.
    GitHub {
        client: GitHubClient,
        certifications_path: Option<PathBuf>,
    },
}

impl Source {
    /// Prefix for cache keys, so switching sources never reads the other's data.
    pub fn cache_prefix(&self) -> String {
        match self {
            Self::Api(_) => "api".to_string(),
            Self::GitHub { client, .. } => format!("github-{}", client.user().to_lowercase()),
        }
    }

    pub async fn projects(&self) -> Result<Vec<Project>> {
        match self {
            Self::Api(client) => Ok(client.list_projects().await?),
            Self::GitHub { client, .. } => Ok(client.projects().await?),
        }
    }

    pub async fn skills(&self) -> Result<Vec<Skill>> {
        match self {
            Self::Api(client) => Ok(client.list_skills().await?),
            Self::GitHub { client, .. } => Ok(client.skills().await?),
        }
    }

    pub async fn timeline(&self) -> Result<Vec<TimelineEntry>> {
        match self {
            Self::Api(client) => Ok(client.list_experience().await?),
            Self::GitHub { .. } => Ok(defaults::fallback_timeline()),
        }
    }

    pub async fn certifications(&self) -> Result<Vec<Certification>> {
        match self {
            Self::Api(client) => Ok(client.list_certifications().await?),
            Self::GitHub {
                certifications_path: Some(path),
                ..
            } => read_certifications(path.clone()).await,
            Self::GitHub { .. } => Ok(defaults::fallback_certifications()),
        }
    }
}

async fn read_certifications(path: PathBuf) -> Result<Vec<Certification>> {
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
