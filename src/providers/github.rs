//! Projects and skills derived from a GitHub account's public repositories.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tokio::task::JoinSet;

use super::client::ClientError;
use crate::models::{Project, Skill};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// The subset of the repository listing we read.
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    base_url: String,
    user: String,
    client: Client,
}

impl GitHubClient {
    pub fn new(user: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_API_URL, user)
    }

    /// Point at a different API root (GitHub Enterprise, or a local stub).
    ///
    /// Fails if the HTTP client cannot be built. GitHub rejects requests
    /// without a User-Agent, so there is no bare-client fallback.
    pub fn with_base_url(
        base_url: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        let client = Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user: user.into(),
            client,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
            // Unauthenticated rate limiting answers 403 as well as 429.
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(ClientError::RateLimited),
            _ => Err(ClientError::Server(format!("{}: {}", status, body))),
        }
    }

    /// Up to 100 public repositories, most recently updated first.
    pub async fn repos(&self) -> Result<Vec<Repo>, ClientError> {
        self.get(&format!(
            "/users/{}/repos?sort=updated&per_page=100",
            self.user
        ))
        .await
    }

    /// Languages of one repository, most bytes first.
    pub async fn languages(&self, repo: &str) -> Result<Vec<String>, ClientError> {
        let bytes: HashMap<String, u64> = self
            .get(&format!("/repos/{}/{}/languages", self.user, repo))
            .await?;
        Ok(rank_languages(bytes))
    }

    pub async fn projects(&self) -> Result<Vec<Project>, ClientError> {
        let repos = showcase_repos(self.repos().await?, &self.user);

        let mut lookups = JoinSet::new();
        for (i, repo) in repos.iter().enumerate() {
            let client = self.clone();
            let name = repo.name.clone();
            lookups.spawn(async move {
                // A failed lookup falls back to the primary language.
                (i, client.languages(&name).await.unwrap_or_default())
            });
        }

        let mut languages = vec![Vec::new(); repos.len()];
        while let Some(joined) = lookups.join_next().await {
            if let Ok((i, langs)) = joined {
                languages[i] = langs;
            }
        }

        Ok(repos
            .into_iter()
            .zip(languages)
            .zip(1..)
            .map(|((repo, langs), id)| project_from_repo(id, repo, langs))
            .collect())
    }

    pub async fn skills(&self) -> Result<Vec<Skill>, ClientError> {
        Ok(skills_from_repos(&self.repos().await?))
    }
}

fn rank_languages(bytes: HashMap<String, u64>) -> Vec<String> {
    let mut ranked: Vec<_> = bytes.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().map(|(name, _)| name).collect()
}

/// Drop forks, archived repositories and the profile README repository.
pub fn showcase_repos(repos: Vec<Repo>, user: &str) -> Vec<Repo> {
    repos
        .into_iter()
        .filter(|r| !r.fork && !r.archived && !r.name.eq_ignore_ascii_case(user))
        .collect()
}

/// `multi-file-conversion` becomes `Multi File Conversion`.
pub fn title_case(name: &str) -> String {
    name.split(['-', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

const DESCRIPTIONS: &[(&[&str], &str)] = &[
    (
        &["api", "backend", "server"],
        "A REST API focused on data processing, endpoint design and server-side logic.",
    ),
    (
        &["convert", "transform"],
        "A file conversion tool covering format detection and batch processing.",
    ),
    (
        &["stock", "finance", "market"],
        "A financial data service with real-time processing, caching and analytics endpoints.",
    ),
    (
        &["equalizer", "audio", "music"],
        "An audio application built around signal processing and waveform visualization.",
    ),
    (
        &["portfolio", "website"],
        "A responsive web application with API integration and a modern interface.",
    ),
    (
        &["bot", "automation"],
        "An automation tool for task scheduling and API integration.",
    ),
];

/// Description for a repository that has none, guessed from its name.
pub fn describe(name: &str, languages: &[String]) -> String {
    let name = name.to_lowercase();
    for (keywords, description) in DESCRIPTIONS {
        if keywords.iter().any(|k| name.contains(k)) {
            return description.to_string();
        }
    }
    let primary = languages
        .first()
        .map(String::as_str)
        .unwrap_or("modern technologies");
    format!("A project exploring practical problem-solving and system design using {primary}.")
}

pub fn project_from_repo(id: i64, repo: Repo, languages: Vec<String>) -> Project {
    let tech_stack = if !languages.is_empty() {
        languages
    } else if let Some(lang) = &repo.language {
        vec![lang.clone()]
    } else {
        vec!["Code".to_string()]
    };
    let description = repo
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| describe(&repo.name, &tech_stack));

    Project {
        id,
        title: title_case(&repo.name),
        description,
        tech_stack,
        repo_url: Some(repo.html_url),
        demo_url: repo.homepage.filter(|h| !h.trim().is_empty()),
        featured: true,
        created_at: repo.updated_at.unwrap_or_default(),
    }
}

const FRONTEND_LANGUAGES: &[&str] = &["JavaScript", "TypeScript", "HTML", "CSS"];

const TOOLS: &[(&str, i32)] = &[("Git", 4), ("GitHub", 4), ("VS Code", 4), ("npm", 3)];

/// Distinct primary languages in first-seen order, then common tools.
pub fn skills_from_repos(repos: &[Repo]) -> Vec<Skill> {
    let mut seen: Vec<&str> = Vec::new();
    for lang in repos.iter().filter_map(|r| r.language.as_deref()) {
        if !seen.contains(&lang) {
            seen.push(lang);
        }
    }

    let languages = seen.into_iter().zip(1..).map(|(lang, id)| Skill {
        id,
        category: if FRONTEND_LANGUAGES.contains(&lang) {
            "Frontend"
        } else {
            "Backend"
        }
        .to_string(),
        name: lang.to_string(),
        proficiency: Some(3),
    });
    let tools = TOOLS.iter().zip(100..).map(|(&(name, level), id)| Skill {
        id,
        category: "Tools".to_string(),
        name: name.to_string(),
        proficiency: Some(level),
    });

    languages.chain(tools).collect()
}
