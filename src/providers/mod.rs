//! Data providers: portfolio content fetched in the background and read
//! synchronously by the terminal.
//!
//! Each category is loaded once per session with the same policy:
//!
//! 1. A cache entry younger than the TTL is used as is.
//! 2. Otherwise the source is fetched and the result cached.
//! 3. If the fetch fails, a stale cache entry is used.
//! 4. With no cache entry at all, the built-in defaults are used.
//!
//! Failures never reach the terminal. Until a load finishes the category
//! reads as [`Loadable::Loading`].

pub mod cache;
pub mod client;
pub mod github;
pub mod source;

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};

use crate::defaults;
use crate::models::{Certification, Project, Skill, TimelineEntry};

pub use cache::{Cached, DiskCache};
pub use client::{ClientError, PortfolioClient};
pub use github::GitHubClient;
pub use source::Source;

/// Default freshness window for cached provider data.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A category that is either still loading or ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loadable<T> {
    Loading,
    Loaded(T),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn loaded(self) -> Option<T> {
        match self {
            Self::Loading => None,
            Self::Loaded(value) => Some(value),
        }
    }
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self::Loading
    }
}

/// Read-only view of the portfolio content, one accessor per category.
pub trait PortfolioData: Send + Sync {
    fn projects(&self) -> Loadable<Vec<Project>>;
    fn skills(&self) -> Loadable<Vec<Skill>>;
    fn timeline(&self) -> Loadable<Vec<TimelineEntry>>;
    fn certifications(&self) -> Loadable<Vec<Certification>>;
}

/// Fixed data, for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticData {
    pub projects: Loadable<Vec<Project>>,
    pub skills: Loadable<Vec<Skill>>,
    pub timeline: Loadable<Vec<TimelineEntry>>,
    pub certifications: Loadable<Vec<Certification>>,
}

impl StaticData {
    /// Every category loading.
    pub fn loading() -> Self {
        Self::default()
    }

    /// Every category loaded with the built-in content.
    pub fn defaults() -> Self {
        Self {
            projects: Loadable::Loaded(defaults::fallback_projects()),
            skills: Loadable::Loaded(defaults::fallback_skills()),
            timeline: Loadable::Loaded(defaults::fallback_timeline()),
            certifications: Loadable::Loaded(defaults::fallback_certifications()),
        }
    }

    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.projects = Loadable::Loaded(projects);
        self
    }

    pub fn with_skills(mut self, skills: Vec<Skill>) -> Self {
        self.skills = Loadable::Loaded(skills);
        self
    }

    pub fn with_timeline(mut self, timeline: Vec<TimelineEntry>) -> Self {
        self.timeline = Loadable::Loaded(timeline);
        self
    }

    pub fn with_certifications(mut self, certifications: Vec<Certification>) -> Self {
        self.certifications = Loadable::Loaded(certifications);
        self
    }
}

impl PortfolioData for StaticData {
    fn projects(&self) -> Loadable<Vec<Project>> {
        self.projects.clone()
    }

    fn skills(&self) -> Loadable<Vec<Skill>> {
        self.skills.clone()
    }

    fn timeline(&self) -> Loadable<Vec<TimelineEntry>> {
        self.timeline.clone()
    }

    fn certifications(&self) -> Loadable<Vec<Certification>> {
        self.certifications.clone()
    }
}

/// Shared cell a background load writes into once.
#[derive(Debug)]
struct Slot<T>(Arc<RwLock<Loadable<Vec<T>>>>);

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self(Arc::new(RwLock::new(Loadable::Loading)))
    }
}

impl<T: Clone> Slot<T> {
    fn get(&self) -> Loadable<Vec<T>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, value: Vec<T>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Loadable::Loaded(value);
    }
}

impl<T> Slot<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn spawn_load<F, Fut>(
        &self,
        key: String,
        cache: Option<DiskCache>,
        ttl: Duration,
        fetch: F,
        fallback: fn() -> Vec<T>,
    ) where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<Vec<T>>> + Send + 'static,
    {
        let slot = self.clone();
        tokio::spawn(async move {
            let (value, origin) = load(&key, cache.as_ref(), ttl, fetch, fallback).await;
            tracing::debug!(key, ?origin, "Provider loaded");
            slot.set(value);
        });
    }
}

/// Live providers backed by background loads.
#[derive(Debug, Clone, Default)]
pub struct Providers {
    projects: Slot<Project>,
    skills: Slot<Skill>,
    timeline: Slot<TimelineEntry>,
    certifications: Slot<Certification>,
}

impl Providers {
    /// Start loading every category on the current tokio runtime.
    pub fn spawn(source: Source, cache: Option<DiskCache>, ttl: Duration) -> Self {
        let providers = Self::default();
        let prefix = source.cache_prefix();

        let src = source.clone();
        providers.projects.spawn_load(
            format!("{prefix}-projects"),
            cache.clone(),
            ttl,
            move || async move { src.projects().await },
            defaults::fallback_projects,
        );
        let src = source.clone();
        providers.skills.spawn_load(
            format!("{prefix}-skills"),
            cache.clone(),
            ttl,
            move || async move { src.skills().await },
            defaults::fallback_skills,
        );
        let src = source.clone();
        providers.timeline.spawn_load(
            format!("{prefix}-timeline"),
            cache.clone(),
            ttl,
            move || async move { src.timeline().await },
            defaults::fallback_timeline,
        );
        providers.certifications.spawn_load(
            format!("{prefix}-certifications"),
            cache,
            ttl,
            move || async move { source.certifications().await },
            defaults::fallback_certifications,
        );

        providers
    }

    /// True once no category is loading.
    pub fn is_ready(&self) -> bool {
        !(self.projects().is_loading()
            || self.skills().is_loading()
            || self.timeline().is_loading()
            || self.certifications().is_loading())
    }
}

impl PortfolioData for Providers {
    fn projects(&self) -> Loadable<Vec<Project>> {
        self.projects.get()
    }

    fn skills(&self) -> Loadable<Vec<Skill>> {
        self.skills.get()
    }

    fn timeline(&self) -> Loadable<Vec<TimelineEntry>> {
        self.timeline.get()
    }

    fn certifications(&self) -> Loadable<Vec<Certification>> {
        self.certifications.get()
    }
}

/// Where a loaded value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Network,
    StaleCache,
    Defaults,
}

/// Load one category: fresh cache, then `fetch`, then stale cache, then `fallback`.
pub async fn load<T, F, Fut>(
    key: &str,
    cache: Option<&DiskCache>,
    ttl: Duration,
    fetch: F,
    fallback: impl FnOnce() -> Vec<T>,
) -> (Vec<T>, Origin)
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<Vec<T>>>,
{
    let cached = cache.and_then(|cache| match cache.get::<Vec<T>>(key) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!(key, "Ignoring unreadable cache entry: {:#}", e);
            None
        }
    });

    let cached = match cached {
        Some(entry) if entry.is_fresh(ttl, Utc::now()) => {
            tracing::debug!(key, "Using cached data");
            return (entry.value, Origin::Cache);
        }
        other => other,
    };

    match fetch().await {
        Ok(value) => {
            if let Some(cache) = cache {
                if let Err(e) = cache.put(key, &value) {
                    tracing::warn!(key, "Failed to cache fetched data: {:#}", e);
                }
            }
            tracing::debug!(key, count = value.len(), "Fetched fresh data");
            (value, Origin::Network)
        }
        Err(e) => match cached {
            Some(entry) => {
                tracing::warn!(key, "Fetch failed, using expired cache: {:#}", e);
                (entry.value, Origin::StaleCache)
            }
            None => {
                tracing::warn!(key, "Fetch failed, using built-in data: {:#}", e);
                (fallback(), Origin::Defaults)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_data_builders_mark_categories_loaded() {
        let data = StaticData::loading().with_skills(defaults::fallback_skills());
        assert!(data.projects().is_loading());
        assert_eq!(data.skills().loaded(), Some(defaults::fallback_skills()));
    }

    #[test]
    fn empty_providers_are_loading() {
        let providers = Providers::default();
        assert!(providers.projects().is_loading());
        assert!(!providers.is_ready());
    }

    #[test]
    fn slots_are_shared_between_clones() {
        let providers = Providers::default();
        let writer = providers.clone();
        writer.timeline.set(defaults::fallback_timeline());
        assert_eq!(providers.timeline().loaded(), Some(defaults::fallback_timeline()));
    }

    #[tokio::test]
    async fn load_without_cache_falls_back_to_defaults() {
        let (value, origin) = load(
            "projects",
            None,
            DEFAULT_TTL,
            || async { Err::<Vec<Project>, _>(anyhow::anyhow!("offline")) },
            defaults::fallback_projects,
        )
        .await;
        assert_eq!(origin, Origin::Defaults);
        assert_eq!(value, defaults::fallback_projects());
    }
}
