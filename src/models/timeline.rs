use serde::{Deserialize, Serialize};

/// An entry on the experience timeline.
///
/// Covers jobs as well as education and other milestones; `company` is the
/// organization and `role` what was done there. Entries are displayed by
/// ascending `order`, not by date, since `duration` is free text
/// ("2021 - Present", "Before College").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: i64,
    pub company: String,
    #[serde(alias = "position")]
    pub role: String,
    pub duration: String,
    pub description: String,
    #[serde(default)]
    pub order: i32,
}

/// Input for creating a timeline entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimelineInput {
    pub company: String,
    pub role: String,
    pub duration: String,
    pub description: String,
    #[serde(default)]
    pub order: i32,
}

/// Sort entries for display. Stable, so equal orders keep their input order.
pub fn sort_timeline(entries: &mut [TimelineEntry]) {
    entries.sort_by_key(|e| e.order);
}
