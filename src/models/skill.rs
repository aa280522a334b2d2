use serde::{Deserialize, Serialize};

/// A single skill, grouped by category for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: i64,
    /// Grouping label, e.g. "Frontend", "Backend", "Tools".
    pub category: String,
    pub name: String,
    /// Self-assessed level on a 1-5 scale.
    pub proficiency: Option<i32>,
}

/// Input for creating a skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSkillInput {
    pub category: String,
    pub name: String,
    pub proficiency: Option<i32>,
}

/// Distinct categories in first-seen order.
pub fn skill_categories(skills: &[Skill]) -> Vec<&str> {
    let mut categories: Vec<&str> = Vec::new();
    for skill in skills {
        if !categories.contains(&skill.category.as_str()) {
            categories.push(&skill.category);
        }
    }
    categories
}
