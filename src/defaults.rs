//! Built-in portfolio content.
//!
//! Seeds an empty database and backs the data providers when neither the
//! network nor the local cache can supply anything.

use chrono::{DateTime, Utc};

use crate::models::*;

pub fn projects() -> Vec<CreateProjectInput> {
    vec![
        CreateProjectInput {
            title: "Hybrid Portfolio".to_string(),
            description: "A dual-interface portfolio featuring a clean GUI for recruiters and an interactive terminal for developers.".to_string(),
            tech_stack: strings(&["Rust", "Axum", "SQLite", "Tokio"]),
            repo_url: Some("https://github.com/user/portfolio".to_string()),
            demo_url: Some("https://portfolio.demo".to_string()),
            featured: true,
        },
        CreateProjectInput {
            title: "E-Commerce Dashboard".to_string(),
            description: "Real-time analytics dashboard for online retailers. Features sales tracking, inventory management, and customer insights.".to_string(),
            tech_stack: strings(&["Next.js", "Drizzle ORM", "PostgreSQL", "Recharts"]),
            repo_url: Some("https://github.com/user/dashboard".to_string()),
            demo_url: None,
            featured: true,
        },
        CreateProjectInput {
            title: "DevTools CLI".to_string(),
            description: "A command-line tool to scaffold modern web projects with sensible defaults built in.".to_string(),
            tech_stack: strings(&["Rust", "Clap", "Tokio"]),
            repo_url: Some("https://github.com/user/cli-tool".to_string()),
            demo_url: None,
            featured: false,
        },
    ]
}

pub fn skills() -> Vec<CreateSkillInput> {
    [
        ("Frontend", "React", 5),
        ("Frontend", "TypeScript", 5),
        ("Frontend", "Tailwind CSS", 4),
        ("Backend", "Node.js", 4),
        ("Backend", "PostgreSQL", 3),
        ("Backend", "Rust", 3),
        ("Tools", "Git", 5),
        ("Tools", "Docker", 4),
        ("Tools", "Linux", 4),
    ]
    .into_iter()
    .map(|(category, name, proficiency)| CreateSkillInput {
        category: category.to_string(),
        name: name.to_string(),
        proficiency: Some(proficiency),
    })
    .collect()
}

pub fn timeline() -> Vec<CreateTimelineInput> {
    vec![
        CreateTimelineInput {
            company: "TechCorp Inc.".to_string(),
            role: "Senior Frontend Engineer".to_string(),
            duration: "2021 - Present".to_string(),
            description: "Leading the frontend team in rebuilding the core product dashboard. Improved load times by 40%.".to_string(),
            order: 1,
        },
        CreateTimelineInput {
            company: "StartUp Lab".to_string(),
            role: "Software Developer".to_string(),
            duration: "2019 - 2021".to_string(),
            description: "Full-stack development across three major client applications, from prototype to production.".to_string(),
            order: 2,
        },
        CreateTimelineInput {
            company: "WebSolutions".to_string(),
            role: "Junior Developer".to_string(),
            duration: "2018 - 2019".to_string(),
            description: "Built responsive websites and maintained legacy codebases.".to_string(),
            order: 3,
        },
    ]
}

pub fn certifications() -> Vec<CreateCertificationInput> {
    vec![
        CreateCertificationInput {
            name: "Cloud Practitioner".to_string(),
            issuer: "Amazon Web Services".to_string(),
            issue_date: "Mar 2024".to_string(),
            expiry_date: Some("Mar 2027".to_string()),
            credential_id: None,
            credential_url: Some("https://www.credly.com/".to_string()),
        },
        CreateCertificationInput {
            name: "Responsive Web Design".to_string(),
            issuer: "freeCodeCamp".to_string(),
            issue_date: "Aug 2023".to_string(),
            expiry_date: None,
            credential_id: None,
            credential_url: None,
        },
    ]
}

// ============================================================
// Materialized fallbacks (ids assigned in declaration order)
// ============================================================

/// Fixed timestamp so fallback content compares equal across calls.
fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

pub fn fallback_projects() -> Vec<Project> {
    projects()
        .into_iter()
        .zip(1..)
        .map(|(p, id)| Project {
            id,
            title: p.title,
            description: p.description,
            tech_stack: p.tech_stack,
            repo_url: p.repo_url,
            demo_url: p.demo_url,
            featured: p.featured,
            created_at: epoch(),
        })
        .collect()
}

pub fn fallback_skills() -> Vec<Skill> {
    skills()
        .into_iter()
        .zip(1..)
        .map(|(s, id)| Skill {
            id,
            category: s.category,
            name: s.name,
            proficiency: s.proficiency,
        })
        .collect()
}

pub fn fallback_timeline() -> Vec<TimelineEntry> {
    timeline()
        .into_iter()
        .zip(1..)
        .map(|(t, id)| TimelineEntry {
            id,
            company: t.company,
            role: t.role,
            duration: t.duration,
            description: t.description,
            order: t.order,
        })
        .collect()
}

pub fn fallback_certifications() -> Vec<Certification> {
    certifications()
        .into_iter()
        .zip(1..)
        .map(|(c, id)| Certification {
            id,
            name: c.name,
            issuer: c.issuer,
            issue_date: c.issue_date,
            expiry_date: c.expiry_date,
            credential_id: c.credential_id,
            credential_url: c.credential_url,
        })
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
