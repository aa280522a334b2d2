//! Text layouts for portfolio content in the terminal.

use super::content::{Content, Line, Style};
use super::registry::CommandInfo;
use crate::config::Profile;
use crate::models::{skill_categories, Certification, Project, Skill, TimelineEntry};

const BANNER: &str = r" ____            _    __       _ _
|  _ \ ___  _ __| |_ / _| ___ | (_) ___
| |_) / _ \| '__| __| |_ / _ \| | |/ _ \
|  __/ (_) | |  | |_|  _| (_) | | | (_) |
|_|   \___/|_|   \__|_|  \___/|_|_|\___/";

/// Width of the name column in the help listing.
const NAME_COLUMN: usize = 16;

pub fn welcome() -> Content {
    let mut lines: Vec<Line> = BANNER
        .lines()
        .map(|l| Line::styled(Style::Accent, l))
        .collect();
    lines.push(Line::new());
    lines.push(Line::plain("Welcome to the interactive terminal portfolio."));
    lines.push(
        Line::plain("Type ")
            .push(Style::Accent, "'help'")
            .push(Style::Plain, " to see available commands."),
    );
    Content::block(lines)
}

/// One row per command: padded name, then its description.
pub fn help_table<'a>(infos: impl Iterator<Item = &'a CommandInfo>) -> Content {
    Content::block(
        infos
            .map(|info| {
                Line::styled(Style::Accent, format!("{:<width$}", info.name, width = NAME_COLUMN))
                    .push(Style::Plain, info.description.clone())
            })
            .collect(),
    )
}

pub fn command_help(info: &CommandInfo) -> Content {
    let mut lines = vec![
        Line::styled(Style::Heading, info.name.clone()),
        Line::plain(format!("  {}", info.description)),
        Line::new(),
        Line::styled(Style::Label, "Usage: ")
            .push(Style::Plain, info.usage.clone().unwrap_or_else(|| info.name.clone())),
    ];
    if !info.examples.is_empty() {
        lines.push(Line::styled(Style::Label, "Examples:"));
        for example in &info.examples {
            lines.push(Line::styled(Style::Muted, "  $ ").push(Style::Plain, example.clone()));
        }
    }
    Content::block(lines)
}

pub fn about(profile: &Profile) -> Content {
    let mut lines = vec![
        Line::styled(Style::Heading, profile.name.clone()),
        Line::styled(Style::Accent, profile.title.clone()),
        Line::new(),
    ];
    lines.extend(profile.bio.lines().map(Line::plain));
    if let Some(location) = &profile.location {
        lines.push(Line::new());
        lines.push(Line::styled(Style::Muted, format!("Based in {location}")));
    }
    Content::block(lines)
}

pub fn contact(profile: &Profile) -> Content {
    let mut lines = vec![Line::plain("You can reach me at:"), Line::new()];
    let links = [
        ("Email:", Some(&profile.email)),
        ("GitHub:", profile.github.as_ref()),
        ("LinkedIn:", profile.linkedin.as_ref()),
    ];
    for (label, value) in links {
        if let Some(value) = value {
            lines.push(
                Line::styled(Style::Label, format!("{label:<10}")).push(Style::Link, value.clone()),
            );
        }
    }
    lines.push(Line::new());
    lines.push(Line::styled(
        Style::Muted,
        "(Or use the contact form in GUI mode)",
    ));
    Content::block(lines)
}

pub fn projects(projects: &[Project]) -> Content {
    let mut lines = Vec::new();
    for (i, project) in projects.iter().enumerate() {
        if i > 0 {
            lines.push(Line::new());
        }
        lines.push(Line::styled(Style::Accent, "➜ ").push(Style::Heading, project.title.clone()));
        lines.push(Line::plain(format!("  {}", project.description)));
        if !project.tech_stack.is_empty() {
            lines.push(
                Line::styled(Style::Label, "  Stack: ")
                    .push(Style::Muted, project.tech_stack.join(", ")),
            );
        }
        if let Some(url) = &project.repo_url {
            lines.push(Line::styled(Style::Label, "  [repo] ").push(Style::Link, url.clone()));
        }
        if let Some(url) = &project.demo_url {
            lines.push(Line::styled(Style::Label, "  [demo] ").push(Style::Link, url.clone()));
        }
    }
    Content::block(lines)
}

/// Skills grouped under their category, categories in first-seen order.
pub fn skills(skills: &[Skill]) -> Content {
    let mut lines = Vec::new();
    for category in skill_categories(skills) {
        lines.push(Line::styled(Style::Heading, category.to_uppercase()));
        let names: Vec<String> = skills
            .iter()
            .filter(|s| s.category == category)
            .map(|s| format!("• {}", s.name))
            .collect();
        lines.push(Line::plain(format!("  {}", names.join("  "))));
    }
    Content::block(lines)
}

/// Timeline drawn as a branch, one node per entry.
///
/// ```text
/// ├── 2021 - Present
/// │   Senior Engineer @ TechCorp
/// │   Led the dashboard rebuild.
/// └── 2019 - 2021
///     Developer @ StartUp Lab
///     Built client apps.
/// ```
pub fn timeline(entries: &[TimelineEntry]) -> Content {
    let mut lines = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let is_last = i == entries.len() - 1;
        let (branch, continuation) = if is_last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        lines.push(Line::styled(Style::Muted, branch).push(Style::Accent, entry.duration.clone()));
        lines.push(
            Line::styled(Style::Muted, continuation)
                .push(Style::Heading, format!("{} @ {}", entry.role, entry.company)),
        );
        for text in entry.description.lines() {
            lines.push(Line::styled(Style::Muted, continuation).push(Style::Plain, text));
        }
    }
    Content::block(lines)
}

pub fn certifications(certs: &[Certification]) -> Content {
    let mut lines = Vec::new();
    for (i, cert) in certs.iter().enumerate() {
        if i > 0 {
            lines.push(Line::new());
        }
        lines.push(Line::styled(Style::Accent, "◆ ").push(Style::Heading, cert.name.clone()));
        lines.push(Line::styled(Style::Label, "  Issuer: ").push(Style::Plain, cert.issuer.clone()));
        let issued = match &cert.expiry_date {
            Some(expiry) => format!("{} (expires {})", cert.issue_date, expiry),
            None => cert.issue_date.clone(),
        };
        lines.push(Line::styled(Style::Label, "  Issued: ").push(Style::Plain, issued));
        if let Some(id) = &cert.credential_id {
            lines.push(Line::styled(Style::Label, "  ID:     ").push(Style::Muted, id.clone()));
        }
        if let Some(url) = &cert.credential_url {
            lines.push(Line::styled(Style::Label, "  Verify: ").push(Style::Link, url.clone()));
        }
    }
    Content::block(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(role: &str, company: &str, duration: &str, description: &str) -> TimelineEntry {
        TimelineEntry {
            id: 0,
            company: company.to_string(),
            role: role.to_string(),
            duration: duration.to_string(),
            description: description.to_string(),
            order: 0,
        }
    }

    fn skill(category: &str, name: &str) -> Skill {
        Skill {
            id: 0,
            category: category.to_string(),
            name: name.to_string(),
            proficiency: None,
        }
    }

    #[test]
    fn test_timeline_single_entry() {
        let output = timeline(&[entry("Developer", "Acme", "2020", "Built things.")]);
        assert_eq!(
            output.plain_text(),
            "└── 2020\n    Developer @ Acme\n    Built things."
        );
    }

    #[test]
    fn test_timeline_branches() {
        let output = timeline(&[
            entry("Senior Engineer", "TechCorp", "2021 - Present", "Led the rebuild."),
            entry("Developer", "StartUp Lab", "2019 - 2021", "Built client apps."),
        ]);
        let expected = "├── 2021 - Present\n│   Senior Engineer @ TechCorp\n│   Led the rebuild.\n└── 2019 - 2021\n    Developer @ StartUp Lab\n    Built client apps.";
        assert_eq!(output.plain_text(), expected);
    }

    #[test]
    fn test_skills_grouped_by_first_seen_category() {
        let output = skills(&[
            skill("Tools", "Git"),
            skill("Frontend", "React"),
            skill("Tools", "Docker"),
        ]);
        assert_eq!(
            output.plain_text(),
            "TOOLS\n  • Git  • Docker\nFRONTEND\n  • React"
        );
    }

    #[test]
    fn test_help_table_pads_names() {
        let infos = [
            CommandInfo::new("help", "Show this help message"),
            CommandInfo::new("projects", "List featured projects"),
        ];
        let output = help_table(infos.iter());
        assert_eq!(
            output.plain_text(),
            "help            Show this help message\nprojects        List featured projects"
        );
    }

    #[test]
    fn test_command_help_lists_usage_and_examples() {
        let info = CommandInfo::new("help", "Show this help message")
            .usage("help [command]")
            .example("help projects");
        let text = command_help(&info).plain_text();
        assert!(text.contains("Usage: help [command]"));
        assert!(text.contains("$ help projects"));
    }

    #[test]
    fn test_project_links_only_when_present() {
        let project = Project {
            id: 1,
            title: "Folio".to_string(),
            description: "Portfolio".to_string(),
            tech_stack: vec!["Rust".to_string(), "Axum".to_string()],
            repo_url: Some("https://github.com/user/folio".to_string()),
            demo_url: None,
            featured: true,
            created_at: chrono::Utc::now(),
        };
        let text = projects(&[project]).plain_text();
        assert_eq!(
            text,
            "➜ Folio\n  Portfolio\n  Stack: Rust, Axum\n  [repo] https://github.com/user/folio"
        );
    }
}
