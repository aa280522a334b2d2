//! Built-in terminal commands.

use super::content::Content;
use super::registry::{
    Command, CommandContext, CommandInfo, CommandRegistry, CommandResult, Control,
};
use super::render;
use crate::config::Profile;
use crate::providers::Loadable;

/// The standard command set, in the order `help` lists them.
pub fn builtin_registry(profile: Profile) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry
        .register(Help::new())
        .register(About::new(profile.clone()))
        .register(Projects::new())
        .register(Skills::new())
        .register(Experience::new())
        .register(Certifications::new())
        .register(Contact::new(profile))
        .register_control(
            CommandInfo::new("clear", "Clear terminal output"),
            Control::Clear,
        )
        .register_control(CommandInfo::new("gui", "Switch to GUI mode"), Control::Exit)
        .register_control(CommandInfo::new("exit", "Leave terminal mode"), Control::Exit);
    registry
}

/// Error text for a keyword no command answers to.
pub fn not_found(raw: &str) -> Content {
    Content::text(format!(
        "Command not found: {raw}. Type 'help' for available commands."
    ))
}

fn loading(category: &str) -> CommandResult {
    CommandResult::output(format!("Loading {category} data..."))
}

fn render_loaded<T>(
    data: Loadable<Vec<T>>,
    category: &str,
    render: impl FnOnce(&[T]) -> Content,
) -> CommandResult {
    match data {
        Loadable::Loading => loading(category),
        Loadable::Loaded(items) if items.is_empty() => {
            CommandResult::output(format!("No {category} to show."))
        }
        Loadable::Loaded(items) => CommandResult::output(render(&items)),
    }
}

pub struct Help {
    info: CommandInfo,
}

impl Help {
    pub fn new() -> Self {
        Self {
            info: CommandInfo::new("help", "Show this help message")
                .usage("help [command]")
                .example("help")
                .example("help projects"),
        }
    }
}

impl Default for Help {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for Help {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        match ctx.request.arg(0) {
            None => CommandResult::output(render::help_table(ctx.registry.infos())),
            Some(topic) => match ctx.registry.info(topic) {
                Some(info) => CommandResult::output(render::command_help(info)),
                None => CommandResult::error(format!(
                    "No help entry for '{topic}'. Type 'help' for available commands."
                )),
            },
        }
    }
}

pub struct About {
    info: CommandInfo,
    profile: Profile,
}

impl About {
    pub fn new(profile: Profile) -> Self {
        Self {
            info: CommandInfo::new("about", "Display biographical information"),
            profile,
        }
    }
}

impl Command for About {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn execute(&self, _ctx: &CommandContext<'_>) -> CommandResult {
        CommandResult::output(render::about(&self.profile))
    }
}

pub struct Projects {
    info: CommandInfo,
}

impl Projects {
    pub fn new() -> Self {
        Self {
            info: CommandInfo::new("projects", "List featured projects")
                .usage("projects [all]")
                .example("projects")
                .example("projects all"),
        }
    }
}

impl Default for Projects {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for Projects {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let show_all = ctx.request.arg(0) == Some("all");
        render_loaded(ctx.data.projects(), "projects", |projects| {
            // Sources without a featured flag mark everything featured.
            let featured: Vec<_> = projects
                .iter()
                .filter(|p| show_all || p.featured)
                .cloned()
                .collect();
            if featured.is_empty() {
                render::projects(projects)
            } else {
                render::projects(&featured)
            }
        })
    }
}

pub struct Skills {
    info: CommandInfo,
}

impl Skills {
    pub fn new() -> Self {
        Self {
            info: CommandInfo::new("skills", "Show technical skills")
                .usage("skills [category]")
                .example("skills")
                .example("skills frontend"),
        }
    }
}

impl Default for Skills {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for Skills {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let Loadable::Loaded(skills) = ctx.data.skills() else {
            return loading("skills");
        };
        let Some(category) = ctx.request.arg(0) else {
            return render_loaded(Loadable::Loaded(skills), "skills", render::skills);
        };

        let matching: Vec<_> = skills
            .into_iter()
            .filter(|s| s.category.to_lowercase() == category)
            .collect();
        if matching.is_empty() {
            CommandResult::error(format!("No skills in category '{category}'."))
        } else {
            CommandResult::output(render::skills(&matching))
        }
    }
}

pub struct Experience {
    info: CommandInfo,
}

impl Experience {
    pub fn new() -> Self {
        Self {
            info: CommandInfo::new("experience", "View work history"),
        }
    }
}

impl Default for Experience {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for Experience {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let mut timeline = ctx.data.timeline();
        if let Loadable::Loaded(entries) = &mut timeline {
            crate::models::sort_timeline(entries);
        }
        render_loaded(timeline, "experience", render::timeline)
    }
}

pub struct Certifications {
    info: CommandInfo,
}

impl Certifications {
    pub fn new() -> Self {
        Self {
            info: CommandInfo::new("certifications", "List certifications and credentials"),
        }
    }
}

impl Default for Certifications {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for Certifications {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        render_loaded(
            ctx.data.certifications(),
            "certifications",
            render::certifications,
        )
    }
}

pub struct Contact {
    info: CommandInfo,
    profile: Profile,
}

impl Contact {
    pub fn new(profile: Profile) -> Self {
        Self {
            info: CommandInfo::new("contact", "Display contact information"),
            profile,
        }
    }
}

impl Command for Contact {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn execute(&self, _ctx: &CommandContext<'_>) -> CommandResult {
        CommandResult::output(render::contact(&self.profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;
    use crate::providers::StaticData;
    use crate::terminal::request::CommandRequest;
    use crate::terminal::registry::Resolved;

    fn run(registry: &CommandRegistry, data: &StaticData, line: &str) -> CommandResult {
        let request = CommandRequest::parse(line).unwrap();
        let Some(Resolved::Run(command)) = registry.resolve(&request.main_command) else {
            panic!("{line} should resolve to a command");
        };
        command.execute(&CommandContext {
            request: &request,
            data,
            registry,
        })
    }

    #[test]
    fn registers_builtins_in_order() {
        let registry = builtin_registry(Profile::default());
        assert_eq!(
            registry.names(),
            vec![
                "help",
                "about",
                "projects",
                "skills",
                "experience",
                "certifications",
                "contact",
                "clear",
                "gui",
                "exit",
            ]
        );
    }

    #[test]
    fn every_category_reports_loading() {
        let registry = builtin_registry(Profile::default());
        let data = StaticData::loading();
        for (line, expected) in [
            ("projects", "Loading projects data..."),
            ("skills", "Loading skills data..."),
            ("experience", "Loading experience data..."),
            ("certifications", "Loading certifications data..."),
        ] {
            assert_eq!(run(&registry, &data, line), CommandResult::output(expected));
        }
    }

    #[test]
    fn help_lists_every_command() {
        let registry = builtin_registry(Profile::default());
        let result = run(&registry, &StaticData::loading(), "help");
        assert!(!result.is_error);
        for info in registry.infos() {
            assert!(result.payload.contains(&info.description));
        }
    }

    #[test]
    fn help_topic_unknown_is_error() {
        let registry = builtin_registry(Profile::default());
        let result = run(&registry, &StaticData::loading(), "help nosuchcommand");
        assert!(result.is_error);
        assert!(result.payload.contains("nosuchcommand"));
    }

    fn project(title: &str, featured: bool) -> Project {
        Project {
            id: 1,
            title: title.to_string(),
            description: String::new(),
            tech_stack: vec![],
            repo_url: None,
            demo_url: None,
            featured,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn projects_shows_featured_unless_all() {
        let registry = builtin_registry(Profile::default());
        let data = StaticData::loading()
            .with_projects(vec![project("Folio", true), project("Scratch", false)]);

        let featured = run(&registry, &data, "projects").payload;
        assert!(featured.contains("Folio"));
        assert!(!featured.contains("Scratch"));

        let all = run(&registry, &data, "projects all").payload;
        assert!(all.contains("Folio"));
        assert!(all.contains("Scratch"));
    }

    #[test]
    fn skills_filter_by_category() {
        let registry = builtin_registry(Profile::default());
        let data = StaticData::defaults();
        let result = run(&registry, &data, "skills frontend");
        assert!(!result.is_error);
        assert!(result.payload.contains("FRONTEND"));
        assert!(!result.payload.contains("BACKEND"));

        let missing = run(&registry, &data, "skills cooking");
        assert!(missing.is_error);
    }

    #[test]
    fn experience_renders_in_order() {
        let registry = builtin_registry(Profile::default());
        let mut data = StaticData::defaults();
        if let Loadable::Loaded(entries) = &mut data.timeline {
            entries.reverse();
        }
        let text = run(&registry, &data, "experience").payload.plain_text();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "├── 2021 - Present");
    }

    #[test]
    fn contact_shows_profile_email() {
        let profile = Profile::default();
        let registry = builtin_registry(profile.clone());
        let result = run(&registry, &StaticData::loading(), "contact");
        assert!(result.payload.contains(&profile.email));
    }

    #[test]
    fn not_found_names_input_and_help() {
        let content = not_found("frobnicate");
        assert!(content.contains("frobnicate"));
        assert!(content.contains("help"));
    }
}
