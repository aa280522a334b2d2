use std::collections::HashMap;

use super::content::Content;
use super::request::CommandRequest;
use super::transcript::TranscriptEntry;
use crate::providers::PortfolioData;

/// Help metadata for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    /// One line, shown by `help`.
    pub description: String,
    pub usage: Option<String>,
    pub examples: Vec<String>,
}

impl CommandInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            description: description.into(),
            usage: None,
            examples: Vec::new(),
        }
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }
}

/// What a handler produced for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub is_error: bool,
    pub payload: Content,
}

impl CommandResult {
    pub fn output(payload: impl Into<Content>) -> Self {
        Self {
            is_error: false,
            payload: payload.into(),
        }
    }

    pub fn error(payload: impl Into<Content>) -> Self {
        Self {
            is_error: true,
            payload: payload.into(),
        }
    }

    pub fn into_entry(self) -> TranscriptEntry {
        if self.is_error {
            TranscriptEntry::error(self.payload)
        } else {
            TranscriptEntry::output(self.payload)
        }
    }
}

/// Everything a handler may read while executing.
pub struct CommandContext<'a> {
    pub request: &'a CommandRequest,
    pub data: &'a dyn PortfolioData,
    pub registry: &'a CommandRegistry,
}

/// A terminal command. Handlers only read; the dispatcher owns the session.
pub trait Command: Send + Sync {
    fn info(&self) -> &CommandInfo;

    fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult;
}

/// Commands that act on the session itself instead of producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Wipe the transcript.
    Clear,
    /// Leave terminal mode.
    Exit,
}

impl Control {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "clear" => Some(Self::Clear),
            "gui" | "exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

enum Handler {
    Run(Box<dyn Command>),
    Control(CommandInfo, Control),
}

impl Handler {
    fn info(&self) -> &CommandInfo {
        match self {
            Self::Run(command) => command.info(),
            Self::Control(info, _) => info,
        }
    }
}

/// A registry lookup hit.
pub enum Resolved<'a> {
    Run(&'a dyn Command),
    Control(Control),
}

/// Command name to handler, kept in registration order for `help`.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: Vec<Handler>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. Re-registering a name replaces the handler in place.
    pub fn register(&mut self, command: impl Command + 'static) -> &mut Self {
        self.insert(Handler::Run(Box::new(command)))
    }

    /// Add a session-control entry so it shows up in `help`.
    pub fn register_control(&mut self, info: CommandInfo, control: Control) -> &mut Self {
        self.insert(Handler::Control(info, control))
    }

    fn insert(&mut self, handler: Handler) -> &mut Self {
        let name = handler.info().name.clone();
        match self.index.get(&name) {
            Some(&i) => self.handlers[i] = handler,
            None => {
                self.index.insert(name, self.handlers.len());
                self.handlers.push(handler);
            }
        }
        self
    }

    /// Exact, case-insensitive lookup.
    pub fn resolve(&self, keyword: &str) -> Option<Resolved<'_>> {
        let handler = &self.handlers[*self.index.get(&keyword.to_lowercase())?];
        Some(match handler {
            Handler::Run(command) => Resolved::Run(command.as_ref()),
            Handler::Control(_, control) => Resolved::Control(*control),
        })
    }

    pub fn info(&self, keyword: &str) -> Option<&CommandInfo> {
        let i = *self.index.get(&keyword.to_lowercase())?;
        Some(self.handlers[i].info())
    }

    /// Metadata in registration order.
    pub fn infos(&self) -> impl Iterator<Item = &CommandInfo> + '_ {
        self.handlers.iter().map(Handler::info)
    }

    pub fn names(&self) -> Vec<String> {
        self.infos().map(|info| info.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
