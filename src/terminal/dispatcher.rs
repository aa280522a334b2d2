use std::sync::Arc;

use super::commands::not_found;
use super::history::HistoryBuffer;
use super::registry::{CommandContext, CommandRegistry, CommandResult, Control, Resolved};
use super::render;
use super::request::CommandRequest;
use super::transcript::{Transcript, TranscriptEntry};
use crate::providers::PortfolioData;

/// What a call to [`Terminal::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Blank input; nothing changed.
    Ignored,
    /// An Output or Error entry was appended.
    Completed { is_error: bool },
    /// The transcript was wiped.
    Cleared,
    /// `gui` or `exit`; the exit callback has run.
    ExitRequested,
}

type ExitCallback = Box<dyn FnMut() + Send>;

/// One interactive session: registry, transcript, history and pending input.
pub struct Terminal {
    registry: CommandRegistry,
    data: Arc<dyn PortfolioData>,
    transcript: Transcript,
    history: HistoryBuffer,
    pending: String,
    on_exit: Option<ExitCallback>,
}

impl Terminal {
    pub fn new(registry: CommandRegistry, data: Arc<dyn PortfolioData>) -> Self {
        Self {
            registry,
            data,
            transcript: Transcript::new(),
            history: HistoryBuffer::new(),
            pending: String::new(),
            on_exit: None,
        }
    }

    /// Cap the transcript, dropping the oldest entries first. `None` keeps it unbounded.
    pub fn with_transcript_limit(mut self, limit: Option<usize>) -> Self {
        self.transcript = match limit {
            Some(limit) => Transcript::with_limit(limit),
            None => Transcript::new(),
        };
        self
    }

    /// Called when `gui` or `exit` is submitted.
    pub fn on_exit(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_exit = Some(Box::new(callback));
        self
    }

    /// Append the welcome banner.
    pub fn welcome(&mut self) {
        self.transcript.append(TranscriptEntry::output(render::welcome()));
    }

    pub fn submit(&mut self, line: &str) -> Outcome {
        let Some(request) = CommandRequest::parse(line) else {
            return Outcome::Ignored;
        };

        self.transcript.append(TranscriptEntry::input(&request.raw));
        self.history.push(request.raw.clone());
        self.pending.clear();

        if let Some(control) = Control::from_keyword(&request.main_command) {
            return self.control(control);
        }

        let result = match self.registry.resolve(&request.main_command) {
            Some(Resolved::Run(command)) => command.execute(&CommandContext {
                request: &request,
                data: self.data.as_ref(),
                registry: &self.registry,
            }),
            Some(Resolved::Control(control)) => return self.control(control),
            None => {
                tracing::debug!(command = %request.main_command, "Unknown command");
                CommandResult::error(not_found(&request.raw))
            }
        };

        let is_error = result.is_error;
        self.transcript.append(result.into_entry());
        Outcome::Completed { is_error }
    }

    fn control(&mut self, control: Control) -> Outcome {
        match control {
            Control::Clear => {
                self.transcript.clear();
                Outcome::Cleared
            }
            Control::Exit => {
                if let Some(callback) = self.on_exit.as_mut() {
                    callback();
                }
                Outcome::ExitRequested
            }
        }
    }

    /// Step back through history. Returns the new pending input.
    pub fn recall_older(&mut self) -> &str {
        if let Some(line) = self.history.older() {
            self.pending = line.to_string();
        }
        &self.pending
    }

    /// Step forward through history. Leaving the newest entry empties the input.
    pub fn recall_newer(&mut self) -> &str {
        if let Some(line) = self.history.newer() {
            self.pending = line.to_string();
        }
        &self.pending
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn set_pending(&mut self, text: impl Into<String>) {
        self.pending = text.into();
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }
}
