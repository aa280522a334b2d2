//! The terminal core: a command interpreter over cached portfolio data.
//!
//! A [`Terminal`] owns one session. Each submitted line is trimmed, logged to
//! the [`Transcript`] as an input entry, pushed onto the [`HistoryBuffer`] and
//! resolved through the [`CommandRegistry`]. Handlers read provider snapshots
//! and return a [`CommandResult`]; the terminal appends it. `clear`, `gui` and
//! `exit` act on the session directly.
//!
//! Nothing here awaits. A category whose provider has not resolved yet is
//! reported as `Loading <category> data...`.

pub mod commands;
mod content;
mod dispatcher;
mod history;
mod registry;
pub mod render;
mod request;
mod transcript;

pub use commands::builtin_registry;
pub use content::{Content, Line, Span, Style};
pub use dispatcher::{Outcome, Terminal};
pub use history::HistoryBuffer;
pub use registry::{
    Command, CommandContext, CommandInfo, CommandRegistry, CommandResult, Control, Resolved,
};
pub use request::CommandRequest;
pub use transcript::{EntryKind, Transcript, TranscriptEntry};
