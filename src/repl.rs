//! Interactive shell around a [`Terminal`] session.
//!
//! rustyline owns the input line. Up and Down are rebound so recall goes
//! through the session's own history buffer, and each submitted line is
//! dispatched by the session before its new transcript entries are printed.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use colored::{ColoredString, Colorize};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Context, Editor, Event, EventContext, EventHandler, Helper,
    KeyCode, KeyEvent, Modifiers, Movement, RepeatCount,
};

use crate::terminal::{Content, EntryKind, Span, Style, Terminal, Transcript, TranscriptEntry};

const PROMPT: &str = "guest@folio:~$ ";

type Session = Arc<Mutex<Terminal>>;

fn lock(session: &Session) -> std::sync::MutexGuard<'_, Terminal> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Completion, hints and prompt coloring for command names.
struct ShellHelper {
    commands: Vec<String>,
}

impl ShellHelper {
    fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }

    fn matching<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.commands.iter().filter(move |cmd| cmd.starts_with(prefix))
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let start = line.rfind(char::is_whitespace).map_or(0, |i| i + 1);
        let words = line.split_whitespace().count();

        // The command itself, or the topic after `help`.
        let completes_name = match words {
            0 => true,
            1 => start == 0 || line.trim_start().to_lowercase().starts_with("help"),
            2 => start > 0 && line.trim_start().to_lowercase().starts_with("help "),
            _ => false,
        };
        if !completes_name {
            return Ok((pos, vec![]));
        }

        let prefix = line[start..].to_lowercase();
        let candidates = self
            .matching(&prefix)
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.is_empty() || line.contains(char::is_whitespace) {
            return None;
        }
        let prefix = line.to_lowercase();
        let hint = self
            .matching(&prefix)
            .find(|cmd| cmd.len() > prefix.len())
            .map(|cmd| cmd[prefix.len()..].to_string());
        hint
    }
}

impl Highlighter for ShellHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        match prompt.strip_prefix("guest@folio:~") {
            Some(rest) => Owned(format!(
                "{}@{}:{}{}",
                "guest".magenta(),
                "folio".green(),
                "~".blue(),
                rest
            )),
            None => Borrowed(prompt),
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }
}

impl Validator for ShellHelper {}

/// Up/Down handler that recalls through the session history.
struct Recall {
    session: Session,
    older: bool,
}

impl ConditionalEventHandler for Recall {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        let mut term = lock(&self.session);
        // Keep whatever was typed when nothing is being browsed.
        term.set_pending(ctx.line());
        let text = if self.older {
            term.recall_older()
        } else {
            term.recall_newer()
        };
        Some(Cmd::Replace(Movement::WholeLine, Some(text.to_string())))
    }
}

/// Tracks how much of the transcript has been printed.
#[derive(Debug, Default)]
struct View {
    printed: u64,
    generation: u64,
}

impl View {
    /// Entries appended since the last call. A clear resets the screen.
    fn pending<'t>(&mut self, transcript: &'t Transcript) -> Vec<&'t TranscriptEntry> {
        let fresh = if transcript.generation() != self.generation {
            self.generation = transcript.generation();
            print!("\x1B[2J\x1B[H");
            transcript.len()
        } else {
            (transcript.appended() - self.printed) as usize
        };
        self.printed = transcript.appended();
        let skip = transcript.len().saturating_sub(fresh);
        transcript.iter().skip(skip).collect()
    }
}

fn paint(span: &Span) -> ColoredString {
    let text = span.text.as_str();
    match span.style {
        Style::Plain => text.normal(),
        Style::Heading => text.bright_green().bold(),
        Style::Accent => text.cyan(),
        Style::Label => text.yellow(),
        Style::Link => text.blue().underline(),
        Style::Muted => text.bright_black(),
    }
}

fn print_entry(entry: &TranscriptEntry) {
    match (&entry.kind, &entry.content) {
        // rustyline already echoed the line.
        (EntryKind::Input, _) => {}
        (EntryKind::Error, content) => {
            for line in content.plain_text().lines() {
                println!("{}", line.red());
            }
        }
        (EntryKind::Output, Content::Text(text)) => println!("{text}"),
        (EntryKind::Output, Content::Block(lines)) => {
            for line in lines {
                let painted: String = line.spans.iter().map(|s| paint(s).to_string()).collect();
                println!("{painted}");
            }
        }
    }
    if entry.kind != EntryKind::Input {
        println!();
    }
}

/// Run the shell until `exit`, `gui`, Ctrl-D or a read error.
///
/// Blocks the calling thread; run it off the async runtime.
pub fn run(terminal: Terminal) -> Result<()> {
    let exit = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&exit);
    let mut terminal = terminal.on_exit(move || flag.store(true, Ordering::SeqCst));
    terminal.welcome();

    let commands = terminal.registry().names();
    let session: Session = Arc::new(Mutex::new(terminal));

    let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ShellHelper::new(commands)));
    for (code, older) in [(KeyCode::Up, true), (KeyCode::Down, false)] {
        rl.bind_sequence(
            KeyEvent(code, Modifiers::NONE),
            EventHandler::Conditional(Box::new(Recall {
                session: Arc::clone(&session),
                older,
            })),
        );
    }

    let mut view = View::default();
    for entry in view.pending(lock(&session).transcript()) {
        print_entry(entry);
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let mut term = lock(&session);
                term.submit(&line);
                for entry in view.pending(term.transcript()) {
                    print_entry(entry);
                }
                if exit.load(Ordering::SeqCst) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("{}", "Leaving terminal mode.".bright_black());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::Line;

    fn helper() -> ShellHelper {
        ShellHelper::new(vec![
            "help".to_string(),
            "projects".to_string(),
            "skills".to_string(),
        ])
    }

    fn complete(line: &str) -> (usize, Vec<String>) {
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, pairs) = helper().complete(line, line.len(), &ctx).unwrap();
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn completes_command_names() {
        assert_eq!(complete("pro"), (0, vec!["projects".to_string()]));
        assert_eq!(complete("SK"), (0, vec!["skills".to_string()]));
    }

    #[test]
    fn completes_help_topics() {
        assert_eq!(complete("help sk"), (5, vec!["skills".to_string()]));
        assert_eq!(complete("skills fr").1, Vec::<String>::new());
    }

    #[test]
    fn hints_remaining_characters() {
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        assert_eq!(helper().hint("proj", 4, &ctx), Some("ects".to_string()));
        assert_eq!(helper().hint("projects", 8, &ctx), None);
        assert_eq!(helper().hint("help p", 6, &ctx), None);
    }

    #[test]
    fn view_reports_only_new_entries() {
        let mut transcript = Transcript::new();
        let mut view = View::default();
        transcript.append(TranscriptEntry::input("help"));
        transcript.append(TranscriptEntry::output(Content::block(vec![Line::plain("x")])));
        assert_eq!(view.pending(&transcript).len(), 2);

        transcript.append(TranscriptEntry::input("about"));
        let fresh = view.pending(&transcript);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].kind, EntryKind::Input);
        assert!(view.pending(&transcript).is_empty());
    }
}
