//! Line-oriented front-end.
//!
//! Each stdin line is either query text or a `:command`. Snapshots are
//! rendered as a plain-text panel.

use std::fmt::Write as _;

use probe_core::{DisplayEntry, NavigationError};
use thiserror::Error;

use crate::model::{NoResultsReason, Phase, SessionSnapshot};
use crate::session::Navigator;

pub const HELP: &str = "\
Type to search. Commands:
  :select <id>   choose a candidate by id
  :key <name>    press a key (Enter, ArrowUp, ArrowDown, Escape)
  :clear         clear the query
  :help          show this help
  :quit          exit
Start a line with '::' to search for text beginning with ':'.";

// =============================================================================
// Commands
// =============================================================================

/// One parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    Input(String),
    Select(String),
    Key(String),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Unknown command: :{0} (try :help)")]
    UnknownCommand(String),

    #[error(":{0} needs an argument")]
    MissingArgument(&'static str),
}

impl PromptCommand {
    pub fn parse(line: &str) -> Result<Self, PromptError> {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(text) = line.strip_prefix("::") {
            return Ok(Self::Input(format!(":{}", text)));
        }

        let Some(command) = line.strip_prefix(':') else {
            return Ok(Self::Input(line.to_string()));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "select" | "s" => required(arg, "select").map(Self::Select),
            "key" | "k" => required(arg, "key").map(Self::Key),
            "clear" | "c" => Ok(Self::Input(String::new())),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(PromptError::UnknownCommand(other.to_string())),
        }
    }
}

fn required(arg: &str, name: &'static str) -> Result<String, PromptError> {
    if arg.is_empty() {
        Err(PromptError::MissingArgument(name))
    } else {
        Ok(arg.to_string())
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Render a snapshot as a text panel.
pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();

    let intent = snapshot.intent.as_str();
    if intent.is_empty() {
        let _ = writeln!(out, "> {}", snapshot.query);
    } else {
        let _ = writeln!(out, "[{}] {}", intent, snapshot.query);
    }

    if snapshot.no_results_flash {
        let message = match snapshot.no_results_reason {
            Some(NoResultsReason::FetchFailure) => "No results (search failed)",
            _ => "No results",
        };
        let _ = writeln!(out, "  {}", message);
        return out;
    }

    if snapshot.is_loading && !snapshot.is_open {
        let _ = writeln!(out, "  Searching...");
        return out;
    }

    if !snapshot.is_open {
        return out;
    }

    for entry in snapshot.display_list.entries() {
        match entry {
            DisplayEntry::Header(header) => {
                let _ = writeln!(out, "  {}", header.title);
            }
            DisplayEntry::Candidate(candidate) => {
                let marker = if snapshot.highlighted.as_deref() == Some(candidate.id.as_ref()) {
                    '>'
                } else {
                    ' '
                };
                let _ = write!(out, "  {} {}", marker, candidate.title);
                if !candidate.subtitle.is_empty() {
                    let _ = write!(out, "  ({})", candidate.subtitle);
                }
                let _ = writeln!(out, "  [{}]", candidate.id);
            }
        }
    }

    if snapshot.phase == Phase::Loading {
        let _ = writeln!(out, "  Searching...");
    }

    out
}

// =============================================================================
// Navigator
// =============================================================================

/// Navigator that prints the console URL it would open.
pub struct ConsoleNavigator {
    base_url: String,
}

impl ConsoleNavigator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Full URL for a console path. Absolute URLs pass through.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, path: &str) -> Result<(), NavigationError> {
        if path.is_empty() {
            return Err(NavigationError::Rejected {
                path: path.to_string(),
                reason: "empty path".to_string(),
            });
        }
        println!("Open {}", self.url_for(path));
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
