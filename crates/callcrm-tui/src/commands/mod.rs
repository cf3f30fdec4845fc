// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use crate::{app::AppState, theme::Theme};
use std::path::PathBuf;

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Quit, unless manually added calls have not been exported yet
    Quit,
    // Quit unconditionally
    Exit,
    Help,
    Theme(String),
    // Open the add-call form
    Add,
    Import(PathBuf),
    // Load a sheet; `None` falls back to `[sheets] default_url`
    Sheet(Option<String>),
    Export(PathBuf),
    Clear,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "q!" | "quit!" => Ok(Command::Exit),
            "help" => Ok(Command::Help),
            "add" => Ok(Command::Add),
            "clear" => Ok(Command::Clear),
            "theme" => {
                if rest.is_empty() {
                    Err("usage: theme <default|gruvbox>".to_string())
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            "import" | "i" => {
                if rest.is_empty() {
                    Err("usage: import <file.json>".to_string())
                } else {
                    Ok(Command::Import(PathBuf::from(rest)))
                }
            }
            "sheet" => Ok(Command::Sheet((!rest.is_empty()).then(|| rest.to_string()))),
            "export" | "w" => {
                if rest.is_empty() {
                    Err("usage: export <file.json>".to_string())
                } else {
                    Ok(Command::Export(PathBuf::from(rest)))
                }
            }
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Execute a parsed [`Command`] against the application state.
pub fn execute_command(s: &mut AppState, cmd: Command) {
    match cmd {
        Command::Quit => s.request_quit(),
        Command::Exit => {
            s.quit = true;
        }
        Command::Help => {
            s.show_help = !s.show_help;
        }
        Command::Theme(name) => match Theme::by_name(&name) {
            Some(theme) => {
                s.theme = theme;
                s.set_info(format!("Theme set to {name}."));
            }
            None => s.set_error(format!("Unknown theme {name:?} (try default or gruvbox).")),
        },
        Command::Add => s.open_form(),
        Command::Import(path) => s.import_file(&path),
        Command::Sheet(url) => s.load_sheet(url.as_deref()),
        Command::Export(path) => s.export(&path),
        Command::Clear => s.clear(),
    }
}
