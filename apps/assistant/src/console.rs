//! Line-oriented terminal front-end: command parsing, transcript rendering
//! and opening generated sites.

use anyhow::Result;
use async_trait::async_trait;
use client_core::{message_log::render_entry, LogEvent, RawForm, SitePresenter};
use tokio::sync::broadcast;
use tracing::{info, warn};

pub const HELP: &str = "\
Commands:
  industry <text>       set the industry
  goals <text>          set your goals
  competitors <a, b>    comma separated competitor names
  projects <text>       project descriptions (use \\n for a line break)
  theme <id>            theme used for advice and site builds (modern, minimalistic, bold)
  show                  print the current form
  submit                ask for portfolio advice
  build                 generate a site from the last advice
  log                   reprint the transcript
  help                  show this help
  quit                  wait for running requests and exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Industry,
    Goals,
    Competitors,
    Projects,
    Theme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(Field, String),
    Show,
    Submit,
    Build,
    Log,
    Help,
    Quit,
}

/// `Ok(None)` for blank input.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "industry" => Command::Set(Field::Industry, rest.to_string()),
        "goals" => Command::Set(Field::Goals, rest.to_string()),
        "competitors" => Command::Set(Field::Competitors, rest.to_string()),
        "projects" => Command::Set(Field::Projects, unescape_newlines(rest)),
        "theme" => Command::Set(Field::Theme, rest.to_string()),
        "show" => Command::Show,
        "submit" => Command::Submit,
        "build" => Command::Build,
        "log" => Command::Log,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?}; type `help`")),
    };
    Ok(Some(command))
}

pub fn apply_field(form: &mut RawForm, field: Field, value: String) {
    match field {
        Field::Industry => form.industry = value,
        Field::Goals => form.goals = value,
        Field::Competitors => form.competitors = value,
        Field::Projects => form.project_descriptions = value,
        Field::Theme => form.theme = value,
    }
}

pub fn describe_form(form: &RawForm) -> String {
    format!(
        "industry:    {}\ngoals:       {}\ncompetitors: {}\nprojects:    {}\ntheme:       {}",
        form.industry,
        form.goals,
        form.competitors,
        form.project_descriptions.replace('\n', "\\n"),
        form.theme,
    )
}

fn unescape_newlines(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Prints log changes as they happen. Returns once the log is dropped.
pub async fn render_events(mut events: broadcast::Receiver<LogEvent>) {
    loop {
        match events.recv().await {
            Ok(LogEvent::Appended(entry)) | Ok(LogEvent::PendingUpdated(entry)) => {
                println!("{}", render_entry(&entry));
            }
            Ok(LogEvent::PendingRemoved { .. }) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "transcript renderer fell behind; use `log` to reprint");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

pub struct ConsolePresenter {
    open_in_browser: bool,
}

impl ConsolePresenter {
    pub fn new(open_in_browser: bool) -> Self {
        Self { open_in_browser }
    }
}

#[async_trait]
impl SitePresenter for ConsolePresenter {
    async fn present(&self, location: &str) -> Result<()> {
        println!("Open site: {location}");
        if !self.open_in_browser {
            return Ok(());
        }
        let target = location.to_string();
        tokio::task::spawn_blocking(move || open::that(target)).await??;
        info!(%location, "opened generated site");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
