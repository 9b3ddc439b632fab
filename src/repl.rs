//! Interactive session: browse tabs, search, rate and export from a prompt.
//!
//! The active tab and search text are session-only state. Ratings and focus
//! flags go straight through [`crate::store::AssessmentStore`], so every
//! change is saved the moment it is made.

use crate::app::App;
use crate::render;
use crate::view;
use anyhow::{bail, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

const HISTORY_FILE: &str = "history.txt";

const HELP: &str = "\
Commands:
  tabs                      list disciplines
  tab <id>                  switch discipline (clears the search)
  search <text>             filter skills by name or behaviour
  clear                     clear the search
  list                      show skills of the current discipline
  show <skill>              behaviours or proficiency rubric of a skill
  rate <skill> <rating>     na | basic | intermediate | advanced (repeat to clear)
  focus <skill>             toggle focus area
  summary                   counts and completion
  copy                      copy the results to the clipboard
  export [dir]              write the CSV report
  reset                     clear all ratings and focus areas
  help                      this text
  quit                      leave";

/// A parsed session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Tabs,
    Tab(String),
    Search(String),
    Clear,
    List,
    Show(String),
    Rate { skill: String, rating: String },
    Focus(String),
    Summary,
    Copy,
    Export(Option<PathBuf>),
    Reset,
    Quit,
}

/// Parse one input line; `Ok(None)` for a blank line
pub fn parse_command(line: &str) -> Result<Option<ReplCommand>> {
    let words = shell_words::split(line)?;
    let Some((head, rest)) = words.split_first() else {
        return Ok(None);
    };

    let one = |what: &str| -> Result<String> {
        match rest {
            [arg] => Ok(arg.clone()),
            _ => bail!("usage: {} <{}>", head, what),
        }
    };

    let command = match head.to_lowercase().as_str() {
        "help" | "?" => ReplCommand::Help,
        "tabs" => ReplCommand::Tabs,
        "tab" => ReplCommand::Tab(one("tab id")?),
        // Search text may contain spaces without quoting
        "search" | "/" => ReplCommand::Search(rest.join(" ")),
        "clear" => ReplCommand::Clear,
        "list" | "ls" => ReplCommand::List,
        "show" => ReplCommand::Show(one("skill id")?),
        "rate" => match rest {
            [skill, rating] => ReplCommand::Rate {
                skill: skill.clone(),
                rating: rating.clone(),
            },
            _ => bail!("usage: rate <skill id> <na|basic|intermediate|advanced>"),
        },
        "focus" => ReplCommand::Focus(one("skill id")?),
        "summary" => ReplCommand::Summary,
        "copy" => ReplCommand::Copy,
        "export" => match rest {
            [] => ReplCommand::Export(None),
            [dir] => ReplCommand::Export(Some(PathBuf::from(dir))),
            _ => bail!("usage: export [dir]"),
        },
        "reset" => ReplCommand::Reset,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => bail!("unknown command '{}' (try `help`)", other),
    };
    Ok(Some(command))
}

/// Transient view selection, never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub active_tab: Option<String>,
    pub search: String,
}

impl ViewState {
    pub fn switch_tab(&mut self, tab_id: &str) {
        self.active_tab = Some(tab_id.to_string());
        self.search.clear();
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
    }
}

/// Execute one command against the app; `Ok(None)` means quit
pub fn execute(
    app: &mut App,
    state: &mut ViewState,
    command: ReplCommand,
) -> Result<Option<String>> {
    let output = match command {
        ReplCommand::Help => HELP.to_string(),
        ReplCommand::Tabs => {
            let active = view::resolve_tab(&app.catalog, state.active_tab.as_deref());
            render::tabs(&view::visible_tabs(&app.catalog), active)
        }
        ReplCommand::Tab(id) => {
            let Some(tab) = app.catalog.tab(&id) else {
                bail!("unknown tab '{}' (use `tabs` to list them)", id);
            };
            if !tab.is_visible() {
                bail!("tab '{}' has no skills defined yet", id);
            }
            state.switch_tab(&tab.id);
            list(app, state)
        }
        ReplCommand::Search(query) => {
            state.set_search(&query);
            list(app, state)
        }
        ReplCommand::Clear => {
            state.set_search("");
            list(app, state)
        }
        ReplCommand::List => list(app, state),
        ReplCommand::Show(id) => render::skill_detail(&app.skill(&id)?, &app.store),
        ReplCommand::Rate { skill, rating } => app.rate(&skill, &rating)?,
        ReplCommand::Focus(skill) => app.toggle_focus(&skill)?,
        ReplCommand::Summary => render::summary(&app.summary()),
        ReplCommand::Copy => app.copy_report()?,
        ReplCommand::Export(dir) => {
            let path = app.export_csv(dir.as_deref())?;
            format!("Exported {}", path.display())
        }
        ReplCommand::Reset => app.reset(false),
        ReplCommand::Quit => return Ok(None),
    };
    Ok(Some(output))
}

fn list(app: &App, state: &ViewState) -> String {
    let tab = view::resolve_tab(&app.catalog, state.active_tab.as_deref());
    let groups = view::filter_groups(tab, &state.search);
    let heading = if state.search.trim().is_empty() {
        format!("== {} ==", tab.label)
    } else {
        format!("== {} (search: \"{}\") ==", tab.label, state.search.trim())
    };
    format!("{}\n{}", heading, render::groups(&groups, &app.store, &state.search))
}

/// Run the prompt loop until `quit` or end of input
pub fn run(app: &mut App) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let history = app.data_dir().map(|dir| dir.join(HISTORY_FILE));
    if let Some(path) = &history {
        // Missing on first run
        let _ = editor.load_history(path);
    }

    let mut state = ViewState::default();
    println!("{}", render::summary(&app.summary()));
    println!("\n{}", list(app, &state));
    println!("\nType `help` for commands.");

    loop {
        let prompt = {
            let tab = view::resolve_tab(&app.catalog, state.active_tab.as_deref());
            format!("{}> ", tab.id)
        };

        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match execute(app, &mut state, command) {
            Ok(Some(output)) => println!("{}", output),
            Ok(None) => break,
            Err(e) => eprintln!("error: {:#}", e),
        }
    }

    if let Some(path) = &history {
        if let Err(e) = editor.save_history(path) {
            tracing::debug!(error = %e, "could not save history");
        }
    }
    Ok(())
}
