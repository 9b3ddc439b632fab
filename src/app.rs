//! Wiring shared by one-shot commands and the interactive session.

use crate::catalog::{Catalog, CatalogEntry};
use crate::cli::Args;
use crate::config::Config;
use crate::events::{self, EventBus};
use crate::rating::Rating;
use crate::report::delivery::{Exporter, SystemClipboard};
use crate::report::Report;
use crate::store::{AssessmentStore, FileStore, MemoryStore};
use crate::view::{self, Summary};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Fallback state directory when the platform has no data dir
const FALLBACK_DATA_DIR: &str = ".capmatrix/data";

pub struct App {
    pub catalog: Catalog,
    pub store: AssessmentStore,
    pub config: Config,
    events: Arc<EventBus>,
    clipboard: SystemClipboard,
    data_dir: Option<PathBuf>,
}

impl App {
    /// Resolve catalog and storage from flags and config, then load state
    pub fn open(args: &Args, config: Config) -> Result<Self> {
        let catalog_path = args.catalog.as_ref().or(config.catalog.path.as_ref());
        let catalog = match catalog_path {
            Some(path) => Catalog::load_from(path)
                .with_context(|| format!("failed to load catalog {}", path.display()))?,
            None => Catalog::builtin().context("built-in catalog is invalid")?,
        };

        let events = EventBus::new();
        events.subscribe(events::log_event);

        let (store, data_dir) = if args.ephemeral {
            (
                AssessmentStore::load_with_events(MemoryStore::new(), Arc::clone(&events)),
                None,
            )
        } else {
            let dir = args
                .data_dir
                .clone()
                .or_else(|| config.storage.dir.clone())
                .or_else(FileStore::default_dir)
                .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR));
            tracing::debug!(dir = %dir.display(), "using assessment storage");
            (
                AssessmentStore::load_with_events(FileStore::new(&dir), Arc::clone(&events)),
                Some(dir),
            )
        };

        Ok(Self::with_parts(catalog, store, config, events, data_dir))
    }

    pub fn with_parts(
        catalog: Catalog,
        store: AssessmentStore,
        config: Config,
        events: Arc<EventBus>,
        data_dir: Option<PathBuf>,
    ) -> Self {
        let clipboard = SystemClipboard::new(config.export.clipboard_command.as_deref());
        Self {
            catalog,
            store,
            config,
            events,
            clipboard,
            data_dir,
        }
    }

    /// Where state is saved; `None` for ephemeral sessions
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// A catalog skill by id, or a helpful error
    pub fn skill(&self, id: &str) -> Result<CatalogEntry<'_>> {
        view::find_skill(&self.catalog, id)
            .ok_or_else(|| anyhow!("unknown skill '{}' (use `list` to see skill ids)", id))
    }

    pub fn summary(&self) -> Summary {
        Summary::compute(&self.catalog, self.store.ratings(), self.store.focus_areas())
    }

    /// Apply toggle-rating semantics and describe the outcome
    pub fn rate(&mut self, id: &str, rating: &str) -> Result<String> {
        let rating: Rating = rating.parse()?;
        let name = self.skill(id)?.skill.name.clone();

        Ok(match self.store.set_rating(id, rating) {
            Some(now) => format!("{}: rated {}", name, now.label()),
            None => format!("{}: rating cleared", name),
        })
    }

    pub fn toggle_focus(&mut self, id: &str) -> Result<String> {
        let name = self.skill(id)?.skill.name.clone();
        Ok(if self.store.toggle_focus(id) {
            format!("{}: marked as focus area", name)
        } else {
            format!("{}: focus area removed", name)
        })
    }

    /// Reset after confirmation; `assume_yes` skips the prompt
    pub fn reset(&mut self, assume_yes: bool) -> String {
        let done = self.store.reset_all(|prompt| assume_yes || confirm(prompt));
        if done {
            "Assessment reset: all ratings and focus areas cleared.".to_string()
        } else {
            "Reset cancelled; nothing was changed.".to_string()
        }
    }

    pub fn report(&self) -> Report {
        let today = chrono::Local::now().date_naive();
        Report::build(
            &self.catalog,
            &self.store,
            today,
            &self.config.export.date_format,
        )
    }

    fn exporter(&self, out_dir: PathBuf) -> Exporter<'_> {
        Exporter::new(&self.clipboard, out_dir).with_events(Arc::clone(&self.events))
    }

    pub fn copy_report(&self) -> Result<String> {
        let report = self.report();
        let via = self
            .exporter(self.config.export_dir())
            .copy(&report)
            .context("could not copy results to the clipboard")?;
        Ok(format!(
            "Results copied to clipboard ({} skills, via {}).",
            report.rows.len(),
            via
        ))
    }

    pub fn export_csv(&self, out: Option<&Path>) -> Result<PathBuf> {
        let dir = out
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.export_dir());
        let path = self
            .exporter(dir)
            .export_csv(&self.report())
            .context("could not export CSV")?;
        Ok(path)
    }
}

/// Ask on the terminal; anything but an explicit yes declines
fn confirm(prompt: &str) -> bool {
    match dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
    {
        Ok(answer) => answer,
        Err(e) => {
            tracing::debug!(error = %e, "confirmation unavailable, treating as no");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let events = EventBus::new();
        let store = AssessmentStore::load_with_events(MemoryStore::new(), Arc::clone(&events));
        App::with_parts(
            Catalog::builtin().unwrap(),
            store,
            Config::default(),
            events,
            None,
        )
    }

    #[test]
    fn test_rate_messages_follow_toggle() {
        let mut app = app();
        assert_eq!(app.rate("gen_2", "basic").unwrap(), "Leadership: rated Basic");
        assert_eq!(app.rate("gen_2", "BASIC").unwrap(), "Leadership: rating cleared");
        assert_eq!(app.summary().unrated, app.catalog.total_skills());
    }

    #[test]
    fn test_unknown_skill_and_rating_are_rejected() {
        let mut app = app();
        assert!(app.rate("nope", "basic").is_err());
        assert!(app.rate("gen_2", "expert").is_err());
        assert!(app.toggle_focus("nope").is_err());
        assert!(app.store.ratings().is_empty());
        assert!(app.store.focus_areas().is_empty());
    }

    #[test]
    fn test_reset_with_assume_yes() {
        let mut app = app();
        app.rate("ed_1", "advanced").unwrap();
        app.toggle_focus("ed_2").unwrap();
        assert!(app.reset(true).starts_with("Assessment reset"));
        assert_eq!(app.summary().focused, 0);
        assert_eq!(app.summary().completion_percent(), 0);
    }

    #[test]
    fn test_export_csv_to_explicit_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.rate("ed_1", "na").unwrap();

        let path = app.export_csv(Some(dir.path())).unwrap();
        let csv = std::fs::read_to_string(path).unwrap();
        assert!(csv.contains("\"Experience Design\",\"Problem Framing & Systems Thinking\",\"Problem framing\",\"N/A\",\"-\""));
    }
}
