//! Assessment state: ratings and focus flags, persisted on every change.
//!
//! The two maps live under independent keys so damage to one blob never
//! costs the other. Loading never fails: anything unreadable is treated as
//! "no prior state" for that key alone. Writes are synchronous and
//! best-effort; a failed write is logged and reported as an event, and the
//! in-memory change stands.

pub mod kv;

pub use kv::{FileStore, KeyValueStore, MemoryStore};

use crate::events::{Event, EventBus};
use crate::rating::Rating;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Storage key for the ratings map
pub const RATINGS_KEY: &str = "matrix_ratings";
/// Storage key for the focus-areas map
pub const FOCUS_KEY: &str = "matrix_focus";

/// Question put to the user before [`AssessmentStore::reset_all`] acts
pub const RESET_PROMPT: &str =
    "Are you sure you want to clear all ratings and focus areas? This will reset your entire assessment.";

/// Skill id -> explicit rating. Unrated skills have no entry.
pub type RatingsMap = BTreeMap<String, Rating>;
/// Skill id -> focus flag. A missing entry means not focused.
pub type FocusAreasMap = BTreeMap<String, bool>;

pub struct AssessmentStore {
    kv: Box<dyn KeyValueStore>,
    ratings: RatingsMap,
    focus: FocusAreasMap,
    events: Option<Arc<EventBus>>,
}

impl AssessmentStore {
    /// Load both maps from `kv`, falling back to empty per map
    pub fn load(kv: impl KeyValueStore + 'static) -> Self {
        Self::load_inner(Box::new(kv), None)
    }

    /// Like [`load`](Self::load), reporting recoveries and later changes on `events`
    pub fn load_with_events(kv: impl KeyValueStore + 'static, events: Arc<EventBus>) -> Self {
        Self::load_inner(Box::new(kv), Some(events))
    }

    fn load_inner(kv: Box<dyn KeyValueStore>, events: Option<Arc<EventBus>>) -> Self {
        let mut store = Self {
            kv,
            ratings: RatingsMap::new(),
            focus: FocusAreasMap::new(),
            events,
        };

        if let Some(raw) = store.read_key(RATINGS_KEY) {
            match parse_ratings(&raw) {
                Ok(ratings) => store.ratings = ratings,
                Err(reason) => store.recovered(RATINGS_KEY, &reason),
            }
        }
        if let Some(raw) = store.read_key(FOCUS_KEY) {
            match parse_focus(&raw) {
                Ok(focus) => store.focus = focus,
                Err(reason) => store.recovered(FOCUS_KEY, &reason),
            }
        }

        tracing::debug!(
            ratings = store.ratings.len(),
            focus = store.focus.len(),
            "assessment loaded"
        );
        store
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.kv.get(key) {
            Ok(Some(raw)) if raw.trim().is_empty() => None,
            Ok(raw) => raw,
            Err(e) => {
                self.recovered(key, &format!("{:#}", e));
                None
            }
        }
    }

    fn recovered(&self, key: &str, reason: &str) {
        tracing::warn!(key, reason, "ignoring unreadable stored state");
        self.emit(Event::state_recovered(key, reason));
    }

    fn emit(&self, event: Event) {
        if let Some(bus) = &self.events {
            bus.emit(event);
        }
    }

    pub fn rating(&self, skill_id: &str) -> Option<Rating> {
        self.ratings.get(skill_id).copied()
    }

    pub fn is_focused(&self, skill_id: &str) -> bool {
        self.focus.get(skill_id).copied().unwrap_or(false)
    }

    pub fn ratings(&self) -> &RatingsMap {
        &self.ratings
    }

    pub fn focus_areas(&self) -> &FocusAreasMap {
        &self.focus
    }

    /// Set `rating`, or clear it if it is already the current value.
    /// Returns the rating now in effect.
    pub fn set_rating(&mut self, skill_id: &str, rating: Rating) -> Option<Rating> {
        let previous = self.rating(skill_id);
        let next = if previous == Some(rating) {
            self.ratings.remove(skill_id);
            None
        } else {
            self.ratings.insert(skill_id.to_string(), rating);
            Some(rating)
        };

        self.persist_ratings();
        self.emit(Event::rating_changed(skill_id, previous, next));
        next
    }

    /// Flip the focus flag. Returns the new value.
    pub fn toggle_focus(&mut self, skill_id: &str) -> bool {
        let focused = !self.is_focused(skill_id);
        self.focus.insert(skill_id.to_string(), focused);

        self.persist_focus();
        self.emit(Event::focus_toggled(skill_id, focused));
        focused
    }

    /// Clear every rating and focus flag once `confirm` accepts
    /// [`RESET_PROMPT`]. Returns whether anything was reset.
    pub fn reset_all<F>(&mut self, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(RESET_PROMPT) {
            tracing::debug!("reset declined");
            return false;
        }

        let ratings_cleared = self.ratings.len();
        let focus_cleared = self.focus.len();
        self.ratings.clear();
        self.focus.clear();

        self.persist_ratings();
        self.persist_focus();
        self.emit(Event::assessment_reset(ratings_cleared, focus_cleared));
        true
    }

    fn persist_ratings(&self) {
        let blob = serde_json::to_string(&self.ratings);
        self.persist(RATINGS_KEY, blob);
    }

    fn persist_focus(&self) {
        let blob = serde_json::to_string(&self.focus);
        self.persist(FOCUS_KEY, blob);
    }

    fn persist(&self, key: &str, blob: serde_json::Result<String>) {
        let result = blob
            .map_err(anyhow::Error::from)
            .and_then(|json| self.kv.set(key, &json));
        if let Err(e) = result {
            let error = format!("{:#}", e);
            tracing::warn!(key, error = %error, "failed to persist assessment state");
            self.emit(Event::persist_failed(key, &error));
        }
    }
}

/// Accepts a flat JSON object. `null` values and unknown tokens load as
/// unrated; anything that is not an object is rejected as a whole.
fn parse_ratings(raw: &str) -> Result<RatingsMap, String> {
    let entries: BTreeMap<String, Value> =
        serde_json::from_str(raw).map_err(|e| e.to_string())?;

    let mut ratings = RatingsMap::new();
    for (id, value) in entries {
        match value {
            Value::Null => {}
            other => match serde_json::from_value::<Rating>(other) {
                Ok(rating) => {
                    ratings.insert(id, rating);
                }
                Err(_) => tracing::debug!(skill_id = %id, "dropping unrecognised rating token"),
            },
        }
    }
    Ok(ratings)
}

fn parse_focus(raw: &str) -> Result<FocusAreasMap, String> {
    let entries: BTreeMap<String, Value> =
        serde_json::from_str(raw).map_err(|e| e.to_string())?;

    Ok(entries
        .into_iter()
        .filter_map(|(id, value)| value.as_bool().map(|flag| (id, flag)))
        .collect())
}
