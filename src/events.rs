//! Assessment change events.
//!
//! The store and the export paths describe what they did as typed events
//! on an [`EventBus`]. Listeners run synchronously on the emitting thread,
//! in subscription order; the binary attaches one that forwards every
//! event to `tracing`.
//!
//! ## Event Categories
//!
//! - **Store**: rating and focus mutations, resets, failed writes
//! - **Export**: clipboard copies and CSV files
//!
//! ## Usage
//!
//! ```ignore
//! use capmatrix::events::EventBus;
//!
//! let bus = EventBus::new();
//! bus.subscribe(|event| {
//!     println!("[{}] {:?}", event.subsystem, event.event_type);
//! });
//! let store = AssessmentStore::load_with_events(kv, bus.clone());
//! ```

use crate::rating::Rating;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Monotonically increasing sequence counter for event ordering
static EVENT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn next_sequence() -> u64 {
    EVENT_SEQUENCE.fetch_add(1, Ordering::SeqCst)
}

fn timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    /// Assessment state and its persistence
    Store,
    /// Clipboard and CSV delivery
    Export,
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Subsystem::Store => "store",
            Subsystem::Export => "export",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventType {
    // Store events
    RatingChanged {
        skill_id: String,
        from: Option<Rating>,
        to: Option<Rating>,
    },
    FocusToggled {
        skill_id: String,
        focused: bool,
    },
    AssessmentReset {
        ratings_cleared: usize,
        focus_cleared: usize,
    },
    StateRecovered {
        key: String,
        reason: String,
    },
    PersistFailed {
        key: String,
        error: String,
    },

    // Export events
    ReportCopied {
        command: String,
        rows: usize,
    },
    ReportExported {
        path: String,
        rows: usize,
    },
    ExportFailed {
        target: String,
        error: String,
    },
}

/// A single event with metadata
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Monotonic sequence number for ordering
    pub seq: u64,
    /// Timestamp in milliseconds since epoch
    pub timestamp_ms: u64,
    pub subsystem: Subsystem,
    #[serde(flatten)]
    pub event_type: EventType,
}

impl Event {
    pub fn new(subsystem: Subsystem, event_type: EventType) -> Self {
        Self {
            seq: next_sequence(),
            timestamp_ms: timestamp_ms(),
            subsystem,
            event_type,
        }
    }

    pub fn rating_changed(skill_id: &str, from: Option<Rating>, to: Option<Rating>) -> Self {
        Self::new(
            Subsystem::Store,
            EventType::RatingChanged {
                skill_id: skill_id.to_string(),
                from,
                to,
            },
        )
    }

    pub fn focus_toggled(skill_id: &str, focused: bool) -> Self {
        Self::new(
            Subsystem::Store,
            EventType::FocusToggled {
                skill_id: skill_id.to_string(),
                focused,
            },
        )
    }

    pub fn assessment_reset(ratings_cleared: usize, focus_cleared: usize) -> Self {
        Self::new(
            Subsystem::Store,
            EventType::AssessmentReset {
                ratings_cleared,
                focus_cleared,
            },
        )
    }

    pub fn state_recovered(key: &str, reason: &str) -> Self {
        Self::new(
            Subsystem::Store,
            EventType::StateRecovered {
                key: key.to_string(),
                reason: reason.to_string(),
            },
        )
    }

    pub fn persist_failed(key: &str, error: &str) -> Self {
        Self::new(
            Subsystem::Store,
            EventType::PersistFailed {
                key: key.to_string(),
                error: error.to_string(),
            },
        )
    }

    pub fn report_copied(command: &str, rows: usize) -> Self {
        Self::new(
            Subsystem::Export,
            EventType::ReportCopied {
                command: command.to_string(),
                rows,
            },
        )
    }

    pub fn report_exported(path: &str, rows: usize) -> Self {
        Self::new(
            Subsystem::Export,
            EventType::ReportExported {
                path: path.to_string(),
                rows,
            },
        )
    }

    pub fn export_failed(target: &str, error: &str) -> Self {
        Self::new(
            Subsystem::Export,
            EventType::ExportFailed {
                target: target.to_string(),
                error: error.to_string(),
            },
        )
    }
}

/// Event listener callback type
pub type EventListener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Synchronous pub/sub bus
pub struct EventBus {
    listeners: RwLock<Vec<EventListener>>,
}

impl EventBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Subscribe to all events
    pub fn subscribe<F>(&self, listener: F) -> usize
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        let id = listeners.len();
        listeners.push(Arc::new(listener));
        id
    }

    /// Deliver an event to every listener before returning
    pub fn emit(&self, event: Event) {
        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());

        for listener in listeners.iter() {
            // A panicking listener must not take the mutation down with it
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                listener(&event);
            }));
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }
}

/// Listener that forwards events to `tracing`. The store already warns
/// about its own recoveries and failed writes, so those stay at debug here.
pub fn log_event(event: &Event) {
    match &event.event_type {
        EventType::ExportFailed { target, error } => {
            tracing::warn!(seq = event.seq, export_target = %target, error = %error, "export failed");
        }
        other => {
            tracing::debug!(seq = event.seq, subsystem = %event.subsystem, event = ?other, "event");
        }
    }
}
