//! Error types for catalog loading, rating input and report delivery.
//!
//! Persistence has no error type here: the assessment store recovers from
//! unreadable state and logs failed writes.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("catalog defines no tabs")]
    NoTabs,

    #[error("duplicate tab id '{0}'")]
    DuplicateTabId(String),

    #[error("duplicate skill id '{id}' (first in tab '{first_tab}', again in tab '{second_tab}')")]
    DuplicateSkillId {
        id: String,
        first_tab: String,
        second_tab: String,
    },

    #[error("empty id or name: {0}")]
    MissingField(String),

    #[error("skill '{skill}' in {kind} tab '{tab}': {reason}")]
    DetailMismatch {
        skill: String,
        tab: String,
        kind: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no clipboard helper available (tried: {tried})")]
    ClipboardUnavailable { tried: String },

    #[error("clipboard helper '{command}' failed: {reason}")]
    ClipboardFailed { command: String, reason: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rating text that is not one of the known tokens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rating '{0}' (expected na, basic, intermediate or advanced)")]
pub struct ParseRatingError(pub String);
