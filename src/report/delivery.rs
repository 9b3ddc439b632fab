//! Getting a report out of the process: system clipboard or CSV file.
//!
//! Delivery is all-or-nothing. A clipboard copy succeeds only when the
//! helper consumed the whole text and exited cleanly; a CSV file is written
//! to a temp file and renamed into place.

use super::Report;
use crate::error::ExportError;
use crate::events::{Event, EventBus};
use crate::store::kv::write_atomic;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Destination for the plain-text report
pub trait Clipboard {
    /// Copy `text`, returning a description of the mechanism used
    fn copy(&self, text: &str) -> Result<String, ExportError>;
}

/// Pipes text into a platform clipboard helper
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard {
    /// Explicit helper from config, tried instead of the platform defaults
    command: Option<Vec<String>>,
}

impl SystemClipboard {
    pub fn new(command: Option<&str>) -> Self {
        let command = command.and_then(|c| match shell_words::split(c) {
            Ok(words) if !words.is_empty() => Some(words),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(command = c, error = %e, "ignoring unparsable clipboard command");
                None
            }
        });
        Self { command }
    }

    fn candidates(&self) -> Vec<Vec<String>> {
        if let Some(command) = &self.command {
            return vec![command.clone()];
        }

        let defaults: &[&[&str]] = if cfg!(target_os = "macos") {
            &[&["pbcopy"]]
        } else if cfg!(windows) {
            &[&["clip"]]
        } else {
            &[
                &["wl-copy"],
                &["xclip", "-selection", "clipboard"],
                &["xsel", "--clipboard", "--input"],
            ]
        };
        defaults
            .iter()
            .map(|argv| argv.iter().map(|s| s.to_string()).collect())
            .collect()
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<String, ExportError> {
        let candidates = self.candidates();

        for argv in &candidates {
            let helper = argv.join(" ");
            // Helpers like xclip fork a daemon that keeps inherited pipes
            // open, so only stdin is piped and completion is the exit status.
            let spawned = Command::new(&argv[0])
                .args(&argv[1..])
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();

            let mut child = match spawned {
                Ok(child) => child,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(helper = %helper, "clipboard helper not installed");
                    continue;
                }
                Err(e) => {
                    return Err(ExportError::ClipboardFailed {
                        command: helper,
                        reason: e.to_string(),
                    })
                }
            };

            let written = match child.stdin.take() {
                // stdin drops at the end of this arm, closing the pipe
                Some(mut stdin) => stdin.write_all(text.as_bytes()),
                None => Err(std::io::Error::other("stdin not captured")),
            };

            let status = child.wait().map_err(|e| ExportError::ClipboardFailed {
                command: helper.clone(),
                reason: e.to_string(),
            })?;

            if let Err(e) = written {
                return Err(ExportError::ClipboardFailed {
                    command: helper,
                    reason: e.to_string(),
                });
            }
            if !status.success() {
                return Err(ExportError::ClipboardFailed {
                    command: helper,
                    reason: status.to_string(),
                });
            }

            return Ok(helper);
        }

        Err(ExportError::ClipboardUnavailable {
            tried: candidates
                .iter()
                .map(|argv| argv[0].as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// Write the CSV rendering into `dir` under its dated file name
pub fn write_csv(dir: &Path, report: &Report) -> Result<PathBuf, ExportError> {
    let path = dir.join(report.csv_file_name());
    std::fs::create_dir_all(dir)
        .and_then(|_| write_atomic(&path, report.to_csv().as_bytes()))
        .map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

/// Delivers reports and reports the outcome on the event bus
pub struct Exporter<'a> {
    clipboard: &'a dyn Clipboard,
    out_dir: PathBuf,
    events: Option<Arc<EventBus>>,
}

impl<'a> Exporter<'a> {
    pub fn new(clipboard: &'a dyn Clipboard, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            clipboard,
            out_dir: out_dir.into(),
            events: None,
        }
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn emit(&self, event: Event) {
        if let Some(bus) = &self.events {
            bus.emit(event);
        }
    }

    /// Put the text rendering on the clipboard
    pub fn copy(&self, report: &Report) -> Result<String, ExportError> {
        match self.clipboard.copy(&report.to_text()) {
            Ok(via) => {
                self.emit(Event::report_copied(&via, report.rows.len()));
                Ok(via)
            }
            Err(e) => {
                self.emit(Event::export_failed("clipboard", &e.to_string()));
                Err(e)
            }
        }
    }

    /// Save the CSV rendering into the export directory
    pub fn export_csv(&self, report: &Report) -> Result<PathBuf, ExportError> {
        match write_csv(&self.out_dir, report) {
            Ok(path) => {
                self.emit(Event::report_exported(
                    &path.display().to_string(),
                    report.rows.len(),
                ));
                Ok(path)
            }
            Err(e) => {
                self.emit(Event::export_failed("csv", &e.to_string()));
                Err(e)
            }
        }
    }
}
