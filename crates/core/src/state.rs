//! State file tracking and reload policy.
//!
//! The state file is owned by terraform; this module only loads it as an
//! opaque JSON document and decides, by modification time, whether a reload
//! is needed at all.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Outcome of a post-run state refresh check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRefresh {
    /// The file changed on disk and the snapshot was replaced.
    Updated,
    /// The recorded mtime matches the file; nothing was reparsed.
    Unchanged,
    /// The file could not be read or parsed; the previous snapshot and its
    /// recorded mtime were kept.
    NotUpdated,
}

/// The last-loaded state document and the mtime it was read at.
#[derive(Debug)]
pub struct StateSnapshot {
    document: Value,
    mtime: Option<SystemTime>,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            document: Value::Object(serde_json::Map::new()),
            mtime: None,
        }
    }
}

impl StateSnapshot {
    /// The current state document. Empty object until a reload succeeds.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Reloads from `path` when its modification time differs from the
    /// recorded one. Replaces the snapshot wholesale; never merges.
    ///
    /// All failures are non-fatal: the operation that triggered the check
    /// already succeeded or failed on its own terms.
    pub fn refresh_from(&mut self, path: &Path) -> StateRefresh {
        let mtime = match fs::metadata(path).and_then(|meta| meta.modified()) {
            Ok(mtime) => mtime,
            Err(err) => {
                warn!("cannot stat state file {}: {err}", path.display());
                return StateRefresh::NotUpdated;
            }
        };

        if self.mtime == Some(mtime) {
            return StateRefresh::Unchanged;
        }

        match load_state_file(path) {
            Ok(document) => {
                self.document = document;
                self.mtime = Some(mtime);
                info!("updated with new state: {}", path.display());
                StateRefresh::Updated
            }
            Err(err) => {
                warn!("{err}");
                StateRefresh::NotUpdated
            }
        }
    }
}

/// Reads and parses a terraform state file. No schema validation happens
/// here; the document is passed through as-is.
pub fn load_state_file(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).map_err(|source| Error::StateRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| Error::StateParse {
        path: path.to_path_buf(),
        source,
    })
}
