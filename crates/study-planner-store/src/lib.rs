//! Versioned persistence for study planner task lists.
//!
//! The whole list lives in one slot as `{"version": 2, "todos": [...]}`. Older
//! shapes are upgraded on load; anything unreadable degrades to an empty list
//! rather than an error.

/// Error types.
pub mod error;
/// Durable slots.
pub mod slot;

pub use error::StoreError;
pub use slot::{FileSlot, MemorySlot, Slot, validate_key};

use std::collections::HashSet;

use serde_json::Value;
use study_planner_core::{STORAGE_VERSION, Task, TaskEnvelope, TaskId, Timestamp};
use tracing::{debug, info, warn};

/// Where a loaded envelope came from.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadSource {
    /// Nothing stored; the fallback list was used.
    Missing,
    /// Stored text was not JSON.
    Malformed,
    /// The slot could not be read.
    Unreadable,
    /// A bare task array from the first storage format.
    LegacyArray,
    /// An envelope at or below the current version.
    Envelope {
        /// Version found in storage.
        version: f64,
    },
    /// A newer envelope or an unrecognized shape; discarded.
    Incompatible,
}

/// Result of [`TaskStore::load_detailed`].
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    /// Current-version envelope.
    pub envelope: TaskEnvelope,
    /// How it was obtained.
    pub source: LoadSource,
}

/// Load/save of task envelopes on top of a [`Slot`].
#[derive(Debug, Clone)]
pub struct TaskStore<S> {
    slot: S,
}

impl<S: Slot> TaskStore<S> {
    /// Wrap a slot.
    pub const fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Borrow the underlying slot.
    pub const fn slot(&self) -> &S {
        &self.slot
    }

    /// Load the envelope stored under `key`.
    ///
    /// A missing slot yields `fallback`; malformed or incompatible data yields
    /// an empty list. Storage is never modified here.
    pub fn load(&self, key: &str, fallback: Vec<Task>, now: Timestamp) -> TaskEnvelope {
        self.load_detailed(key, fallback, now).envelope
    }

    /// Like [`load`](Self::load) but also reports how the data was interpreted.
    pub fn load_detailed(&self, key: &str, fallback: Vec<Task>, now: Timestamp) -> Loaded {
        let raw = match self.slot.read(key) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%key, error = %err, "Failed to read task slot; starting empty");
                return Loaded {
                    envelope: TaskEnvelope::default(),
                    source: LoadSource::Unreadable,
                };
            }
        };

        let Some(raw) = raw.filter(|text| !text.is_empty()) else {
            debug!(%key, tasks = fallback.len(), "Task slot empty; using fallback list");
            return Loaded {
                envelope: TaskEnvelope::new(fallback),
                source: LoadSource::Missing,
            };
        };

        let Ok(parsed) = serde_json::from_str::<Value>(&raw) else {
            warn!(%key, bytes = raw.len(), "Task slot is not valid JSON; starting empty");
            return Loaded {
                envelope: TaskEnvelope::default(),
                source: LoadSource::Malformed,
            };
        };

        let loaded = migrate(parsed, now);
        match &loaded.source {
            LoadSource::Incompatible => {
                warn!(%key, "Task slot has an unsupported shape or version; starting empty");
            }
            source => {
                info!(%key, ?source, tasks = loaded.envelope.todos.len(), "Loaded tasks");
            }
        }
        loaded
    }

    /// Serialize and write `envelope`, surfacing failures.
    ///
    /// # Errors
    /// Returns an error when serialization or the slot write fails.
    pub fn try_save(&self, key: &str, envelope: &TaskEnvelope) -> Result<(), StoreError> {
        let contents = serde_json::to_string(envelope)?;
        self.slot.write(key, &contents)?;
        debug!(%key, tasks = envelope.todos.len(), "Saved tasks");
        Ok(())
    }

    /// Best-effort save: failures are logged and otherwise ignored.
    pub fn save(&self, key: &str, envelope: &TaskEnvelope) {
        if let Err(err) = self.try_save(key, envelope) {
            warn!(%key, error = %err, "Failed to persist tasks; keeping in-memory state");
        }
    }
}

/// Upgrade parsed storage data to a current-version envelope.
#[must_use]
pub fn migrate(parsed: Value, now: Timestamp) -> Loaded {
    match parsed {
        Value::Array(items) => Loaded {
            envelope: TaskEnvelope::new(normalize_all(items, now)),
            source: LoadSource::LegacyArray,
        },
        Value::Object(mut map) => {
            let version = map.get("version").map_or(1.0, stored_version);
            if version > f64::from(STORAGE_VERSION) {
                return incompatible();
            }
            let items = match map.remove("todos") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            Loaded {
                envelope: TaskEnvelope::new(normalize_all(items, now)),
                source: LoadSource::Envelope { version },
            }
        }
        _ => incompatible(),
    }
}

const fn incompatible() -> Loaded {
    Loaded {
        envelope: TaskEnvelope::new(Vec::new()),
        source: LoadSource::Incompatible,
    }
}

/// Numeric version; anything non-numeric (or zero) counts as version 1.
fn stored_version(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| *v != 0.0 && v.is_finite()).unwrap_or(1.0)
}

fn normalize_all(items: Vec<Value>, now: Timestamp) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .map(|item| {
            let mut task = Task::from_raw(item, now);
            if !seen.insert(task.id.clone()) {
                let fresh = TaskId::new();
                warn!(duplicate = %task.id, %fresh, "Duplicate task id in storage; assigning a new one");
                task.id = fresh;
                seen.insert(task.id.clone());
            }
            task
        })
        .collect()
}
