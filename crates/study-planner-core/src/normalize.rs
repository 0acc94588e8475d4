//! Lenient decoding of persisted task records.
//!
//! Stored tasks may come from older releases or hand-edited files. Every field
//! is decoded into a small tagged variant first and then mapped to a typed
//! value with a fixed default, so a record never fails to load.

use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::{Number, Value};
use time::OffsetDateTime;

use crate::due::DueDate;
use crate::id::TaskId;
use crate::kind::TaskType;
use crate::timestamp::Timestamp;
use crate::Task;

/// Any JSON value, classified by shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Number(Number),
    Text(String),
    Compound(IgnoredAny),
}

impl Loose {
    /// JavaScript-style truthiness.
    fn truthy(&self) -> bool {
        match self {
            Self::Bool(flag) => *flag,
            Self::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
            Self::Text(s) => !s.is_empty(),
            Self::Compound(_) => true,
        }
    }

    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    fn into_id(self) -> Option<TaskId> {
        match self {
            Self::Text(s) => s.parse().ok(),
            Self::Number(n) => n.to_string().parse().ok(),
            Self::Bool(_) | Self::Compound(_) => None,
        }
    }

    fn into_timestamp(self) -> Option<Timestamp> {
        match self {
            Self::Text(s) => Timestamp::parse(&s).ok(),
            Self::Number(n) => {
                let millis = n.as_i64()?;
                OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
                    .ok()
                    .map(Timestamp::from_datetime)
            }
            Self::Bool(_) | Self::Compound(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTask {
    #[serde(default)]
    id: Option<Loose>,
    #[serde(default)]
    title: Option<Loose>,
    #[serde(default, rename = "type")]
    kind: Option<Loose>,
    #[serde(default)]
    is_completed: Option<Loose>,
    #[serde(default)]
    created_at: Option<Loose>,
    #[serde(default)]
    updated_at: Option<Loose>,
    #[serde(default)]
    due_date: Option<Loose>,
}

impl RawTask {
    fn decode(raw: Value) -> Self {
        if !raw.is_object() {
            return Self::default();
        }
        serde_json::from_value(raw).unwrap_or_default()
    }
}

impl Task {
    /// Build a task from an arbitrary stored record, filling every missing or
    /// mistyped field with its default.
    ///
    /// | field | default |
    /// |---|---|
    /// | `id` | fresh id (numbers are stringified) |
    /// | `title` | empty string |
    /// | `type` | `other` |
    /// | `isCompleted` | truthiness of the stored value |
    /// | `createdAt` | `now` |
    /// | `updatedAt` | `createdAt`, never earlier than it |
    /// | `dueDate` | `null` unless a non-empty string |
    #[must_use]
    pub fn from_raw(raw: Value, now: Timestamp) -> Self {
        let RawTask {
            id,
            title,
            kind,
            is_completed,
            created_at,
            updated_at,
            due_date,
        } = RawTask::decode(raw);

        let created_at = created_at.and_then(Loose::into_timestamp).unwrap_or(now);
        let updated_at = updated_at
            .and_then(Loose::into_timestamp)
            .unwrap_or(created_at)
            .max(created_at);

        Self {
            id: id.and_then(Loose::into_id).unwrap_or_default(),
            title: title.and_then(Loose::into_text).unwrap_or_default(),
            kind: kind
                .and_then(Loose::into_text)
                .map_or(TaskType::Other, |value| TaskType::parse_or_default(&value)),
            is_completed: is_completed.as_ref().is_some_and(Loose::truthy),
            created_at,
            updated_at,
            due_date: due_date.and_then(Loose::into_text).and_then(DueDate::new),
        }
    }

    /// Re-apply the invariants a typed task can still violate.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.updated_at = self.updated_at.max(self.created_at);
        self
    }
}
