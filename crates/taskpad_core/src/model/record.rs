//! Record domain model.
//!
//! # Responsibility
//! - Define the single entity shared by note and task views.
//! - Provide lifecycle helpers (touch, duplicate) that keep timestamps sane.
//!
//! # Invariants
//! - `id` is assigned once and never changes.
//! - `title` is trimmed and non-empty.
//! - `updated >= created`.
//! - Deserialization rejects records that break any of the above.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque record identifier.
///
/// Generated ids are v4 UUID strings, but ids restored from storage or import
/// files may be any non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing id value.
    ///
    /// Returns `None` when the value is blank.
    pub fn parse(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validation failures for [`Record`] invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyId,
    EmptyTitle,
    UntrimmedTitle,
    UpdatedBeforeCreated { created: i64, updated: i64 },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "record id must not be empty"),
            Self::EmptyTitle => write!(f, "record title must not be empty"),
            Self::UntrimmedTitle => {
                write!(f, "record title must not have leading or trailing whitespace")
            }
            Self::UpdatedBeforeCreated { created, updated } => write!(
                f,
                "record updated ({updated}) must be >= created ({created})"
            ),
        }
    }
}

impl Error for RecordValidationError {}

/// One note/task entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordWire")]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    /// Free text. Serialized as `desc` to match exported files.
    #[serde(rename = "desc")]
    pub body: String,
    pub done: bool,
    /// Unix epoch milliseconds, set once.
    pub created: i64,
    /// Unix epoch milliseconds, refreshed on every mutation.
    pub updated: i64,
}

#[derive(Deserialize)]
struct RecordWire {
    id: RecordId,
    title: String,
    #[serde(default, rename = "desc", alias = "body", alias = "content")]
    body: String,
    #[serde(default)]
    done: bool,
    created: i64,
    updated: i64,
}

impl TryFrom<RecordWire> for Record {
    type Error = RecordValidationError;

    fn try_from(wire: RecordWire) -> Result<Self, Self::Error> {
        let record = Self {
            id: wire.id,
            title: wire.title,
            body: wire.body,
            done: wire.done,
            created: wire.created,
            updated: wire.updated,
        };
        record.validate()?;
        Ok(record)
    }
}

impl Record {
    /// Creates an open record with a generated id.
    ///
    /// Title and body are trimmed; `created == updated == now_ms`.
    pub fn new(
        title: &str,
        body: &str,
        now_ms: i64,
    ) -> Result<Self, RecordValidationError> {
        Self::with_id(RecordId::generate(), title, body, now_ms)
    }

    /// Creates an open record with a caller-provided id.
    pub fn with_id(
        id: RecordId,
        title: &str,
        body: &str,
        now_ms: i64,
    ) -> Result<Self, RecordValidationError> {
        let record = Self {
            id,
            title: title.trim().to_string(),
            body: body.trim().to_string(),
            done: false,
            created: now_ms,
            updated: now_ms,
        };
        record.validate()?;
        Ok(record)
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(RecordValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(RecordValidationError::EmptyTitle);
        }
        if self.title.trim() != self.title {
            return Err(RecordValidationError::UntrimmedTitle);
        }
        if self.updated < self.created {
            return Err(RecordValidationError::UpdatedBeforeCreated {
                created: self.created,
                updated: self.updated,
            });
        }
        Ok(())
    }

    /// Refreshes `updated` after a mutation.
    ///
    /// The new value is strictly greater than the previous one even when the
    /// clock has not advanced.
    pub fn touch(&mut self, now_ms: i64) {
        self.updated = now_ms.max(self.updated.saturating_add(1));
    }

    /// Returns an open copy with a fresh id and fresh timestamps.
    pub fn duplicate(&self, now_ms: i64) -> Self {
        Self {
            id: RecordId::generate(),
            title: self.title.clone(),
            body: self.body.clone(),
            done: false,
            created: now_ms,
            updated: now_ms,
        }
    }

    /// Case-insensitive substring match on title or body.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.title.to_lowercase().contains(needle_lower)
            || self.body.to_lowercase().contains(needle_lower)
    }
}
