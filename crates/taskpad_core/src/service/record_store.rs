//! Record store: the in-memory collection plus its persistence slot.
//!
//! # Responsibility
//! - Own the ordered record collection for one storage key.
//! - Mirror the full collection to the slot after every mutation.
//! - Restore the collection at startup, failing soft on bad data.
//!
//! # Invariants
//! - Ids are unique; every held record passes `Record::validate()`.
//! - A mutation is staged on a copy and swapped in only after the slot write
//!   succeeds, so a failed write leaves memory untouched.
//! - New and duplicated records are inserted at the front.
//! - Titles and bodies are clamped to the configured [`RecordLimits`] on every
//!   path that writes them, so an exported collection imports unchanged.

use crate::clock::{Clock, SystemClock};
use crate::config::{AppConfig, RecordLimits};
use crate::model::record::{Record, RecordId, RecordValidationError};
use crate::repo::kv_repo::{KeyValueStore, RepoError};
use crate::service::sanitize::{parse_import, sanitize_records, ImportError};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for mutations and exports.
#[derive(Debug)]
pub enum StoreError {
    Validation(RecordValidationError),
    Repo(RepoError),
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize records: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Partial update for one record. `None` fields are left as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub done: Option<bool>,
}

impl RecordPatch {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn body(value: impl Into<String>) -> Self {
        Self {
            body: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn done(value: bool) -> Self {
        Self {
            done: Some(value),
            ..Self::default()
        }
    }

    /// Applies the patch and reports whether any field changed.
    ///
    /// Text values are trimmed and clamped to `limits`; a blank title is
    /// rejected before anything is written to `record`.
    fn apply_to(
        &self,
        record: &mut Record,
        limits: RecordLimits,
    ) -> Result<bool, RecordValidationError> {
        let title = self.title.as_deref().map(|value| limits.clamp_title(value));
        if title.as_deref() == Some("") {
            return Err(RecordValidationError::EmptyTitle);
        }

        let mut changed = false;
        if let Some(title) = title.filter(|value| *value != record.title) {
            record.title = title;
            changed = true;
        }
        if let Some(body) = self
            .body
            .as_deref()
            .map(|value| clamp_input_body(limits, value))
            .filter(|value| *value != record.body)
        {
            record.body = body;
            changed = true;
        }
        if let Some(done) = self.done.filter(|value| *value != record.done) {
            record.done = done;
            changed = true;
        }
        Ok(changed)
    }
}

/// Result of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Owned record collection bound to one storage slot.
pub struct RecordStore<S: KeyValueStore, C: Clock = SystemClock> {
    kv: S,
    clock: C,
    storage_key: String,
    limits: RecordLimits,
    records: Vec<Record>,
}

impl<S: KeyValueStore, C: Clock> RecordStore<S, C> {
    /// Opens the store and restores the persisted collection.
    pub fn open(kv: S, clock: C, config: &AppConfig) -> Self {
        let mut store = Self {
            kv,
            clock,
            storage_key: config.storage_key.clone(),
            limits: config.limits(),
            records: Vec::new(),
        };
        store.records = store.load_all();
        store
    }

    /// Reads the persisted collection.
    ///
    /// Missing, unreadable or malformed data yields an empty collection; the
    /// failure is logged and never returned.
    pub fn load_all(&self) -> Vec<Record> {
        let raw = match self.kv.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=store_load module=store status=empty reason=missing_slot");
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error error_code=slot_read_failed error={}",
                    err
                );
                return Vec::new();
            }
        };

        match decode_records(&raw) {
            Ok(records) => {
                info!(
                    "event=store_load module=store status=ok total={}",
                    records.len()
                );
                records
            }
            Err(reason) => {
                warn!(
                    "event=store_load module=store status=error error_code=slot_malformed reason={}",
                    reason
                );
                Vec::new()
            }
        }
    }

    /// Writes the current collection to the slot.
    pub fn persist(&self) -> StoreResult<()> {
        self.write_slot(&self.records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Creates an open record at the front of the collection.
    ///
    /// Title and body are trimmed and clamped to the configured limits.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)` when `title` is blank; nothing is written.
    pub fn create(&mut self, title: &str, body: &str) -> StoreResult<Record> {
        let record = Record::new(
            &self.limits.clamp_title(title),
            &clamp_input_body(self.limits, body),
            self.clock.now_ms(),
        )?;

        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(record.clone());
        next.extend(self.records.iter().cloned());
        self.commit(next)?;

        info!(
            "event=record_create module=store status=ok record_id={} total={}",
            record.id,
            self.records.len()
        );
        Ok(record)
    }

    /// Applies `patch` to the record with `id`.
    ///
    /// Returns `false` when the id is unknown or nothing changed; in both
    /// cases the slot is not written and `updated` is untouched.
    pub fn update(&mut self, id: &RecordId, patch: &RecordPatch) -> StoreResult<bool> {
        let limits = self.limits;
        let changed = self.apply(|records, now_ms| {
            let Some(record) = find_mut(records, id) else {
                return Ok(None);
            };
            if !patch.apply_to(record, limits)? {
                return Ok(None);
            }
            record.touch(now_ms);
            Ok(Some(()))
        })?;

        if changed.is_some() {
            debug!("event=record_update module=store status=ok record_id={id}");
        }
        Ok(changed.is_some())
    }

    /// Flips `done`. Returns the new value, or `None` for an unknown id.
    pub fn toggle(&mut self, id: &RecordId) -> StoreResult<Option<bool>> {
        let done = self.apply(|records, now_ms| {
            let Some(record) = find_mut(records, id) else {
                return Ok(None);
            };
            record.done = !record.done;
            record.touch(now_ms);
            Ok(Some(record.done))
        })?;

        if let Some(done) = done {
            debug!("event=record_toggle module=store status=ok record_id={id} done={done}");
        }
        Ok(done)
    }

    /// Inserts an open copy of `id` at the front.
    pub fn duplicate(&mut self, id: &RecordId) -> StoreResult<Option<Record>> {
        let copy = self.apply(|records, now_ms| {
            let Some(source) = records.iter().find(|record| &record.id == id) else {
                return Ok(None);
            };
            let copy = source.duplicate(now_ms);
            records.insert(0, copy.clone());
            Ok(Some(copy))
        })?;

        if let Some(copy) = copy.as_ref() {
            info!(
                "event=record_duplicate module=store status=ok source_id={id} record_id={}",
                copy.id
            );
        }
        Ok(copy)
    }

    /// Deletes `id`. Returns `false` when it was not present.
    pub fn remove(&mut self, id: &RecordId) -> StoreResult<bool> {
        let removed = self.apply(|records, _| {
            let Some(index) = records.iter().position(|record| &record.id == id) else {
                return Ok(None);
            };
            Ok(Some(records.remove(index)))
        })?;

        if removed.is_some() {
            info!(
                "event=record_remove module=store status=ok record_id={id} total={}",
                self.records.len()
            );
        }
        Ok(removed.is_some())
    }

    /// Removes every record. Returns how many were removed.
    pub fn clear(&mut self) -> StoreResult<usize> {
        let removed = self.records.len();
        self.commit(Vec::new())?;
        info!("event=store_clear module=store status=ok removed={removed}");
        Ok(removed)
    }

    /// Replaces the whole collection.
    ///
    /// Valid records are kept as they are apart from length clamping; records
    /// that fail validation or repeat an id are repaired with the import rules.
    pub fn replace_all(&mut self, records: Vec<Record>) -> StoreResult<()> {
        let sanitized = sanitize_records(&records, self.limits, self.clock.now_ms())?;
        self.commit(sanitized)?;
        info!(
            "event=store_replace module=store status=ok total={}",
            self.records.len()
        );
        Ok(())
    }

    /// Imports an exported JSON document, replacing the collection.
    ///
    /// The collection is unchanged when parsing, validation or the slot write
    /// fails.
    pub fn import_json(&mut self, text: &str) -> Result<ImportSummary, ImportError> {
        let result = parse_import(text, self.limits, self.clock.now_ms()).and_then(|sanitized| {
            let summary = ImportSummary {
                imported: sanitized.records.len(),
                skipped: sanitized.skipped,
            };
            self.commit(sanitized.records)?;
            Ok(summary)
        });

        match &result {
            Ok(summary) => info!(
                "event=store_import module=store status=ok imported={} skipped={}",
                summary.imported, summary.skipped
            ),
            Err(err) => warn!(
                "event=store_import module=store status=error error_code={}",
                import_error_code(err)
            ),
        }
        result
    }

    /// Serializes the full collection as pretty-printed JSON.
    pub fn export_json(&self) -> StoreResult<String> {
        let text = serde_json::to_string_pretty(&self.records)?;
        debug!(
            "event=store_export module=store status=ok total={}",
            self.records.len()
        );
        Ok(text)
    }

    /// Stages a change on a copy; commits only when `change` returns `Some`.
    fn apply<T>(
        &mut self,
        change: impl FnOnce(&mut Vec<Record>, i64) -> StoreResult<Option<T>>,
    ) -> StoreResult<Option<T>> {
        let mut next = self.records.clone();
        let Some(result) = change(&mut next, self.clock.now_ms())? else {
            return Ok(None);
        };
        self.commit(next)?;
        Ok(Some(result))
    }

    fn commit(&mut self, next: Vec<Record>) -> StoreResult<()> {
        self.write_slot(&next)?;
        self.records = next;
        Ok(())
    }

    fn write_slot(&self, records: &[Record]) -> StoreResult<()> {
        let text = serde_json::to_string(records)?;
        if let Err(err) = self.kv.put(&self.storage_key, &text) {
            warn!(
                "event=store_persist module=store status=error error_code=slot_write_failed error={}",
                err
            );
            return Err(err.into());
        }
        Ok(())
    }
}

/// Interactive body input: trimmed on both ends, then clamped.
fn clamp_input_body(limits: RecordLimits, body: &str) -> String {
    limits.clamp_body(body.trim()).trim_end().to_string()
}

fn find_mut<'a>(records: &'a mut [Record], id: &RecordId) -> Option<&'a mut Record> {
    records.iter_mut().find(|record| &record.id == id)
}

/// Strictly decodes a persisted collection.
///
/// Errors carry only a category and position, never slot content.
fn decode_records(raw: &str) -> Result<Vec<Record>, String> {
    let records: Vec<Record> = serde_json::from_str(raw).map_err(|err| {
        format!(
            "{:?}@{}:{}",
            err.classify(),
            err.line(),
            err.column()
        )
    })?;

    let mut seen = HashSet::with_capacity(records.len());
    if let Some(index) = records.iter().position(|record| !seen.insert(&record.id)) {
        return Err(format!("duplicate_id@{index}"));
    }
    Ok(records)
}

fn import_error_code(err: &ImportError) -> &'static str {
    match err {
        ImportError::Parse(_) => "import_parse_failed",
        ImportError::NotASequence { .. } => "import_not_array",
        ImportError::Store(_) => "import_persist_failed",
        ImportError::Io(_) => "import_read_failed",
    }
}
