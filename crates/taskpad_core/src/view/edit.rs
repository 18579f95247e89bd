//! Inline edit state machine for one record field.
//!
//! `Viewing -> Editing` on focus, `Editing -> Viewing` on blur. Blur commits
//! the trimmed draft only when it differs from the stored value (and, for the
//! title, is non-empty); otherwise the field reverts and the record keeps its
//! `updated` timestamp.

use crate::clock::Clock;
use crate::model::record::{Record, RecordId};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::record_store::{RecordPatch, RecordStore, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Title,
    Body,
}

impl EditField {
    fn stored<'r>(self, record: &'r Record) -> &'r str {
        match self {
            Self::Title => &record.title,
            Self::Body => &record.body,
        }
    }

    fn patch(self, value: String) -> RecordPatch {
        match self {
            Self::Title => RecordPatch::title(value),
            Self::Body => RecordPatch::body(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Viewing,
    Editing { draft: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Committed,
    Reverted,
    /// Blur arrived while not editing.
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineEditor {
    record_id: RecordId,
    field: EditField,
    state: EditState,
}

impl InlineEditor {
    pub fn new(record_id: RecordId, field: EditField) -> Self {
        Self {
            record_id,
            field,
            state: EditState::Viewing,
        }
    }

    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    pub fn field(&self) -> EditField {
        self.field
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// Enters editing with the stored value as the initial draft.
    pub fn focus(&mut self, record: &Record) {
        if !self.is_editing() {
            self.state = EditState::Editing {
                draft: self.field.stored(record).to_string(),
            };
        }
    }

    /// Replaces the draft. Ignored while viewing.
    pub fn input(&mut self, text: impl Into<String>) {
        if let EditState::Editing { draft } = &mut self.state {
            *draft = text.into();
        }
    }

    /// Leaves editing, committing the draft through `store` when accepted.
    pub fn blur<S: KeyValueStore, C: Clock>(
        &mut self,
        store: &mut RecordStore<S, C>,
    ) -> StoreResult<EditOutcome> {
        let EditState::Editing { draft } = std::mem::replace(&mut self.state, EditState::Viewing)
        else {
            return Ok(EditOutcome::Idle);
        };

        let Some(value) = store
            .get(&self.record_id)
            .and_then(|record| accepted_value(self.field, self.field.stored(record), &draft))
        else {
            return Ok(EditOutcome::Reverted);
        };

        if store.update(&self.record_id, &self.field.patch(value))? {
            Ok(EditOutcome::Committed)
        } else {
            Ok(EditOutcome::Reverted)
        }
    }
}

/// Returns the value to commit, or `None` to revert.
fn accepted_value(field: EditField, stored: &str, draft: &str) -> Option<String> {
    let trimmed = draft.trim();
    if field == EditField::Title && trimmed.is_empty() {
        return None;
    }
    (trimmed != stored).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{accepted_value, EditField};

    #[test]
    fn blank_title_reverts_but_blank_body_commits() {
        assert_eq!(accepted_value(EditField::Title, "a", "   "), None);
        assert_eq!(
            accepted_value(EditField::Body, "a", "   "),
            Some(String::new())
        );
    }

    #[test]
    fn unchanged_trimmed_value_reverts() {
        assert_eq!(accepted_value(EditField::Title, "same", " same \n"), None);
        assert_eq!(
            accepted_value(EditField::Title, "old", " new "),
            Some("new".to_string())
        );
    }
}
