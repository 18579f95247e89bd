//! Core domain logic for Taskpad.
//! This crate is the single source of truth for record invariants.

pub mod app;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use app::controller::{
    App, AppError, AppEvent, AppResult, EventOutcome, Notice, Prompter, CONFIRM_CLEAR_ALL,
    CONFIRM_DELETE,
};
pub use app::keys::{FocusTarget, KeyPress, Shortcut};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError, RecordLimits};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{Record, RecordId, RecordValidationError};
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore,
};
pub use service::preferences::Preferences;
pub use service::record_store::{
    ImportSummary, RecordPatch, RecordStore, StoreError, StoreResult,
};
pub use service::sanitize::{parse_import, ImportError, SanitizedImport};
pub use view::edit::{EditField, EditOutcome, EditState, InlineEditor};
pub use view::projector::project;
pub use view::render::{format_timestamp, render_page, ListView, PageView, RowView, Screen};
pub use view::state::{FilterMode, Focus, ParseModeError, SortMode, Theme, UiState, ViewQuery};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
