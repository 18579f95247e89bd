//! Application controller.
//!
//! One [`App`] owns the record store, persisted preferences, transient UI
//! state, the active inline editor and the presentation [`Screen`]. Hosts feed
//! it [`AppEvent`]s and read back the rendered [`PageView`].

use crate::app::keys::{resolve_shortcut, FocusTarget, KeyPress, Shortcut};
use crate::clock::Clock;
use crate::config::AppConfig;
use crate::model::record::RecordId;
use crate::repo::kv_repo::{KeyValueStore, RepoError};
use crate::service::preferences::Preferences;
use crate::service::record_store::{ImportSummary, RecordStore, StoreError};
use crate::view::edit::{EditField, EditOutcome, InlineEditor};
use crate::view::render::{render_page, PageView, Screen};
use crate::view::state::{FilterMode, Focus, SortMode, UiState};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const CONFIRM_DELETE: &str = "Delete this item?";
pub const CONFIRM_CLEAR_ALL: &str = "This will delete ALL items. Continue?";

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Repo(RepoError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// User-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ImportSucceeded(ImportSummary),
    ImportFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ImportSucceeded(_) => "Imported successfully.",
            Self::ImportFailed => "Import failed. Make sure this is a valid JSON export.",
        }
    }
}

/// Blocking user interaction: confirmations and notices.
pub trait Prompter {
    fn confirm(&mut self, message: &str) -> bool;
    fn notify(&mut self, notice: &Notice);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Submit { title: String, body: String },
    SearchInput(String),
    FilterChanged(FilterMode),
    SortChanged(SortMode),
    ToggleDone(RecordId),
    Duplicate(RecordId),
    Delete(RecordId),
    ClearAll,
    ToggleTheme,
    Export,
    /// Contents of a user-selected import file.
    Import(String),
    KeyDown(KeyPress),
    FocusEdit { id: RecordId, field: EditField },
    EditInput(String),
    BlurEdit,
}

impl AppEvent {
    /// Whether handling the event takes focus away from an inline editor.
    ///
    /// Key presses decide this themselves once the shortcut is resolved;
    /// edit events manage the editor directly.
    fn leaves_editor(&self) -> bool {
        !matches!(
            self,
            Self::KeyDown(_) | Self::FocusEdit { .. } | Self::EditInput(_) | Self::BlurEdit
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Changed,
    /// Nothing to do, e.g. an unknown id.
    NoOp,
    /// Input failed validation; store unchanged.
    Rejected,
    /// User declined a confirmation; store unchanged.
    Declined,
    Exported { file_name: String, json: String },
    Imported(ImportSummary),
    ImportFailed,
    Edit(EditOutcome),
}

pub struct App<S: KeyValueStore + Clone, C: Clock> {
    store: RecordStore<S, C>,
    preferences: Preferences<S>,
    ui: UiState,
    editor: Option<InlineEditor>,
    screen: Screen,
    export_file_name: String,
}

impl<S: KeyValueStore + Clone, C: Clock> App<S, C> {
    /// Restores records and theme from `kv` and renders the first view.
    pub fn open(kv: S, clock: C, config: &AppConfig) -> Self {
        let preferences = Preferences::new(kv.clone(), config.theme_key.clone());
        let ui = UiState {
            theme: preferences.load_theme(),
            ..UiState::default()
        };
        let mut app = Self {
            store: RecordStore::open(kv, clock, config),
            preferences,
            ui,
            editor: None,
            screen: Screen::new(),
            export_file_name: config.export_file_name.clone(),
        };
        app.render();
        app
    }

    pub fn store(&self) -> &RecordStore<S, C> {
        &self.store
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn editor(&self) -> Option<&InlineEditor> {
        self.editor.as_ref()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The current view. Always present once the app is open.
    pub fn view(&self) -> Option<&PageView> {
        self.screen.current()
    }

    /// Handles one event, then re-renders.
    ///
    /// The view is refreshed even when the handler fails.
    pub fn dispatch(
        &mut self,
        event: AppEvent,
        prompter: &mut dyn Prompter,
    ) -> AppResult<EventOutcome> {
        let outcome = self.handle(event, prompter);
        self.render();
        outcome
    }

    /// Reads `path` and imports it. Read failures are reported like any other
    /// import failure.
    pub fn import_file(
        &mut self,
        path: &Path,
        prompter: &mut dyn Prompter,
    ) -> AppResult<EventOutcome> {
        match std::fs::read_to_string(path) {
            Ok(text) => self.dispatch(AppEvent::Import(text), prompter),
            Err(err) => {
                warn!(
                    "event=import_read module=app status=error error_code=import_read_failed error={}",
                    err
                );
                prompter.notify(&Notice::ImportFailed);
                self.render();
                Ok(EventOutcome::ImportFailed)
            }
        }
    }

    /// Re-renders from current state, replacing the presented view.
    ///
    /// Returns `true` when the new view differs from the previous one.
    pub fn render(&mut self) -> bool {
        let view = render_page(self.store.records(), &self.ui);
        self.screen.present(view)
    }

    fn handle(&mut self, event: AppEvent, prompter: &mut dyn Prompter) -> AppResult<EventOutcome> {
        if event.leaves_editor() {
            self.blur_editor()?;
        }

        match event {
            AppEvent::Submit { title, body } => match self.store.create(&title, &body) {
                Ok(_) => {
                    self.ui.focus = Focus::TitleInput;
                    Ok(EventOutcome::Changed)
                }
                Err(StoreError::Validation(_)) => Ok(EventOutcome::Rejected),
                Err(err) => Err(err.into()),
            },
            AppEvent::SearchInput(text) => {
                self.ui.query.text = text;
                Ok(EventOutcome::Changed)
            }
            AppEvent::FilterChanged(filter) => {
                self.ui.query.filter = filter;
                Ok(EventOutcome::Changed)
            }
            AppEvent::SortChanged(sort) => {
                self.ui.query.sort = sort;
                Ok(EventOutcome::Changed)
            }
            AppEvent::ToggleDone(id) => Ok(changed_if(self.store.toggle(&id)?.is_some())),
            AppEvent::Duplicate(id) => Ok(changed_if(self.store.duplicate(&id)?.is_some())),
            AppEvent::Delete(id) => {
                if self.store.get(&id).is_none() {
                    return Ok(EventOutcome::NoOp);
                }
                if !prompter.confirm(CONFIRM_DELETE) {
                    return Ok(EventOutcome::Declined);
                }
                Ok(changed_if(self.store.remove(&id)?))
            }
            AppEvent::ClearAll => {
                if !prompter.confirm(CONFIRM_CLEAR_ALL) {
                    return Ok(EventOutcome::Declined);
                }
                self.store.clear()?;
                Ok(EventOutcome::Changed)
            }
            AppEvent::ToggleTheme => {
                let theme = self.ui.theme.toggled();
                self.preferences.save_theme(theme)?;
                self.ui.theme = theme;
                Ok(EventOutcome::Changed)
            }
            AppEvent::Export => Ok(EventOutcome::Exported {
                file_name: self.export_file_name.clone(),
                json: self.store.export_json()?,
            }),
            AppEvent::Import(text) => match self.store.import_json(&text) {
                Ok(summary) => {
                    prompter.notify(&Notice::ImportSucceeded(summary));
                    Ok(EventOutcome::Imported(summary))
                }
                Err(_) => {
                    prompter.notify(&Notice::ImportFailed);
                    Ok(EventOutcome::ImportFailed)
                }
            },
            AppEvent::KeyDown(mut press) => {
                if self.editor.as_ref().is_some_and(InlineEditor::is_editing) {
                    press.target = FocusTarget::ContentEditable;
                }
                match resolve_shortcut(&press) {
                    Some(Shortcut::FocusSearch { select }) => {
                        self.blur_editor()?;
                        self.ui.focus = Focus::Search { selected: select };
                        Ok(EventOutcome::Changed)
                    }
                    None => Ok(EventOutcome::NoOp),
                }
            }
            AppEvent::FocusEdit { id, field } => {
                self.blur_editor()?;
                let Some(record) = self.store.get(&id) else {
                    return Ok(EventOutcome::NoOp);
                };
                let mut editor = InlineEditor::new(id, field);
                editor.focus(record);
                self.editor = Some(editor);
                self.ui.focus = Focus::None;
                Ok(EventOutcome::Changed)
            }
            AppEvent::EditInput(text) => match self.editor.as_mut() {
                Some(editor) if editor.is_editing() => {
                    editor.input(text);
                    Ok(EventOutcome::Changed)
                }
                _ => Ok(EventOutcome::NoOp),
            },
            AppEvent::BlurEdit => Ok(EventOutcome::Edit(self.blur_editor()?)),
        }
    }

    fn blur_editor(&mut self) -> AppResult<EditOutcome> {
        let Some(mut editor) = self.editor.take() else {
            return Ok(EditOutcome::Idle);
        };
        let outcome = editor.blur(&mut self.store)?;
        if outcome == EditOutcome::Committed {
            info!(
                "event=inline_edit module=app status=committed record_id={}",
                editor.record_id()
            );
        }
        Ok(outcome)
    }
}

fn changed_if(changed: bool) -> EventOutcome {
    if changed {
        EventOutcome::Changed
    } else {
        EventOutcome::NoOp
    }
}
