//! Persisted UI preferences.
//!
//! Currently only the color theme, stored in its own slot.

use crate::repo::kv_repo::{KeyValueStore, RepoResult};
use crate::view::state::Theme;
use log::{debug, warn};

pub struct Preferences<S: KeyValueStore> {
    kv: S,
    theme_key: String,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(kv: S, theme_key: impl Into<String>) -> Self {
        Self {
            kv,
            theme_key: theme_key.into(),
        }
    }

    /// Reads the saved theme. Missing or unknown values yield the default.
    pub fn load_theme(&self) -> Theme {
        match self.kv.get(&self.theme_key) {
            Ok(Some(value)) => value.parse().unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!(
                    "event=theme_load module=preferences status=error error_code=slot_read_failed error={}",
                    err
                );
                Theme::default()
            }
        }
    }

    pub fn save_theme(&self, theme: Theme) -> RepoResult<()> {
        self.kv.put(&self.theme_key, theme.as_str())?;
        debug!(
            "event=theme_save module=preferences status=ok theme={}",
            theme.as_str()
        );
        Ok(())
    }
}
