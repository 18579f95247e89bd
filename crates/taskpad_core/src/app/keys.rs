//! Global keyboard shortcuts.

/// Element that had focus when the key was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FocusTarget {
    #[default]
    Page,
    TextInput,
    TextArea,
    ContentEditable,
}

impl FocusTarget {
    pub fn is_typing(self) -> bool {
        !matches!(self, Self::Page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub target: FocusTarget,
}

impl KeyPress {
    pub fn plain(key: impl Into<String>, target: FocusTarget) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
            target,
        }
    }

    pub fn with_ctrl(key: impl Into<String>, target: FocusTarget) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key, target)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    FocusSearch { select: bool },
}

/// Resolves a key press to a shortcut.
///
/// - Ctrl/Meta+K focuses and selects the search field from anywhere.
/// - `/` focuses the search field unless the user is typing.
pub fn resolve_shortcut(press: &KeyPress) -> Option<Shortcut> {
    if (press.ctrl || press.meta) && press.key.eq_ignore_ascii_case("k") {
        return Some(Shortcut::FocusSearch { select: true });
    }
    if press.key == "/" && !press.target.is_typing() {
        return Some(Shortcut::FocusSearch { select: false });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{resolve_shortcut, FocusTarget, KeyPress, Shortcut};

    #[test]
    fn ctrl_k_selects_search_even_while_typing() {
        let press = KeyPress::with_ctrl("K", FocusTarget::TextArea);
        assert_eq!(
            resolve_shortcut(&press),
            Some(Shortcut::FocusSearch { select: true })
        );
    }

    #[test]
    fn slash_focuses_search_only_outside_text_fields() {
        assert_eq!(
            resolve_shortcut(&KeyPress::plain("/", FocusTarget::Page)),
            Some(Shortcut::FocusSearch { select: false })
        );
        assert_eq!(
            resolve_shortcut(&KeyPress::plain("/", FocusTarget::ContentEditable)),
            None
        );
        assert_eq!(resolve_shortcut(&KeyPress::plain("k", FocusTarget::Page)), None);
    }
}
