//! Transient UI state driving the projection.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Unrecognized mode string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError {
    pub kind: &'static str,
    pub value: String,
}

impl Display for ParseModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl Error for ParseModeError {}

/// Status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Open,
    Done,
}

impl FilterMode {
    pub const ALL: [Self; 3] = [Self::All, Self::Open, Self::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Open => "open",
            Self::Done => "done",
        }
    }

    pub fn admits(self, done: bool) -> bool {
        match self {
            Self::All => true,
            Self::Open => !done,
            Self::Done => done,
        }
    }

    /// Parses `value`, falling back to [`FilterMode::All`].
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for FilterMode {
    type Err = ParseModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value.trim())
            .ok_or_else(|| ParseModeError {
                kind: "filter",
                value: value.to_string(),
            })
    }
}

/// Display ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    CreatedDesc,
    CreatedAsc,
    TitleAsc,
    TitleDesc,
}

impl SortMode {
    pub const ALL: [Self; 4] = [
        Self::CreatedDesc,
        Self::CreatedAsc,
        Self::TitleAsc,
        Self::TitleDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedDesc => "created_desc",
            Self::CreatedAsc => "created_asc",
            Self::TitleAsc => "title_asc",
            Self::TitleDesc => "title_desc",
        }
    }

    /// Parses `value`, falling back to [`SortMode::CreatedDesc`].
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for SortMode {
    type Err = ParseModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value.trim())
            .ok_or_else(|| ParseModeError {
                kind: "sort",
                value: value.to_string(),
            })
    }
}

/// Color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = ParseModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(ParseModeError {
                kind: "theme",
                value: other.to_string(),
            }),
        }
    }
}

/// Projection inputs: search text, status filter and ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub text: String,
    pub filter: FilterMode,
    pub sort: SortMode,
}

/// Which control currently has focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    None,
    Search {
        selected: bool,
    },
    TitleInput,
}

/// Complete transient UI state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub query: ViewQuery,
    pub theme: Theme,
    pub focus: Focus,
}

#[cfg(test)]
mod tests {
    use super::{FilterMode, SortMode, Theme};

    #[test]
    fn modes_round_trip_through_their_names() {
        for mode in FilterMode::ALL {
            assert_eq!(mode.as_str().parse::<FilterMode>().unwrap(), mode);
        }
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>().unwrap(), mode);
        }
    }

    #[test]
    fn unknown_modes_fall_back_to_defaults() {
        assert_eq!(FilterMode::parse_or_default("archived"), FilterMode::All);
        assert_eq!(SortMode::parse_or_default(""), SortMode::CreatedDesc);
        assert!("purple".parse::<Theme>().is_err());
    }

    #[test]
    fn theme_toggles_between_dark_and_light() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
