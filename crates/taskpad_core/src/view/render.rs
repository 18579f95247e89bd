//! Declarative page description.
//!
//! [`render_page`] maps store and UI state to a [`PageView`] value. Hosts
//! replace their previous view wholesale with the new one (see [`Screen`]);
//! nothing from an earlier render survives into the next.

use crate::model::record::{Record, RecordId};
use crate::view::projector::project;
use crate::view::state::{FilterMode, Focus, SortMode, Theme, UiState};
use std::fmt::{Display, Formatter};
use time::macros::format_description;
use time::OffsetDateTime;

pub const EMPTY_STATE_MESSAGE: &str = "Nothing here yet.";

/// One visible record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: RecordId,
    pub title: String,
    pub body: String,
    pub done: bool,
    /// `Done` or `Open`.
    pub status_label: &'static str,
    /// `Created <when> • Updated <when>`.
    pub meta: String,
    pub class_name: &'static str,
}

impl RowView {
    fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            body: record.body.clone(),
            done: record.done,
            status_label: if record.done { "Done" } else { "Open" },
            meta: format!(
                "Created {} \u{2022} Updated {}",
                format_timestamp(record.created),
                format_timestamp(record.updated)
            ),
            class_name: if record.done { "item done" } else { "item" },
        }
    }
}

/// The list area: either rows or the explicit empty state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Empty { message: &'static str },
    Rows(Vec<RowView>),
}

impl ListView {
    pub fn rows(&self) -> &[RowView] {
        match self {
            Self::Empty { .. } => &[],
            Self::Rows(rows) => rows,
        }
    }

    pub fn is_empty_state(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarView {
    pub search: String,
    pub search_focused: bool,
    pub search_selected: bool,
    pub filter: FilterMode,
    pub sort: SortMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub theme: Theme,
    pub toolbar: ToolbarView,
    pub list: ListView,
    /// Records in the store, visible or not.
    pub total: usize,
}

/// Renders the page for `records` under `ui`.
pub fn render_page(records: &[Record], ui: &UiState) -> PageView {
    let rows = project(records, &ui.query)
        .into_iter()
        .map(RowView::from_record)
        .collect::<Vec<_>>();
    let list = if rows.is_empty() {
        ListView::Empty {
            message: EMPTY_STATE_MESSAGE,
        }
    } else {
        ListView::Rows(rows)
    };

    let (search_focused, search_selected) = match ui.focus {
        Focus::Search { selected } => (true, selected),
        _ => (false, false),
    };

    PageView {
        theme: ui.theme,
        toolbar: ToolbarView {
            search: ui.query.text.clone(),
            search_focused,
            search_selected,
            filter: ui.query.filter,
            sort: ui.query.sort,
        },
        list,
        total: records.len(),
    }
}

/// Formats epoch milliseconds as `14 Nov, 22:13` (UTC).
pub fn format_timestamp(ms: i64) -> String {
    let nanos = i128::from(ms) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| {
            dt.format(format_description!(
                "[day] [month repr:short], [hour]:[minute]"
            ))
            .ok()
        })
        .unwrap_or_else(|| ms.to_string())
}

impl Display for PageView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "[{}] search=\"{}\" filter={} sort={} ({} total)",
            self.theme.as_str(),
            self.toolbar.search,
            self.toolbar.filter.as_str(),
            self.toolbar.sort.as_str(),
            self.total
        )?;
        match &self.list {
            ListView::Empty { message } => writeln!(f, "  {message}"),
            ListView::Rows(rows) => {
                for row in rows {
                    let check = if row.done { 'x' } else { ' ' };
                    writeln!(f, "[{check}] {}  ({})", row.title, row.status_label)?;
                    writeln!(f, "    id: {}", row.id)?;
                    writeln!(f, "    {}", row.meta)?;
                    for line in row.body.lines() {
                        writeln!(f, "    | {line}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Presentation host that keeps exactly one current view.
#[derive(Debug, Default)]
pub struct Screen {
    current: Option<PageView>,
    frames: u64,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current view. Returns `true` when it differs from the
    /// previous one.
    pub fn present(&mut self, view: PageView) -> bool {
        let changed = self.current.as_ref() != Some(&view);
        self.current = Some(view);
        self.frames += 1;
        changed
    }

    pub fn current(&self) -> Option<&PageView> {
        self.current.as_ref()
    }

    /// Number of views presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
