//! Filtering and ordering of records for display.

use crate::model::record::Record;
use crate::view::state::{SortMode, ViewQuery};
use std::cmp::Ordering;

/// Returns the records visible under `query`, in display order.
///
/// Text matching is a trimmed, case-insensitive substring test on title or
/// body. Sorting is stable, so ties keep their store order.
pub fn project<'a>(records: &'a [Record], query: &ViewQuery) -> Vec<&'a Record> {
    let needle = query.text.trim().to_lowercase();
    let mut rows = records
        .iter()
        .filter(|record| query.filter.admits(record.done) && record.matches_text(&needle))
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| compare(query.sort, a, b));
    rows
}

fn compare(sort: SortMode, a: &Record, b: &Record) -> Ordering {
    match sort {
        SortMode::CreatedDesc => b.created.cmp(&a.created),
        SortMode::CreatedAsc => a.created.cmp(&b.created),
        SortMode::TitleAsc => a.title.cmp(&b.title),
        SortMode::TitleDesc => b.title.cmp(&a.title),
    }
}
