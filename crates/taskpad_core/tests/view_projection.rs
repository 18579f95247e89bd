use taskpad_core::{
    project, render_page, FilterMode, Focus, ListView, Record, RecordId, Screen, SortMode, Theme,
    UiState, ViewQuery,
};

fn record(id: &str, title: &str, body: &str, done: bool, created: i64) -> Record {
    let mut record = Record::with_id(RecordId::parse(id).unwrap(), title, body, created).unwrap();
    record.done = done;
    record
}

fn sample() -> Vec<Record> {
    vec![
        record("1", "Buy milk", "2%", false, 300),
        record("2", "Call mom", "Sunday", true, 100),
        record("3", "buy stamps", "", false, 200),
        record("4", "Alpha", "MILK powder", true, 400),
    ]
}

fn ids(rows: &[&Record]) -> Vec<String> {
    rows.iter().map(|record| record.id.to_string()).collect()
}

fn query(text: &str, filter: FilterMode, sort: SortMode) -> ViewQuery {
    ViewQuery {
        text: text.to_string(),
        filter,
        sort,
    }
}

#[test]
fn default_query_shows_everything_newest_first() {
    let records = sample();
    let rows = project(&records, &ViewQuery::default());
    assert_eq!(ids(&rows), vec!["4", "1", "3", "2"]);
}

#[test]
fn search_is_trimmed_case_insensitive_on_title_and_body() {
    let records = sample();
    let rows = project(
        &records,
        &query("  MILK ", FilterMode::All, SortMode::CreatedAsc),
    );
    assert_eq!(ids(&rows), vec!["1", "4"]);

    let rows = project(&records, &query("buy", FilterMode::All, SortMode::CreatedAsc));
    assert_eq!(ids(&rows), vec!["3", "1"]);
}

#[test]
fn filter_modes_select_by_status() {
    let records = sample();
    let open = project(&records, &query("", FilterMode::Open, SortMode::CreatedAsc));
    assert_eq!(ids(&open), vec!["3", "1"]);
    let done = project(&records, &query("", FilterMode::Done, SortMode::CreatedAsc));
    assert_eq!(ids(&done), vec!["2", "4"]);
}

#[test]
fn search_and_filter_combine() {
    let records = sample();
    let rows = project(&records, &query("milk", FilterMode::Done, SortMode::default()));
    assert_eq!(ids(&rows), vec!["4"]);
}

#[test]
fn title_sort_uses_plain_string_ordering() {
    let records = sample();
    let asc = project(&records, &query("", FilterMode::All, SortMode::TitleAsc));
    assert_eq!(ids(&asc), vec!["4", "1", "2", "3"]);
    let desc = project(&records, &query("", FilterMode::All, SortMode::TitleDesc));
    assert_eq!(ids(&desc), vec!["3", "2", "1", "4"]);
}

#[test]
fn ties_keep_store_order_in_both_title_directions() {
    let records = vec![
        record("a", "same", "", false, 1),
        record("b", "other", "", false, 2),
        record("c", "same", "", false, 3),
    ];
    let asc = project(&records, &query("", FilterMode::All, SortMode::TitleAsc));
    assert_eq!(ids(&asc), vec!["b", "a", "c"]);
    let desc = project(&records, &query("", FilterMode::All, SortMode::TitleDesc));
    assert_eq!(ids(&desc), vec!["a", "c", "b"]);
}

#[test]
fn projection_does_not_modify_records() {
    let records = sample();
    let before = records.clone();
    let _ = project(&records, &query("milk", FilterMode::Open, SortMode::TitleDesc));
    assert_eq!(records, before);
}

#[test]
fn unknown_mode_names_fall_back_to_defaults() {
    assert_eq!(FilterMode::parse_or_default("archived"), FilterMode::All);
    assert_eq!(SortMode::parse_or_default("priority"), SortMode::CreatedDesc);
    assert!("priority".parse::<SortMode>().is_err());
}

#[test]
fn empty_result_renders_explicit_empty_state() {
    let records = sample();
    let ui = UiState {
        query: query("nothing matches", FilterMode::All, SortMode::default()),
        ..UiState::default()
    };
    let view = render_page(&records, &ui);
    assert!(view.list.is_empty_state());
    assert!(view.list.rows().is_empty());
    assert_eq!(view.total, 4);

    let empty = render_page(&[], &UiState::default());
    assert!(matches!(empty.list, ListView::Empty { .. }));
    assert!(empty.to_string().contains("Nothing here yet."));
}

#[test]
fn rows_carry_status_meta_and_class() {
    let mut done = record("1", "Ship it", "", true, 1_700_000_000_000);
    done.updated = 1_700_000_060_000;
    let view = render_page(&[done], &UiState::default());

    let row = &view.list.rows()[0];
    assert_eq!(row.status_label, "Done");
    assert_eq!(row.class_name, "item done");
    assert_eq!(row.meta, "Created 14 Nov, 22:13 \u{2022} Updated 14 Nov, 22:14");
}

#[test]
fn toolbar_reflects_ui_state() {
    let ui = UiState {
        query: query("abc", FilterMode::Open, SortMode::TitleAsc),
        theme: Theme::Light,
        focus: Focus::Search { selected: true },
    };
    let view = render_page(&sample(), &ui);
    assert_eq!(view.theme, Theme::Light);
    assert_eq!(view.toolbar.search, "abc");
    assert!(view.toolbar.search_focused);
    assert!(view.toolbar.search_selected);
    assert_eq!(view.toolbar.filter, FilterMode::Open);
    assert_eq!(view.toolbar.sort, SortMode::TitleAsc);
}

#[test]
fn rendering_is_pure_and_screen_replaces_view() {
    let records = sample();
    let ui = UiState::default();
    let first = render_page(&records, &ui);
    let second = render_page(&records, &ui);
    assert_eq!(first, second);

    let mut screen = Screen::new();
    assert!(screen.present(first.clone()));
    assert!(!screen.present(second));
    assert_eq!(screen.frames(), 2);

    let filtered = render_page(
        &records,
        &UiState {
            query: query("", FilterMode::Done, SortMode::default()),
            ..UiState::default()
        },
    );
    assert!(screen.present(filtered.clone()));
    assert_eq!(screen.current(), Some(&filtered));
    assert_eq!(screen.current().unwrap().list.rows().len(), 2);
}
