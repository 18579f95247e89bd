use serde_json::{json, Value};
use taskpad_core::{
    AppConfig, ImportError, ImportSummary, ManualClock, MemoryKeyValueStore, RecordId,
    RecordStore,
};

const NOW: i64 = 1_700_000_000_000;

#[test]
fn import_replaces_collection_and_reports_summary() {
    let kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(NOW);
    let mut store = RecordStore::open(&kv, &clock, &AppConfig::default());
    store.create("old", "").unwrap();

    let text = json!([
        {"id": "a", "title": "Alpha", "desc": "first", "done": true, "created": 10, "updated": 20},
        "not an object",
        {"id": "b", "title": "Beta", "created": 30, "updated": 30}
    ])
    .to_string();
    let summary = store.import_json(&text).unwrap();

    assert_eq!(
        summary,
        ImportSummary {
            imported: 2,
            skipped: 1
        }
    );
    let titles = store
        .records()
        .iter()
        .map(|record| record.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Alpha", "Beta"]);

    let alpha = store.get(&RecordId::parse("a").unwrap()).unwrap();
    assert_eq!(alpha.body, "first");
    assert!(alpha.done);
    assert_eq!((alpha.created, alpha.updated), (10, 20));
}

#[test]
fn import_of_non_array_leaves_store_unchanged() {
    let kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(NOW);
    let mut store = RecordStore::open(&kv, &clock, &AppConfig::default());
    store.create("keep", "").unwrap();
    let before = store.records().to_vec();

    let err = store.import_json(r#"{"title": "x"}"#).unwrap_err();
    assert!(matches!(err, ImportError::NotASequence { found: "object" }));
    assert_eq!(store.records(), before.as_slice());
}

#[test]
fn import_of_invalid_json_leaves_store_unchanged() {
    let kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(NOW);
    let mut store = RecordStore::open(&kv, &clock, &AppConfig::default());
    store.create("keep", "").unwrap();
    let before = store.records().to_vec();

    let err = store.import_json("[{\"title\": ").unwrap_err();
    assert!(matches!(err, ImportError::Parse(_)));
    assert_eq!(store.records(), before.as_slice());
}

#[test]
fn import_that_fails_to_persist_leaves_store_unchanged() {
    let kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(NOW);
    let mut store = RecordStore::open(&kv, &clock, &AppConfig::default());
    store.create("keep", "").unwrap();
    let before = store.records().to_vec();

    kv.set_read_only(true);
    let err = store.import_json(r#"[{"title": "new"}]"#).unwrap_err();
    assert!(matches!(err, ImportError::Store(_)));
    assert_eq!(store.records(), before.as_slice());
}

#[test]
fn import_sanitizes_fields() {
    let kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(NOW);
    let mut store = RecordStore::open(&kv, &clock, &AppConfig::default());

    let long_title = "t".repeat(250);
    let text = json!([
        {"id": "dup", "title": "   ", "content": "from content", "done": "yes"},
        {"id": "dup", "title": 42, "body": "from body", "done": 0},
        {"id": "", "title": long_title, "created": "2023-11-14T22:13:20Z", "updated": 5},
        {"title": true, "created": "1700000000123", "updated": "garbage"}
    ])
    .to_string();
    store.import_json(&text).unwrap();

    let records = store.records();
    assert_eq!(records.len(), 4);

    assert_eq!(records[0].id.as_str(), "dup");
    assert_eq!(records[0].title, "Untitled");
    assert_eq!(records[0].body, "from content");
    assert!(records[0].done);
    assert_eq!((records[0].created, records[0].updated), (NOW, NOW));

    assert_ne!(records[1].id.as_str(), "dup");
    assert_eq!(records[1].title, "42");
    assert_eq!(records[1].body, "from body");
    assert!(!records[1].done);

    assert!(!records[2].id.as_str().is_empty());
    assert_eq!(records[2].title.chars().count(), 200);
    assert_eq!(records[2].created, 1_700_000_000_000);
    assert_eq!(records[2].updated, records[2].created);

    assert_eq!(records[3].title, "true");
    assert_eq!(records[3].created, 1_700_000_000_123);
    assert_eq!(records[3].updated, records[3].created);

    for record in records {
        record.validate().unwrap();
    }
}

#[test]
fn export_is_pretty_json_array_with_export_field_names() {
    let kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(NOW);
    let mut store = RecordStore::open(&kv, &clock, &AppConfig::default());
    store.create("Buy milk", "2%").unwrap();

    let text = store.export_json().unwrap();
    assert!(text.starts_with("[\n  {"));

    let value: Value = serde_json::from_str(&text).unwrap();
    let item = &value.as_array().unwrap()[0];
    assert_eq!(item["title"], "Buy milk");
    assert_eq!(item["desc"], "2%");
    assert_eq!(item["done"], false);
    assert_eq!(item["created"], NOW);
    assert_eq!(item["updated"], NOW);
}

#[test]
fn export_then_import_restores_same_collection() {
    let source_kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(NOW);
    let mut source = RecordStore::open(&source_kv, &clock, &AppConfig::default());
    let first = source.create("first", "body").unwrap();
    clock.advance(100);
    source.create("second", "").unwrap();
    source.toggle(&first.id).unwrap();
    let exported = source.export_json().unwrap();

    let target_kv = MemoryKeyValueStore::new();
    let mut target = RecordStore::open(&target_kv, &clock, &AppConfig::default());
    target.import_json(&exported).unwrap();

    assert_eq!(target.records(), source.records());
}

#[test]
fn import_respects_configured_limits() {
    let kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(NOW);
    let config = AppConfig {
        title_max_chars: 5,
        body_max_chars: 3,
        ..AppConfig::default()
    };
    let mut store = RecordStore::open(&kv, &clock, &config);

    store
        .import_json(r#"[{"title": "abcdefgh", "desc": "wxyz"}]"#)
        .unwrap();
    assert_eq!(store.records()[0].title, "abcde");
    assert_eq!(store.records()[0].body, "wxy");
}

#[test]
fn export_then_import_preserves_records_at_length_limits() {
    let source_kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(NOW);
    let mut source = RecordStore::open(&source_kv, &clock, &AppConfig::default());
    source
        .create(&"t".repeat(250), &"b".repeat(5_000))
        .unwrap();
    let exported = source.export_json().unwrap();

    let target_kv = MemoryKeyValueStore::new();
    let mut target = RecordStore::open(&target_kv, &clock, &AppConfig::default());
    target.import_json(&exported).unwrap();

    assert_eq!(target.records(), source.records());
    assert_eq!(target.records()[0].title.chars().count(), 200);
    assert_eq!(target.records()[0].body.chars().count(), 4_000);
}
