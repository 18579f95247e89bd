use taskpad_core::{Record, RecordId, RecordValidationError};

const NOW: i64 = 1_700_000_000_000;

#[test]
fn new_record_trims_input_and_starts_open() {
    let record = Record::new("  Buy milk ", " 2% \n", NOW).unwrap();

    assert!(!record.id.as_str().is_empty());
    assert_eq!(record.title, "Buy milk");
    assert_eq!(record.body, "2%");
    assert!(!record.done);
    assert_eq!(record.created, NOW);
    assert_eq!(record.updated, record.created);
}

#[test]
fn new_record_rejects_blank_title() {
    let err = Record::new(" \t ", "body", NOW).unwrap_err();
    assert_eq!(err, RecordValidationError::EmptyTitle);
}

#[test]
fn generated_ids_are_unique() {
    let first = Record::new("a", "", NOW).unwrap();
    let second = Record::new("a", "", NOW).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn record_id_parse_rejects_blank_values() {
    assert!(RecordId::parse("  ").is_none());
    assert_eq!(RecordId::parse("k3j4h2").unwrap().as_str(), "k3j4h2");
}

#[test]
fn touch_strictly_increases_updated_even_without_clock_progress() {
    let mut record = Record::new("a", "", NOW).unwrap();
    record.touch(NOW);
    assert_eq!(record.updated, NOW + 1);
    record.touch(NOW + 50);
    assert_eq!(record.updated, NOW + 50);
    assert_eq!(record.created, NOW);
}

#[test]
fn duplicate_gets_fresh_identity_and_reopens() {
    let mut record = Record::new("a", "b", NOW).unwrap();
    record.done = true;

    let copy = record.duplicate(NOW + 10);
    assert_ne!(copy.id, record.id);
    assert_eq!(copy.title, "a");
    assert_eq!(copy.body, "b");
    assert!(!copy.done);
    assert_eq!((copy.created, copy.updated), (NOW + 10, NOW + 10));
}

#[test]
fn serialization_uses_export_field_names() {
    let id = RecordId::parse("abc123").unwrap();
    let record = Record::with_id(id, "Title", "Body", NOW).unwrap();

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], "abc123");
    assert_eq!(json["title"], "Title");
    assert_eq!(json["desc"], "Body");
    assert_eq!(json["done"], false);
    assert_eq!(json["created"], NOW);
    assert_eq!(json["updated"], NOW);
    assert!(json.get("body").is_none());

    let decoded: Record = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn deserialization_accepts_body_aliases() {
    let value = serde_json::json!({
        "id": "n1",
        "title": "Note",
        "content": "from a note variant",
        "created": 1,
        "updated": 2
    });
    let record: Record = serde_json::from_value(value).unwrap();
    assert_eq!(record.body, "from a note variant");
    assert!(!record.done);
}

#[test]
fn deserialization_rejects_broken_invariants() {
    let reversed = serde_json::json!({
        "id": "n1", "title": "x", "desc": "", "done": false, "created": 20, "updated": 10
    });
    let err = serde_json::from_value::<Record>(reversed).unwrap_err();
    assert!(
        err.to_string().contains("must be >= created"),
        "unexpected error: {err}"
    );

    let blank_title = serde_json::json!({
        "id": "n1", "title": "  ", "desc": "", "done": false, "created": 1, "updated": 1
    });
    assert!(serde_json::from_value::<Record>(blank_title).is_err());
}

#[test]
fn matches_text_checks_title_and_body_case_insensitively() {
    let record = Record::new("Buy Milk", "Whole FOODS", NOW).unwrap();
    assert!(record.matches_text("milk"));
    assert!(record.matches_text("foods"));
    assert!(record.matches_text(""));
    assert!(!record.matches_text("bread"));
}
