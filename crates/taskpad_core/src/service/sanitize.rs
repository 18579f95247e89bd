//! Import payload sanitization.
//!
//! # Responsibility
//! - Turn an arbitrary JSON document into records that satisfy every
//!   [`Record`] invariant, or reject it as a whole.
//!
//! # Invariants
//! - Only a top-level JSON array is accepted.
//! - Output ids are unique; titles are trimmed, non-empty and capped.
//! - `updated >= created` on every output record.

use crate::config::RecordLimits;
use crate::model::record::{Record, RecordId};
use crate::service::record_store::StoreError;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const UNTITLED: &str = "Untitled";
const BODY_FIELDS: [&str; 3] = ["desc", "body", "content"];

/// Import failure. The store is never modified when this is returned.
#[derive(Debug)]
pub enum ImportError {
    /// Payload is not valid JSON.
    Parse(serde_json::Error),
    /// Payload is valid JSON but not an array.
    NotASequence { found: &'static str },
    /// Sanitized records could not be persisted.
    Store(StoreError),
    /// Import file could not be read.
    Io(std::io::Error),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "import payload is not valid JSON: {err}"),
            Self::NotASequence { found } => {
                write!(f, "import payload must be a JSON array, found {found}")
            }
            Self::Store(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "failed to read import file: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::NotASequence { .. } => None,
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<StoreError> for ImportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for ImportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Sanitized import payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedImport {
    pub records: Vec<Record>,
    /// Array elements dropped because they were not JSON objects.
    pub skipped: usize,
}

/// Parses and sanitizes an exported JSON document.
pub fn parse_import(
    text: &str,
    limits: RecordLimits,
    now_ms: i64,
) -> Result<SanitizedImport, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Parse)?;
    sanitize_import(&value, limits, now_ms)
}

/// Sanitizes an already-parsed JSON document.
fn sanitize_import(
    value: &Value,
    limits: RecordLimits,
    now_ms: i64,
) -> Result<SanitizedImport, ImportError> {
    let Value::Array(items) = value else {
        return Err(ImportError::NotASequence {
            found: json_kind(value),
        });
    };
    Ok(sanitize_items(items, limits, now_ms))
}

/// Sanitizes a sequence of JSON elements; non-object elements are skipped.
fn sanitize_items(items: &[Value], limits: RecordLimits, now_ms: i64) -> SanitizedImport {
    let mut seen = HashSet::with_capacity(items.len());
    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        match item {
            Value::Object(fields) => {
                records.push(sanitize_item(fields, limits, now_ms, &mut seen));
            }
            _ => skipped += 1,
        }
    }

    SanitizedImport { records, skipped }
}

/// Sanitizes typed records for a wholesale replace.
///
/// Records that already pass [`Record::validate`] keep their id and
/// timestamps; only over-long text is clamped. Invalid records and repeated
/// ids go through the import rules above.
pub fn sanitize_records(
    records: &[Record],
    limits: RecordLimits,
    now_ms: i64,
) -> Result<Vec<Record>, serde_json::Error> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut sanitized = Vec::with_capacity(records.len());
    for record in records {
        if record.validate().is_ok() && seen.insert(record.id.clone()) {
            sanitized.push(Record {
                title: limits.clamp_title(&record.title),
                body: limits.clamp_body(&record.body),
                ..record.clone()
            });
            continue;
        }
        if let Value::Object(fields) = serde_json::to_value(record)? {
            sanitized.push(sanitize_item(&fields, limits, now_ms, &mut seen));
        }
    }
    Ok(sanitized)
}

fn sanitize_item(
    fields: &Map<String, Value>,
    limits: RecordLimits,
    now_ms: i64,
    seen: &mut HashSet<RecordId>,
) -> Record {
    let id = fields
        .get("id")
        .and_then(Value::as_str)
        .and_then(RecordId::parse)
        .filter(|id| !seen.contains(id))
        .unwrap_or_else(RecordId::generate);
    seen.insert(id.clone());

    let title = limits.clamp_title(&coerce_text(fields.get("title")));
    let title = if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    };

    let body_source = BODY_FIELDS.iter().find_map(|name| fields.get(*name));
    let body = limits.clamp_body(&coerce_text(body_source));

    let created = coerce_timestamp(fields.get("created")).unwrap_or(now_ms);
    let updated = coerce_timestamp(fields.get("updated"))
        .unwrap_or(now_ms)
        .max(created);

    Record {
        id,
        title,
        body,
        done: is_truthy(fields.get("done")),
        created,
        updated,
    }
}

/// Falsy values (missing, null, false, 0, "") become empty text.
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(value) if !is_truthy(Some(value)) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Epoch milliseconds from a number, numeric string or RFC 3339 string.
///
/// Zero and unparseable values yield `None`.
fn coerce_timestamp(value: Option<&Value>) -> Option<i64> {
    let ms = match value? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|n| n.is_finite()).map(|n| n as i64))?,
        Value::String(text) => parse_timestamp_text(text.trim())?,
        _ => return None,
    };
    (ms != 0).then_some(ms)
}

fn parse_timestamp_text(text: &str) -> Option<i64> {
    if let Ok(number) = text.parse::<f64>() {
        return number.is_finite().then_some(number as i64);
    }
    let parsed = OffsetDateTime::parse(text, &Rfc3339).ok()?;
    i64::try_from(parsed.unix_timestamp_nanos() / 1_000_000).ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
