//! Conversion between MongoDB documents and the plain JSON handed to clients.
//!
//! Reads go through a generic recursive walk that turns every BSON-only type
//! into a JSON primitive. Writes are passed through as they came in.

use mongodb::bson::{self, Bson, Document};
use serde_json::{Map, Number, Value};

use crate::models::song::Song;

pub fn document_to_json(doc: &Document) -> Song {
    doc.iter()
        .map(|(key, value)| (key.clone(), bson_to_json(value)))
        .collect::<Map<String, Value>>()
}

pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::from(*i),
        Bson::Int64(i) => Value::from(*i),
        Bson::Double(f) => match Number::from_f64(*f) {
            Some(n) => Value::Number(n),
            // NaN and the infinities have no JSON number form
            None => Value::String(f.to_string()),
        },
        Bson::String(s) => Value::String(s.clone()),
        Bson::Symbol(s) | Bson::JavaScriptCode(s) => Value::String(s.clone()),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(doc) => Value::Object(document_to_json(doc)),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        ),
        other => Value::String(other.to_string()),
    }
}

pub fn json_to_document(song: &Song) -> Result<Document, bson::ser::Error> {
    bson::to_document(song)
}

/// Renders the identifier returned by an insert as a string.
pub fn inserted_id_string(id: &Bson) -> String {
    match bson_to_json(id) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
