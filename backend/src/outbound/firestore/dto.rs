//! DTOs for Firestore `runQuery` requests and responses.
//!
//! Firestore wraps every field in a typed envelope (`stringValue`,
//! `integerValue`, ...). The adapter decodes rows into these DTOs first,
//! then flattens the typed values into plain JSON in one pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value, json};

use crate::domain::ports::StoredDocument;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RunQueryRequestDto {
    pub(super) structured_query: Value,
}

impl RunQueryRequestDto {
    pub(super) fn field_equals(collection: &str, field: &str, value: &str) -> Self {
        Self {
            structured_query: json!({
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": { "stringValue": value },
                    }
                }
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RunQueryRowDto {
    #[serde(default)]
    pub(super) document: Option<DocumentDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DocumentDto {
    pub(super) name: String,
    #[serde(default)]
    pub(super) fields: BTreeMap<String, Value>,
}

impl DocumentDto {
    pub(super) fn into_domain(self) -> StoredDocument {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned();
        let fields = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), decode_value(value)))
            .collect();
        StoredDocument { id, fields }
    }
}

/// Flatten a Firestore typed value into plain JSON.
///
/// Unknown envelopes pass through untouched.
pub(super) fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value
        .as_object()
        .filter(|object| object.len() == 1)
        .and_then(|object| object.iter().next())
    else {
        return value.clone();
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" | "booleanValue"
        | "doubleValue" => inner.clone(),
        "nullValue" => Value::Null,
        "integerValue" => decode_integer(inner),
        "mapValue" => {
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .map(|fields| {
                    fields
                        .iter()
                        .map(|(name, field)| (name.clone(), decode_value(field)))
                        .collect::<Map<_, _>>()
                })
                .unwrap_or_default();
            Value::Object(fields)
        }
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        _ => value.clone(),
    }
}

/// Integers arrive as decimal strings to survive 64-bit precision loss.
fn decode_integer(inner: &Value) -> Value {
    inner
        .as_str()
        .and_then(|text| text.parse::<i64>().ok())
        .map(|parsed| Value::Number(Number::from(parsed)))
        .unwrap_or_else(|| inner.clone())
}
