//! Typed records to documents and back.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::document::{Document, ID_FIELD};
use crate::error::StoreError;

/// Serialize a record into a document, dropping any `_id` it carries.
pub fn to_document<T: Serialize>(record: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(mut map) => {
            map.remove(ID_FIELD);
            Ok(map)
        }
        Value::Array(_) => Err(StoreError::NotAnObject("array")),
        _ => Err(StoreError::NotAnObject("scalar")),
    }
}

/// Deserialize a stored document (including its `_id`) into a record.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}
