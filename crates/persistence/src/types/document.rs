//! Schemaless document representation and entity mapping.
//!
//! Every entity is stored as a [`Document`]: an insertion-ordered map from
//! field name to JSON value. Conversion goes through `serde`, so field names
//! follow the entity's `#[serde(rename...)]` attributes, fields unknown to the
//! target type are dropped, and fields missing from the source fall back to
//! the target's defaults (with `#[serde(default)]`).

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{BackendError, StorageError, StorageResult};

/// Name of the identity field in every document.
pub const ID_FIELD: &str = "id";

/// Storage/wire form of an entity.
pub type Document = Map<String, Value>;

/// Any type that can be stored in a collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {}

impl<T> Entity for T where T: Serialize + DeserializeOwned + Send + Sync {}

/// Serializes an entity into a document.
///
/// Fails with a serialization error if the entity does not serialize to a map.
pub fn to_document<T: Serialize + ?Sized>(entity: &T) -> StorageResult<Document> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(StorageError::Backend(BackendError::SerializationError {
            message: format!("entity must serialize to a map, got {}", kind_of(&other)),
        })),
    }
}

/// Reconstructs an entity from a stored document.
pub fn from_document<T: DeserializeOwned>(document: Document) -> StorageResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Builds the field changes for a partial update.
///
/// The identity field and every name in `omit` are dropped.
pub fn update_fields(mut document: Document, omit: &[&str]) -> Document {
    document.retain(|key, _| key != ID_FIELD && !omit.contains(&key.as_str()));
    document
}

/// Returns the document's identity as a string, if present.
pub fn document_id(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Hero {
        #[serde(skip_serializing_if = "String::is_empty")]
        id: String,
        name: String,
        #[serde(rename = "createDate")]
        create_date: i64,
    }

    #[test]
    fn test_to_document_uses_serde_names() {
        let hero = Hero {
            id: String::new(),
            name: "Tony".to_string(),
            create_date: 10,
        };
        let doc = to_document(&hero).unwrap();
        assert_eq!(Value::Object(doc), json!({"name": "Tony", "createDate": 10}));
    }

    #[test]
    fn test_to_document_rejects_non_maps() {
        let err = to_document(&42).unwrap_err();
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn test_from_document_drops_unknown_and_defaults_missing() {
        let doc = json!({"id": "1", "power": "flight"});
        let Value::Object(doc) = doc else {
            unreachable!()
        };

        let hero: Hero = from_document(doc).unwrap();
        assert_eq!(
            hero,
            Hero {
                id: "1".to_string(),
                name: String::new(),
                create_date: 0,
            }
        );
    }

    #[test]
    fn test_from_document_type_mismatch_is_serialization_error() {
        let Value::Object(doc) = json!({"createDate": "yesterday"}) else {
            unreachable!()
        };
        let err = from_document::<Hero>(doc).unwrap_err();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::SerializationError { .. })
        ));
    }

    #[test]
    fn test_update_fields_strips_id_and_omitted() {
        let Value::Object(doc) = json!({"id": "1", "name": "Tony", "createDate": 5}) else {
            unreachable!()
        };
        let changes = update_fields(doc, &["createDate"]);
        assert_eq!(Value::Object(changes), json!({"name": "Tony"}));
    }
}
