//! Translation between compiled queries, documents and BSON.
//!
//! The logical identity field `id` is stored as MongoDB's `_id`. Identity
//! values that parse as an [`ObjectId`] are converted so lookups hit the
//! primary index.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson, Document as BsonDocument};
use serde_json::Value;

use crate::core::{Clause, ClauseValue, CompiledQuery};
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{Document, ID_FIELD};

/// Native identity key.
pub(crate) const MONGO_ID: &str = "_id";

/// Builds a MongoDB filter document, keeping clause order.
pub(crate) fn to_filter(query: &CompiledQuery) -> StorageResult<BsonDocument> {
    let mut filter = BsonDocument::new();
    for clause in query.clauses() {
        let (key, value) = clause_to_bson(clause)?;
        filter.insert(key, value);
    }
    Ok(filter)
}

fn clause_to_bson(clause: &Clause) -> StorageResult<(String, Bson)> {
    let value = match &clause.value {
        ClauseValue::Value(value) => json_to_bson(value)?,
        ClauseValue::Clause(inner) => Bson::Document(single(clause_to_bson(inner)?)),
        ClauseValue::Clauses(clauses) => Bson::Array(
            clauses
                .iter()
                .map(|c| clause_to_bson(c).map(|entry| Bson::Document(single(entry))))
                .collect::<StorageResult<Vec<_>>>()?,
        ),
    };

    if clause.key == ID_FIELD {
        Ok((MONGO_ID.to_string(), object_ids(value)))
    } else {
        Ok((clause.key.clone(), value))
    }
}

fn single((key, value): (String, Bson)) -> BsonDocument {
    let mut document = BsonDocument::new();
    document.insert(key, value);
    document
}

/// Converts every string that is a valid object id, looking through
/// operator documents and arrays.
fn object_ids(value: Bson) -> Bson {
    match value {
        Bson::String(s) => match ObjectId::parse_str(&s) {
            Ok(oid) => Bson::ObjectId(oid),
            Err(_) => Bson::String(s),
        },
        Bson::Array(items) => Bson::Array(items.into_iter().map(object_ids).collect()),
        Bson::Document(document) => Bson::Document(
            document
                .into_iter()
                .map(|(k, v)| (k, object_ids(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Filter selecting the document with identity `id`, or `None` when `id` is
/// not a valid object id and therefore cannot exist.
pub(crate) fn id_filter(id: &str) -> Option<BsonDocument> {
    let oid = ObjectId::parse_str(id).ok()?;
    Some(single((MONGO_ID.to_string(), Bson::ObjectId(oid))))
}

/// Converts a document for storage, dropping the logical identity.
pub(crate) fn to_bson_document(document: Document) -> StorageResult<BsonDocument> {
    let mut out = BsonDocument::new();
    for (key, value) in document {
        if key == ID_FIELD || key == MONGO_ID {
            continue;
        }
        out.insert(key, json_to_bson(&value)?);
    }
    Ok(out)
}

/// Converts a stored document back, exposing `_id` as the string `id`.
pub(crate) fn from_bson_document(mut document: BsonDocument) -> Document {
    let mut out = Document::new();
    if let Some(id) = document.remove(MONGO_ID) {
        out.insert(ID_FIELD.to_string(), Value::String(id_to_string(id)));
    }
    for (key, value) in document {
        out.insert(key, value.into_relaxed_extjson());
    }
    out
}

/// Renders an identity value as the string exposed to callers.
pub(crate) fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.into_relaxed_extjson().to_string(),
    }
}

fn json_to_bson(value: &Value) -> StorageResult<Bson> {
    bson::to_bson(value).map_err(|e| {
        StorageError::Backend(BackendError::SerializationError {
            message: format!("failed to convert value to BSON: {}", e),
        })
    })
}
