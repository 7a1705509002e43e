//! MongoDB backend implementation.
//!
//! Stores each collection as a MongoDB collection of BSON documents. Compiled
//! queries map one-to-one onto MongoDB filter documents, so every operator the
//! server understands is available to callers.
//!
//! # Identity
//!
//! Documents expose their identity as the string field `id`; in the database
//! it lives in `_id` as an `ObjectId`. Ids that are not 24-character hex
//! strings cannot exist and are reported as lookup misses.

mod backend;
mod query;

pub use backend::MongoBackend;
