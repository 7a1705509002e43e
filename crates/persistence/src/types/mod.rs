//! Core types for the persistence layer.
//!
//! - [`Filter`], [`FilterValue`] - Composable query predicates
//! - [`Document`], [`Entity`] - Schemaless storage form and typed entities
//! - [`PaginationConfig`], [`PageWindow`] - Page request normalization
//!
//! # Examples
//!
//! ## Building Filters
//!
//! ```
//! use owl_persistence::types::Filter;
//!
//! let filters = vec![
//!     Filter::eq("role", "genius"),
//!     Filter::op("status", "$in", vec!["active", "invited"]),
//! ];
//! assert_eq!(filters.len(), 2);
//! ```
//!
//! ## Pagination
//!
//! ```
//! use owl_persistence::types::{normalize, PaginationConfig};
//!
//! let config = PaginationConfig::new(10, 100);
//! let window = normalize(Some(3), None, &config);
//! assert_eq!(window.skip, 20);
//! assert_eq!(window.page_size, 10);
//! ```

mod document;
mod filter;
mod pagination;

pub use document::{
    Document, Entity, ID_FIELD, document_id, from_document, to_document, update_fields,
};

pub use filter::{AND, Filter, FilterValue, OR};

pub use pagination::{MAX_SKIP, PageRequest, PageWindow, PaginationConfig, normalize};
