//! Filter value objects.
//!
//! A [`Filter`] is one query predicate: a field name (or operator) and a
//! [`FilterValue`]. Filters compose recursively to express boolean trees:
//!
//! ```
//! use owl_persistence::types::Filter;
//!
//! // role = "admin" AND (age > 18 OR vip = true)
//! let filters = vec![
//!     Filter::eq("role", "admin"),
//!     Filter::or(vec![
//!         Filter::op("age", "$gt", 18),
//!         Filter::eq("vip", true),
//!     ]),
//! ];
//! assert_eq!(filters[1].name, "$or");
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The `$or` boolean operator.
pub const OR: &str = "$or";

/// The `$and` boolean operator.
pub const AND: &str = "$and";

/// A single query predicate.
///
/// When `name` is a boolean operator (`$or`, `$and`) the value must be a
/// [`FilterValue::List`]. When the value is a [`FilterValue::Nested`] filter,
/// the nested filter's name is an operator applied to the field
/// (`{name: "age", value: {name: "$gt", value: 18}}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Field name, or operator name for boolean nodes.
    pub name: String,
    /// The predicate operand.
    pub value: FilterValue,
}

/// The operand of a [`Filter`].
///
/// Serialized untagged so the wire shape stays
/// `{"name": "...", "value": ...}` for every variant. On input, an object
/// with exactly the keys `name` and `value` is a nested filter and an array
/// made only of such objects is a list; anything else is a scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Sub-filters of a boolean operator.
    List(Vec<Filter>),
    /// An operator applied to the field.
    Nested(Box<Filter>),
    /// A raw JSON value (string, number, bool, null or array of those).
    Scalar(Value),
}

impl Filter {
    /// Creates a filter from its parts.
    pub fn new(name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Matches documents whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterValue::Scalar(value.into()))
    }

    /// Applies `operator` (e.g. `$gt`, `$in`) with `value` to `field`.
    pub fn op(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self::new(field, Filter::eq(operator, value))
    }

    /// Matches documents satisfying any of `filters`.
    pub fn or(filters: Vec<Filter>) -> Self {
        Self::new(OR, FilterValue::List(filters))
    }

    /// Matches documents satisfying all of `filters`.
    pub fn and(filters: Vec<Filter>) -> Self {
        Self::new(AND, FilterValue::List(filters))
    }

    /// Returns `true` if this filter is an `$or`/`$and` node.
    pub fn is_boolean_operator(&self) -> bool {
        self.name == OR || self.name == AND
    }
}

impl FilterValue {
    /// Reads an operand from its JSON wire form.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) if items.iter().all(is_filter_shape) => {
                FilterValue::List(items.into_iter().filter_map(filter_from_json).collect())
            }
            Value::Object(map) if is_filter_map(&map) => {
                FilterValue::Nested(Box::new(filter_from_map(map)))
            }
            other => FilterValue::Scalar(other),
        }
    }
}

fn is_filter_map(map: &Map<String, Value>) -> bool {
    map.len() == 2 && map.get("name").is_some_and(Value::is_string) && map.contains_key("value")
}

fn is_filter_shape(value: &Value) -> bool {
    value.as_object().is_some_and(is_filter_map)
}

fn filter_from_map(mut map: Map<String, Value>) -> Filter {
    let name = match map.remove("name") {
        Some(Value::String(name)) => name,
        _ => String::new(),
    };
    let value = map.remove("value").unwrap_or(Value::Null);
    Filter {
        name,
        value: FilterValue::from_json(value),
    }
}

fn filter_from_json(value: Value) -> Option<Filter> {
    match value {
        Value::Object(map) => Some(filter_from_map(map)),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FilterValue::from_json)
    }
}

impl From<Filter> for FilterValue {
    fn from(filter: Filter) -> Self {
        FilterValue::Nested(Box::new(filter))
    }
}

impl From<Vec<Filter>> for FilterValue {
    fn from(filters: Vec<Filter>) -> Self {
        FilterValue::List(filters)
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        FilterValue::Scalar(value)
    }
}
