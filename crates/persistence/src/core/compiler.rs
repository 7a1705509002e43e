//! Filter compiler.
//!
//! Translates a sequence of [`Filter`] values into a [`CompiledQuery`]: an
//! ordered list of [`Clause`]s, implicitly ANDed, that backends turn into
//! their native query form. Compilation is pure and preserves input order.

use serde_json::{Map, Value};

use crate::error::FilterError;
use crate::types::{Filter, FilterValue};

/// The backend-ready form of a single filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Field name or operator.
    pub key: String,
    /// Compiled operand.
    pub value: ClauseValue,
}

/// Operand of a [`Clause`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseValue {
    /// Raw value, used as-is.
    Value(Value),
    /// Operator applied to the enclosing field, e.g. `{"$gt": 18}`.
    Clause(Box<Clause>),
    /// Sub-clauses of a boolean operator.
    Clauses(Vec<Clause>),
}

/// An ordered conjunction of clauses. Empty means match-all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledQuery {
    clauses: Vec<Clause>,
}

impl CompiledQuery {
    /// A query matching every document.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Returns the clauses in input order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns `true` for the match-all query.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Renders the query as a MongoDB-shaped JSON object, keeping clause order.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for clause in &self.clauses {
            map.insert(clause.key.clone(), clause.value.to_json());
        }
        Value::Object(map)
    }
}

impl Clause {
    /// Renders the clause as a single-entry JSON object.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(self.key.clone(), self.value.to_json());
        Value::Object(map)
    }
}

impl ClauseValue {
    /// Renders the operand as JSON.
    pub fn to_json(&self) -> Value {
        match self {
            ClauseValue::Value(value) => value.clone(),
            ClauseValue::Clause(clause) => clause.to_json(),
            ClauseValue::Clauses(clauses) => {
                Value::Array(clauses.iter().map(Clause::to_json).collect())
            }
        }
    }
}

/// Compiles `filters` into a query.
///
/// # Errors
///
/// Returns [`FilterError::InvalidFilterValue`] when a top-level `$or`/`$and`
/// filter does not carry a list of sub-filters.
pub fn compile(filters: &[Filter]) -> Result<CompiledQuery, FilterError> {
    let mut clauses = Vec::with_capacity(filters.len());

    for filter in filters {
        if filter.is_boolean_operator() {
            let FilterValue::List(children) = &filter.value else {
                return Err(FilterError::InvalidFilterValue {
                    operator: filter.name.clone(),
                    value: serde_json::to_string(&filter.value).unwrap_or_default(),
                });
            };
            clauses.push(Clause {
                key: filter.name.clone(),
                value: ClauseValue::Clauses(children.iter().map(compile_clause).collect()),
            });
        } else {
            clauses.push(compile_clause(filter));
        }
    }

    Ok(CompiledQuery { clauses })
}

/// Builds the clause for one filter, recursing through nested operands.
pub fn compile_clause(filter: &Filter) -> Clause {
    let value = match &filter.value {
        FilterValue::Scalar(value) => ClauseValue::Value(value.clone()),
        FilterValue::Nested(inner) => ClauseValue::Clause(Box::new(compile_clause(inner))),
        FilterValue::List(children) => {
            ClauseValue::Clauses(children.iter().map(compile_clause).collect())
        }
    };

    Clause {
        key: filter.name.clone(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_input_matches_all() {
        let query = compile(&[]).unwrap();
        assert!(query.is_empty());
        assert_eq!(query.to_json(), json!({}));
    }

    #[test]
    fn test_clause_order_follows_input() {
        let query = compile(&[Filter::eq("f1", "v1"), Filter::eq("f2", "v2")]).unwrap();

        let keys: Vec<&str> = query.clauses().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["f1", "f2"]);
        assert_eq!(
            serde_json::to_string(&query.to_json()).unwrap(),
            r#"{"f1":"v1","f2":"v2"}"#
        );
    }

    #[test]
    fn test_operator_valued_field() {
        let query = compile(&[Filter::op("f", "$in", vec!["a", "b"])]).unwrap();
        assert_eq!(
            query.clauses()[0],
            Clause {
                key: "f".to_string(),
                value: ClauseValue::Clause(Box::new(Clause {
                    key: "$in".to_string(),
                    value: ClauseValue::Value(json!(["a", "b"])),
                })),
            }
        );
        assert_eq!(query.to_json(), json!({"f": {"$in": ["a", "b"]}}));
    }

    #[test]
    fn test_or_compiles_each_child() {
        let query = compile(&[
            Filter::eq("role", "admin"),
            Filter::or(vec![Filter::op("age", "$gt", 18), Filter::eq("vip", true)]),
        ])
        .unwrap();

        assert_eq!(
            query.to_json(),
            json!({
                "role": "admin",
                "$or": [{"age": {"$gt": 18}}, {"vip": true}]
            })
        );
    }

    #[test]
    fn test_nested_boolean_inside_list() {
        let query = compile(&[Filter::and(vec![
            Filter::eq("a", 1),
            Filter::or(vec![Filter::eq("b", 2), Filter::eq("c", 3)]),
        ])])
        .unwrap();

        assert_eq!(
            query.to_json(),
            json!({"$and": [{"a": 1}, {"$or": [{"b": 2}, {"c": 3}]}]})
        );
    }

    #[test]
    fn test_or_with_scalar_fails() {
        let err = compile(&[Filter::eq("$or", "admin")]).unwrap_err();
        match err {
            FilterError::InvalidFilterValue { operator, value } => {
                assert_eq!(operator, "$or");
                assert_eq!(value, "\"admin\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_and_with_nested_filter_fails() {
        let filter = Filter::new("$and", Filter::eq("a", 1));
        assert!(matches!(
            compile(&[filter]),
            Err(FilterError::InvalidFilterValue { .. })
        ));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let filters = [
            Filter::eq("x", 1),
            Filter::or(vec![Filter::op("y", "$lt", 2)]),
        ];
        assert_eq!(compile(&filters).unwrap(), compile(&filters).unwrap());
    }
}
