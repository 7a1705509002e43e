//! Evaluation of compiled queries against in-memory documents.
//!
//! Supports the MongoDB subset domain services use: plain equality, the
//! comparison operators `$eq $ne $gt $gte $lt $lte`, set membership with
//! `$in`/`$nin`, `$exists`, `$regex`, the boolean nodes `$or $and $nor` and
//! dotted paths into embedded objects.

use std::cmp::Ordering;
use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;

use crate::core::{Clause, ClauseValue, CompiledQuery};
use crate::error::FilterError;
use crate::types::Document;

const REGEX: &str = "$regex";

/// Returns `true` when `document` satisfies every clause of `query`.
///
/// Use a [`Matcher`] when checking many documents against one query.
pub fn matches(document: &Document, query: &CompiledQuery) -> Result<bool, FilterError> {
    Matcher::new(query)?.matches(document)
}

/// A compiled query prepared for repeated evaluation.
///
/// Every `$regex` pattern in the query is compiled once, up front, so an
/// invalid pattern fails before any document is scanned.
#[derive(Debug)]
pub struct Matcher<'q> {
    query: &'q CompiledQuery,
    patterns: HashMap<String, Regex>,
}

impl<'q> Matcher<'q> {
    /// Prepares `query` for evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPattern`] when a `$regex` operand does
    /// not compile.
    pub fn new(query: &'q CompiledQuery) -> Result<Self, FilterError> {
        let mut patterns = HashMap::new();
        collect_patterns(query.clauses(), &mut patterns)?;
        Ok(Self { query, patterns })
    }

    /// Returns `true` when `document` satisfies every clause.
    pub fn matches(&self, document: &Document) -> Result<bool, FilterError> {
        self.all(document, self.query.clauses())
    }

    fn all(&self, document: &Document, clauses: &[Clause]) -> Result<bool, FilterError> {
        for clause in clauses {
            if !self.clause_matches(document, clause)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn any(&self, document: &Document, clauses: &[Clause]) -> Result<bool, FilterError> {
        for clause in clauses {
            if self.clause_matches(document, clause)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn clause_matches(&self, document: &Document, clause: &Clause) -> Result<bool, FilterError> {
        if clause.key.starts_with('$') {
            let children = match &clause.value {
                ClauseValue::Clauses(children) => children.as_slice(),
                ClauseValue::Clause(child) => std::slice::from_ref(&**child),
                ClauseValue::Value(value) => {
                    return Err(FilterError::InvalidFilterValue {
                        operator: clause.key.clone(),
                        value: value.to_string(),
                    });
                }
            };
            return match clause.key.as_str() {
                "$and" => self.all(document, children),
                "$or" => self.any(document, children),
                "$nor" => self.any(document, children).map(|hit| !hit),
                other => Err(FilterError::UnsupportedOperator {
                    operator: other.to_string(),
                }),
            };
        }

        let field = lookup(document, &clause.key);
        match &clause.value {
            ClauseValue::Value(expected) => Ok(equals(field, expected)),
            ClauseValue::Clause(inner) if inner.key.starts_with('$') => {
                self.apply_operator(field, &inner.key, &inner.value)
            }
            // A nested non-operator clause or a list is an embedded-document match.
            other => Ok(equals(field, &other.to_json())),
        }
    }

    fn apply_operator(
        &self,
        field: Option<&Value>,
        operator: &str,
        operand: &ClauseValue,
    ) -> Result<bool, FilterError> {
        let operand = operand.to_json();

        match operator {
            "$eq" => Ok(equals(field, &operand)),
            "$ne" => Ok(!equals(field, &operand)),
            "$gt" => Ok(compares(field, &operand, |o| o == Ordering::Greater)),
            "$gte" => Ok(compares(field, &operand, |o| o != Ordering::Less)),
            "$lt" => Ok(compares(field, &operand, |o| o == Ordering::Less)),
            "$lte" => Ok(compares(field, &operand, |o| o != Ordering::Greater)),
            "$in" => membership(field, operator, &operand),
            "$nin" => membership(field, operator, &operand).map(|hit| !hit),
            "$exists" => Ok(field.is_some() == truthy(&operand)),
            REGEX => {
                let Some(regex) = operand.as_str().and_then(|p| self.patterns.get(p)) else {
                    return Err(FilterError::InvalidFilterValue {
                        operator: operator.to_string(),
                        value: operand.to_string(),
                    });
                };
                Ok(candidates(field).any(|v| v.as_str().is_some_and(|s| regex.is_match(s))))
            }
            other => Err(FilterError::UnsupportedOperator {
                operator: other.to_string(),
            }),
        }
    }
}

/// Compiles every string `$regex` operand found in `clauses`.
fn collect_patterns(
    clauses: &[Clause],
    patterns: &mut HashMap<String, Regex>,
) -> Result<(), FilterError> {
    for clause in clauses {
        match &clause.value {
            ClauseValue::Clauses(children) => collect_patterns(children, patterns)?,
            ClauseValue::Clause(inner) => collect_patterns(std::slice::from_ref(&**inner), patterns)?,
            ClauseValue::Value(Value::String(pattern))
                if clause.key == REGEX && !patterns.contains_key(pattern) =>
            {
                let regex = Regex::new(pattern).map_err(|e| FilterError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
                patterns.insert(pattern.clone(), regex);
            }
            ClauseValue::Value(_) => {}
        }
    }
    Ok(())
}

/// Resolves a dotted path such as `address.city`.
fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    if let Some(value) = document.get(path) {
        return Some(value);
    }

    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// The field itself plus, for arrays, each element.
fn candidates(field: Option<&Value>) -> impl Iterator<Item = &Value> {
    let (whole, elements) = match field {
        Some(Value::Array(items)) => (field, items.as_slice()),
        Some(_) => (field, &[][..]),
        None => (None, &[][..]),
    };
    whole.into_iter().chain(elements.iter())
}

fn equals(field: Option<&Value>, expected: &Value) -> bool {
    match field {
        None => expected.is_null(),
        Some(_) => candidates(field).any(|v| same_value(v, expected)),
    }
}

fn compares(field: Option<&Value>, operand: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    candidates(field).any(|v| order(v, operand).is_some_and(&accept))
}

fn membership(field: Option<&Value>, operator: &str, operand: &Value) -> Result<bool, FilterError> {
    let Value::Array(options) = operand else {
        return Err(FilterError::InvalidFilterValue {
            operator: operator.to_string(),
            value: operand.to_string(),
        });
    };
    Ok(options.iter().any(|option| equals(field, option)))
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Orders values of the same kind; mixed kinds never compare.
fn order(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => true,
    }
}
