//! Test fixtures for persistence layer testing.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use owl_persistence::types::Document;

/// A typed entity exercising renamed and omitted fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hero {
    /// Identity, omitted when empty so it is never client-supplied.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Role, the field most tests filter on.
    pub role: String,
    /// Age in years.
    pub age: i64,
    /// Creation stamp, stored under its camelCase name.
    #[serde(rename = "createDate")]
    pub create_date: i64,
}

impl Hero {
    /// Creates a hero without an identity.
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    /// Sets the age.
    pub fn with_age(mut self, age: i64) -> Self {
        self.age = age;
        self
    }

    /// Sets the creation stamp.
    pub fn with_create_date(mut self, create_date: i64) -> Self {
        self.create_date = create_date;
        self
    }
}

/// A reduced view of [`Hero`], used to check that unknown fields are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroName {
    pub id: String,
    pub name: String,
}

/// Builds a document from a JSON object literal.
pub fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

/// The two-hero collection used by the end-to-end filter scenario.
pub fn genius_and_leader() -> Vec<Document> {
    vec![
        document(json!({"id": "1", "name": "Tony", "role": "genius"})),
        document(json!({"id": "2", "name": "Steve", "role": "leader"})),
    ]
}

/// `count` numbered heroes, alternating between two roles.
pub fn numbered_heroes(count: usize) -> Vec<Hero> {
    (0..count)
        .map(|i| {
            let role = if i % 2 == 0 { "genius" } else { "leader" };
            Hero::new(format!("hero-{i}"), role).with_age(i as i64)
        })
        .collect()
}
