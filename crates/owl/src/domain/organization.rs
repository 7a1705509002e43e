use serde::{Deserialize, Serialize};

/// Collection holding organizations.
pub const ORGANIZATION_COLLECTION: &str = "organizations";

/// The root of the data model.
///
/// An organization holds the areas, teams, users and software components of
/// a single Minerva client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    /// Server-assigned identity.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Display name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Logo URL.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub logo: String,
}
