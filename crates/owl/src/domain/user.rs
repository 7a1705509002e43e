use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding users.
pub const USER_COLLECTION: &str = "users";

/// Status given to soft-deleted users.
pub const STATUS_DELETED: &str = "deleted";

/// A user authenticated into the Minerva platform through an OAuth2
/// provider.
///
/// Empty strings and absent dates are left out of the stored document, so a
/// partially filled `User` passed to an update only touches the fields it
/// carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    /// Server-assigned identity.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Unique login name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    /// Display name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Avatar URL.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub picture: String,
    /// Platform role.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,
    /// OAuth2 provider that authenticated the user.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider: String,
    /// Provider token, stored encrypted.
    #[serde(rename = "tokenID", skip_serializing_if = "String::is_empty")]
    pub token_id: String,
    /// Registration time, never changed by updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_date: Option<DateTime<Utc>>,
    /// Time of the last update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_date: Option<DateTime<Utc>>,
    /// Account status; soft-deleted users carry [`STATUS_DELETED`].
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
}

/// Fields supplied when registering a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Login name, must not be taken.
    pub username: String,
    /// Avatar URL.
    pub picture: String,
    /// Platform role.
    pub role: String,
    /// OAuth2 provider.
    pub provider: String,
    /// Provider token in plain text.
    #[serde(rename = "tokenID")]
    pub token_id: String,
    /// Initial account status.
    pub status: String,
}
