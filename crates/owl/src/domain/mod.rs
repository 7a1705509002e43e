//! Domain models.

mod organization;
mod user;

pub use organization::{ORGANIZATION_COLLECTION, Organization};
pub use user::{NewUser, STATUS_DELETED, USER_COLLECTION, User};
