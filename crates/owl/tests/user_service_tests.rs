//! User service tests over the in-memory store.

mod common;

use common::*;
use owl::ServiceError;
use owl::domain::{NewUser, STATUS_DELETED, USER_COLLECTION, User};
use owl_persistence::core::Repository;
use owl_persistence::error::{BackendError, StorageError};
use serde_json::Value;

fn new_user(username: &str, role: &str) -> NewUser {
    NewUser {
        name: format!("{username} name"),
        username: username.to_string(),
        picture: "https://example.com/avatar.png".to_string(),
        role: role.to_string(),
        provider: "github".to_string(),
        token_id: format!("{username}-token"),
        status: "active".to_string(),
    }
}

#[tokio::test]
async fn test_create_assigns_id_and_dates() {
    let (state, _) = memory_state();

    let user = state.users().create(new_user("tony", "genius")).await.unwrap();

    assert!(!user.id.is_empty());
    assert_eq!(user.username, "tony");
    let created = user.create_date.expect("create date stamped");
    assert_eq!(user.update_date, Some(created));
    assert_eq!(created.timestamp_subsec_nanos(), 0, "dates have second precision");

    let stored = state.users().get(&user.id).await.unwrap();
    assert_eq!(stored, user);
}

#[tokio::test]
async fn test_create_encrypts_token() {
    let (state, backend) = memory_state();

    let user = state.users().create(new_user("tony", "genius")).await.unwrap();
    assert_ne!(user.token_id, "tony-token");
    assert_eq!(test_cipher().decrypt(&user.token_id).unwrap(), "tony-token");

    // The raw document never holds the plaintext.
    let raw: Value = backend.get(USER_COLLECTION, &user.id).await.unwrap();
    assert_eq!(raw["tokenID"], Value::String(user.token_id.clone()));
    assert!(!raw.to_string().contains("tony-token"));
}

#[tokio::test]
async fn test_create_rejects_duplicated_username() {
    let (state, backend) = memory_state();
    state.users().create(new_user("tony", "genius")).await.unwrap();

    let err = state
        .users()
        .create(new_user("tony", "leader"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::DuplicateUsername { ref username } if username == "tony"));
    assert_eq!(err.to_string(), "duplicated username: tony");
    assert_eq!(backend.len(USER_COLLECTION), 1);
}

#[tokio::test]
async fn test_get_by_username() {
    let (state, _) = memory_state();
    state.users().create(new_user("tony", "genius")).await.unwrap();
    let steve = state.users().create(new_user("steve", "leader")).await.unwrap();

    let found = state.users().get_by_username("steve").await.unwrap();
    assert_eq!(found.id, steve.id);

    let err = state.users().get_by_username("thor").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_get_missing_user_is_not_found() {
    let (state, _) = memory_state();
    let err = state.users().get("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_by_role() {
    let (state, _) = memory_state();
    for (username, role) in [("tony", "genius"), ("steve", "leader"), ("bruce", "genius")] {
        state.users().create(new_user(username, role)).await.unwrap();
    }

    let geniuses = state.users().list_by_role("genius", None, None).await.unwrap();
    let mut names: Vec<_> = geniuses.iter().map(|u| u.username.as_str()).collect();
    names.sort();
    assert_eq!(names, ["bruce", "tony"]);

    let villains = state.users().list_by_role("villain", None, None).await.unwrap();
    assert!(villains.is_empty());
}

#[tokio::test]
async fn test_list_pages() {
    let (state, _) = memory_state();
    for i in 0..25 {
        state
            .users()
            .create(new_user(&format!("user-{i:02}"), "member"))
            .await
            .unwrap();
    }

    let first = state.users().list(None, None).await.unwrap();
    assert_eq!(first.len(), 10, "default page size");
    assert_eq!(first[0].username, "user-00");

    let third = state.users().list(Some(3), None).await.unwrap();
    assert_eq!(third.len(), 5);
    assert_eq!(third[0].username, "user-20");

    let clamped = state.users().list(Some(-4), Some(1000)).await.unwrap();
    assert_eq!(clamped.len(), 25, "page clamps to 1, size to the max");

    let beyond = state.users().list(Some(9), Some(10)).await.unwrap();
    assert!(beyond.is_empty());

    let far_beyond = state.users().list(Some(i64::MAX), Some(10)).await.unwrap();
    assert!(far_beyond.is_empty());
}

#[tokio::test]
async fn test_update_preserves_create_date() {
    let (state, _) = memory_state();
    let user = state.users().create(new_user("tony", "genius")).await.unwrap();

    let changes = User {
        id: user.id.clone(),
        name: "Tony Stark".to_string(),
        create_date: Some(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH),
        ..Default::default()
    };
    let updated = state.users().update(changes).await.unwrap();
    assert!(updated.update_date.is_some());

    let stored = state.users().get(&user.id).await.unwrap();
    assert_eq!(stored.name, "Tony Stark");
    assert_eq!(stored.create_date, user.create_date);
    assert_eq!(stored.username, "tony", "empty fields leave stored values alone");
    assert_eq!(stored.token_id, user.token_id);
}

#[tokio::test]
async fn test_update_reencrypts_changed_token_only() {
    let (state, _) = memory_state();
    let user = state.users().create(new_user("tony", "genius")).await.unwrap();

    // Sending back the stored token keeps it as is.
    state.users().update(user.clone()).await.unwrap();
    let stored = state.users().get(&user.id).await.unwrap();
    assert_eq!(stored.token_id, user.token_id);

    let changes = User {
        id: user.id.clone(),
        token_id: "fresh-token".to_string(),
        ..Default::default()
    };
    let updated = state.users().update(changes).await.unwrap();
    assert_ne!(updated.token_id, "fresh-token");

    let stored = state.users().get(&user.id).await.unwrap();
    assert_eq!(stored.token_id, updated.token_id);
    assert_eq!(test_cipher().decrypt(&stored.token_id).unwrap(), "fresh-token");
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let (state, _) = memory_state();
    let err = state
        .users()
        .update(User {
            id: "missing".to_string(),
            name: "Nobody".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_soft_delete_marks_user() {
    let (state, backend) = memory_state();
    let user = state.users().create(new_user("tony", "genius")).await.unwrap();

    state.users().delete(&user.id, false).await.unwrap();

    let stored = state.users().get(&user.id).await.unwrap();
    assert_eq!(stored.status, STATUS_DELETED);
    assert_eq!(stored.username, "tony");
    assert_eq!(stored.create_date, user.create_date);
    assert_eq!(backend.len(USER_COLLECTION), 1);
}

#[tokio::test]
async fn test_hard_delete_removes_user() {
    let (state, backend) = memory_state();
    let user = state.users().create(new_user("tony", "genius")).await.unwrap();

    state.users().delete(&user.id, true).await.unwrap();
    assert!(state.users().get(&user.id).await.unwrap_err().is_not_found());
    assert!(backend.is_empty(USER_COLLECTION));

    // Hard deleting twice is fine; soft deleting a missing user is not.
    state.users().delete(&user.id, true).await.unwrap();
    assert!(state.users().delete(&user.id, false).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_storage_errors_propagate() {
    let state = broken_state();

    let err = state.users().create(new_user("tony", "genius")).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Storage(StorageError::Backend(BackendError::Internal { .. }))
    ));
    assert!(!err.is_not_found());

    assert!(state.users().list(None, None).await.is_err());
    assert!(state.users().delete("any", true).await.is_err());
}
