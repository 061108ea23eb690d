//! cleanupUserData callable: admin-only removal of record and identity.

mod common;

use crate::common::{admin, customer, identity, store_with_user};
use functions_core::common::{HandlerError, UserId};
use functions_core::domains::users::{cleanup_user_data, CleanupResult, USERS_COLLECTION};
use functions_core::kernel::test_dependencies::{InMemoryDocumentStore, MockIdentityStore};
use functions_core::kernel::TestDependencies;
use serde_json::json;

fn deps_with_user(uid: &str) -> TestDependencies {
    TestDependencies::new()
        .mock_documents(store_with_user(uid))
        .mock_identities(MockIdentityStore::new().with_identity(identity(uid)))
}

#[tokio::test]
async fn admin_removes_record_and_identity() {
    let test_deps = deps_with_user("u1");

    let result = cleanup_user_data(
        json!({"userId": "u1"}),
        Some(&admin("root")),
        &test_deps.deps(),
    )
    .await;

    assert_eq!(result, Ok(CleanupResult { success: true }));
    assert!(test_deps.documents.document(USERS_COLLECTION, "u1").is_none());
    assert!(!test_deps.identities.contains(&UserId::new("u1")));
}

#[tokio::test]
async fn non_admin_deletes_nothing() {
    let test_deps = deps_with_user("u1");

    let result = cleanup_user_data(
        json!({"userId": "u1"}),
        Some(&customer("u2")),
        &test_deps.deps(),
    )
    .await;

    assert!(matches!(result, Err(HandlerError::PermissionDenied(_))));
    assert!(test_deps.identities.delete_calls().is_empty());
    assert!(test_deps.documents.operations().is_empty());
    assert!(test_deps.documents.document(USERS_COLLECTION, "u1").is_some());
}

#[tokio::test]
async fn anonymous_caller_is_denied() {
    let test_deps = deps_with_user("u1");

    let result = cleanup_user_data(json!({"userId": "u1"}), None, &test_deps.deps()).await;

    assert!(matches!(result, Err(HandlerError::PermissionDenied(_))));
    assert!(test_deps.identities.delete_calls().is_empty());
}

#[tokio::test]
async fn already_removed_user_still_succeeds() {
    let test_deps = TestDependencies::new();

    let result = cleanup_user_data(
        json!({"userId": "ghost"}),
        Some(&admin("root")),
        &test_deps.deps(),
    )
    .await;

    assert_eq!(result, Ok(CleanupResult { success: true }));
    assert_eq!(test_deps.identities.delete_calls(), vec![UserId::new("ghost")]);
}

#[tokio::test]
async fn identity_failure_is_internal_but_record_deletion_stays() {
    let test_deps = TestDependencies::new()
        .mock_documents(store_with_user("u1"))
        .mock_identities(
            MockIdentityStore::new()
                .with_identity(identity("u1"))
                .failing_deletes(),
        );

    let result = cleanup_user_data(
        json!({"userId": "u1"}),
        Some(&admin("root")),
        &test_deps.deps(),
    )
    .await;

    assert_eq!(
        result,
        Err(HandlerError::Internal("User data cleanup failed".to_string()))
    );
    assert!(test_deps.documents.document(USERS_COLLECTION, "u1").is_none());
}

#[tokio::test]
async fn record_failure_is_internal_but_identity_deletion_stays() {
    let test_deps = TestDependencies::new()
        .mock_documents(InMemoryDocumentStore::new().failing_writes())
        .mock_identities(MockIdentityStore::new().with_identity(identity("u1")));

    let result = cleanup_user_data(
        json!({"userId": "u1"}),
        Some(&admin("root")),
        &test_deps.deps(),
    )
    .await;

    assert!(matches!(result, Err(HandlerError::Internal(_))));
    assert!(!test_deps.identities.contains(&UserId::new("u1")));
}

#[tokio::test]
async fn missing_target_is_internal() {
    let test_deps = deps_with_user("u1");

    let result = cleanup_user_data(json!({}), Some(&admin("root")), &test_deps.deps()).await;

    assert!(matches!(result, Err(HandlerError::Internal(_))));
    assert!(test_deps.identities.delete_calls().is_empty());
}
