//! Repository tests against an in-memory SQLite database.

use common::{AppError, DatabaseConfig};
use domain::Password;
use user_service_lib::infra::{Database, HealthCheck};
use user_service_lib::repository::{UserRepository, UserStore};
use uuid::Uuid;

async fn setup() -> (Database, UserStore) {
    // a single pooled connection keeps every query on the same memory database
    let config = DatabaseConfig {
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::with_url("sqlite::memory:")
    };
    let db = Database::connect(&config).await.unwrap();
    let store = UserStore::new(db.get_connection());
    (db, store)
}

fn hash(plain: &str) -> String {
    Password::new(plain).unwrap().into_string()
}

#[tokio::test]
async fn test_create_and_find_user() {
    let (_db, store) = setup().await;

    let user = store
        .create("Ann".into(), "ann@x.io".into(), hash("secret1"))
        .await
        .unwrap();

    let found = store.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Ann");
    assert_eq!(found.email, "ann@x.io");
    assert!(Password::from_hash(found.password_hash).verify("secret1"));
}

#[tokio::test]
async fn test_find_unknown_id_returns_none() {
    let (_db, store) = setup().await;
    assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_returns_users_in_creation_order() {
    let (_db, store) = setup().await;
    assert!(store.list().await.unwrap().is_empty());

    store
        .create("Ann".into(), "ann@x.io".into(), hash("secret1"))
        .await
        .unwrap();
    store
        .create("Bob".into(), "bob@x.io".into(), hash("secret2"))
        .await
        .unwrap();
    store
        .create("Cid".into(), "cid@x.io".into(), hash("secret3"))
        .await
        .unwrap();

    let emails: Vec<String> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.email)
        .collect();
    assert_eq!(emails, ["ann@x.io", "bob@x.io", "cid@x.io"]);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let (_db, store) = setup().await;
    store
        .create("Ann".into(), "ann@x.io".into(), hash("secret1"))
        .await
        .unwrap();

    let err = store
        .create("Other".into(), "ann@x.io".into(), hash("secret2"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_email_match_is_case_sensitive() {
    let (_db, store) = setup().await;
    store
        .create("Ann".into(), "ann@x.io".into(), hash("secret1"))
        .await
        .unwrap();

    assert!(store.is_email_taken("ann@x.io").await.unwrap());
    assert!(!store.is_email_taken("ANN@x.io").await.unwrap());
    assert!(!store.is_email_taken("bob@x.io").await.unwrap());
}

#[tokio::test]
async fn test_update_user() {
    let (_db, store) = setup().await;
    let user = store
        .create("Ann".into(), "ann@x.io".into(), hash("secret1"))
        .await
        .unwrap();

    let updated = store
        .update(user.id, "Annie".into(), "annie@x.io".into())
        .await
        .unwrap();
    assert!(updated);

    let found = store.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Annie");
    assert_eq!(found.email, "annie@x.io");
    assert_eq!(found.password_hash, user.password_hash);
}

#[tokio::test]
async fn test_update_to_taken_email_is_conflict() {
    let (_db, store) = setup().await;
    store
        .create("Ann".into(), "ann@x.io".into(), hash("secret1"))
        .await
        .unwrap();
    let bob = store
        .create("Bob".into(), "bob@x.io".into(), hash("secret2"))
        .await
        .unwrap();

    let err = store
        .update(bob.id, "Bob".into(), "ann@x.io".into())
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_update_unknown_id_reports_no_match() {
    let (_db, store) = setup().await;
    let updated = store
        .update(Uuid::new_v4(), "Ghost".into(), "ghost@x.io".into())
        .await
        .unwrap();
    assert!(!updated);
}

#[tokio::test]
async fn test_delete_user() {
    let (_db, store) = setup().await;
    let user = store
        .create("Ann".into(), "ann@x.io".into(), hash("secret1"))
        .await
        .unwrap();

    assert!(store.delete(user.id).await.unwrap());
    assert!(store.find_by_id(user.id).await.unwrap().is_none());
    assert!(!store.delete(user.id).await.unwrap());
}

#[tokio::test]
async fn test_update_password_replaces_hash() {
    let (_db, store) = setup().await;
    let user = store
        .create("Ann".into(), "ann@x.io".into(), hash("secret1"))
        .await
        .unwrap();

    assert!(store
        .update_password(user.id, hash("secret2"))
        .await
        .unwrap());

    let stored = Password::from_hash(store.find_by_id(user.id).await.unwrap().unwrap().password_hash);
    assert!(stored.verify("secret2"));
    assert!(!stored.verify("secret1"));

    assert!(!store
        .update_password(Uuid::new_v4(), hash("secret3"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_health_ping_and_migration_status() {
    let (db, _store) = setup().await;

    db.ping().await.unwrap();

    let status = db.migration_status().await.unwrap();
    assert!(!status.is_empty());
    assert!(status.iter().all(|(_, applied)| *applied));
}
