#![allow(clippy::unwrap_used)]

use dipmail_bot::database::connection::DatabaseManager;
use dipmail_bot::database::models::Group;
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> (DatabaseManager, TempDir) {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.to_string_lossy());

    let db = DatabaseManager::new(&db_url).await.unwrap();
    db.run_migrations().await.unwrap();
    (db, dir)
}

#[tokio::test]
async fn test_group_enrollment() {
    let (db, _temp_dir) = setup_test_db().await;

    let group = Group::enroll(&db.pool, -1001234567890, Some("Embassy".to_string()), 42)
        .await
        .unwrap();

    assert_eq!(group.chat_id, -1001234567890);
    assert_eq!(group.title.as_deref(), Some("Embassy"));
    assert_eq!(group.enrolled_by, 42);
    assert!(!group.id.is_empty());
    assert!(!group.enrolled_at.is_empty());
}

#[tokio::test]
async fn test_group_find_by_chat_id() {
    let (db, _temp_dir) = setup_test_db().await;

    assert!(Group::find_by_chat_id(&db.pool, -12345).await.unwrap().is_none());

    Group::enroll(&db.pool, -12345, None, 7).await.unwrap();

    let found = Group::find_by_chat_id(&db.pool, -12345).await.unwrap();
    assert!(found.is_some());
    assert_eq!(found.unwrap().chat_id, -12345);
}

#[tokio::test]
async fn test_group_duplicate_enrollment_rejected() {
    let (db, _temp_dir) = setup_test_db().await;

    Group::enroll(&db.pool, -555, None, 1).await.unwrap();
    let second = Group::enroll(&db.pool, -555, None, 2).await;

    assert!(second.is_err(), "chat_id is unique");
}

#[tokio::test]
async fn test_group_all_ordered_by_enrollment() {
    let (db, _temp_dir) = setup_test_db().await;

    Group::enroll(&db.pool, -111, Some("First".to_string()), 1)
        .await
        .unwrap();
    Group::enroll(&db.pool, -222, Some("Second".to_string()), 1)
        .await
        .unwrap();

    let groups = Group::all(&db.pool).await.unwrap();
    assert_eq!(groups.len(), 2);
    let chat_ids: Vec<i64> = groups.iter().map(|g| g.chat_id).collect();
    assert!(chat_ids.contains(&-111));
    assert!(chat_ids.contains(&-222));
}

#[tokio::test]
async fn test_group_remove() {
    let (db, _temp_dir) = setup_test_db().await;

    Group::enroll(&db.pool, -333, None, 1).await.unwrap();

    assert!(Group::remove(&db.pool, -333).await.unwrap());
    assert!(Group::find_by_chat_id(&db.pool, -333).await.unwrap().is_none());

    // Removing an unknown chat reports false instead of failing.
    assert!(!Group::remove(&db.pool, -333).await.unwrap());
}
