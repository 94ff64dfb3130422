//! Repository tests against a real database.
//!
//! Tests are serialized because they share the process-global test pool
//! that routes DI-created connections to a per-test in-memory database.

use chrono::NaiveDate;
use di::{Injectable, Ref, ServiceCollection};
use dream_diary_bot::core::fields::FieldValue;
use dream_diary_bot::infrastructure::database::DatabaseConnection;
use dream_diary_bot::infrastructure::entities::NewDream;
use dream_diary_bot::infrastructure::repositories::{DbDreamRepository, DbUserRepository};
use dream_diary_bot::infrastructure::traits::{DreamRepository, UserRepository};
use serial_test::serial;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicU32, Ordering};

/// Counter for unique test database URIs
static TEST_DB_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Setup test database with migrations; each test gets a unique shared-cache
/// in-memory database, installed as the global test pool so DI uses it.
async fn setup_test_db() -> SqlitePool {
    let db_num = TEST_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    let db_url = format!("sqlite:file:repo_testdb{}?mode=memory&cache=shared", db_num);

    let pool = SqlitePool::connect(&db_url).await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    DatabaseConnection::set_test_pool(pool.clone());
    pool
}

fn cleanup_test_db() {
    DatabaseConnection::clear_test_pool();
}

fn repositories() -> (Ref<dyn UserRepository>, Ref<dyn DreamRepository>) {
    let provider = ServiceCollection::new()
        .add(DatabaseConnection::transient())
        .add(DbUserRepository::scoped())
        .add(DbDreamRepository::scoped())
        .build_provider()
        .unwrap();

    let scope = provider.create_scope();
    (
        scope.get_required::<dyn UserRepository>(),
        scope.get_required::<dyn DreamRepository>(),
    )
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn new_dream(user_id: i64, title: &str, dream_date: &str) -> NewDream {
    NewDream {
        user_id,
        title: title.to_owned(),
        description: String::new(),
        tags: String::new(),
        notes: String::new(),
        dream_date: date(dream_date),
    }
}

#[tokio::test]
#[serial]
async fn test_upsert_language_creates_then_updates() {
    let _pool = setup_test_db().await;
    let (users, _dreams) = repositories();

    let created = users.upsert_language(100, "en").await.unwrap();
    assert_eq!(created.telegram_id, 100);
    assert_eq!(created.language, "en");

    let updated = users.upsert_language(100, "ru").await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.language, "ru");

    let found = users.find_by_telegram_id(100).await.unwrap().unwrap();
    assert_eq!(found.language, "ru");
    assert!(users.find_by_telegram_id(999).await.unwrap().is_none());

    cleanup_test_db();
}

#[tokio::test]
#[serial]
async fn test_find_owned_enforces_ownership() {
    let _pool = setup_test_db().await;
    let (users, dreams) = repositories();

    let owner = users.upsert_language(1, "en").await.unwrap();
    let other = users.upsert_language(2, "en").await.unwrap();
    let dream = dreams.create(new_dream(owner.id, "Flying", "2026-01-10")).await.unwrap();

    assert!(dreams.find_owned(dream.id, other.id).await.unwrap().is_none());

    let found = dreams.find_owned(dream.id, owner.id).await.unwrap().unwrap();
    assert_eq!(found.title, "Flying");

    cleanup_test_db();
}

#[tokio::test]
#[serial]
async fn test_list_page_orders_and_never_overlaps() {
    let _pool = setup_test_db().await;
    let (users, dreams) = repositories();

    let owner = users.upsert_language(1, "en").await.unwrap();
    let d1 = dreams.create(new_dream(owner.id, "a", "2026-01-03")).await.unwrap();
    let d2 = dreams.create(new_dream(owner.id, "b", "2026-01-05")).await.unwrap();
    let d3 = dreams.create(new_dream(owner.id, "c", "2026-01-03")).await.unwrap();
    let d4 = dreams.create(new_dream(owner.id, "d", "2026-01-01")).await.unwrap();
    let d5 = dreams.create(new_dream(owner.id, "e", "2026-01-04")).await.unwrap();

    let mut seen = Vec::new();
    for page in 0..3 {
        let items = dreams.list_page(owner.id, page, 2).await.unwrap();
        seen.extend(items.into_iter().map(|dream| dream.id));
    }

    // Date descending, same-date ties resolved newest id first.
    assert_eq!(seen, vec![d2.id, d5.id, d3.id, d1.id, d4.id]);
    assert_eq!(dreams.count(owner.id).await.unwrap(), 5);

    cleanup_test_db();
}

#[tokio::test]
#[serial]
async fn test_search_matches_any_field_case_insensitively() {
    let _pool = setup_test_db().await;
    let (users, dreams) = repositories();

    let owner = users.upsert_language(1, "en").await.unwrap();
    let other = users.upsert_language(2, "en").await.unwrap();

    let mut titled = new_dream(owner.id, "Flying over water", "2026-01-01");
    titled.tags = "lucid".to_owned();
    dreams.create(titled).await.unwrap();

    let mut described = new_dream(owner.id, "Second", "2026-01-02");
    described.description = "A calm OCEAN at night".to_owned();
    dreams.create(described).await.unwrap();

    let mut noted = new_dream(owner.id, "Third", "2026-01-03");
    noted.notes = "the castle again".to_owned();
    dreams.create(noted).await.unwrap();

    // Same words under a different owner must stay invisible.
    dreams.create(new_dream(other.id, "Flying too", "2026-01-04")).await.unwrap();

    assert_eq!(dreams.search(owner.id, "FLYING", 21).await.unwrap().len(), 1);
    assert_eq!(dreams.search(owner.id, "ocean", 21).await.unwrap().len(), 1);
    assert_eq!(dreams.search(owner.id, "LuCiD", 21).await.unwrap().len(), 1);
    assert_eq!(dreams.search(owner.id, "castle", 21).await.unwrap().len(), 1);
    assert_eq!(dreams.search(owner.id, "submarine", 21).await.unwrap().len(), 0);

    cleanup_test_db();
}

#[tokio::test]
#[serial]
async fn test_search_respects_limit() {
    let _pool = setup_test_db().await;
    let (users, dreams) = repositories();

    let owner = users.upsert_language(1, "en").await.unwrap();
    for i in 0..25 {
        dreams
            .create(new_dream(owner.id, &format!("water {i}"), "2026-01-01"))
            .await
            .unwrap();
    }

    assert_eq!(dreams.search(owner.id, "water", 21).await.unwrap().len(), 21);

    cleanup_test_db();
}

#[tokio::test]
#[serial]
async fn test_delete_is_owner_scoped_and_idempotent() {
    let _pool = setup_test_db().await;
    let (users, dreams) = repositories();

    let owner = users.upsert_language(1, "en").await.unwrap();
    let other = users.upsert_language(2, "en").await.unwrap();
    let dream = dreams.create(new_dream(owner.id, "Keep me", "2026-01-10")).await.unwrap();

    // A foreign delete is a no-op and the row survives.
    assert!(!dreams.delete(dream.id, other.id).await.unwrap());
    assert!(dreams.find_owned(dream.id, owner.id).await.unwrap().is_some());

    assert!(dreams.delete(dream.id, owner.id).await.unwrap());
    // Already gone reads as false, not as an error.
    assert!(!dreams.delete(dream.id, owner.id).await.unwrap());

    cleanup_test_db();
}

#[tokio::test]
#[serial]
async fn test_update_field_writes_one_owned_field() {
    let _pool = setup_test_db().await;
    let (users, dreams) = repositories();

    let owner = users.upsert_language(1, "en").await.unwrap();
    let other = users.upsert_language(2, "en").await.unwrap();
    let dream = dreams.create(new_dream(owner.id, "Before", "2026-01-10")).await.unwrap();

    let foreign = dreams
        .update_field(dream.id, other.id, &FieldValue::Title("Hijacked".to_owned()))
        .await
        .unwrap();
    assert!(!foreign);

    let updated = dreams
        .update_field(dream.id, owner.id, &FieldValue::Title("After".to_owned()))
        .await
        .unwrap();
    assert!(updated);

    let dated = dreams
        .update_field(dream.id, owner.id, &FieldValue::DreamDate(date("2025-11-02")))
        .await
        .unwrap();
    assert!(dated);

    let stored = dreams.find_owned(dream.id, owner.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "After");
    assert_eq!(stored.dream_date, date("2025-11-02"));

    dreams.delete(dream.id, owner.id).await.unwrap();
    let gone = dreams
        .update_field(dream.id, owner.id, &FieldValue::Title("Too late".to_owned()))
        .await
        .unwrap();
    assert!(!gone);

    cleanup_test_db();
}
