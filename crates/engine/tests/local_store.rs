use std::{path::PathBuf, sync::Arc};

use chrono::{TimeZone, Utc};
use engine::{BudgetStore, DEMO_USER_NAME, Engine, EngineError, LocalStore, Money, Theme};
use uuid::Uuid;

fn store_path() -> PathBuf {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();
    root.join(format!("local_{}.json", Uuid::new_v4()))
}

async fn engine_with_local(path: &PathBuf) -> Engine {
    let store = LocalStore::open(path).await.unwrap();
    Engine::builder()
        .store(Arc::new(store))
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn new_store_seeds_demo_profile() {
    let path = store_path();
    let engine = engine_with_local(&path).await;

    let users = engine.get_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, DEMO_USER_NAME);
    assert_eq!(users[0].currency.code(), "USD");
    assert_eq!(users[0].theme, Theme::System);
    assert_eq!(users[0].income, Money::ZERO);
    assert!(path.exists());

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn data_survives_reopen() {
    let path = store_path();
    let engine = engine_with_local(&path).await;
    let user = engine.get_users().await.unwrap().remove(0);
    engine.update_income(user.id, Money::new(150_000)).await.unwrap();
    engine
        .create_expense(user.id, "Rent", Money::new(90_000), "Housing")
        .await
        .unwrap();
    drop(engine);

    let engine = engine_with_local(&path).await;
    let budget = engine.get_user_budget(user.id).await.unwrap();
    assert_eq!(budget.user.income, Money::new(150_000));
    assert_eq!(budget.expenses.len(), 1);
    assert_eq!(budget.expenses[0].name, "Rent");

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn create_user_renames_single_profile() {
    let path = store_path();
    let engine = engine_with_local(&path).await;
    let demo = engine.get_users().await.unwrap().remove(0);

    let renamed = engine
        .create_user("Alice", Some("EUR"), Some("dark"))
        .await
        .unwrap();
    assert_eq!(renamed.id, demo.id);
    assert_eq!(renamed.name, "Alice");
    assert_eq!(renamed.currency.code(), "EUR");
    assert_eq!(engine.get_users().await.unwrap().len(), 1);

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn delete_user_reseeds_on_next_listing() {
    let path = store_path();
    let engine = engine_with_local(&path).await;
    let demo = engine.get_users().await.unwrap().remove(0);
    engine
        .create_expense(demo.id, "Coffee", Money::new(300), "Food")
        .await
        .unwrap();

    engine.delete_user(demo.id).await.unwrap();
    assert!(engine.get_user(demo.id).await.unwrap().is_none());

    let users = engine.get_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_ne!(users[0].id, demo.id);
    assert!(engine.store().list_expenses(users[0].id).await.unwrap().is_empty());

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn duplicate_category_is_rejected_ignoring_case() {
    let path = store_path();
    let engine = engine_with_local(&path).await;
    let user = engine.get_users().await.unwrap().remove(0);

    engine.create_category(user.id, "Pets").await.unwrap();
    assert_eq!(
        engine.create_category(user.id, "pets").await.unwrap_err(),
        EngineError::ExistingKey("pets".to_string())
    );

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn import_without_categories_keeps_existing_ones() {
    let path = store_path();
    let engine = engine_with_local(&path).await;
    let user = engine.get_users().await.unwrap().remove(0);
    engine.create_category(user.id, "Pets").await.unwrap();

    engine
        .import_data(
            user.id,
            r#"{"income": 1000, "currency": "CAD",
                "expenses": [{"name": "Food", "amount": 12.5, "category": "Food"}]}"#,
        )
        .await
        .unwrap();
    let names: Vec<_> = engine
        .get_categories(user.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Pets"]);

    engine
        .import_data(
            user.id,
            r#"{"income": 1000, "currency": "CAD", "expenses": [], "categories": ["Gym"]}"#,
        )
        .await
        .unwrap();
    let names: Vec<_> = engine
        .get_categories(user.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Gym"]);

    let budget = engine.get_user_budget(user.id).await.unwrap();
    assert_eq!(budget.user.currency.code(), "CAD");
    assert!(budget.expenses.is_empty());

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn corrupt_entries_read_as_empty() {
    let path = store_path();
    std::fs::write(
        &path,
        r#"{"easymoney_user": "{not json", "easymoney_expenses": "[1, 2"}"#,
    )
    .unwrap();

    let engine = engine_with_local(&path).await;
    let users = engine.get_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, DEMO_USER_NAME);
    assert!(engine.store().list_expenses(users[0].id).await.unwrap().is_empty());

    std::fs::write(&path, "garbage").unwrap();
    let engine = engine_with_local(&path).await;
    assert_eq!(engine.get_users().await.unwrap().len(), 1);

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn reset_records_time_and_reseeds() {
    let path = store_path();
    let engine = engine_with_local(&path).await;
    let demo = engine.get_users().await.unwrap().remove(0);

    let now = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap();
    engine.reset(now).await.unwrap();
    assert_eq!(engine.status().await.unwrap().last_reset, Some(now));
    assert!(engine.get_user(demo.id).await.unwrap().is_none());
    assert_eq!(engine.get_users().await.unwrap().len(), 1);

    let _ = std::fs::remove_file(path);
}
