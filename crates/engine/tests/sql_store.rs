use chrono::{Duration, NaiveDate, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    BudgetStore, CategoryKind, Engine, EngineError, ExpenseQuery, Money, NewExpense, SortKey,
    SortOrder, Theme, UNALLOCATED_LABEL,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_file_db() -> (Engine, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    (engine, path)
}

#[tokio::test]
async fn create_user_applies_defaults_and_validates() {
    let (engine, _db) = engine_with_db().await;

    let user = engine.create_user("  Alice ", None, None).await.unwrap();
    assert_eq!(user.name, "Alice");
    assert_eq!(user.currency.code(), "USD");
    assert_eq!(user.theme, Theme::System);
    assert_eq!(user.income, Money::ZERO);

    let eur = engine
        .create_user("Bob", Some("eur"), Some("dark"))
        .await
        .unwrap();
    assert_eq!(eur.currency.code(), "EUR");
    assert_eq!(eur.theme, Theme::Dark);

    let err = engine.create_user("   ", None, None).await.unwrap_err();
    assert_eq!(err, EngineError::InvalidName("Name is required".to_string()));

    let long = "x".repeat(51);
    assert!(matches!(
        engine.create_user(&long, None, None).await,
        Err(EngineError::InvalidName(_))
    ));
    assert!(matches!(
        engine.create_user("Carol", Some("EURO"), None).await,
        Err(EngineError::InvalidCurrency(_))
    ));
    assert!(matches!(
        engine.create_user("Carol", None, Some("neon")).await,
        Err(EngineError::InvalidTheme(_))
    ));
}

#[tokio::test]
async fn users_are_listed_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let store = engine.store();

    let base = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    for (offset, name) in ["first", "second", "third"].into_iter().enumerate() {
        store
            .create_user(
                engine::NewUser {
                    name: name.to_string(),
                    currency: Default::default(),
                    theme: Theme::System,
                },
                base + Duration::minutes(offset as i64),
            )
            .await
            .unwrap();
    }

    let names: Vec<_> = engine
        .get_users()
        .await
        .unwrap()
        .into_iter()
        .map(|user| user.name)
        .collect();
    assert_eq!(names, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn switch_user_requires_existing_profile() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.create_user("Alice", None, None).await.unwrap();

    assert_eq!(engine.switch_user(user.id).await.unwrap().id, user.id);
    assert_eq!(
        engine.switch_user(Uuid::new_v4()).await.unwrap_err(),
        EngineError::KeyNotFound("user not exists".to_string())
    );
}

#[tokio::test]
async fn budget_lists_expenses_by_amount() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.create_user("Alice", None, None).await.unwrap();

    engine
        .update_income(user.id, Money::new(300_000))
        .await
        .unwrap();
    engine
        .create_expense(user.id, "Groceries", Money::new(40_000), "Food")
        .await
        .unwrap();
    engine
        .create_expense(user.id, "Rent", Money::new(120_000), "Housing")
        .await
        .unwrap();
    engine
        .create_expense(user.id, "Netflix", Money::new(1_599), "Subscriptions")
        .await
        .unwrap();

    let budget = engine.get_user_budget(user.id).await.unwrap();
    assert_eq!(budget.user.income, Money::new(300_000));
    let names: Vec<_> = budget.expenses.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Rent", "Groceries", "Netflix"]);

    let summary = engine.summary(user.id).await.unwrap();
    assert_eq!(summary.total_expenses, Money::new(161_599));
    assert_eq!(summary.left_to_spend, Money::new(138_401));
    assert!(!summary.over_budget);

    let chart = engine.breakdown(user.id).await.unwrap();
    assert_eq!(chart.slices[0].name, UNALLOCATED_LABEL);
    assert_eq!(chart.total_value, Money::new(300_000));
}

#[tokio::test]
async fn expense_validation_and_delete() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.create_user("Alice", None, None).await.unwrap();

    assert!(matches!(
        engine
            .create_expense(user.id, "Rent", Money::ZERO, "Housing")
            .await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine
            .create_expense(user.id, " ", Money::new(100), "Housing")
            .await,
        Err(EngineError::InvalidName(_))
    ));
    assert!(matches!(
        engine
            .create_expense(Uuid::new_v4(), "Rent", Money::new(100), "Housing")
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.update_income(user.id, Money::new(-1)).await,
        Err(EngineError::InvalidAmount(_))
    ));

    let expense = engine
        .create_expense(user.id, "Rent", Money::new(100), "Housing")
        .await
        .unwrap();
    engine.delete_expense(expense.id).await.unwrap();
    assert_eq!(
        engine.delete_expense(expense.id).await.unwrap_err(),
        EngineError::KeyNotFound("expense not exists".to_string())
    );
}

#[tokio::test]
async fn oversized_amounts_never_break_totals() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.create_user("Alice", None, None).await.unwrap();

    assert!(matches!(
        engine
            .create_expense(user.id, "Yacht", Money::new(i64::MAX), "Other")
            .await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.update_income(user.id, Money::new(i64::MAX)).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine
            .import_data(
                user.id,
                r#"{"income": 0, "currency": "USD", "expenses": [
                    {"name": "a", "amount": 5e16, "category": "Other"},
                    {"name": "b", "amount": 5e16, "category": "Other"}]}"#,
            )
            .await,
        Err(EngineError::InvalidImport(_))
    ));

    // Rows written around the engine's checks still aggregate without panicking.
    engine
        .store()
        .create_expense(
            user.id,
            NewExpense {
                name: "Legacy".to_string(),
                amount: Money::new(i64::MAX - 10),
                category: "Other".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(matches!(
        engine
            .create_expense(user.id, "Coffee", Money::new(100), "Food")
            .await,
        Err(EngineError::InvalidAmount(_))
    ));

    let summary = engine.summary(user.id).await.unwrap();
    assert_eq!(summary.total_expenses, Money::new(i64::MAX - 10));
    assert!(summary.over_budget);
    let chart = engine.breakdown(user.id).await.unwrap();
    assert_eq!(chart.slices.len(), 1);
}

#[tokio::test]
async fn list_expenses_applies_query() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.create_user("Alice", None, None).await.unwrap();
    for (name, cents, category) in [
        ("Rent", 120_000, "Housing"),
        ("Groceries", 40_000, "Food"),
        ("Takeaway", 5_000, "Food"),
    ] {
        engine
            .create_expense(user.id, name, Money::new(cents), category)
            .await
            .unwrap();
    }

    let food = engine
        .list_expenses(
            user.id,
            &ExpenseQuery {
                category: Some("Food".to_string()),
                sort: SortKey::Name,
                order: SortOrder::Desc,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let names: Vec<_> = food.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Takeaway", "Groceries"]);

    assert_eq!(
        engine.expense_categories(user.id).await.unwrap(),
        vec!["Food", "Housing"]
    );
}

#[tokio::test]
async fn categories_are_unique_ignoring_case() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.create_user("Alice", None, None).await.unwrap();
    let other = engine.create_user("Bob", None, None).await.unwrap();

    engine.create_category(user.id, "pets").await.unwrap();
    let gym = engine.create_category(user.id, "Gym").await.unwrap();
    assert_eq!(
        engine.create_category(user.id, "PETS").await.unwrap_err(),
        EngineError::ExistingKey("PETS".to_string())
    );
    // Same name for another profile is fine.
    engine.create_category(other.id, "Pets").await.unwrap();

    let names: Vec<_> = engine
        .get_categories(user.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Gym", "pets"]);

    let options = engine.category_options(user.id).await.unwrap();
    assert!(options.iter().any(|o| o.name == "Gym" && o.id == Some(gym.id)));
    assert!(options.iter().any(|o| o.name == "Food" && o.id.is_none()));

    engine.delete_category(gym.id).await.unwrap();
    assert!(matches!(
        engine.delete_category(gym.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn category_options_keep_labels_of_deleted_categories() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.create_user("Alice", None, None).await.unwrap();
    let pets = engine.create_category(user.id, "Pets").await.unwrap();
    engine
        .create_expense(user.id, "Vet", Money::new(6_000), "Pets")
        .await
        .unwrap();

    let options = engine.category_options(user.id).await.unwrap();
    let entry = options.iter().find(|o| o.name == "Pets").unwrap();
    assert_eq!(entry.kind, CategoryKind::Custom);

    engine.delete_category(pets.id).await.unwrap();

    let options = engine.category_options(user.id).await.unwrap();
    let entries: Vec<_> = options.iter().filter(|o| o.name == "Pets").collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, CategoryKind::Historical);
    assert_eq!(entries[0].id, None);
}

#[tokio::test]
async fn import_replaces_everything_and_rejects_bad_documents() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.create_user("Alice", None, None).await.unwrap();
    engine
        .create_expense(user.id, "Old", Money::new(100), "Other")
        .await
        .unwrap();
    engine.create_category(user.id, "Legacy").await.unwrap();

    let err = engine
        .import_data(user.id, r#"{"income": "lots"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidImport(_)));
    assert_eq!(err.to_string(), "Failed to import data. Invalid format.");
    assert_eq!(engine.get_user_budget(user.id).await.unwrap().expenses.len(), 1);

    engine
        .import_data(
            user.id,
            r#"{"income": 2500, "currency": "GBP",
                "expenses": [{"name": "Rent", "amount": 900.5, "category": "Housing"}]}"#,
        )
        .await
        .unwrap();

    let budget = engine.get_user_budget(user.id).await.unwrap();
    assert_eq!(budget.user.income, Money::new(250_000));
    assert_eq!(budget.user.currency.code(), "GBP");
    assert_eq!(budget.expenses.len(), 1);
    assert_eq!(budget.expenses[0].amount, Money::new(90_050));
    // Relational storage always replaces custom categories.
    assert!(engine.get_categories(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn export_then_import_restores_budget() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.create_user("Alice", Some("EUR"), None).await.unwrap();
    engine.update_income(user.id, Money::new(200_000)).await.unwrap();
    engine
        .create_expense(user.id, "Rent", Money::new(80_000), "Housing")
        .await
        .unwrap();
    engine.create_category(user.id, "Pets").await.unwrap();

    let export = engine.export_data(user.id).await.unwrap();
    assert_eq!(export.income, 2000.0);
    assert_eq!(export.categories, Some(vec!["Pets".to_string()]));

    let date = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
    assert_eq!(
        engine.export_file_name(&user, date),
        "budget-Alice-2026-02-14.json"
    );

    let json = export.to_json_pretty().unwrap();
    let copy = engine.create_user("Copy", None, None).await.unwrap();
    engine.import_data(copy.id, &json).await.unwrap();

    let restored = engine.export_data(copy.id).await.unwrap();
    assert_eq!(restored, export);
}

#[tokio::test]
async fn clear_data_keeps_profile() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.create_user("Alice", None, None).await.unwrap();
    engine.update_income(user.id, Money::new(1_000)).await.unwrap();
    engine
        .create_expense(user.id, "Coffee", Money::new(350), "Food")
        .await
        .unwrap();
    engine.create_category(user.id, "Pets").await.unwrap();

    engine.clear_data(user.id).await.unwrap();

    let budget = engine.get_user_budget(user.id).await.unwrap();
    assert_eq!(budget.user.name, "Alice");
    assert_eq!(budget.user.income, Money::ZERO);
    assert!(budget.expenses.is_empty());
    assert!(engine.get_categories(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_user_removes_its_data() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.create_user("Alice", None, None).await.unwrap();
    engine
        .create_expense(user.id, "Coffee", Money::new(350), "Food")
        .await
        .unwrap();

    engine.delete_user(user.id).await.unwrap();

    assert!(engine.get_user(user.id).await.unwrap().is_none());
    assert!(engine.store().list_expenses(user.id).await.unwrap().is_empty());
    assert!(matches!(
        engine.delete_user(user.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn reset_wipes_data_and_records_time() {
    let (engine, path) = engine_with_file_db().await;
    let user = engine.create_user("Alice", None, None).await.unwrap();
    engine
        .create_expense(user.id, "Coffee", Money::new(350), "Food")
        .await
        .unwrap();
    assert!(engine.status().await.unwrap().last_reset.is_none());

    let now = Utc.with_ymd_and_hms(2026, 5, 1, 13, 0, 0).unwrap();
    engine.reset(now).await.unwrap();
    assert!(engine.get_users().await.unwrap().is_empty());
    assert_eq!(engine.status().await.unwrap().last_reset, Some(now));

    let later = now + Duration::hours(1);
    engine.reset(later).await.unwrap();
    assert_eq!(engine.status().await.unwrap().last_reset, Some(later));

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn report_renders_sorted_details() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.create_user("Alice", None, None).await.unwrap();
    engine.update_income(user.id, Money::new(100_000)).await.unwrap();
    engine
        .create_expense(user.id, "Coffee", Money::new(500), "Food")
        .await
        .unwrap();
    engine
        .create_expense(user.id, "Rent", Money::new(50_000), "Housing")
        .await
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2026, 4, 30).unwrap();
    let report = engine.report(user.id, date).await.unwrap();
    let rent = report.find("Rent").unwrap();
    let coffee = report.find("Coffee").unwrap();
    assert!(rent < coffee);
    assert!(report.contains("Generated by easyMoney"));
}
