//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use budgetline_core::db::Database;
use budgetline_core::models::NewBudgetCategory;
use budgetline_core::{
    AliasManager, CategoryManager, CategorySortField, PayeeManager, SortSpec, TransactionManager,
};
use chrono::NaiveDate;

use crate::commands::{self, truncate, CategoryEdit};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Add a category directly through the manager, returning its id
fn create_test_category(db: &Database, name: &str, amount: f64, from: &str) -> i64 {
    CategoryManager::new(db)
        .add(NewBudgetCategory {
            name: name.to_string(),
            amount,
            category_type: Default::default(),
            effective_from: date(from),
            effective_to: None,
        })
        .unwrap()
        .id
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("this is too long", 10), "this is...");
    assert_eq!(truncate("café au lait", 7), "café...");
}

#[test]
fn test_parse_date() {
    assert_eq!(commands::parse_date("2024-03-01").unwrap(), date("2024-03-01"));
    assert_eq!(commands::parse_date(" 2024-03-01 ").unwrap(), date("2024-03-01"));

    let err = commands::parse_date("03/01/2024").unwrap_err();
    assert!(err.to_string().contains("YYYY-MM-DD"));
}

#[test]
fn test_parse_date_or_today() {
    let today = chrono::Local::now().date_naive();
    assert_eq!(commands::parse_date_or_today(None).unwrap(), today);
    assert_eq!(
        commands::parse_date_or_today(Some("2020-02-29")).unwrap(),
        date("2020-02-29")
    );
}

#[test]
fn test_format_ref() {
    assert_eq!(commands::format_ref(Some(7)), "#7");
    assert_eq!(commands::format_ref(None), "-");
}

// ========== Core Command Tests ==========

#[test]
fn test_open_db_unencrypted() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    let db = commands::open_db(&db_path, true).unwrap();
    assert_eq!(db.stats().unwrap().categories, 0);
    assert!(db_path.exists());
}

#[test]
fn test_cmd_init_creates_database() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let db_path = dir.path().join("init.db");

    commands::cmd_init(&db_path, true).unwrap();
    assert!(db_path.exists());

    // Re-running init against an existing database is harmless
    commands::cmd_init(&db_path, true).unwrap();
}

#[test]
fn test_cmd_status_missing_database() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let db_path = dir.path().join("missing.db");

    commands::cmd_status(&db_path, true).unwrap();
    assert!(!db_path.exists());
}

#[test]
fn test_cmd_status_existing_database() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let db_path = dir.path().join("status.db");
    commands::cmd_init(&db_path, true).unwrap();

    assert!(commands::cmd_status(&db_path, true).is_ok());
}

// ========== Category Command Tests ==========

#[test]
fn test_cmd_categories_add() {
    let db = setup_test_db();
    commands::cmd_categories_add(&db, "Groceries", 400.126, "income", "2024-01-01", None)
        .unwrap();

    let all = CategoryManager::new(&db).list(SortSpec::default()).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Groceries");
    assert_eq!(all[0].amount, 400.13);
    assert_eq!(all[0].category_type.as_str(), "income");
    assert_eq!(all[0].effective_to, None);
}

#[test]
fn test_cmd_categories_add_with_end_date() {
    let db = setup_test_db();
    commands::cmd_categories_add(
        &db,
        "Holiday",
        1500.0,
        "expense",
        "2024-06-01",
        Some("2024-08-31"),
    )
    .unwrap();

    let all = CategoryManager::new(&db).history("Holiday").unwrap();
    assert_eq!(all[0].effective_to, Some(date("2024-08-31")));
}

#[test]
fn test_cmd_categories_add_invalid_type() {
    let db = setup_test_db();
    let result = commands::cmd_categories_add(&db, "Rent", 1200.0, "transfer", "2024-01-01", None);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("transfer"));
    assert_eq!(db.stats().unwrap().categories, 0);
}

#[test]
fn test_cmd_categories_add_invalid_date() {
    let db = setup_test_db();
    let result = commands::cmd_categories_add(&db, "Rent", 1200.0, "expense", "soon", None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_categories_list_empty_and_populated() {
    let db = setup_test_db();
    assert!(commands::cmd_categories_list(&db, None, None, false).is_ok());

    create_test_category(&db, "Rent", 1200.0, "2024-01-01");
    create_test_category(&db, "Groceries", 400.0, "2024-01-01");
    assert!(commands::cmd_categories_list(&db, Some("amount:desc"), None, false).is_ok());
    assert!(commands::cmd_categories_list(&db, None, Some("2024-02-01"), true).is_ok());
}

#[test]
fn test_cmd_categories_list_bad_sort() {
    let db = setup_test_db();
    let result = commands::cmd_categories_list(&db, Some("colour"), None, false);
    assert!(result.is_err());
}

#[test]
fn test_cmd_categories_edit_closes_predecessor() {
    let db = setup_test_db();
    commands::cmd_categories_add(
        &db,
        "Rent",
        1200.0,
        "expense",
        "2023-01-01",
        Some("2023-12-31"),
    )
    .unwrap();
    let id = create_test_category(&db, "Rent", 1250.0, "2024-01-01");

    commands::cmd_categories_edit(
        &db,
        id,
        Some("2023-11-01"),
        CategoryEdit {
            amount: Some(1300.0),
            ..Default::default()
        },
    )
    .unwrap();

    let history = CategoryManager::new(&db).history("Rent").unwrap();
    assert_eq!(history.len(), 2);

    let old = history.iter().find(|c| c.id != id).unwrap();
    assert_eq!(old.amount, 1200.0);
    assert_eq!(old.effective_from, date("2023-01-01"));
    assert_eq!(old.effective_to, Some(date("2023-10-31")));

    let edited = history.iter().find(|c| c.id == id).unwrap();
    assert_eq!(edited.amount, 1300.0);
    assert_eq!(edited.effective_from, date("2023-11-01"));
    assert_eq!(edited.effective_to, None);
}

#[test]
fn test_describe_split_names_the_edited_record() {
    let db = setup_test_db();
    commands::cmd_categories_add(
        &db,
        "Rent",
        1200.0,
        "expense",
        "2023-01-01",
        Some("2023-12-31"),
    )
    .unwrap();
    let older = CategoryManager::new(&db).history("Rent").unwrap()[0].id;
    let id = create_test_category(&db, "Rent", 1250.0, "2024-01-01");

    commands::cmd_payees_add(&db, "Landlord", Some("2023-12-01"), Some(older)).unwrap();
    commands::cmd_transactions_add(&db, -1200.0, Some("2023-12-01"), None, Some(older)).unwrap();

    let manager = CategoryManager::new(&db);
    let edited = manager.get(Some(id)).unwrap();
    let outcome = manager
        .split(id, edited, date("2023-11-01"), date("2024-06-01"))
        .unwrap();

    let lines = commands::describe_split(&outcome);
    assert_eq!(
        lines,
        vec![
            format!("Closed #{} 'Rent' on 2023-10-31", older),
            format!("Reassigned 1 payee(s) to #{}", id),
            format!("Reassigned 1 transaction(s) to #{}", id),
        ]
    );
}

#[test]
fn test_cmd_categories_edit_without_predecessor() {
    let db = setup_test_db();
    let id = create_test_category(&db, "Rent", 1200.0, "2023-01-01");

    commands::cmd_categories_edit(
        &db,
        id,
        Some("2024-01-01"),
        CategoryEdit {
            amount: Some(1300.0),
            ..Default::default()
        },
    )
    .unwrap();

    let history = CategoryManager::new(&db).history("Rent").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, 1300.0);
    assert_eq!(history[0].effective_from, date("2024-01-01"));
}

#[test]
fn test_cmd_categories_edit_keeps_unspecified_fields() {
    let db = setup_test_db();
    let id = create_test_category(&db, "Fuel", 150.0, "2024-01-01");

    commands::cmd_categories_edit(
        &db,
        id,
        Some("2024-01-01"),
        CategoryEdit {
            category_type: Some("income".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    let category = CategoryManager::new(&db).get(Some(id)).unwrap();
    assert_eq!(category.name, "Fuel");
    assert_eq!(category.amount, 150.0);
    assert_eq!(category.category_type.as_str(), "income");
}

#[test]
fn test_cmd_categories_edit_future_date_rejected() {
    let db = setup_test_db();
    let id = create_test_category(&db, "Rent", 1200.0, "2023-01-01");

    let result = commands::cmd_categories_edit(
        &db,
        id,
        Some("2999-01-01"),
        CategoryEdit {
            amount: Some(1.0),
            ..Default::default()
        },
    );
    assert!(result.is_err());

    let history = CategoryManager::new(&db).history("Rent").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, 1200.0);
}

#[test]
fn test_cmd_categories_edit_not_found() {
    let db = setup_test_db();
    let result = commands::cmd_categories_edit(&db, 99, None, CategoryEdit::default());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("99"));
}

#[test]
fn test_cmd_categories_remove() {
    let db = setup_test_db();
    let id = create_test_category(&db, "Rent", 1200.0, "2024-01-01");

    commands::cmd_categories_remove(&db, id).unwrap();
    assert_eq!(db.stats().unwrap().categories, 0);

    // Removing again is a no-op
    assert!(commands::cmd_categories_remove(&db, id).is_ok());
}

#[test]
fn test_cmd_categories_history() {
    let db = setup_test_db();
    assert!(commands::cmd_categories_history(&db, "Nothing").is_ok());

    create_test_category(&db, "Rent", 1200.0, "2024-01-01");
    assert!(commands::cmd_categories_history(&db, "Rent").is_ok());
}

// ========== Payee Command Tests ==========

#[test]
fn test_cmd_payees_add_and_list() {
    let db = setup_test_db();
    let category = create_test_category(&db, "Groceries", 400.0, "2024-01-01");

    commands::cmd_payees_add(&db, "Corner Shop", Some("2024-01-05"), Some(category)).unwrap();
    assert!(commands::cmd_payees_list(&db, Some("name"), false).is_ok());
    assert!(commands::cmd_payees_list(&db, None, true).is_ok());

    let payees = PayeeManager::new(&db).list(SortSpec::default()).unwrap();
    assert_eq!(payees.len(), 1);
    assert_eq!(payees[0].name, "Corner Shop");
    assert_eq!(payees[0].effective_from, date("2024-01-05"));
    assert_eq!(payees[0].budget_category_id, Some(category));
}

#[test]
fn test_cmd_payees_add_duplicate_name() {
    let db = setup_test_db();
    commands::cmd_payees_add(&db, "Corner Shop", None, None).unwrap();

    let result = commands::cmd_payees_add(&db, "Corner Shop", None, None);
    assert!(result.is_err());
    assert_eq!(db.stats().unwrap().payees, 1);
}

#[test]
fn test_cmd_payees_add_unknown_category() {
    let db = setup_test_db();
    let result = commands::cmd_payees_add(&db, "Corner Shop", None, Some(42));
    assert!(result.is_err());
}

#[test]
fn test_cmd_payees_remove_cascades_aliases() {
    let db = setup_test_db();
    commands::cmd_payees_add(&db, "Corner Shop", None, None).unwrap();
    let payee = PayeeManager::new(&db).list(SortSpec::default()).unwrap()[0].id;
    commands::cmd_aliases_add(&db, "SQ *CORNER SHOP", payee).unwrap();

    commands::cmd_payees_remove(&db, payee).unwrap();
    let stats = db.stats().unwrap();
    assert_eq!(stats.payees, 0);
    assert_eq!(stats.aliases, 0);
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_transactions_add_and_list() {
    let db = setup_test_db();
    let category = create_test_category(&db, "Groceries", 400.0, "2024-01-01");
    commands::cmd_payees_add(&db, "Corner Shop", None, Some(category)).unwrap();
    let payee = PayeeManager::new(&db).list(SortSpec::default()).unwrap()[0].id;

    commands::cmd_transactions_add(&db, -42.505, Some("2024-02-10"), Some(payee), None).unwrap();
    assert!(commands::cmd_transactions_list(&db, Some("date:desc"), false).is_ok());
    assert!(commands::cmd_transactions_list(&db, None, true).is_ok());

    let manager = TransactionManager::new(&db);
    let txs = manager.list(SortSpec::default()).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount, -42.51);
    assert_eq!(txs[0].date, date("2024-02-10"));

    let resolved = manager.resolve_category(txs[0].id).unwrap().unwrap();
    assert_eq!(resolved.id, category);
}

#[test]
fn test_cmd_transactions_add_unknown_payee() {
    let db = setup_test_db();
    let result = commands::cmd_transactions_add(&db, 10.0, None, Some(5), None);
    assert!(result.is_err());
    assert_eq!(db.stats().unwrap().transactions, 0);
}

#[test]
fn test_cmd_transactions_remove() {
    let db = setup_test_db();
    commands::cmd_transactions_add(&db, 10.0, Some("2024-01-01"), None, None).unwrap();
    let id = TransactionManager::new(&db).list(SortSpec::default()).unwrap()[0].id;

    commands::cmd_transactions_remove(&db, id).unwrap();
    assert_eq!(db.stats().unwrap().transactions, 0);
}

// ========== Alias Command Tests ==========

#[test]
fn test_cmd_aliases_add_list_resolve() {
    let db = setup_test_db();
    commands::cmd_payees_add(&db, "Corner Shop", None, None).unwrap();
    let payee = PayeeManager::new(&db).list(SortSpec::default()).unwrap()[0].id;

    commands::cmd_aliases_add(&db, "SQ *CORNER SHOP 0042", payee).unwrap();
    assert!(commands::cmd_aliases_list(&db, None, false).is_ok());
    assert!(commands::cmd_aliases_list(&db, Some("name:desc"), true).is_ok());
    assert!(commands::cmd_aliases_resolve(&db, "  sq *corner shop 0042 ").is_ok());
    assert!(commands::cmd_aliases_resolve(&db, "unknown").is_ok());

    let resolved = AliasManager::new(&db)
        .resolve("SQ *CORNER SHOP 0042")
        .unwrap()
        .unwrap();
    assert_eq!(resolved.id, payee);
}

#[test]
fn test_cmd_aliases_add_unknown_payee() {
    let db = setup_test_db();
    let result = commands::cmd_aliases_add(&db, "SQ *NOWHERE", 9);
    assert!(result.is_err());
}

#[test]
fn test_cmd_aliases_remove() {
    let db = setup_test_db();
    commands::cmd_payees_add(&db, "Corner Shop", None, None).unwrap();
    let payee = PayeeManager::new(&db).list(SortSpec::default()).unwrap()[0].id;
    commands::cmd_aliases_add(&db, "CORNER", payee).unwrap();
    let alias = AliasManager::new(&db).list(SortSpec::default()).unwrap()[0].id;

    commands::cmd_aliases_remove(&db, alias).unwrap();
    assert_eq!(db.stats().unwrap().aliases, 0);
}

// ========== Sorting Through Commands ==========

#[test]
fn test_categories_sorted_by_amount() {
    let db = setup_test_db();
    create_test_category(&db, "Rent", 1200.0, "2024-01-01");
    create_test_category(&db, "Fuel", 150.0, "2024-01-01");

    let sort = budgetline_core::parse_sort::<CategorySortField>(Some("amount")).unwrap();
    let names: Vec<_> = CategoryManager::new(&db)
        .list(sort)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Fuel", "Rent"]);
}
