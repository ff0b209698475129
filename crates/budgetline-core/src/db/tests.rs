//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn category(name: &str, from: NaiveDate, to: Option<NaiveDate>) -> NewBudgetCategory {
        NewBudgetCategory {
            name: name.to_string(),
            amount: 75.5,
            category_type: CategoryType::Expense,
            effective_from: from,
            effective_to: to,
        }
    }

    fn payee(name: &str, category_id: Option<i64>) -> NewPayee {
        NewPayee {
            name: name.to_string(),
            effective_from: date(2022, 5, 1),
            budget_category_id: category_id,
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_categories().unwrap().is_empty());
        assert_eq!(
            db.stats().unwrap(),
            StoreStats {
                categories: 0,
                payees: 0,
                transactions: 0,
                aliases: 0
            }
        );
    }

    #[test]
    fn test_in_memory_files_removed_after_last_clone() {
        let db = Database::in_memory().unwrap();
        let file = std::path::PathBuf::from(db.path());
        let dir = file.parent().unwrap().to_path_buf();
        assert!(file.exists());

        let clone = db.clone();
        drop(db);
        assert!(file.exists());
        assert!(clone.list_categories().unwrap().is_empty());

        drop(clone);
        assert!(!dir.exists());
    }

    #[test]
    fn test_schema_has_version_columns() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        for table in ["budget_categories", "payees", "transactions", "aliases"] {
            let count: i64 = conn
                .query_row(
                    &format!(
                        "SELECT COUNT(*) FROM pragma_table_info('{}') WHERE name = 'version'",
                        table
                    ),
                    [],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "{} should have a version column", table);
        }
    }

    #[test]
    fn test_foreign_keys_enabled_on_every_connection() {
        let db = Database::in_memory().unwrap();
        let first = db.conn().unwrap();
        let second = db.conn().unwrap();

        for conn in [&first, &second] {
            let enabled: i64 = conn
                .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
                .unwrap();
            assert_eq!(enabled, 1);
        }
    }

    #[test]
    fn test_category_crud_and_dates() {
        let db = Database::in_memory().unwrap();
        let id = db
            .create_category(&category(
                "Rent",
                date(2020, 1, 1),
                Some(date(2020, 12, 31)),
            ))
            .unwrap();

        let stored = db.get_category(id).unwrap().unwrap();
        assert_eq!(stored.name, "Rent");
        assert_eq!(stored.effective_from, date(2020, 1, 1));
        assert_eq!(stored.effective_to, Some(date(2020, 12, 31)));
        assert_eq!(stored.version, 1);

        // Dates are stored as plain ISO text
        let raw: String = db
            .conn()
            .unwrap()
            .query_row(
                "SELECT effective_from FROM budget_categories WHERE id = ?",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(raw, "2020-01-01");

        assert!(db.delete_category(id).unwrap());
        assert!(!db.delete_category(id).unwrap());
        assert!(db.get_category(id).unwrap().is_none());
    }

    #[test]
    fn test_categories_named_in_chronological_order() {
        let db = Database::in_memory().unwrap();
        db.create_category(&category("Fuel", date(2021, 1, 1), None))
            .unwrap();
        db.create_category(&category("Fuel", date(2019, 1, 1), Some(date(2020, 12, 31))))
            .unwrap();
        db.create_category(&category("Other", date(2018, 1, 1), None))
            .unwrap();

        let history = db.list_categories_named("Fuel").unwrap();
        let starts: Vec<_> = history.iter().map(|c| c.effective_from).collect();
        assert_eq!(starts, vec![date(2019, 1, 1), date(2021, 1, 1)]);
    }

    #[test]
    fn test_category_check_constraints() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let bad_type = conn.execute(
            "INSERT INTO budget_categories (name, amount, type, effective_from) VALUES ('X', 1, 'gift', '2020-01-01')",
            [],
        );
        assert!(bad_type.is_err());

        let empty_name = conn.execute(
            "INSERT INTO budget_categories (name, amount, type, effective_from) VALUES ('', 1, 'expense', '2020-01-01')",
            [],
        );
        assert!(empty_name.is_err());
    }

    #[test]
    fn test_category_delete_restricted_by_payee() {
        let db = Database::in_memory().unwrap();
        let category_id = db
            .create_category(&category("Groceries", date(2020, 1, 1), None))
            .unwrap();
        db.create_payee(&payee("Corner Shop", Some(category_id)))
            .unwrap();

        let err = db.delete_category(category_id).unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(db.get_category(category_id).unwrap().is_some());
    }

    #[test]
    fn test_category_delete_restricted_by_override() {
        let db = Database::in_memory().unwrap();
        let category_id = db
            .create_category(&category("Dining", date(2020, 1, 1), None))
            .unwrap();
        db.create_transaction(&NewTransaction {
            date: date(2020, 2, 1),
            amount: -12.0,
            payee_id: None,
            override_category_id: Some(category_id),
        })
        .unwrap();

        assert!(db
            .delete_category(category_id)
            .unwrap_err()
            .is_constraint_violation());
    }

    #[test]
    fn test_payee_name_unique_ignoring_case() {
        let db = Database::in_memory().unwrap();
        db.create_payee(&payee("Acme", None)).unwrap();

        let err = db.create_payee(&payee("ACME", None)).unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(
            db.get_payee_by_name("acme").unwrap().map(|p| p.name),
            Some("Acme".to_string())
        );
    }

    #[test]
    fn test_payee_with_transactions_cannot_be_deleted() {
        let db = Database::in_memory().unwrap();
        let payee_id = db.create_payee(&payee("Acme", None)).unwrap();
        db.create_transaction(&NewTransaction {
            date: date(2022, 6, 1),
            amount: -5.0,
            payee_id: Some(payee_id),
            override_category_id: None,
        })
        .unwrap();

        assert!(db
            .delete_payee(payee_id)
            .unwrap_err()
            .is_constraint_violation());
    }

    #[test]
    fn test_aliases_cascade_on_payee_delete() {
        let db = Database::in_memory().unwrap();
        let payee_id = db.create_payee(&payee("Acme", None)).unwrap();
        let alias_id = db
            .create_alias(&NewAlias {
                name: "ACME 0042".to_string(),
                payee_id,
            })
            .unwrap();

        assert!(db.delete_payee(payee_id).unwrap());
        assert!(db.get_alias(alias_id).unwrap().is_none());
        assert!(db.list_aliases().unwrap().is_empty());
    }

    #[test]
    fn test_save_changes_applies_all_and_bumps_versions() {
        let db = Database::in_memory().unwrap();
        let category_id = db
            .create_category(&category("Travel", date(2020, 1, 1), None))
            .unwrap();
        let payee_id = db.create_payee(&payee("Airline", None)).unwrap();

        let mut changes = ChangeSet::new();
        let mut c = db.get_category(category_id).unwrap().unwrap();
        c.amount = 900.0;
        changes.edit_category(c);
        let mut p = db.get_payee(payee_id).unwrap().unwrap();
        p.budget_category_id = Some(category_id);
        changes.edit_payee(p);

        assert_eq!(db.save_changes(changes).unwrap(), 2);

        let c = db.get_category(category_id).unwrap().unwrap();
        let p = db.get_payee(payee_id).unwrap().unwrap();
        assert_eq!((c.amount, c.version), (900.0, 2));
        assert_eq!((p.budget_category_id, p.version), (Some(category_id), 2));
    }

    #[test]
    fn test_save_changes_rolls_back_on_stale_version() {
        let db = Database::in_memory().unwrap();
        let first = db
            .create_category(&category("Books", date(2020, 1, 1), None))
            .unwrap();
        let second = db
            .create_category(&category("Games", date(2020, 1, 1), None))
            .unwrap();

        // Another writer bumps the second record after we read it
        let mut stale = db.get_category(second).unwrap().unwrap();
        db.conn()
            .unwrap()
            .execute(
                "UPDATE budget_categories SET version = version + 1 WHERE id = ?",
                params![second],
            )
            .unwrap();

        let mut changes = ChangeSet::new();
        let mut fresh = db.get_category(first).unwrap().unwrap();
        fresh.amount = 1.0;
        changes.edit_category(fresh);
        stale.amount = 2.0;
        changes.edit_category(stale);

        let err = db.save_changes(changes).unwrap_err();
        assert!(matches!(
            err,
            Error::Concurrency {
                entity: "category",
                id
            } if id == second
        ));

        // The first edit was applied inside the transaction and rolled back
        let first = db.get_category(first).unwrap().unwrap();
        assert_eq!((first.amount, first.version), (75.5, 1));
    }

    #[test]
    fn test_save_changes_deleted_record_is_concurrency() {
        let db = Database::in_memory().unwrap();
        let id = db.create_payee(&payee("Acme", None)).unwrap();
        let read = db.get_payee(id).unwrap().unwrap();
        db.delete_payee(id).unwrap();

        let mut changes = ChangeSet::new();
        changes.edit_payee(read);
        assert!(matches!(
            db.save_changes(changes),
            Err(Error::Concurrency { .. })
        ));
    }

    #[test]
    fn test_change_set_replaces_same_record() {
        let db = Database::in_memory().unwrap();
        let id = db
            .create_category(&category("Gifts", date(2020, 1, 1), None))
            .unwrap();
        let read = db.get_category(id).unwrap().unwrap();

        let mut changes = ChangeSet::new();
        let mut first = read.clone();
        first.amount = 10.0;
        changes.edit_category(first);
        let mut second = read;
        second.amount = 20.0;
        changes.edit_category(second);

        assert_eq!(changes.len(), 1);
        db.save_changes(changes).unwrap();
        assert_eq!(db.get_category(id).unwrap().unwrap().amount, 20.0);
    }

    #[test]
    fn test_empty_change_set_is_noop() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.save_changes(ChangeSet::new()).unwrap(), 0);
    }

    #[test]
    fn test_file_backed_unencrypted_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new_unencrypted(path).unwrap();
            db.create_payee(&payee("Acme", None)).unwrap();
        }

        let db = Database::new_unencrypted(path).unwrap();
        assert_eq!(db.stats().unwrap().payees, 1);
        assert_eq!(db.path(), path);
    }
}
