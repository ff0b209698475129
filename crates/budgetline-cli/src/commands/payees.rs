//! Payee command implementations

use anyhow::Result;
use budgetline_core::db::Database;
use budgetline_core::models::NewPayee;
use budgetline_core::{parse_sort, PayeeManager, PayeeSortField};

use super::{format_ref, parse_date_or_today, print_json, truncate};

pub fn cmd_payees_list(db: &Database, sort: Option<&str>, json: bool) -> Result<()> {
    let sort = parse_sort::<PayeeSortField>(sort)?;
    let payees = PayeeManager::new(db).list(sort)?;

    if json {
        return print_json(&payees);
    }

    if payees.is_empty() {
        println!("No payees found. Add one with:");
        println!("  budgetline payees add \"Corner Shop\" --category 1");
        return Ok(());
    }

    println!();
    println!("🏪 Payees");
    println!("   ─────────────────────────────────────────────────────────────");

    for payee in payees {
        println!(
            "   {:>4} │ {:<30} │ {} │ category {}",
            payee.id,
            truncate(&payee.name, 30),
            payee.effective_from,
            format_ref(payee.budget_category_id)
        );
    }

    Ok(())
}

pub fn cmd_payees_add(
    db: &Database,
    name: &str,
    from: Option<&str>,
    category: Option<i64>,
) -> Result<()> {
    let payee = PayeeManager::new(db).add(NewPayee {
        name: name.to_string(),
        effective_from: parse_date_or_today(from)?,
        budget_category_id: category,
    })?;

    println!("✅ Added payee '{}' (#{})", payee.name, payee.id);
    Ok(())
}

pub fn cmd_payees_remove(db: &Database, id: i64) -> Result<()> {
    if PayeeManager::new(db).remove(id)? {
        println!("✅ Removed payee #{}", id);
    } else {
        println!("Payee #{} not found, nothing removed", id);
    }
    Ok(())
}
