//! Transaction command implementations

use anyhow::Result;
use budgetline_core::db::Database;
use budgetline_core::models::NewTransaction;
use budgetline_core::{parse_sort, TransactionManager, TransactionSortField};

use super::{format_amount, format_ref, parse_date_or_today, print_json};

pub fn cmd_transactions_list(db: &Database, sort: Option<&str>, json: bool) -> Result<()> {
    let sort = parse_sort::<TransactionSortField>(sort)?;
    let manager = TransactionManager::new(db);
    let transactions = manager.list(sort)?;

    if json {
        return print_json(&transactions);
    }

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  budgetline transactions add -- -42.50 --payee 1");
        return Ok(());
    }

    println!();
    println!("📝 Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let category = manager
            .resolve_category(tx.id)?
            .map_or_else(|| "-".to_string(), |c| c.name);
        println!(
            "   {:>4} │ {} │ {:>10} │ payee {:<6} │ {}",
            tx.id,
            tx.date,
            format_amount(tx.amount),
            format_ref(tx.payee_id),
            category
        );
    }

    Ok(())
}

pub fn cmd_transactions_add(
    db: &Database,
    amount: f64,
    date: Option<&str>,
    payee: Option<i64>,
    category: Option<i64>,
) -> Result<()> {
    let tx = TransactionManager::new(db).add(NewTransaction {
        date: parse_date_or_today(date)?,
        amount,
        payee_id: payee,
        override_category_id: category,
    })?;

    println!(
        "✅ Recorded transaction #{} of {:.2} on {}",
        tx.id, tx.amount, tx.date
    );
    Ok(())
}

pub fn cmd_transactions_remove(db: &Database, id: i64) -> Result<()> {
    if TransactionManager::new(db).remove(id)? {
        println!("✅ Removed transaction #{}", id);
    } else {
        println!("Transaction #{} not found, nothing removed", id);
    }
    Ok(())
}
