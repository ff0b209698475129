//! Budget category command implementations

use anyhow::{anyhow, Result};
use budgetline_core::db::Database;
use budgetline_core::models::{BudgetCategory, CategoryType, NewBudgetCategory};
use budgetline_core::{parse_sort, CategoryManager, CategorySortField, SplitOutcome};

use super::{parse_date, parse_date_or_today, print_json, truncate};

/// Field overrides for `categories edit`
#[derive(Debug, Default)]
pub struct CategoryEdit {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub category_type: Option<String>,
}

fn parse_type(s: &str) -> Result<CategoryType> {
    s.parse::<CategoryType>().map_err(|e| anyhow!(e))
}

fn print_table(title: &str, categories: &[BudgetCategory]) {
    println!();
    println!("📋 {}", title);
    println!("   ─────────────────────────────────────────────────────────────");

    for category in categories {
        let to = category
            .effective_to
            .map_or_else(|| "open".to_string(), |d| d.to_string());
        println!(
            "   {:>4} │ {:<24} │ {:>10.2} │ {:<7} │ {} → {}",
            category.id,
            truncate(&category.name, 24),
            category.amount,
            category.category_type.as_str(),
            category.effective_from,
            to
        );
    }
}

pub fn cmd_categories_list(
    db: &Database,
    sort: Option<&str>,
    on: Option<&str>,
    json: bool,
) -> Result<()> {
    let sort = parse_sort::<CategorySortField>(sort)?;
    let manager = CategoryManager::new(db);
    let categories = match on {
        Some(day) => manager.active_on(parse_date(day)?, sort)?,
        None => manager.list(sort)?,
    };

    if json {
        return print_json(&categories);
    }

    if categories.is_empty() {
        println!("No categories found. Add one with:");
        println!("  budgetline categories add Groceries --amount 400 --from 2024-01-01");
        return Ok(());
    }

    print_table("Budget Categories", &categories);
    Ok(())
}

pub fn cmd_categories_add(
    db: &Database,
    name: &str,
    amount: f64,
    category_type: &str,
    from: &str,
    to: Option<&str>,
) -> Result<()> {
    let new = NewBudgetCategory {
        name: name.to_string(),
        amount,
        category_type: parse_type(category_type)?,
        effective_from: parse_date(from)?,
        effective_to: to.map(parse_date).transpose()?,
    };

    let category = CategoryManager::new(db).add(new)?;
    println!(
        "✅ Added category '{}' (#{}) at {:.2} from {}",
        category.name, category.id, category.amount, category.effective_from
    );
    Ok(())
}

/// Edit a category, splitting its history at the effective date
pub fn cmd_categories_edit(
    db: &Database,
    id: i64,
    effective: Option<&str>,
    edit: CategoryEdit,
) -> Result<()> {
    let manager = CategoryManager::new(db);
    let current = manager.get(Some(id))?;
    let effective_date = parse_date_or_today(effective)?;
    let today = chrono::Local::now().date_naive();

    let edited = BudgetCategory {
        name: edit.name.unwrap_or_else(|| current.name.clone()),
        amount: edit.amount.unwrap_or(current.amount),
        category_type: match edit.category_type {
            Some(t) => parse_type(&t)?,
            None => current.category_type,
        },
        ..current
    };

    let outcome = manager.split(id, edited, effective_date, today)?;
    let category = manager.get(Some(id))?;

    println!(
        "✅ Category #{} now '{}' at {:.2} from {}",
        category.id, category.name, category.amount, category.effective_from
    );
    for line in describe_split(&outcome) {
        println!("   {}", line);
    }
    Ok(())
}

/// One line per side effect of a split beyond the edited record itself
pub fn describe_split(outcome: &SplitOutcome) -> Vec<String> {
    let target = outcome.category.id;
    let mut lines = Vec::new();

    if let Some(closed) = &outcome.closed_predecessor {
        let to = closed
            .effective_to
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        lines.push(format!("Closed #{} '{}' on {}", closed.id, closed.name, to));
    }
    if !outcome.reassigned_payees.is_empty() {
        lines.push(format!(
            "Reassigned {} payee(s) to #{}",
            outcome.reassigned_payees.len(),
            target
        ));
    }
    if !outcome.reassigned_transactions.is_empty() {
        lines.push(format!(
            "Reassigned {} transaction(s) to #{}",
            outcome.reassigned_transactions.len(),
            target
        ));
    }
    lines
}

pub fn cmd_categories_remove(db: &Database, id: i64) -> Result<()> {
    if CategoryManager::new(db).remove(id)? {
        println!("✅ Removed category #{}", id);
    } else {
        println!("Category #{} not found, nothing removed", id);
    }
    Ok(())
}

pub fn cmd_categories_history(db: &Database, name: &str) -> Result<()> {
    let history = CategoryManager::new(db).history(name)?;

    if history.is_empty() {
        println!("No records for category '{}'.", name.trim());
        return Ok(());
    }

    print_table(&format!("History of '{}'", name.trim()), &history);
    Ok(())
}
