//! Statement alias command implementations

use anyhow::Result;
use budgetline_core::db::Database;
use budgetline_core::models::NewAlias;
use budgetline_core::{parse_sort, AliasManager, AliasSortField};

use super::{print_json, truncate};

pub fn cmd_aliases_list(db: &Database, sort: Option<&str>, json: bool) -> Result<()> {
    let sort = parse_sort::<AliasSortField>(sort)?;
    let aliases = AliasManager::new(db).list(sort)?;

    if json {
        return print_json(&aliases);
    }

    if aliases.is_empty() {
        println!("No aliases found. Map a statement string with:");
        println!("  budgetline aliases add \"SQ *CORNER SHOP 0042\" --payee 1");
        return Ok(());
    }

    println!();
    println!("🔗 Aliases");
    println!("   ─────────────────────────────────────────────────────────────");

    for alias in aliases {
        println!(
            "   {:>4} │ {:<40} │ payee #{}",
            alias.id,
            truncate(&alias.name, 40),
            alias.payee_id
        );
    }

    Ok(())
}

pub fn cmd_aliases_add(db: &Database, name: &str, payee: i64) -> Result<()> {
    let alias = AliasManager::new(db).add(NewAlias {
        name: name.to_string(),
        payee_id: payee,
    })?;

    println!(
        "✅ Added alias '{}' (#{}) → payee #{}",
        alias.name, alias.id, alias.payee_id
    );
    Ok(())
}

pub fn cmd_aliases_remove(db: &Database, id: i64) -> Result<()> {
    if AliasManager::new(db).remove(id)? {
        println!("✅ Removed alias #{}", id);
    } else {
        println!("Alias #{} not found, nothing removed", id);
    }
    Ok(())
}

pub fn cmd_aliases_resolve(db: &Database, name: &str) -> Result<()> {
    match AliasManager::new(db).resolve(name)? {
        Some(payee) => println!("'{}' → {} (#{})", name.trim(), payee.name, payee.id),
        None => println!("'{}' does not match any alias or payee", name.trim()),
    }
    Ok(())
}
