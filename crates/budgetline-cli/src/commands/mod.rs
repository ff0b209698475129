//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `aliases` - Statement alias commands (list, add, remove, resolve)
//! - `categories` - Budget category commands (list, add, edit, remove, history)
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `payees` - Payee commands (list, add, remove)
//! - `serve` - Web server command
//! - `status` - Database status command
//! - `transactions` - Transaction commands (list, add, remove)

pub mod aliases;
pub mod categories;
pub mod core;
pub mod payees;
pub mod serve;
pub mod status;
pub mod transactions;

// Re-export command functions for main.rs
pub use aliases::*;
pub use categories::*;
pub use core::*;
pub use payees::*;
pub use serve::*;
pub use status::*;
pub use transactions::*;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a YYYY-MM-DD argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", s))
}

/// Parse an optional date argument, defaulting to today
pub fn parse_date_or_today(s: Option<&str>) -> Result<NaiveDate> {
    match s {
        Some(s) => parse_date(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Pretty-print records as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format an amount with sign coloring (red out, green in)
pub fn format_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("\x1b[31m${:.2}\x1b[0m", amount.abs())
    } else {
        format!("\x1b[32m+${:.2}\x1b[0m", amount)
    }
}

/// Render an optional id column
pub fn format_ref(id: Option<i64>) -> String {
    id.map_or_else(|| "-".to_string(), |id| format!("#{}", id))
}
