//! Budgetline CLI - Personal expense tracker
//!
//! Usage:
//!   budgetline init                                  Initialize database
//!   budgetline categories add Rent --amount 1200 --from 2024-01-01
//!   budgetline categories edit 3 --amount 1300 --effective 2025-01-01
//!   budgetline serve --port 3000                     Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Categories { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_categories_list(&db, None, None, false),
                Some(CategoriesAction::List { sort, on, json }) => {
                    commands::cmd_categories_list(&db, sort.as_deref(), on.as_deref(), json)
                }
                Some(CategoriesAction::Add {
                    name,
                    amount,
                    category_type,
                    from,
                    to,
                }) => commands::cmd_categories_add(
                    &db,
                    &name,
                    amount,
                    &category_type,
                    &from,
                    to.as_deref(),
                ),
                Some(CategoriesAction::Edit {
                    id,
                    effective,
                    name,
                    amount,
                    category_type,
                }) => commands::cmd_categories_edit(
                    &db,
                    id,
                    effective.as_deref(),
                    commands::CategoryEdit {
                        name,
                        amount,
                        category_type,
                    },
                ),
                Some(CategoriesAction::Remove { id }) => commands::cmd_categories_remove(&db, id),
                Some(CategoriesAction::History { name }) => {
                    commands::cmd_categories_history(&db, &name)
                }
            }
        }
        Commands::Payees { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_payees_list(&db, None, false),
                Some(PayeesAction::List { sort, json }) => {
                    commands::cmd_payees_list(&db, sort.as_deref(), json)
                }
                Some(PayeesAction::Add {
                    name,
                    from,
                    category,
                }) => commands::cmd_payees_add(&db, &name, from.as_deref(), category),
                Some(PayeesAction::Remove { id }) => commands::cmd_payees_remove(&db, id),
            }
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_transactions_list(&db, None, false),
                Some(TransactionsAction::List { sort, json }) => {
                    commands::cmd_transactions_list(&db, sort.as_deref(), json)
                }
                Some(TransactionsAction::Add {
                    amount,
                    date,
                    payee,
                    category,
                }) => commands::cmd_transactions_add(&db, amount, date.as_deref(), payee, category),
                Some(TransactionsAction::Remove { id }) => {
                    commands::cmd_transactions_remove(&db, id)
                }
            }
        }
        Commands::Aliases { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_aliases_list(&db, None, false),
                Some(AliasesAction::List { sort, json }) => {
                    commands::cmd_aliases_list(&db, sort.as_deref(), json)
                }
                Some(AliasesAction::Add { name, payee }) => {
                    commands::cmd_aliases_add(&db, &name, payee)
                }
                Some(AliasesAction::Remove { id }) => commands::cmd_aliases_remove(&db, id),
                Some(AliasesAction::Resolve { name }) => commands::cmd_aliases_resolve(&db, &name),
            }
        }
    }
}
