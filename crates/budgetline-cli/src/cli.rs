//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Budgetline - Track spending against budgets that change over time
#[derive(Parser)]
#[command(name = "budgetline")]
#[command(about = "Self-hosted personal expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "budgetline.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set BUDGETLINE_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires a bearer key from BUDGETLINE_API_KEYS.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show database status (encryption, size, row counts)
    Status,

    /// Manage budget categories (list, add, edit, remove, history)
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Manage payees (list, add, remove)
    Payees {
        #[command(subcommand)]
        action: Option<PayeesAction>,
    },

    /// Manage transactions (list, add, remove)
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Manage statement aliases (list, add, remove, resolve)
    Aliases {
        #[command(subcommand)]
        action: Option<AliasesAction>,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List category records
    List {
        /// Sort expression, e.g. "amount:desc"
        #[arg(long)]
        sort: Option<String>,

        /// Only records in effect on this day (YYYY-MM-DD)
        #[arg(long)]
        on: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a category record
    Add {
        /// Category name
        name: String,

        /// Budgeted amount
        #[arg(long, allow_hyphen_values = true)]
        amount: f64,

        /// Category type: income or expense
        #[arg(long = "type", default_value = "expense")]
        category_type: String,

        /// First day the record applies (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Last day the record applies (YYYY-MM-DD), open-ended if omitted
        #[arg(long)]
        to: Option<String>,
    },

    /// Edit a category; the new values apply from the effective date on
    Edit {
        /// Category record ID
        id: i64,

        /// First day the new values apply (YYYY-MM-DD), today if omitted
        #[arg(long)]
        effective: Option<String>,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New amount
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<f64>,

        /// New type: income or expense
        #[arg(long = "type")]
        category_type: Option<String>,
    },

    /// Remove a category record
    Remove {
        /// Category record ID
        id: i64,
    },

    /// Show every record of a category name in date order
    History {
        /// Category name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum PayeesAction {
    /// List payees
    List {
        /// Sort expression, e.g. "name:desc"
        #[arg(long)]
        sort: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a payee
    Add {
        /// Payee name
        name: String,

        /// Day the payee became relevant (YYYY-MM-DD), today if omitted
        #[arg(long)]
        from: Option<String>,

        /// Category record ID
        #[arg(long)]
        category: Option<i64>,
    },

    /// Remove a payee and its aliases
    Remove {
        /// Payee ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions
    List {
        /// Sort expression, e.g. "date:desc"
        #[arg(long)]
        sort: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Record a transaction
    Add {
        /// Amount (negative for money going out)
        #[arg(allow_hyphen_values = true)]
        amount: f64,

        /// Transaction date (YYYY-MM-DD), today if omitted
        #[arg(long)]
        date: Option<String>,

        /// Payee ID
        #[arg(long)]
        payee: Option<i64>,

        /// Category record ID overriding the payee's category
        #[arg(long)]
        category: Option<i64>,
    },

    /// Remove a transaction
    Remove {
        /// Transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum AliasesAction {
    /// List aliases
    List {
        /// Sort expression, e.g. "payee"
        #[arg(long)]
        sort: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Map a statement string to a payee
    Add {
        /// Raw statement string
        name: String,

        /// Payee ID
        #[arg(long)]
        payee: i64,
    },

    /// Remove an alias
    Remove {
        /// Alias ID
        id: i64,
    },

    /// Show which payee a statement string resolves to
    Resolve {
        /// Raw statement string
        name: String,
    },
}
