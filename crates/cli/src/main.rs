//! AgroLink admin console.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password read from AGROLINK_ADMIN_PASSWORD or prompted)
//! agrolink-admin login -e ops@agrolink.id
//!
//! # Review the action queue and KPIs
//! agrolink-admin dashboard
//!
//! # Complete a payout with a transfer proof
//! agrolink-admin payouts complete --id po-123 --proof receipt.jpg
//!
//! # Reject a verification
//! agrolink-admin verifications review --id ver-9 --reject --notes "photo unreadable"
//!
//! # Export the transaction history
//! agrolink-admin transactions export -o transaksi.xlsx
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - session management
//! - `dashboard` - KPIs and action queue
//! - `payouts` - list pending payouts, complete one
//! - `verifications` - list pending verifications, review one
//! - `transactions` - paginated history, spreadsheet export
//! - `users` - paginated user list, per-role stats
//! - `revenue` / `profit` - analytics over a date range

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "agrolink-admin")]
#[command(author, version, about = "AgroLink marketplace admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as a platform admin
    Login {
        /// Admin email address
        #[arg(short, long)]
        email: String,
    },
    /// Drop the persisted session
    Logout,
    /// Show the currently persisted principal
    Whoami,
    /// Show KPIs and the action queue
    Dashboard,
    /// Payouts awaiting manual transfer
    Payouts {
        #[command(subcommand)]
        action: PayoutAction,
    },
    /// Identity documents awaiting review
    Verifications {
        #[command(subcommand)]
        action: VerificationAction,
    },
    /// Platform transaction history
    Transactions {
        #[command(subcommand)]
        action: TransactionAction,
    },
    /// Registered users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Revenue analytics
    Revenue {
        /// Range start (YYYY-MM-DD); backend defaults to the last 30 days
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Range end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Profit analytics
    Profit {
        /// Range start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Range end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Narrow to one revenue source (`utama`, `ecommerce`)
        #[arg(long)]
        source: Option<String>,
    },
}

#[derive(Subcommand)]
enum PayoutAction {
    /// List payouts awaiting transfer
    List,
    /// Mark a payout as transferred, attaching a proof file
    Complete {
        /// Payout ID
        #[arg(long)]
        id: String,
        /// Path of the transfer proof (jpg, png, or pdf)
        #[arg(long)]
        proof: PathBuf,
    },
}

#[derive(Subcommand)]
enum VerificationAction {
    /// List documents awaiting review
    List,
    /// Approve or reject a verification request
    Review {
        /// Verification ID
        #[arg(long)]
        id: String,
        /// Reject instead of approve
        #[arg(long)]
        reject: bool,
        /// Reviewer notes (required when rejecting)
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
enum TransactionAction {
    /// List one page of the transaction history
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Rows per page
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Download the history as a spreadsheet
    Export {
        /// Output file path
        #[arg(short, long, default_value = "transaksi_agrolink.xlsx")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List one page of registered users
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Rows per page
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// Match against name or email
        #[arg(long)]
        search: Option<String>,
        /// Filter by role (`farmer`, `worker`, `driver`, `general`)
        #[arg(long)]
        role: Option<String>,
    },
    /// Show per-role user counts
    Stats,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Login { email } => commands::auth::login(&email).await?,
        Commands::Logout => commands::auth::logout()?,
        Commands::Whoami => commands::auth::whoami()?,
        Commands::Dashboard => commands::reports::dashboard().await?,
        Commands::Payouts { action } => match action {
            PayoutAction::List => commands::payouts::list().await?,
            PayoutAction::Complete { id, proof } => {
                commands::payouts::complete(&id, &proof).await?;
            }
        },
        Commands::Verifications { action } => match action {
            VerificationAction::List => commands::verifications::list().await?,
            VerificationAction::Review { id, reject, notes } => {
                commands::verifications::review(&id, reject, notes.as_deref()).await?;
            }
        },
        Commands::Transactions { action } => match action {
            TransactionAction::List { page, limit } => {
                commands::reports::transactions(page, limit).await?;
            }
            TransactionAction::Export { output } => {
                commands::reports::export_transactions(&output).await?;
            }
        },
        Commands::Users { action } => match action {
            UserAction::List {
                page,
                limit,
                search,
                role,
            } => {
                commands::reports::users(page, limit, search.as_deref(), role.as_deref()).await?;
            }
            UserAction::Stats => commands::reports::user_stats().await?,
        },
        Commands::Revenue { start, end } => commands::reports::revenue(start, end).await?,
        Commands::Profit { start, end, source } => {
            commands::reports::profit(start, end, source.as_deref()).await?;
        }
    }
    Ok(())
}
