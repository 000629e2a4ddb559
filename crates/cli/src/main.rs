//! ERP Assistant CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! erp-cli migrate
//!
//! # Create a user
//! erp-cli user create -u finance_user -p 'correct horse' -d Finance -r user
//!
//! # Export users, FAQs and escalations as JSON
//! erp-cli data export -o backup.json
//!
//! # Replace FAQs and non-admin users from a JSON file
//! erp-cli data import backup.json
//!
//! # Ask the chat responder without running the server
//! erp-cli chat "Show me sales for this month" -d Sales
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create users
//! - `data export` / `data import` - Bulk data transfer
//! - `chat` - One-shot local chat

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "erp-cli")]
#[command(author, version, about = "ERP assistant CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Export or import data
    Data {
        #[command(subcommand)]
        action: DataAction,
    },
    /// Send one message to the local chat responder
    Chat {
        /// The message to send
        message: String,

        /// Department the question is about (HR, Sales, Finance, IT, Marketing, Admin)
        #[arg(short, long)]
        department: Option<String>,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Username (at least 3 characters)
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,

        /// Department (HR, Sales, Finance, IT, Marketing, Admin)
        #[arg(short, long)]
        department: String,

        /// Role (`user`, `admin`)
        #[arg(short, long, default_value = "user")]
        role: String,
    },
}

#[derive(Subcommand)]
enum DataAction {
    /// Write users, FAQs and escalations as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace FAQs and non-admin users from a JSON file
    Import {
        /// File produced by `data export`
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), commands::CliError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                password,
                department,
                role,
            } => {
                commands::user::create(username, password, department, role).await?;
            }
        },
        Commands::Data { action } => match action {
            DataAction::Export { output } => commands::data::export(output.as_deref()).await?,
            DataAction::Import { file } => commands::data::import(&file).await?,
        },
        Commands::Chat {
            message,
            department,
        } => commands::chat::run(message, department).await?,
    }
    Ok(())
}
