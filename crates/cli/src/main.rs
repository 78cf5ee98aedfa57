//! Leadbook CLI - Operator tools for the Leadbook record store.
//!
//! # Usage
//!
//! ```bash
//! # Create the store file and seed the default admin
//! leadbook --data ./leadbook.json init
//!
//! # Book an enquiry (first run "sends" the code, second confirms it)
//! leadbook submit --name "Asha Rao" --email asha@x.com --phone 9876543210 \
//!     --curriculum CBSE --grade 5
//! leadbook submit ... --otp 123456
//!
//! # Manage leads
//! leadbook login -u admin -p admin123
//! leadbook leads list --search asha
//! leadbook leads set-status 1709289000000 "Demo Assign"
//! leadbook leads delete 1709289000000 --yes
//! leadbook logout
//! ```
//!
//! `--data` and `--namespace` default to `LEADBOOK_DATA_PATH` and
//! `LEADBOOK_NAMESPACE`, read from the environment or a `.env` file.
//!
//! # Commands
//!
//! - `init` - Initialize the store
//! - `submit` - Submit an enquiry through the OTP flow
//! - `login` / `logout` / `whoami` - Operator session marker
//! - `leads list|set-status|delete` - Lead management (login required)
//! - `users list` - Admin accounts (login required)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use leadbook_store::{DEFAULT_NAMESPACE, RecordStore, StoreConfig};

mod commands;
mod error;

use commands::enquiry::SubmitArgs;

#[derive(Parser)]
#[command(name = "leadbook")]
#[command(author, version, about = "Leadbook operator tools")]
struct Cli {
    /// JSON store file shared with the storefront and admin console
    #[arg(long, env = "LEADBOOK_DATA_PATH", global = true)]
    data: Option<PathBuf>,

    /// Store key namespace
    #[arg(long, env = "LEADBOOK_NAMESPACE", default_value = DEFAULT_NAMESPACE, global = true)]
    namespace: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the store and seed the default admin (safe to repeat)
    Init,
    /// Submit an enquiry
    Submit(SubmitArgs),
    /// Log in as an admin
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Clear the session marker
    Logout,
    /// Show the logged-in admin
    Whoami,
    /// Manage leads
    Leads {
        #[command(subcommand)]
        action: LeadsAction,
    },
    /// Manage admin users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
enum LeadsAction {
    /// List leads
    List {
        /// Case-insensitive filter over every field
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Change a lead's status
    SetStatus {
        id: String,

        /// One of: Enquired, Attempted, "Demo Assign", "Demo Complete",
        /// "Invoice Send", Enroll
        status: String,
    },
    /// Delete a lead
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// List admin users
    List,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        let _ = writeln!(std::io::stderr(), "error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Some(data_path) = cli.data else {
        return Err("No store file given. Pass --data <PATH> or set LEADBOOK_DATA_PATH.".into());
    };
    let store = RecordStore::open(Some(&data_path), &StoreConfig::with_namespace(cli.namespace))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Init => commands::store::init(&store, &data_path, &mut out)?,
        Commands::Submit(args) => commands::enquiry::submit(&store, args, &mut out).await?,
        Commands::Login { username, password } => {
            commands::session::login(&store, username, password, &mut out)?;
        }
        Commands::Logout => commands::session::logout(&store, &mut out)?,
        Commands::Whoami => commands::session::whoami(&store, &mut out)?,
        Commands::Leads { action } => match action {
            LeadsAction::List { search } => commands::leads::list(&store, &search, &mut out)?,
            LeadsAction::SetStatus { id, status } => {
                commands::leads::set_status(&store, &id, status, &mut out)?;
            }
            LeadsAction::Delete { id, yes } => {
                let stdin = std::io::stdin();
                commands::leads::delete(&store, &id, yes, &mut stdin.lock(), &mut out)?;
            }
        },
        Commands::Users { action } => match action {
            UsersAction::List => commands::users::list(&store, &mut out)?,
        },
    }
    Ok(())
}

