//! BiblioDrift CLI
//!
//! Command-line interface for BiblioDrift - personal book shelf tracking.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use biblio_core::{Config, HttpLibraryService, LibraryManager, LocalStore, Shelf};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "biblio")]
#[command(about = "BiblioDrift - track books across your shelves")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a book to a shelf
    Add {
        /// Catalog identifier of the book (e.g. a Google Books volume id)
        external_id: String,
        /// Book title
        title: String,
        /// Author (repeat for multiple)
        #[arg(short, long = "author")]
        authors: Vec<String>,
        /// Cover image URL
        #[arg(long)]
        cover: Option<String>,
        /// Target shelf: current, want, or finished
        #[arg(short, long, default_value = "want")]
        shelf: Shelf,
    },
    /// List shelved books
    #[command(alias = "ls")]
    List {
        /// Only show one shelf
        #[arg(short, long)]
        shelf: Option<Shelf>,
    },
    /// Remove a book from its shelf
    #[command(alias = "rm")]
    Remove {
        /// Catalog identifier of the book
        external_id: String,
    },
    /// Update reading progress for an in-progress book
    Progress {
        /// Catalog identifier of the book
        external_id: String,
        /// Percent read (0-100)
        value: i64,
    },
    /// Reconcile local shelves with the remote backend
    Sync,
    /// Log in to the remote backend
    Login {
        /// Backend username
        username: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out and clear the stored session
    Logout,
    /// Show session, backend, and shelf information
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show purchase links for a shelved book
    Buy {
        /// Catalog identifier of the book
        external_id: String,
        /// ISBN to pin the edition searched for
        #[arg(long)]
        isbn: Option<String>,
    },
    /// Export the shelf state as JSON
    Export {
        /// Destination file, or "-" for stdout
        #[arg(default_value = "-")]
        path: String,
    },
    /// Remove all shelved books
    Clear {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, api_url)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store or the backend client
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(&output),
            Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, &output),
        };
    }

    let config = Config::load().context("Failed to load configuration")?;
    let service = Arc::new(
        HttpLibraryService::new(&config.api_url).context("Failed to build backend client")?,
    );
    let store = LocalStore::new(config.clone());
    let manager = LibraryManager::new(store, service.clone());

    let result = match cli.command {
        Commands::Add {
            external_id,
            title,
            authors,
            cover,
            shelf,
        } => commands::book::add(&manager, external_id, title, authors, cover, shelf, &output),
        Commands::List { shelf } => commands::book::list(&manager, shelf, &output),
        Commands::Remove { external_id } => commands::book::remove(&manager, external_id, &output),
        Commands::Progress { external_id, value } => {
            commands::book::progress(&manager, external_id, value, &output)
        }
        Commands::Sync => commands::sync::sync(&manager, &output).await,
        Commands::Login { username, password } => {
            commands::session::login(&manager, &service, username, password, &output).await
        }
        Commands::Logout => commands::session::logout(&manager, &output),
        Commands::Status => commands::status::show(&manager, &config, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Buy { external_id, isbn } => {
            commands::buy::links(&manager, external_id, isbn, &output)
        }
        Commands::Export { path } => commands::book::export(&manager, path, &output),
        Commands::Clear { yes } => commands::book::clear(&manager, yes, &output),
    };

    // Let any in-flight backend writes finish before the process exits
    manager.flush_remote().await;

    result
}
