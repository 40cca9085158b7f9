//! Blog server - JSON API for articles, comments, and user accounts
//!
//! This is the command-line entry point: it resolves configuration, prepares
//! the store, and runs the HTTP server from the `blog_server` library.

mod cli;

use std::path::PathBuf;

use blog_core::storage::{DocumentStore, SqliteStorage};
use blog_server::config::{load_config, BlogConfig};
use blog_server::state::AppState;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    blog_server::init_tracing();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = cli.database.as_deref() {
        config.database.path = Some(path.to_string());
    }
    if let Some(bind) = cli.bind.as_deref() {
        config.server.bind = bind.to_string();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command {
        Some(Commands::Serve) | None => run_serve(config).await?,
        Some(Commands::Init { path }) => {
            let target = match path {
                Some(path) => PathBuf::from(path),
                None => config.database_path()?,
            };
            if target.exists() {
                return Err(anyhow::anyhow!(
                    "A store already exists at {}",
                    target.display()
                ));
            }
            blog_server::prepare_store(&target)?;

            if !cli.quiet {
                println!("Initialized new store at {}", target.display());
            }
        }
        Some(Commands::Check) => {
            let target = config.database_path()?;
            let storage = SqliteStorage::open(&target)
                .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", target.display(), e))?;
            let metadata = storage.metadata()?;
            let result = storage.check_integrity();
            storage.close()?;

            match result {
                Ok(()) => {
                    if !cli.quiet {
                        println!("Integrity check: OK");
                        println!("- format version: {}", metadata.format_version);
                        println!("- created: {}", metadata.created_at);
                    }
                }
                Err(err) => {
                    eprintln!("Integrity check: FAILED");
                    eprintln!("- error: {}", err);
                    return Err(anyhow::anyhow!("Integrity check failed"));
                }
            }
        }
    }

    Ok(())
}

async fn run_serve(config: BlogConfig) -> anyhow::Result<()> {
    let hasher = config.hasher()?;
    let database_path = config.database_path()?;
    if blog_server::prepare_store(&database_path)? {
        info!(store = %database_path.display(), "Created new store");
    }

    let state = AppState::new(database_path, hasher);
    blog_server::serve(&config, state).await
}
