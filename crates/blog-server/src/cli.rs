use clap::{Parser, Subcommand};

use blog_core::VERSION;

/// Blog server - articles, comments, and user accounts over a JSON API
#[derive(Parser)]
#[command(name = "blog-server")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "BLOG_CONFIG")]
    pub config: Option<String>,

    /// Path to the store file (overrides config)
    #[arg(short, long, global = true, env = "BLOG_DATABASE")]
    pub database: Option<String>,

    /// Address to bind (overrides config)
    #[arg(long, global = true, env = "BLOG_BIND")]
    pub bind: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, global = true, env = "BLOG_PORT")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API (default)
    Serve,

    /// Create a new, empty store
    Init {
        /// Path where the store will be created
        #[arg(value_name = "PATH")]
        path: Option<String>,
    },

    /// Check store integrity
    Check,
}
