//! CLI 模块

pub mod init;
pub mod serve;
pub mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(version)]
#[command(about = "Personal task tracker with a JSON file backed web API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (API + optional static client)
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
        /// Host address to bind (overrides config and HOST)
        #[arg(long)]
        host: Option<String>,
        /// Data directory holding tasks.json, quotes.json and config.toml
        #[arg(long, env = "TASKFLOW_DATA_DIR")]
        data_dir: Option<PathBuf>,
        /// Directory of static client files served at /
        #[arg(long)]
        static_dir: Option<PathBuf>,
        /// Open the browser once the server is up
        #[arg(long)]
        open: bool,
    },
    /// Write the seed data files into the data directory
    Init {
        /// Data directory to initialise
        #[arg(long, env = "TASKFLOW_DATA_DIR")]
        data_dir: Option<PathBuf>,
        /// Overwrite existing data files with the seed data
        #[arg(long)]
        force: bool,
    },
    /// Print task statistics as JSON
    Stats {
        /// Data directory to read
        #[arg(long, env = "TASKFLOW_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },
}

impl Commands {
    /// Default command when none is given on the command line
    pub fn default_serve() -> Self {
        Commands::Serve {
            port: None,
            host: None,
            data_dir: None,
            static_dir: None,
            open: false,
        }
    }
}

/// Resolve the data directory: flag/env first, then ~/.taskflow
pub fn resolve_data_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir.unwrap_or_else(crate::storage::default_data_dir)
}
