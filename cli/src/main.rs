//! Palettes CLI
//!
//! A terminal palette chooser backed by palette-engine. Palettes live in a
//! directory of JSON files; deleted palettes go to a bin and can be brought
//! back with `undelete`.
//!
//! # Commands
//!
//! - `list` - Show live palettes
//! - `show` - Show the palette at a cursor position
//! - `new` / `rename` / `add` / `remove` - Edit palettes
//! - `delete` / `clean` / `undelete` / `trash` - Manage the bin

mod commands;
mod config;
mod error;

use crate::commands::{Action, Format};
use crate::config::Config;
use clap::{Parser, Subcommand};
use palette_engine::{default_palettes, FileBackend, PaletteStore, StoreConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Manage emoji palettes from the command line.
#[derive(Parser)]
#[command(name = "palettes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the palette files (overrides PALETTE_DATA_DIR)
    #[arg(global = true, short, long)]
    dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Output format
    #[arg(global = true, short, long, value_enum, default_value = "text")]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List live palettes
    List,

    /// Show the palette at a cursor position
    Show {
        /// Cursor index (wraps around)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        at: i64,

        /// Step the cursor by this many palettes
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        offset: i64,
    },

    /// Insert a new palette at a cursor position
    New {
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        at: i64,

        #[arg(short, long, default_value = "")]
        name: String,

        #[arg(short, long, default_value = "")]
        emojis: String,
    },

    /// Rename a palette
    Rename { id: u64, name: String },

    /// Add emoji to the front of a palette
    Add { id: u64, emojis: String },

    /// Remove emoji from a palette
    Remove { id: u64, emojis: String },

    /// Delete a palette (non-empty palettes go to the bin)
    Delete { id: u64 },

    /// Delete a palette only if it has no name and no emoji
    Clean { id: u64 },

    /// Restore the most recently deleted palette
    Undelete {
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        at: i64,
    },

    /// List the recently deleted bin
    Trash,
}

impl From<Commands> for Action {
    fn from(command: Commands) -> Self {
        match command {
            Commands::List => Action::List,
            Commands::Show { at, offset } => Action::Show { at, offset },
            Commands::New { at, name, emojis } => Action::New { at, name, emojis },
            Commands::Rename { id, name } => Action::Rename { id, name },
            Commands::Add { id, emojis } => Action::Add { id, emojis },
            Commands::Remove { id, emojis } => Action::Remove { id, emojis },
            Commands::Delete { id } => Action::Delete { id },
            Commands::Clean { id } => Action::Clean { id },
            Commands::Undelete { at } => Action::Undelete { at },
            Commands::Trash => Action::Trash,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("palette_cli=info,palette_engine=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let mut config = Config::from_env()?;
    if let Some(dir) = cli.dir {
        config.data_dir = dir;
    }
    tracing::debug!(dir = %config.data_dir.display(), key = %config.store_key, "configuration loaded");

    let backend = FileBackend::open(&config.data_dir)?;
    let store_config = StoreConfig::new(config.store_key.clone())
        .with_defaults(default_palettes())
        .with_recently_deleted();
    let mut store = PaletteStore::open(Arc::new(backend), store_config);

    let stdout = std::io::stdout();
    commands::run(cli.command.into(), &mut store, cli.format, &mut stdout.lock())?;
    Ok(())
}
