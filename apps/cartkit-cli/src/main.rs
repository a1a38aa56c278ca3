//! cartkit - session-backed shopping cart from the command line
//!
//! Usage: cartkit [--config PATH] [--store-dir DIR] <COMMAND>
//!
//! Commands:
//!   show        Print items and totals
//!   add         Add an entity to the cart
//!   update      Refresh an item, optionally changing its quantity
//!   remove      Remove an item
//!   add-qty     Increase an item's quantity
//!   remove-qty  Decrease an item's quantity
//!   exists      Check whether an entity is in the cart
//!   discount    Print or set the cart discount
//!   destroy     Delete the session
//!
//! Output is pretty JSON on stdout; logs go to stderr (`RUST_LOG`).

mod args;
mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cartkit_session::{CartEngine, FileSessionStore};

use crate::commands::Command;

/// cartkit - session-backed shopping cart
#[derive(Parser, Debug)]
#[command(name = "cartkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Cart configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding session files (default: platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = config::load(cli.config.as_deref())?;
    let store = match cli.store_dir {
        Some(dir) => FileSessionStore::new(dir),
        None => FileSessionStore::open_default()?,
    };
    debug!(dir = %store.dir().display(), "Using session directory");

    let mut cart = CartEngine::new(config, store)?;
    let output = commands::run(&mut cart, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Installs the stderr subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - every cart operation
/// - Default: warnings, plus info from the cartkit crates
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,cartkit=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
