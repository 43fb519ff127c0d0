//! SonataLink - link a Sonata music hub to your smart home
//!
//! Terminal wizard that drives the setup flow end to end and stores the
//! resulting configuration entries. Pairing runs against the built-in
//! simulated hub so the flow can be exercised without hardware; real
//! deployments embed `sonatalink-flow` with a vendor connector.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sonatalink_client::SimulatedHub;
use sonatalink_core::{ConfigEntry, EntryId, EntryStore};
use sonatalink_flow::{ErrorCode, Form, SetupFlow, StepId, StepInput, StepOutcome};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// SonataLink - pair a Sonata music hub with your smart home
#[derive(Parser, Debug)]
#[command(name = "sonatalink")]
#[command(version, about, long_about = None)]
struct Args {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Entry store location (default: ~/.config/sonatalink/entries.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the setup wizard against the simulated hub
    Link {
        /// Pre-fill the host form
        #[arg(long)]
        host: Option<String>,

        /// Seconds until the simulated hub approves the pairing
        #[arg(long, default_value = "10")]
        grant_after: u64,

        /// Simulated hub never approves; exercises the timeout path
        #[arg(long)]
        silent: bool,

        /// Token the simulated hub issues
        #[arg(long, default_value = "simulated-token")]
        token: String,
    },
    /// List stored configuration entries
    List,
    /// Remove a stored configuration entry
    Remove {
        /// Entry id to remove
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    info!("SonataLink v{}", env!("CARGO_PKG_VERSION"));

    let store = match args.store {
        Some(path) => EntryStore::with_path(path).await?,
        None => EntryStore::new().await?,
    };

    match args.command {
        Command::Link {
            host,
            grant_after,
            silent,
            token,
        } => {
            let hub = if silent {
                SimulatedHub::silent()
            } else {
                SimulatedHub::grants(token, Duration::from_secs(grant_after))
            };
            run_wizard(&store, hub, host).await
        }
        Command::List => list_entries(&store).await,
        Command::Remove { id } => remove_entry(&store, &id).await,
    }
}

/// Drive the setup flow until it completes, prompting on each form
async fn run_wizard(store: &EntryStore, hub: SimulatedHub, host: Option<String>) -> Result<()> {
    let mut flow = SetupFlow::new(hub);
    let mut prefill = host;

    let mut outcome = flow.step(None).await;
    loop {
        match outcome {
            StepOutcome::Form(form) => {
                let input = prompt(&form, prefill.take())?;
                outcome = flow.step(Some(input)).await;
            }
            StepOutcome::CreateEntry { title, info } => {
                let entry = ConfigEntry::new(title, info);
                let id = entry.id.clone();
                store.save_entry(entry).await?;

                println!();
                println!("  Hub linked. Entry id: {}", id);
                return Ok(());
            }
        }
    }
}

/// Render a form on the terminal and read the submission
fn prompt(form: &Form, prefill: Option<String>) -> Result<StepInput> {
    println!();
    if let Some(code) = form.error {
        println!("  Error: {}", describe(code));
    }

    match form.step {
        StepId::User => {
            let host = match prefill {
                Some(host) => {
                    println!("  Hub address: {}", host);
                    host
                }
                None => loop {
                    print!("  Hub address: ");
                    io::stdout().flush()?;
                    let line = read_line()?;
                    let line = line.trim();
                    if !line.is_empty() {
                        break line.to_string();
                    }
                },
            };
            Ok(StepInput::User { host })
        }
        StepId::Link => {
            println!("  Press Enter to pair, then approve SonataLink in the hub's extension settings.");
            print!("  > ");
            io::stdout().flush()?;
            read_line()?;
            Ok(StepInput::Link)
        }
    }
}

fn read_line() -> Result<String> {
    let mut line = String::new();
    let n = io::stdin().lock().read_line(&mut line)?;
    if n == 0 {
        anyhow::bail!("Input closed; setup cancelled");
    }
    Ok(line)
}

fn describe(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::CannotConnect => "cannot_connect - the hub did not respond or pairing timed out",
        ErrorCode::InvalidAuth => "invalid_auth - the hub did not issue a usable token",
        ErrorCode::Unknown => "unknown - unexpected failure, rerun with -v for details",
    }
}

async fn list_entries(store: &EntryStore) -> Result<()> {
    let mut entries = store.list_entries().await;
    if entries.is_empty() {
        println!("No hubs linked yet. Run `sonatalink link` to add one.");
        return Ok(());
    }

    entries.sort_by_key(|e| e.created_at);
    for entry in entries {
        println!(
            "{}  {}  {}  linked {}",
            entry.id,
            entry.title,
            entry.host(),
            entry.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

async fn remove_entry(store: &EntryStore, id: &str) -> Result<()> {
    let id = EntryId::parse(id).map_err(|_| anyhow::anyhow!("Invalid entry id: {}", id))?;
    store.remove_entry(&id).await?;
    println!("Removed entry {}", id);
    Ok(())
}
