//! Command-line tooling for the spawner protocol
//!
//! Offline helpers: derive resource identifiers, produce and check wager
//! commitments, and inspect the effective client configuration.

use anyhow::Result;
use clap::{Parser, Subcommand};
use spawner_core::SpawnerConfig;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "spawner")]
#[command(about = "Spawner - fee-metered resource creation tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".spawner/config.toml")]
    config: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the identifier of a resource owned by a governance structure
    DeriveId {
        /// Type tag, e.g. "account" or "credential"
        #[arg(short, long)]
        tag: String,

        /// Owner base id, hex
        #[arg(short, long)]
        owner: String,
    },

    /// Produce a wager commitment
    Commit {
        /// Raw choice; reduced modulo 3
        #[arg(long)]
        choice: u8,

        /// 31-byte padding, hex; random when omitted
        #[arg(long)]
        padding: Option<String>,
    },

    /// Check that a choice and padding open a commitment
    Verify {
        /// Raw choice
        #[arg(long)]
        choice: u8,

        /// Padding, hex
        #[arg(long)]
        padding: String,

        /// Commitment, hex
        #[arg(long)]
        hash: String,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SpawnerConfig::load(Some(&cli.config))?;
    let log_filter = if cli.verbose {
        "debug"
    } else {
        config.log_filter.as_str()
    };
    tracing_subscriber::fmt().with_env_filter(log_filter).init();
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    let output = match cli.command {
        Commands::DeriveId { tag, owner } => commands::derive_id(&tag, &owner)?,
        Commands::Commit { choice, padding } => commands::commit(choice, padding.as_deref())?,
        Commands::Verify {
            choice,
            padding,
            hash,
        } => commands::verify(choice, &padding, &hash)?,
        Commands::Config => commands::show_config(&config),
    };
    println!("{}", output.render(cli.json)?);
    Ok(())
}
