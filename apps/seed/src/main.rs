//! `club-seed [CONFIG] [--keep]`
//!
//! Connects with the server configuration, applies the migrations and
//! replaces the members with the demo members.

use anyhow::Context;
use clap::Parser;
use club::domain::config::ApiConfig;
use club::event_bus::EventBus;
use club::features::members::{MemberRepository, seed};
use club::kernel::config::{DEFAULT_CONFIG_PATH, load_config};
use club_server::{connect, init_logging};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about = "Populate the tennis club with demo members")]
struct Args {
    /// Server configuration file
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Keep existing members and only add missing demo members
    #[arg(long)]
    keep: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cfg: ApiConfig = load_config(Some(&args.config)).context("Critical: Configuration is malformed")?;
    let _log = init_logging(env!("CARGO_PKG_NAME"), &cfg.logging)?;

    let db = connect(&cfg.database).await?;
    let repository = MemberRepository::new(db, EventBus::new());

    let report = seed::seed(&repository, args.keep).await?;
    info!(
        removed = report.removed,
        created = report.created.len(),
        total = report.total,
        "Seeding complete"
    );
    Ok(())
}
