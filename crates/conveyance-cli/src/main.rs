// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `conveyance`: run the demo conveyor line and manage the stored transport config.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use conveyance_config_fs::FsConfigStore;
use conveyance_core::{ConfigService, ConfigStore, TransportConfig, TRANSPORT_CONFIG_KEY};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod demo;

#[derive(Parser, Debug)]
#[command(author, version, about = "Guided-surface transport demo and config tool")]
struct Args {
    /// Directory holding `transport.json` (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Step bodies along the demo line and print a summary
    Run {
        /// Bodies placed on the infeed belt
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..=1_000_000))]
        bodies: u64,
        /// Fixed ticks to run
        #[arg(long, default_value_t = 500)]
        ticks: u64,
        /// Seconds per tick
        #[arg(long, default_value_t = 0.02)]
        dt: f32,
        /// Drive speed in drive units per second
        #[arg(long, default_value_t = 500.0)]
        speed: f64,
        /// Step on the calling thread instead of the rayon pool
        #[arg(long)]
        sequential: bool,
    },
    /// Inspect or create the stored transport config
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective config as JSON
    Show,
    /// Write the default config
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn open_store(dir: Option<&PathBuf>) -> Result<FsConfigStore> {
    let store = match dir {
        Some(dir) => FsConfigStore::in_dir(dir),
        None => FsConfigStore::new(),
    };
    store.context("open config store")
}

fn init_tracing(debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();
    Ok(())
}

fn run(config: &TransportConfig, options: demo::RunOptions) -> Result<()> {
    let summary = demo::run(config, options)?;
    let (totals, surfaces) = demo::render(&summary);
    let mut out = io::stdout().lock();
    writeln!(out, "{totals}")?;
    writeln!(out, "{surfaces}")?;
    Ok(())
}

fn config_show(store: FsConfigStore) -> Result<()> {
    let path = store.path_for(TRANSPORT_CONFIG_KEY)?;
    let stored = path.exists();
    let config = ConfigService::new(store)
        .load_transport()
        .with_context(|| format!("load {}", path.display()))?;
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "# {} ({})",
        path.display(),
        if stored { "stored" } else { "defaults" }
    )?;
    writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
    Ok(())
}

fn config_init(store: FsConfigStore, force: bool) -> Result<()> {
    let path = store.path_for(TRANSPORT_CONFIG_KEY)?;
    if !force && store.load_raw(TRANSPORT_CONFIG_KEY).is_ok() {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    ConfigService::new(store).save_transport(&TransportConfig::default())?;
    info!(path = %path.display(), "wrote default transport config");
    writeln!(io::stdout().lock(), "wrote {}", path.display())?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let store = open_store(args.config.as_ref())?;

    match args.cmd {
        Command::Run {
            bodies,
            ticks,
            dt,
            speed,
            sequential,
        } => {
            let config = ConfigService::new(store)
                .load_transport()
                .context("load transport config")?;
            init_tracing(config.debug)?;
            let bodies = usize::try_from(bodies).context("--bodies out of range")?;
            run(
                &config,
                demo::RunOptions {
                    bodies,
                    ticks,
                    dt,
                    speed,
                    sequential,
                },
            )
        }
        Command::Config { action } => {
            init_tracing(false)?;
            match action {
                ConfigAction::Show => config_show(store),
                ConfigAction::Init { force } => config_init(store, force),
            }
        }
    }
}
