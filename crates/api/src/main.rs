//! Lapse - personal time tracker
//!
//! Main entry point for the `lapse` command.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use lapse_domain::Config;
use lapse_infra::{config, observability};
use lapse_lib::cli::{self, output, Cli, Command};
use lapse_lib::{runtime, AppContext, ProcessRole};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before the config reads LAPSE_* overrides
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli, dotenv.is_ok()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, dotenv_loaded: bool) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    observability::init_tracing(&config.logging).context("failed to initialize logging")?;
    tracing::debug!(dotenv_loaded, data_dir = %config.storage.data_dir, "configuration loaded");

    let mut ctx = if cli.ephemeral {
        AppContext::ephemeral(config)?
    } else {
        AppContext::new(config)?
    };
    let role = if matches!(cli.command, Command::Watch) {
        ProcessRole::Watcher
    } else {
        ProcessRole::Command
    };
    let report = ctx.startup(role);
    if !matches!(cli.command, Command::Away(_)) {
        if let Some(notice) = output::startup_notice(&report, &ctx.sessions) {
            eprintln!("{notice}");
        }
    }

    let result = match cli.command {
        Command::Watch => runtime::watch(&mut ctx, &mut std::io::stdout()).await,
        command => cli::dispatch(&mut ctx, command, &mut std::io::stdout()),
    };

    ctx.shutdown().await.context("failed to save state")?;
    result
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = config::load_from_file(Some(path.clone()))?;
            config::apply_env_overrides(&mut config)?;
            config
        }
        None => config::load()?,
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir.clone_from(dir);
    }
    config.validate()?;
    Ok(config)
}
