// src/commands/config.rs
use anyhow::{bail, Result};

use crate::cli::Cli;
use hookmsg::config::{Config, ENV_SCRATCH_DIR, ENV_TIMEOUT};

pub fn cmd_init(cli: &Cli, file: &Config) -> Result<()> {
    let mut config = file.clone();

    if cli.timeout.is_none() && !cli.inherit_env && cli.scratch_dir.is_none() {
        bail!("Nothing to save. Pass --timeout, --inherit-env or --scratch-dir.");
    }

    if cli.timeout.is_some() {
        config.timeout_secs = cli.timeout;
    }
    if cli.inherit_env {
        config.inherit_env = Some(true);
    }
    if cli.scratch_dir.is_some() {
        config.scratch_dir = cli.scratch_dir.clone();
    }

    config.save()
}

pub fn cmd_config() -> Result<()> {
    let config = Config::load();
    let path = Config::path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(unknown)".into());

    println!("Config file: {}\n", path);
    println!(
        "timeout_secs: {}",
        config
            .timeout_secs
            .filter(|&s| s > 0)
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("(none, env: {})", ENV_TIMEOUT))
    );
    println!(
        "inherit_env:  {}",
        config
            .inherit_env
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(default: false)".into())
    );
    println!(
        "scratch_dir:  {}",
        config
            .scratch_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("(system temp dir, env: {})", ENV_SCRATCH_DIR))
    );

    println!("\nPriority: CLI args > config file > env var > defaults");
    Ok(())
}
