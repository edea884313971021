// src/main.rs
mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::*;
use hookmsg::config::{Config, ResolvedConfig};
use hookmsg::git::find_project_root;

// =============================================================================
// MAIN
// =============================================================================
fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = std::env::var("HOOKMSG_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let file_config = Config::load();

    match &cli.command {
        Commands::Init => return cmd_init(&cli, &file_config),
        Commands::Config => return cmd_config(),
        _ => {}
    }

    let cwd = std::env::current_dir()?;
    let root = find_project_root(cli.root.as_deref(), &cwd);
    tracing::debug!(root = ?root, "project root");

    let config = ResolvedConfig::new(
        cli.timeout,
        cli.inherit_env,
        cli.scratch_dir.as_ref(),
        &file_config,
    );

    match cli.command {
        Commands::Resolve { message, message_file, write_to, json } => {
            cmd_resolve(root.as_deref(), &config, message, message_file, write_to, json)?
        }
        Commands::Check => cmd_check(root.as_deref())?,
        Commands::Init | Commands::Config => unreachable!(),
    }

    Ok(())
}
