// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// CONFIG FILE
// =============================================================================
pub const CONFIG_FILENAME: &str = ".hookmsg.toml";
pub const ENV_TIMEOUT: &str = "HOOKMSG_TIMEOUT";
pub const ENV_SCRATCH_DIR: &str = "HOOKMSG_SCRATCH_DIR";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Seconds before a running hook is killed. 0 or unset waits forever.
    pub timeout_secs: Option<u64>,
    pub inherit_env: Option<bool>,
    pub scratch_dir: Option<PathBuf>,
}

impl Config {
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_FILENAME))
    }

    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path().context("Could not determine home directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content).context("Failed to write config file")?;
        println!("Config saved to: {}", path.display());
        Ok(())
    }
}

// =============================================================================
// RESOLVED CONFIG
// =============================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub timeout: Option<Duration>,
    pub inherit_env: bool,
    pub scratch_dir: Option<PathBuf>,
}

impl ResolvedConfig {
    pub fn new(
        cli_timeout: Option<u64>,
        cli_inherit_env: bool,
        cli_scratch_dir: Option<&PathBuf>,
        file: &Config,
    ) -> Self {
        Self::with_env(cli_timeout, cli_inherit_env, cli_scratch_dir, file, |var| {
            std::env::var(var).ok()
        })
    }

    pub fn with_env(
        cli_timeout: Option<u64>,
        cli_inherit_env: bool,
        cli_scratch_dir: Option<&PathBuf>,
        file: &Config,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        // Timeout: CLI > config > env var > none
        let timeout_secs = cli_timeout
            .or(file.timeout_secs)
            .or_else(|| env(ENV_TIMEOUT).and_then(|v| v.trim().parse().ok()));
        let timeout = timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);

        // Inherit env: CLI flag > config > off
        let inherit_env = cli_inherit_env || file.inherit_env.unwrap_or(false);

        // Scratch dir: CLI > config > env var > system temp dir
        let scratch_dir = cli_scratch_dir
            .cloned()
            .or_else(|| file.scratch_dir.clone())
            .or_else(|| {
                env(ENV_SCRATCH_DIR)
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            });

        Self {
            timeout,
            inherit_env,
            scratch_dir,
        }
    }
}
