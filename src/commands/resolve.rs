// src/commands/resolve.rs
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use hookmsg::config::ResolvedConfig;
use hookmsg::{MemoryReporter, Notification, Resolution, StderrReporter};

use super::build_resolver;

#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    outcome: &'static str,
    message: Option<&'a str>,
    notifications: Vec<Notification>,
}

pub fn cmd_resolve(
    root: Option<&Path>,
    config: &ResolvedConfig,
    message: Option<String>,
    message_file: Option<PathBuf>,
    write_to: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let previous = match message_file {
        Some(path) => Some(
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read message file {}", path.display()))?,
        ),
        None => message,
    };

    if json {
        let reporter = MemoryReporter::new();
        let resolution = build_resolver(&reporter, config).resolve(root, previous.as_deref());
        write_message(&resolution, write_to.as_deref())?;
        println!("{}", render_json(&resolution, reporter.take())?);
        return Ok(());
    }

    let resolution = build_resolver(StderrReporter, config).resolve(root, previous.as_deref());
    match (resolution.message(), &write_to) {
        (Some(_), Some(_)) => write_message(&resolution, write_to.as_deref())?,
        (Some(msg), None) => println!("{}", msg),
        (None, _) => {}
    }
    Ok(())
}

// Hook mode: the caller reads the file back, so leave it alone when there is
// nothing to offer.
fn write_message(resolution: &Resolution, write_to: Option<&Path>) -> Result<()> {
    if let (Some(msg), Some(path)) = (resolution.message(), write_to) {
        fs::write(path, format!("{}\n", msg))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

fn render_json(resolution: &Resolution, notifications: Vec<Notification>) -> Result<String> {
    let output = ResolveOutput {
        outcome: resolution.outcome(),
        message: resolution.message(),
        notifications,
    };
    serde_json::to_string_pretty(&output).context("Failed to serialize result")
}
