// src/commands/check.rs
use anyhow::{Context, Result};
use std::path::Path;

use hookmsg::{hook_path, hook_status, HookStatus};

pub fn cmd_check(root: Option<&Path>) -> Result<()> {
    let root = root.context("Cannot determine project base path. Pass --root or run inside a git repo.")?;
    let path = hook_path(root);
    let status = hook_status(&path);

    println!("Hook:   {}", path.display());
    println!("Status: {}", describe(status));
    if status == HookStatus::NotExecutable {
        println!("\nThe hook will be skipped. Make it executable with:");
        println!("  chmod +x {}", path.display());
    }
    Ok(())
}

fn describe(status: HookStatus) -> &'static str {
    match status {
        HookStatus::Ready => "ready",
        HookStatus::Missing => "missing (nothing will run)",
        HookStatus::NotExecutable => "not executable",
    }
}
