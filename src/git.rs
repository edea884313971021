// src/git.rs
use std::path::{Path, PathBuf};
use std::process::Command;

// =============================================================================
// GIT UTILITIES
// =============================================================================
pub fn run_git_in(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).to_string())
}

pub fn is_git_repo(dir: &Path) -> bool {
    run_git_in(dir, &["rev-parse", "--git-dir"]).is_some()
}

/// Top level of the working tree containing `dir`, if any.
pub fn get_toplevel(dir: &Path) -> Option<PathBuf> {
    let out = run_git_in(dir, &["rev-parse", "--show-toplevel"])?;
    let path = out.trim();
    if path.is_empty() {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Project root for a run: the explicit `--root` if given, otherwise the
/// enclosing work tree of `cwd`.
pub fn find_project_root(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => get_toplevel(cwd),
    }
}
