// src/resolver.rs
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::report::{Reporter, Severity, ERROR_TITLE};

// =============================================================================
// HOOK LOCATION
// =============================================================================
pub const HOOK_RELATIVE_PATH: &str = ".git/hooks/prepare-commit-msg";
pub const SCRATCH_PREFIX: &str = "prepare-commit-msg-";
pub const SCRATCH_SUFFIX: &str = ".tmp";

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const SPAWN_RETRIES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    Missing,
    NotExecutable,
    Ready,
}

pub fn hook_path(project_root: &Path) -> PathBuf {
    project_root.join(HOOK_RELATIVE_PATH)
}

pub fn hook_status(path: &Path) -> HookStatus {
    let meta = match fs::metadata(path) {
        Ok(m) if m.is_file() => m,
        _ => return HookStatus::Missing,
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 == 0 {
            return HookStatus::NotExecutable;
        }
    }
    #[cfg(not(unix))]
    let _ = meta;

    HookStatus::Ready
}

// =============================================================================
// RESOLUTION
// =============================================================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Leave the current message alone.
    NoMessage,
    /// The hook produced a new message.
    Replaced(String),
    /// The previous message already starts with the hook output.
    Unchanged(String),
}

impl Resolution {
    pub fn message(&self) -> Option<&str> {
        match self {
            Resolution::NoMessage => None,
            Resolution::Replaced(m) | Resolution::Unchanged(m) => Some(m),
        }
    }

    pub fn into_message(self) -> Option<String> {
        match self {
            Resolution::NoMessage => None,
            Resolution::Replaced(m) | Resolution::Unchanged(m) => Some(m),
        }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            Resolution::NoMessage => "no_message",
            Resolution::Replaced(_) => "replaced",
            Resolution::Unchanged(_) => "unchanged",
        }
    }
}

/// Combines hook output with the message already being edited.
///
/// `hook_output` is trimmed first; empty output means there is nothing to
/// offer. A previous message that already begins with the output wins.
pub fn merge_message(previous: Option<&str>, hook_output: &str) -> Resolution {
    let new = hook_output.trim();
    if new.is_empty() {
        return Resolution::NoMessage;
    }
    match previous {
        Some(prev) if prev.starts_with(new) => Resolution::Unchanged(prev.to_string()),
        _ => Resolution::Replaced(new.to_string()),
    }
}

// =============================================================================
// RESOLVER
// =============================================================================
pub struct HookMessageResolver<R: Reporter> {
    reporter: R,
    timeout: Option<Duration>,
    inherit_env: bool,
    scratch_dir: Option<PathBuf>,
}

impl<R: Reporter> HookMessageResolver<R> {
    pub fn new(reporter: R) -> Self {
        Self {
            reporter,
            timeout: None,
            inherit_env: false,
            scratch_dir: None,
        }
    }

    /// Kill the hook once it has run this long. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pass this process's environment through to the hook.
    pub fn with_inherited_env(mut self, inherit: bool) -> Self {
        self.inherit_env = inherit;
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Runs the project's `prepare-commit-msg` hook and decides which message
    /// to offer. Failures are sent to the reporter, never returned.
    pub fn resolve(&self, project_root: Option<&Path>, previous: Option<&str>) -> Resolution {
        match self.try_resolve(project_root, previous) {
            Ok(resolution) => resolution,
            Err(err) => {
                debug!(class = ?err.class(), "hook resolution failed");
                self.report(&err);
                Resolution::NoMessage
            }
        }
    }

    pub fn resolve_message(
        &self,
        project_root: Option<&Path>,
        previous: Option<&str>,
    ) -> Option<String> {
        self.resolve(project_root, previous).into_message()
    }

    fn try_resolve(
        &self,
        project_root: Option<&Path>,
        previous: Option<&str>,
    ) -> Result<Resolution, ResolveError> {
        let root = project_root
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ResolveError::MissingProjectRoot)?;

        let hook = hook_path(root);
        match hook_status(&hook) {
            HookStatus::Ready => {}
            status => {
                debug!(hook = %hook.display(), ?status, "no usable hook");
                return Ok(Resolution::NoMessage);
            }
        }

        let scratch = self.create_scratch().map_err(ResolveError::CreateScratch)?;
        let result = self.run_and_merge(root, &hook, &scratch, previous);

        let scratch_display = scratch.display().to_string();
        if let Err(e) = scratch.close() {
            warn!(scratch = %scratch_display, "failed to delete scratch file: {}", e);
        }

        result
    }

    fn create_scratch(&self) -> std::io::Result<TempPath> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX).suffix(SCRATCH_SUFFIX);
        let file = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        Ok(file.into_temp_path())
    }

    fn run_and_merge(
        &self,
        root: &Path,
        hook: &Path,
        scratch: &Path,
        previous: Option<&str>,
    ) -> Result<Resolution, ResolveError> {
        let (status, stderr) = self.run_hook(root, hook, scratch)?;

        // A failing hook may still have written a usable message.
        if !status.success() {
            self.report(&ResolveError::HookFailed { status, stderr });
        }

        let bytes = fs::read(scratch).map_err(ResolveError::ReadOutput)?;
        Ok(merge_message(previous, &String::from_utf8_lossy(&bytes)))
    }

    fn run_hook(
        &self,
        root: &Path,
        hook: &Path,
        scratch: &Path,
    ) -> Result<(ExitStatus, String), ResolveError> {
        let mut cmd = Command::new(hook);
        cmd.arg(scratch)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        if !self.inherit_env {
            cmd.env_clear();
        }

        debug!(hook = %hook.display(), scratch = %scratch.display(), "running hook");
        let mut child = spawn_with_retry(&mut cmd).map_err(ResolveError::Spawn)?;

        let deadline = self.timeout.map(|t| Instant::now() + t);
        let stderr = child.stderr.take();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                // Read to EOF whatever the bytes are; stopping early would
                // SIGPIPE the hook on its next write.
                let _ = stderr.read_to_end(&mut buf);
            }
            let _ = tx.send(buf);
        });

        let status = self.wait(&mut child, deadline)?;

        // Background processes started by the hook may hold stderr open past
        // its exit. Past the deadline the drain is detached.
        let received = match deadline {
            Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())).ok(),
            None => rx.recv().ok(),
        };
        if received.is_none() {
            debug!("hook stderr still open after exit, not waiting for it");
        }
        let stderr_text = stderr_lines(&received.unwrap_or_default());

        debug!(%status, "hook finished");
        Ok((status, stderr_text))
    }

    fn wait(&self, child: &mut Child, deadline: Option<Instant>) -> Result<ExitStatus, ResolveError> {
        let Some(deadline) = deadline else {
            return child.wait().map_err(|e| {
                reap(child);
                ResolveError::Wait(e)
            });
        };

        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => {
                    reap(child);
                    return Err(ResolveError::Wait(e));
                }
            }
            if Instant::now() >= deadline {
                reap(child);
                return Err(ResolveError::TimedOut {
                    after: self.timeout.unwrap_or_default(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn report(&self, err: &ResolveError) {
        self.reporter
            .report(Severity::Error, ERROR_TITLE, &err.to_string());
    }
}

/// Kill the hook and collect its exit status so no zombie is left behind.
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Captured stderr as lines, each terminated by `\n`. Invalid UTF-8 is
/// replaced and CRLF endings are normalized.
fn stderr_lines(bytes: &[u8]) -> String {
    let mut text = String::new();
    for line in String::from_utf8_lossy(bytes).lines() {
        text.push_str(line);
        text.push('\n');
    }
    text
}

/// ETXTBSY: a freshly written hook can still be held open by a sibling
/// thread's fork that has not reached exec yet.
fn spawn_with_retry(cmd: &mut Command) -> std::io::Result<Child> {
    let mut attempt = 0;
    loop {
        match cmd.spawn() {
            Err(e) if e.raw_os_error() == Some(26) && attempt < SPAWN_RETRIES && cfg!(unix) => {
                attempt += 1;
                thread::sleep(POLL_INTERVAL * attempt);
            }
            other => return other,
        }
    }
}

// =============================================================================
// MODULE TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MemoryReporter;

    #[test]
    fn merge_empty_output_is_no_message() {
        assert_eq!(merge_message(None, ""), Resolution::NoMessage);
        assert_eq!(merge_message(Some("draft"), "  \n\t "), Resolution::NoMessage);
    }

    #[test]
    fn merge_without_previous_replaces() {
        assert_eq!(
            merge_message(None, "Fix bug\n"),
            Resolution::Replaced("Fix bug".into())
        );
    }

    #[test]
    fn merge_keeps_previous_on_prefix() {
        assert_eq!(
            merge_message(Some("Fix bug: extra context"), "Fix bug"),
            Resolution::Unchanged("Fix bug: extra context".into())
        );
    }

    #[test]
    fn merge_replaces_unrelated_previous() {
        assert_eq!(
            merge_message(Some("Unrelated text"), "Fix bug"),
            Resolution::Replaced("Fix bug".into())
        );
    }

    #[test]
    fn merge_trims_output_before_prefix_check() {
        assert_eq!(
            merge_message(Some("Fix bug and more"), "\n  Fix bug  \n"),
            Resolution::Unchanged("Fix bug and more".into())
        );
    }

    #[test]
    fn merge_returns_previous_verbatim() {
        let previous = "Fix bug   \n\nbody with trailing space ";
        assert_eq!(
            merge_message(Some(previous), "Fix bug"),
            Resolution::Unchanged(previous.to_string())
        );
    }

    #[test]
    fn merge_empty_previous_is_replaced() {
        assert_eq!(
            merge_message(Some(""), "Fix bug"),
            Resolution::Replaced("Fix bug".into())
        );
    }

    #[test]
    fn merge_prefix_is_case_sensitive() {
        assert_eq!(
            merge_message(Some("fix bug later"), "Fix bug"),
            Resolution::Replaced("Fix bug".into())
        );
    }

    #[test]
    fn resolution_accessors() {
        let replaced = Resolution::Replaced("a".into());
        let unchanged = Resolution::Unchanged("b".into());
        assert_eq!(replaced.message(), Some("a"));
        assert_eq!(unchanged.message(), Some("b"));
        assert_eq!(Resolution::NoMessage.message(), None);
        assert_eq!(replaced.outcome(), "replaced");
        assert_eq!(unchanged.outcome(), "unchanged");
        assert_eq!(Resolution::NoMessage.outcome(), "no_message");
        assert_eq!(unchanged.into_message(), Some("b".into()));
    }

    #[test]
    fn hook_path_appends_fixed_location() {
        let path = hook_path(Path::new("/work/project"));
        assert_eq!(path, Path::new("/work/project/.git/hooks/prepare-commit-msg"));
    }

    #[test]
    fn hook_status_missing_for_absent_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(hook_status(&hook_path(dir.path())), HookStatus::Missing);
    }

    #[test]
    fn hook_status_missing_for_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = hook_path(dir.path());
        fs::create_dir_all(&path).unwrap();
        assert_eq!(hook_status(&path), HookStatus::Missing);
    }

    #[cfg(unix)]
    #[test]
    fn hook_status_checks_execute_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hook");
        fs::write(&path, "#!/bin/sh\n").unwrap();

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(hook_status(&path), HookStatus::NotExecutable);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o744)).unwrap();
        assert_eq!(hook_status(&path), HookStatus::Ready);
    }

    #[test]
    fn resolver_defaults() {
        let resolver = HookMessageResolver::new(MemoryReporter::new());
        assert!(resolver.timeout.is_none());
        assert!(!resolver.inherit_env);
        assert!(resolver.scratch_dir.is_none());
    }

    #[test]
    fn resolver_builder_sets_options() {
        let resolver = HookMessageResolver::new(MemoryReporter::new())
            .with_timeout(Some(Duration::from_secs(3)))
            .with_inherited_env(true)
            .with_scratch_dir("/tmp/scratch");
        assert_eq!(resolver.timeout, Some(Duration::from_secs(3)));
        assert!(resolver.inherit_env);
        assert_eq!(resolver.scratch_dir, Some(PathBuf::from("/tmp/scratch")));
    }

    #[test]
    fn scratch_file_uses_recognizable_name() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = HookMessageResolver::new(MemoryReporter::new()).with_scratch_dir(dir.path());
        let scratch = resolver.create_scratch().unwrap();
        let name = scratch.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(SCRATCH_PREFIX));
        assert!(name.ends_with(SCRATCH_SUFFIX));
        assert!(scratch.exists());

        let path = scratch.to_path_buf();
        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn stderr_lines_terminates_each_line() {
        assert_eq!(stderr_lines(b"one\ntwo"), "one\ntwo\n");
        assert_eq!(stderr_lines(b""), "");
    }

    #[test]
    fn stderr_lines_normalizes_crlf() {
        assert_eq!(stderr_lines(b"one\r\ntwo\r\n"), "one\ntwo\n");
    }

    #[test]
    fn stderr_lines_replaces_invalid_utf8() {
        assert_eq!(stderr_lines(b"bad \xff byte\nnext\n"), "bad \u{FFFD} byte\nnext\n");
    }

    #[cfg(unix)]
    #[test]
    fn reap_kills_and_collects_child() {
        use std::os::unix::process::ExitStatusExt;

        let mut child = Command::new("/bin/sh")
            .args(["-c", "while :; do :; done"])
            .spawn()
            .unwrap();
        reap(&mut child);
        let status = child.try_wait().unwrap().expect("child was reaped");
        assert_eq!(status.signal(), Some(9));
    }

    #[test]
    fn empty_root_is_treated_as_missing() {
        let resolver = HookMessageResolver::new(MemoryReporter::new());
        assert_eq!(resolver.resolve(Some(Path::new("")), None), Resolution::NoMessage);
        assert_eq!(resolver.reporter().len(), 1);
    }
}
