// src/error.rs
use std::io;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Broad category of a failed resolution, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Configuration,
    Io,
    Process,
    Unexpected,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Cannot determine project base path")]
    MissingProjectRoot,

    #[error("Failed to create scratch file: {0}")]
    CreateScratch(#[source] io::Error),

    #[error("Failed to read hook output: {0}")]
    ReadOutput(#[source] io::Error),

    #[error("{}", failure_body(.status, .stderr))]
    HookFailed { status: ExitStatus, stderr: String },

    #[error("hook timed out after {}ms", .after.as_millis())]
    TimedOut { after: Duration },

    #[error("Failed to run hook: {0}")]
    Spawn(#[source] io::Error),

    #[error("Failed to wait for hook: {0}")]
    Wait(#[source] io::Error),
}

impl ResolveError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ResolveError::MissingProjectRoot => ErrorClass::Configuration,
            ResolveError::CreateScratch(_) | ResolveError::ReadOutput(_) => ErrorClass::Io,
            ResolveError::HookFailed { .. } | ResolveError::TimedOut { .. } => ErrorClass::Process,
            ResolveError::Spawn(_) | ResolveError::Wait(_) => ErrorClass::Unexpected,
        }
    }
}

fn failure_body(status: &ExitStatus, stderr: &str) -> String {
    if stderr.trim().is_empty() {
        format!("hook exited with {}", status)
    } else {
        stderr.to_string()
    }
}
