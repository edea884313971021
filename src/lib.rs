// src/lib.rs
//! Runs a project's `.git/hooks/prepare-commit-msg` against a scratch file
//! and decides which commit message to offer the user.
//!
//! ```no_run
//! use hookmsg::{HookMessageResolver, StderrReporter};
//! use std::path::Path;
//!
//! let resolver = HookMessageResolver::new(StderrReporter);
//! if let Some(message) = resolver.resolve_message(Some(Path::new(".")), None) {
//!     println!("{}", message);
//! }
//! ```

pub mod config;
pub mod error;
pub mod git;
pub mod report;
pub mod resolver;


pub use error::{ErrorClass, ResolveError};
pub use report::{MemoryReporter, Notification, Reporter, Severity, StderrReporter};
pub use resolver::{hook_path, hook_status, merge_message, HookMessageResolver, HookStatus, Resolution};
