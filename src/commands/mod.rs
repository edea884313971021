// src/commands/mod.rs
mod check;
mod config;
mod resolve;

pub use check::cmd_check;
pub use config::{cmd_config, cmd_init};
pub use resolve::cmd_resolve;

use hookmsg::config::ResolvedConfig;
use hookmsg::{HookMessageResolver, Reporter};

/// Shared helper: apply resolved options to a resolver
pub(crate) fn build_resolver<R: Reporter>(reporter: R, config: &ResolvedConfig) -> HookMessageResolver<R> {
    let resolver = HookMessageResolver::new(reporter)
        .with_timeout(config.timeout)
        .with_inherited_env(config.inherit_env);
    match &config.scratch_dir {
        Some(dir) => resolver.with_scratch_dir(dir),
        None => resolver,
    }
}
