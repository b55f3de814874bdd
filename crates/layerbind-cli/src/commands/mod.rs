//! Command implementations for layerbind-cli

pub mod errors;
pub mod overrides;
pub mod paths;
pub mod resolve;
pub mod snapshot;

pub use errors::run_errors;
pub use overrides::run_overrides;
pub use paths::run_paths;
pub use resolve::run_resolve;
pub use snapshot::run_snapshot;

use layerbind_core::{BuildKind, ConfigManager, DebuggerState, LoadOptions};
use layerbind_fs::Entrypoint;

use crate::cli::Target;
use crate::error::Result;

/// Load options described by the shared target arguments.
pub fn load_options(target: &Target) -> Result<LoadOptions> {
    let dir = match &target.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let options = LoadOptions::new(Entrypoint::from_dir(dir))
        .with_build(target.build.map(BuildKind::from).unwrap_or_else(BuildKind::current))
        .with_debugger(target.debugger.map(DebuggerState::from).unwrap_or_else(DebuggerState::detect))
        .with_args(target.args.iter().cloned());
    tracing::debug!(
        directory = %options.entrypoint.directory(),
        build = %options.build,
        debugger = %options.debugger,
        "Resolved load options"
    );
    Ok(options)
}

/// A manager for `target` with the core component bound.
pub fn load_manager(target: &Target) -> Result<ConfigManager> {
    let manager = ConfigManager::load(load_options(target)?)?;
    manager.initialize_core()?;
    Ok(manager)
}
