//! Filesystem layer for layerbind
//!
//! Provides normalized paths, configuration file names, JSON reading, and
//! the entrypoint locator that supplies the directory chain walked by the
//! override loader.

pub mod constants;
pub mod error;
pub mod io;
pub mod locate;
pub mod path;

pub use constants::{ConfigFile, VcsMarker};
pub use error::{Error, Result};
pub use locate::{Entrypoint, directory_chain, find_repository_root};
pub use path::NormalizedPath;
