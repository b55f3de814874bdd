//! Layered override loading
//!
//! Builds an [`OverrideStore`] from every `Configuration*.json` file along the
//! entrypoint's directory chain plus the command line.
//!
//! # Layer order
//!
//! Later layers override earlier ones:
//!
//! 1. `Configuration.json` of each directory, outermost ancestor first
//! 2. `Configuration.local.json` and `Configuration.curves.json` of each
//!    directory, after every base file
//! 3. Command-line flags
//!
//! Inside one file the sections `properties`, `<build>`, `<debugger>` and
//! `<build>-<debugger>` are merged in that order.

use std::fmt;

use layerbind_fs::{ConfigFile, Entrypoint, NormalizedPath, io};
use serde_json::Value;

use crate::args::CommandLine;
use crate::store::OverrideStore;
use crate::{Error, Result};

/// Section merged from every file regardless of build or debugger state.
pub const PROPERTIES_SECTION: &str = "properties";

/// Build flavor selecting the `debug` or `release` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildKind {
    Debug,
    Release,
}

impl BuildKind {
    /// The flavor this crate was compiled with.
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for BuildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a debugger is attached, selecting `attached` or `detached`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebuggerState {
    Attached,
    Detached,
}

impl DebuggerState {
    /// Detect a tracer on the current process.
    ///
    /// Reads `TracerPid` from `/proc/self/status` on Linux; every other
    /// platform reports `Detached`.
    pub fn detect() -> Self {
        #[cfg(target_os = "linux")]
        {
            let traced = std::fs::read_to_string("/proc/self/status")
                .ok()
                .and_then(|status| {
                    status
                        .lines()
                        .find_map(|line| line.strip_prefix("TracerPid:"))
                        .and_then(|pid| pid.trim().parse::<u32>().ok())
                })
                .is_some_and(|pid| pid != 0);
            if traced {
                return Self::Attached;
            }
        }
        Self::Detached
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attached => "attached",
            Self::Detached => "detached",
        }
    }
}

impl fmt::Display for DebuggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sections merged from one file, in merge order.
pub fn section_names(build: BuildKind, debugger: DebuggerState) -> [String; 4] {
    [
        PROPERTIES_SECTION.to_string(),
        build.as_str().to_string(),
        debugger.as_str().to_string(),
        format!("{build}-{debugger}"),
    ]
}

/// Inputs of a load: where to look, what the command line was, and which
/// conditional sections apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub entrypoint: Entrypoint,
    pub args: Vec<String>,
    pub build: BuildKind,
    pub debugger: DebuggerState,
}

impl LoadOptions {
    /// Options for `entrypoint` with no arguments, the compiled build
    /// flavor, and the detected debugger state.
    pub fn new(entrypoint: Entrypoint) -> Self {
        Self {
            entrypoint,
            args: Vec::new(),
            build: BuildKind::current(),
            debugger: DebuggerState::detect(),
        }
    }

    /// Options describing the running process.
    pub fn from_env() -> Result<Self> {
        let entrypoint = Entrypoint::current()?;
        Ok(Self::new(entrypoint).with_args(std::env::args().skip(1)))
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_build(mut self, build: BuildKind) -> Self {
        self.build = build;
        self
    }

    pub fn with_debugger(mut self, debugger: DebuggerState) -> Self {
        self.debugger = debugger;
        self
    }
}

/// The result of a load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedOverrides {
    pub store: OverrideStore,
    pub command_line: CommandLine,
    /// Files that contributed, in merge order
    pub sources: Vec<NormalizedPath>,
}

/// Load every layer described by `options`.
pub fn load(options: &LoadOptions) -> Result<LoadedOverrides> {
    let chain = options.entrypoint.chain();
    let sections = section_names(options.build, options.debugger);
    let mut loaded = LoadedOverrides::default();

    for dir in &chain {
        load_file(&mut loaded, &dir.join(ConfigFile::Base.as_str()), &sections)?;
    }
    for dir in &chain {
        for overlay in ConfigFile::OVERLAYS {
            load_file(&mut loaded, &dir.join(overlay.as_str()), &sections)?;
        }
    }

    loaded.command_line = CommandLine::parse(options.args.iter().cloned());
    loaded.command_line.apply_to(&mut loaded.store);

    tracing::debug!(
        keys = loaded.store.len(),
        files = loaded.sources.len(),
        performance = loaded.command_line.is_performance_test(),
        "Loaded configuration overrides"
    );
    Ok(loaded)
}

fn load_file(loaded: &mut LoadedOverrides, path: &NormalizedPath, sections: &[String]) -> Result<()> {
    let Some(document) = io::read_json(path)? else {
        tracing::trace!(%path, "No configuration file, skipping");
        return Ok(());
    };
    tracing::debug!(%path, "Loading configuration file");

    let Value::Object(root) = &document else {
        return Err(Error::UnsupportedValue {
            path: path.to_native(),
            key: "<root>".to_string(),
        });
    };

    let native = path.to_native();
    for name in sections {
        if let Some(section) = root.get(name) {
            loaded.store.merge_section(&native, name, section)?;
        }
    }
    loaded.sources.push(path.clone());
    Ok(())
}
