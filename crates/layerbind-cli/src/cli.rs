//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use layerbind_core::{BuildKind, DebuggerState};

/// layerbind - Inspect layered configuration resolution
#[derive(Parser, Debug)]
#[command(name = "layerbind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List the merged override store
    Overrides {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        target: Target,
    },

    /// Resolve one field the way the binder would
    ///
    /// Examples:
    ///   layerbind resolve app.Client.Retries --shape u32
    ///   layerbind resolve app.Client.Hosts --shape 'list<text>' -- --hosts a,b
    Resolve {
        /// Full dotted key of the field (owner.Field)
        key: String,

        /// Declared shape: bool, i8..i64, u8..u64, float, text, curve,
        /// list<kind>, array<kind>, enum:A|B
        #[arg(short, long, default_value = "text")]
        shape: String,

        /// Command-line alias of the field
        #[arg(short, long)]
        alias: Option<String>,

        /// Literal used in performance-test mode
        #[arg(long)]
        performance_value: Option<String>,

        #[command(flatten)]
        target: Target,
    },

    /// Bind fields and print the configuration snapshot as JSON
    ///
    /// The engine's own settings are always included.
    Snapshot {
        /// Field to bind, as KEY or KEY=SHAPE (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,

        #[command(flatten)]
        target: Target,
    },

    /// Show the error behavior of every category
    Errors {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        target: Target,
    },

    /// Show the entrypoint, repository root and configuration sources
    Paths {
        #[command(flatten)]
        target: Target,
    },
}

/// Where and how to load configuration.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Entrypoint directory (defaults to the current directory)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Build section to select (defaults to this binary's build)
    #[arg(long, value_enum)]
    pub build: Option<BuildArg>,

    /// Debugger section to select (defaults to detection)
    #[arg(long, value_enum)]
    pub debugger: Option<DebuggerArg>,

    /// Arguments given to the configured program, after `--`
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildArg {
    Debug,
    Release,
}

impl From<BuildArg> for BuildKind {
    fn from(arg: BuildArg) -> Self {
        match arg {
            BuildArg::Debug => Self::Debug,
            BuildArg::Release => Self::Release,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebuggerArg {
    Attached,
    Detached,
}

impl From<DebuggerArg> for DebuggerState {
    fn from(arg: DebuggerArg) -> Self {
        match arg {
            DebuggerArg::Attached => Self::Attached,
            DebuggerArg::Detached => Self::Detached,
        }
    }
}
