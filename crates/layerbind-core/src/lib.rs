//! Layered configuration resolution and field binding
//!
//! This crate merges overrides from `Configuration*.json` files found along
//! the entrypoint's directory chain and from the command line, then binds the
//! merged values onto `static` [`Setting`]s declared by components.
//!
//! ```ignore
//! use std::sync::Arc;
//! use layerbind_core::{ComponentManifest, FieldSpec, LoadOptions, Setting, install};
//!
//! static RETRIES: Setting<u32> = Setting::new(FieldSpec::new("app.Client", "Retries"), 3);
//!
//! let manager = install(LoadOptions::from_env()?)?;
//! manager.initialize(Arc::new(ComponentManifest::new("app").field(&RETRIES)))?;
//! let retries = RETRIES.get();
//! ```

pub mod args;
pub mod behavior;
pub mod binder;
pub mod coerce;
pub mod component;
pub mod curve;
pub mod environment;
pub mod error;
pub mod field;
pub mod loader;
pub mod manager;
pub mod resolved;
pub mod snapshot;
pub mod store;
pub mod value;

pub use args::{CommandLine, PERFORMANCE_FLAG};
pub use behavior::{ErrorBehavior, ErrorBehaviorMap, ErrorCategory, ErrorSwitches};
pub use binder::{Resolution, bind_component, resolve_field};
pub use component::{Component, ComponentManifest, ScanError};
pub use curve::{Curve, CurveError, CurvePoint};
pub use environment::machine_name;
pub use error::{Error, Result};
pub use field::{
    Configurable, ConfigurableScalar, FieldDescriptor, FieldSpec, FieldValue, ScalarKind, Setting, Shape,
};
pub use loader::{BuildKind, DebuggerState, LoadOptions, LoadedOverrides};
pub use manager::{ConfigManager, SubscriptionId, global, install};
pub use resolved::{Resolved, ResolvedValues};
pub use snapshot::ConfigSnapshot;
pub use store::OverrideStore;
pub use value::{RawValue, Scalar};
