//! Configuration manager
//!
//! Owns the loaded overrides, the set of bound components and the published
//! [`Resolved`] state.
//!
//! # Locking
//!
//! One mutex serializes binding and reloading. Every pass builds a new
//! `Resolved` beside the current one and swaps it in under a read/write lock,
//! so readers see either the old state or the new one, never a mixture.
//! Reload subscribers run after the swap with no lock held.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use layerbind_fs::{Entrypoint, NormalizedPath};
use parking_lot::{Mutex, RwLock};

use crate::behavior::{
    CORE_COMPONENT, ErrorBehavior, ErrorCategory, ErrorSwitches, core_component, resolve_error_behaviors,
};
use crate::binder::bind_component;
use crate::component::Component;
use crate::loader::{self, LoadOptions, LoadedOverrides};
use crate::resolved::Resolved;
use crate::snapshot::ConfigSnapshot;
use crate::{Error, Result};

/// Handle returned by [`ConfigManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ReloadCallback = Arc<dyn Fn() + Send + Sync>;

struct BindState {
    overrides: Arc<LoadedOverrides>,
    /// Bound components in registration order
    registered: Vec<Arc<dyn Component>>,
    names: HashSet<String>,
}

impl BindState {
    fn register(&mut self, component: &Arc<dyn Component>) {
        if self.names.insert(component.name().to_string()) {
            self.registered.push(Arc::clone(component));
        }
    }
}

/// Resolves overrides and binds components.
pub struct ConfigManager {
    options: LoadOptions,
    core: Arc<dyn Component>,
    state: Mutex<BindState>,
    published: RwLock<Arc<Resolved>>,
    subscribers: Mutex<Vec<(SubscriptionId, ReloadCallback)>>,
    next_subscription: AtomicU64,
}

impl ConfigManager {
    /// Load overrides for `options`. No component is bound yet.
    pub fn load(options: LoadOptions) -> Result<Self> {
        let overrides = Arc::new(loader::load(&options)?);
        let resolved = Resolved {
            overrides: Arc::clone(&overrides),
            ..Resolved::default()
        };

        Ok(Self {
            options,
            core: Arc::new(core_component()),
            state: Mutex::new(BindState {
                overrides,
                registered: Vec::new(),
                names: HashSet::new(),
            }),
            published: RwLock::new(Arc::new(resolved)),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        })
    }

    /// Bind `component`, binding the core component first.
    ///
    /// Components already bound are skipped. The core binding is published
    /// even when `component` fails.
    pub fn initialize(&self, component: Arc<dyn Component>) -> Result<()> {
        self.initialize_with(component, false)
    }

    /// Bind `component` again even if it was bound before.
    pub fn reinitialize(&self, component: Arc<dyn Component>) -> Result<()> {
        self.initialize_with(component, true)
    }

    fn initialize_with(&self, component: Arc<dyn Component>, force: bool) -> Result<()> {
        let mut state = self.state.lock();
        let core = Arc::clone(&self.core);
        self.bind_one(&mut state, &core, false)?;
        self.bind_one(&mut state, &component, force)
    }

    /// Bind only the core component.
    pub fn initialize_core(&self) -> Result<()> {
        let mut state = self.state.lock();
        let core = Arc::clone(&self.core);
        self.bind_one(&mut state, &core, false)
    }

    fn bind_one(&self, state: &mut BindState, component: &Arc<dyn Component>, force: bool) -> Result<()> {
        let name = component.name();
        if !force && state.names.contains(name) {
            tracing::trace!(component = name, "Component already bound - skipping");
            return Ok(());
        }

        let current = self.current();
        let mut next = Resolved {
            overrides: Arc::clone(&state.overrides),
            values: current.values.clone(),
            snapshot: current.snapshot.clone(),
            error_behaviors: current.error_behaviors.clone(),
            generation: current.generation + 1,
        };
        bind_pass(component.as_ref(), &mut next)?;

        *self.published.write() = Arc::new(next);
        state.register(component);
        Ok(())
    }

    /// Reload overrides, rebind every bound component, publish, and notify
    /// subscribers.
    ///
    /// On failure nothing is published and subscribers are not called.
    pub fn refresh(&self) -> Result<()> {
        {
            let mut state = self.state.lock();
            let overrides = Arc::new(loader::load(&self.options)?);

            let current = self.current();
            let mut next = Resolved {
                overrides: Arc::clone(&overrides),
                values: current.values.clone(),
                snapshot: ConfigSnapshot::default(),
                error_behaviors: current.error_behaviors.clone(),
                generation: current.generation + 1,
            };
            for component in &state.registered {
                bind_pass(component.as_ref(), &mut next)?;
            }

            let generation = next.generation;
            *self.published.write() = Arc::new(next);
            state.overrides = overrides;
            tracing::info!(
                generation,
                components = state.registered.len(),
                "Configuration reloaded"
            );
        }

        let callbacks: Vec<ReloadCallback> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback();
        }
        Ok(())
    }

    /// Register a callback run after every successful [`refresh`](Self::refresh).
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// The published state.
    pub fn current(&self) -> Arc<Resolved> {
        Arc::clone(&self.published.read())
    }

    pub fn is_initialized(&self, component: &str) -> bool {
        self.state.lock().names.contains(component)
    }

    /// Names of bound components, in registration order.
    pub fn components(&self) -> Vec<String> {
        self.state
            .lock()
            .registered
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn error_behavior(&self, category: ErrorCategory) -> ErrorBehavior {
        self.current().error_behaviors.get(category)
    }

    pub fn is_performance_test(&self) -> bool {
        self.current().is_performance_test()
    }

    pub fn positional_args(&self) -> Vec<String> {
        self.current().positional_args().to_vec()
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn entrypoint(&self) -> &Entrypoint {
        &self.options.entrypoint
    }

    /// `relative` under the repository root.
    pub fn combine_repository_path(&self, relative: &str) -> Result<NormalizedPath> {
        Ok(self.entrypoint().combine_repository_path(relative)?)
    }

    /// `relative` under the repository root if it exists there, else under
    /// the entrypoint directory.
    pub fn combine_repository_or_entrypoint_path(&self, relative: &str) -> Result<NormalizedPath> {
        Ok(self.entrypoint().combine_repository_or_entrypoint_path(relative)?)
    }
}

impl std::fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManager")
            .field("options", &self.options)
            .field("generation", &self.current().generation)
            .finish_non_exhaustive()
    }
}

/// Bind one component into `next`, recomputing error behaviors for the core.
fn bind_pass(component: &dyn Component, next: &mut Resolved) -> Result<()> {
    let overrides = Arc::clone(&next.overrides);
    bind_component(
        component,
        &overrides.store,
        &overrides.command_line,
        &mut next.values,
        &mut next.snapshot,
    )?;

    if component.name() == CORE_COMPONENT {
        next.error_behaviors = resolve_error_behaviors(
            &overrides.store,
            ErrorSwitches::from_values(&next.values),
            overrides.command_line.is_performance_test(),
        )?;
    }
    Ok(())
}

static GLOBAL: OnceLock<ConfigManager> = OnceLock::new();

/// Load `options` and install the result as the process-wide manager read by
/// [`Setting::get`](crate::Setting::get). The core component is bound.
pub fn install(options: LoadOptions) -> Result<&'static ConfigManager> {
    if GLOBAL.get().is_some() {
        return Err(Error::AlreadyInstalled);
    }
    let manager = ConfigManager::load(options)?;
    manager.initialize_core()?;

    let mut installed = false;
    let global = GLOBAL.get_or_init(|| {
        installed = true;
        manager
    });
    if installed {
        Ok(global)
    } else {
        Err(Error::AlreadyInstalled)
    }
}

/// The process-wide manager, if one was installed.
pub fn global() -> Option<&'static ConfigManager> {
    GLOBAL.get()
}
