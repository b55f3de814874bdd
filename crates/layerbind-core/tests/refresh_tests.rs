//! Tests for reloading configuration and reload notifications

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use layerbind_core::{
    BuildKind, ComponentManifest, ConfigManager, DebuggerState, ErrorBehavior, ErrorCategory, FieldSpec, LoadOptions,
    Setting,
};
use layerbind_fs::Entrypoint;
use layerbind_test_utils::tree::TestTree;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;

static WORKERS: Setting<u16> = Setting::new(FieldSpec::new("svc.Pool", "Configuration_Workers"), 2);
static NAME: Setting<String> = Setting::new(FieldSpec::new("svc.Pool", "Name"), String::new());

fn pool() -> Arc<ComponentManifest> {
    Arc::new(ComponentManifest::new("svc").field(&WORKERS).field(&NAME))
}

fn manager_at(tree: &TestTree) -> ConfigManager {
    let options = LoadOptions::new(Entrypoint::from_dir(tree.path("")))
        .with_build(BuildKind::Debug)
        .with_debugger(DebuggerState::Detached);
    ConfigManager::load(options).expect("load should succeed")
}

#[test]
fn test_refresh_picks_up_changed_files() {
    let tree = TestTree::new();
    tree.base("", json!({ "properties": { "svc.Pool.Workers": 4 } }));
    let manager = manager_at(&tree);
    manager.initialize(pool()).expect("initialize should succeed");
    assert_eq!(WORKERS.get_from(&manager.current().values), 4);

    tree.base("", json!({ "properties": { "svc.Pool.Workers": 16 } }));
    manager.refresh().expect("refresh should succeed");

    assert_eq!(WORKERS.get_from(&manager.current().values), 16);
    assert_eq!(manager.components(), vec!["layerbind", "svc"]);
}

#[test]
fn test_removed_override_keeps_previous_value() {
    let tree = TestTree::new();
    tree.base("", json!({ "properties": { "svc.Pool.Name": "alpha" } }));
    let manager = manager_at(&tree);
    manager.initialize(pool()).expect("initialize should succeed");

    tree.base("", json!({ "properties": {} }));
    manager.refresh().expect("refresh should succeed");

    assert_eq!(NAME.get_from(&manager.current().values), "alpha");
}

#[test]
fn test_refresh_recomputes_error_behaviors() {
    let tree = TestTree::new();
    let manager = manager_at(&tree);
    manager.initialize(pool()).expect("initialize should succeed");
    assert_eq!(manager.error_behavior(ErrorCategory::Timeout), ErrorBehavior::NONE);

    tree.local("", json!({ "properties": { "ErrorBehavior.Timeout": ["WriteToFile"] } }));
    manager.refresh().expect("refresh should succeed");

    assert_eq!(manager.error_behavior(ErrorCategory::Timeout), ErrorBehavior::WRITE_TO_FILE);
}

#[test]
fn test_subscribers_run_in_registration_order() {
    let tree = TestTree::new();
    let manager = manager_at(&tree);
    manager.initialize(pool()).expect("initialize should succeed");

    let calls = Arc::new(Mutex::new(Vec::new()));
    for label in ["first", "second", "third"] {
        let calls = Arc::clone(&calls);
        manager.subscribe(move || calls.lock().push(label));
    }

    manager.refresh().expect("refresh should succeed");
    assert_eq!(*calls.lock(), vec!["first", "second", "third"]);
}

#[test]
fn test_unsubscribed_callback_is_not_called() {
    let tree = TestTree::new();
    let manager = manager_at(&tree);
    let count = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&count);
    let id = manager.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    manager.refresh().expect("refresh should succeed");
    assert!(manager.unsubscribe(id));
    assert!(!manager.unsubscribe(id));
    manager.refresh().expect("refresh should succeed");

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_refresh_publishes_nothing() {
    let tree = TestTree::new();
    tree.base("", json!({ "properties": { "svc.Pool.Workers": 8 } }));
    let manager = manager_at(&tree);
    manager.initialize(pool()).expect("initialize should succeed");
    let before = manager.current();

    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    manager.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    tree.base("", json!({ "properties": { "svc.Pool.Workers": "lots" } }));
    assert!(manager.refresh().is_err());

    let after = manager.current();
    assert_eq!(after.generation, before.generation);
    assert_eq!(WORKERS.get_from(&after.values), 8);
    assert_eq!(notified.load(Ordering::SeqCst), 0);
}

#[test]
fn test_subscriber_can_read_the_new_state() {
    let tree = TestTree::new();
    tree.base("", json!({ "properties": { "svc.Pool.Workers": 1 } }));
    let manager = Arc::new(manager_at(&tree));
    manager.initialize(pool()).expect("initialize should succeed");

    let seen = Arc::new(Mutex::new(None));
    let (observer, sink) = (Arc::clone(&manager), Arc::clone(&seen));
    manager.subscribe(move || {
        *sink.lock() = Some(WORKERS.get_from(&observer.current().values));
    });

    tree.base("", json!({ "properties": { "svc.Pool.Workers": 5 } }));
    manager.refresh().expect("refresh should succeed");

    assert_eq!(*seen.lock(), Some(5));
}
