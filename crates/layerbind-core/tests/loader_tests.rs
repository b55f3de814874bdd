//! Tests for layered override loading

use layerbind_core::loader::load;
use layerbind_core::{BuildKind, DebuggerState, Error, LoadOptions, RawValue, Scalar};
use layerbind_fs::Entrypoint;
use layerbind_test_utils::tree::TestTree;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn options(tree: &TestTree, dir: &str) -> LoadOptions {
    LoadOptions::new(Entrypoint::from_dir(tree.path(dir)))
        .with_build(BuildKind::Debug)
        .with_debugger(DebuggerState::Detached)
}

fn value_of(options: &LoadOptions, key: &str) -> Option<RawValue> {
    load(options).expect("load should succeed").store.get(key).cloned()
}

mod precedence_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deepest_base_file_wins() {
        let tree = TestTree::new();
        tree.base("", json!({ "properties": { "K": "root" } }));
        tree.base("mid", json!({ "properties": { "K": "mid" } }));
        tree.base("mid/leaf", json!({ "properties": { "K": "leaf" } }));

        assert_eq!(value_of(&options(&tree, "mid/leaf"), "K"), Some(RawValue::from("leaf")));
    }

    #[test]
    fn test_shallow_local_overlay_beats_deep_base() {
        let tree = TestTree::new();
        tree.base("", json!({ "properties": { "K": "root" } }));
        tree.base("mid/leaf", json!({ "properties": { "K": "leaf" } }));
        tree.local("mid", json!({ "properties": { "K": "mid-local" } }));

        assert_eq!(
            value_of(&options(&tree, "mid/leaf"), "K"),
            Some(RawValue::from("mid-local"))
        );
    }

    #[test]
    fn test_curves_overlay_follows_local_overlay() {
        let tree = TestTree::new();
        tree.local("", json!({ "properties": { "Ramp": "1" } }));
        tree.curves("", json!({ "properties": { "Ramp": "0:1; 5:2" } }));

        assert_eq!(value_of(&options(&tree, ""), "Ramp"), Some(RawValue::from("0:1; 5:2")));
    }

    #[test]
    fn test_command_line_beats_every_file() {
        let tree = TestTree::new();
        tree.base("", json!({ "properties": { "K": "file" } }));
        tree.local("", json!({ "properties": { "K": "local" } }));

        let options = options(&tree, "").with_args(["--K", "cli"]);
        assert_eq!(value_of(&options, "K"), Some(RawValue::from("cli")));
    }

    #[test]
    fn test_files_outside_the_chain_are_ignored() {
        let tree = TestTree::new();
        tree.base("sibling", json!({ "properties": { "K": "sibling" } }));
        tree.path("leaf");

        assert_eq!(value_of(&options(&tree, "leaf"), "K"), None);
    }
}

mod section_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sectioned(tree: &TestTree) {
        tree.base(
            "",
            json!({
                "properties": { "P": 1 },
                "debug": { "D": 1 },
                "release": { "R": 1 },
                "attached": { "A": 1 },
                "detached": { "Det": 1 },
                "debug-attached": { "DA": 1 },
                "debug-detached": { "DD": 1 },
                "release-detached": { "RD": 1 },
                "unrelated": { "U": 1 }
            }),
        );
    }

    #[test]
    fn test_debug_detached_selects_four_sections() {
        let tree = TestTree::new();
        sectioned(&tree);

        let loaded = load(&options(&tree, "")).expect("load should succeed");
        let mut keys: Vec<&str> = loaded.store.iter().map(|(k, _)| k).collect();
        keys.sort_unstable();

        assert_eq!(keys, vec!["D", "DD", "Det", "P"]);
    }

    #[rstest]
    #[case(BuildKind::Release, DebuggerState::Attached, "A")]
    #[case(BuildKind::Release, DebuggerState::Detached, "RD")]
    #[case(BuildKind::Debug, DebuggerState::Attached, "DA")]
    fn test_conditional_sections(
        #[case] build: BuildKind,
        #[case] debugger: DebuggerState,
        #[case] expected_key: &str,
    ) {
        let tree = TestTree::new();
        sectioned(&tree);

        let options = options(&tree, "").with_build(build).with_debugger(debugger);
        let loaded = load(&options).expect("load should succeed");
        assert!(loaded.store.contains_key(expected_key));
        assert!(loaded.store.contains_key("P"));
    }

    #[test]
    fn test_later_section_overrides_properties() {
        let tree = TestTree::new();
        tree.base(
            "",
            json!({
                "properties": { "K": "props" },
                "debug": { "K": "debug" },
                "debug-detached": { "K": "combined" }
            }),
        );
        assert_eq!(value_of(&options(&tree, ""), "K"), Some(RawValue::from("combined")));
    }

    #[test]
    fn test_overlay_sections_follow_build_selection() {
        let tree = TestTree::new();
        tree.base("", json!({ "properties": { "K": "base" } }));
        tree.local(
            "",
            json!({
                "release": { "K": "local-release" },
                "debug-detached": { "L": "local-debug-detached" }
            }),
        );

        let loaded = load(&options(&tree, "")).expect("load should succeed");
        assert_eq!(loaded.store.get("K"), Some(&RawValue::from("base")));
        assert_eq!(loaded.store.get("L"), Some(&RawValue::from("local-debug-detached")));
    }

    #[test]
    fn test_null_array_elements_load() {
        let tree = TestTree::new();
        tree.base("", json!({ "properties": { "Names": ["a", null] } }));

        assert_eq!(
            value_of(&options(&tree, ""), "Names"),
            Some(RawValue::List(vec![Scalar::from("a"), Scalar::from("")]))
        );
    }

    #[test]
    fn test_nested_object_expands_one_level() {
        let tree = TestTree::new();
        tree.base(
            "",
            json!({ "properties": { "net.Listener": { "Port": 80, "Hosts": ["a", "b"] } } }),
        );

        let loaded = load(&options(&tree, "")).expect("load should succeed");
        assert_eq!(
            loaded.store.get("net.Listener.Port"),
            Some(&RawValue::Scalar(Scalar::Int(80)))
        );
        assert_eq!(
            loaded.store.get("net.Listener.Hosts"),
            Some(&RawValue::List(vec![Scalar::from("a"), Scalar::from("b")]))
        );
    }
}

mod error_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_doubly_nested_object_is_unsupported() {
        let tree = TestTree::new();
        tree.base("", json!({ "properties": { "A": { "B": { "C": 1 } } } }));

        let err = load(&options(&tree, "")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue { ref key, .. } if key == "A.B"));
    }

    #[test]
    fn test_section_that_is_not_an_object_is_unsupported() {
        let tree = TestTree::new();
        tree.base("", json!({ "properties": [1, 2] }));

        let err = load(&options(&tree, "")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue { ref key, .. } if key == "properties"));
    }

    #[test]
    fn test_malformed_json_names_the_file() {
        let tree = TestTree::new();
        tree.write("", "Configuration.json", "{ not json");

        let err = load(&options(&tree, "")).unwrap_err();
        assert!(matches!(err, Error::Fs(layerbind_fs::Error::ConfigParse { .. })));
        assert!(err.to_string().contains("Configuration.json"));
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let tree = TestTree::new();
        let loaded = load(&options(&tree, "a/b")).expect("load should succeed");
        assert!(loaded.store.is_empty());
        assert!(loaded.sources.is_empty());
    }
}

mod command_line_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_positional_arguments_are_kept_in_order() {
        let tree = TestTree::new();
        let options = options(&tree, "").with_args(["first", "--k", "v", "second"]);
        let loaded = load(&options).expect("load should succeed");

        assert_eq!(loaded.command_line.positional(), &["first", "second"]);
        assert!(loaded.command_line.is_overridden("k"));
    }

    #[test]
    fn test_sources_are_listed_in_merge_order() {
        let tree = TestTree::new();
        let local = tree.local("", json!({}));
        let base = tree.base("leaf", json!({}));

        let loaded = load(&options(&tree, "leaf")).expect("load should succeed");
        let sources: Vec<String> = loaded.sources.iter().map(|p| p.file_name().unwrap_or_default().to_string()).collect();

        assert_eq!(sources, vec!["Configuration.json", "Configuration.local.json"]);
        assert!(base.exists() && local.exists());
    }
}
