use layerbind_fs::{Entrypoint, Error, NormalizedPath, directory_chain, find_repository_root};
use layerbind_test_utils::tree::TestTree;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn entrypoint_chain_ends_at_entrypoint_directory() {
    let tree = TestTree::new();
    let leaf = tree.path("a/b/c");

    let entrypoint = Entrypoint::from_dir(&leaf);
    let chain = entrypoint.chain();

    assert_eq!(chain.last(), Some(entrypoint.directory()));
    assert!(chain.first().unwrap().parent().is_none());
}

#[rstest]
#[case::git_at_top("", "a/b", "")]
#[case::git_in_middle("a", "a/b", "a")]
#[case::git_at_leaf("a/b", "a/b", "a/b")]
fn repository_root_is_deepest_marked_ancestor(
    #[case] marked: &str,
    #[case] start: &str,
    #[case] expected: &str,
) {
    let tree = TestTree::new();
    tree.fake_git_dir(marked);

    let entrypoint = Entrypoint::from_dir(tree.path(start));
    let expected = Entrypoint::from_dir(tree.path(expected));

    assert_eq!(entrypoint.repository_root(), Some(expected.directory()));
}

#[test]
fn nested_repositories_pick_the_innermost() {
    let tree = TestTree::new();
    tree.fake_hg_dir("");
    tree.fake_git_dir("inner");

    let entrypoint = Entrypoint::from_dir(tree.path("inner/bin"));
    let inner = Entrypoint::from_dir(tree.path("inner"));

    assert_eq!(entrypoint.repository_root(), Some(inner.directory()));
}

#[test]
fn no_marker_means_no_repository() {
    let tree = TestTree::new();
    let chain = directory_chain(&NormalizedPath::new(tree.path("x/y")));
    // The temp directory itself never lives inside a checkout we create.
    let found = find_repository_root(&chain[chain.len() - 3..]);
    assert!(found.is_none());
}

#[test]
fn combine_repository_path_joins_root() {
    let tree = TestTree::new();
    tree.fake_git_dir("repo");
    let entrypoint = Entrypoint::from_dir(tree.path("repo/bin"));

    let combined = entrypoint.combine_repository_path("data/curves.json").unwrap();
    let root = entrypoint.repository_root().unwrap();

    assert_eq!(combined, root.join("data/curves.json"));
}

#[test]
fn combine_prefers_repository_then_entrypoint() {
    let tree = TestTree::new();
    tree.fake_git_dir("repo");
    tree.write("repo/bin", "only-here.txt", "x");
    tree.write("repo", "both.txt", "x");
    tree.write("repo/bin", "both.txt", "x");
    let entrypoint = Entrypoint::from_dir(tree.path("repo/bin"));

    let only_here = entrypoint
        .combine_repository_or_entrypoint_path("only-here.txt")
        .unwrap();
    assert_eq!(only_here, entrypoint.directory().join("only-here.txt"));

    let both = entrypoint.combine_repository_or_entrypoint_path("both.txt").unwrap();
    assert_eq!(both, entrypoint.repository_root().unwrap().join("both.txt"));

    let missing = entrypoint
        .combine_repository_or_entrypoint_path("absent.txt")
        .unwrap_err();
    assert!(matches!(missing, Error::NotFound { .. }));
}

#[test]
fn executable_name_is_file_stem() {
    let tree = TestTree::new();
    let exe = tree.write("bin", "service.exe", "");

    let entrypoint = Entrypoint::from_executable(&exe);

    assert_eq!(entrypoint.name(), Some("service"));
    assert_eq!(entrypoint.directory(), Entrypoint::from_dir(tree.path("bin")).directory());
}
