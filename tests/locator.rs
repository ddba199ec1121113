//! Locator paths against built trees

use rstest::rstest;
use tagtext::tagtext::error::LocatorError;
use tagtext::tagtext::locator::{find, first, search_all, Locator};
use tagtext::tagtext::testing::factories;

const TREE: &str = "\
a
    b x
        c one
        c two
        d
    b y
        c three
";

#[test]
fn path_anchored_at_its_first_step() {
    let tree = factories::build(TREE);
    let a = tree.find(tree.root(), "a").unwrap();

    let found = tree.find(a, "a.b[x].c(2)").unwrap();
    assert_eq!(tree.node(found).name.as_deref(), Some("two"));
    assert_eq!(tree.find(tree.root(), "a.b[x].c(2)"), Some(found));
    assert_eq!(tree.find(a, "b[x].c(2)"), Some(found));
}

#[rstest]
#[case("a.b.c", Some("one"))]
#[case("a/b/c(1)", Some("one"))]
#[case("a.b[y].c", Some("three"))]
#[case("a.b(2).c", Some("three"))]
#[case("a.b[name=y].c[tag=c]", Some("three"))]
#[case("a.b[x].c[name=~^t]", Some("two"))]
#[case("a.*[y].*", Some("three"))]
#[case("a.b.c(3)", None)]
#[case("a.b[z]", None)]
#[case("b.c", None)]
fn find_cases(#[case] path: &str, #[case] expected: Option<&str>) {
    let tree = factories::build(TREE);
    let found = tree.find(tree.root(), path);
    assert_eq!(
        found.and_then(|id| tree.node(id).name.as_deref()),
        expected,
        "path {path}"
    );
}

#[test]
fn first_looks_anywhere_below() {
    let tree = factories::build(TREE);
    let locator = Locator::compile("b[y].c").unwrap();
    let found = first(&tree, tree.root(), &locator).unwrap();
    assert_eq!(tree.node(found).name.as_deref(), Some("three"));

    let strict = find(&tree, tree.root(), &locator);
    assert_eq!(strict, None);
}

#[test]
fn search_all_is_pre_order() {
    let tree = factories::build(TREE);
    let names: Vec<_> = search_all(&tree, tree.root(), "c")
        .into_iter()
        .filter_map(|id| tree.node(id).name.clone())
        .collect();
    assert_eq!(names, vec!["one", "two", "three"]);
}

#[test]
fn compile_errors() {
    assert!(matches!(Locator::compile("a..b"), Err(LocatorError::Syntax(_))));
    assert!(matches!(Locator::compile("c(0)"), Err(LocatorError::ZeroIndex(_))));
    assert!(matches!(
        Locator::compile("c[name=~\"[\"]"),
        Err(LocatorError::Pattern { .. })
    ));
}

#[test]
fn runtime_nodes_are_locatable() {
    let mut tree = factories::build(TREE);
    let a = tree.find(tree.root(), "a").unwrap();
    tree.insert_text(a, "b z\n    c four\n");
    let four = tree.find(tree.root(), "a.b[z].c").unwrap();
    assert_eq!(tree.node(four).name.as_deref(), Some("four"));
    assert!(tree.node(four).runtime_only);
}
