//! Trees described as structured data instead of tagged text

use tagtext::tagtext::ast::spec::{ChildSpec, NodeSpec};
use tagtext::tagtext::building::{HandlerRegistry, Tree};
use tagtext::tagtext::formats::serialize;
use tagtext::tagtext::testing::{assert_tree, factories};

const MENU_YAML: &str = "\
tag: menu
name: main
params:
  - [width, '40']
children:
  - tag: entry
    name: open
    label: Open a file
  - \"\\n\"
  - tag: entry
    name: quit
    suppressed: true
    body: |
      keep
        as is
";

fn registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry.register("entry", factories::constant("entry", 1u8));
    registry
}

#[test]
fn yaml_specs_build_like_text() {
    let spec = NodeSpec::from_yaml(MENU_YAML).unwrap();
    let mut tree = Tree::from_spec(&spec, registry().shared(), factories::config());
    tree.build(tree.root());

    assert_tree(&tree)
        .tag("menu")
        .name("main")
        .param("width", "40")
        .built()
        .fragments(&["\n"])
        .child_count(2)
        .child(0, |open| {
            open.tag("entry")
                .name("open")
                .label("Open a file")
                .handler("entry")
                .payload(1u8);
        })
        .child(1, |quit| {
            quit.suppressed(true).raw_body("keep\n  as is\n");
        });
}

#[test]
fn specs_serialize_to_tagged_text() {
    let spec = NodeSpec::new("root")
        .child(
            NodeSpec::new("group")
                .named("first")
                .label("First group")
                .child(NodeSpec::new("item").named("a"))
                .child(NodeSpec::new("item").named("b").param("k", "two words")),
        )
        .text("\n")
        .child(NodeSpec::new("note").body("free text\n"));
    let mut tree = Tree::from_spec(&spec, registry().shared(), factories::config());
    tree.build(tree.root());

    let text = serialize(&tree, tree.root());
    assert_eq!(
        text,
        "group first \"First group\"\n    item a\n    item b (k=\"two words\")\n\nnote\n    free text\n"
    );

    let reparsed = factories::build(&text);
    assert_eq!(reparsed.sketch(reparsed.root()), tree.sketch(tree.root()));
}

#[test]
fn inserted_specs_are_runtime_only() {
    let mut tree = factories::build("menu main\n    entry open\n");
    let menu = tree.find(tree.root(), "menu").unwrap();
    let added = tree.insert_spec(menu, &NodeSpec::new("entry").named("recent").label("Recent"));

    assert_tree(&tree).at("menu.entry[recent]", |entry| {
        assert_eq!(entry.id(), added);
        entry.runtime_only(true).built().label("Recent");
    });
    assert_eq!(serialize(&tree, tree.root()), "menu main\n    entry open\n");

    let exported = tree.to_spec(menu);
    assert_eq!(exported.children.len(), 1);
    assert!(matches!(&exported.children[0], ChildSpec::Node(entry) if entry.name.as_deref() == Some("open")));
}

#[test]
fn json_export_keeps_unexpanded_bodies() {
    let tree = factories::build("!raw\n    a\n        b\nitem x (k=v)\n");
    let json = tree.to_spec(tree.root()).to_json().unwrap();
    let spec = NodeSpec::from_json(&json).unwrap();

    match &spec.children[0] {
        ChildSpec::Node(raw) => {
            assert!(raw.suppressed);
            assert_eq!(raw.body.as_deref(), Some("a\n    b\n"));
        }
        other => panic!("expected a node, got {:?}", other),
    }
    match &spec.children[1] {
        ChildSpec::Node(item) => {
            assert_eq!(item.params, vec![("k".to_string(), "v".to_string())]);
        }
        other => panic!("expected a node, got {:?}", other),
    }
}
