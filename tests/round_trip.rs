//! Serializing a built tree and parsing the output again gives the same tree

use rstest::rstest;
use tagtext::tagtext::ast::diagnostics::HEADER_PARSE_FAILED;
use tagtext::tagtext::ast::NodeSpec;
use tagtext::tagtext::building::Tree;
use tagtext::tagtext::formats::serialize;
use tagtext::tagtext::testing::{assert_tree, factories};

const GROUPS: &str = "\
group first \"A\"
   item a \"Alpha\"
   item b \"Beta\"
group second \"B\"
   item c \"Gamma\"
";

const MIXED: &str = "\
a (x=1, flag) [o=\"two words\"] \"L\" # c
    b

    # inner
    c {
    raw { nested }
    }
# tail
d :list
";

const TABS: &str = "menu\n\tentry a\n\tentry b\n\t\tsub\n";

const BLANKS: &str = "a\n    b\n\n\nc\n\n";

const SUPPRESSED: &str = "!raw \"x\"\n  anything (goes\nnext\n";

const UNDECODED: &str = "\"hello\" world\n    kid\nitem a (k=v\n(a)\nnext\n";

const COMMENT_BRACE: &str = "a # start {\nb \"{\"\n    c\n";

#[rstest]
#[case::groups(GROUPS)]
#[case::mixed(MIXED)]
#[case::tabs(TABS)]
#[case::blanks(BLANKS)]
#[case::suppressed(SUPPRESSED)]
#[case::undecoded(UNDECODED)]
#[case::comment_brace(COMMENT_BRACE)]
fn serialize_then_parse_keeps_the_sketch(#[case] source: &str) {
    let original = factories::build(source);
    let text = serialize(&original, original.root());
    let reparsed = factories::build(&text);

    assert_eq!(
        reparsed.sketch(reparsed.root()),
        original.sketch(original.root()),
        "serialized form:\n{}",
        text
    );
    assert_eq!(serialize(&reparsed, reparsed.root()), text);
}

#[test]
fn canonical_form() {
    let tree = factories::build(
        "menu   main   (wide ,  tall=2)\n   entry open \"Open\"   # first\n      key (code=o)\n\n   entry  close\n",
    );
    insta::assert_snapshot!(serialize(&tree, tree.root()), @r###"
    menu main (wide, tall=2)
        entry open "Open" # first
            key (code=o)

        entry close
    "###);
}

#[test]
fn fragments_survive() {
    let tree = factories::build(BLANKS);
    assert_tree(&tree)
        .child_count(2)
        .fragments(&["\n\n", "\n"])
        .child(0, |a| {
            a.child_count(1);
        });
    assert_eq!(serialize(&tree, tree.root()), "a\n    b\n\n\nc\n\n");
}

#[test]
fn runtime_nodes_are_not_serialized() {
    let mut tree = factories::build(GROUPS);
    let before = tree.sketch(tree.root());

    let second = tree.find(tree.root(), "group[second]").unwrap();
    let inserted = tree.insert_text(second, "item d \"Delta\"\n");
    assert_eq!(inserted.len(), 1);

    let delta = tree.find(tree.root(), "group[second].item[d]").unwrap();
    assert_eq!(delta, inserted[0]);
    assert!(tree.node(delta).runtime_only);
    assert!(tree.node(delta).is_built());

    let text = serialize(&tree, tree.root());
    assert_eq!(text, GROUPS.replace("   ", "    "));
    let reparsed = factories::build(&text);
    assert_eq!(reparsed.find(reparsed.root(), "group[second].item[d]"), None);
    assert_eq!(reparsed.sketch(reparsed.root()), before);
    assert_eq!(tree.sketch(tree.root()), before);
}

#[test]
fn structured_export_rebuilds_the_same_tree() {
    let original = factories::build(MIXED);
    let spec = original.to_spec(original.root());
    let json = spec.to_json().unwrap();

    let loaded = NodeSpec::from_json(&json).unwrap();
    assert_eq!(loaded, spec);

    let mut rebuilt = Tree::from_spec(&loaded, factories::registry(), factories::config());
    rebuilt.build(rebuilt.root());
    assert_eq!(rebuilt.sketch(rebuilt.root()), original.sketch(original.root()));
    assert_eq!(
        serialize(&rebuilt, rebuilt.root()),
        serialize(&original, original.root())
    );
}

#[test]
fn undecodable_headers_are_written_back_as_found() {
    let tree = factories::build(UNDECODED);
    assert_tree(&tree)
        .child_count(4)
        .child(0, |hello| {
            hello.has_diagnostic(HEADER_PARSE_FAILED).child(0, |kid| {
                kid.tag("kid");
            });
        })
        .child(1, |item| {
            item.tag("item").has_diagnostic(HEADER_PARSE_FAILED);
        })
        .child(2, |list| {
            list.has_diagnostic(HEADER_PARSE_FAILED);
        });

    let text = serialize(&tree, tree.root());
    assert_eq!(text, UNDECODED);

    let reparsed = factories::build(&text);
    assert_eq!(reparsed.diagnostics().len(), 3);

    let spec = tree.to_spec(tree.root());
    let loaded = NodeSpec::from_json(&spec.to_json().unwrap()).unwrap();
    let mut rebuilt = Tree::from_spec(&loaded, factories::registry(), factories::config());
    rebuilt.build(rebuilt.root());
    assert_eq!(serialize(&rebuilt, rebuilt.root()), UNDECODED);
    assert_eq!(rebuilt.diagnostics().len(), 3);
}

#[test]
fn decoded_headers_are_canonical_not_verbatim() {
    let tree = factories::build("item   a   (k = v)\n");
    let spec = tree.to_spec(tree.root());
    assert!(!spec.to_json().unwrap().contains("\"header\""));
    assert_eq!(serialize(&tree, tree.root()), "item a (k=v)\n");
}
