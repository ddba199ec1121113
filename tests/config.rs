//! Engine configuration: layered loading and its effect on parsing

use std::rc::Rc;

use tagtext::tagtext::building::Tree;
use tagtext::tagtext::config::{load_defaults, EngineConfig, Loader};
use tagtext::tagtext::formats::serialize;
use tagtext::tagtext::testing::{assert_tree, factories};

#[test]
fn defaults() {
    let config = load_defaults().unwrap();
    assert_eq!(config.layout.tab_width, 4);
    assert_eq!(config.layout.comment_prefix, "#");
    assert_eq!(config.layout.suppress_marker, "!");
    assert_eq!(config.format.indent, "    ");
    assert_eq!(config.tree.root_tag, "root");
    assert!(config.layout.freeform_tags.is_empty());
}

#[test]
fn layers_override_in_order() {
    let config = Loader::new()
        .with_toml("[layout]\ntab_width = 2\nfreeform_tags = [\"script\"]\n")
        .with_toml("[layout]\ntab_width = 8\n")
        .set_override("format.indent", "  ")
        .unwrap()
        .with_optional_file("/nonexistent/tagtext.toml")
        .build()
        .unwrap();
    assert_eq!(config.layout.tab_width, 8);
    assert_eq!(config.layout.freeform_tags, vec!["script"]);
    assert_eq!(config.format.indent, "  ");
    assert_eq!(config.layout.open_bracket, "{");
}

#[test]
fn files_are_layered() {
    let path = std::env::temp_dir().join(format!("tagtext-config-{}.toml", std::process::id()));
    std::fs::write(&path, "[tree]\nroot_tag = \"document\"\n").unwrap();
    let config = Loader::new().with_file(&path).build();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.unwrap().tree.root_tag, "document");
    assert!(Loader::new()
        .with_file("/nonexistent/tagtext.toml")
        .build()
        .is_err());
}

fn tree_with(config: EngineConfig, source: &str) -> Tree {
    Tree::build_text(source, factories::registry(), Rc::new(config))
}

#[test]
fn layout_settings_drive_the_parser() {
    let config = Loader::new()
        .with_toml(
            "[layout]\ncomment_prefix = \"//\"\nsuppress_marker = \"~\"\nfreeform_tags = [\"script\"]\n[tree]\nroot_tag = \"page\"\n",
        )
        .build()
        .unwrap();
    let source = "\
// heading
~raw
    a
        b
script
    c
box
    d
";
    let tree = tree_with(config, source);
    assert_tree(&tree)
        .tag("page")
        .fragments(&["// heading\n"])
        .child_count(3)
        .child(0, |raw| {
            raw.tag("raw").suppressed(true).raw_body("a\n    b\n");
        })
        .child(1, |script| {
            script.tag("script").child_count(0).raw_body("c\n");
        })
        .child(2, |node| {
            node.tag("box").child_count(1);
        });
}

#[test]
fn serializer_uses_the_configured_indent() {
    let mut config = EngineConfig::default();
    config.format.indent = "\t".to_string();
    let tree = tree_with(config, "a\n  b\n    c\n");
    assert_eq!(serialize(&tree, tree.root()), "a\n\tb\n\t\tc\n");
}
