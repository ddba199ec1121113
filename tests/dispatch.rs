//! Handler dispatch scoped by ancestry

use tagtext::tagtext::ast::Payload;
use tagtext::tagtext::building::{BuildContext, HandlerRegistry, HandlerSpec, TagHandler, Tree};
use tagtext::tagtext::error::BuildError;
use tagtext::tagtext::testing::{assert_tree, factories};

fn registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry
        .register("x", factories::constant("global", "global"))
        .register_scoped("y", "x", factories::constant("scoped", "scoped"))
        .register(
            "panel",
            HandlerSpec::generic().scope("x", factories::constant("panel-x", "panel")),
        );
    registry
}

#[test]
fn scoped_handler_applies_only_under_its_ancestor() {
    let tree = factories::build_with("x one\ny\n    z\n        x two\nx three\n", registry());
    assert_tree(&tree)
        .at("x[one]", |x| {
            x.handler("global").payload("global");
        })
        .at("y.z.x[two]", |x| {
            x.handler("scoped").payload("scoped");
        })
        .at("x[three]", |x| {
            x.handler("global");
        });
}

#[test]
fn nearest_scope_wins() {
    let source = "\
y
    panel
        x four
panel
    y
        x five
";
    let tree = factories::build_with(source, registry());
    assert_tree(&tree)
        .at("y.panel.x[four]", |x| {
            x.handler("panel-x").payload("panel");
        })
        .at("panel.y.x[five]", |x| {
            x.handler("scoped");
        });
}

#[test]
fn unregistered_tags_use_the_generic_handler() {
    let tree = factories::build_with("y\n    w\n", registry());
    assert_tree(&tree).at("y.w", |w| {
        w.handler("generic").no_payload();
    });
}

struct Form;

impl TagHandler for Form {
    fn name(&self) -> &str {
        "form"
    }

    fn build_payload(&self, ctx: &mut BuildContext<'_>) -> Result<Option<Payload>, BuildError> {
        let form = ctx.node().name.clone().unwrap_or_default();
        ctx.override_handler(
            "field",
            factories::handler("form-field", move |field| {
                let name = field.node().name.clone().unwrap_or_default();
                Ok(Some(factories::payload(format!("{}.{}", form, name))))
            }),
        );
        Ok(None)
    }
}

#[test]
fn handlers_can_override_descendants_while_building() {
    let mut registry = registry();
    registry.register("form", HandlerSpec::new(Form));
    let source = "\
form login
    field user
    group
        field password
field stray
";
    let tree = factories::build_with(source, registry);
    assert_tree(&tree)
        .at("form.field", |field| {
            field
                .handler("form-field")
                .payload("login.user".to_string());
        })
        .at("form.group.field", |field| {
            field.payload("login.password".to_string());
        })
        .at("field[stray]", |field| {
            field.handler("generic").no_payload();
        });
}

#[test]
fn registries_are_shared_between_independent_trees() {
    let shared = registry().shared();
    let config = factories::config();
    let first = Tree::build_text("y\n    x a\n", shared.clone(), config.clone());
    let second = Tree::build_text("x b\n", shared, config);
    assert_tree(&first).at("y.x", |x| {
        x.handler("scoped");
    });
    assert_tree(&second).at("x", |x| {
        x.handler("global");
    });
}
