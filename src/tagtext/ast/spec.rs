//! Structured node descriptions
//!
//! A [`NodeSpec`] describes a node and its subtree as plain data, so trees can be
//! built without going through tagged text (programmatic construction, macro
//! insertion) and exported again. Specs serialize with serde and load from JSON
//! or YAML.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub tag: String,
    /// The tag was written with the suppression marker
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub suppressed: bool,
    /// Header line kept as written, for nodes whose header could not be decoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_code: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bracket: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Raw body text, used when `children` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildSpec>,
}

/// A child entry: a nested node or a literal text fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChildSpec {
    Text(String),
    Node(NodeSpec),
}

impl NodeSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        if self.name.is_none() {
            self.name = Some(name.into());
        } else {
            self.aliases.push(name.into());
        }
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn body(mut self, text: impl Into<String>) -> Self {
        self.body = Some(text.into());
        self
    }

    pub fn suppressed(mut self) -> Self {
        self.suppressed = true;
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(ChildSpec::Node(child));
        self
    }

    pub fn text(mut self, fragment: impl Into<String>) -> Self {
        self.children.push(ChildSpec::Text(fragment.into()));
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let spec = NodeSpec::new("item").named("a").named("alpha").param("k", "v");
        assert_eq!(spec.name.as_deref(), Some("a"));
        assert_eq!(spec.aliases, vec!["alpha"]);
        assert_eq!(spec.params, vec![("k".to_string(), "v".to_string())]);
    }

    #[test]
    fn test_json_children_mix_nodes_and_text() {
        let spec = NodeSpec::from_json(
            r#"{
                "tag": "group",
                "name": "first",
                "children": [
                    {"tag": "item", "name": "a", "label": "Alpha"},
                    "\n",
                    {"tag": "item", "params": [["k", "v"]]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(spec.children.len(), 3);
        assert!(matches!(&spec.children[1], ChildSpec::Text(t) if t == "\n"));
        match &spec.children[2] {
            ChildSpec::Node(item) => assert_eq!(item.params[0].1, "v"),
            other => panic!("expected node, got {:?}", other),
        }
    }

    #[test]
    fn test_yaml() {
        let spec = NodeSpec::from_yaml(
            "tag: menu\nname: main\nchildren:\n  - tag: entry\n    label: Open\n  - tag: entry\n    label: Close\n",
        )
        .unwrap();
        assert_eq!(spec.tag, "menu");
        assert_eq!(spec.children.len(), 2);
    }

    #[test]
    fn test_json_output_skips_defaults() {
        let json = NodeSpec::new("leaf").to_json().unwrap();
        assert_eq!(json, "{\n  \"tag\": \"leaf\"\n}");
    }
}
