//! Engine configuration
//!
//! Three sections: `layout` drives the body parser (tab width, comment prefix,
//! suppression marker, brackets, freeform tags), `format` drives the text
//! serializer and `tree` names the root. The defaults live in
//! `defaults/tagtext.default.toml`, compiled into the crate, and [`Loader`]
//! stacks files, TOML snippets and single-key overrides on top of them.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, Source, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../../defaults/tagtext.default.toml");

/// Top-level configuration consumed by trees and parsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub layout: LayoutConfig,
    pub format: FormatConfig,
    pub tree: TreeConfig,
}

/// Knobs of the structural body parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub tab_width: usize,
    pub comment_prefix: String,
    pub suppress_marker: String,
    pub open_bracket: String,
    pub close_bracket: String,
    pub freeform_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    pub indent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    pub root_tag: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            format: FormatConfig {
                indent: "    ".to_string(),
            },
            tree: TreeConfig {
                root_tag: "root".to_string(),
            },
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            comment_prefix: "#".to_string(),
            suppress_marker: "!".to_string(),
            open_bracket: "{".to_string(),
            close_bracket: "}".to_string(),
            freeform_tags: Vec::new(),
        }
    }
}

impl LayoutConfig {
    pub fn is_freeform(&self, tag: &str) -> bool {
        self.freeform_tags.iter().any(|t| t == tag)
    }
}

/// Builds an [`EngineConfig`] from layers, later layers winning key by key
///
/// The embedded defaults are always the bottom layer, so a layer only has to
/// name the keys it changes, e.g. `[layout] tab_width = 2`.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    fn layer<S>(mut self, source: S) -> Self
    where
        S: Source + Send + Sync + 'static,
    {
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a TOML file that must exist
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(File::from(path.as_ref()).format(FileFormat::Toml).required(true))
    }

    /// Layer a TOML file if it exists, e.g. a per-project `tagtext.toml`
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(File::from(path.as_ref()).format(FileFormat::Toml).required(false))
    }

    /// Layer TOML held in memory, such as a settings block read from a document
    pub fn with_toml(self, toml: &str) -> Self {
        self.layer(File::from_str(toml, FileFormat::Toml))
    }

    /// Set one dotted key (`layout.tab_width`, `format.indent`) above every layer
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge the layers and check them against [`EngineConfig`]
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let config: EngineConfig = self.builder.build()?.try_deserialize()?;
        tracing::debug!(
            tab_width = config.layout.tab_width,
            freeform = config.layout.freeform_tags.len(),
            "engine configuration loaded"
        );
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults with nothing layered on top
pub fn load_defaults() -> Result<EngineConfig, ConfigError> {
    Loader::new().build()
}
