//! Optional `mbent.toml` configuration. Command-line flags override it.

use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "mbent.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub schema: SchemaConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Where `mbent schema` writes the schema.
    pub path: Option<String>,
    /// `$schema` URI for drive documents.
    pub marker: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub keep_going: bool,
}

impl Config {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
        Self::parse(&text).map_err(|err| format!("failed to parse {}: {err}", path.display()))
    }
}
