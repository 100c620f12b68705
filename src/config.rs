//! CLI configuration: session defaults and consistency rules
//!
//! Lives at `~/.config/dagctl/config.toml` unless `--config` points
//! elsewhere. A missing file is not an error.

use anyhow::{Context, Result};
use dagkit::{BoxedRule, PropertyReference};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::paths;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default region when neither the document nor the environment sets one
    #[serde(default)]
    pub region: Option<String>,

    /// Default credential profile
    #[serde(default)]
    pub profile: Option<String>,

    /// Ask for a typed confirmation before destroy
    #[serde(default = "default_true")]
    pub confirm_destroy: bool,

    #[serde(default)]
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// `[[rules.references]]` entries
    #[serde(default)]
    pub references: Vec<PropertyReference>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            confirm_destroy: true,
            rules: RulesConfig::default(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or the default location
    ///
    /// An explicit path must exist; the default location may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = paths::config_file()?;
                if !path.exists() {
                    log::debug!("No config at {}, using defaults", path.display());
                    return Ok(Self::default());
                }
                Self::load_from(&path)
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid TOML format in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Consistency rules declared in the config
    pub fn consistency_rules(&self) -> Vec<BoxedRule> {
        self.rules
            .references
            .iter()
            .cloned()
            .map(|rule| Box::new(rule) as BoxedRule)
            .collect()
    }
}
