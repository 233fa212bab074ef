use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RegistryError, RegistryResult};

/// What a registry does when two local keys end up with the same tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Fail `build()` with [`RegistryError::TagCollision`].
    #[default]
    Reject,
    /// Later registration wins; the shadowed creator is dropped with a warning.
    Shadow,
}

/// Registry construction settings. Every field has a default, so an empty
/// TOML document is a valid config.
///
/// Fields are private: a config only comes from `Default`, the validating
/// loaders, or the `with_*` setters. A config deserialized directly with
/// serde is checked again wherever it is handed to a builder or namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Joins namespace and local key into a tag.
    separator: String,
    on_collision: CollisionPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            separator: "/".to_string(),
            on_collision: CollisionPolicy::Reject,
        }
    }
}

impl RegistryConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("Failed to parse registry config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.on_collision = policy;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> RegistryResult<Self> {
        self.separator = separator.into();
        self.validate()?;
        Ok(self)
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn on_collision(&self) -> CollisionPolicy {
        self.on_collision
    }

    pub fn validate(&self) -> RegistryResult<()> {
        if self.separator.is_empty() {
            return Err(RegistryError::InvalidSeparator(self.separator.clone()));
        }
        Ok(())
    }

    /// `namespace<sep>local_key`, or the bare key when there is no namespace.
    /// An empty namespace counts as none.
    pub fn derive_tag(&self, namespace: Option<&str>, local_key: &str) -> String {
        match namespace {
            Some(ns) if !ns.is_empty() => format!("{ns}{}{local_key}", self.separator),
            _ => local_key.to_string(),
        }
    }
}

/// Load and parse a TOML registry config file.
pub fn load_config(path: &Path) -> Result<RegistryConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: RegistryConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
