//! Namespace-bound creators and registries.

use crate::config::RegistryConfig;
use crate::creator::ActionCreator;
use crate::error::{RegistryError, RegistryResult};
use crate::registry::{
    action_creators_with_config, CreatorRegistry, CreatorRegistryBuilder, TransformMap,
};

/// A fixed prefix for creators and registries. Holds nothing but the prefix
/// and the config used to join it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    name: String,
    config: RegistryConfig,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: RegistryConfig::default(),
        }
    }

    /// Swap in a different config. Rejected if it could not build a tag.
    pub fn with_config(mut self, config: RegistryConfig) -> RegistryResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag_for(&self, local_key: &str) -> String {
        self.config.derive_tag(Some(&self.name), local_key)
    }

    /// A single creator tagged `<namespace>/<local_key>`.
    pub fn create<D, P, F>(&self, local_key: &str, f: F) -> RegistryResult<ActionCreator<D, P>>
    where
        D: 'static,
        P: 'static,
        F: Fn(D) -> P + Send + Sync + 'static,
    {
        if local_key.is_empty() {
            return Err(RegistryError::EmptyLocalKey);
        }
        self.config.validate()?;
        ActionCreator::new(self.tag_for(local_key), f)
    }

    pub fn build<D, P>(
        &self,
        transforms: TransformMap<D, P>,
    ) -> RegistryResult<CreatorRegistry<D, P>> {
        action_creators_with_config(transforms, Some(&self.name), self.config.clone())
    }

    /// Builder pre-loaded with this namespace and config.
    pub fn registry<D, P>(&self) -> CreatorRegistryBuilder<D, P> {
        CreatorRegistryBuilder::new()
            .namespace(self.name.clone())
            .config(self.config.clone())
    }
}
