//! Local key → tagged creator registries.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use tracing::{debug, warn};

use crate::config::{CollisionPolicy, RegistryConfig};
use crate::creator::{transform, try_transform, ActionCreator, Transform};
use crate::error::{RegistryError, RegistryResult};

/// Local key → payload transform, the input to [`action_creators`].
pub type TransformMap<D, P> = BTreeMap<String, Transform<D, P>>;

/// Immutable mapping from local key to tagged creator.
///
/// Every tag in a registry belongs to exactly one local key.
pub struct CreatorRegistry<D, P> {
    namespace: Option<String>,
    creators: BTreeMap<String, ActionCreator<D, P>>,
    /// tag → local key
    keys_by_tag: BTreeMap<String, String>,
}

impl<D, P> CreatorRegistry<D, P> {
    pub fn builder() -> CreatorRegistryBuilder<D, P> {
        CreatorRegistryBuilder::new()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn get(&self, local_key: &str) -> Option<&ActionCreator<D, P>> {
        self.creators.get(local_key)
    }

    /// Reverse lookup: which local key owns `tag`.
    pub fn local_key_for(&self, tag: &str) -> Option<&str> {
        self.keys_by_tag.get(tag).map(String::as_str)
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.keys_by_tag.contains_key(tag)
    }

    /// All tags, sorted.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.keys_by_tag.keys().map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.creators.keys().map(String::as_str)
    }

    /// `(local key, creator)` pairs ordered by local key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActionCreator<D, P>)> {
        self.creators.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }
}

impl<D, P> Clone for CreatorRegistry<D, P> {
    fn clone(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            creators: self.creators.clone(),
            keys_by_tag: self.keys_by_tag.clone(),
        }
    }
}

impl<D, P> fmt::Debug for CreatorRegistry<D, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatorRegistry")
            .field("namespace", &self.namespace)
            .field("tags", &self.keys_by_tag)
            .finish()
    }
}

enum Entry<D, P> {
    /// Tag derived from namespace + key at build time
    Derived(Transform<D, P>),
    /// Creator with its own tag, used as-is
    Prebuilt(ActionCreator<D, P>),
}

/// Collects transforms and creators, then validates them into a
/// [`CreatorRegistry`].
///
/// Re-registering a local key replaces the earlier entry. Tag collisions
/// between different keys are resolved by the configured
/// [`CollisionPolicy`] in `build()`.
pub struct CreatorRegistryBuilder<D, P> {
    namespace: Option<String>,
    config: RegistryConfig,
    /// Registration order; later entries shadow earlier ones under `Shadow`.
    entries: Vec<(String, Entry<D, P>)>,
}

impl<D, P> Default for CreatorRegistryBuilder<D, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, P> CreatorRegistryBuilder<D, P> {
    pub fn new() -> Self {
        Self {
            namespace: None,
            config: RegistryConfig::default(),
            entries: Vec::new(),
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn on_collision(mut self, policy: CollisionPolicy) -> Self {
        self.config = self.config.with_collision_policy(policy);
        self
    }

    /// Register an infallible payload transform under `local_key`.
    pub fn action<F>(self, local_key: impl Into<String>, f: F) -> Self
    where
        D: 'static,
        P: 'static,
        F: Fn(D) -> P + Send + Sync + 'static,
    {
        self.transform(local_key, transform(f))
    }

    /// Register a fallible payload transform under `local_key`.
    pub fn try_action<F>(self, local_key: impl Into<String>, f: F) -> Self
    where
        F: Fn(D) -> Result<P> + Send + Sync + 'static,
    {
        self.transform(local_key, try_transform(f))
    }

    pub fn transform(self, local_key: impl Into<String>, transform: Transform<D, P>) -> Self {
        self.push(local_key.into(), Entry::Derived(transform))
    }

    /// Register a creator that already carries its tag. The registry's
    /// namespace is not applied to it.
    pub fn insert(self, local_key: impl Into<String>, creator: ActionCreator<D, P>) -> Self {
        self.push(local_key.into(), Entry::Prebuilt(creator))
    }

    fn push(mut self, local_key: String, entry: Entry<D, P>) -> Self {
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == local_key) {
            debug!(local_key = local_key.as_str(), "Replacing earlier registration");
            self.entries.remove(pos);
        }
        self.entries.push((local_key, entry));
        self
    }

    pub fn build(self) -> RegistryResult<CreatorRegistry<D, P>> {
        self.config.validate()?;

        let namespace = self.namespace.filter(|ns| !ns.is_empty());
        let mut creators = BTreeMap::new();
        let mut keys_by_tag: BTreeMap<String, String> = BTreeMap::new();

        for (local_key, entry) in self.entries {
            if local_key.is_empty() {
                return Err(RegistryError::EmptyLocalKey);
            }

            let creator = match entry {
                Entry::Derived(t) => ActionCreator::from_transform(
                    self.config.derive_tag(namespace.as_deref(), &local_key),
                    t,
                )?,
                Entry::Prebuilt(creator) => creator,
            };

            if let Some(existing) = keys_by_tag.get(creator.tag()).cloned() {
                match self.config.on_collision() {
                    CollisionPolicy::Reject => {
                        return Err(RegistryError::TagCollision {
                            tag: creator.tag().to_string(),
                            existing,
                            incoming: local_key,
                        });
                    }
                    CollisionPolicy::Shadow => {
                        warn!(
                            tag = creator.tag(),
                            shadowed = existing.as_str(),
                            by = local_key.as_str(),
                            "Tag collision, later registration wins"
                        );
                        creators.remove(&existing);
                    }
                }
            }

            keys_by_tag.insert(creator.tag().to_string(), local_key.clone());
            creators.insert(local_key, creator);
        }

        debug!(
            namespace = namespace.as_deref().unwrap_or(""),
            creators = creators.len(),
            "Built creator registry"
        );

        Ok(CreatorRegistry {
            namespace,
            creators,
            keys_by_tag,
        })
    }
}

/// Build a registry from a transform map, deriving each tag from the
/// optional namespace and the local key.
pub fn action_creators<D, P>(
    transforms: TransformMap<D, P>,
    namespace: Option<&str>,
) -> RegistryResult<CreatorRegistry<D, P>> {
    action_creators_with_config(transforms, namespace, RegistryConfig::default())
}

pub fn action_creators_with_config<D, P>(
    transforms: TransformMap<D, P>,
    namespace: Option<&str>,
    config: RegistryConfig,
) -> RegistryResult<CreatorRegistry<D, P>> {
    let mut builder = CreatorRegistryBuilder::new().config(config);
    if let Some(ns) = namespace {
        builder = builder.namespace(ns);
    }
    transforms
        .into_iter()
        .fold(builder, |b, (key, t)| b.transform(key, t))
        .build()
}
