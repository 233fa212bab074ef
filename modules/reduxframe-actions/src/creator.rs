//! Tagged action creators.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::error::{RegistryError, RegistryResult};
use crate::types::Action;

/// Payload transform stored by a creator. Infallible transforms are wrapped
/// into `Ok` at construction.
pub type Transform<D, P> = Arc<dyn Fn(D) -> Result<P> + Send + Sync>;

/// Wrap an infallible `D -> P` into a [`Transform`].
pub fn transform<D, P, F>(f: F) -> Transform<D, P>
where
    D: 'static,
    P: 'static,
    F: Fn(D) -> P + Send + Sync + 'static,
{
    Arc::new(move |data| Ok(f(data)))
}

/// Wrap a fallible `D -> Result<P>` into a [`Transform`].
pub fn try_transform<D, P, F>(f: F) -> Transform<D, P>
where
    F: Fn(D) -> Result<P> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A fixed tag paired with a payload transform.
///
/// Cloning shares the tag and transform.
pub struct ActionCreator<D, P> {
    tag: Arc<str>,
    transform: Transform<D, P>,
}

impl<D, P> ActionCreator<D, P> {
    /// Create a creator with an infallible transform.
    pub fn new<F>(tag: impl Into<String>, f: F) -> RegistryResult<Self>
    where
        D: 'static,
        P: 'static,
        F: Fn(D) -> P + Send + Sync + 'static,
    {
        Self::from_transform(tag, transform(f))
    }

    /// Create a creator whose transform can fail. The transform's error is
    /// handed back from [`ActionCreator::create`] untouched.
    pub fn fallible<F>(tag: impl Into<String>, f: F) -> RegistryResult<Self>
    where
        F: Fn(D) -> Result<P> + Send + Sync + 'static,
    {
        Self::from_transform(tag, try_transform(f))
    }

    pub fn from_transform(
        tag: impl Into<String>,
        transform: Transform<D, P>,
    ) -> RegistryResult<Self> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(RegistryError::EmptyTag);
        }
        Ok(Self {
            tag: tag.into(),
            transform,
        })
    }

    /// The wire tag stamped on every action this creator builds.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Run the transform and stamp the result with this creator's tag.
    pub fn create(&self, data: D) -> Result<Action<P>> {
        let payload = (self.transform)(data)?;
        Ok(Action {
            tag: self.tag.to_string(),
            payload,
        })
    }

    /// Whether `action` carries this creator's tag.
    pub fn matches<Q>(&self, action: &Action<Q>) -> bool {
        action.tag == *self.tag
    }
}

impl<D, P> Clone for ActionCreator<D, P> {
    fn clone(&self) -> Self {
        Self {
            tag: Arc::clone(&self.tag),
            transform: Arc::clone(&self.transform),
        }
    }
}

impl<D, P> fmt::Debug for ActionCreator<D, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// Free-function form of [`ActionCreator::new`].
pub fn action_creator<D, P, F>(tag: impl Into<String>, f: F) -> RegistryResult<ActionCreator<D, P>>
where
    D: 'static,
    P: 'static,
    F: Fn(D) -> P + Send + Sync + 'static,
{
    ActionCreator::new(tag, f)
}

impl<P> Action<P> {
    /// Whether this action was built by (or looks like it was built by) `creator`.
    pub fn matches<D, Q>(&self, creator: &ActionCreator<D, Q>) -> bool {
        creator.matches(self)
    }
}
