//! Transition functions keyed by local key.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use anyhow::Result;

/// Pure state update. No I/O, no side effects.
///
/// Implemented for any `Fn(S, P) -> Result<S>`; infallible closures go
/// through [`TransitionMap::on`].
pub trait Transition<S, P>: Send + Sync {
    fn apply(&self, state: S, payload: P) -> Result<S>;
}

impl<S, P, F> Transition<S, P> for F
where
    F: Fn(S, P) -> Result<S> + Send + Sync,
{
    fn apply(&self, state: S, payload: P) -> Result<S> {
        self(state, payload)
    }
}

pub type SharedTransition<S, P> = Arc<dyn Transition<S, P>>;

/// Local key → transition. Keys must match the local keys of the registry
/// the dispatcher is built from; extra keys are ignored.
pub struct TransitionMap<S, P> {
    transitions: BTreeMap<String, SharedTransition<S, P>>,
}

impl<S, P> TransitionMap<S, P> {
    pub fn new() -> Self {
        Self {
            transitions: BTreeMap::new(),
        }
    }

    /// Register an infallible transition.
    pub fn on<F>(self, local_key: impl Into<String>, f: F) -> Self
    where
        S: 'static,
        P: 'static,
        F: Fn(S, P) -> S + Send + Sync + 'static,
    {
        self.insert(local_key, Arc::new(move |state: S, payload: P| -> Result<S> {
            Ok(f(state, payload))
        }))
    }

    /// Register a transition that can fail. Its error is returned from
    /// dispatch unchanged.
    pub fn try_on<F>(self, local_key: impl Into<String>, f: F) -> Self
    where
        F: Fn(S, P) -> Result<S> + Send + Sync + 'static,
    {
        self.insert(local_key, Arc::new(f))
    }

    pub fn insert(
        mut self,
        local_key: impl Into<String>,
        transition: SharedTransition<S, P>,
    ) -> Self {
        self.transitions.insert(local_key.into(), transition);
        self
    }

    pub fn get(&self, local_key: &str) -> Option<&SharedTransition<S, P>> {
        self.transitions.get(local_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.transitions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

impl<S, P> Default for TransitionMap<S, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, P> Clone for TransitionMap<S, P> {
    fn clone(&self) -> Self {
        Self {
            transitions: self.transitions.clone(),
        }
    }
}

impl<S, P> fmt::Debug for TransitionMap<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.transitions.keys()).finish()
    }
}
