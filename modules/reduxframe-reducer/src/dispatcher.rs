//! The `(state, action) -> state` step function.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use reduxframe_actions::{Action, CreatorRegistry};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::transitions::{SharedTransition, TransitionMap};

/// Routes an action to the one transition registered for its tag.
///
/// Built once from a registry, an initial state, and a transition map; the
/// tag → transition table is never touched again. Unknown tags hand the
/// state back unchanged.
pub struct Dispatcher<S, P> {
    initial_state: S,
    routes: BTreeMap<String, SharedTransition<S, P>>,
}

impl<S, P> Dispatcher<S, P> {
    /// Direct form: build the routing table right away.
    pub fn new<D>(
        registry: &CreatorRegistry<D, P>,
        initial_state: S,
        transitions: TransitionMap<S, P>,
    ) -> Self {
        let pairs = registry.iter().map(|(key, creator)| (creator.tag(), key));
        Self {
            initial_state,
            routes: build_routes(pairs, &transitions),
        }
    }

    /// Advance `state` by one action. `None` starts from the initial state.
    ///
    /// Errors only come from the matched transition and are returned as-is.
    pub fn dispatch(&self, state: Option<S>, action: Action<P>) -> Result<S>
    where
        S: Clone,
    {
        let state = match state {
            Some(state) => state,
            None => self.initial_state.clone(),
        };

        match self.routes.get(&action.tag) {
            Some(transition) => transition.apply(state, action.payload),
            None => {
                trace!(
                    tag = action.tag.as_str(),
                    "No route for tag, passing state through"
                );
                Ok(state)
            }
        }
    }

    /// Parse a `{"type": ..., "payload": ...}` record and dispatch it.
    pub fn dispatch_json(&self, state: Option<S>, raw: &str) -> Result<S>
    where
        S: Clone,
        P: DeserializeOwned,
    {
        let action = Action::from_json(raw)?;
        self.dispatch(state, action)
    }

    /// Whether an action with `tag` would reach a transition.
    pub fn handles(&self, tag: &str) -> bool {
        self.routes.contains_key(tag)
    }

    pub fn handled_tags(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn initial_state(&self) -> &S {
        &self.initial_state
    }
}

impl<S: fmt::Debug, P> fmt::Debug for Dispatcher<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("initial_state", &self.initial_state)
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Curried form: remembers the registry's tag → local key table and the
/// initial state, and turns each transition map into a [`Dispatcher`].
///
/// Each `with_transitions` call builds its routing table once; dispatching
/// through the result never rebuilds it.
#[derive(Debug, Clone)]
pub struct ReducerFactory<S> {
    initial_state: S,
    /// (tag, local key)
    tags: Vec<(String, String)>,
}

impl<S: Clone> ReducerFactory<S> {
    pub fn new<D, P>(registry: &CreatorRegistry<D, P>, initial_state: S) -> Self {
        let tags = registry
            .iter()
            .map(|(key, creator)| (creator.tag().to_string(), key.to_string()))
            .collect();
        Self { initial_state, tags }
    }

    pub fn with_transitions<P>(&self, transitions: TransitionMap<S, P>) -> Dispatcher<S, P> {
        let pairs = self
            .tags
            .iter()
            .map(|(tag, key)| (tag.as_str(), key.as_str()));
        Dispatcher {
            initial_state: self.initial_state.clone(),
            routes: build_routes(pairs, &transitions),
        }
    }
}

/// Curried entry point: `reducer_creator(&registry, initial)` then
/// `.with_transitions(map)`.
pub fn reducer_creator<D, P, S: Clone>(
    registry: &CreatorRegistry<D, P>,
    initial_state: S,
) -> ReducerFactory<S> {
    ReducerFactory::new(registry, initial_state)
}

fn build_routes<'a, S, P>(
    pairs: impl Iterator<Item = (&'a str, &'a str)>,
    transitions: &TransitionMap<S, P>,
) -> BTreeMap<String, SharedTransition<S, P>> {
    let mut routes = BTreeMap::new();
    let mut registered: Vec<&str> = Vec::new();
    let mut unrouted: Vec<&str> = Vec::new();

    for (tag, local_key) in pairs {
        registered.push(local_key);
        match transitions.get(local_key) {
            Some(transition) => {
                routes.insert(tag.to_string(), transition.clone());
            }
            None => unrouted.push(local_key),
        }
    }

    let orphaned: Vec<&str> = transitions
        .keys()
        .filter(|key| !registered.contains(key))
        .collect();

    debug!(
        routes = routes.len(),
        ?unrouted,
        ?orphaned,
        "Built dispatcher routing table"
    );

    routes
}
