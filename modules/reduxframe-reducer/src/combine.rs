//! Several dispatchers, one keyed state.

use std::collections::BTreeMap;

use anyhow::Result;
use reduxframe_actions::Action;
use tracing::debug;

use crate::dispatcher::Dispatcher;

/// State shape for [`CombinedDispatcher`]: slice name → slice state.
pub type CombinedState<S> = BTreeMap<String, S>;

/// Feeds every action to each slice's dispatcher, each against its own
/// entry in a [`CombinedState`].
///
/// Slices missing from the incoming state start from their own initial
/// state. Entries with no matching slice are kept as they are.
pub struct CombinedDispatcher<S, P> {
    slices: BTreeMap<String, Dispatcher<S, P>>,
}

impl<S, P> CombinedDispatcher<S, P> {
    pub fn new() -> Self {
        Self {
            slices: BTreeMap::new(),
        }
    }

    pub fn slice(mut self, name: impl Into<String>, dispatcher: Dispatcher<S, P>) -> Self {
        let name = name.into();
        if self.slices.contains_key(&name) {
            debug!(slice = name.as_str(), "Replacing slice dispatcher");
        }
        self.slices.insert(name, dispatcher);
        self
    }

    pub fn slice_names(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    /// Initial state of every slice.
    pub fn initial_state(&self) -> CombinedState<S>
    where
        S: Clone,
    {
        self.slices
            .iter()
            .map(|(name, d)| (name.clone(), d.initial_state().clone()))
            .collect()
    }

    /// Run `action` through every slice, in slice-name order. The first
    /// transition error aborts the step and is returned unchanged.
    ///
    /// The incoming state is moved in and is gone on error, including slices
    /// that already advanced. Hosts that need to recover keep a clone of the
    /// previous state.
    pub fn dispatch(
        &self,
        state: Option<CombinedState<S>>,
        action: Action<P>,
    ) -> Result<CombinedState<S>>
    where
        S: Clone,
        P: Clone,
    {
        let mut state = state.unwrap_or_default();
        for (name, dispatcher) in &self.slices {
            let slice = state.remove(name);
            let next = dispatcher.dispatch(slice, action.clone())?;
            state.insert(name.clone(), next);
        }
        Ok(state)
    }
}

impl<S, P> Default for CombinedDispatcher<S, P> {
    fn default() -> Self {
        Self::new()
    }
}
