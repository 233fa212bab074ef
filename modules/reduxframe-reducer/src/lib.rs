//! Reducer dispatch over a creator registry.
//!
//! A [`Dispatcher`] is a pure step function: given the current state (or
//! none) and an action, it returns the next state. Its routing table maps
//! each registry tag to the transition registered under the matching local
//! key. Tags with no route pass the state through untouched.
//!
//! Two ways to build one:
//! - direct: `Dispatcher::new(&registry, initial, transitions)`
//! - curried: `reducer_creator(&registry, initial).with_transitions(transitions)`

pub mod combine;
pub mod dispatcher;
pub mod transitions;

pub use combine::{CombinedDispatcher, CombinedState};
pub use dispatcher::{reducer_creator, Dispatcher, ReducerFactory};
pub use transitions::{SharedTransition, Transition, TransitionMap};
