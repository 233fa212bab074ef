//! Dispatcher behavior end to end: registry → transitions → step function.
//! The "host" here is just a loop threading state through `dispatch`.

use std::sync::Arc;

use reduxframe_actions::{Action, CreatorRegistry, Namespace};
use reduxframe_reducer::{reducer_creator, CombinedDispatcher, Dispatcher, TransitionMap};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn counter_registry() -> CreatorRegistry<i64, i64> {
    Namespace::new("counter")
        .registry()
        .action("increment", |n: i64| n)
        .build()
        .unwrap()
}

fn counter_dispatcher() -> Dispatcher<i64, i64> {
    Dispatcher::new(
        &counter_registry(),
        0,
        TransitionMap::new().on("increment", |state: i64, payload: i64| state + payload),
    )
}

/// Every transition records which local key it belongs to.
fn recording_dispatcher() -> (CreatorRegistry<(), ()>, Dispatcher<Vec<&'static str>, ()>) {
    let registry = CreatorRegistry::builder()
        .namespace("audit")
        .action("open", |_: ()| ())
        .action("close", |_: ()| ())
        .action("archive", |_: ()| ())
        .build()
        .unwrap();

    let mut transitions = TransitionMap::new();
    for key in ["open", "close", "archive"] {
        transitions = transitions.on(key, move |mut seen: Vec<&'static str>, _: ()| {
            seen.push(key);
            seen
        });
    }

    let dispatcher = Dispatcher::new(&registry, Vec::new(), transitions);
    (registry, dispatcher)
}

// =========================================================================
// Concrete scenarios
// =========================================================================

#[test]
fn increment_under_namespace_adds_payload() {
    init_tracing();
    let dispatcher = counter_dispatcher();
    let increment = counter_registry().get("increment").unwrap().create(5).unwrap();

    assert_eq!(increment.tag, "counter/increment");
    assert_eq!(dispatcher.dispatch(Some(0), increment).unwrap(), 5);
}

#[test]
fn unregistered_tag_leaves_state_alone() {
    let dispatcher = counter_dispatcher();
    let next = dispatcher
        .dispatch(Some(5), Action::new("counter/decrement", 1))
        .unwrap();
    assert_eq!(next, 5);
}

#[test]
fn bare_reset_replaces_state() {
    let registry = CreatorRegistry::builder()
        .action("reset", |_: ()| Value::Null)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(
        &registry,
        0,
        TransitionMap::new().on("reset", |_: i64, _: Value| 0),
    );

    let reset = registry.get("reset").unwrap().create(()).unwrap();
    assert_eq!(reset, Action::new("reset", Value::Null));
    assert_eq!(dispatcher.dispatch(Some(99), reset).unwrap(), 0);
}

// =========================================================================
// Invariants
// =========================================================================

#[test]
fn passthrough_returns_the_same_state_value() {
    let registry = CreatorRegistry::builder()
        .action("push", |n: i32| n)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(
        &registry,
        Arc::new(Vec::new()),
        TransitionMap::new().on("push", |state: Arc<Vec<i32>>, n: i32| {
            let mut next = (*state).clone();
            next.push(n);
            Arc::new(next)
        }),
    );

    let state = Arc::new(vec![1, 2, 3]);
    let next = dispatcher
        .dispatch(Some(Arc::clone(&state)), Action::new("never-registered", 4))
        .unwrap();

    assert!(Arc::ptr_eq(&state, &next));
}

#[test]
fn missing_state_falls_back_to_initial() {
    let dispatcher = counter_dispatcher();
    assert_eq!(
        dispatcher.dispatch(None, Action::new("nobody/home", 1)).unwrap(),
        *dispatcher.initial_state()
    );
    assert_eq!(
        dispatcher
            .dispatch(None, Action::new("counter/increment", 3))
            .unwrap(),
        3
    );
}

#[test]
fn each_tag_reaches_exactly_its_own_transition() {
    let (registry, dispatcher) = recording_dispatcher();

    for (key, creator) in registry.iter() {
        let seen = dispatcher.dispatch(None, creator.create(()).unwrap()).unwrap();
        assert_eq!(seen, vec![key]);
    }
}

#[test]
fn dispatch_is_deterministic() {
    let dispatcher = counter_dispatcher();
    let results: Vec<i64> = (0..5)
        .map(|_| {
            dispatcher
                .dispatch(Some(10), Action::new("counter/increment", 7))
                .unwrap()
        })
        .collect();
    assert!(results.iter().all(|r| *r == 17));
}

#[test]
fn host_loop_threads_state_through_actions() {
    let (registry, dispatcher) = recording_dispatcher();
    let open = registry.get("open").unwrap();
    let close = registry.get("close").unwrap();

    let actions = vec![
        open.create(()).unwrap(),
        Action::new("foreign/event", ()),
        close.create(()).unwrap(),
        open.create(()).unwrap(),
    ];

    let mut state = None;
    for action in actions {
        state = Some(dispatcher.dispatch(state, action).unwrap());
    }

    assert_eq!(state.unwrap(), vec!["open", "close", "open"]);
}

// =========================================================================
// Errors
// =========================================================================

#[derive(Debug, PartialEq)]
struct Overdrawn {
    balance: i64,
}

impl std::fmt::Display for Overdrawn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "balance would drop to {}", self.balance)
    }
}

impl std::error::Error for Overdrawn {}

#[test]
fn transition_error_is_returned_unchanged() {
    let registry = Namespace::new("account")
        .registry()
        .action("withdraw", |n: i64| n)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(
        &registry,
        100,
        TransitionMap::new().try_on("withdraw", |balance: i64, amount: i64| {
            let next = balance - amount;
            if next < 0 {
                return Err(Overdrawn { balance: next }.into());
            }
            Ok(next)
        }),
    );

    let withdraw = registry.get("withdraw").unwrap();
    assert_eq!(
        dispatcher.dispatch(None, withdraw.create(30).unwrap()).unwrap(),
        70
    );

    let err = dispatcher
        .dispatch(Some(10), withdraw.create(30).unwrap())
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<Overdrawn>(),
        Some(&Overdrawn { balance: -20 })
    );
}

// =========================================================================
// Calling conventions
// =========================================================================

#[test]
fn curried_form_matches_direct_form() {
    let registry = counter_registry();
    let factory = reducer_creator(&registry, 0);

    let add = factory
        .with_transitions(TransitionMap::new().on("increment", |s: i64, p: i64| s + p));
    let mul = factory
        .with_transitions(TransitionMap::new().on("increment", |s: i64, p: i64| s * p));
    let direct = counter_dispatcher();

    let action = || registry.get("increment").unwrap().create(4).unwrap();
    assert_eq!(add.dispatch(Some(3), action()).unwrap(), 7);
    assert_eq!(mul.dispatch(Some(3), action()).unwrap(), 12);
    assert_eq!(direct.dispatch(Some(3), action()).unwrap(), 7);
}

#[test]
fn json_records_dispatch_like_typed_actions() {
    let registry = Namespace::new("todos")
        .registry()
        .action("add", |title: String| json!({ "title": title }))
        .action("clear", |_: String| Value::Null)
        .build()
        .unwrap();

    let dispatcher = Dispatcher::new(
        &registry,
        Vec::<String>::new(),
        TransitionMap::new()
            .try_on("add", |mut titles: Vec<String>, payload: Value| {
                let title: String = serde_json::from_value(payload["title"].clone())?;
                titles.push(title);
                Ok(titles)
            })
            .on("clear", |_: Vec<String>, _: Value| Vec::new()),
    );

    let state = dispatcher
        .dispatch_json(None, r#"{"type":"todos/add","payload":{"title":"milk"}}"#)
        .unwrap();
    let state = dispatcher
        .dispatch_json(Some(state), r#"{"type":"todos/add","payload":{"title":"eggs"}}"#)
        .unwrap();
    assert_eq!(state, vec!["milk", "eggs"]);

    let state = dispatcher
        .dispatch_json(Some(state), r#"{"type":"todos/clear","payload":null}"#)
        .unwrap();
    assert!(state.is_empty());

    assert!(dispatcher.dispatch_json(None, "not json").is_err());
}

// =========================================================================
// Sharing and combining
// =========================================================================

#[test]
fn dispatcher_is_shareable_across_threads() {
    let dispatcher = counter_dispatcher();

    let totals: Vec<i64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=4i64)
            .map(|n| {
                let dispatcher = &dispatcher;
                scope.spawn(move || {
                    dispatcher
                        .dispatch(Some(n), Action::new("counter/increment", n))
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(totals, vec![2, 4, 6, 8]);
}

#[test]
fn combined_dispatcher_routes_into_slices() {
    let left = Namespace::new("left")
        .registry()
        .action("add", |n: i64| n)
        .build()
        .unwrap();
    let right = Namespace::new("right")
        .registry()
        .action("add", |n: i64| n)
        .build()
        .unwrap();

    let add = || TransitionMap::new().on("add", |s: i64, p: i64| s + p);
    let combined = CombinedDispatcher::new()
        .slice("left", Dispatcher::new(&left, 0, add()))
        .slice("right", Dispatcher::new(&right, 100, add()));

    let state = combined
        .dispatch(None, left.get("add").unwrap().create(5).unwrap())
        .unwrap();
    assert_eq!(state["left"], 5);
    assert_eq!(state["right"], 100);

    let state = combined
        .dispatch(Some(state), right.get("add").unwrap().create(1).unwrap())
        .unwrap();
    assert_eq!(state["left"], 5);
    assert_eq!(state["right"], 101);

    assert_eq!(
        combined.slice_names().collect::<Vec<_>>(),
        vec!["left", "right"]
    );
    assert_eq!(combined.initial_state()["right"], 100);
}

#[test]
fn combined_error_comes_back_and_host_keeps_its_copy() {
    let registry = CreatorRegistry::builder()
        .action("tick", |n: i64| n)
        .build()
        .unwrap();

    let combined = CombinedDispatcher::new()
        .slice(
            "a_counter",
            Dispatcher::new(
                &registry,
                0,
                TransitionMap::new().on("tick", |s: i64, p: i64| s + p),
            ),
        )
        .slice(
            "b_guard",
            Dispatcher::new(
                &registry,
                0,
                TransitionMap::new().try_on("tick", |s: i64, p: i64| {
                    if p < 0 {
                        return Err(Overdrawn { balance: s + p }.into());
                    }
                    Ok(s + p)
                }),
            ),
        );

    let state = combined.dispatch(None, Action::new("tick", 2)).unwrap();
    let previous = state.clone();

    let err = combined
        .dispatch(Some(state), Action::new("tick", -5))
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<Overdrawn>(),
        Some(&Overdrawn { balance: -3 })
    );

    assert_eq!(previous["a_counter"], 2);
    assert_eq!(previous["b_guard"], 2);
}
