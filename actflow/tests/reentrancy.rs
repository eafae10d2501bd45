//! The one-dispatch-at-a-time rule.

use actflow::{DispatchError, Dispatcher, FailurePolicy, StoreRef, testing::RecordingStore};
use std::sync::Arc;

mod common;
use common::ForwardingStore;

#[test]
fn test_nested_dispatch_is_rejected() {
    let dispatcher = Dispatcher::<u32>::new("app");
    let forwarder = Arc::new(ForwardingStore::new("save", false));
    forwarder.point_at(&dispatcher);
    dispatcher.connect_to(forwarder.clone());

    dispatcher.dispatch("trigger", &1).unwrap();

    let outcomes = forwarder.outcomes.lock().unwrap().clone();
    assert_eq!(outcomes.len(), 1);
    let message = outcomes[0].clone().unwrap_err();
    assert!(message.contains("`save`"), "{message}");
    assert!(message.contains("`app`"), "{message}");

    // The flag was released: the next top-level dispatch works.
    assert!(!dispatcher.is_dispatching());
    dispatcher.dispatch("save", &2).unwrap();
}

#[test]
fn test_propagated_reentrancy_fails_outer_dispatch() {
    let dispatcher = Dispatcher::<u32>::new("app");
    let forwarder = Arc::new(ForwardingStore::new("save", true));
    let after = Arc::new(RecordingStore::<u32>::new());
    forwarder.point_at(&dispatcher);
    dispatcher.connect_to(vec![
        StoreRef::from(forwarder.clone()),
        StoreRef::from(after.clone()),
    ]);

    let err = dispatcher.dispatch("trigger", &1).unwrap_err();
    match err.reentrancy() {
        Some(DispatchError::Reentrant {
            dispatcher: name,
            dispatcher_id,
            action,
        }) => {
            assert_eq!(&**name, "app");
            assert_eq!(*dispatcher_id, dispatcher.id());
            assert_eq!(action, "save");
        }
        other => panic!("expected reentrancy, got {other:?}"),
    }
    assert!(after.calls().is_empty());

    dispatcher.dispatch("trigger", &1).unwrap_err();
    dispatcher.dispatch("save", &3).unwrap();
    assert_eq!(after.payloads("onSave"), vec![3]);
}

#[test]
fn test_reentrancy_error_tells_namesakes_apart() {
    let first = Dispatcher::<u32>::new("cart");
    let second = Dispatcher::<u32>::new("cart");
    let forwarder = Arc::new(ForwardingStore::new("save", true));
    forwarder.point_at(&second);
    second.connect_to(forwarder.clone());

    let err = second.dispatch("trigger", &1).unwrap_err();
    match err.reentrancy() {
        Some(DispatchError::Reentrant { dispatcher_id, .. }) => {
            assert_eq!(*dispatcher_id, second.id());
            assert_ne!(*dispatcher_id, first.id());
        }
        other => panic!("expected reentrancy, got {other:?}"),
    }
}

#[test]
fn test_dispatch_on_other_instance_is_allowed() {
    let ui = Dispatcher::<u32>::new("ui");
    let data = Dispatcher::<u32>::new("data");
    let forwarder = Arc::new(ForwardingStore::new("refresh", true));
    let recorder = Arc::new(RecordingStore::<u32>::new());
    forwarder.point_at(&data);
    ui.connect_to(forwarder.clone());
    data.connect_to(recorder.clone());

    ui.dispatch("trigger", &5).unwrap();

    assert_eq!(recorder.payloads("onRefresh"), vec![5]);
    assert_eq!(*forwarder.outcomes.lock().unwrap(), vec![Ok(())]);
}

#[test]
fn test_poison_policy_wedges_after_handler_error() {
    let dispatcher = Dispatcher::<u32>::with_policy("app", FailurePolicy::Poison);
    let forwarder = Arc::new(ForwardingStore::new("save", true));
    forwarder.point_at(&dispatcher);
    dispatcher.connect_to(forwarder.clone());

    let err = dispatcher.dispatch("trigger", &1).unwrap_err();
    assert!(err.reentrancy().is_some());
    assert!(dispatcher.is_poisoned());

    let err = dispatcher.dispatch("save", &1).unwrap_err();
    assert!(matches!(err, DispatchError::Poisoned { .. }));
}
