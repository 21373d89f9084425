//! End-to-end tests for the object protocol: wrapper ordering, advice
//! proxying, reset semantics, and reentrant hook mutation.

use std::cell::RefCell;
use std::rc::Rc;

use weft_object::{advice, hook, Event, Object, ObjectError, Value, WeavingRemoval};

#[test]
fn hooks_fire_in_registration_order_with_identical_args() {
    let object = Object::new(&[]);
    let log: Rc<RefCell<Vec<(usize, Vec<Value>)>>> = Rc::new(RefCell::new(Vec::new()));

    for id in [1usize, 2] {
        let log = log.clone();
        object.add_wrapper(
            Event::BeforeSet("x".to_string()),
            hook(move |args| {
                log.borrow_mut().push((id, args.to_vec()));
                Ok(())
            }),
        );
    }

    object.set_member("x", Value::Int(2)).unwrap();

    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].0, 1);
    assert_eq!(log[1].0, 2);
    let expected = vec![Value::str("x"), Value::Int(2)];
    assert_eq!(log[0].1, expected);
    assert_eq!(log[1].1, expected);
}

#[test]
fn set_hook_records_exactly_once() {
    let object = Object::new(&[]);
    object.set_member("x", Value::Int(1)).unwrap();

    let calls: Rc<RefCell<Vec<Vec<Value>>>> = Rc::new(RefCell::new(Vec::new()));
    let recorder = calls.clone();
    object.add_wrapper(
        Event::BeforeSet("x".to_string()),
        hook(move |args| {
            recorder.borrow_mut().push(args.to_vec());
            Ok(())
        }),
    );

    object.set_member("x", Value::Int(2)).unwrap();

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], vec![Value::str("x"), Value::Int(2)]);
    assert_eq!(object.get_member("x").unwrap(), Value::Int(2));
}

#[test]
fn failing_after_set_hook_leaves_the_write_applied() {
    let object = Object::new(&[]);
    object.add_wrapper(
        Event::AfterSet("x".to_string()),
        hook(|_| Err(ObjectError::Hook("notify failed".to_string()))),
    );

    let result = object.set_member("x", Value::Int(1));
    assert_eq!(result, Err(ObjectError::Hook("notify failed".to_string())));
    // Apply-then-notify: the mutation stands even though notification broke.
    assert!(object.has_member("x"));
}

#[test]
fn advice_runs_exactly_once_per_invocation() {
    let object = Object::new(&[]);
    object
        .set_member(
            "call",
            Value::native(|args| {
                let a = args[0].as_int().unwrap();
                let b = args[1].as_int().unwrap();
                Ok(Value::Int(a + b))
            }),
        )
        .unwrap();
    object.mark_interceptable("call");

    let before_calls = Rc::new(RefCell::new(0));
    let after_calls = Rc::new(RefCell::new(0));
    let before_counter = before_calls.clone();
    let after_counter = after_calls.clone();
    object.add_weaving(
        "call",
        advice(move |_| {
            *before_counter.borrow_mut() += 1;
            Ok(())
        }),
        advice(move |_| {
            *after_counter.borrow_mut() += 1;
            Ok(())
        }),
    );

    let result = object.call(&[Value::Int(3), Value::Int(4)]).unwrap();
    assert_eq!(result, Value::Int(7));
    // Single-execution semantics: each advice half fires once per call.
    assert_eq!(*before_calls.borrow(), 1);
    assert_eq!(*after_calls.borrow(), 1);

    object.call(&[Value::Int(1), Value::Int(1)]).unwrap();
    assert_eq!(*before_calls.borrow(), 2);
    assert_eq!(*after_calls.borrow(), 2);
}

#[test]
fn advice_pairs_execute_in_registration_order() {
    let object = Object::new(&[]);
    object
        .set_member("f", Value::native(|_| Ok(Value::Int(0))))
        .unwrap();
    object.mark_interceptable("f");

    let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    for (before_tag, after_tag) in [("b1", "a1"), ("b2", "a2")] {
        let before_log = order.clone();
        let after_log = order.clone();
        object.add_weaving(
            "f",
            advice(move |_| {
                before_log.borrow_mut().push(before_tag);
                Ok(())
            }),
            advice(move |_| {
                after_log.borrow_mut().push(after_tag);
                Ok(())
            }),
        );
    }

    let proxy = object.get_member("f").unwrap();
    proxy.invoke(&[]).unwrap();
    assert_eq!(*order.borrow(), vec!["b1", "b2", "a1", "a2"]);
}

#[test]
fn advice_receives_invocation_arguments_not_result() {
    let object = Object::new(&[]);
    object
        .set_member("f", Value::native(|_| Ok(Value::Int(99))))
        .unwrap();
    object.mark_interceptable("f");

    let seen: Rc<RefCell<Vec<Vec<Value>>>> = Rc::new(RefCell::new(Vec::new()));
    let before_seen = seen.clone();
    let after_seen = seen.clone();
    object.add_weaving(
        "f",
        advice(move |args| {
            before_seen.borrow_mut().push(args.to_vec());
            Ok(())
        }),
        advice(move |args| {
            after_seen.borrow_mut().push(args.to_vec());
            Ok(())
        }),
    );

    let proxy = object.get_member("f").unwrap();
    let result = proxy.invoke(&[Value::Int(5)]).unwrap();
    assert_eq!(result, Value::Int(99));

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], vec![Value::Int(5)]);
    assert_eq!(seen[1], vec![Value::Int(5)]);
}

#[test]
fn remove_all_weavings_then_again_fails() {
    let object = Object::new(&[]);
    object.add_weaving("f", advice(|_| Ok(())), advice(|_| Ok(())));
    object.add_weaving("f", advice(|_| Ok(())), advice(|_| Ok(())));

    object.remove_weaving("f", WeavingRemoval::All).unwrap();
    assert_eq!(
        object.remove_weaving("f", WeavingRemoval::All),
        Err(ObjectError::NoSuchWeaving("f".to_string()))
    );
}

#[test]
fn unregister_failures_both_shapes() {
    let object = Object::new(&[]);
    let registered = hook(|_| Ok(()));
    let stranger = hook(|_| Ok(()));

    // Never-registered event.
    assert_eq!(
        object.remove_wrapper(&Event::Reset, &registered),
        Err(ObjectError::NoSuchWrapper(Event::Reset))
    );

    // Event with hooks, but not this hook.
    object.add_wrapper(Event::Reset, registered);
    assert_eq!(
        object.remove_wrapper(&Event::Reset, &stranger),
        Err(ObjectError::NoSuchWrapper(Event::Reset))
    );
}

#[test]
fn reset_matches_fresh_object_without_refiring_init() {
    let object = Object::new(&[Value::Int(1)]);
    object.set_member("x", Value::Int(1)).unwrap();
    object.set_meta("m", Value::Int(2));

    let init_fired = Rc::new(RefCell::new(0));
    let counter = init_fired.clone();
    object.add_wrapper(
        Event::Init,
        hook(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        }),
    );

    object.reset().unwrap();

    let fresh = Object::new(&[]);
    assert_eq!(object.has_member("x"), fresh.has_member("x"));
    assert_eq!(object.has_meta("m"), fresh.has_meta("m"));
    assert_eq!(
        object.get_member("x"),
        Err(ObjectError::NoSuchMember("x".to_string()))
    );
    // Reset re-enters Live with empty stores; on_init does not fire again.
    assert_eq!(*init_fired.borrow(), 0);
}

#[test]
fn reentrant_hook_mutation_does_not_disturb_dispatch() {
    let object = Object::new(&[]);
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    // The first hook mutates the hooked object and registers another hook
    // for the same event while dispatch is still iterating.
    let first = {
        let log = log.clone();
        let target = object.clone();
        hook(move |_| {
            log.borrow_mut().push("first");
            target.set_member("y", Value::Int(10))?;
            let log = log.clone();
            target.add_wrapper(
                Event::BeforeSet("x".to_string()),
                hook(move |_| {
                    log.borrow_mut().push("late");
                    Ok(())
                }),
            );
            Ok(())
        })
    };
    let second = {
        let log = log.clone();
        hook(move |_| {
            log.borrow_mut().push("second");
            Ok(())
        })
    };

    object.add_wrapper(Event::BeforeSet("x".to_string()), first);
    object.add_wrapper(Event::BeforeSet("x".to_string()), second);

    object.set_member("x", Value::Int(1)).unwrap();

    // The in-flight snapshot saw exactly [first, second]; the late hook only
    // joins subsequent dispatches.
    assert_eq!(*log.borrow(), vec!["first", "second"]);
    assert_eq!(object.get_member("y").unwrap(), Value::Int(10));

    log.borrow_mut().clear();
    object.set_member("x", Value::Int(2)).unwrap();
    assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
}

#[test]
fn failing_hook_aborts_remaining_hooks() {
    let object = Object::new(&[]);
    let reached = Rc::new(RefCell::new(false));

    object.add_wrapper(
        Event::BeforeSet("x".to_string()),
        hook(|_| Err(ObjectError::Hook("veto".to_string()))),
    );
    let flag = reached.clone();
    object.add_wrapper(
        Event::BeforeSet("x".to_string()),
        hook(move |_| {
            *flag.borrow_mut() = true;
            Ok(())
        }),
    );

    let result = object.set_member("x", Value::Int(1));
    assert_eq!(result, Err(ObjectError::Hook("veto".to_string())));
    assert!(!*reached.borrow());
    // The before hook vetoed, so the write never happened.
    assert!(!object.has_member("x"));
}
