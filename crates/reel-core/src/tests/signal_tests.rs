use super::*;
use crate::runtime::Runtime;

#[test]
fn plain_signal_reads_back_writes() {
    let runtime = Runtime::default();
    let signal = Signal::new(&runtime.handle(), 1.0f64);
    assert_eq!(signal.get(), 1.0);
    signal.set(4.0).unwrap();
    signal.update(|value| value * 2.0).unwrap();
    assert_eq!(signal.get(), 8.0);
    assert_eq!(signal.version(), 2);
    assert!(!signal.is_derived());
}

#[test]
fn derived_signal_tracks_its_inputs() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let width = Signal::new(&handle, 2.0f64);
    let source = width.clone();
    let area = Signal::derived(&handle, move || source.get() * source.get());

    assert_eq!(area.get(), 4.0);
    width.set(3.0).unwrap();
    assert_eq!(area.get(), 9.0);
    assert!(area.is_derived());
}

#[test]
fn derivation_is_cached_until_the_revision_moves() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let derived = Signal::derived(&handle, move || {
        counter.set(counter.get() + 1);
        1
    });
    assert_eq!(calls.get(), 1);

    derived.get();
    derived.get();
    assert_eq!(calls.get(), 1);

    runtime.advance_frame();
    derived.get();
    derived.get();
    assert_eq!(calls.get(), 2);
}

#[test]
fn writing_a_derived_signal_is_rejected() {
    let runtime = Runtime::default();
    let derived = Signal::derived(&runtime.handle(), || 1).with_label("constant");
    assert_eq!(
        derived.set(2),
        Err(AnimationError::WriteToDerived {
            signal: "constant".into()
        })
    );
    assert_eq!(derived.get(), 1);
}

#[test]
fn bind_and_unbind_switch_between_plain_and_derived() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let input = Signal::new(&handle, 10);
    let output = Signal::new(&handle, 0);

    let source = input.clone();
    output.bind(move || source.get() + 1);
    assert_eq!(output.get(), 11);
    assert!(output.set(5).is_err());

    output.unbind();
    input.set(20).unwrap();
    assert_eq!(output.get(), 11);
    output.set(5).unwrap();
    assert_eq!(output.get(), 5);
}

#[test]
fn cyclic_derivation_is_reported_not_recursed() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let a = Signal::new(&handle, 1).with_label("a");
    let b = Signal::new(&handle, 2).with_label("b");

    let from_b = b.clone();
    a.bind(move || from_b.get() + 1);
    let from_a = a.clone();
    b.bind(move || from_a.get() + 1);

    assert_eq!(
        a.try_get(),
        Err(AnimationError::CyclicDerivation { signal: "a".into() })
    );
    // The lenient read falls back to the cached value.
    assert_eq!(a.get(), 1);
    assert!(matches!(
        b.try_get(),
        Err(AnimationError::CyclicDerivation { .. })
    ));
}

#[test]
fn self_referential_derivation_is_reported() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let signal = Signal::new(&handle, 0).with_label("self");
    let inner = signal.clone();
    signal.bind(move || inner.get() + 1);
    assert!(matches!(
        signal.try_get(),
        Err(AnimationError::CyclicDerivation { .. })
    ));
}

#[test]
fn writes_from_inside_a_derivation_fail() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let victim = Signal::new(&handle, 0).with_label("victim");
    let target = victim.clone();
    let impure = Signal::new(&handle, 0);
    impure.bind(move || {
        let _ = target.set(99);
        1
    });

    assert_eq!(
        impure.try_get(),
        Err(AnimationError::WriteDuringDerivation {
            signal: "victim".into()
        })
    );
    assert_eq!(victim.get(), 0);
}

#[test]
fn a_healthy_read_follows_a_faulted_one() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let a = Signal::new(&handle, 0);
    let inner = a.clone();
    a.bind(move || inner.get() + 1);
    assert!(a.try_get().is_err());

    let plain = Signal::new(&handle, 3);
    let source = plain.clone();
    let doubled = Signal::derived(&handle, move || source.get() * 2);
    assert_eq!(doubled.try_get(), Ok(6));
}

#[test]
fn signals_stay_readable_after_runtime_teardown() {
    let runtime = Runtime::default();
    let signal = Signal::new(&runtime.handle(), String::from("kept"));
    drop(runtime);
    assert_eq!(signal.get(), "kept");
}
