//! Reactive signals.
//!
//! A [`Signal`] is a single time-varying cell owned by one scene. It either
//! holds a value that tweens and author code write to, or it is bound to a
//! derivation closure that recomputes its value from other signals when read.
//!
//! Derived signals do not declare their dependencies. They are evaluated
//! recursively on demand and cached against the runtime's revision counter,
//! which moves on every committed write and every frame. Each derived signal
//! carries an evaluation-in-progress marker; re-entering a signal whose marker
//! is set is reported as [`AnimationError::CyclicDerivation`] instead of
//! recursing forever.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::runtime::RuntimeHandle;
use crate::AnimationError;

/// Identifier of a signal, unique within its runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(u64);

impl SignalId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "signal#{}", self.0)
    }
}

struct Derivation<T> {
    compute: Rc<dyn Fn() -> T>,
    evaluating: Cell<bool>,
    // Revision at which the cached value was computed.
    stamp: Cell<Option<u64>>,
}

impl<T> Derivation<T> {
    fn new(compute: Rc<dyn Fn() -> T>) -> Self {
        Self {
            compute,
            evaluating: Cell::new(false),
            stamp: Cell::new(None),
        }
    }
}

struct SignalInner<T> {
    id: SignalId,
    label: RefCell<Option<Rc<str>>>,
    runtime: RuntimeHandle,
    value: RefCell<T>,
    derivation: RefCell<Option<Derivation<T>>>,
    version: Cell<u64>,
}

/// Handle to a reactive value. Cloning the handle shares the cell.
pub struct Signal<T: Clone + 'static> {
    inner: Rc<SignalInner<T>>,
}

impl<T: Clone + 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Create a writable signal holding `value`.
    pub fn new(runtime: &RuntimeHandle, value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                id: SignalId(runtime.alloc_signal_id()),
                label: RefCell::new(None),
                runtime: runtime.clone(),
                value: RefCell::new(value),
                derivation: RefCell::new(None),
                version: Cell::new(0),
            }),
        }
    }

    /// Create a signal whose value is computed from other signals.
    ///
    /// The closure runs once immediately to seed the cache, then again on
    /// reads whenever something it could observe has changed.
    pub fn derived(runtime: &RuntimeHandle, compute: impl Fn() -> T + 'static) -> Self {
        let compute: Rc<dyn Fn() -> T> = Rc::new(compute);
        runtime.enter_evaluation();
        let initial = compute();
        let fault = runtime.exit_evaluation();
        let signal = Self::new(runtime, initial);
        let derivation = Derivation::new(compute);
        match fault {
            Some(fault) => log::warn!(
                "initial evaluation of {} observed a fault: {fault}",
                signal.label()
            ),
            None => derivation.stamp.set(runtime.revision()),
        }
        *signal.inner.derivation.borrow_mut() = Some(derivation);
        signal
    }

    pub fn id(&self) -> SignalId {
        self.inner.id
    }

    /// Attach a human-readable name used in diagnostics.
    pub fn with_label(self, label: &str) -> Self {
        *self.inner.label.borrow_mut() = Some(Rc::from(label));
        self
    }

    pub fn label(&self) -> String {
        match &*self.inner.label.borrow() {
            Some(label) => label.to_string(),
            None => self.inner.id.to_string(),
        }
    }

    pub fn runtime(&self) -> &RuntimeHandle {
        &self.inner.runtime
    }

    pub fn is_derived(&self) -> bool {
        self.inner.derivation.borrow().is_some()
    }

    /// Number of writes committed to this signal.
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    pub fn ptr_eq(&self, other: &Signal<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Current value. Never fails: if a derivation cannot be evaluated the
    /// fault is logged and the last cached value is returned.
    pub fn get(&self) -> T {
        match self.try_get() {
            Ok(value) => value,
            Err(err) => {
                if self.inner.runtime.evaluation_depth() == 0 {
                    log::error!("reading {} failed: {err}", self.label());
                }
                self.inner.value.borrow().clone()
            }
        }
    }

    /// Current value, surfacing derivation faults.
    pub fn try_get(&self) -> Result<T, AnimationError> {
        let compute = {
            let derivation = self.inner.derivation.borrow();
            let Some(derivation) = derivation.as_ref() else {
                return Ok(self.inner.value.borrow().clone());
            };
            let revision = self.inner.runtime.revision();
            if revision.is_some() && derivation.stamp.get() == revision {
                return Ok(self.inner.value.borrow().clone());
            }
            if derivation.evaluating.get() {
                let fault = AnimationError::CyclicDerivation {
                    signal: self.label(),
                };
                self.inner.runtime.report_fault(fault.clone());
                return Err(fault);
            }
            derivation.evaluating.set(true);
            Rc::clone(&derivation.compute)
        };

        let runtime = &self.inner.runtime;
        runtime.enter_evaluation();
        let value = compute();
        let fault = runtime.exit_evaluation();

        let derivation = self.inner.derivation.borrow();
        if let Some(derivation) = derivation.as_ref() {
            derivation.evaluating.set(false);
            if fault.is_none() {
                derivation.stamp.set(runtime.revision());
            }
        }
        drop(derivation);

        match fault {
            Some(fault) => Err(fault),
            None => {
                *self.inner.value.borrow_mut() = value.clone();
                Ok(value)
            }
        }
    }

    /// Commit a new value. Fails for derived signals and for writes issued
    /// from inside a derivation.
    pub fn set(&self, value: T) -> Result<(), AnimationError> {
        if self.is_derived() {
            return Err(AnimationError::WriteToDerived {
                signal: self.label(),
            });
        }
        if self.inner.runtime.evaluation_depth() > 0 {
            let fault = AnimationError::WriteDuringDerivation {
                signal: self.label(),
            };
            self.inner.runtime.report_fault(fault.clone());
            return Err(fault);
        }
        *self.inner.value.borrow_mut() = value;
        self.inner.version.set(self.inner.version.get() + 1);
        self.inner.runtime.bump_revision();
        Ok(())
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<(), AnimationError> {
        let next = f(&self.try_get()?);
        self.set(next)
    }

    /// Bind the signal to a derivation. The current value stays readable as
    /// the stale cache until the first evaluation.
    pub fn bind(&self, compute: impl Fn() -> T + 'static) {
        *self.inner.derivation.borrow_mut() = Some(Derivation::new(Rc::new(compute)));
        self.inner.runtime.bump_revision();
    }

    /// Drop the derivation, freezing the current value and making the signal
    /// writable again.
    pub fn unbind(&self) {
        let frozen = self.get();
        *self.inner.derivation.borrow_mut() = None;
        *self.inner.value.borrow_mut() = frozen;
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label.borrow())
            .field("value", &self.inner.value.borrow())
            .field("derived", &self.is_derived())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/signal_tests.rs"]
mod tests;
