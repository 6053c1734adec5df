use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::config::Nanos;
use crate::runtime::{RuntimeHandle, WaiterId};
use crate::task_context::require_thread;
use crate::TaskResult;

/// Read-only view of a runtime's simulated clock plus the wake-up queue that
/// suspended operations register with.
#[derive(Clone)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    /// Current simulated time. A torn-down runtime reads as time zero.
    pub fn now(&self) -> Nanos {
        self.runtime.now().unwrap_or(0)
    }

    pub fn frame(&self) -> u64 {
        self.runtime.frame().unwrap_or(0)
    }

    /// Simulated time of the frame after the current one.
    pub fn next_frame_time(&self) -> Nanos {
        self.runtime
            .config()
            .map(|config| config.frame_to_nanos(self.frame() + 1))
            .unwrap_or(0)
    }

    /// Wake `waker` on the first tick whose clock reaches `at`.
    ///
    /// The returned registration removes the waiter when dropped, so a future
    /// that is cancelled mid-suspension leaves nothing behind in the queue.
    pub fn register_wake(&self, at: Nanos, waker: Waker) -> WakeRegistration {
        match self.runtime.register_wake(at, waker) {
            Some((id, fired)) => WakeRegistration::new(self.runtime.clone(), id, at, fired),
            None => WakeRegistration::inactive(self.runtime.clone(), at),
        }
    }

    pub fn next_frame(&self) -> NextFrame {
        NextFrame::new(self.clone())
    }
}

pub struct WakeRegistration {
    runtime: RuntimeHandle,
    id: Option<WaiterId>,
    at: Nanos,
    fired: Rc<Cell<bool>>,
}

impl WakeRegistration {
    fn new(runtime: RuntimeHandle, id: WaiterId, at: Nanos, fired: Rc<Cell<bool>>) -> Self {
        Self {
            runtime,
            id: Some(id),
            at,
            fired,
        }
    }

    fn inactive(runtime: RuntimeHandle, at: Nanos) -> Self {
        Self {
            runtime,
            id: None,
            at,
            fired: Rc::new(Cell::new(true)),
        }
    }

    pub fn at(&self) -> Nanos {
        self.at
    }

    /// Whether the waiter is still queued.
    pub fn is_pending(&self) -> bool {
        self.id.is_some() && !self.fired.get()
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_wake(id);
        }
    }
}

impl Drop for WakeRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            if !self.fired.get() {
                self.runtime.cancel_wake(id);
            }
        }
    }
}

/// Holds at most one pending wake-up for a suspended operation.
#[derive(Default)]
pub struct Timer {
    registration: Option<WakeRegistration>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a wake-up at `at` is queued. Re-arming for the same instant while
    /// the waiter is still pending is a no-op.
    pub fn arm(&mut self, clock: &FrameClock, at: Nanos, waker: &Waker) {
        if let Some(registration) = &self.registration {
            if registration.at() == at && registration.is_pending() {
                return;
            }
        }
        self.registration = Some(clock.register_wake(at, waker.clone()));
    }

    pub fn disarm(&mut self) {
        if let Some(registration) = self.registration.take() {
            registration.cancel();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.registration
            .as_ref()
            .map(WakeRegistration::is_pending)
            .unwrap_or(false)
    }
}

/// Suspends the current task until the next frame and moves its logical time
/// to that frame.
pub struct NextFrame {
    clock: FrameClock,
    target: Option<Nanos>,
    timer: Timer,
}

impl NextFrame {
    fn new(clock: FrameClock) -> Self {
        Self {
            clock,
            target: None,
            timer: Timer::new(),
        }
    }
}

impl Future for NextFrame {
    type Output = TaskResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let thread = match require_thread() {
            Ok(thread) => thread,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let target = *this
            .target
            .get_or_insert_with(|| this.clock.next_frame_time());
        if this.clock.now() >= target {
            this.timer.disarm();
            thread.advance_to(target);
            return Poll::Ready(Ok(()));
        }
        this.timer.arm(&this.clock, target, cx.waker());
        Poll::Pending
    }
}
