use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use reel_core::{
    require_thread, seconds_to_nanos, AnimationError, Lerp, Nanos, Signal, TaskResult, Timer,
};

use crate::easing::Easing;

enum TweenState<T> {
    /// Construction failed; the error is reported on the first poll.
    Invalid(AnimationError),
    /// Not yet activated. The start value is captured on the first poll.
    Pending,
    Active {
        start: Nanos,
        from: T,
        last_sample: Option<Nanos>,
    },
    Done,
}

/// Moves a signal from its value at activation to `target` over a fixed
/// simulated duration.
///
/// The start value and start time are captured when the tween is first
/// polled, not when it is built, so a tween placed after a delay starts from
/// whatever the signal holds at that point. On completion the end value is
/// committed exactly and the task's logical time moves to `start + duration`.
pub struct Tween<T: Lerp> {
    signal: Signal<T>,
    target: T,
    duration: Nanos,
    easing: Easing,
    state: TweenState<T>,
    timer: Timer,
}

impl<T: Lerp> Tween<T> {
    pub fn new(signal: &Signal<T>, target: T, seconds: f64, easing: Easing) -> Self {
        let (duration, state) = match seconds_to_nanos(seconds) {
            Ok(duration) if signal.is_derived() => (
                duration,
                TweenState::Invalid(AnimationError::TweenDerived {
                    signal: signal.label(),
                }),
            ),
            Ok(duration) => (duration, TweenState::Pending),
            Err(err) => (0, TweenState::Invalid(err)),
        };
        Self {
            signal: signal.clone(),
            target,
            duration,
            easing,
            state,
            timer: Timer::new(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn duration(&self) -> Nanos {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    fn activate(&mut self, now: Nanos) -> Result<(Nanos, T), AnimationError> {
        if self.signal.is_derived() {
            return Err(AnimationError::TweenDerived {
                signal: self.signal.label(),
            });
        }
        let from = self.signal.try_get()?;
        log::trace!(
            "tween on {} activated at {now}ns for {}ns",
            self.signal.label(),
            self.duration
        );
        Ok((now, from))
    }
}

impl<T: Lerp> Future for Tween<T> {
    type Output = TaskResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let thread = match require_thread() {
            Ok(thread) => thread,
            Err(err) => return Poll::Ready(Err(err)),
        };

        match std::mem::replace(&mut this.state, TweenState::Done) {
            TweenState::Invalid(err) => return Poll::Ready(Err(err)),
            TweenState::Done => return Poll::Ready(Ok(())),
            TweenState::Pending => match this.activate(thread.time()) {
                Ok((start, from)) => {
                    this.state = TweenState::Active {
                        start,
                        from,
                        last_sample: None,
                    }
                }
                Err(err) => return Poll::Ready(Err(err)),
            },
            active => this.state = active,
        }

        let clock = thread.runtime().frame_clock();
        let now = clock.now();
        let TweenState::Active {
            start,
            from,
            last_sample,
        } = &mut this.state
        else {
            return Poll::Ready(Ok(()));
        };
        let start = *start;
        let elapsed = now.saturating_sub(start);
        let value = if elapsed >= this.duration {
            None
        } else if *last_sample == Some(now) {
            // Re-polled within the same frame by a sibling wake-up.
            this.timer.arm(&clock, clock.next_frame_time(), cx.waker());
            return Poll::Pending;
        } else {
            *last_sample = Some(now);
            let fraction = elapsed as f64 / this.duration as f64;
            Some(from.lerp(&this.target, this.easing.transform(fraction)))
        };

        match value {
            Some(value) => {
                if let Err(err) = this.signal.set(value) {
                    this.state = TweenState::Done;
                    this.timer.disarm();
                    return Poll::Ready(Err(err));
                }
                this.timer.arm(&clock, clock.next_frame_time(), cx.waker());
                Poll::Pending
            }
            None => {
                this.state = TweenState::Done;
                this.timer.disarm();
                if let Err(err) = this.signal.set(this.target.clone()) {
                    return Poll::Ready(Err(err));
                }
                thread.advance_to(start + this.duration);
                Poll::Ready(Ok(()))
            }
        }
    }
}

/// Tween constructors on signals.
pub trait Animate<T: Lerp> {
    /// Tween to `target` with the default easing.
    fn to(&self, target: T, seconds: f64) -> Tween<T>;

    fn to_eased(&self, target: T, seconds: f64, easing: Easing) -> Tween<T>;
}

impl<T: Lerp> Animate<T> for Signal<T> {
    fn to(&self, target: T, seconds: f64) -> Tween<T> {
        Tween::new(self, target, seconds, Easing::default())
    }

    fn to_eased(&self, target: T, seconds: f64, easing: Easing) -> Tween<T> {
        Tween::new(self, target, seconds, easing)
    }
}

#[cfg(test)]
#[path = "tests/tween_tests.rs"]
mod tests;
