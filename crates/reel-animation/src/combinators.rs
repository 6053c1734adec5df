//! Timeline combinators.
//!
//! Every combinator is an ordinary future producing a
//! [`TaskResult`](reel_core::TaskResult). Sequencing is plain `.await` order;
//! the helpers here cover joins, delays, staggering and loops.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use smallvec::SmallVec;

use reel_core::{
    require_thread, seconds_to_nanos, task_context, AnimationError, JoinPolicy, Nanos,
    TaskFuture, TaskResult, TaskThread, Timer,
};

/// Box a future into the erased task type used by the combinators.
pub fn boxed<F>(future: F) -> TaskFuture
where
    F: Future<Output = TaskResult> + 'static,
{
    Box::pin(future)
}

struct JoinChild {
    future: Option<TaskFuture>,
    thread: Option<Rc<TaskThread>>,
}

/// Runs every child concurrently, each on its own forked task thread.
///
/// All children start at the logical instant the join is first polled. The
/// join finishes with the slowest child and leaves the parent's logical time at
/// the latest child end time. How a failing child affects its siblings is
/// decided by the runtime's [`JoinPolicy`]; configuration errors always
/// drop the siblings at once.
pub struct All {
    children: SmallVec<[JoinChild; 4]>,
    error: Option<AnimationError>,
    started: bool,
}

/// Run `children` in parallel. See [`All`].
pub fn all<I>(children: I) -> All
where
    I: IntoIterator<Item = TaskFuture>,
{
    All {
        children: children
            .into_iter()
            .map(|future| JoinChild {
                future: Some(future),
                thread: None,
            })
            .collect(),
        error: None,
        started: false,
    }
}

impl All {
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Future for All {
    type Output = TaskResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let parent = match require_thread() {
            Ok(thread) => thread,
            Err(err) => return Poll::Ready(Err(err)),
        };
        if !this.started {
            this.started = true;
            for child in &mut this.children {
                child.thread = Some(parent.fork());
            }
        }
        let policy = parent
            .runtime()
            .config()
            .map(|config| config.join_policy)
            .unwrap_or_default();

        let mut pending = false;
        for index in 0..this.children.len() {
            let child = &mut this.children[index];
            let (Some(future), Some(thread)) = (child.future.as_mut(), child.thread.as_ref())
            else {
                continue;
            };
            let poll = {
                let _guard = task_context::enter(thread);
                future.as_mut().poll(cx)
            };
            match poll {
                Poll::Pending => pending = true,
                Poll::Ready(result) => {
                    child.future = None;
                    if let Err(err) = result {
                        log::debug!("join child {index} failed: {err}");
                        if policy == JoinPolicy::FailFast || err.is_configuration() {
                            this.abandon_siblings(&parent);
                            return Poll::Ready(Err(err));
                        }
                        this.error.get_or_insert(err);
                    }
                }
            }
        }

        if pending {
            return Poll::Pending;
        }
        parent.advance_to(this.latest_child_time());
        match this.error.take() {
            Some(err) => Poll::Ready(Err(err)),
            None => Poll::Ready(Ok(())),
        }
    }
}

impl All {
    fn latest_child_time(&self) -> Nanos {
        self.children
            .iter()
            .filter_map(|child| child.thread.as_ref().map(|thread| thread.time()))
            .max()
            .unwrap_or(0)
    }

    fn abandon_siblings(&mut self, parent: &TaskThread) {
        let dropped = self
            .children
            .iter_mut()
            .filter_map(|child| child.future.take())
            .count();
        if dropped > 0 {
            log::debug!("failed join dropped {dropped} running child(ren)");
        }
        parent.advance_to(self.latest_child_time());
    }
}

/// Run `children` one after another. The first failure drops the rest
/// unpolled.
pub fn chain<I>(children: I) -> TaskFuture
where
    I: IntoIterator<Item = TaskFuture>,
{
    Box::pin(run_chain(children.into_iter().collect()))
}

async fn run_chain(children: Vec<TaskFuture>) -> TaskResult {
    for child in children {
        child.await?;
    }
    Ok(())
}

/// Suspends for a fixed simulated duration without touching any signal.
pub struct WaitFor {
    duration: Result<Nanos, AnimationError>,
    resume_at: Option<Nanos>,
    timer: Timer,
}

/// Wait `seconds` of simulated time.
pub fn wait_for(seconds: f64) -> WaitFor {
    WaitFor {
        duration: seconds_to_nanos(seconds),
        resume_at: None,
        timer: Timer::new(),
    }
}

impl Future for WaitFor {
    type Output = TaskResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let duration = match &this.duration {
            Ok(duration) => *duration,
            Err(err) => return Poll::Ready(Err(err.clone())),
        };
        let thread = match require_thread() {
            Ok(thread) => thread,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let resume_at = *this
            .resume_at
            .get_or_insert_with(|| thread.time().saturating_add(duration));
        let clock = thread.runtime().frame_clock();
        if clock.now() >= resume_at {
            this.timer.disarm();
            thread.advance_to(resume_at);
            return Poll::Ready(Ok(()));
        }
        this.timer.arm(&clock, resume_at, cx.waker());
        Poll::Pending
    }
}

/// Wait `seconds`, then run `child`.
pub fn delay<F>(seconds: f64, child: F) -> TaskFuture
where
    F: Future<Output = TaskResult> + 'static,
{
    Box::pin(async move {
        wait_for(seconds).await?;
        child.await
    })
}

/// Parallel join where child `i` starts `i * stagger` seconds after the
/// first.
pub fn sequence<I>(stagger: f64, children: I) -> All
where
    I: IntoIterator<Item = TaskFuture>,
{
    all(
        children
            .into_iter()
            .enumerate()
            .map(|(index, child)| delay(stagger * index as f64, child)),
    )
}

/// Run a fresh body `count` times in sequence.
pub fn loop_n<F, Fut>(count: usize, factory: F) -> TaskFuture
where
    F: FnMut(usize) -> Fut + 'static,
    Fut: Future<Output = TaskResult> + 'static,
{
    Box::pin(run_loop(Some(count), factory))
}

/// Run a fresh body forever. Only cancellation ends it.
pub fn loop_forever<F, Fut>(factory: F) -> TaskFuture
where
    F: FnMut(usize) -> Fut + 'static,
    Fut: Future<Output = TaskResult> + 'static,
{
    Box::pin(run_loop(None, factory))
}

async fn run_loop<F, Fut>(count: Option<usize>, mut factory: F) -> TaskResult
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = TaskResult>,
{
    let thread = require_thread()?;
    let mut warned = false;
    let mut iteration = 0usize;
    while count.map_or(true, |count| iteration < count) {
        let before = thread.time();
        factory(iteration).await?;
        if thread.time() == before {
            if !warned {
                log::warn!(
                    "loop iteration {iteration} finished without advancing time; yielding a frame"
                );
                warned = true;
            }
            thread.runtime().frame_clock().next_frame().await?;
        }
        iteration += 1;
    }
    Ok(())
}

/// Run every argument in parallel: `all![a.to(1.0, 0.3), wait_for(0.5)]`.
#[macro_export]
macro_rules! all {
    ($($child:expr),* $(,)?) => {
        $crate::combinators::all([$($crate::combinators::boxed($child)),*])
    };
}

/// Run every argument in order: `chain![a.to(1.0, 0.3), b.to(0.0, 0.3)]`.
#[macro_export]
macro_rules! chain {
    ($($child:expr),* $(,)?) => {
        $crate::combinators::chain([$($crate::combinators::boxed($child)),*])
    };
}

#[cfg(test)]
#[path = "tests/combinator_tests.rs"]
mod tests;
