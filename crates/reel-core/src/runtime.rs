use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, Waker};

use smallvec::SmallVec;

use crate::collections::HashMap;
use crate::config::{nanos_to_seconds, Nanos, TimelineConfig};
use crate::frame_clock::FrameClock;
use crate::task_context::{self, current_thread, TaskThread};
use crate::{AnimationError, TaskResult};

pub type TaskId = u64;
pub(crate) type WaiterId = u64;

/// Boxed root or child operation driven by the scheduler.
pub type TaskFuture = Pin<Box<dyn Future<Output = TaskResult> + 'static>>;

/// Lifecycle of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Pending,
    Running,
    Suspended,
    Completed,
    Failed,
    Aborted,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Aborted
        )
    }
}

struct TaskStatus {
    name: String,
    state: Cell<TaskState>,
    error: RefCell<Option<AnimationError>>,
    finished_at: Cell<Option<Nanos>>,
}

impl TaskStatus {
    fn new(name: String) -> Self {
        Self {
            name,
            state: Cell::new(TaskState::Pending),
            error: RefCell::new(None),
            finished_at: Cell::new(None),
        }
    }

    fn finish(&self, state: TaskState, at: Nanos) {
        self.state.set(state);
        self.finished_at.set(Some(at));
    }
}

struct TaskEntry {
    future: Option<TaskFuture>,
    thread: Rc<TaskThread>,
    status: Rc<TaskStatus>,
    waker: Waker,
    parent: Option<TaskId>,
}

#[derive(Clone)]
struct Waiter {
    id: WaiterId,
    resume_at: Nanos,
    waker: Waker,
    fired: Rc<Cell<bool>>,
}

/// Tasks woken since the last drain, in wake order.
///
/// `Waker` must be `Send + Sync`, so this is the one piece of runtime state
/// behind a lock even though the scheduler itself is single-threaded.
#[derive(Default)]
struct ReadyQueue {
    queue: Mutex<VecDeque<TaskId>>,
}

impl ReadyQueue {
    fn push(&self, id: TaskId) {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        if !queue.contains(&id) {
            queue.push_back(id);
        }
    }

    fn pop(&self) -> Option<TaskId> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

struct TaskWaker {
    id: TaskId,
    ready: Arc<ReadyQueue>,
}

impl futures_task::ArcWake for TaskWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.ready.push(arc_self.id);
    }
}

/// Bookkeeping for derived-signal evaluation: nesting depth and the first
/// fault raised anywhere in the current evaluation stack.
#[derive(Default)]
struct EvaluationTracker {
    depth: Cell<usize>,
    fault: RefCell<Option<AnimationError>>,
}

struct RuntimeInner {
    config: TimelineConfig,
    frame: Cell<u64>,
    now: Cell<Nanos>,
    revision: Cell<u64>,
    waiters: RefCell<VecDeque<Waiter>>,
    next_waiter_id: Cell<WaiterId>,
    tasks: RefCell<HashMap<TaskId, TaskEntry>>,
    next_task_id: Cell<TaskId>,
    ready: Arc<ReadyQueue>,
    evaluation: EvaluationTracker,
    next_signal_id: Cell<u64>,
}

impl RuntimeInner {
    fn new(config: TimelineConfig) -> Self {
        Self {
            config,
            frame: Cell::new(0),
            now: Cell::new(0),
            revision: Cell::new(0),
            waiters: RefCell::new(VecDeque::new()),
            next_waiter_id: Cell::new(1),
            tasks: RefCell::new(HashMap::default()),
            next_task_id: Cell::new(1),
            ready: Arc::new(ReadyQueue::default()),
            evaluation: EvaluationTracker::default(),
            next_signal_id: Cell::new(1),
        }
    }

    fn bump_revision(&self) {
        self.revision.set(self.revision.get().wrapping_add(1));
    }

    fn spawn(&self, handle: RuntimeHandle, name: String, future: TaskFuture) -> TaskHandle {
        let id = self.next_task_id.get();
        self.next_task_id.set(id + 1);

        // Tasks spawned from inside another task of this runtime become its
        // children and are aborted with it.
        let parent = current_thread()
            .filter(|thread| thread.runtime().same_runtime(&handle))
            .map(|thread| thread.task_id());
        let thread = Rc::new(TaskThread::new(handle.clone(), id, self.now.get()));
        let status = Rc::new(TaskStatus::new(name));
        let waker = futures_task::waker(Arc::new(TaskWaker {
            id,
            ready: Arc::clone(&self.ready),
        }));
        log::debug!(
            "spawned task {:?} (#{id}) at {:.3}s",
            status.name,
            nanos_to_seconds(self.now.get())
        );
        self.tasks.borrow_mut().insert(
            id,
            TaskEntry {
                future: Some(future),
                thread,
                status: Rc::clone(&status),
                waker,
                parent,
            },
        );
        self.poll_task(id);
        TaskHandle {
            id,
            status,
            runtime: handle,
        }
    }

    fn poll_task(&self, id: TaskId) {
        let (mut future, thread, status, waker) = {
            let mut tasks = self.tasks.borrow_mut();
            let Some(entry) = tasks.get_mut(&id) else {
                return;
            };
            if entry.status.state.get().is_terminal() {
                return;
            }
            // Already on the poll stack (woken by its own descendant).
            let Some(future) = entry.future.take() else {
                return;
            };
            (
                future,
                Rc::clone(&entry.thread),
                Rc::clone(&entry.status),
                entry.waker.clone(),
            )
        };

        status.state.set(TaskState::Running);
        let mut cx = Context::from_waker(&waker);
        let poll = {
            let _guard = task_context::enter(&thread);
            future.as_mut().poll(&mut cx)
        };

        match poll {
            Poll::Pending => {
                if status.state.get() == TaskState::Aborted {
                    drop(future);
                    return;
                }
                status.state.set(TaskState::Suspended);
                let leftover = match self.tasks.borrow_mut().get_mut(&id) {
                    Some(entry) => {
                        entry.future = Some(future);
                        None
                    }
                    None => Some(future),
                };
                drop(leftover);
            }
            Poll::Ready(result) => {
                let entry = self.tasks.borrow_mut().remove(&id);
                drop(entry);
                drop(future);
                if status.state.get() == TaskState::Aborted {
                    return;
                }
                let now = self.now.get();
                match result {
                    Ok(()) => {
                        status.finish(TaskState::Completed, now);
                        log::debug!(
                            "task {:?} (#{id}) completed at {:.3}s (logical {:.3}s)",
                            status.name,
                            nanos_to_seconds(now),
                            nanos_to_seconds(thread.time())
                        );
                    }
                    Err(err) => {
                        log::error!("task {:?} (#{id}) failed: {err}", status.name);
                        *status.error.borrow_mut() = Some(err);
                        status.finish(TaskState::Failed, now);
                    }
                }
            }
        }
    }

    fn abort_task(&self, id: TaskId) {
        let entry = self.tasks.borrow_mut().remove(&id);
        let Some(entry) = entry else {
            return;
        };
        if !entry.status.state.get().is_terminal() {
            entry.status.finish(TaskState::Aborted, self.now.get());
            log::debug!("task {:?} (#{id}) aborted", entry.status.name);
        }
        // Dropping the future releases every descendant future and its wake
        // registrations without running any more author code.
        drop(entry);

        let children: SmallVec<[TaskId; 4]> = self
            .tasks
            .borrow()
            .iter()
            .filter(|(_, child)| child.parent == Some(id))
            .map(|(child_id, _)| *child_id)
            .collect();
        for child in children {
            self.abort_task(child);
        }
    }

    fn abort_all(&self) {
        let mut ids: Vec<TaskId> = self.tasks.borrow().keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            self.abort_task(id);
        }
    }

    fn register_wake(&self, resume_at: Nanos, waker: Waker) -> (WaiterId, Rc<Cell<bool>>) {
        let id = self.next_waiter_id.get();
        self.next_waiter_id.set(id + 1);
        let fired = Rc::new(Cell::new(false));
        self.waiters.borrow_mut().push_back(Waiter {
            id,
            resume_at,
            waker,
            fired: Rc::clone(&fired),
        });
        (id, fired)
    }

    fn cancel_wake(&self, id: WaiterId) {
        let mut waiters = self.waiters.borrow_mut();
        if let Some(index) = waiters.iter().position(|waiter| waiter.id == id) {
            waiters.remove(index);
        }
    }

    fn advance_frame(&self) {
        let frame = self.frame.get() + 1;
        let now = self.config.frame_to_nanos(frame);
        self.frame.set(frame);
        self.now.set(now);
        self.bump_revision();

        let due: SmallVec<[Waiter; 8]> = {
            let mut waiters = self.waiters.borrow_mut();
            let mut due = SmallVec::new();
            let mut remaining = VecDeque::with_capacity(waiters.len());
            for waiter in waiters.drain(..) {
                if waiter.resume_at <= now {
                    due.push(waiter);
                } else {
                    remaining.push_back(waiter);
                }
            }
            *waiters = remaining;
            due
        };
        log::trace!("frame {frame} at {now}ns: {} waiter(s) due", due.len());
        for waiter in due {
            waiter.fired.set(true);
            waiter.waker.wake();
        }
        self.run_ready();
    }

    fn run_ready(&self) {
        while let Some(id) = self.ready.pop() {
            self.poll_task(id);
        }
    }

    fn live_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }
}

/// A scene's scheduler: owns the simulated clock, every task and the wake-up
/// queue.
///
/// Dropping the runtime aborts every remaining task.
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(config)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn config(&self) -> TimelineConfig {
        self.inner.config
    }

    /// Register a task and run it until its first suspension point.
    pub fn spawn<F>(&self, name: impl Into<String>, future: F) -> TaskHandle
    where
        F: Future<Output = TaskResult> + 'static,
    {
        self.inner.spawn(self.handle(), name.into(), Box::pin(future))
    }

    /// Advance the clock by one frame and resume every task whose wake-up is
    /// due, in the order the tasks suspended.
    pub fn advance_frame(&self) {
        self.inner.advance_frame();
    }

    pub fn frame(&self) -> u64 {
        self.inner.frame.get()
    }

    pub fn now(&self) -> Nanos {
        self.inner.now.get()
    }

    pub fn now_seconds(&self) -> f64 {
        nanos_to_seconds(self.now())
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }

    pub fn live_tasks(&self) -> usize {
        self.inner.live_tasks()
    }

    pub fn is_idle(&self) -> bool {
        self.live_tasks() == 0
    }

    pub fn abort_all(&self) {
        self.inner.abort_all();
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.inner.abort_all();
    }
}

/// Weak handle to a [`Runtime`], held by signals, task threads and clocks.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn same_runtime(&self, other: &RuntimeHandle) -> bool {
        Weak::ptr_eq(&self.inner, &other.inner)
    }

    pub fn config(&self) -> Option<TimelineConfig> {
        self.inner.upgrade().map(|inner| inner.config)
    }

    pub fn now(&self) -> Option<Nanos> {
        self.inner.upgrade().map(|inner| inner.now.get())
    }

    pub fn frame(&self) -> Option<u64> {
        self.inner.upgrade().map(|inner| inner.frame.get())
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }

    pub fn spawn<F>(&self, name: impl Into<String>, future: F) -> Result<TaskHandle, AnimationError>
    where
        F: Future<Output = TaskResult> + 'static,
    {
        let inner = self.inner.upgrade().ok_or(AnimationError::RuntimeDropped)?;
        Ok(inner.spawn(self.clone(), name.into(), Box::pin(future)))
    }

    pub fn cancel_task(&self, id: TaskId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.abort_task(id);
        }
    }

    pub(crate) fn register_wake(
        &self,
        at: Nanos,
        waker: Waker,
    ) -> Option<(WaiterId, Rc<Cell<bool>>)> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_wake(at, waker))
    }

    pub(crate) fn cancel_wake(&self, id: WaiterId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_wake(id);
        }
    }

    pub(crate) fn revision(&self) -> Option<u64> {
        self.inner.upgrade().map(|inner| inner.revision.get())
    }

    pub(crate) fn bump_revision(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.bump_revision();
        }
    }

    pub(crate) fn alloc_signal_id(&self) -> u64 {
        self.inner
            .upgrade()
            .map(|inner| {
                let id = inner.next_signal_id.get();
                inner.next_signal_id.set(id + 1);
                id
            })
            .unwrap_or(0)
    }

    pub(crate) fn evaluation_depth(&self) -> usize {
        self.inner
            .upgrade()
            .map(|inner| inner.evaluation.depth.get())
            .unwrap_or(0)
    }

    pub(crate) fn enter_evaluation(&self) {
        if let Some(inner) = self.inner.upgrade() {
            let depth = &inner.evaluation.depth;
            depth.set(depth.get() + 1);
        }
    }

    /// Leave one evaluation level and report the pending fault, if any. The
    /// outermost level clears the fault so the next read starts clean.
    pub(crate) fn exit_evaluation(&self) -> Option<AnimationError> {
        let inner = self.inner.upgrade()?;
        let depth = inner.evaluation.depth.get().saturating_sub(1);
        inner.evaluation.depth.set(depth);
        if depth == 0 {
            inner.evaluation.fault.borrow_mut().take()
        } else {
            inner.evaluation.fault.borrow().clone()
        }
    }

    pub(crate) fn report_fault(&self, fault: AnimationError) {
        if let Some(inner) = self.inner.upgrade() {
            let mut slot = inner.evaluation.fault.borrow_mut();
            if slot.is_none() {
                *slot = Some(fault);
            }
        }
    }
}

/// Handle to a spawned task. Dropping it does not cancel the task.
#[derive(Clone)]
pub struct TaskHandle {
    id: TaskId,
    status: Rc<TaskStatus>,
    runtime: RuntimeHandle,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.status.name
    }

    pub fn state(&self) -> TaskState {
        self.status.state.get()
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    pub fn error(&self) -> Option<AnimationError> {
        self.status.error.borrow().clone()
    }

    /// `None` while running or after an abort.
    pub fn result(&self) -> Option<TaskResult> {
        match self.state() {
            TaskState::Completed => Some(Ok(())),
            TaskState::Failed => self.error().map(Err),
            _ => None,
        }
    }

    /// Clock value of the frame the task finished on.
    pub fn finished_at(&self) -> Option<Nanos> {
        self.status.finished_at.get()
    }

    /// Abort the task and every task it spawned. Suspended operations are
    /// dropped without running any more code.
    pub fn cancel(&self) {
        self.runtime.cancel_task(self.id);
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("name", &self.status.name)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
