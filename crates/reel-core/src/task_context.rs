use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::Nanos;
use crate::runtime::{RuntimeHandle, TaskId};
use crate::AnimationError;

/// Logical timeline of one strand of a task.
///
/// Every root task owns a thread; `all` joins fork one per child so siblings
/// observe the same start instant. Operations advance the logical time by
/// exactly their own duration, which keeps sequences exact no matter where the
/// frame boundaries fall.
pub struct TaskThread {
    runtime: RuntimeHandle,
    task: TaskId,
    time: Cell<Nanos>,
}

impl TaskThread {
    pub(crate) fn new(runtime: RuntimeHandle, task: TaskId, time: Nanos) -> Self {
        Self {
            runtime,
            task,
            time: Cell::new(time),
        }
    }

    /// New thread for a join child, starting at this thread's current time.
    pub fn fork(&self) -> Rc<TaskThread> {
        Rc::new(Self {
            runtime: self.runtime.clone(),
            task: self.task,
            time: Cell::new(self.time.get()),
        })
    }

    pub fn runtime(&self) -> &RuntimeHandle {
        &self.runtime
    }

    /// Root task this thread belongs to.
    pub fn task_id(&self) -> TaskId {
        self.task
    }

    pub fn time(&self) -> Nanos {
        self.time.get()
    }

    /// Move the logical time forward. Logical time never runs backwards.
    pub fn advance_to(&self, time: Nanos) {
        if time > self.time.get() {
            self.time.set(time);
        }
    }
}

// Thread-local stack of the task threads currently being polled.
thread_local! {
    static THREAD_STACK: RefCell<Vec<Rc<TaskThread>>> = const { RefCell::new(Vec::new()) };
}

/// Guard that pops the task thread stack on drop.
#[must_use = "TaskScopeGuard pops the task thread stack on drop"]
pub struct TaskScopeGuard;

impl Drop for TaskScopeGuard {
    fn drop(&mut self) {
        THREAD_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Makes `thread` the current task thread for the duration of the scope.
pub fn enter(thread: &Rc<TaskThread>) -> TaskScopeGuard {
    THREAD_STACK.with(|stack| {
        stack.borrow_mut().push(Rc::clone(thread));
    });
    TaskScopeGuard
}

/// The task thread currently being polled, if any.
pub fn current_thread() -> Option<Rc<TaskThread>> {
    THREAD_STACK.with(|stack| stack.borrow().last().cloned())
}

/// Like [`current_thread`], but reports polling outside a task as an error.
pub fn require_thread() -> Result<Rc<TaskThread>, AnimationError> {
    current_thread().ok_or(AnimationError::NoActiveTask)
}
