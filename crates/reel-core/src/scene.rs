use std::future::Future;
use std::rc::Rc;

use crate::config::{nanos_to_seconds, TimelineConfig};
use crate::runtime::{Runtime, RuntimeHandle, TaskHandle};
use crate::signal::Signal;
use crate::task_context::current_thread;
use crate::{AnimationError, TaskResult};

/// Per-scene context handed to scene builders.
///
/// Everything a script creates through the context belongs to the scene's
/// runtime and is released when the scene is torn down.
#[derive(Clone)]
pub struct SceneContext {
    name: Rc<str>,
    runtime: RuntimeHandle,
}

impl SceneContext {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn runtime(&self) -> &RuntimeHandle {
        &self.runtime
    }

    pub fn signal<T: Clone + 'static>(&self, value: T) -> Signal<T> {
        Signal::new(&self.runtime, value)
    }

    pub fn derived<T: Clone + 'static>(&self, compute: impl Fn() -> T + 'static) -> Signal<T> {
        Signal::derived(&self.runtime, compute)
    }

    /// Start a background task. It runs alongside the caller and is aborted
    /// when the scene ends, even if it never completes on its own.
    pub fn spawn<F>(&self, name: impl Into<String>, future: F) -> Result<TaskHandle, AnimationError>
    where
        F: Future<Output = TaskResult> + 'static,
    {
        self.runtime.spawn(name, future)
    }

    /// Seconds since the scene started. Inside a task this is the task's
    /// logical time, elsewhere the clock of the last frame.
    pub fn time(&self) -> f64 {
        let nanos = current_thread()
            .filter(|thread| thread.runtime().same_runtime(&self.runtime))
            .map(|thread| thread.time())
            .or_else(|| self.runtime.now())
            .unwrap_or(0);
        nanos_to_seconds(nanos)
    }

    pub fn frame(&self) -> u64 {
        self.runtime.frame().unwrap_or(0)
    }
}

/// One playable scene: a runtime plus its root task.
pub struct Scene {
    name: Rc<str>,
    runtime: Runtime,
    root: Option<TaskHandle>,
}

impl Scene {
    pub fn new(name: &str, config: TimelineConfig) -> Self {
        Self {
            name: Rc::from(name),
            runtime: Runtime::new(config),
            root: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> SceneContext {
        SceneContext {
            name: Rc::clone(&self.name),
            runtime: self.runtime.handle(),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Spawn the scene's root task. It runs until its first suspension before
    /// this returns.
    pub fn start<F>(&mut self, future: F) -> TaskHandle
    where
        F: Future<Output = TaskResult> + 'static,
    {
        if let Some(previous) = self.root.take() {
            log::warn!("scene {:?} restarted; aborting previous root", self.name);
            previous.cancel();
        }
        let handle = self.runtime.spawn(format!("{}/root", self.name), future);
        self.root = Some(handle.clone());
        handle
    }

    /// Advance the scene by one frame.
    pub fn step(&self) {
        self.runtime.advance_frame();
    }

    pub fn frame(&self) -> u64 {
        self.runtime.frame()
    }

    pub fn now_seconds(&self) -> f64 {
        self.runtime.now_seconds()
    }

    pub fn root(&self) -> Option<&TaskHandle> {
        self.root.as_ref()
    }

    /// A scene without a root task has nothing left to play.
    pub fn is_finished(&self) -> bool {
        self.root
            .as_ref()
            .map(TaskHandle::is_finished)
            .unwrap_or(true)
    }

    /// Result of the root task, once it has completed or failed.
    pub fn outcome(&self) -> Option<TaskResult> {
        self.root.as_ref().and_then(TaskHandle::result)
    }

    /// Abort every task still running in the scene, background tasks
    /// included.
    pub fn teardown(&self) {
        let live = self.runtime.live_tasks();
        if live > 0 {
            log::debug!("tearing down scene {:?}: aborting {live} task(s)", self.name);
        }
        self.runtime.abort_all();
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "tests/scene_tests.rs"]
mod tests;
