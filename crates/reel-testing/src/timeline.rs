use std::future::Future;

use reel_core::{
    seconds_to_nanos, AnimationError, RuntimeHandle, Scene, SceneContext, Signal, TaskHandle,
    TaskResult, TimelineConfig,
};

/// Headless harness for exercising scenes in tests.
///
/// `TimelineTestRule` owns a [`Scene`] and exposes helpers for spawning a root
/// task and stepping the simulated clock frame by frame, without a renderer.
pub struct TimelineTestRule {
    scene: Scene,
}

impl TimelineTestRule {
    /// Create a rule running at the default 60 frames per second.
    pub fn new() -> Self {
        Self::with_config(TimelineConfig::default())
    }

    pub fn with_fps(fps: u32) -> Self {
        Self::with_config(TimelineConfig::default().with_fps(fps))
    }

    pub fn with_config(config: TimelineConfig) -> Self {
        Self {
            scene: Scene::new("test", config),
        }
    }

    pub fn context(&self) -> SceneContext {
        self.scene.context()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.scene.runtime().handle()
    }

    /// Spawn the root task. It runs until its first suspension immediately.
    pub fn start<F>(&mut self, future: F) -> TaskHandle
    where
        F: Future<Output = TaskResult> + 'static,
    {
        self.scene.start(future)
    }

    pub fn advance_frame(&mut self) {
        self.scene.step();
        log::trace!(
            "test timeline at frame {} ({:.3}s)",
            self.scene.frame(),
            self.scene.now_seconds()
        );
    }

    pub fn advance_frames(&mut self, frames: u64) {
        for _ in 0..frames {
            self.advance_frame();
        }
    }

    /// Step until the clock reaches `seconds`. Negative or non-finite
    /// targets are rejected with [`AnimationError::InvalidDuration`].
    pub fn advance_to_seconds(&mut self, seconds: f64) -> Result<(), AnimationError> {
        let target = seconds_to_nanos(seconds)?;
        while self.scene.runtime().now() < target {
            self.advance_frame();
        }
        Ok(())
    }

    /// Step until the root task finishes, returning how many frames that
    /// took. Fails with [`AnimationError::FrameLimitExceeded`] after
    /// `max_frames`.
    pub fn run_until_finished(&mut self, max_frames: u64) -> Result<u64, AnimationError> {
        let mut frames = 0;
        while !self.scene.is_finished() {
            if frames == max_frames {
                log::debug!("test timeline gave up after {max_frames} frame(s)");
                return Err(AnimationError::FrameLimitExceeded {
                    scene: self.scene.name().to_string(),
                    frames: max_frames,
                });
            }
            self.advance_frame();
            frames += 1;
        }
        Ok(frames)
    }

    /// Current value followed by the value after each of the next `frames`
    /// frames.
    pub fn sample_each_frame<T: Clone + 'static>(
        &mut self,
        signal: &Signal<T>,
        frames: u64,
    ) -> Vec<T> {
        let mut samples = Vec::with_capacity(frames as usize + 1);
        samples.push(signal.get());
        for _ in 0..frames {
            self.advance_frame();
            samples.push(signal.get());
        }
        samples
    }

    pub fn frame(&self) -> u64 {
        self.scene.frame()
    }

    pub fn now_seconds(&self) -> f64 {
        self.scene.now_seconds()
    }

    pub fn root(&self) -> Option<&TaskHandle> {
        self.scene.root()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

impl Default for TimelineTestRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for tests that only need temporary access to a
/// `TimelineTestRule`.
pub fn run_test_timeline<R>(f: impl FnOnce(&mut TimelineTestRule) -> R) -> R {
    let mut rule = TimelineTestRule::new();
    f(&mut rule)
}

#[cfg(test)]
#[path = "tests/timeline_tests.rs"]
mod tests;
