//! Core of the reel animation engine: reactive signals, a frame-stepped
//! cooperative scheduler and the scene that owns them.

pub mod collections;
pub mod config;
pub mod error;
pub mod frame_clock;
pub mod runtime;
pub mod scene;
pub mod signal;
pub mod task_context;
pub mod value;

pub use config::{nanos_to_seconds, seconds_to_nanos, JoinPolicy, Nanos, TimelineConfig};
pub use error::{AnimationError, ErrorCategory, TaskResult};
pub use frame_clock::{FrameClock, NextFrame, Timer, WakeRegistration};
pub use runtime::{Runtime, RuntimeHandle, TaskFuture, TaskHandle, TaskId, TaskState};
pub use scene::{Scene, SceneContext};
pub use signal::{Signal, SignalId};
pub use task_context::{current_thread, require_thread, TaskThread};
pub use value::{Color, Lerp, Vector2};

/// Suspend the current task until the next frame.
pub fn next_frame() -> Result<NextFrame, AnimationError> {
    let thread = require_thread()?;
    Ok(thread.runtime().frame_clock().next_frame())
}
