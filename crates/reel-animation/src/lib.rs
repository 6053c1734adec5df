//! Easing curves, tweens and the combinators that arrange them on a scene's
//! timeline.

pub mod combinators;
pub mod easing;
pub mod text;
pub mod tween;

pub use combinators::{
    all, boxed, chain, delay, loop_forever, loop_n, sequence, wait_for, All, WaitFor,
};
pub use easing::Easing;
pub use text::{reveal, typewriter};
pub use tween::{Animate, Tween};

pub mod prelude {
    pub use crate::combinators::{
        all, boxed, chain, delay, loop_forever, loop_n, sequence, wait_for,
    };
    pub use crate::easing::Easing;
    pub use crate::text::{reveal, typewriter};
    pub use crate::tween::{Animate, Tween};
    pub use reel_core::{
        AnimationError, Color, Lerp, SceneContext, Signal, TaskFuture, TaskResult, Vector2,
    };
}
