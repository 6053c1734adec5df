pub mod dns;
pub mod http;
pub mod intro;

use reel_core::{SceneContext, Signal};

/// Derived size that follows `scale`.
pub(crate) fn scaled(ctx: &SceneContext, scale: &Signal<f64>, size: f64) -> Signal<f64> {
    let scale = scale.clone();
    ctx.derived(move || scale.get() * size)
}
