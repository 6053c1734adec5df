//! Typing effects driven by a numeric progress signal.

use reel_core::Signal;

/// Leading slice of `full` visible at `progress`, counted in characters.
pub fn reveal(full: &str, progress: f64) -> String {
    let total = full.chars().count();
    let visible = (progress.clamp(0.0, 1.0) * total as f64).floor() as usize;
    full.chars().take(visible).collect()
}

/// Derived text signal that reveals `full` as `progress` moves from 0 to 1.
///
/// Tween the progress signal; the text follows on every read.
pub fn typewriter(progress: &Signal<f64>, full: impl Into<String>) -> Signal<String> {
    let full: String = full.into();
    let source = progress.clone();
    Signal::derived(progress.runtime(), move || reveal(&full, source.get()))
}
