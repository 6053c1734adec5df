//! Playback configuration.

use reel_core::TimelineConfig;

/// Configuration for a [`Player`](crate::Player).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerOptions {
    /// Clock and join policy every scene runs with.
    pub timeline: TimelineConfig,
    /// Scenes still running after this many simulated seconds are failed.
    pub max_scene_seconds: f64,
    /// Whether the frame on which a scene's root task ends is rendered.
    pub render_final_frame: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            timeline: TimelineConfig::default(),
            max_scene_seconds: 120.0,
            render_final_frame: true,
        }
    }
}

impl PlayerOptions {
    pub fn with_timeline(mut self, timeline: TimelineConfig) -> Self {
        self.timeline = timeline;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.timeline = self.timeline.with_fps(fps);
        self
    }

    pub fn with_max_scene_seconds(mut self, seconds: f64) -> Self {
        self.max_scene_seconds = seconds.max(0.0);
        self
    }

    pub fn with_render_final_frame(mut self, render: bool) -> Self {
        self.render_final_frame = render;
        self
    }

    /// Frame budget derived from `max_scene_seconds`.
    pub fn max_frames(&self) -> u64 {
        (self.max_scene_seconds * self.timeline.fps.max(1) as f64).ceil() as u64
    }
}
