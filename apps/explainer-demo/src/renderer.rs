use reel_app::{FrameInfo, FrameRenderer, PlaybackError, View};

/// Renderer that writes a one-line summary of sampled frames to the log.
///
/// Every `log_every`-th frame is logged at `info`, the rest at `trace`.
pub struct LoggingRenderer {
    log_every: u64,
    frames: u64,
    scenes: u64,
}

impl LoggingRenderer {
    pub fn new(log_every: u64) -> Self {
        Self {
            log_every: log_every.max(1),
            frames: 0,
            scenes: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scenes(&self) -> u64 {
        self.scenes
    }

    fn summarize(view: &View) -> String {
        let mut parts: Vec<String> = view
            .nodes()
            .iter()
            .flat_map(|node| {
                node.props()
                    .filter(|(_, value)| value.is_bound())
                    .map(move |(key, value)| format!("{}.{key}={}", node.name(), value.sample()))
            })
            .collect();
        if let Some(camera) = view.camera() {
            parts.insert(0, format!("camera.zoom={:.3}", camera.zoom.get()));
        }
        parts.join(" ")
    }
}

impl Default for LoggingRenderer {
    fn default() -> Self {
        Self::new(30)
    }
}

impl FrameRenderer for LoggingRenderer {
    fn begin_scene(&mut self, scene: &str, view: &View) -> Result<(), PlaybackError> {
        self.scenes += 1;
        log::info!(
            "begin {scene:?}: {} node(s) on {}",
            view.len(),
            view.background()
        );
        Ok(())
    }

    fn render(&mut self, frame: &FrameInfo, view: &View) -> Result<(), PlaybackError> {
        self.frames += 1;
        if frame.frame % self.log_every == 0 {
            log::info!(
                "[{} #{:>4} {:>6.3}s] {}",
                frame.scene,
                frame.frame,
                frame.time,
                Self::summarize(view)
            );
        } else if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "[{} #{:>4} {:>6.3}s] {}",
                frame.scene,
                frame.frame,
                frame.time,
                Self::summarize(view)
            );
        }
        Ok(())
    }

    fn end_scene(&mut self, scene: &str) -> Result<(), PlaybackError> {
        log::debug!("end {scene:?}");
        Ok(())
    }
}
