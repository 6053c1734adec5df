use crate::error::PlaybackError;
use crate::view::{PropSample, View};

/// Where a rendered frame sits in the playback.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInfo {
    pub scene: String,
    pub scene_index: usize,
    pub frame: u64,
    /// Simulated seconds since the scene started.
    pub time: f64,
}

/// Receives every frame of a playback.
///
/// `render` only reads committed values; no task code runs while a frame is
/// being drawn.
pub trait FrameRenderer {
    fn begin_scene(&mut self, _scene: &str, _view: &View) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn render(&mut self, frame: &FrameInfo, view: &View) -> Result<(), PlaybackError>;

    fn end_scene(&mut self, _scene: &str) -> Result<(), PlaybackError> {
        Ok(())
    }
}

/// Every property of every node, sampled for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSample {
    pub info: FrameInfo,
    pub props: Vec<(String, String, PropSample)>,
}

impl FrameSample {
    pub fn get(&self, node: &str, key: &str) -> Option<&PropSample> {
        self.props
            .iter()
            .find(|(name, prop, _)| name == node && prop == key)
            .map(|(_, _, sample)| sample)
    }
}

/// Renderer that keeps per-frame samples in memory.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: Vec<FrameSample>,
    scenes: Vec<String>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[FrameSample] {
        &self.frames
    }

    pub fn frames_for<'a>(&'a self, scene: &'a str) -> impl Iterator<Item = &'a FrameSample> {
        self.frames
            .iter()
            .filter(move |sample| sample.info.scene == scene)
    }

    /// Scenes in the order they began.
    pub fn scenes(&self) -> &[String] {
        &self.scenes
    }

    /// One property of one node across every recorded frame of a scene.
    pub fn track(&self, scene: &str, node: &str, key: &str) -> Vec<PropSample> {
        self.frames_for(scene)
            .filter_map(|sample| sample.get(node, key).cloned())
            .collect()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.scenes.clear();
    }
}

impl FrameRenderer for RecordingRenderer {
    fn begin_scene(&mut self, scene: &str, _view: &View) -> Result<(), PlaybackError> {
        self.scenes.push(scene.to_string());
        Ok(())
    }

    fn render(&mut self, frame: &FrameInfo, view: &View) -> Result<(), PlaybackError> {
        let props = view
            .nodes()
            .iter()
            .flat_map(|node| {
                node.props().map(move |(key, value)| {
                    (node.name().to_string(), key.to_string(), value.sample())
                })
            })
            .collect();
        self.frames.push(FrameSample {
            info: frame.clone(),
            props,
        });
        Ok(())
    }
}
