//! Projects, scenes and the headless player that renders them back to back.
//!
//! A [`Project`] is an ordered list of scene builders. The [`Player`] runs each
//! one in a fresh [`reel_core::Scene`], hands every frame to a
//! [`FrameRenderer`] and collects a [`PlaybackReport`].

pub mod error;
pub mod options;
pub mod player;
pub mod project;
pub mod renderer;
pub mod view;

pub use error::PlaybackError;
pub use options::PlayerOptions;
pub use player::{PlaybackReport, Player, SceneOutcome, SceneReport};
pub use project::{Project, SceneBuilder, SceneDescriptor};
pub use renderer::{FrameInfo, FrameRenderer, FrameSample, RecordingRenderer};
pub use view::{Camera, Node, NodeId, NodeKind, Prop, PropSample, PropValue, View};

pub mod prelude {
    pub use crate::{
        Camera, FrameInfo, FrameRenderer, Node, PlaybackReport, Player, PlayerOptions, Project,
        PropSample, RecordingRenderer, View,
    };
}
