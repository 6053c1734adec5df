use reel_core::AnimationError;

/// Why a scene failed to play.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PlaybackError {
    #[error(transparent)]
    Animation(#[from] AnimationError),

    #[error("renderer failed in scene {scene}: {message}")]
    Renderer { scene: String, message: String },
}

impl PlaybackError {
    pub fn renderer(scene: &str, message: impl Into<String>) -> Self {
        Self::Renderer {
            scene: scene.to_string(),
            message: message.into(),
        }
    }

    /// The animation failure behind this error, if any.
    pub fn animation(&self) -> Option<&AnimationError> {
        match self {
            Self::Animation(err) => Some(err),
            _ => None,
        }
    }
}
