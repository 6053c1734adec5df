//! Error taxonomy shared by every reel crate.

/// Broad class of an [`AnimationError`], used by hosts to decide how loudly to
/// report a failed scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Invalid durations, writes to derived signals, cyclic derivations and
    /// malformed literals. Detected eagerly and never retried.
    Configuration,
    /// Failures raised by author code inside a combinator tree.
    Composition,
    /// Scheduler-level failures: missing task context, torn-down runtime,
    /// exceeded frame limits.
    Runtime,
}

/// Every failure the engine can surface to a scene's caller.
///
/// The type is `Clone` so a parallel join can record a child's failure, let
/// the remaining children settle, and re-raise it afterwards.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnimationError {
    #[error("invalid duration {seconds}s: durations must be finite and non-negative")]
    InvalidDuration { seconds: f64 },

    #[error("signal {signal} is derived and cannot be written")]
    WriteToDerived { signal: String },

    #[error("signal {signal} is derived and cannot be tweened")]
    TweenDerived { signal: String },

    #[error("cyclic derivation detected while evaluating signal {signal}")]
    CyclicDerivation { signal: String },

    #[error("signal {signal} was written while a derivation was being evaluated")]
    WriteDuringDerivation { signal: String },

    #[error("invalid color literal {input:?}")]
    InvalidColor { input: String },

    #[error("animation polled outside of a running task")]
    NoActiveTask,

    #[error("the runtime owning this task has been torn down")]
    RuntimeDropped,

    #[error("scene {scene} exceeded the limit of {frames} frames")]
    FrameLimitExceeded { scene: String, frames: u64 },

    #[error("{message}")]
    Script { message: String },
}

impl AnimationError {
    /// Build an author-level failure from inside a scene script.
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDuration { .. }
            | Self::WriteToDerived { .. }
            | Self::TweenDerived { .. }
            | Self::CyclicDerivation { .. }
            | Self::WriteDuringDerivation { .. }
            | Self::InvalidColor { .. } => ErrorCategory::Configuration,
            Self::Script { .. } => ErrorCategory::Composition,
            Self::NoActiveTask | Self::RuntimeDropped | Self::FrameLimitExceeded { .. } => {
                ErrorCategory::Runtime
            }
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}

/// Result type produced by every task and combinator.
pub type TaskResult = Result<(), AnimationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        let error = AnimationError::InvalidDuration { seconds: -1.0 };
        assert!(error.is_configuration());
        assert_eq!(
            AnimationError::CyclicDerivation {
                signal: "a".into()
            }
            .category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn script_errors_are_composition_failures() {
        let error = AnimationError::script("boom");
        assert_eq!(error.category(), ErrorCategory::Composition);
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn runtime_errors_render_scene_name() {
        let error = AnimationError::FrameLimitExceeded {
            scene: "intro".into(),
            frames: 10,
        };
        assert_eq!(error.category(), ErrorCategory::Runtime);
        assert!(error.to_string().contains("intro"));
    }
}
