//! Timeline configuration.

/// Simulated time in nanoseconds since the start of a scene.
pub type Nanos = u64;

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// How a parallel join reacts when one of its children fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinPolicy {
    /// Let the remaining children run to completion, then re-raise the first
    /// recorded failure. Signals are never left half-applied.
    #[default]
    Deferred,
    /// Drop the remaining children as soon as one fails.
    FailFast,
}

/// Configuration for a scene's scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineConfig {
    /// Frames per simulated second. Every tick advances the clock by one frame.
    pub fps: u32,
    /// Failure policy applied by `all` joins running on this timeline.
    pub join_policy: JoinPolicy,
}

impl TimelineConfig {
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    pub fn with_join_policy(mut self, policy: JoinPolicy) -> Self {
        self.join_policy = policy;
        self
    }

    /// Simulated clock value at the given frame index.
    ///
    /// Computed from the index rather than accumulated so long scenes do not
    /// drift.
    pub fn frame_to_nanos(&self, frame: u64) -> Nanos {
        let nanos = frame as u128 * NANOS_PER_SECOND as u128 / self.fps.max(1) as u128;
        nanos.min(u64::MAX as u128) as u64
    }

    /// Length of one frame in nanoseconds, rounded down.
    pub fn frame_nanos(&self) -> Nanos {
        NANOS_PER_SECOND / self.fps.max(1) as u64
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            join_policy: JoinPolicy::Deferred,
        }
    }
}

/// Convert author-facing seconds to simulated nanoseconds.
///
/// Negative, NaN and infinite durations are configuration errors.
pub fn seconds_to_nanos(seconds: f64) -> Result<Nanos, crate::AnimationError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(crate::AnimationError::InvalidDuration { seconds });
    }
    Ok((seconds * NANOS_PER_SECOND as f64).round() as Nanos)
}

pub fn nanos_to_seconds(nanos: Nanos) -> f64 {
    nanos as f64 / NANOS_PER_SECOND as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_times_do_not_accumulate_rounding() {
        let config = TimelineConfig::default();
        assert_eq!(config.frame_to_nanos(12), 200_000_000);
        assert_eq!(config.frame_to_nanos(42), 700_000_000);
        assert_eq!(config.frame_to_nanos(60 * 3600), 3600 * NANOS_PER_SECOND);
    }

    #[test]
    fn seconds_conversion_rejects_negative_and_nan() {
        assert_eq!(seconds_to_nanos(0.2), Ok(200_000_000));
        assert_eq!(seconds_to_nanos(0.0), Ok(0));
        assert!(seconds_to_nanos(-0.1).is_err());
        assert!(seconds_to_nanos(f64::NAN).is_err());
        assert!(seconds_to_nanos(f64::INFINITY).is_err());
    }

    #[test]
    fn zero_fps_is_clamped() {
        let config = TimelineConfig::default().with_fps(0);
        assert_eq!(config.fps, 1);
        assert_eq!(config.frame_nanos(), NANOS_PER_SECOND);
    }
}
