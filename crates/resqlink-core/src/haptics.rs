//! Vibration feedback during arming.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("haptics unavailable: {0}")]
pub struct HapticsError(pub String);

/// Alternating wait/vibrate durations in milliseconds, starting with a wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibrationPattern(pub Vec<u64>);

impl VibrationPattern {
    /// Single pulse for arming and every tick.
    pub fn tick() -> Self {
        Self(vec![0, 100])
    }

    /// Double pulse played when a countdown is cancelled.
    pub fn cancelled() -> Self {
        Self(vec![0, 200, 100, 200])
    }

    /// Triple pulse played once the alert has gone out.
    pub fn alert_sent() -> Self {
        Self(vec![0, 200, 100, 200, 100, 200])
    }

    /// Total time the pattern takes to play.
    pub fn duration_ms(&self) -> u64 {
        self.0.iter().sum()
    }
}

pub trait Haptics: Send + Sync {
    fn vibrate(&self, pattern: &VibrationPattern) -> Result<(), HapticsError>;
}

/// Haptics for hosts without a vibration motor.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&self, _pattern: &VibrationPattern) -> Result<(), HapticsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_pattern_differs_from_tick() {
        assert_ne!(VibrationPattern::cancelled(), VibrationPattern::tick());
        assert_eq!(VibrationPattern::tick().duration_ms(), 100);
        assert_eq!(VibrationPattern::cancelled().duration_ms(), 500);
    }
}
