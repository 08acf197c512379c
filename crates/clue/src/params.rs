use crate::error::{ClueError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AGGRESSIVENESS: f64 = 0.6;
pub const DEFAULT_SHIFT: f64 = 0.99;
/// Aggressiveness that makes the largest reachable cluster win outright.
pub const ALL_IN_AGGRESSIVENESS: f64 = 100.0;

/// Risk dial for [`crate::select_clue`].
///
/// A cluster of size `n` with safety margin `gap` scores
/// `gap * (n^aggressiveness - shift)`:
/// - `aggressiveness = 0` ranks by `gap` alone;
/// - large values rank by `n` first;
/// - `shift` just below 1 leaves a one-word clue a score near zero, so it
///   only wins when nothing bigger is safe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionParams {
    pub aggressiveness: f64,
    pub shift: f64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            aggressiveness: DEFAULT_AGGRESSIVENESS,
            shift: DEFAULT_SHIFT,
        }
    }
}

impl SelectionParams {
    #[must_use]
    pub fn new(aggressiveness: f64) -> Self {
        Self {
            aggressiveness,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_shift(mut self, shift: f64) -> Self {
        self.shift = shift;
        self
    }

    /// Params for a round that must hint at as many words as possible.
    #[must_use]
    pub fn all_in() -> Self {
        Self::new(ALL_IN_AGGRESSIVENESS)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.aggressiveness.is_finite() || self.aggressiveness < 0.0 {
            return Err(ClueError::InvalidParameter(format!(
                "aggressiveness must be a finite value >= 0, got {}",
                self.aggressiveness
            )));
        }
        if !self.shift.is_finite() {
            return Err(ClueError::InvalidParameter(format!(
                "shift must be finite, got {}",
                self.shift
            )));
        }
        Ok(())
    }

    /// `n^aggressiveness - shift`.
    #[must_use]
    pub fn cluster_weight(&self, n: usize) -> f64 {
        (n as f64).powf(self.aggressiveness) - self.shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_word_weight_is_near_zero() {
        let params = SelectionParams::default();
        assert!((params.cluster_weight(1) - 0.01).abs() < 1e-12);
        assert!(params.cluster_weight(3) > params.cluster_weight(2));
    }

    #[test]
    fn rejects_negative_aggressiveness() {
        assert!(SelectionParams::new(-0.1).validate().is_err());
        assert!(SelectionParams::new(f64::INFINITY).validate().is_err());
        assert!(SelectionParams::new(0.0).with_shift(f64::NAN).validate().is_err());
        assert!(SelectionParams::all_in().validate().is_ok());
    }
}
