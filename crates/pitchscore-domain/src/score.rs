//! Numeric scores on the 0-100 scale

use serde::{Deserialize, Serialize};
use std::fmt;

/// A score on the 0-100 scale, or the fallback sentinel when the model did
/// not supply a usable number.
///
/// Rated values are always clamped into `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Score {
    /// A numeric score in [0, 100]
    Rated(f64),

    /// No usable score was provided
    #[default]
    Unrated,
}

impl Score {
    /// Lowest valid score
    pub const MIN: f64 = 0.0;

    /// Highest valid score
    pub const MAX: f64 = 100.0;

    /// Build a rated score, clamping into range. NaN becomes `Unrated`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pitchscore_domain::Score;
    ///
    /// assert_eq!(Score::new(120.0), Score::Rated(100.0));
    /// assert_eq!(Score::new(f64::NAN), Score::Unrated);
    /// ```
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Score::Unrated;
        }
        Score::Rated(value.clamp(Self::MIN, Self::MAX))
    }

    /// Numeric value, if rated
    pub fn value(&self) -> Option<f64> {
        match self {
            Score::Rated(v) => Some(*v),
            Score::Unrated => None,
        }
    }

    /// True if a numeric value is present
    pub fn is_rated(&self) -> bool {
        matches!(self, Score::Rated(_))
    }

    /// Check whether a raw number lies on the 0-100 scale
    pub fn in_range(value: f64) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers print without a trailing ".0"
            Score::Rated(v) if v.fract() == 0.0 => write!(f, "{}", *v as i64),
            Score::Rated(v) => write!(f, "{:.2}", v),
            Score::Unrated => write!(f, "N/A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        assert_eq!(Score::new(-5.0), Score::Rated(0.0));
        assert_eq!(Score::new(42.5), Score::Rated(42.5));
        assert_eq!(Score::new(250.0), Score::Rated(100.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Score::Rated(80.0).to_string(), "80");
        assert_eq!(Score::Rated(72.456).to_string(), "72.46");
        assert_eq!(Score::Unrated.to_string(), "N/A");
    }

    #[test]
    fn test_serde_shape() {
        assert_eq!(serde_json::to_string(&Score::Rated(75.0)).unwrap(), "75.0");
        assert_eq!(serde_json::to_string(&Score::Unrated).unwrap(), "null");

        let parsed: Score = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Score::Unrated);
        let parsed: Score = serde_json::from_str("61").unwrap();
        assert_eq!(parsed, Score::Rated(61.0));
    }

    #[test]
    fn test_in_range() {
        assert!(Score::in_range(0.0));
        assert!(Score::in_range(100.0));
        assert!(!Score::in_range(100.5));
        assert!(!Score::in_range(-1.0));
    }
}
