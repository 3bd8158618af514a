//! Verdict classification by score bands

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_STRONG_THRESHOLD: f64 = 85.0;
pub const DEFAULT_MODERATE_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Strong Match")]
    StrongMatch,
    #[serde(rename = "Moderate Match")]
    ModerateMatch,
    #[serde(rename = "Weak Match")]
    WeakMatch,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::StrongMatch, Verdict::ModerateMatch, Verdict::WeakMatch];

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::StrongMatch => "Strong Match",
            Verdict::ModerateMatch => "Moderate Match",
            Verdict::WeakMatch => "Weak Match",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Lower bounds (inclusive) of the strong and moderate bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerdictThresholds {
    pub strong: f64,
    pub moderate: f64,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            strong: DEFAULT_STRONG_THRESHOLD,
            moderate: DEFAULT_MODERATE_THRESHOLD,
        }
    }
}

impl VerdictThresholds {
    /// Total over all inputs; NaN falls in the weak band
    pub fn classify(&self, score: f64) -> Verdict {
        if score >= self.strong {
            Verdict::StrongMatch
        } else if score >= self.moderate {
            Verdict::ModerateMatch
        } else {
            Verdict::WeakMatch
        }
    }
}

pub fn classify(score: f64) -> Verdict {
    VerdictThresholds::default().classify(score)
}
