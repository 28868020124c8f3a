//! Relevance and compliance banding for display.

/// Which domain a score comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Vector similarity in `0.0..=1.0`.
    Similarity,
    /// Compliance score in `0..=100`.
    Compliance,
}

impl Scale {
    fn thresholds(self) -> (f64, f64) {
        match self {
            Self::Similarity => (0.85, 0.70),
            Self::Compliance => (85.0, 70.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Amber,
    Red,
}

impl Band {
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::High => Tone::Green,
            Self::Medium => Tone::Amber,
            Self::Low => Tone::Red,
        }
    }
}

impl Tone {
    pub fn label(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Amber => "amber",
            Self::Red => "red",
        }
    }
}

/// Maps a score to its band. Lower bounds are inclusive.
///
/// Total over `f64`: values outside the scale land in the nearest band and
/// NaN is treated as the bottom of the scale.
pub fn band(score: f64, scale: Scale) -> Band {
    let (high, medium) = scale.thresholds();
    if score.is_nan() {
        return Band::Low;
    }
    if score >= high {
        Band::High
    } else if score >= medium {
        Band::Medium
    } else {
        Band::Low
    }
}

pub fn similarity_band(score: f64) -> Band {
    band(score, Scale::Similarity)
}

pub fn compliance_band(score: i64) -> Band {
    band(score as f64, Scale::Compliance)
}

/// Similarity rendered as a whole percentage, clamped to `0..=100`.
pub fn similarity_percent(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
#[path = "tests/score_tests.rs"]
mod tests;
