use std::fmt::{Display, Formatter};

use average::Mean;
use serde::Serialize;
use tankwatch_quantities::Percent;

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Increasing => "↗",
            Self::Decreasing => "↘",
            Self::Stable => "→",
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        };
        write!(f, "{} {label}", self.glyph())
    }
}

/// Two-halves comparison of a daily consumption series.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct TrendClassifier {
    /// Below this many points there is no trend to claim.
    pub min_points: usize,

    /// Relative change under which the series is considered stable.
    pub deadband: Percent,
}

impl TrendClassifier {
    /// Relative change of the second half mean against the first half mean, in percent.
    ///
    /// A zero first half mean is replaced by one to stay finite.
    #[must_use]
    pub fn change(&self, values: &[f64]) -> Option<f64> {
        let values: Vec<f64> = values.iter().copied().filter(|value| value.is_finite()).collect();
        if values.len() < self.min_points.max(2) {
            return None;
        }
        let (first_half, second_half) = values.split_at(values.len() / 2);
        let first_mean = first_half.iter().copied().collect::<Mean>().mean();
        let second_mean = second_half.iter().copied().collect::<Mean>().mean();
        let denominator = if first_mean == 0.0 { 1.0 } else { first_mean.abs() };
        Some(100.0 * (second_mean - first_mean) / denominator)
    }

    pub fn classify(&self, values: &[f64]) -> Trend {
        match self.change(values) {
            Some(change) if change.abs() >= self.deadband.get() => {
                if change > 0.0 {
                    Trend::Increasing
                } else {
                    Trend::Decreasing
                }
            }
            _ => Trend::Stable,
        }
    }
}
