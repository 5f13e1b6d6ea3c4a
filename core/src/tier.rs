//! Commission tier ladder.
//!
//! Tiers are ranked by array position only. Nothing enforces that
//! thresholds increase along the ladder; lookups follow array order
//! the same way regardless.

use serde::{Deserialize, Serialize};

/// A tier as the agent edits it: `rate` is a whole percent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierTarget {
    pub label: String,
    pub min_points: u32,
    pub rate: f64,
}

impl TierTarget {
    pub fn new(label: &str, min_points: u32, rate: f64) -> Self {
        Self {
            label: label.to_string(),
            min_points,
            rate,
        }
    }

    /// Best-effort edit of the threshold. Negative or unparseable input becomes 0.
    pub fn set_min_points(&mut self, input: &str) {
        let parsed = input.trim().parse::<f64>().unwrap_or(0.0);
        self.min_points = if parsed.is_finite() && parsed > 0.0 {
            parsed.trunc().min(u32::MAX as f64) as u32
        } else {
            0
        };
    }

    /// Best-effort edit of the rate, clamped to [0, 100].
    pub fn set_rate(&mut self, input: &str) {
        let parsed = input.trim().parse::<f64>().unwrap_or(0.0);
        self.rate = if parsed.is_finite() { parsed.clamp(0.0, 100.0) } else { 0.0 };
    }
}

/// A tier with its rate as a fraction, ready for commission math.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommissionTier {
    pub rank: usize,
    pub label: String,
    pub min_points: u32,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierProgress {
    pub label: String,
    pub min_points: u32,
    pub rate: f64,
    /// Percent of the threshold reached, capped at 100.
    pub percent: f64,
    pub reached: bool,
    pub points_to_go: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierLadder {
    tiers: Vec<CommissionTier>,
    fallback_rate: f64,
}

impl TierLadder {
    pub fn from_targets(targets: &[TierTarget], fallback_rate: f64) -> Self {
        let tiers = targets
            .iter()
            .enumerate()
            .map(|(rank, t)| CommissionTier {
                rank,
                label: t.label.clone(),
                min_points: t.min_points,
                rate: t.rate / 100.0,
            })
            .collect();
        Self { tiers, fallback_rate }
    }

    pub fn tiers(&self) -> &[CommissionTier] {
        &self.tiers
    }

    /// Highest-ranked tier whose threshold has been met.
    pub fn current_tier(&self, points: f64) -> Option<&CommissionTier> {
        self.tiers.iter().rev().find(|t| points >= t.min_points as f64)
    }

    /// First tier, in ladder order, whose threshold is still ahead.
    pub fn next_tier(&self, points: f64) -> Option<&CommissionTier> {
        self.tiers.iter().find(|t| points < t.min_points as f64)
    }

    /// Rate to project commission with. Before any tier is reached the
    /// first tier's rate stands in as an estimate.
    pub fn active_rate(&self, points: f64) -> f64 {
        self.current_tier(points)
            .or_else(|| self.tiers.first())
            .map(|t| t.rate)
            .unwrap_or(self.fallback_rate)
    }

    /// Label of the tier whose rate `active_rate` uses, if any.
    pub fn active_label(&self, points: f64) -> Option<&str> {
        self.current_tier(points)
            .or_else(|| self.tiers.first())
            .map(|t| t.label.as_str())
    }

    pub fn progress(&self, points: f64) -> Vec<TierProgress> {
        self.tiers
            .iter()
            .map(|t| {
                let min = t.min_points as f64;
                let percent = if t.min_points == 0 {
                    100.0
                } else {
                    (points / min * 100.0).min(100.0)
                };
                TierProgress {
                    label: t.label.clone(),
                    min_points: t.min_points,
                    rate: t.rate,
                    percent,
                    reached: points >= min,
                    points_to_go: (min - points).max(0.0),
                }
            })
            .collect()
    }
}

/// Commission on `premium`: the agency keeps `premium_share` of it and the
/// agent earns `rate` of that share.
pub fn calc_commission(premium: f64, rate: f64, premium_share: f64) -> f64 {
    premium * premium_share * rate
}
