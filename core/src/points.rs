//! Point calculation for a single sale.

use crate::product::{LiabilityLimit, ProductKey};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PointBreakdown {
    pub base: u32,
    pub bonus: u32,
    pub total: u32,
    pub bonus_reasons: Vec<String>,
}

/// Score a set of products sold on one call.
///
/// Auto is scored by `liability` (treated as below 50/100 when absent).
/// Bundle bonuses stack:
///   - auto + renters: +1
///   - auto + home:    +1 / +2 / +3 by liability limit
pub fn calculate_points(products: &[ProductKey], liability: Option<LiabilityLimit>) -> PointBreakdown {
    let liability = liability.unwrap_or_default();
    let has = |p: ProductKey| products.contains(&p);

    let base: u32 = products.iter().map(|p| p.points_with(liability)).sum();

    let mut bonus = 0;
    let mut bonus_reasons = Vec::new();

    if has(ProductKey::Auto) && has(ProductKey::Renters) {
        bonus += 1;
        bonus_reasons.push("+1 Auto & Renters bundle".to_string());
    }

    if has(ProductKey::Auto) && has(ProductKey::Home) {
        let extra = liability.points();
        bonus += extra;
        bonus_reasons.push(format!("+{extra} Home & Auto bundle ({})", bundle_label(liability)));
    }

    PointBreakdown {
        base,
        bonus,
        total: base + bonus,
        bonus_reasons,
    }
}

fn bundle_label(liability: LiabilityLimit) -> &'static str {
    match liability {
        LiabilityLimit::Below50_100 => "below 50/100",
        other => other.label(),
    }
}
