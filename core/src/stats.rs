//! Derived dashboard numbers for one agent's call log.
//!
//! Everything here is recomputed from the log on demand; nothing is stored.

use crate::{
    calendar::working_days_left,
    call_log::CallEntry,
    config::TrackerConfig,
    product::{CallResult, ProductKey},
    tier::{calc_commission, CommissionTier, TierLadder, TierProgress},
    types::WorkDay,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductBreakdown {
    pub product: ProductKey,
    pub label: String,
    /// Sales that included this product.
    pub sales: u32,
    /// Base points this product earned across those sales.
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultBreakdown {
    pub result: CallResult,
    pub label: String,
    pub count: u32,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_calls: u32,
    pub total_sales: u32,
    pub total_points: u32,
    pub total_bonus_points: u32,
    pub total_premium: f64,
    pub closure_rate: f64,
    pub current_tier: Option<CommissionTier>,
    pub next_tier: Option<CommissionTier>,
    pub active_rate: f64,
    /// Tier whose rate `active_rate` is, `None` on an empty ladder.
    pub active_label: Option<String>,
    /// True while no tier is reached and the first tier's rate stands in.
    pub using_estimate: bool,
    pub projected_commission: f64,
    pub working_days_left: u32,
    pub points_needed: u32,
    pub points_per_shift: u32,
    pub products: Vec<ProductBreakdown>,
    pub results: Vec<ResultBreakdown>,
    pub tier_progress: Vec<TierProgress>,
}

impl DashboardStats {
    pub fn compute(
        calls: &[CallEntry],
        ladder: &TierLadder,
        work_days: &[WorkDay],
        today: NaiveDate,
        config: &TrackerConfig,
    ) -> Self {
        let sales: Vec<&CallEntry> = calls.iter().filter(|c| c.result.is_sale()).collect();

        let total_calls = calls.len() as u32;
        let total_sales = sales.len() as u32;
        let total_points: u32 = sales.iter().map(|c| c.total_points()).sum();
        let total_bonus_points: u32 = sales.iter().map(|c| c.bonus_points).sum();
        let total_premium: f64 = sales.iter().map(|c| c.premium).sum();
        let closure_rate = percent_of(total_sales, total_calls);

        let points = total_points as f64;
        let current_tier = ladder.current_tier(points).cloned();
        let next_tier = ladder.next_tier(points).cloned();
        let active_rate = ladder.active_rate(points);
        let projected_commission = calc_commission(total_premium, active_rate, config.premium_share);

        let working_days_left = working_days_left(today, work_days);
        let points_needed = next_tier
            .as_ref()
            .map(|t| t.min_points.saturating_sub(total_points))
            .unwrap_or(0);
        let points_per_shift = if working_days_left > 0 && points_needed > 0 {
            points_needed.div_ceil(working_days_left)
        } else {
            0
        };

        Self {
            total_calls,
            total_sales,
            total_points,
            total_bonus_points,
            total_premium,
            closure_rate,
            using_estimate: current_tier.is_none(),
            current_tier,
            next_tier,
            active_rate,
            active_label: ladder.active_label(points).map(str::to_string),
            projected_commission,
            working_days_left,
            points_needed,
            points_per_shift,
            products: product_breakdown(&sales),
            results: result_breakdown(calls),
            tier_progress: ladder.progress(points),
        }
    }
}

fn product_breakdown(sales: &[&CallEntry]) -> Vec<ProductBreakdown> {
    ProductKey::ALL
        .into_iter()
        .map(|product| {
            let with_product: Vec<&&CallEntry> = sales.iter().filter(|c| c.includes(product)).collect();
            let points = with_product
                .iter()
                .map(|c| match product.base_points() {
                    Some(pts) => pts,
                    // Auto entries without a recorded limit earn nothing here.
                    None => c.liability_limit.map(|l| l.points()).unwrap_or(0),
                })
                .sum();
            ProductBreakdown {
                product,
                label: product.label().to_string(),
                sales: with_product.len() as u32,
                points,
            }
        })
        .collect()
}

fn result_breakdown(calls: &[CallEntry]) -> Vec<ResultBreakdown> {
    let total = calls.len() as u32;
    CallResult::ALL
        .into_iter()
        .map(|result| {
            let count = calls.iter().filter(|c| c.result == result).count() as u32;
            ResultBreakdown {
                result,
                label: result.label().to_string(),
                count,
                percent: percent_of(count, total),
            }
        })
        .collect()
}

fn percent_of(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
