//! Logging call outcomes.
//!
//! A `CallDraft` holds what the agent has entered so far; `into_entry`
//! freezes it into a `CallEntry` with points and premium resolved.

use crate::{
    format::parse_loose_number,
    points::{calculate_points, PointBreakdown},
    product::{CallResult, LiabilityLimit, ProductKey},
    types::CallId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallEntry {
    pub id: CallId,
    pub timestamp: DateTime<Utc>,
    pub result: CallResult,
    pub products: Vec<ProductKey>,
    pub liability_limit: Option<LiabilityLimit>,
    pub points: u32,
    pub bonus_points: u32,
    pub bonus_reasons: Vec<String>,
    pub premium: f64,
    pub notes: Option<String>,
}

impl CallEntry {
    pub fn total_points(&self) -> u32 {
        self.points + self.bonus_points
    }

    pub fn includes(&self, product: ProductKey) -> bool {
        self.products.contains(&product)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallDraft {
    pub result: CallResult,
    products: Vec<ProductKey>,
    pub liability: LiabilityLimit,
    premiums: BTreeMap<ProductKey, String>,
    pub notes: String,
}

impl Default for CallDraft {
    fn default() -> Self {
        Self {
            result: CallResult::Sale,
            products: Vec::new(),
            liability: LiabilityLimit::Limit50_100,
            premiums: BTreeMap::new(),
            notes: String::new(),
        }
    }
}

impl CallDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[ProductKey] {
        &self.products
    }

    pub fn is_selected(&self, product: ProductKey) -> bool {
        self.products.contains(&product)
    }

    /// Select or deselect a product. Deselecting drops its premium.
    pub fn toggle_product(&mut self, product: ProductKey) {
        if let Some(pos) = self.products.iter().position(|p| *p == product) {
            self.products.remove(pos);
            self.premiums.remove(&product);
        } else {
            self.products.push(product);
        }
    }

    /// Record the premium typed for one product. Kept as text until the
    /// entry is built, so partial input never fails.
    pub fn set_premium(&mut self, product: ProductKey, input: &str) {
        self.premiums.insert(product, input.to_string());
    }

    pub fn premium_input(&self, product: ProductKey) -> Option<&str> {
        self.premiums.get(&product).map(String::as_str)
    }

    /// Sum of the premiums entered for the selected products.
    pub fn premium_total(&self) -> f64 {
        self.products
            .iter()
            .filter_map(|p| self.premiums.get(p))
            .filter_map(|raw| parse_loose_number(raw))
            .sum()
    }

    pub fn preview(&self) -> PointBreakdown {
        calculate_points(&self.products, Some(self.liability))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build the entry to store. Anything but a sale carries no products,
    /// points or premium; notes survive for every outcome.
    pub fn into_entry(self, now: DateTime<Utc>) -> CallEntry {
        let notes = Some(self.notes.trim().to_string()).filter(|n| !n.is_empty());

        if !self.result.is_sale() {
            return CallEntry {
                id: generate_id(),
                timestamp: now,
                result: self.result,
                products: Vec::new(),
                liability_limit: None,
                points: 0,
                bonus_points: 0,
                bonus_reasons: Vec::new(),
                premium: 0.0,
                notes,
            };
        }

        let breakdown = self.preview();
        let premium = self.premium_total();
        let liability_limit = self.is_selected(ProductKey::Auto).then_some(self.liability);

        CallEntry {
            id: generate_id(),
            timestamp: now,
            result: self.result,
            products: self.products,
            liability_limit,
            points: breakdown.base,
            bonus_points: breakdown.bonus,
            bonus_reasons: breakdown.bonus_reasons,
            premium,
            notes,
        }
    }
}

/// Short lowercase id for a call, e.g. `3f9a0c1e`.
pub fn generate_id() -> CallId {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
