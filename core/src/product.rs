//! The fixed rule table: products, auto liability limits, call outcomes.
//!
//! RULE: point values live here and nowhere else.
//! points.rs and stats.rs read them through these methods.

use crate::error::TrackerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ProductKey {
    Auto,
    Home,
    Renters,
    Motorcycle,
    Rv,
    Umbrella,
    Boat,
}

impl ProductKey {
    /// Display order.
    pub const ALL: [ProductKey; 7] = [
        Self::Auto,
        Self::Home,
        Self::Renters,
        Self::Motorcycle,
        Self::Rv,
        Self::Umbrella,
        Self::Boat,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Auto       => "auto",
            Self::Home       => "home",
            Self::Renters    => "renters",
            Self::Motorcycle => "motorcycle",
            Self::Rv         => "rv",
            Self::Umbrella   => "umbrella",
            Self::Boat       => "boat",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Auto       => "Auto",
            Self::Home       => "Home",
            Self::Renters    => "Renters",
            Self::Motorcycle => "Motorcycle",
            Self::Rv         => "RV",
            Self::Umbrella   => "Umbrella",
            Self::Boat       => "Boat",
        }
    }

    /// Flat points for this product. `None` for auto, which is
    /// scored by its liability limit instead.
    pub fn base_points(&self) -> Option<u32> {
        match self {
            Self::Auto => None,
            Self::Home => Some(3),
            Self::Renters => Some(1),
            Self::Motorcycle | Self::Rv | Self::Umbrella | Self::Boat => Some(2),
        }
    }

    /// Points this product contributes on a sale with the given liability.
    pub fn points_with(&self, liability: LiabilityLimit) -> u32 {
        self.base_points().unwrap_or_else(|| liability.points())
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProductKey {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.key() == needle)
            .ok_or_else(|| anyhow::anyhow!("unknown product '{s}'").into())
    }
}

/// Auto liability limit. Drives auto base points and the home bundle bonus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum LiabilityLimit {
    #[default]
    #[serde(rename = "below_50_100")]
    Below50_100,
    #[serde(rename = "50_100")]
    Limit50_100,
    #[serde(rename = "100_300_plus")]
    Limit100_300Plus,
}

impl LiabilityLimit {
    pub const ALL: [LiabilityLimit; 3] = [Self::Below50_100, Self::Limit50_100, Self::Limit100_300Plus];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Below50_100      => "below_50_100",
            Self::Limit50_100      => "50_100",
            Self::Limit100_300Plus => "100_300_plus",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Below50_100      => "Below 50/100",
            Self::Limit50_100      => "50/100",
            Self::Limit100_300Plus => "100/300+",
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            Self::Below50_100      => 1,
            Self::Limit50_100      => 2,
            Self::Limit100_300Plus => 3,
        }
    }
}

impl fmt::Display for LiabilityLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LiabilityLimit {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.key() == needle || l.label().to_ascii_lowercase() == needle)
            .ok_or_else(|| anyhow::anyhow!("unknown liability limit '{s}'").into())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallResult {
    #[default]
    Sale,
    NoSale,
    Voicemail,
    Other,
}

impl CallResult {
    pub const ALL: [CallResult; 4] = [Self::Sale, Self::NoSale, Self::Voicemail, Self::Other];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Sale      => "sale",
            Self::NoSale    => "no_sale",
            Self::Voicemail => "voicemail",
            Self::Other     => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sale      => "Sale",
            Self::NoSale    => "No Sale",
            Self::Voicemail => "Left Voicemail",
            Self::Other     => "Other",
        }
    }

    pub fn is_sale(&self) -> bool {
        matches!(self, Self::Sale)
    }
}

impl fmt::Display for CallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CallResult {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|r| r.key() == needle)
            .ok_or_else(|| anyhow::anyhow!("unknown call result '{s}'").into())
    }
}
