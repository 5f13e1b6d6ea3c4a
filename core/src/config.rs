use crate::{tier::TierTarget, types::WorkDay};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE: &str = "tracker.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Tier ladder used until the agent edits their own targets.
    pub default_tier_targets: Vec<TierTarget>,
    /// Share of written premium the commission rate applies to.
    pub premium_share: f64,
    /// Rate used when the tier ladder is empty.
    pub fallback_rate: f64,
    pub default_work_days: Vec<WorkDay>,
    pub default_agent_name: String,
    /// How many calls the recent-calls listing shows.
    pub recent_call_limit: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_tier_targets: vec![
                TierTarget::new("Bronze", 10, 5.0),
                TierTarget::new("Superior", 25, 8.0),
                TierTarget::new("Top", 50, 12.0),
            ],
            premium_share: 0.10,
            fallback_rate: 0.05,
            default_work_days: vec![0, 1, 2, 3, 4],
            default_agent_name: "Agent".into(),
            recent_call_limit: 80,
        }
    }
}

impl TrackerConfig {
    /// Load from `<data_dir>/tracker.json`.
    /// Fields absent from the file keep their defaults.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/{CONFIG_FILE}");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: TrackerConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults.
    /// A file that exists and fails to parse is still an error.
    pub fn load_or_default(data_dir: &str) -> anyhow::Result<Self> {
        if Path::new(data_dir).join(CONFIG_FILE).exists() {
            Self::load(data_dir)
        } else {
            log::info!("no {CONFIG_FILE} under {data_dir}, using built-in defaults");
            Ok(Self::default())
        }
    }
}
