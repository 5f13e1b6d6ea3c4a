use super::{now_rfc3339, TrackerStore};
use crate::{error::TrackerResult, tier::TierTarget, types::WorkDay};
use rusqlite::{params, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};

const AGENT_NAME: &str = "agent_name";
const WORK_DAYS: &str = "work_days";
const TIER_TARGETS: &str = "tier_targets";

impl TrackerStore {
    // ── Settings ──────────────────────────────────────────────────

    fn put_setting<T: Serialize>(&self, key: &str, value: &T) -> TrackerResult<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO setting (key, value_json, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json,
                                            updated_at = excluded.updated_at",
            params![key, json, now_rfc3339()],
        )?;
        Ok(())
    }

    /// Read a setting. A value that no longer deserializes is treated as
    /// absent so a bad row never locks the agent out.
    fn get_setting<T: DeserializeOwned>(&self, key: &str) -> TrackerResult<Option<T>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value_json FROM setting WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(raw.and_then(|json| match serde_json::from_str(&json) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("setting '{key}' unreadable ({e}), falling back to default");
                None
            }
        }))
    }

    pub fn agent_name(&self, default: &str) -> TrackerResult<String> {
        Ok(self
            .get_setting::<String>(AGENT_NAME)?
            .unwrap_or_else(|| default.to_string()))
    }

    pub fn set_agent_name(&self, name: &str) -> TrackerResult<()> {
        self.put_setting(AGENT_NAME, &name.trim())
    }

    pub fn work_days(&self, default: &[WorkDay]) -> TrackerResult<Vec<WorkDay>> {
        Ok(self
            .get_setting::<Vec<WorkDay>>(WORK_DAYS)?
            .unwrap_or_else(|| default.to_vec()))
    }

    pub fn set_work_days(&self, days: &[WorkDay]) -> TrackerResult<()> {
        self.put_setting(WORK_DAYS, &days)
    }

    pub fn tier_targets(&self, default: &[TierTarget]) -> TrackerResult<Vec<TierTarget>> {
        Ok(self
            .get_setting::<Vec<TierTarget>>(TIER_TARGETS)?
            .unwrap_or_else(|| default.to_vec()))
    }

    pub fn set_tier_targets(&self, targets: &[TierTarget]) -> TrackerResult<()> {
        self.put_setting(TIER_TARGETS, &targets)
    }
}
