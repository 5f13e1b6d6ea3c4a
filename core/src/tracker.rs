//! The tracker facade: store plus config, with one method per user action.
//!
//! Front ends call these methods and print what comes back. They never
//! touch the store or recompute numbers themselves.

use crate::{
    calendar::toggle_work_day,
    call_log::{CallDraft, CallEntry},
    config::TrackerConfig,
    error::TrackerResult,
    leaderboard::{AgentDetail, Leaderboard},
    report::parse_report,
    stats::DashboardStats,
    store::{ImportBatch, TrackerStore},
    tier::{TierLadder, TierTarget},
    types::{Period, WorkDay},
};
use chrono::{DateTime, NaiveDate, Utc};
use std::io::Read;
use std::path::Path;

pub struct Tracker {
    pub config: TrackerConfig,
    store: TrackerStore,
}

impl Tracker {
    /// Wrap an opened store. Applies migrations.
    pub fn new(store: TrackerStore, config: TrackerConfig) -> TrackerResult<Self> {
        store.migrate()?;
        Ok(Self { config, store })
    }

    /// In-memory tracker with default config. Used in tests.
    pub fn in_memory() -> TrackerResult<Self> {
        Self::new(TrackerStore::in_memory()?, TrackerConfig::default())
    }

    pub fn store(&self) -> &TrackerStore {
        &self.store
    }

    // ── Agent settings ────────────────────────────────────────────

    pub fn agent_name(&self) -> TrackerResult<String> {
        self.store.agent_name(&self.config.default_agent_name)
    }

    /// Blank names are ignored and the current name is kept.
    pub fn rename_agent(&self, name: &str) -> TrackerResult<String> {
        if !name.trim().is_empty() {
            self.store.set_agent_name(name)?;
        }
        self.agent_name()
    }

    pub fn work_days(&self) -> TrackerResult<Vec<WorkDay>> {
        self.store.work_days(&self.config.default_work_days)
    }

    pub fn toggle_work_day(&self, day: WorkDay) -> TrackerResult<Vec<WorkDay>> {
        let mut days = self.work_days()?;
        toggle_work_day(&mut days, day)?;
        self.store.set_work_days(&days)?;
        Ok(days)
    }

    // ── Tiers ─────────────────────────────────────────────────────

    pub fn tier_targets(&self) -> TrackerResult<Vec<TierTarget>> {
        self.store.tier_targets(&self.config.default_tier_targets)
    }

    pub fn ladder(&self) -> TrackerResult<TierLadder> {
        Ok(TierLadder::from_targets(&self.tier_targets()?, self.config.fallback_rate))
    }

    /// Edit one tier by position. `None` leaves that field alone.
    pub fn update_tier(
        &self,
        index: usize,
        min_points: Option<&str>,
        rate: Option<&str>,
    ) -> TrackerResult<Vec<TierTarget>> {
        let mut targets = self.tier_targets()?;
        let count = targets.len();
        let target = targets
            .get_mut(index)
            .ok_or_else(|| anyhow::anyhow!("no tier at position {index} (have {count})"))?;
        if let Some(raw) = min_points {
            target.set_min_points(raw);
        }
        if let Some(raw) = rate {
            target.set_rate(raw);
        }
        self.store.set_tier_targets(&targets)?;
        Ok(targets)
    }

    pub fn reset_tiers(&self) -> TrackerResult<Vec<TierTarget>> {
        let defaults = self.config.default_tier_targets.clone();
        self.store.set_tier_targets(&defaults)?;
        Ok(defaults)
    }

    // ── Call log ──────────────────────────────────────────────────

    pub fn log_call(&self, draft: CallDraft, now: DateTime<Utc>) -> TrackerResult<CallEntry> {
        let entry = draft.into_entry(now);
        self.store.insert_call(&entry)?;
        log::info!(
            "logged {} call {}: {} pts, premium {:.2}",
            entry.result.key(),
            entry.id,
            entry.total_points(),
            entry.premium
        );
        Ok(entry)
    }

    pub fn calls(&self) -> TrackerResult<Vec<CallEntry>> {
        self.store.calls(None)
    }

    pub fn recent_calls(&self) -> TrackerResult<Vec<CallEntry>> {
        self.store.calls(Some(self.config.recent_call_limit))
    }

    pub fn delete_call(&self, call_id: &str) -> TrackerResult<()> {
        self.store.delete_call(call_id)
    }

    pub fn clear_calls(&self) -> TrackerResult<usize> {
        self.store.clear_calls()
    }

    pub fn dashboard(&self, today: NaiveDate) -> TrackerResult<DashboardStats> {
        Ok(DashboardStats::compute(
            &self.calls()?,
            &self.ladder()?,
            &self.work_days()?,
            today,
            &self.config,
        ))
    }

    // ── Team report ───────────────────────────────────────────────

    pub fn import_report<R: Read>(&self, source: &str, reader: R, period: &str) -> TrackerResult<ImportBatch> {
        let import = parse_report(reader, period)?;
        self.store.import_report(source, &import)
    }

    pub fn import_report_path(&self, path: &Path, period: &str) -> TrackerResult<ImportBatch> {
        let file = std::fs::File::open(path)?;
        self.import_report(&path.display().to_string(), file, period)
    }

    /// Leaderboard for `period`, or for the newest imported period.
    pub fn leaderboard(&self, period: Option<&str>) -> TrackerResult<Option<Leaderboard>> {
        let period: Period = match period {
            Some(p) => p.trim().to_string(),
            None => match self.store.latest_period()? {
                Some(p) => p,
                None => return Ok(None),
            },
        };
        let records = self.store.records_for_period(&period)?;
        Ok(Some(Leaderboard::build(&period, &records, &self.ladder()?, &self.config)))
    }

    /// Unknown names come back as `AgentNotFound`.
    pub fn agent_detail(&self, agent_name: &str) -> TrackerResult<AgentDetail> {
        let records = self.store.records_for_agent(agent_name)?;
        AgentDetail::build(agent_name, &records, &self.ladder()?, &self.config)
    }
}
