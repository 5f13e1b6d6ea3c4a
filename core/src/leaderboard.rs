//! Team views over imported report records.

use crate::{
    config::TrackerConfig,
    error::{TrackerError, TrackerResult},
    report::AgentRecord,
    tier::{calc_commission, TierLadder},
    types::{AgentName, Period},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub agent_name: AgentName,
    pub calls: u32,
    pub sales: u32,
    pub points: f64,
    pub premium: f64,
    pub closure_rate: f64,
    /// Tier actually reached, if any.
    pub tier: Option<String>,
    pub active_rate: f64,
    pub projected_commission: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamTotals {
    pub agents: usize,
    pub calls: u32,
    pub sales: u32,
    pub points: f64,
    pub premium: f64,
    pub closure_rate: f64,
}

impl TeamTotals {
    fn from_records<'a>(records: impl IntoIterator<Item = &'a AgentRecord>) -> Self {
        let mut totals = TeamTotals::default();
        for r in records {
            totals.agents += 1;
            totals.calls += r.calls;
            totals.sales += r.sales;
            totals.points += r.points;
            totals.premium += r.premium;
        }
        totals.closure_rate = if totals.calls > 0 {
            totals.sales as f64 / totals.calls as f64 * 100.0
        } else {
            0.0
        };
        totals
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Leaderboard {
    pub period: Period,
    pub entries: Vec<LeaderboardEntry>,
    pub totals: TeamTotals,
}

impl Leaderboard {
    /// Rank a period's records: points, then premium, both descending;
    /// agent name breaks remaining ties.
    pub fn build(
        period: &str,
        records: &[AgentRecord],
        ladder: &TierLadder,
        config: &TrackerConfig,
    ) -> Self {
        let mut in_period: Vec<&AgentRecord> = records.iter().filter(|r| r.period == period).collect();
        in_period.sort_by(|a, b| standing(a, b));

        let entries = in_period
            .iter()
            .enumerate()
            .map(|(idx, r)| {
                let active_rate = ladder.active_rate(r.points);
                LeaderboardEntry {
                    rank: idx + 1,
                    agent_name: r.agent_name.clone(),
                    calls: r.calls,
                    sales: r.sales,
                    points: r.points,
                    premium: r.premium,
                    closure_rate: r.closure_rate,
                    tier: ladder.current_tier(r.points).map(|t| t.label.clone()),
                    active_rate,
                    projected_commission: calc_commission(r.premium, active_rate, config.premium_share),
                }
            })
            .collect();

        Self {
            period: period.to_string(),
            entries,
            totals: TeamTotals::from_records(in_period.iter().copied()),
        }
    }

    pub fn entry(&self, agent_name: &str) -> Option<&LeaderboardEntry> {
        self.entries
            .iter()
            .find(|e| e.agent_name.eq_ignore_ascii_case(agent_name))
    }
}

fn standing(a: &AgentRecord, b: &AgentRecord) -> Ordering {
    b.points
        .total_cmp(&a.points)
        .then_with(|| b.premium.total_cmp(&a.premium))
        .then_with(|| a.agent_name.to_ascii_lowercase().cmp(&b.agent_name.to_ascii_lowercase()))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentPeriod {
    pub record: AgentRecord,
    pub tier: Option<String>,
    pub active_rate: f64,
    pub projected_commission: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentDetail {
    pub agent_name: AgentName,
    /// Newest period first.
    pub periods: Vec<AgentPeriod>,
    pub totals: TeamTotals,
    pub best_period: Option<Period>,
    pub total_projected_commission: f64,
}

impl AgentDetail {
    /// Gather one agent's history. Name matching ignores ASCII case.
    pub fn build(
        agent_name: &str,
        records: &[AgentRecord],
        ladder: &TierLadder,
        config: &TrackerConfig,
    ) -> TrackerResult<Self> {
        let mut mine: Vec<&AgentRecord> = records
            .iter()
            .filter(|r| r.agent_name.eq_ignore_ascii_case(agent_name.trim()))
            .collect();
        if mine.is_empty() {
            return Err(TrackerError::AgentNotFound { name: agent_name.to_string() });
        }
        mine.sort_by(|a, b| b.period.cmp(&a.period));

        let periods: Vec<AgentPeriod> = mine
            .iter()
            .map(|r| {
                let active_rate = ladder.active_rate(r.points);
                AgentPeriod {
                    record: (*r).clone(),
                    tier: ladder.current_tier(r.points).map(|t| t.label.clone()),
                    active_rate,
                    projected_commission: calc_commission(r.premium, active_rate, config.premium_share),
                }
            })
            .collect();

        let best_period = mine
            .iter()
            .max_by(|a, b| a.points.total_cmp(&b.points))
            .map(|r| r.period.clone());
        let total_projected_commission = periods.iter().map(|p| p.projected_commission).sum();

        // Records keep the spelling from their own import; show the newest.
        let display_name = mine[0].agent_name.clone();
        let mut totals = TeamTotals::from_records(mine.iter().copied());
        totals.agents = 1;

        Ok(Self {
            agent_name: display_name,
            periods,
            totals,
            best_period,
            total_projected_commission,
        })
    }
}
