//! salestrack-core: points, commission tiers and team reports for
//! insurance call-center agents.
//!
//! Two front-end flows share this crate:
//!   - Agent tracker: log call outcomes, see points, tier progress and
//!     projected commission (`call_log`, `stats`).
//!   - Team report: import a CSV productivity report, browse the
//!     leaderboard and per-agent history (`report`, `leaderboard`).
//!
//! All persistence goes through `store::TrackerStore`.

pub mod calendar;
pub mod call_log;
pub mod config;
pub mod error;
pub mod format;
pub mod leaderboard;
pub mod points;
pub mod product;
pub mod report;
pub mod stats;
pub mod store;
pub mod tier;
pub mod tracker;
pub mod types;
