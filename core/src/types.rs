//! Shared primitive types used across the tracker.

/// Short identifier of a logged call.
pub type CallId = String;

/// Display name of an agent, as it appears in imported reports.
pub type AgentName = String;

/// Reporting period of an imported report, e.g. `2024-06`.
pub type Period = String;

/// Weekday index, Monday = 0 through Sunday = 6.
pub type WorkDay = u8;
