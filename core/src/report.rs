//! Productivity report import: CSV rows into `AgentRecord`s.
//!
//! Only the agent column is required. Numeric cells are parsed
//! best-effort and fall back to 0.

use crate::{
    error::{TrackerError, TrackerResult},
    format::parse_loose_number,
    types::{AgentName, Period},
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// One agent's numbers for one reporting period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentRecord {
    pub agent_name: AgentName,
    pub period: Period,
    pub calls: u32,
    pub sales: u32,
    pub points: f64,
    pub premium: f64,
    /// Percent, 0–100.
    pub closure_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportImport {
    pub period: Period,
    pub records: Vec<AgentRecord>,
    /// Rows dropped for having no agent name.
    pub skipped: usize,
    /// Rows that replaced an earlier row for the same agent.
    pub duplicates: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Agent,
    Calls,
    Sales,
    Points,
    Premium,
    ClosureRate,
}

impl Column {
    const ALL: [Column; 6] = [
        Self::Agent,
        Self::Calls,
        Self::Sales,
        Self::Points,
        Self::Premium,
        Self::ClosureRate,
    ];

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Agent       => &["agent", "agent name", "name", "rep"],
            Self::Calls       => &["calls", "total calls", "dials"],
            Self::Sales       => &["sales", "closed", "policies", "policies sold"],
            Self::Points      => &["points", "total points", "pts"],
            Self::Premium     => &["premium", "total premium", "written premium"],
            Self::ClosureRate => &["closure rate", "close rate", "conversion", "closure %"],
        }
    }

    fn matches(&self, header: &str) -> bool {
        let normalized = normalize_header(header);
        self.aliases().iter().any(|a| *a == normalized)
    }
}

fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

/// Reporting period label for a date, e.g. `2024-06`.
pub fn period_for(date: NaiveDate) -> Period {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn parse_report_path(path: &Path, period: &str) -> TrackerResult<ReportImport> {
    let file = std::fs::File::open(path)?;
    parse_report(file, period)
}

pub fn parse_report<R: Read>(reader: R, period: &str) -> TrackerResult<ReportImport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut positions: HashMap<Column, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        if let Some(col) = Column::ALL.into_iter().find(|c| c.matches(header)) {
            positions.entry(col).or_insert(idx);
        }
    }
    if !positions.contains_key(&Column::Agent) {
        return Err(TrackerError::MissingColumn { column: "agent".into() });
    }

    let period = period.trim().to_string();
    let mut import = ReportImport {
        period: period.clone(),
        ..ReportImport::default()
    };
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (row_idx, row) in csv_reader.records().enumerate() {
        let row = row?;
        let cell = |col: Column| positions.get(&col).and_then(|i| row.get(*i)).unwrap_or("");
        // Header is line 1.
        let line = row_idx + 2;

        let agent_name = cell(Column::Agent).trim().to_string();
        if agent_name.is_empty() {
            log::warn!("report line {line}: no agent name, row skipped");
            import.skipped += 1;
            continue;
        }

        let calls = count_cell(cell(Column::Calls), line, "calls");
        let sales = count_cell(cell(Column::Sales), line, "sales");
        let closure_rate = if positions.contains_key(&Column::ClosureRate) {
            number_cell(cell(Column::ClosureRate), line, "closure rate")
        } else if calls > 0 {
            sales as f64 / calls as f64 * 100.0
        } else {
            0.0
        };

        let record = AgentRecord {
            agent_name,
            period: period.clone(),
            calls,
            sales,
            points: number_cell(cell(Column::Points), line, "points"),
            premium: number_cell(cell(Column::Premium), line, "premium"),
            closure_rate,
        };

        let key = record.agent_name.to_ascii_lowercase();
        match seen.get(&key).copied() {
            Some(existing) => {
                log::warn!(
                    "report line {line}: duplicate row for '{}', replacing earlier row",
                    record.agent_name
                );
                import.records[existing] = record;
                import.duplicates += 1;
            }
            None => {
                seen.insert(key, import.records.len());
                import.records.push(record);
            }
        }
    }

    log::info!(
        "parsed report for {period}: {} agents, {} skipped, {} duplicates",
        import.records.len(),
        import.skipped,
        import.duplicates
    );
    Ok(import)
}

fn number_cell(raw: &str, line: usize, field: &str) -> f64 {
    match parse_loose_number(raw) {
        Some(n) => n,
        None => {
            if !raw.trim().is_empty() {
                log::warn!("report line {line}: unreadable {field} '{raw}', using 0");
            }
            0.0
        }
    }
}

fn count_cell(raw: &str, line: usize, field: &str) -> u32 {
    let n = number_cell(raw, line, field);
    if n <= 0.0 {
        0
    } else {
        n.trunc().min(u32::MAX as f64) as u32
    }
}
