use super::{now_rfc3339, TrackerStore};
use crate::{
    error::TrackerResult,
    report::{AgentRecord, ReportImport},
    types::Period,
};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One CSV import, as recorded alongside the rows it wrote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportBatch {
    pub batch_id: String,
    pub source: String,
    pub period: Period,
    pub imported: usize,
    pub skipped: usize,
    pub imported_at: String,
}

const RECORD_COLUMNS: &str =
    "agent_name, period, calls, sales, points, premium, closure_rate";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<AgentRecord> {
    Ok(AgentRecord {
        agent_name: row.get(0)?,
        period: row.get(1)?,
        calls: row.get(2)?,
        sales: row.get(3)?,
        points: row.get(4)?,
        premium: row.get(5)?,
        closure_rate: row.get(6)?,
    })
}

fn upsert(conn: &Connection, r: &AgentRecord, batch_id: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO agent_record (
            agent_name, period, calls, sales, points, premium, closure_rate, batch_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(agent_name, period) DO UPDATE SET
            agent_name   = excluded.agent_name,
            calls        = excluded.calls,
            sales        = excluded.sales,
            points       = excluded.points,
            premium      = excluded.premium,
            closure_rate = excluded.closure_rate,
            batch_id     = excluded.batch_id",
        params![
            &r.agent_name,
            &r.period,
            r.calls,
            r.sales,
            r.points,
            r.premium,
            r.closure_rate,
            batch_id
        ],
    )?;
    Ok(())
}

impl TrackerStore {
    // ── Agent records ─────────────────────────────────────────────

    /// Write a parsed report in one transaction. Rows for an agent and
    /// period that already exist are replaced.
    pub fn import_report(&self, source: &str, import: &ReportImport) -> TrackerResult<ImportBatch> {
        let batch = ImportBatch {
            batch_id: Uuid::new_v4().to_string(),
            source: source.to_string(),
            period: import.period.clone(),
            imported: import.records.len(),
            skipped: import.skipped,
            imported_at: now_rfc3339(),
        };

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO import_batch (batch_id, source, period, imported, skipped, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &batch.batch_id,
                &batch.source,
                &batch.period,
                batch.imported as i64,
                batch.skipped as i64,
                &batch.imported_at
            ],
        )?;
        for record in &import.records {
            upsert(&tx, record, &batch.batch_id)?;
        }
        tx.commit()?;

        log::info!(
            "imported {} agent records for {} from {source}",
            batch.imported,
            batch.period
        );
        Ok(batch)
    }

    /// Periods with data, newest first.
    pub fn periods(&self) -> TrackerResult<Vec<Period>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT period FROM agent_record ORDER BY period DESC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn latest_period(&self) -> TrackerResult<Option<Period>> {
        Ok(self.periods()?.into_iter().next())
    }

    pub fn records_for_period(&self, period: &str) -> TrackerResult<Vec<AgentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM agent_record WHERE period = ?1 ORDER BY agent_name"
        ))?;
        let rows = stmt.query_map(params![period], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Every period for one agent. Name matching ignores case.
    pub fn records_for_agent(&self, agent_name: &str) -> TrackerResult<Vec<AgentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM agent_record WHERE agent_name = ?1 ORDER BY period DESC"
        ))?;
        let rows = stmt.query_map(params![agent_name.trim()], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn import_batches(&self) -> TrackerResult<Vec<ImportBatch>> {
        let mut stmt = self.conn.prepare(
            "SELECT batch_id, source, period, imported, skipped, imported_at
             FROM import_batch ORDER BY imported_at DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ImportBatch {
                batch_id: row.get(0)?,
                source: row.get(1)?,
                period: row.get(2)?,
                imported: row.get::<_, i64>(3)? as usize,
                skipped: row.get::<_, i64>(4)? as usize,
                imported_at: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
