use super::TrackerStore;
use crate::{
    call_log::CallEntry,
    error::{TrackerError, TrackerResult},
    product::{CallResult, LiabilityLimit, ProductKey},
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::params;

/// Enum columns hold the serde key, e.g. `no_sale` or `100_300_plus`.
fn to_key<T: serde::Serialize>(value: &T) -> TrackerResult<String> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

fn from_key<T: serde::de::DeserializeOwned>(key: &str) -> serde_json::Result<T> {
    serde_json::from_value(serde_json::Value::String(key.to_string()))
}

fn conversion_err(idx: usize, e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

impl TrackerStore {
    // ── Call log ──────────────────────────────────────────────────

    pub fn insert_call(&self, call: &CallEntry) -> TrackerResult<()> {
        let liability = call.liability_limit.as_ref().map(to_key).transpose()?;
        self.conn.execute(
            "INSERT INTO call_entry (
                call_id, logged_at, result, products_json, liability_limit,
                points, bonus_points, bonus_reasons, premium, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                &call.id,
                call.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
                to_key(&call.result)?,
                serde_json::to_string(&call.products)?,
                liability,
                call.points,
                call.bonus_points,
                serde_json::to_string(&call.bonus_reasons)?,
                call.premium,
                &call.notes,
            ],
        )?;
        log::debug!("stored call {} ({})", call.id, call.result.key());
        Ok(())
    }

    /// Calls newest first. `limit` of `None` returns the whole log.
    pub fn calls(&self, limit: Option<usize>) -> TrackerResult<Vec<CallEntry>> {
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(
            "SELECT call_id, logged_at, result, products_json, liability_limit,
                    points, bonus_points, bonus_reasons, premium, notes
             FROM call_entry
             ORDER BY logged_at DESC, seq DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            let logged_at: String = row.get(1)?;
            let result: String = row.get(2)?;
            let products: String = row.get(3)?;
            let liability: Option<String> = row.get(4)?;
            let reasons: String = row.get(7)?;
            Ok(CallEntry {
                id: row.get(0)?,
                timestamp: DateTime::parse_from_rfc3339(&logged_at)
                    .map(|t| t.with_timezone(&Utc))
                    .map_err(|e| conversion_err(1, e))?,
                result: from_key::<CallResult>(&result).map_err(|e| conversion_err(2, e))?,
                products: serde_json::from_str::<Vec<ProductKey>>(&products)
                    .map_err(|e| conversion_err(3, e))?,
                liability_limit: liability
                    .map(|l| from_key::<LiabilityLimit>(&l))
                    .transpose()
                    .map_err(|e| conversion_err(4, e))?,
                points: row.get(5)?,
                bonus_points: row.get(6)?,
                bonus_reasons: serde_json::from_str(&reasons).map_err(|e| conversion_err(7, e))?,
                premium: row.get(8)?,
                notes: row.get(9)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn call_count(&self) -> TrackerResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM call_entry", [], |row| row.get(0))?;
        Ok(n)
    }

    pub fn delete_call(&self, call_id: &str) -> TrackerResult<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM call_entry WHERE call_id = ?1", params![call_id])?;
        if deleted == 0 {
            return Err(TrackerError::CallNotFound { id: call_id.to_string() });
        }
        Ok(())
    }

    /// Wipe the call log. Returns how many calls were removed.
    pub fn clear_calls(&self) -> TrackerResult<usize> {
        let removed = self.conn.execute("DELETE FROM call_entry", [])?;
        log::info!("cleared {removed} calls");
        Ok(removed)
    }
}
