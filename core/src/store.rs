//! SQLite persistence for run traces.
//!
//! RULE: Only store.rs talks to the database.
//! The engine never sees SQL; it publishes events to a TraceStore
//! through the DeskObserver hook like any other observer.

use crate::{
    error::SimResult,
    event::{DeskEvent, DeskObserver, EventLogEntry},
    metrics::SimulationReport,
    types::RunId,
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct TraceStore {
    conn:   Connection,
    run_id: RunId,
    seq:    u64,
}

impl TraceStore {
    /// Open (or create) the trace database at `path` for `run_id`.
    pub fn open(path: &str, run_id: RunId) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, run_id, seq: 0 })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory(run_id: RunId) -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, run_id, seq: 0 })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, seed: u64, days: u32, version: &str) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, days, version) VALUES (?1, ?2, ?3, ?4)",
            params![self.run_id, seed as i64, days, version],
        )?;
        Ok(())
    }

    pub fn save_report(&self, report: &SimulationReport) -> SimResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO report (run_id, report_json) VALUES (?1, ?2)",
            params![self.run_id, serde_json::to_string(report)?],
        )?;
        Ok(())
    }

    pub fn load_report(&self) -> SimResult<Option<SimulationReport>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT report_json FROM report WHERE run_id = ?1",
                params![self.run_id],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, seq, sim_time, event_type, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.run_id,
                entry.seq as i64,
                entry.sim_time,
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    /// Every persisted event of this run, in emission order.
    pub fn events(&self) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, seq, sim_time, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY seq ASC",
        )?;
        let entries = stmt
            .query_map(params![self.run_id], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    run_id:     row.get(1)?,
                    seq:        row.get::<_, i64>(2)? as u64,
                    sim_time:   row.get(3)?,
                    event_type: row.get(4)?,
                    payload:    row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, event_type: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1 AND event_type = ?2",
            params![self.run_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl DeskObserver for TraceStore {
    fn on_event(&mut self, event: &DeskEvent) -> SimResult<()> {
        let entry = EventLogEntry {
            id:         None,
            run_id:     self.run_id.clone(),
            seq:        self.seq,
            sim_time:   event.time(),
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(event)?,
        };
        self.append_event(&entry)?;
        self.seq += 1;
        Ok(())
    }
}
