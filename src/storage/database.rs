//! SQLite store for result history and the audit trail

use crate::error::Result;
use crate::storage::{AuditEvent, ResultRecord, ResultSink};
use log::{debug, info};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    resume_name TEXT NOT NULL,
    jd_name TEXT NOT NULL,
    score REAL NOT NULL,
    hard_score REAL NOT NULL,
    semantic_score REAL NOT NULL,
    verdict TEXT NOT NULL,
    missing_keywords TEXT NOT NULL,
    timestamp TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS audit_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_type TEXT NOT NULL,
    item_name TEXT,
    timestamp TEXT NOT NULL
);
";

pub const DEFAULT_AUDIT_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub id: i64,
    pub resume_name: String,
    pub jd_name: String,
    pub score: f64,
    pub hard_score: f64,
    pub semantic_score: f64,
    pub verdict: String,
    pub missing_keywords: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub id: i64,
    pub event_type: String,
    pub item_name: Option<String>,
    pub timestamp: String,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database file, creating parent directories
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Self::init(conn)?;
        info!("Opened results database: {}", path.display());
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Most recent results first
    pub fn recent_results(&self, limit: usize) -> Result<Vec<StoredResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, resume_name, jd_name, score, hard_score, semantic_score, verdict, missing_keywords, timestamp
             FROM results ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], Self::row_to_result)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Most recent audit events first
    pub fn recent_events(&self, limit: usize) -> Result<Vec<StoredEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_type, item_name, timestamp
             FROM audit_log ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(StoredEvent {
                id: row.get(0)?,
                event_type: row.get(1)?,
                item_name: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Delete all results and audit events, returning how many rows went
    pub fn clear(&self) -> Result<usize> {
        let results = self.conn.execute("DELETE FROM results", [])?;
        let events = self.conn.execute("DELETE FROM audit_log", [])?;
        info!("Cleared {} results and {} audit events", results, events);
        Ok(results + events)
    }

    fn row_to_result(row: &Row<'_>) -> rusqlite::Result<StoredResult> {
        Ok(StoredResult {
            id: row.get(0)?,
            resume_name: row.get(1)?,
            jd_name: row.get(2)?,
            score: row.get(3)?,
            hard_score: row.get(4)?,
            semantic_score: row.get(5)?,
            verdict: row.get(6)?,
            missing_keywords: row.get(7)?,
            timestamp: row.get(8)?,
        })
    }

    fn now() -> String {
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl ResultSink for Database {
    fn save_result(&self, record: &ResultRecord<'_>) -> Result<()> {
        self.conn.execute(
            "INSERT INTO results (resume_name, jd_name, score, hard_score, semantic_score, verdict, missing_keywords, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.resume_name,
                record.jd_name,
                record.score.final_score,
                record.score.hard_score,
                record.score.semantic_score,
                record.verdict.label(),
                record.score.missing_skills.join(", "),
                Self::now(),
            ],
        )?;
        debug!("Saved result for {} against {}", record.resume_name, record.jd_name);
        Ok(())
    }

    fn log_event(&self, event: &AuditEvent) -> Result<()> {
        self.conn.execute(
            "INSERT INTO audit_log (event_type, item_name, timestamp) VALUES (?1, ?2, ?3)",
            params![event.event_type.as_str(), event.item_name, Self::now()],
        )?;
        Ok(())
    }
}
