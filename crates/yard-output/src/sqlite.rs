//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `records.db` file in the configured output directory
//! with two tables: `simulation_records` and `out_list_records`.

use std::path::Path;

use rusqlite::Connection;

use crate::{ExitRow, OutputResult, StepRow};
use crate::writer::RecordWriter;

/// Writes episode records to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `records.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("records.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS simulation_records (
                 step           INTEGER PRIMARY KEY,
                 action         INTEGER NOT NULL,
                 agent          TEXT    NOT NULL,
                 agent_x        INTEGER NOT NULL,
                 agent_y        INTEGER NOT NULL,
                 target_x       INTEGER NOT NULL,
                 target_y       INTEGER NOT NULL,
                 reward         REAL    NOT NULL,
                 total_reward   REAL    NOT NULL,
                 sim_date       TEXT    NOT NULL,
                 conflict_count INTEGER NOT NULL,
                 residents      INTEGER NOT NULL,
                 done           INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS out_list_records (
                 item_id    TEXT    NOT NULL,
                 start_time TEXT    NOT NULL,
                 exit_time  TEXT    NOT NULL,
                 exited_on  TEXT    NOT NULL,
                 step       INTEGER NOT NULL,
                 swept      INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl RecordWriter for SqliteWriter {
    fn write_step(&mut self, row: &StepRow) -> OutputResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO simulation_records \
             (step, action, agent, agent_x, agent_y, target_x, target_y, \
              reward, total_reward, sim_date, conflict_count, residents, done) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )?;
        stmt.execute(rusqlite::params![
            row.step as i64,
            row.action,
            row.agent_label,
            row.agent_x,
            row.agent_y,
            row.target_x,
            row.target_y,
            row.reward,
            row.total_reward,
            row.sim_date,
            row.conflict_count,
            row.residents as i64,
            row.done as i64,
        ])?;
        Ok(())
    }

    fn write_exit(&mut self, row: &ExitRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO out_list_records \
             (item_id, start_time, exit_time, exited_on, step, swept) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.item_id,
                row.start_time,
                row.exit_time,
                row.exited_on,
                row.step as i64,
                row.swept as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
