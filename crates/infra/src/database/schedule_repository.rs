//! SQLite implementation of the schedule storage port.

use async_trait::async_trait;
use chrono::NaiveDate;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row};
use salonkit_core::ScheduleRepository;
use salonkit_domain::{
    BreakInterval, NewBreak, NewWorkingDay, Result, SalonError, WorkingDay,
};
use tracing::{debug, instrument};

use super::{map_pool_error, map_sql_error, DbManager};

const DAY_COLUMNS: &str = "schedule_id, master_id, work_date, start_time, end_time, is_day_off";
const BREAK_COLUMNS: &str = "break_id, schedule_id, break_start, break_end, reason";

/// Working-day and break storage backed by the shared SQLite pool.
pub struct SqliteScheduleRepository {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteScheduleRepository {
    pub fn new(db: &DbManager) -> Self {
        Self { pool: db.pool().clone() }
    }
}

fn map_working_day(row: &Row<'_>) -> rusqlite::Result<WorkingDay> {
    Ok(WorkingDay {
        schedule_id: row.get(0)?,
        master_id: row.get(1)?,
        work_date: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        is_day_off: row.get(5)?,
    })
}

fn map_break(row: &Row<'_>) -> rusqlite::Result<BreakInterval> {
    Ok(BreakInterval {
        break_id: row.get(0)?,
        schedule_id: row.get(1)?,
        break_start: row.get(2)?,
        break_end: row.get(3)?,
        reason: row.get(4)?,
    })
}

#[async_trait]
impl ScheduleRepository for SqliteScheduleRepository {
    #[instrument(skip(self, day), fields(master_id = day.master_id, work_date = %day.work_date))]
    async fn insert_working_day(&self, day: NewWorkingDay) -> Result<WorkingDay> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.execute(
            "INSERT INTO master_schedule (master_id, work_date, start_time, end_time, is_day_off) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![day.master_id, day.work_date, day.start_time, day.end_time, day.is_day_off],
        )
        .map_err(map_sql_error)?;

        Ok(WorkingDay {
            schedule_id: conn.last_insert_rowid(),
            master_id: day.master_id,
            work_date: day.work_date,
            start_time: day.start_time,
            end_time: day.end_time,
            is_day_off: day.is_day_off,
        })
    }

    async fn find_working_day(&self, schedule_id: i64) -> Result<Option<WorkingDay>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row(
            &format!("SELECT {DAY_COLUMNS} FROM master_schedule WHERE schedule_id = ?1"),
            params![schedule_id],
            map_working_day,
        )
        .optional()
        .map_err(map_sql_error)
    }

    async fn find_working_day_by_date(
        &self,
        master_id: i64,
        date: NaiveDate,
    ) -> Result<Option<WorkingDay>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row(
            &format!(
                "SELECT {DAY_COLUMNS} FROM master_schedule \
                 WHERE master_id = ?1 AND work_date = ?2"
            ),
            params![master_id, date],
            map_working_day,
        )
        .optional()
        .map_err(map_sql_error)
    }

    async fn list_working_days(
        &self,
        master_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkingDay>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {DAY_COLUMNS} FROM master_schedule \
                 WHERE master_id = ?1 AND work_date >= ?2 AND work_date <= ?3 \
                 ORDER BY work_date"
            ))
            .map_err(map_sql_error)?;
        let rows = stmt
            .query_map(params![master_id, from, to], map_working_day)
            .map_err(map_sql_error)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
    }

    #[instrument(skip(self))]
    async fn delete_working_day(&self, schedule_id: i64) -> Result<()> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        let rows = conn
            .execute("DELETE FROM master_schedule WHERE schedule_id = ?1", params![schedule_id])
            .map_err(map_sql_error)?;
        if rows == 0 {
            return Err(SalonError::ScheduleNotFound(schedule_id));
        }
        debug!("working day deleted, breaks and appointments cascaded");
        Ok(())
    }

    async fn insert_break(&self, brk: NewBreak) -> Result<BreakInterval> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.execute(
            "INSERT INTO master_breaks (schedule_id, break_start, break_end, reason) \
             VALUES (?1, ?2, ?3, ?4)",
            params![brk.schedule_id, brk.break_start, brk.break_end, brk.reason],
        )
        .map_err(map_sql_error)?;

        Ok(BreakInterval {
            break_id: conn.last_insert_rowid(),
            schedule_id: brk.schedule_id,
            break_start: brk.break_start,
            break_end: brk.break_end,
            reason: brk.reason,
        })
    }

    async fn list_breaks(&self, schedule_id: i64) -> Result<Vec<BreakInterval>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {BREAK_COLUMNS} FROM master_breaks \
                 WHERE schedule_id = ?1 ORDER BY break_start"
            ))
            .map_err(map_sql_error)?;
        let rows =
            stmt.query_map(params![schedule_id], map_break).map_err(map_sql_error)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
    }
}
