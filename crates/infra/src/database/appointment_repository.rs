//! SQLite implementation of the appointment storage port.
//!
//! `insert_if_slot_free` is the commit point of the whole booking flow: the
//! break and overlap re-checks and the insert run inside one
//! `BEGIN IMMEDIATE` transaction, so concurrent writers against the same
//! working day serialize on the database write lock and at most one of
//! them can pass the checks.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row, ToSql, TransactionBehavior};
use salonkit_core::AppointmentRepository;
use salonkit_domain::{
    Appointment, AppointmentFilter, AppointmentStatus, NewAppointment, Result, SalonError,
};
use tracing::{debug, instrument};

use super::{map_pool_error, map_sql_error, DbManager};

const APPOINTMENT_COLUMNS: &str = "appointment_id, master_id, client_id, service_id, \
     schedule_id, start_datetime, end_datetime, status, created_at, notes";

/// Appointment storage backed by the shared SQLite pool.
pub struct SqliteAppointmentRepository {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAppointmentRepository {
    pub fn new(db: &DbManager) -> Self {
        Self { pool: db.pool().clone() }
    }
}

/// Appointment instants are stored as unix epoch seconds.
fn to_epoch(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp()
}

fn utc_from_epoch(ts: i64, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, ts))
}

fn from_epoch(ts: i64, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    utc_from_epoch(ts, idx).map(|dt| dt.naive_utc())
}

fn parse_status(raw: &str, idx: usize) -> rusqlite::Result<AppointmentStatus> {
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into())
    })
}

fn map_appointment(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    let status: String = row.get(7)?;
    Ok(Appointment {
        appointment_id: row.get(0)?,
        master_id: row.get(1)?,
        client_id: row.get(2)?,
        service_id: row.get(3)?,
        schedule_id: row.get(4)?,
        start_datetime: from_epoch(row.get(5)?, 5)?,
        end_datetime: from_epoch(row.get(6)?, 6)?,
        status: parse_status(&status, 7)?,
        created_at: utc_from_epoch(row.get(8)?, 8)?,
        notes: row.get(9)?,
    })
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepository {
    #[instrument(skip(self, appointment), fields(schedule_id = appointment.schedule_id))]
    async fn insert_if_slot_free(&self, appointment: NewAppointment) -> Result<Appointment> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(map_sql_error)?;

        let start = to_epoch(appointment.start_datetime);
        let end = to_epoch(appointment.end_datetime);

        // A break may have landed between the validator's read and this
        // commit; re-check on the same write lock as the overlap count.
        let breaks: i64 = tx
            .query_row(
                "SELECT COUNT(*) FROM master_breaks b \
                 JOIN master_schedule s ON s.schedule_id = b.schedule_id \
                 WHERE b.schedule_id = ?1 \
                 AND CAST(strftime('%s', s.work_date || ' ' || b.break_start) AS INTEGER) < ?2 \
                 AND CAST(strftime('%s', s.work_date || ' ' || b.break_end) AS INTEGER) > ?3",
                params![appointment.schedule_id, end, start],
                |row| row.get(0),
            )
            .map_err(map_sql_error)?;
        if breaks > 0 {
            debug!(breaks, "break claimed the range inside the transaction");
            return Err(SalonError::OverlapsBreak);
        }

        let conflicts: i64 = tx
            .query_row(
                "SELECT COUNT(*) FROM appointments \
                 WHERE schedule_id = ?1 AND status != 'CANCELLED' \
                 AND start_datetime < ?2 AND end_datetime > ?3",
                params![appointment.schedule_id, end, start],
                |row| row.get(0),
            )
            .map_err(map_sql_error)?;
        if conflicts > 0 {
            debug!(conflicts, "slot already claimed inside the transaction");
            return Err(SalonError::SlotTaken);
        }

        let created_ts = Utc::now().timestamp();
        tx.execute(
            "INSERT INTO appointments \
             (master_id, client_id, service_id, schedule_id, start_datetime, end_datetime, \
              status, created_at, notes) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                appointment.master_id,
                appointment.client_id,
                appointment.service_id,
                appointment.schedule_id,
                start,
                end,
                AppointmentStatus::Scheduled.as_str(),
                created_ts,
                appointment.notes,
            ],
        )
        .map_err(map_sql_error)?;
        let appointment_id = tx.last_insert_rowid();
        tx.commit().map_err(map_sql_error)?;

        Ok(Appointment {
            appointment_id,
            master_id: appointment.master_id,
            client_id: appointment.client_id,
            service_id: appointment.service_id,
            schedule_id: appointment.schedule_id,
            start_datetime: appointment.start_datetime,
            end_datetime: appointment.end_datetime,
            status: AppointmentStatus::Scheduled,
            created_at: utc_from_epoch(created_ts, 8).map_err(map_sql_error)?,
            notes: appointment.notes,
        })
    }

    async fn find_appointment(&self, appointment_id: i64) -> Result<Option<Appointment>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row(
            &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE appointment_id = ?1"),
            params![appointment_id],
            map_appointment,
        )
        .optional()
        .map_err(map_sql_error)
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let conn = self.pool.get().map_err(map_pool_error)?;

        let mut sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments");
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(client_id) = filter.client_id {
            values.push(Box::new(client_id));
            clauses.push(format!("client_id = ?{}", values.len()));
        }
        if let Some(master_id) = filter.master_id {
            values.push(Box::new(master_id));
            clauses.push(format!("master_id = ?{}", values.len()));
        }
        if let Some(status) = filter.status {
            values.push(Box::new(status.as_str()));
            clauses.push(format!("status = ?{}", values.len()));
        }
        if let Some(from) = filter.from {
            values.push(Box::new(to_epoch(from)));
            clauses.push(format!("start_datetime >= ?{}", values.len()));
        }
        if let Some(to) = filter.to {
            values.push(Box::new(to_epoch(to)));
            clauses.push(format!("start_datetime < ?{}", values.len()));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY start_datetime");

        let mut stmt = conn.prepare(&sql).map_err(map_sql_error)?;
        let param_refs: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let rows = stmt
            .query_map(param_refs.as_slice(), map_appointment)
            .map_err(map_sql_error)?;
        let appointments =
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)?;
        debug!(count = appointments.len(), "listed appointments");
        Ok(appointments)
    }

    async fn list_blocking_for_schedule(&self, schedule_id: i64) -> Result<Vec<Appointment>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
                 WHERE schedule_id = ?1 AND status != 'CANCELLED' \
                 ORDER BY start_datetime"
            ))
            .map_err(map_sql_error)?;
        let rows = stmt
            .query_map(params![schedule_id], map_appointment)
            .map_err(map_sql_error)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
    }

    async fn count_blocking_for_schedule(&self, schedule_id: i64) -> Result<i64> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row(
            "SELECT COUNT(*) FROM appointments \
             WHERE schedule_id = ?1 AND status != 'CANCELLED'",
            params![schedule_id],
            |row| row.get(0),
        )
        .map_err(map_sql_error)
    }

    #[instrument(skip(self))]
    async fn transition_status(
        &self,
        appointment_id: i64,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<bool> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        let rows = conn
            .execute(
                "UPDATE appointments SET status = ?1 \
                 WHERE appointment_id = ?2 AND status = ?3",
                params![to.as_str(), appointment_id, from.as_str()],
            )
            .map_err(map_sql_error)?;
        Ok(rows > 0)
    }

    async fn set_notes(&self, appointment_id: i64, notes: Option<String>) -> Result<()> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        let rows = conn
            .execute(
                "UPDATE appointments SET notes = ?1 WHERE appointment_id = ?2",
                params![notes, appointment_id],
            )
            .map_err(map_sql_error)?;
        if rows == 0 {
            return Err(SalonError::AppointmentNotFound(appointment_id));
        }
        Ok(())
    }
}
