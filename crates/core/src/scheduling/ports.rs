//! Port interfaces for schedule and appointment storage
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::NaiveDate;
use salonkit_domain::{
    Appointment, AppointmentFilter, AppointmentStatus, BreakInterval, NewAppointment, NewBreak,
    NewWorkingDay, Result, WorkingDay,
};

/// Trait for persisting working days and breaks
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Insert a working day. Fails with `DuplicateEntry` when the master
    /// already has a schedule on that date.
    async fn insert_working_day(&self, day: NewWorkingDay) -> Result<WorkingDay>;

    /// Look up a working day by id.
    async fn find_working_day(&self, schedule_id: i64) -> Result<Option<WorkingDay>>;

    /// Look up a master's working day on a specific date.
    async fn find_working_day_by_date(
        &self,
        master_id: i64,
        date: NaiveDate,
    ) -> Result<Option<WorkingDay>>;

    /// List a master's working days in `[from, to]`, ordered by date.
    async fn list_working_days(
        &self,
        master_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkingDay>>;

    /// Delete a working day, cascading to its breaks and appointments.
    async fn delete_working_day(&self, schedule_id: i64) -> Result<()>;

    /// Insert a break on a working day.
    async fn insert_break(&self, brk: NewBreak) -> Result<BreakInterval>;

    /// List the breaks of a working day, ordered by start time.
    async fn list_breaks(&self, schedule_id: i64) -> Result<Vec<BreakInterval>>;
}

/// Trait for persisting appointments
///
/// `insert_if_slot_free` is the single atomic commit point of the booking
/// flow: the break and overlap re-checks and the insert must run in one
/// storage transaction so a concurrent booking or break cannot slip in
/// between the validator's reads and the commit.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Atomically verify that `[start, end)` is still free on the working day
    /// (against the day's breaks and every non-cancelled appointment) and
    /// insert the appointment with status `Scheduled`. Fails with
    /// `OverlapsBreak` or `SlotTaken` on conflict.
    async fn insert_if_slot_free(&self, appointment: NewAppointment) -> Result<Appointment>;

    /// Look up an appointment by id.
    async fn find_appointment(&self, appointment_id: i64) -> Result<Option<Appointment>>;

    /// List appointments matching the filter, ordered by start time.
    async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>>;

    /// Non-cancelled appointments on a working day, ordered by start time.
    async fn list_blocking_for_schedule(&self, schedule_id: i64) -> Result<Vec<Appointment>>;

    /// Number of non-cancelled appointments on a working day.
    async fn count_blocking_for_schedule(&self, schedule_id: i64) -> Result<i64>;

    /// Guarded status change: succeeds (returns `true`) only when the stored
    /// status still equals `from`. A `false` result means a concurrent
    /// transition won.
    async fn transition_status(
        &self,
        appointment_id: i64,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<bool>;

    /// Replace the free-text note of an appointment.
    async fn set_notes(&self, appointment_id: i64, notes: Option<String>) -> Result<()>;
}
