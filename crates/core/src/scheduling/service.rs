//! Schedule management service - working days, breaks and slot queries

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use salonkit_domain::{
    Master, NewBreak, NewWorkingDay, Result, SalonError, WorkingDay,
};
use tracing::{debug, info};

use super::ports::{AppointmentRepository, ScheduleRepository};
use super::slots;
use crate::catalog::ports::{MasterStore, ServiceStore};

/// Schedule management service
///
/// Admin-facing operations on working days and breaks, plus the
/// slot-availability queries client workflows compose their booking UI from.
pub struct SchedulingService {
    schedules: Arc<dyn ScheduleRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    masters: Arc<dyn MasterStore>,
    services: Arc<dyn ServiceStore>,
}

impl SchedulingService {
    /// Create a new scheduling service
    pub fn new(
        schedules: Arc<dyn ScheduleRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        masters: Arc<dyn MasterStore>,
        services: Arc<dyn ServiceStore>,
    ) -> Self {
        Self { schedules, appointments, masters, services }
    }

    /// Declare a working day for a master.
    ///
    /// Fails with `MasterNotFound`, `InvalidInterval` when `start >= end`, or
    /// `DuplicateEntry` when the date already has a schedule.
    pub async fn add_working_day(
        &self,
        master_id: i64,
        work_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<WorkingDay> {
        self.require_master(master_id).await?;

        if start_time >= end_time {
            return Err(SalonError::InvalidInterval(format!(
                "working day must start before it ends ({start_time} >= {end_time})"
            )));
        }

        self.ensure_no_schedule_on(master_id, work_date).await?;

        let day = self
            .schedules
            .insert_working_day(NewWorkingDay {
                master_id,
                work_date,
                start_time,
                end_time,
                is_day_off: false,
            })
            .await?;

        info!(master_id, %work_date, schedule_id = day.schedule_id, "working day added");
        Ok(day)
    }

    /// Declare a day off for a master. Day-off records keep the date unique
    /// and make the day unbookable.
    pub async fn add_day_off(&self, master_id: i64, work_date: NaiveDate) -> Result<WorkingDay> {
        self.require_master(master_id).await?;
        self.ensure_no_schedule_on(master_id, work_date).await?;

        let midnight = NaiveTime::MIN;
        let day = self
            .schedules
            .insert_working_day(NewWorkingDay {
                master_id,
                work_date,
                start_time: midnight,
                end_time: midnight,
                is_day_off: true,
            })
            .await?;

        info!(master_id, %work_date, "day off added");
        Ok(day)
    }

    /// Add a break to a working day.
    ///
    /// The break must lie inside the working hours and must not overlap any
    /// existing break of that day.
    pub async fn add_break(
        &self,
        schedule_id: i64,
        break_start: NaiveTime,
        break_end: NaiveTime,
        reason: Option<String>,
    ) -> Result<salonkit_domain::BreakInterval> {
        let day = self.require_working_day(schedule_id).await?;

        if day.is_day_off {
            return Err(SalonError::DayOff);
        }
        if break_start >= break_end {
            return Err(SalonError::InvalidInterval(format!(
                "break must start before it ends ({break_start} >= {break_end})"
            )));
        }
        if break_start < day.start_time || break_end > day.end_time {
            return Err(SalonError::InvalidInterval(
                "break must be within working hours".to_string(),
            ));
        }

        // Overlapping breaks on one day are rejected outright; two breaks
        // may touch (half-open intervals).
        let existing = self.schedules.list_breaks(schedule_id).await?;
        if existing.iter().any(|b| break_start < b.break_end && break_end > b.break_start) {
            return Err(SalonError::InvalidInterval(
                "break overlaps an existing break".to_string(),
            ));
        }

        let brk = self
            .schedules
            .insert_break(NewBreak { schedule_id, break_start, break_end, reason })
            .await?;

        debug!(schedule_id, break_id = brk.break_id, "break added");
        Ok(brk)
    }

    /// Delete a working day together with its breaks and appointments.
    ///
    /// While non-cancelled appointments reference the day the deletion is
    /// blocked with `WorkingDayInUse`; passing `force = true` is the explicit
    /// confirmation that cascade-deletes them.
    pub async fn remove_working_day(&self, schedule_id: i64, force: bool) -> Result<()> {
        self.require_working_day(schedule_id).await?;

        let blocking = self.appointments.count_blocking_for_schedule(schedule_id).await?;
        if blocking > 0 && !force {
            return Err(SalonError::WorkingDayInUse(schedule_id));
        }

        self.schedules.delete_working_day(schedule_id).await?;
        info!(schedule_id, cascaded_appointments = blocking, "working day removed");
        Ok(())
    }

    /// A master's working days over a date range, ordered by date.
    pub async fn get_master_schedule(
        &self,
        master_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkingDay>> {
        self.require_master(master_id).await?;
        self.schedules.list_working_days(master_id, from, to).await
    }

    /// Candidate start times on a working day for a given service duration.
    ///
    /// Day-off schedules yield an empty list; a dangling id fails with
    /// `ScheduleNotFound`.
    pub async fn available_slots(
        &self,
        schedule_id: i64,
        service_duration_minutes: u32,
    ) -> Result<Vec<NaiveDateTime>> {
        if service_duration_minutes == 0 {
            return Err(SalonError::InvalidInterval(
                "service duration must be positive".to_string(),
            ));
        }

        let day = self.require_working_day(schedule_id).await?;
        if day.is_day_off {
            return Ok(Vec::new());
        }

        let breaks = self.schedules.list_breaks(schedule_id).await?;
        let appointments = self.appointments.list_blocking_for_schedule(schedule_id).await?;

        let slots = slots::available_slots(&day, &breaks, &appointments, service_duration_minutes);
        debug!(schedule_id, count = slots.len(), "computed available slots");
        Ok(slots)
    }

    /// Candidate start times for a master, date and service, the composition
    /// client workflows build their booking UI from. A date without a working
    /// day yields an empty list.
    pub async fn get_available_slots(
        &self,
        master_id: i64,
        date: NaiveDate,
        service_id: i64,
    ) -> Result<Vec<NaiveDateTime>> {
        let service = self
            .services
            .find_service(service_id)
            .await?
            .ok_or(SalonError::ServiceNotFound(service_id))?;

        match self.schedules.find_working_day_by_date(master_id, date).await? {
            Some(day) if !day.is_day_off => {
                self.available_slots(day.schedule_id, service.duration_minutes).await
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Masters qualified for the service with at least one free slot on the
    /// given date.
    pub async fn find_available_masters(
        &self,
        service_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Master>> {
        let service = self
            .services
            .find_service(service_id)
            .await?
            .ok_or(SalonError::ServiceNotFound(service_id))?;

        let candidates = self.masters.list_masters_in_category(service.category_id).await?;

        let mut available = Vec::new();
        for master in candidates {
            let Some(day) =
                self.schedules.find_working_day_by_date(master.master_id, date).await?
            else {
                continue;
            };
            if day.is_day_off {
                continue;
            }
            let slots = self.available_slots(day.schedule_id, service.duration_minutes).await?;
            if !slots.is_empty() {
                available.push(master);
            }
        }
        Ok(available)
    }

    async fn require_master(&self, master_id: i64) -> Result<Master> {
        self.masters
            .find_master(master_id)
            .await?
            .ok_or(SalonError::MasterNotFound(master_id))
    }

    async fn require_working_day(&self, schedule_id: i64) -> Result<WorkingDay> {
        self.schedules
            .find_working_day(schedule_id)
            .await?
            .ok_or(SalonError::ScheduleNotFound(schedule_id))
    }

    async fn ensure_no_schedule_on(&self, master_id: i64, work_date: NaiveDate) -> Result<()> {
        if self.schedules.find_working_day_by_date(master_id, work_date).await?.is_some() {
            return Err(SalonError::DuplicateEntry(format!(
                "master {master_id} already has a schedule on {work_date}"
            )));
        }
        Ok(())
    }
}
