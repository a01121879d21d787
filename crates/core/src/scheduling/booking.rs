//! Booking validator and appointment lifecycle manager

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use salonkit_domain::constants::MAX_NOTE_LENGTH;
use salonkit_domain::{
    Appointment, AppointmentFilter, AppointmentStatus, NewAppointment, Result, SalonError,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::ports::{AppointmentRepository, ScheduleRepository};
use crate::catalog::ports::{ClientStore, MasterStore, ServiceStore};

/// A proposed booking, as submitted by a client or admin workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub client_id: i64,
    pub service_id: i64,
    pub schedule_id: i64,
    pub start_datetime: NaiveDateTime,
    pub notes: Option<String>,
}

/// Booking validator and appointment lifecycle manager
///
/// `create_appointment` runs the ordered precondition checks (first failure
/// wins) and commits through the repository's atomic insert so two concurrent
/// bookings can never both claim a slot. Lifecycle transitions go through a
/// guarded compare-and-set on the stored status.
pub struct BookingService {
    clients: Arc<dyn ClientStore>,
    services: Arc<dyn ServiceStore>,
    masters: Arc<dyn MasterStore>,
    schedules: Arc<dyn ScheduleRepository>,
    appointments: Arc<dyn AppointmentRepository>,
}

impl BookingService {
    /// Create a new booking service
    pub fn new(
        clients: Arc<dyn ClientStore>,
        services: Arc<dyn ServiceStore>,
        masters: Arc<dyn MasterStore>,
        schedules: Arc<dyn ScheduleRepository>,
        appointments: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self { clients, services, masters, schedules, appointments }
    }

    /// Validate and persist a new appointment.
    ///
    /// Checks, in order: client exists, service exists, working day exists,
    /// master qualified for the service category, not a day off, inside
    /// working hours, clear of breaks, note within limits, slot free. The
    /// break and overlap re-checks and the insert run in one storage
    /// transaction.
    pub async fn create_appointment(&self, request: BookingRequest) -> Result<Appointment> {
        let client = self
            .clients
            .find_client(request.client_id)
            .await?
            .ok_or(SalonError::ClientNotFound(request.client_id))?;

        let service = self
            .services
            .find_service(request.service_id)
            .await?
            .ok_or(SalonError::ServiceNotFound(request.service_id))?;

        let day = self
            .schedules
            .find_working_day(request.schedule_id)
            .await?
            .ok_or(SalonError::ScheduleNotFound(request.schedule_id))?;

        let master = self
            .masters
            .find_master(day.master_id)
            .await?
            .ok_or(SalonError::MasterNotFound(day.master_id))?;

        let qualified = self.masters.category_ids_for(master.master_id).await?;
        if !qualified.contains(&service.category_id) {
            return Err(SalonError::MasterNotQualified {
                master_id: master.master_id,
                service_id: service.service_id,
            });
        }

        if day.is_day_off {
            return Err(SalonError::DayOff);
        }

        let start = request.start_datetime;
        let end = start + Duration::minutes(i64::from(service.duration_minutes));
        if start < day.opens_at() || end > day.closes_at() {
            return Err(SalonError::OutsideWorkingHours);
        }

        let breaks = self.schedules.list_breaks(day.schedule_id).await?;
        if breaks.iter().any(|brk| brk.overlaps(day.work_date, start, end)) {
            return Err(SalonError::OverlapsBreak);
        }

        validate_note(request.notes.as_deref())?;

        // Final break + overlap re-checks and the insert happen atomically
        // in the repository.
        let appointment = self
            .appointments
            .insert_if_slot_free(NewAppointment {
                master_id: master.master_id,
                client_id: client.client_id,
                service_id: service.service_id,
                schedule_id: day.schedule_id,
                start_datetime: start,
                end_datetime: end,
                notes: request.notes,
            })
            .await?;

        info!(
            appointment_id = appointment.appointment_id,
            client_id = client.client_id,
            master_id = master.master_id,
            start = %start,
            "appointment created"
        );
        Ok(appointment)
    }

    /// A client cancels their own appointment.
    pub async fn client_cancel_appointment(
        &self,
        appointment_id: i64,
        requesting_client_id: i64,
    ) -> Result<()> {
        let appointment = self.require_appointment(appointment_id).await?;

        if appointment.client_id != requesting_client_id {
            return Err(SalonError::Forbidden(
                "clients may only cancel their own appointments".to_string(),
            ));
        }

        self.transition(appointment, AppointmentStatus::Cancelled).await
    }

    /// An administrator cancels any appointment.
    pub async fn admin_cancel_appointment(&self, appointment_id: i64) -> Result<()> {
        let appointment = self.require_appointment(appointment_id).await?;
        self.transition(appointment, AppointmentStatus::Cancelled).await
    }

    /// Admin-only status transition out of `Scheduled`.
    ///
    /// A transition to `Completed` is the trigger point for purchase/loyalty
    /// recording, which the caller performs afterwards; it is deliberately
    /// not wired into this state machine.
    pub async fn update_appointment_status(
        &self,
        appointment_id: i64,
        new_status: AppointmentStatus,
    ) -> Result<()> {
        if new_status == AppointmentStatus::Scheduled {
            return Err(SalonError::InvalidInput(
                "appointments cannot transition back to SCHEDULED".to_string(),
            ));
        }

        let appointment = self.require_appointment(appointment_id).await?;
        self.transition(appointment, new_status).await
    }

    /// Replace the free-text note of an appointment.
    pub async fn add_note(&self, appointment_id: i64, note: Option<String>) -> Result<()> {
        validate_note(note.as_deref())?;
        self.require_appointment(appointment_id).await?;
        self.appointments.set_notes(appointment_id, note).await
    }

    /// List appointments by client, master, status and/or date range.
    pub async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        self.appointments.list_appointments(filter).await
    }

    async fn require_appointment(&self, appointment_id: i64) -> Result<Appointment> {
        self.appointments
            .find_appointment(appointment_id)
            .await?
            .ok_or(SalonError::AppointmentNotFound(appointment_id))
    }

    async fn transition(&self, appointment: Appointment, to: AppointmentStatus) -> Result<()> {
        if !appointment.status.permits(to) {
            return Err(SalonError::AlreadyTerminal(appointment.status));
        }

        let won = self
            .appointments
            .transition_status(appointment.appointment_id, appointment.status, to)
            .await?;

        if won {
            info!(
                appointment_id = appointment.appointment_id,
                from = %appointment.status,
                to = %to,
                "appointment status changed"
            );
            return Ok(());
        }

        // A concurrent transition got there first; report the fresh status.
        warn!(appointment_id = appointment.appointment_id, "lost status transition race");
        let current = self.require_appointment(appointment.appointment_id).await?;
        Err(SalonError::AlreadyTerminal(current.status))
    }
}

fn validate_note(note: Option<&str>) -> Result<()> {
    if let Some(text) = note {
        if text.len() > MAX_NOTE_LENGTH {
            return Err(SalonError::InvalidInput(format!(
                "note exceeds {MAX_NOTE_LENGTH} characters"
            )));
        }
    }
    Ok(())
}
