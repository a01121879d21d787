//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for all core ports, enabling deterministic unit
//! tests without database dependencies. The appointment mock performs its
//! overlap check and insert under a single lock, mirroring the transactional
//! guarantee of the real repository.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use salonkit_core::{
    AppointmentRepository, ClientStore, MasterStore, ScheduleRepository, ServiceStore,
};
use salonkit_domain::{
    ranges_overlap, Appointment, AppointmentFilter, AppointmentStatus, BreakInterval, Client,
    Master, NewAppointment, NewBreak, NewClient, NewMaster, NewService, NewWorkingDay,
    Result as DomainResult, SalonCard, SalonError, Service, ServiceCategory, UpdateClientField,
    UpdateMasterField, UpdateServiceField, WorkingDay,
};

fn next_id(counter: &AtomicI64) -> i64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

/// In-memory mock for `ScheduleRepository`.
#[derive(Default)]
pub struct MockScheduleRepository {
    days: Mutex<Vec<WorkingDay>>,
    breaks: Mutex<Vec<BreakInterval>>,
    next_schedule_id: AtomicI64,
    next_break_id: AtomicI64,
}

#[async_trait]
impl ScheduleRepository for MockScheduleRepository {
    async fn insert_working_day(&self, day: NewWorkingDay) -> DomainResult<WorkingDay> {
        let mut days = self.days.lock().unwrap();
        if days.iter().any(|d| d.master_id == day.master_id && d.work_date == day.work_date) {
            return Err(SalonError::DuplicateEntry("schedule date".to_string()));
        }
        let created = WorkingDay {
            schedule_id: next_id(&self.next_schedule_id),
            master_id: day.master_id,
            work_date: day.work_date,
            start_time: day.start_time,
            end_time: day.end_time,
            is_day_off: day.is_day_off,
        };
        days.push(created.clone());
        Ok(created)
    }

    async fn find_working_day(&self, schedule_id: i64) -> DomainResult<Option<WorkingDay>> {
        Ok(self.days.lock().unwrap().iter().find(|d| d.schedule_id == schedule_id).cloned())
    }

    async fn find_working_day_by_date(
        &self,
        master_id: i64,
        date: NaiveDate,
    ) -> DomainResult<Option<WorkingDay>> {
        Ok(self
            .days
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.master_id == master_id && d.work_date == date)
            .cloned())
    }

    async fn list_working_days(
        &self,
        master_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<WorkingDay>> {
        let mut days: Vec<WorkingDay> = self
            .days
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.master_id == master_id && d.work_date >= from && d.work_date <= to)
            .cloned()
            .collect();
        days.sort_by_key(|d| d.work_date);
        Ok(days)
    }

    async fn delete_working_day(&self, schedule_id: i64) -> DomainResult<()> {
        self.days.lock().unwrap().retain(|d| d.schedule_id != schedule_id);
        self.breaks.lock().unwrap().retain(|b| b.schedule_id != schedule_id);
        Ok(())
    }

    async fn insert_break(&self, brk: NewBreak) -> DomainResult<BreakInterval> {
        let created = BreakInterval {
            break_id: next_id(&self.next_break_id),
            schedule_id: brk.schedule_id,
            break_start: brk.break_start,
            break_end: brk.break_end,
            reason: brk.reason,
        };
        self.breaks.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list_breaks(&self, schedule_id: i64) -> DomainResult<Vec<BreakInterval>> {
        let mut breaks: Vec<BreakInterval> = self
            .breaks
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.schedule_id == schedule_id)
            .cloned()
            .collect();
        breaks.sort_by_key(|b| b.break_start);
        Ok(breaks)
    }
}

/// In-memory mock for `AppointmentRepository`.
#[derive(Default)]
pub struct MockAppointmentRepository {
    appointments: Mutex<Vec<Appointment>>,
    next_id: AtomicI64,
}

#[async_trait]
impl AppointmentRepository for MockAppointmentRepository {
    async fn insert_if_slot_free(&self, appointment: NewAppointment) -> DomainResult<Appointment> {
        // Check and insert under one lock, like the real transaction.
        let mut appointments = self.appointments.lock().unwrap();
        let conflict = appointments.iter().any(|a| {
            a.schedule_id == appointment.schedule_id
                && a.status.blocks_slot()
                && ranges_overlap(
                    a.start_datetime,
                    a.end_datetime,
                    appointment.start_datetime,
                    appointment.end_datetime,
                )
        });
        if conflict {
            return Err(SalonError::SlotTaken);
        }

        let created = Appointment {
            appointment_id: next_id(&self.next_id),
            master_id: appointment.master_id,
            client_id: appointment.client_id,
            service_id: appointment.service_id,
            schedule_id: appointment.schedule_id,
            start_datetime: appointment.start_datetime,
            end_datetime: appointment.end_datetime,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
            notes: appointment.notes,
        };
        appointments.push(created.clone());
        Ok(created)
    }

    async fn find_appointment(&self, appointment_id: i64) -> DomainResult<Option<Appointment>> {
        Ok(self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.appointment_id == appointment_id)
            .cloned())
    }

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> DomainResult<Vec<Appointment>> {
        let mut matches: Vec<Appointment> = self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| {
                filter.client_id.map_or(true, |id| a.client_id == id)
                    && filter.master_id.map_or(true, |id| a.master_id == id)
                    && filter.status.map_or(true, |s| a.status == s)
                    && filter.from.map_or(true, |from| a.start_datetime >= from)
                    && filter.to.map_or(true, |to| a.start_datetime < to)
            })
            .cloned()
            .collect();
        matches.sort_by_key(|a| a.start_datetime);
        Ok(matches)
    }

    async fn list_blocking_for_schedule(&self, schedule_id: i64) -> DomainResult<Vec<Appointment>> {
        let mut matches: Vec<Appointment> = self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.schedule_id == schedule_id && a.status.blocks_slot())
            .cloned()
            .collect();
        matches.sort_by_key(|a| a.start_datetime);
        Ok(matches)
    }

    async fn count_blocking_for_schedule(&self, schedule_id: i64) -> DomainResult<i64> {
        Ok(self.list_blocking_for_schedule(schedule_id).await?.len() as i64)
    }

    async fn transition_status(
        &self,
        appointment_id: i64,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> DomainResult<bool> {
        let mut appointments = self.appointments.lock().unwrap();
        match appointments
            .iter_mut()
            .find(|a| a.appointment_id == appointment_id && a.status == from)
        {
            Some(appointment) => {
                appointment.status = to;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_notes(&self, appointment_id: i64, notes: Option<String>) -> DomainResult<()> {
        let mut appointments = self.appointments.lock().unwrap();
        if let Some(appointment) =
            appointments.iter_mut().find(|a| a.appointment_id == appointment_id)
        {
            appointment.notes = notes;
        }
        Ok(())
    }
}

/// In-memory mock for `MasterStore`.
#[derive(Default)]
pub struct MockMasterStore {
    masters: Mutex<Vec<Master>>,
    assignments: Mutex<Vec<(i64, i64)>>,
    next_id: AtomicI64,
}

#[async_trait]
impl MasterStore for MockMasterStore {
    async fn insert_master(&self, master: NewMaster) -> DomainResult<Master> {
        let created = Master {
            master_id: next_id(&self.next_id),
            first_name: master.first_name,
            last_name: master.last_name,
            phone: master.phone,
            email: master.email,
            specialty: master.specialty,
        };
        self.masters.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_master(&self, master_id: i64) -> DomainResult<Option<Master>> {
        Ok(self.masters.lock().unwrap().iter().find(|m| m.master_id == master_id).cloned())
    }

    async fn find_master_by_phone(&self, phone: &str) -> DomainResult<Option<Master>> {
        Ok(self.masters.lock().unwrap().iter().find(|m| m.phone == phone).cloned())
    }

    async fn update_master(&self, master_id: i64, update: UpdateMasterField) -> DomainResult<()> {
        let mut masters = self.masters.lock().unwrap();
        if let Some(master) = masters.iter_mut().find(|m| m.master_id == master_id) {
            match update {
                UpdateMasterField::FirstName(v) => master.first_name = v,
                UpdateMasterField::LastName(v) => master.last_name = v,
                UpdateMasterField::Phone(v) => master.phone = v,
                UpdateMasterField::Email(v) => master.email = v,
                UpdateMasterField::Specialty(v) => master.specialty = v,
            }
        }
        Ok(())
    }

    async fn assign_categories(&self, master_id: i64, category_ids: &[i64]) -> DomainResult<()> {
        let mut assignments = self.assignments.lock().unwrap();
        for category_id in category_ids {
            if !assignments.contains(&(master_id, *category_id)) {
                assignments.push((master_id, *category_id));
            }
        }
        Ok(())
    }

    async fn category_ids_for(&self, master_id: i64) -> DomainResult<Vec<i64>> {
        Ok(self
            .assignments
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| *m == master_id)
            .map(|(_, c)| *c)
            .collect())
    }

    async fn list_masters_in_category(&self, category_id: i64) -> DomainResult<Vec<Master>> {
        let assigned: Vec<i64> = self
            .assignments
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, c)| *c == category_id)
            .map(|(m, _)| *m)
            .collect();
        Ok(self
            .masters
            .lock()
            .unwrap()
            .iter()
            .filter(|m| assigned.contains(&m.master_id))
            .cloned()
            .collect())
    }
}

/// In-memory mock for `ClientStore`.
#[derive(Default)]
pub struct MockClientStore {
    clients: Mutex<Vec<Client>>,
    cards: Mutex<Vec<SalonCard>>,
    next_id: AtomicI64,
}

#[async_trait]
impl ClientStore for MockClientStore {
    async fn insert_client(&self, client: NewClient) -> DomainResult<Client> {
        let created = Client {
            client_id: next_id(&self.next_id),
            first_name: client.first_name,
            last_name: client.last_name,
            phone: client.phone,
            email: client.email,
            password_hash: client.password_hash,
        };
        self.clients.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_client(&self, client_id: i64) -> DomainResult<Option<Client>> {
        Ok(self.clients.lock().unwrap().iter().find(|c| c.client_id == client_id).cloned())
    }

    async fn find_client_by_phone(&self, phone: &str) -> DomainResult<Option<Client>> {
        Ok(self.clients.lock().unwrap().iter().find(|c| c.phone == phone).cloned())
    }

    async fn update_client(&self, client_id: i64, update: UpdateClientField) -> DomainResult<()> {
        let mut clients = self.clients.lock().unwrap();
        if let Some(client) = clients.iter_mut().find(|c| c.client_id == client_id) {
            match update {
                UpdateClientField::FirstName(v) => client.first_name = v,
                UpdateClientField::LastName(v) => client.last_name = v,
                UpdateClientField::Phone(v) => client.phone = v,
                UpdateClientField::Email(v) => client.email = v,
            }
        }
        Ok(())
    }

    async fn find_card(&self, client_id: i64) -> DomainResult<Option<SalonCard>> {
        Ok(self.cards.lock().unwrap().iter().find(|c| c.client_id == client_id).cloned())
    }

    async fn save_card(&self, card: &SalonCard) -> DomainResult<()> {
        let mut cards = self.cards.lock().unwrap();
        if let Some(existing) = cards.iter_mut().find(|c| c.client_id == card.client_id) {
            *existing = card.clone();
        } else {
            cards.push(card.clone());
        }
        Ok(())
    }
}

/// In-memory mock for `ServiceStore`.
#[derive(Default)]
pub struct MockServiceStore {
    categories: Mutex<Vec<ServiceCategory>>,
    services: Mutex<Vec<Service>>,
    next_category_id: AtomicI64,
    next_service_id: AtomicI64,
}

#[async_trait]
impl ServiceStore for MockServiceStore {
    async fn insert_category(&self, category_name: &str) -> DomainResult<ServiceCategory> {
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.category_name == category_name) {
            return Err(SalonError::DuplicateEntry(category_name.to_string()));
        }
        let created = ServiceCategory {
            category_id: next_id(&self.next_category_id),
            category_name: category_name.to_string(),
        };
        categories.push(created.clone());
        Ok(created)
    }

    async fn find_category(&self, category_id: i64) -> DomainResult<Option<ServiceCategory>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.category_id == category_id)
            .cloned())
    }

    async fn insert_service(&self, service: NewService) -> DomainResult<Service> {
        let created = Service {
            service_id: next_id(&self.next_service_id),
            service_name: service.service_name,
            duration_minutes: service.duration_minutes,
            price: service.price,
            category_id: service.category_id,
        };
        self.services.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_service(&self, service_id: i64) -> DomainResult<Option<Service>> {
        Ok(self.services.lock().unwrap().iter().find(|s| s.service_id == service_id).cloned())
    }

    async fn list_services(&self) -> DomainResult<Vec<Service>> {
        let mut services = self.services.lock().unwrap().clone();
        services.sort_by(|a, b| a.service_name.cmp(&b.service_name));
        Ok(services)
    }

    async fn update_service(&self, service_id: i64, update: UpdateServiceField) -> DomainResult<()> {
        let mut services = self.services.lock().unwrap();
        if let Some(service) = services.iter_mut().find(|s| s.service_id == service_id) {
            match update {
                UpdateServiceField::ServiceName(v) => service.service_name = v,
                UpdateServiceField::DurationMinutes(v) => service.duration_minutes = v,
                UpdateServiceField::Price(v) => service.price = v,
            }
        }
        Ok(())
    }
}
