//! Shared test fixtures for core integration tests

pub mod repositories;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use salonkit_core::{BookingService, CatalogService, ScheduleRepository, SchedulingService};
use salonkit_domain::{NewClient, NewMaster, NewService, NewWorkingDay};

use repositories::{
    MockAppointmentRepository, MockClientStore, MockMasterStore, MockScheduleRepository,
    MockServiceStore,
};

/// Fully wired in-memory stack for exercising the core services.
pub struct TestWorld {
    pub schedules: Arc<MockScheduleRepository>,
    pub appointments: Arc<MockAppointmentRepository>,
    pub masters: Arc<MockMasterStore>,
    pub clients: Arc<MockClientStore>,
    pub services: Arc<MockServiceStore>,
    pub scheduling: SchedulingService,
    pub booking: BookingService,
    pub catalog: CatalogService,
}

impl TestWorld {
    pub fn new() -> Self {
        let schedules = Arc::new(MockScheduleRepository::default());
        let appointments = Arc::new(MockAppointmentRepository::default());
        let masters = Arc::new(MockMasterStore::default());
        let clients = Arc::new(MockClientStore::default());
        let services = Arc::new(MockServiceStore::default());

        let scheduling = SchedulingService::new(
            schedules.clone(),
            appointments.clone(),
            masters.clone(),
            services.clone(),
        );
        let booking = BookingService::new(
            clients.clone(),
            services.clone(),
            masters.clone(),
            schedules.clone(),
            appointments.clone(),
        );
        let catalog =
            CatalogService::new(masters.clone(), clients.clone(), services.clone());

        Self { schedules, appointments, masters, clients, services, scheduling, booking, catalog }
    }

    /// Seed a master qualified for the given categories.
    pub async fn seed_master(&self, phone: &str, category_ids: &[i64]) -> i64 {
        let master = self
            .catalog
            .create_master(NewMaster {
                first_name: "Anna".to_string(),
                last_name: "Petrova".to_string(),
                phone: phone.to_string(),
                email: None,
                specialty: "Stylist".to_string(),
                category_ids: category_ids.to_vec(),
            })
            .await
            .unwrap();
        master.master_id
    }

    /// Seed a category and return its id.
    pub async fn seed_category(&self, name: &str) -> i64 {
        self.catalog.create_category(name).await.unwrap().category_id
    }

    /// Seed a service in a category.
    pub async fn seed_service(&self, category_id: i64, duration_minutes: u32) -> i64 {
        let service = self
            .catalog
            .create_service(NewService {
                service_name: "Haircut".to_string(),
                duration_minutes,
                price: 1500,
                category_id,
            })
            .await
            .unwrap();
        service.service_id
    }

    /// Seed a client and return their id.
    pub async fn seed_client(&self, phone: &str) -> i64 {
        let client = self
            .catalog
            .create_client(NewClient {
                first_name: "Ivan".to_string(),
                last_name: "Orlov".to_string(),
                phone: phone.to_string(),
                email: None,
                password_hash: "$argon2$test".to_string(),
            })
            .await
            .unwrap();
        client.client_id
    }

    /// Seed a 09:00-18:00 working day and return its schedule id.
    pub async fn seed_working_day(&self, master_id: i64, date: NaiveDate) -> i64 {
        let day = self
            .schedules
            .insert_working_day(NewWorkingDay {
                master_id,
                work_date: date,
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                is_day_off: false,
            })
            .await
            .unwrap();
        day.schedule_id
    }
}

/// 2025-01-15, a plain Wednesday used across the tests.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

pub fn at(h: u32, m: u32) -> chrono::NaiveDateTime {
    test_date().and_hms_opt(h, m, 0).unwrap()
}
