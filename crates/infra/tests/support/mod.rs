//! Shared wiring for infrastructure integration tests: a real SQLite
//! database in a temp directory with all services attached.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use salonkit_core::{BookingService, CatalogService, SchedulingService};
use salonkit_domain::{NewClient, NewMaster, NewService};
use salonkit_infra::{
    DbManager, SqliteAppointmentRepository, SqliteCatalogRepository, SqliteScheduleRepository,
};
use tempfile::TempDir;

pub struct TestWorld {
    // Held so the database file outlives the test
    _temp_dir: TempDir,
    pub catalog: Arc<CatalogService>,
    pub scheduling: Arc<SchedulingService>,
    pub booking: Arc<BookingService>,
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager =
            DbManager::new(temp_dir.path().join("salon.db"), 4).expect("manager created");
        manager.run_migrations().expect("migrations run");

        let catalog_repo = Arc::new(SqliteCatalogRepository::new(&manager));
        let schedules = Arc::new(SqliteScheduleRepository::new(&manager));
        let appointments = Arc::new(SqliteAppointmentRepository::new(&manager));

        let catalog = Arc::new(CatalogService::new(
            catalog_repo.clone(),
            catalog_repo.clone(),
            catalog_repo.clone(),
        ));
        let scheduling = Arc::new(SchedulingService::new(
            schedules.clone(),
            appointments.clone(),
            catalog_repo.clone(),
            catalog_repo.clone(),
        ));
        let booking = Arc::new(BookingService::new(
            catalog_repo.clone(),
            catalog_repo.clone(),
            catalog_repo,
            schedules,
            appointments,
        ));

        Self { _temp_dir: temp_dir, catalog, scheduling, booking }
    }

    pub async fn seed_category(&self, name: &str) -> i64 {
        self.catalog.create_category(name).await.expect("category created").category_id
    }

    pub async fn seed_master(&self, phone: &str, category_ids: &[i64]) -> i64 {
        self.catalog
            .create_master(NewMaster {
                first_name: "Anna".to_string(),
                last_name: "Petrova".to_string(),
                phone: phone.to_string(),
                email: None,
                specialty: "stylist".to_string(),
                category_ids: category_ids.to_vec(),
            })
            .await
            .expect("master created")
            .master_id
    }

    pub async fn seed_service(&self, category_id: i64, duration_minutes: u32) -> i64 {
        self.catalog
            .create_service(NewService {
                service_name: "Haircut".to_string(),
                duration_minutes,
                price: 1500,
                category_id,
            })
            .await
            .expect("service created")
            .service_id
    }

    pub async fn seed_client(&self, phone: &str) -> i64 {
        self.catalog
            .create_client(NewClient {
                first_name: "Ivan".to_string(),
                last_name: "Ivanov".to_string(),
                phone: phone.to_string(),
                email: None,
                password_hash: "$argon2$test".to_string(),
            })
            .await
            .expect("client created")
            .client_id
    }

    pub async fn seed_working_day(&self, master_id: i64, date: NaiveDate) -> i64 {
        self.scheduling
            .add_working_day(
                master_id,
                date,
                NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
                NaiveTime::from_hms_opt(18, 0, 0).expect("valid time"),
            )
            .await
            .expect("working day created")
            .schedule_id
    }
}

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
}

pub fn at(h: u32, m: u32) -> NaiveDateTime {
    test_date().and_hms_opt(h, m, 0).expect("valid time")
}
