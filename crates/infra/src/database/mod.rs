//! SQLite persistence layer
//!
//! Repository implementations of the core storage ports, plus the pooled
//! connection manager and schema migrations.

mod appointment_repository;
mod catalog_repository;
mod manager;
mod schedule_repository;

use salonkit_domain::SalonError;

pub use appointment_repository::SqliteAppointmentRepository;
pub use catalog_repository::SqliteCatalogRepository;
pub use manager::DbManager;
pub use schedule_repository::SqliteScheduleRepository;

use crate::errors::InfraError;

pub(crate) fn map_sql_error(err: rusqlite::Error) -> SalonError {
    SalonError::from(InfraError::from(err))
}

pub(crate) fn map_pool_error(err: r2d2::Error) -> SalonError {
    SalonError::from(InfraError::from(err))
}
