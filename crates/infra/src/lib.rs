//! # Salonkit Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repository implementations (rusqlite behind an r2d2 pool)
//! - Schema migrations and the database manager
//! - Configuration loading
//! - Conversions from infrastructure errors into domain errors
//!
//! ## Architecture
//! - Implements traits defined in `salonkit-core`
//! - Depends on `salonkit-domain` and `salonkit-core`
//! - Contains all "impure" code (I/O)

pub mod config;
pub mod database;
pub mod errors;

// Re-export commonly used items
pub use config::{load as load_config, AppConfig};
pub use database::{
    DbManager, SqliteAppointmentRepository, SqliteCatalogRepository, SqliteScheduleRepository,
};
pub use errors::InfraError;
