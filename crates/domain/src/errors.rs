//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::schedule::AppointmentStatus;

/// Main error type for salonkit
///
/// Every failure a caller can act on is a dedicated variant; workflows decide
/// the user-facing messaging. `SlotTaken` is deliberately never retried
/// internally so the caller can offer another slot.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum SalonError {
    #[error("client not found: {0}")]
    ClientNotFound(i64),

    #[error("service not found: {0}")]
    ServiceNotFound(i64),

    #[error("master not found: {0}")]
    MasterNotFound(i64),

    #[error("service category not found: {0}")]
    CategoryNotFound(i64),

    #[error("working day not found: {0}")]
    ScheduleNotFound(i64),

    #[error("appointment not found: {0}")]
    AppointmentNotFound(i64),

    #[error("master {master_id} is not qualified for service {service_id}")]
    MasterNotQualified { master_id: i64, service_id: i64 },

    #[error("the selected date is a day off")]
    DayOff,

    #[error("appointment must fit inside the working hours")]
    OutsideWorkingHours,

    #[error("appointment overlaps a break")]
    OverlapsBreak,

    #[error("the slot is already taken by another appointment")]
    SlotTaken,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("appointment already in terminal status {0}")]
    AlreadyTerminal(AppointmentStatus),

    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("working day still has active appointments: {0}")]
    WorkingDayInUse(i64),

    #[error("database error: {0}")]
    Database(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for salonkit operations
pub type Result<T> = std::result::Result<T, SalonError>;
