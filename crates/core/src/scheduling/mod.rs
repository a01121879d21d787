//! Scheduling: slot availability, booking validation, appointment lifecycle

pub mod booking;
pub mod ports;
pub mod service;
pub mod slots;

pub use booking::{BookingRequest, BookingService};
pub use service::SchedulingService;
