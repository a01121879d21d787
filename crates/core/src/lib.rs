//! # Salonkit Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The slot-availability engine and booking validator
//! - The appointment lifecycle state machine
//! - Port/adapter interfaces (traits) for storage
//!
//! ## Architecture Principles
//! - Only depends on `salonkit-domain`
//! - No database or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod catalog;
pub mod scheduling;

// Re-export specific items to avoid ambiguity
pub use catalog::ports::{ClientStore, MasterStore, PurchaseRecorder, ServiceStore};
pub use catalog::CatalogService;
pub use scheduling::ports::{AppointmentRepository, ScheduleRepository};
pub use scheduling::slots::available_slots;
pub use scheduling::{BookingRequest, BookingService, SchedulingService};
