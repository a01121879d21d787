//! # Salonkit Domain
//!
//! Business domain types and models for the salon booking backend.
//!
//! This crate contains:
//! - Schedule and catalog data types (WorkingDay, Appointment, Master, ...)
//! - Domain error types and Result definitions
//! - Domain constants (scheduling granularity, loyalty thresholds)
//!
//! ## Architecture
//! - No dependencies on other salonkit crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
// Re-export phone helpers used by callers rendering contact data
pub use utils::phone::{format_phone, normalize_phone};
