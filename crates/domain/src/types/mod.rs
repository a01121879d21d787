//! Domain data types
//!
//! Split by aggregate: `schedule` holds the calendar entities the booking
//! engine reasons about, `catalog` holds masters, clients and services.

pub mod catalog;
pub mod schedule;

pub use catalog::*;
pub use schedule::*;
