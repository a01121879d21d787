//! Infrastructure error handling
//!
//! Conversions from external crate errors (rusqlite, r2d2) into the
//! domain error type.

mod conversions;

pub use conversions::InfraError;
