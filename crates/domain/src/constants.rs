//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! booking backend.

// Scheduling
pub const SLOT_STEP_MINUTES: i64 = 30;
pub const MAX_NOTE_LENGTH: usize = 500;

// Loyalty card upgrade thresholds (total spent, in the salon currency)
pub const SILVER_THRESHOLD: f64 = 5_000.0;
pub const GOLD_THRESHOLD: f64 = 15_000.0;
pub const PLATINUM_THRESHOLD: f64 = 30_000.0;

// Loyalty card discount rates
pub const SILVER_DISCOUNT: f64 = 0.03;
pub const GOLD_DISCOUNT: f64 = 0.07;
pub const PLATINUM_DISCOUNT: f64 = 0.10;

// Storage defaults
pub const DEFAULT_POOL_SIZE: u32 = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
