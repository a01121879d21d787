//! Catalog entities: masters, clients, services and loyalty cards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    GOLD_DISCOUNT, GOLD_THRESHOLD, PLATINUM_DISCOUNT, PLATINUM_THRESHOLD, SILVER_DISCOUNT,
    SILVER_THRESHOLD,
};

/// A salon master (stylist, barber, ...)
///
/// The set of service categories a master is assigned to drives the
/// qualification check at booking time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Master {
    pub master_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub specialty: String,
}

impl Master {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for creating a master.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMaster {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub specialty: String,
    pub category_ids: Vec<i64>,
}

/// A grouping of services a master can be qualified for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCategory {
    pub category_id: i64,
    pub category_name: String,
}

/// A bookable service with a fixed duration and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: i64,
    pub service_name: String,
    pub duration_minutes: u32,
    pub price: i64,
    pub category_id: i64,
}

impl Service {
    /// Duration formatted as hours and minutes, e.g. `1 h 30 min`.
    #[must_use]
    pub fn human_duration(&self) -> String {
        let hours = self.duration_minutes / 60;
        let minutes = self.duration_minutes % 60;
        if hours > 0 {
            format!("{hours} h {minutes} min")
        } else {
            format!("{minutes} min")
        }
    }
}

/// Payload for creating a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewService {
    pub service_name: String,
    pub duration_minutes: u32,
    pub price: i64,
    pub category_id: i64,
}

/// A registered client.
///
/// The password hash is an opaque string supplied by the authentication
/// layer; the core never hashes or verifies credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub password_hash: String,
}

impl Client {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for registering a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub password_hash: String,
}

/// Loyalty tier on a salon card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountLevel {
    Standard,
    Silver,
    Gold,
    Platinum,
}

impl DiscountLevel {
    /// Stable database/text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
        }
    }

    /// Discount rate applied to purchases at this tier.
    #[must_use]
    pub const fn discount_rate(self) -> f64 {
        match self {
            Self::Standard => 0.0,
            Self::Silver => SILVER_DISCOUNT,
            Self::Gold => GOLD_DISCOUNT,
            Self::Platinum => PLATINUM_DISCOUNT,
        }
    }
}

impl std::str::FromStr for DiscountLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "STANDARD" => Ok(Self::Standard),
            "SILVER" => Ok(Self::Silver),
            "GOLD" => Ok(Self::Gold),
            "PLATINUM" => Ok(Self::Platinum),
            other => Err(format!("unknown discount level: {other}")),
        }
    }
}

/// Loyalty card issued to every client on registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalonCard {
    pub client_id: i64,
    pub discount_level: DiscountLevel,
    pub total_spent: f64,
    pub issue_date: DateTime<Utc>,
}

impl SalonCard {
    /// Promote the card when the lifetime spend crosses a tier threshold.
    /// Levels never downgrade.
    pub fn upgrade_level(&mut self) {
        if self.total_spent >= PLATINUM_THRESHOLD {
            self.discount_level = self.discount_level.max(DiscountLevel::Platinum);
        } else if self.total_spent >= GOLD_THRESHOLD {
            self.discount_level = self.discount_level.max(DiscountLevel::Gold);
        } else if self.total_spent >= SILVER_THRESHOLD {
            self.discount_level = self.discount_level.max(DiscountLevel::Silver);
        }
    }

    /// Price after the tier discount.
    #[must_use]
    pub fn apply_discount(&self, amount: f64) -> f64 {
        amount - amount * self.discount_level.discount_rate()
    }
}

/// Enumerated field update for a client record.
///
/// Each variant carries exactly the value it updates; there is no
/// field-by-name mutation anywhere in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UpdateClientField {
    FirstName(String),
    LastName(String),
    Phone(String),
    Email(Option<String>),
}

/// Enumerated field update for a master record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UpdateMasterField {
    FirstName(String),
    LastName(String),
    Phone(String),
    Email(Option<String>),
    Specialty(String),
}

/// Enumerated field update for a service record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UpdateServiceField {
    ServiceName(String),
    DurationMinutes(u32),
    Price(i64),
}
