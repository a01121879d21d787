//! Calendar entities: working days, breaks and appointments
//!
//! All overlap arithmetic uses half-open intervals `[start, end)`: two ranges
//! overlap iff `a.start < b.end && a.end > b.start`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Half-open interval overlap test for `[a_start, a_end)` vs `[b_start, b_end)`.
#[must_use]
pub fn ranges_overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Appointment lifecycle status
///
/// `Scheduled` is the only non-terminal state. Transitions out of it are
/// admin-only except the client self-cancellation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Stable database/text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
        }
    }

    /// Terminal states accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Scheduled)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    #[must_use]
    pub const fn permits(self, next: Self) -> bool {
        matches!(self, Self::Scheduled) && !matches!(next, Self::Scheduled)
    }

    /// Whether an appointment in this status keeps its time range reserved.
    /// Only cancelled appointments free their slot.
    #[must_use]
    pub const fn blocks_slot(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(Self::Scheduled),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            "NO_SHOW" => Ok(Self::NoShow),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}

/// A master's declared availability window for one calendar date.
///
/// Unique per (master, date). `start_time < end_time` unless the day is
/// marked as a day off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDay {
    pub schedule_id: i64,
    pub master_id: i64,
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_day_off: bool,
}

impl WorkingDay {
    /// Opening instant of the day.
    #[must_use]
    pub fn opens_at(&self) -> NaiveDateTime {
        self.work_date.and_time(self.start_time)
    }

    /// Closing instant of the day (exclusive bound for bookings).
    #[must_use]
    pub fn closes_at(&self) -> NaiveDateTime {
        self.work_date.and_time(self.end_time)
    }

    /// Human-readable hours, e.g. `09:00 - 18:00` or `day off`.
    #[must_use]
    pub fn hours_label(&self) -> String {
        if self.is_day_off {
            "day off".to_string()
        } else {
            format!(
                "{} - {}",
                self.start_time.format("%H:%M"),
                self.end_time.format("%H:%M")
            )
        }
    }
}

/// Payload for creating a working day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkingDay {
    pub master_id: i64,
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_day_off: bool,
}

/// A sub-interval of a working day excluded from bookability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInterval {
    pub break_id: i64,
    pub schedule_id: i64,
    pub break_start: NaiveTime,
    pub break_end: NaiveTime,
    pub reason: Option<String>,
}

impl BreakInterval {
    /// The break as a datetime range on the given date.
    #[must_use]
    pub fn bounds_on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        (date.and_time(self.break_start), date.and_time(self.break_end))
    }

    /// Whether `[start, end)` intersects this break on `date`.
    #[must_use]
    pub fn overlaps(&self, date: NaiveDate, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let (break_start, break_end) = self.bounds_on(date);
        ranges_overlap(start, end, break_start, break_end)
    }
}

/// Payload for creating a break.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBreak {
    pub schedule_id: i64,
    pub break_start: NaiveTime,
    pub break_end: NaiveTime,
    pub reason: Option<String>,
}

/// A confirmed booking of a master's time for a client and service.
///
/// `end_datetime` is derived (`start + service duration`) and never mutated
/// independently. Appointments are only physically deleted when their working
/// day is cascade-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: i64,
    pub master_id: i64,
    pub client_id: i64,
    pub service_id: i64,
    pub schedule_id: i64,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: NaiveDateTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Appointment {
    /// Whether `[start, end)` intersects this appointment's range.
    #[must_use]
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        ranges_overlap(start, end, self.start_datetime, self.end_datetime)
    }
}

/// Payload for persisting a new appointment (status starts as `Scheduled`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub master_id: i64,
    pub client_id: i64,
    pub service_id: i64,
    pub schedule_id: i64,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: NaiveDateTime,
    pub notes: Option<String>,
}

/// Filter for appointment listings. Empty filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentFilter {
    pub client_id: Option<i64>,
    pub master_id: Option<i64>,
    pub status: Option<AppointmentStatus>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl AppointmentFilter {
    /// All appointments of one client.
    #[must_use]
    pub fn for_client(client_id: i64) -> Self {
        Self { client_id: Some(client_id), ..Self::default() }
    }

    /// All appointments of one master.
    #[must_use]
    pub fn for_master(master_id: i64) -> Self {
        Self { master_id: Some(master_id), ..Self::default() }
    }

    /// Restrict to a status.
    #[must_use]
    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to `[from, to)` on the appointment start.
    #[must_use]
    pub fn within(mut self, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }
}
