use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Booking lifecycle: `Booked` moves once to `Attended` or `Missed`, both terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Type)]
#[sqlx(type_name = "booking_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Booked,
    Attended,
    Missed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "BOOKED",
            BookingStatus::Attended => "ATTENDED",
            BookingStatus::Missed => "MISSED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Booked)
    }

    /// Only a `Booked` seat can be marked, and only with a terminal state.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        !self.is_terminal() && next.is_terminal()
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOOKED" => Ok(BookingStatus::Booked),
            "ATTENDED" => Ok(BookingStatus::Attended),
            "MISSED" => Ok(BookingStatus::Missed),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub class_id: Uuid,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
}

/// Booking joined with the names needed for display.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub member_name: String,
    pub class_id: Uuid,
    pub class_name: String,
    pub day: String,
    pub time: String,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub seq: i64,
    pub user_id: Uuid,
    pub class_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct BookClassRequest {
    pub class_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceRequest {
    pub booking_id: Uuid,
    pub status: String,
}

/// Result of a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BookingOutcome {
    Booked { booking_id: Uuid },
    Waitlisted { entry_id: Uuid },
    AlreadyBooked,
}

impl BookingOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            BookingOutcome::Booked { .. } => "Booked Successfully!",
            BookingOutcome::Waitlisted { .. } => {
                "Class is full. You have been added to the waitlist."
            }
            BookingOutcome::AlreadyBooked => "Already booked",
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, BookingOutcome::AlreadyBooked)
    }
}

/// Result of a cancellation, including who (if anyone) took the freed seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelOutcome {
    pub cancelled_booking_id: Uuid,
    pub promoted_user_id: Option<Uuid>,
    pub promoted_booking_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_rejects_unknown_values() {
        assert_eq!("ATTENDED".parse::<BookingStatus>(), Ok(BookingStatus::Attended));
        assert_eq!("MISSED".parse::<BookingStatus>(), Ok(BookingStatus::Missed));
        assert_eq!("INVALID".parse::<BookingStatus>(), Err("INVALID".to_string()));
        assert!("attended".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_status_transitions() {
        assert!(BookingStatus::Booked.can_transition_to(BookingStatus::Attended));
        assert!(BookingStatus::Booked.can_transition_to(BookingStatus::Missed));
        assert!(!BookingStatus::Booked.can_transition_to(BookingStatus::Booked));
        assert!(!BookingStatus::Attended.can_transition_to(BookingStatus::Missed));
        assert!(!BookingStatus::Missed.can_transition_to(BookingStatus::Attended));
        assert!(BookingStatus::Attended.is_terminal());
        assert!(!BookingStatus::Booked.is_terminal());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = BookingOutcome::AlreadyBooked;
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "already_booked");
        assert!(!outcome.is_success());
    }
}
