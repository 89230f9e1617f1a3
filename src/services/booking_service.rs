use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{
    Booking, BookingDetails, BookingOutcome, BookingStatus, CancelOutcome, GymClass, UserRole,
    WaitlistEntry,
};
use crate::services::activity_service::ActivityService;
use crate::services::class_ledger::{Admission, ClassLedger};
use crate::services::errors::GymError;

pub(crate) const BOOKING_COLUMNS: &str = "id, user_id, class_id, booking_date, status";

pub(crate) const BOOKING_DETAILS_SELECT: &str = r#"
    SELECT b.id, b.user_id, u.name AS member_name, b.class_id, c.name AS class_name,
           c.day, c.time, b.booking_date, b.status
    FROM bookings b
    JOIN users u ON u.id = b.user_id
    JOIN classes c ON c.id = b.class_id
"#;

/// Capacity-bounded booking, cancellation with waitlist promotion, and
/// attendance marking.
///
/// `book` and `cancel` lock the class row for the length of their transaction,
/// so two requests against the same class never see the same free seat.
#[derive(Clone)]
pub struct BookingService {
    db: PgPool,
}

impl BookingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Reserve a seat for `actor`, or queue them when the class is full.
    pub async fn book(&self, actor: &Actor, class_id: Uuid) -> Result<BookingOutcome, GymError> {
        let mut tx = self.db.begin().await?;

        let user_name = fetch_user_name(&mut tx, actor.user_id)
            .await?
            .ok_or(GymError::NotFound("User"))?;
        let class = lock_class(&mut tx, class_id).await?;
        let mut ledger = load_ledger(&mut tx, &class).await?;

        let now = Utc::now();
        let outcome = match ledger.admit(actor.user_id, now) {
            Admission::AlreadyBooked => return Ok(BookingOutcome::AlreadyBooked),
            Admission::AlreadyWaitlisted(entry_id) => {
                return Ok(BookingOutcome::Waitlisted { entry_id })
            }
            Admission::Seat => {
                let booking = insert_booking(&mut tx, actor.user_id, class.id).await?;
                ActivityService::record(
                    &mut *tx,
                    &user_name,
                    &format!("booked '{}'.", class.name),
                )
                .await?;
                BookingOutcome::Booked {
                    booking_id: booking.id,
                }
            }
            Admission::Waitlist => {
                let entry = sqlx::query_as::<_, WaitlistEntry>(
                    "INSERT INTO waitlist (id, user_id, class_id, joined_at)
                     VALUES ($1, $2, $3, $4)
                     RETURNING id, seq, user_id, class_id, joined_at",
                )
                .bind(Uuid::new_v4())
                .bind(actor.user_id)
                .bind(class.id)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?;
                ActivityService::record(
                    &mut *tx,
                    &user_name,
                    &format!("joined waitlist for '{}'.", class.name),
                )
                .await?;
                BookingOutcome::Waitlisted { entry_id: entry.id }
            }
        };

        tx.commit().await?;

        tracing::info!(
            user_id = %actor.user_id,
            class_id = %class.id,
            outcome = ?outcome,
            "Processed booking request"
        );
        Ok(outcome)
    }

    /// Cancel a booking. Only the booking's owner or an admin may do this.
    pub async fn cancel(&self, actor: &Actor, booking_id: Uuid) -> Result<CancelOutcome, GymError> {
        let mut tx = self.db.begin().await?;

        let booking = fetch_booking(&mut tx, booking_id)
            .await?
            .ok_or(GymError::NotFound("Booking"))?;

        if booking.user_id != actor.user_id && actor.role != UserRole::Admin {
            tracing::warn!(
                actor = %actor.user_id,
                booking_id = %booking.id,
                "Rejected cancellation of another member's booking"
            );
            return Err(GymError::Unauthorized);
        }

        let outcome = release_seat(&mut tx, &booking).await?;
        tx.commit().await?;

        tracing::info!(
            booking_id = %booking.id,
            class_id = %booking.class_id,
            promoted = ?outcome.promoted_user_id,
            "Cancelled booking"
        );
        Ok(outcome)
    }

    /// Record attendance for a booked seat. Trainers only; `status` must be
    /// `ATTENDED` or `MISSED` and the booking must still be `BOOKED`.
    pub async fn mark_attendance(
        &self,
        actor: &Actor,
        booking_id: Uuid,
        status: &str,
    ) -> Result<Booking, GymError> {
        if actor.role != UserRole::Trainer {
            return Err(GymError::Unauthorized);
        }

        let status = parse_attendance(status)?;

        let mut tx = self.db.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(GymError::NotFound("Booking"))?;

        if !booking.status.can_transition_to(status) {
            return Err(GymError::InvalidStatus(format!(
                "booking is already {}",
                booking.status
            )));
        }

        let updated = sqlx::query_as::<_, Booking>(&format!(
            "UPDATE bookings SET status = $2 WHERE id = $1 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking.id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        let member_name = fetch_user_name(&mut tx, booking.user_id)
            .await?
            .ok_or(GymError::NotFound("User"))?;
        let class_name: String = sqlx::query_scalar("SELECT name FROM classes WHERE id = $1")
            .bind(booking.class_id)
            .fetch_one(&mut *tx)
            .await?;

        ActivityService::record(
            &mut *tx,
            &actor.name,
            &format!(
                "marked {} as {} for '{}'",
                member_name,
                status.as_str().to_lowercase(),
                class_name
            ),
        )
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Remove `actor`'s own waitlist entry for a class.
    pub async fn leave_waitlist(&self, actor: &Actor, class_id: Uuid) -> Result<(), GymError> {
        let mut tx = self.db.begin().await?;

        let class = lock_class(&mut tx, class_id).await?;
        let mut ledger = load_ledger(&mut tx, &class).await?;
        let entry = ledger
            .leave_waitlist(actor.user_id)
            .ok_or(GymError::NotFound("Waitlist entry"))?;

        sqlx::query("DELETE FROM waitlist WHERE id = $1")
            .bind(entry.id)
            .execute(&mut *tx)
            .await?;

        ActivityService::record(
            &mut *tx,
            &actor.name,
            &format!("left waitlist for '{}'.", class.name),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(user_id = %actor.user_id, class_id = %class.id, "Left waitlist");
        Ok(())
    }

    pub async fn bookings_for_user(&self, user_id: Uuid) -> Result<Vec<BookingDetails>, sqlx::Error> {
        sqlx::query_as::<_, BookingDetails>(&format!(
            "{BOOKING_DETAILS_SELECT} WHERE b.user_id = $1 ORDER BY b.booking_date DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await
    }

    /// Bookings for `user_id` made today (UTC).
    pub async fn todays_bookings(&self, user_id: Uuid) -> Result<Vec<BookingDetails>, sqlx::Error> {
        sqlx::query_as::<_, BookingDetails>(&format!(
            "{BOOKING_DETAILS_SELECT}
             WHERE b.user_id = $1 AND b.booking_date::date = CURRENT_DATE
             ORDER BY b.booking_date DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await
    }

    pub async fn waitlist_for_user(&self, user_id: Uuid) -> Result<Vec<WaitlistEntry>, sqlx::Error> {
        sqlx::query_as::<_, WaitlistEntry>(
            "SELECT id, seq, user_id, class_id, joined_at FROM waitlist
             WHERE user_id = $1 ORDER BY joined_at, seq",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
    }

    /// Distinct days on which `user_id` attended a class.
    pub async fn attended_dates(&self, user_id: Uuid) -> Result<Vec<chrono::NaiveDate>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT booking_date::date FROM bookings
             WHERE user_id = $1 AND status = 'ATTENDED'
             ORDER BY 1",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
    }
}

/// Parse an attendance value. Only the two terminal states are accepted.
pub fn parse_attendance(status: &str) -> Result<BookingStatus, GymError> {
    match status.parse::<BookingStatus>() {
        Ok(s @ (BookingStatus::Attended | BookingStatus::Missed)) => Ok(s),
        Ok(BookingStatus::Booked) | Err(_) => Err(GymError::InvalidStatus(status.to_string())),
    }
}

/// Delete `booking` and hand its seat to the oldest waitlisted member of the
/// same class, if any. Must run inside a transaction; locks the class row.
pub(crate) async fn release_seat(
    conn: &mut PgConnection,
    booking: &Booking,
) -> Result<CancelOutcome, GymError> {
    let class = lock_class(conn, booking.class_id).await?;
    let mut ledger = load_ledger(conn, &class).await?;

    let deleted = sqlx::query("DELETE FROM bookings WHERE id = $1")
        .bind(booking.id)
        .execute(&mut *conn)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(GymError::NotFound("Booking"));
    }

    let owner_name = fetch_user_name(conn, booking.user_id)
        .await?
        .ok_or(GymError::NotFound("User"))?;
    ActivityService::record(
        &mut *conn,
        &owner_name,
        &format!("cancelled booking for '{}'.", class.name),
    )
    .await?;

    let mut outcome = CancelOutcome {
        cancelled_booking_id: booking.id,
        promoted_user_id: None,
        promoted_booking_id: None,
    };

    if let Some(entry) = ledger.release(booking.user_id) {
        let promoted = seat_from_waitlist(conn, &class, &entry).await?;
        outcome.promoted_user_id = Some(entry.user_id);
        outcome.promoted_booking_id = Some(promoted.id);
    }

    Ok(outcome)
}

/// Seat queued members of an already locked class, oldest first, while it has
/// free seats. Used after the class grows.
pub(crate) async fn fill_free_seats(
    conn: &mut PgConnection,
    class: &GymClass,
) -> Result<Vec<Booking>, GymError> {
    let mut ledger = load_ledger(conn, class).await?;

    let mut promoted = Vec::new();
    for entry in ledger.fill_free_seats() {
        promoted.push(seat_from_waitlist(conn, class, &entry).await?);
    }
    Ok(promoted)
}

/// Turn a waitlist entry into a booking and record it in the feed.
async fn seat_from_waitlist(
    conn: &mut PgConnection,
    class: &GymClass,
    entry: &WaitlistEntry,
) -> Result<Booking, GymError> {
    let booking = insert_booking(conn, entry.user_id, class.id).await?;
    sqlx::query("DELETE FROM waitlist WHERE id = $1")
        .bind(entry.id)
        .execute(&mut *conn)
        .await?;

    let user_name = fetch_user_name(conn, entry.user_id)
        .await?
        .ok_or(GymError::NotFound("User"))?;
    ActivityService::record(
        &mut *conn,
        &user_name,
        &format!("auto-booked for '{}' from waitlist.", class.name),
    )
    .await?;

    tracing::info!(
        user_id = %entry.user_id,
        class_id = %class.id,
        "Promoted waitlisted member"
    );
    Ok(booking)
}

pub(crate) async fn fetch_booking(
    conn: &mut PgConnection,
    booking_id: Uuid,
) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
    ))
    .bind(booking_id)
    .fetch_optional(&mut *conn)
    .await
}

async fn fetch_user_name(conn: &mut PgConnection, user_id: Uuid) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT name FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
}

pub(crate) async fn lock_class(conn: &mut PgConnection, class_id: Uuid) -> Result<GymClass, GymError> {
    sqlx::query_as::<_, GymClass>(
        "SELECT id, name, description, day, time, duration, image_url, capacity
         FROM classes WHERE id = $1 FOR UPDATE",
    )
    .bind(class_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(GymError::NotFound("Class"))
}

async fn load_ledger(conn: &mut PgConnection, class: &GymClass) -> Result<ClassLedger, sqlx::Error> {
    let booked: Vec<Uuid> = sqlx::query_scalar("SELECT user_id FROM bookings WHERE class_id = $1")
        .bind(class.id)
        .fetch_all(&mut *conn)
        .await?;

    let waitlist = sqlx::query_as::<_, WaitlistEntry>(
        "SELECT id, seq, user_id, class_id, joined_at FROM waitlist
         WHERE class_id = $1 ORDER BY joined_at, seq",
    )
    .bind(class.id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ClassLedger::new(class.id, class.capacity, booked, waitlist))
}

async fn insert_booking(
    conn: &mut PgConnection,
    user_id: Uuid,
    class_id: Uuid,
) -> Result<Booking, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        "INSERT INTO bookings (id, user_id, class_id, booking_date, status)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {BOOKING_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(class_id)
    .bind(Utc::now())
    .bind(BookingStatus::Booked)
    .fetch_one(&mut *conn)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_attendance_accepts_terminal_states() {
        assert_matches!(parse_attendance("ATTENDED"), Ok(BookingStatus::Attended));
        assert_matches!(parse_attendance("MISSED"), Ok(BookingStatus::Missed));
    }

    #[test]
    fn test_parse_attendance_rejects_everything_else() {
        assert_matches!(parse_attendance("INVALID"), Err(GymError::InvalidStatus(s)) if s == "INVALID");
        assert_matches!(parse_attendance("BOOKED"), Err(GymError::InvalidStatus(_)));
        assert_matches!(parse_attendance(""), Err(GymError::InvalidStatus(_)));
        assert_matches!(parse_attendance("attended"), Err(GymError::InvalidStatus(_)));
    }
}
