//! Seat accounting for a single class.
//!
//! A [`ClassLedger`] is loaded inside the transaction that holds the class row
//! lock, so every decision it makes is made against a consistent view of the
//! class's bookings and waitlist. The booking service persists whatever the
//! ledger decides.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::WaitlistEntry;

/// What happens to a user who asks for a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The user already holds a booking for this class.
    AlreadyBooked,
    /// The user is already queued; carries the existing entry id.
    AlreadyWaitlisted(Uuid),
    /// A seat is free and is given to the user.
    Seat,
    /// The class is full; the user joins the back of the queue.
    Waitlist,
}

#[derive(Debug, Clone)]
pub struct ClassLedger {
    class_id: Uuid,
    capacity: i32,
    booked: Vec<Uuid>,
    waitlist: Vec<WaitlistEntry>,
}

impl ClassLedger {
    pub fn new(
        class_id: Uuid,
        capacity: i32,
        booked: Vec<Uuid>,
        waitlist: Vec<WaitlistEntry>,
    ) -> Self {
        Self {
            class_id,
            capacity,
            booked,
            waitlist,
        }
    }

    pub fn booked_count(&self) -> usize {
        self.booked.len()
    }

    pub fn waitlist_len(&self) -> usize {
        self.waitlist.len()
    }

    /// Seats are free only while the booked count is under capacity. A class
    /// whose capacity was lowered below its booked count stays over-full until
    /// enough cancellations bring it back under.
    pub fn has_free_seat(&self) -> bool {
        (self.booked.len() as i64) < i64::from(self.capacity)
    }

    pub fn is_booked(&self, user_id: Uuid) -> bool {
        self.booked.contains(&user_id)
    }

    pub fn waitlist_entry_for(&self, user_id: Uuid) -> Option<&WaitlistEntry> {
        self.waitlist.iter().find(|e| e.user_id == user_id)
    }

    /// Oldest waitlist entry; equal timestamps fall back to insertion order.
    pub fn next_in_line(&self) -> Option<&WaitlistEntry> {
        self.waitlist
            .iter()
            .min_by_key(|e| (e.joined_at, e.seq))
    }

    /// Decide a booking request without changing the ledger.
    pub fn admission_for(&self, user_id: Uuid) -> Admission {
        if self.is_booked(user_id) {
            Admission::AlreadyBooked
        } else if let Some(entry) = self.waitlist_entry_for(user_id) {
            Admission::AlreadyWaitlisted(entry.id)
        } else if self.has_free_seat() {
            Admission::Seat
        } else {
            Admission::Waitlist
        }
    }

    /// Decide a booking request and apply it to the ledger.
    pub fn admit(&mut self, user_id: Uuid, now: DateTime<Utc>) -> Admission {
        let admission = self.admission_for(user_id);
        match admission {
            Admission::Seat => self.booked.push(user_id),
            Admission::Waitlist => {
                let seq = self.waitlist.iter().map(|e| e.seq).max().unwrap_or(0) + 1;
                self.waitlist.push(WaitlistEntry {
                    id: Uuid::new_v4(),
                    seq,
                    user_id,
                    class_id: self.class_id,
                    joined_at: now,
                });
            }
            Admission::AlreadyBooked | Admission::AlreadyWaitlisted(_) => {}
        }
        admission
    }

    /// Give up `user_id`'s seat. If that leaves a seat free and someone is
    /// queued, the oldest entry is removed from the queue, seated, and returned.
    pub fn release(&mut self, user_id: Uuid) -> Option<WaitlistEntry> {
        let position = self.booked.iter().position(|u| *u == user_id)?;
        self.booked.swap_remove(position);

        if !self.has_free_seat() {
            return None;
        }

        let next_id = self.next_in_line()?.id;
        let index = self.waitlist.iter().position(|e| e.id == next_id)?;
        let promoted = self.waitlist.remove(index);
        self.booked.push(promoted.user_id);
        Some(promoted)
    }

    /// Change the class size. Nobody is evicted when it shrinks; call
    /// [`ClassLedger::fill_free_seats`] afterwards when it grows.
    pub fn set_capacity(&mut self, capacity: i32) {
        self.capacity = capacity;
    }

    /// Seat queued members, oldest first, until the class is full or the
    /// queue is empty. Returns the promoted entries in promotion order.
    pub fn fill_free_seats(&mut self) -> Vec<WaitlistEntry> {
        let mut promoted = Vec::new();
        while self.has_free_seat() {
            let Some(next_id) = self.next_in_line().map(|e| e.id) else {
                break;
            };
            let Some(index) = self.waitlist.iter().position(|e| e.id == next_id) else {
                break;
            };
            let entry = self.waitlist.remove(index);
            self.booked.push(entry.user_id);
            promoted.push(entry);
        }
        promoted
    }

    /// Drop a queued entry without seating anyone.
    pub fn leave_waitlist(&mut self, user_id: Uuid) -> Option<WaitlistEntry> {
        let index = self.waitlist.iter().position(|e| e.user_id == user_id)?;
        Some(self.waitlist.remove(index))
    }
}
