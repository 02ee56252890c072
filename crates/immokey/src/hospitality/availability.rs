//! Availability evaluation and stay pricing.
//!
//! The functions here are pure: they look at a room, a requested stay, and a
//! snapshot of existing bookings, and never touch storage. The reservation
//! service decides when the snapshot is taken (in particular, it re-runs the
//! evaluation while holding the room's slot lock before inserting).

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Booking, InvalidDateRange, Room, RoomId, StayRange};

/// Priced stay. Taxes, fees, and discount are carried as explicit zero
/// defaults; no tax engine exists and the fields are the extension point for
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingQuote {
    pub nights: u32,
    pub price_per_night: i64,
    pub subtotal: i64,
    pub taxes: i64,
    pub fees: i64,
    pub discount: i64,
    pub total: i64,
    pub currency: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error(transparent)]
    InvalidDateRange(#[from] InvalidDateRange),
    #[error("room {0} is not open for booking")]
    RoomUnavailable(RoomId),
    #[error("room {room} already has an active booking overlapping {check_in} to {check_out}")]
    SlotTaken {
        room: RoomId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
}

/// Price a stay against the room's nightly rate. Currency is carried from the
/// room record, never recomputed.
pub fn price_stay(room: &Room, stay: &StayRange) -> BookingQuote {
    let nights = stay.nights();
    let subtotal = room.price_per_night * i64::from(nights);
    let (taxes, fees, discount) = (0, 0, 0);

    BookingQuote {
        nights,
        price_per_night: room.price_per_night,
        subtotal,
        taxes,
        fees,
        discount,
        total: subtotal + taxes + fees - discount,
        currency: room.currency.clone(),
    }
}

/// Decide whether `stay` can be booked on `room` given the existing bookings,
/// and price it if so. Bookings whose status no longer blocks availability
/// (cancelled, no-show, checked-out) are ignored.
pub fn evaluate<'a, I>(
    room: &Room,
    stay: &StayRange,
    existing: I,
) -> Result<BookingQuote, AvailabilityError>
where
    I: IntoIterator<Item = &'a Booking>,
{
    if !room.status.is_bookable() {
        return Err(AvailabilityError::RoomUnavailable(room.id.clone()));
    }

    for booking in existing {
        if booking.status.blocks_availability() && booking.stay.overlaps(stay) {
            return Err(AvailabilityError::SlotTaken {
                room: room.id.clone(),
                check_in: stay.check_in(),
                check_out: stay.check_out(),
            });
        }
    }

    Ok(price_stay(room, stay))
}
