use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::Deserialize;

use super::availability::{self, AvailabilityError, BookingQuote};
use super::domain::{
    Booking, BookingChannel, BookingId, BookingStatus, GuestContact, PaymentStatus, Room, RoomId,
    StayRange,
};
use super::repository::{
    BookingRepository, EstablishmentRepository, PaymentError, PaymentGateway, RepositoryError,
    RoomRepository,
};

/// Reservation request as it arrives from a booking form or the back office.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationRequest {
    pub room_id: RoomId,
    pub guest: GuestContact,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub channel: BookingChannel,
}

/// Service composing the room and booking stores, the payment gateway, and
/// the per-room serialization that keeps booking creation race-free.
pub struct ReservationService<E, R, B, P> {
    establishments: Arc<E>,
    rooms: Arc<R>,
    bookings: Arc<B>,
    payments: Arc<P>,
    slots: RoomSlotRegistry,
}

static BOOKING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_booking_id() -> BookingId {
    let id = BOOKING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BookingId(format!("bk-{id:06}"))
}

/// One mutex per room id. Creation takes the room's slot before re-checking
/// availability and inserting, so two concurrent requests for the same room
/// cannot both observe a free range. The check-then-insert race is closed
/// here rather than at the storage layer.
#[derive(Default)]
struct RoomSlotRegistry {
    slots: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
}

impl RoomSlotRegistry {
    fn slot_for(&self, room: &RoomId) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().expect("slot registry mutex poisoned");
        slots.entry(room.clone()).or_default().clone()
    }
}

impl<E, R, B, P> ReservationService<E, R, B, P>
where
    E: EstablishmentRepository + 'static,
    R: RoomRepository + 'static,
    B: BookingRepository + 'static,
    P: PaymentGateway + 'static,
{
    pub fn new(establishments: Arc<E>, rooms: Arc<R>, bookings: Arc<B>, payments: Arc<P>) -> Self {
        Self {
            establishments,
            rooms,
            bookings,
            payments,
            slots: RoomSlotRegistry::default(),
        }
    }

    fn load_room(&self, id: &RoomId) -> Result<Room, ReservationError> {
        self.rooms
            .fetch(id)?
            .ok_or_else(|| AvailabilityError::RoomUnavailable(id.clone()).into())
    }

    /// Read-only availability check and price for a requested stay.
    pub fn quote(
        &self,
        room_id: &RoomId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<BookingQuote, ReservationError> {
        let stay = StayRange::new(check_in, check_out).map_err(AvailabilityError::from)?;
        let room = self.load_room(room_id)?;
        let active = self.bookings.active_for_room(room_id)?;
        Ok(availability::evaluate(&room, &stay, active.iter())?)
    }

    /// Book a stay. The availability evaluation runs with the room's slot
    /// held, so a quote obtained earlier is advisory only; the decision that
    /// counts happens inside the critical section.
    pub fn create(&self, request: ReservationRequest) -> Result<Booking, ReservationError> {
        let ReservationRequest {
            room_id,
            guest,
            check_in,
            check_out,
            channel,
        } = request;

        let stay = StayRange::new(check_in, check_out).map_err(AvailabilityError::from)?;
        let room = self.load_room(&room_id)?;

        if channel == BookingChannel::PublicSite {
            let establishment = self
                .establishments
                .fetch(&room.establishment_id)?
                .ok_or(RepositoryError::NotFound)?;
            if !establishment.public_booking_enabled {
                return Err(AvailabilityError::RoomUnavailable(room.id.clone()).into());
            }
        }

        let slot = self.slots.slot_for(&room.id);
        let _guard = slot.lock().expect("room slot mutex poisoned");

        let active = self.bookings.active_for_room(&room.id)?;
        let quote = availability::evaluate(&room, &stay, active.iter())?;

        let booking = build_booking(next_booking_id(), &room, guest, stay, &quote);
        let stored = self.bookings.insert(booking)?;
        Ok(stored)
    }

    pub fn booking(&self, id: &BookingId) -> Result<Booking, ReservationError> {
        let booking = self.bookings.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(booking)
    }

    pub fn confirm(&self, id: &BookingId) -> Result<Booking, ReservationError> {
        self.transition(id, BookingStatus::Confirmed)
    }

    pub fn check_in(&self, id: &BookingId) -> Result<Booking, ReservationError> {
        self.transition(id, BookingStatus::CheckedIn)
    }

    pub fn check_out(&self, id: &BookingId) -> Result<Booking, ReservationError> {
        self.transition(id, BookingStatus::CheckedOut)
    }

    pub fn cancel(&self, id: &BookingId) -> Result<Booking, ReservationError> {
        self.transition(id, BookingStatus::Cancelled)
    }

    pub fn mark_no_show(&self, id: &BookingId) -> Result<Booking, ReservationError> {
        self.transition(id, BookingStatus::NoShow)
    }

    fn transition(
        &self,
        id: &BookingId,
        next: BookingStatus,
    ) -> Result<Booking, ReservationError> {
        let mut booking = self.bookings.fetch(id)?.ok_or(RepositoryError::NotFound)?;

        if !booking.status.can_transition_to(next) {
            return Err(ReservationError::InvalidTransition {
                booking: id.clone(),
                from: booking.status,
                to: next,
            });
        }

        booking.status = next;
        self.bookings.update(booking.clone())?;
        Ok(booking)
    }

    /// Capture the booking total through the payment processor and record the
    /// reference. Idempotent: a booking that is already paid is returned
    /// unchanged without a second capture.
    pub fn capture_payment(&self, id: &BookingId) -> Result<Booking, ReservationError> {
        let mut booking = self.bookings.fetch(id)?.ok_or(RepositoryError::NotFound)?;

        if booking.payment_status == PaymentStatus::Paid {
            return Ok(booking);
        }

        let reference = self
            .payments
            .capture(booking.total_amount, &booking.currency)?;

        booking.payment_status = PaymentStatus::Paid;
        booking.payment_reference = Some(reference.0);
        self.bookings.update(booking.clone())?;
        Ok(booking)
    }
}

fn build_booking(
    id: BookingId,
    room: &Room,
    guest: GuestContact,
    stay: StayRange,
    quote: &BookingQuote,
) -> Booking {
    Booking {
        id,
        room_id: room.id.clone(),
        guest,
        stay,
        nights: quote.nights,
        price_per_night: quote.price_per_night,
        subtotal: quote.subtotal,
        taxes: quote.taxes,
        fees: quote.fees,
        discount: quote.discount,
        total_amount: quote.total,
        currency: quote.currency.clone(),
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Pending,
        payment_reference: None,
    }
}

/// Error raised by the reservation service.
#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error(transparent)]
    Availability(#[from] AvailabilityError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error("booking {booking} cannot move from {from} to {to}")]
    InvalidTransition {
        booking: BookingId,
        from: BookingStatus,
        to: BookingStatus,
    },
}
