use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::auth::CallerIdentity;
use crate::hospitality::domain::{
    Booking, BookingChannel, BookingId, Branding, Establishment, EstablishmentId, GuestContact,
    Room, RoomId, RoomStatus,
};
use crate::hospitality::repository::{
    BookingRepository, EstablishmentRepository, PaymentError, PaymentGateway, PaymentReference,
    RepositoryError, RoomRepository,
};
use crate::hospitality::reservations::{ReservationRequest, ReservationService};
use crate::hospitality::revenue::ReportingWindow;

pub(super) const OWNER: &str = "user-000042";

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn establishment(public_booking_enabled: bool) -> Establishment {
    Establishment {
        id: EstablishmentId("est-900001".to_string()),
        owner_id: OWNER.to_string(),
        name: "Résidence Teranga".to_string(),
        slug: "residence-teranga".to_string(),
        public_booking_enabled,
        branding: Branding::default(),
    }
}

pub(super) fn room() -> Room {
    Room {
        id: RoomId("room-900001".to_string()),
        establishment_id: establishment(true).id,
        name: "Chambre Baobab".to_string(),
        price_per_night: 50_000,
        currency: "XOF".to_string(),
        status: RoomStatus::Active,
    }
}

pub(super) fn guest() -> GuestContact {
    GuestContact {
        full_name: "Awa Diop".to_string(),
        email: "awa@example.test".to_string(),
        phone: Some("+221770000000".to_string()),
    }
}

pub(super) fn request(check_in: NaiveDate, check_out: NaiveDate) -> ReservationRequest {
    ReservationRequest {
        room_id: room().id,
        guest: guest(),
        check_in,
        check_out,
        channel: BookingChannel::PublicSite,
    }
}

#[derive(Default)]
pub(super) struct MemoryEstablishments {
    records: Mutex<HashMap<EstablishmentId, Establishment>>,
}

impl MemoryEstablishments {
    pub(super) fn seeded(establishment: Establishment) -> Arc<Self> {
        let repository = Self::default();
        repository
            .records
            .lock()
            .expect("establishment mutex poisoned")
            .insert(establishment.id.clone(), establishment);
        Arc::new(repository)
    }
}

impl EstablishmentRepository for MemoryEstablishments {
    fn insert(&self, establishment: Establishment) -> Result<Establishment, RepositoryError> {
        let mut guard = self.records.lock().expect("establishment mutex poisoned");
        let slug_taken = guard
            .values()
            .any(|existing| existing.slug == establishment.slug);
        if slug_taken || guard.contains_key(&establishment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(establishment.id.clone(), establishment.clone());
        Ok(establishment)
    }

    fn fetch(&self, id: &EstablishmentId) -> Result<Option<Establishment>, RepositoryError> {
        let guard = self.records.lock().expect("establishment mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn fetch_by_slug(&self, slug: &str) -> Result<Option<Establishment>, RepositoryError> {
        let guard = self.records.lock().expect("establishment mutex poisoned");
        Ok(guard.values().find(|record| record.slug == slug).cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryRooms {
    records: Mutex<HashMap<RoomId, Room>>,
}

impl MemoryRooms {
    pub(super) fn seeded(room: Room) -> Arc<Self> {
        let repository = Self::default();
        repository
            .records
            .lock()
            .expect("room mutex poisoned")
            .insert(room.id.clone(), room);
        Arc::new(repository)
    }
}

impl RoomRepository for MemoryRooms {
    fn insert(&self, room: Room) -> Result<Room, RepositoryError> {
        let mut guard = self.records.lock().expect("room mutex poisoned");
        if guard.contains_key(&room.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(room.id.clone(), room.clone());
        Ok(room)
    }

    fn update(&self, room: Room) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("room mutex poisoned");
        if guard.contains_key(&room.id) {
            guard.insert(room.id.clone(), room);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        let guard = self.records.lock().expect("room mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_establishment(&self, id: &EstablishmentId) -> Result<Vec<Room>, RepositoryError> {
        let guard = self.records.lock().expect("room mutex poisoned");
        Ok(guard
            .values()
            .filter(|room| &room.establishment_id == id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryBookings {
    records: Mutex<HashMap<BookingId, Booking>>,
    owner_by_room: Mutex<HashMap<RoomId, String>>,
}

impl MemoryBookings {
    pub(super) fn assign_owner(&self, room: RoomId, owner: &str) {
        self.owner_by_room
            .lock()
            .expect("owner index mutex poisoned")
            .insert(room, owner.to_string());
    }

    pub(super) fn stored(&self) -> usize {
        self.records.lock().expect("booking mutex poisoned").len()
    }
}

impl BookingRepository for MemoryBookings {
    fn insert(&self, booking: Booking) -> Result<Booking, RepositoryError> {
        let mut guard = self.records.lock().expect("booking mutex poisoned");
        if guard.contains_key(&booking.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(booking.id.clone(), booking.clone());
        Ok(booking)
    }

    fn update(&self, booking: Booking) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("booking mutex poisoned");
        if guard.contains_key(&booking.id) {
            guard.insert(booking.id.clone(), booking);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        let guard = self.records.lock().expect("booking mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active_for_room(&self, room: &RoomId) -> Result<Vec<Booking>, RepositoryError> {
        let guard = self.records.lock().expect("booking mutex poisoned");
        Ok(guard
            .values()
            .filter(|booking| &booking.room_id == room && booking.status.blocks_availability())
            .cloned()
            .collect())
    }

    fn paid_for_owner(
        &self,
        owner: &CallerIdentity,
        window: &ReportingWindow,
    ) -> Result<Vec<Booking>, RepositoryError> {
        let owners = self.owner_by_room.lock().expect("owner index mutex poisoned");
        let guard = self.records.lock().expect("booking mutex poisoned");
        Ok(guard
            .values()
            .filter(|booking| {
                owners.get(&booking.room_id) == Some(&owner.user_id)
                    && booking.payment_status == crate::hospitality::domain::PaymentStatus::Paid
                    && window.contains(booking.stay.check_in())
            })
            .cloned()
            .collect())
    }
}

/// Gateway that approves every capture and remembers what it saw.
#[derive(Default)]
pub(super) struct RecordingPayments {
    captures: Mutex<Vec<(i64, String)>>,
}

impl RecordingPayments {
    pub(super) fn captures(&self) -> Vec<(i64, String)> {
        self.captures.lock().expect("capture mutex poisoned").clone()
    }
}

impl PaymentGateway for RecordingPayments {
    fn capture(&self, amount: i64, currency: &str) -> Result<PaymentReference, PaymentError> {
        let mut guard = self.captures.lock().expect("capture mutex poisoned");
        guard.push((amount, currency.to_string()));
        Ok(PaymentReference(format!("pay-{:06}", guard.len())))
    }
}

/// Gateway that declines every capture.
#[derive(Default)]
pub(super) struct DecliningPayments;

impl PaymentGateway for DecliningPayments {
    fn capture(&self, _amount: i64, _currency: &str) -> Result<PaymentReference, PaymentError> {
        Err(PaymentError::Declined("card declined".to_string()))
    }
}

/// Booking store whose inserts always collide.
pub(super) struct ConflictBookings;

impl BookingRepository for ConflictBookings {
    fn insert(&self, _booking: Booking) -> Result<Booking, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _booking: Booking) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        Ok(None)
    }

    fn active_for_room(&self, _room: &RoomId) -> Result<Vec<Booking>, RepositoryError> {
        Ok(Vec::new())
    }

    fn paid_for_owner(
        &self,
        _owner: &CallerIdentity,
        _window: &ReportingWindow,
    ) -> Result<Vec<Booking>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// Booking store standing in for an unreachable backend.
pub(super) struct UnavailableBookings;

impl BookingRepository for UnavailableBookings {
    fn insert(&self, _booking: Booking) -> Result<Booking, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn update(&self, _booking: Booking) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn fetch(&self, _id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn active_for_room(&self, _room: &RoomId) -> Result<Vec<Booking>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn paid_for_owner(
        &self,
        _owner: &CallerIdentity,
        _window: &ReportingWindow,
    ) -> Result<Vec<Booking>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }
}

pub(super) type MemoryReservationService =
    ReservationService<MemoryEstablishments, MemoryRooms, MemoryBookings, RecordingPayments>;

pub(super) fn build_service() -> (
    Arc<MemoryReservationService>,
    Arc<MemoryBookings>,
    Arc<RecordingPayments>,
) {
    build_service_with(establishment(true))
}

pub(super) fn build_service_with(
    establishment: Establishment,
) -> (
    Arc<MemoryReservationService>,
    Arc<MemoryBookings>,
    Arc<RecordingPayments>,
) {
    let establishments = MemoryEstablishments::seeded(establishment);
    let rooms = MemoryRooms::seeded(room());
    let bookings = Arc::new(MemoryBookings::default());
    bookings.assign_owner(room().id, OWNER);
    let payments = Arc::new(RecordingPayments::default());

    let service = Arc::new(ReservationService::new(
        establishments,
        rooms,
        bookings.clone(),
        payments.clone(),
    ));

    (service, bookings, payments)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
