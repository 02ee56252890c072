use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use immokey::auth::CallerIdentity;
use immokey::hospitality::domain::{
    Booking, BookingId, Establishment, EstablishmentId, PaymentStatus, Room, RoomId,
};
use immokey::hospitality::repository::{
    BookingRepository, EstablishmentRepository, PaymentError, PaymentGateway, PaymentReference,
    RepositoryError, RoomRepository,
};
use immokey::hospitality::revenue::{Granularity, ReportingWindow, RevenueService};
use immokey::hospitality::{InventoryService, ReservationService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory stand-in for the hosted backend: one store per table, the same
/// trait surface the production adapters implement.
pub(crate) struct Backend {
    pub(crate) establishments: Arc<InMemoryEstablishmentRepository>,
    pub(crate) rooms: Arc<InMemoryRoomRepository>,
    pub(crate) bookings: Arc<InMemoryBookingRepository>,
    pub(crate) payments: Arc<RecordingPaymentGateway>,
}

impl Backend {
    pub(crate) fn new() -> Self {
        Self {
            establishments: Arc::new(InMemoryEstablishmentRepository::default()),
            rooms: Arc::new(InMemoryRoomRepository::default()),
            bookings: Arc::new(InMemoryBookingRepository::default()),
            payments: Arc::new(RecordingPaymentGateway::default()),
        }
    }

    pub(crate) fn reservations(&self) -> Arc<ApiReservationService> {
        Arc::new(ReservationService::new(
            self.establishments.clone(),
            self.rooms.clone(),
            self.bookings.clone(),
            self.payments.clone(),
        ))
    }

    pub(crate) fn inventory(&self) -> Arc<ApiInventoryService> {
        Arc::new(InventoryService::new(
            self.establishments.clone(),
            self.rooms.clone(),
        ))
    }

    pub(crate) fn revenue(&self) -> Arc<ApiRevenueService> {
        Arc::new(RevenueService::new(self.bookings.clone()))
    }
}

pub(crate) type ApiReservationService = ReservationService<
    InMemoryEstablishmentRepository,
    InMemoryRoomRepository,
    InMemoryBookingRepository,
    RecordingPaymentGateway,
>;
pub(crate) type ApiInventoryService =
    InventoryService<InMemoryEstablishmentRepository, InMemoryRoomRepository>;
pub(crate) type ApiRevenueService = RevenueService<InMemoryBookingRepository>;

#[derive(Default)]
pub(crate) struct InMemoryEstablishmentRepository {
    records: Mutex<HashMap<EstablishmentId, Establishment>>,
}

impl EstablishmentRepository for InMemoryEstablishmentRepository {
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
pub(crate) struct InMemoryRoomRepository {
    records: Mutex<HashMap<RoomId, Room>>,
}

impl RoomRepository for InMemoryRoomRepository {
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

/// Booking store plus the room-to-owner index the hosted backend would derive
/// from its access policies.
#[derive(Default)]
pub(crate) struct InMemoryBookingRepository {
    records: Mutex<HashMap<BookingId, Booking>>,
    owner_by_room: Mutex<HashMap<RoomId, String>>,
}

impl InMemoryBookingRepository {
    pub(crate) fn register_owner(&self, room: RoomId, owner: &str) {
        self.owner_by_room
            .lock()
            .expect("owner index mutex poisoned")
            .insert(room, owner.to_string());
    }
}

impl BookingRepository for InMemoryBookingRepository {
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
        let owners = self
            .owner_by_room
            .lock()
            .expect("owner index mutex poisoned");
        let guard = self.records.lock().expect("booking mutex poisoned");
        Ok(guard
            .values()
            .filter(|booking| {
                owners.get(&booking.room_id) == Some(&owner.user_id)
                    && booking.payment_status == PaymentStatus::Paid
                    && window.contains(booking.stay.check_in())
            })
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CapturedPayment {
    pub(crate) amount: i64,
    pub(crate) currency: String,
    pub(crate) reference: String,
}

/// Gateway stand-in that approves every capture and keeps a trail, the way
/// the processor's sandbox does.
#[derive(Default)]
pub(crate) struct RecordingPaymentGateway {
    captures: Mutex<Vec<CapturedPayment>>,
    sequence: AtomicU64,
}

impl RecordingPaymentGateway {
    pub(crate) fn captures(&self) -> Vec<CapturedPayment> {
        self.captures.lock().expect("capture mutex poisoned").clone()
    }
}

impl PaymentGateway for RecordingPaymentGateway {
    fn capture(&self, amount: i64, currency: &str) -> Result<PaymentReference, PaymentError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let reference = PaymentReference(format!("pay-{id:06}"));
        let mut guard = self.captures.lock().expect("capture mutex poisoned");
        guard.push(CapturedPayment {
            amount,
            currency: currency.to_string(),
            reference: reference.0.clone(),
        });
        Ok(reference)
    }
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{value}', expected YYYY-MM-DD: {err}"))
}

pub(crate) fn parse_granularity(value: &str) -> Result<Granularity, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "day" | "daily" => Ok(Granularity::Day),
        "week" | "weekly" => Ok(Granularity::Week),
        "month" | "monthly" => Ok(Granularity::Month),
        other => Err(format!(
            "invalid granularity '{other}', expected day, week, or month"
        )),
    }
}
