//! Storage and payment ports.
//!
//! The hosted backend owns persistence, row-level access control, and
//! uniqueness constraints; these traits are the narrow contract the services
//! consume, so every service can be exercised against in-memory fakes.

use serde::{Deserialize, Serialize};

use crate::auth::CallerIdentity;

use super::domain::{Booking, BookingId, Establishment, EstablishmentId, Room, RoomId};
use super::revenue::ReportingWindow;

/// Establishment records, keyed by id and by their unique slug.
pub trait EstablishmentRepository: Send + Sync {
    /// Insert fails with [`RepositoryError::Conflict`] when the slug is
    /// already taken.
    fn insert(&self, establishment: Establishment) -> Result<Establishment, RepositoryError>;
    fn fetch(&self, id: &EstablishmentId) -> Result<Option<Establishment>, RepositoryError>;
    fn fetch_by_slug(&self, slug: &str) -> Result<Option<Establishment>, RepositoryError>;
}

pub trait RoomRepository: Send + Sync {
    fn insert(&self, room: Room) -> Result<Room, RepositoryError>;
    fn update(&self, room: Room) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RoomId) -> Result<Option<Room>, RepositoryError>;
    fn for_establishment(&self, id: &EstablishmentId) -> Result<Vec<Room>, RepositoryError>;
}

/// Booking records follow a soft lifecycle: there is deliberately no delete
/// operation on this trait.
pub trait BookingRepository: Send + Sync {
    fn insert(&self, booking: Booking) -> Result<Booking, RepositoryError>;
    fn update(&self, booking: Booking) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError>;
    /// Bookings whose status still blocks the room's availability.
    fn active_for_room(&self, room: &RoomId) -> Result<Vec<Booking>, RepositoryError>;
    /// Paid bookings with a check-in inside `window`, restricted to rooms of
    /// establishments owned by `owner`. The ownership restriction is the
    /// backend's access policy; callers must not widen it locally.
    fn paid_for_owner(
        &self,
        owner: &CallerIdentity,
        window: &ReportingWindow,
    ) -> Result<Vec<Booking>, RepositoryError>;
}

/// Error enumeration for repository failures. `Unavailable` covers an
/// unreachable backend or any response the client library cannot interpret;
/// it is never retried here, the error propagates to the caller.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Reference returned by the payment processor on a successful capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReference(pub String);

/// Outbound payment port. The whole contract consumed from the processor is
/// "amount + currency in, success or failure + reference out".
pub trait PaymentGateway: Send + Sync {
    fn capture(&self, amount: i64, currency: &str) -> Result<PaymentReference, PaymentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment declined: {0}")]
    Declined(String),
    #[error("payment transport unavailable: {0}")]
    Transport(String),
}
