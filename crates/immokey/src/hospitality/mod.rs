//! Hospitality back office: reservation engine, inventory administration,
//! and revenue reporting.

pub mod availability;
pub mod domain;
pub mod inventory;
pub mod repository;
pub mod reservations;
pub mod revenue;
pub mod router;

#[cfg(test)]
mod tests;

pub use availability::{AvailabilityError, BookingQuote};
pub use domain::{
    Booking, BookingChannel, BookingId, BookingStatus, BookingStatusView, Branding, Establishment,
    EstablishmentId, GuestContact, InvalidDateRange, PaymentStatus, Room, RoomId, RoomStatus,
    StayRange,
};
pub use inventory::{InventoryError, InventoryService, NewEstablishment, NewRoom};
pub use repository::{
    BookingRepository, EstablishmentRepository, PaymentError, PaymentGateway, PaymentReference,
    RepositoryError, RoomRepository,
};
pub use reservations::{ReservationError, ReservationRequest, ReservationService};
pub use revenue::{Granularity, ReportingWindow, RevenueError, RevenueService};
pub use router::reservation_router;
