use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EstablishmentId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub String);

impl fmt::Display for EstablishmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Active,
    Maintenance,
    Inactive,
}

impl RoomStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Maintenance => "Under Maintenance",
            Self::Inactive => "Inactive",
        }
    }

    /// Only active rooms accept new stays.
    pub const fn is_bookable(self) -> bool {
        matches!(self, Self::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::CheckedIn => "Checked In",
            Self::CheckedOut => "Checked Out",
            Self::Cancelled => "Cancelled",
            Self::NoShow => "No-Show",
        }
    }

    /// Statuses that keep the room's dates occupied. Cancelled, no-show, and
    /// checked-out stays release their range.
    pub const fn blocks_availability(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::CheckedIn)
    }

    /// Forward-only lifecycle. Checked-out, cancelled, and no-show bookings
    /// are terminal; the record is never deleted.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::CheckedIn)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::Confirmed, Self::NoShow)
                | (Self::CheckedIn, Self::CheckedOut)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Payment Pending",
            Self::Partial => "Partially Paid",
            Self::Paid => "Paid",
            Self::Refunded => "Refunded",
        }
    }
}

/// Channel a reservation request arrives through. The public site is gated on
/// the establishment's `public_booking_enabled` flag; the back office is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingChannel {
    PublicSite,
    BackOffice,
}

impl Default for BookingChannel {
    fn default() -> Self {
        Self::PublicSite
    }
}

/// A date range ends strictly after it starts; degenerate and inverted ranges
/// are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("date range must end strictly after it starts, got {start} to {end}")]
pub struct InvalidDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Half-open stay interval `[check_in, check_out)`. The checkout day is not
/// occupied, which is what allows same-day turnover between two stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, InvalidDateRange> {
        if check_out <= check_in {
            return Err(InvalidDateRange {
                start: check_in,
                end: check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Whole-day count between check-in and check-out; always at least one.
    pub fn nights(&self) -> u32 {
        (self.check_out - self.check_in).num_days() as u32
    }

    /// Half-open interval intersection: `[a, b)` meets `[c, d)` iff
    /// `a < d && c < b`.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestContact {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub establishment_id: EstablishmentId,
    pub name: String,
    /// Nightly base price in minor currency units.
    pub price_per_night: i64,
    pub currency: String,
    pub status: RoomStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Establishment {
    pub id: EstablishmentId,
    /// Opaque identity of the owning account, as issued by the external
    /// authentication provider.
    pub owner_id: String,
    pub name: String,
    /// Unique human-readable key used for the public booking page.
    pub slug: String,
    pub public_booking_enabled: bool,
    pub branding: Branding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub id: BookingId,
    pub room_id: RoomId,
    pub guest: GuestContact,
    pub stay: StayRange,
    pub nights: u32,
    pub price_per_night: i64,
    pub subtotal: i64,
    pub taxes: i64,
    pub fees: i64,
    pub discount: i64,
    pub total_amount: i64,
    pub currency: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_reference: Option<String>,
}

impl Booking {
    pub fn status_view(&self) -> BookingStatusView {
        BookingStatusView {
            booking_id: self.id.clone(),
            room_id: self.room_id.clone(),
            status: self.status,
            status_label: self.status.label(),
            payment_status: self.payment_status,
            payment_status_label: self.payment_status.label(),
            check_in: self.stay.check_in(),
            check_out: self.stay.check_out(),
            nights: self.nights,
            total_amount: self.total_amount,
            currency: self.currency.clone(),
            payment_reference: self.payment_reference.clone(),
        }
    }
}

/// Sanitized booking projection exposed over the API.
#[derive(Debug, Clone, Serialize)]
pub struct BookingStatusView {
    pub booking_id: BookingId,
    pub room_id: RoomId,
    pub status: BookingStatus,
    pub status_label: &'static str,
    pub payment_status: PaymentStatus,
    pub payment_status_label: &'static str,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub total_amount: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
}
