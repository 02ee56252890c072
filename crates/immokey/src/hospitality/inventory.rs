use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{Branding, Establishment, EstablishmentId, Room, RoomId, RoomStatus};
use super::repository::{EstablishmentRepository, RepositoryError, RoomRepository};

/// Back-office provisioning: establishments, their rooms, and the public
/// booking profile looked up by slug.
pub struct InventoryService<E, R> {
    establishments: Arc<E>,
    rooms: Arc<R>,
}

static ESTABLISHMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ROOM_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_establishment_id() -> EstablishmentId {
    let id = ESTABLISHMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EstablishmentId(format!("est-{id:06}"))
}

fn next_room_id() -> RoomId {
    let id = ROOM_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RoomId(format!("room-{id:06}"))
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEstablishment {
    pub owner_id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub public_booking_enabled: bool,
    #[serde(default)]
    pub branding: Branding,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRoom {
    pub establishment_id: EstablishmentId,
    pub name: String,
    pub price_per_night: i64,
    pub currency: String,
}

/// Public booking page projection: the establishment's branding plus its
/// bookable rooms only.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfileView {
    pub name: String,
    pub slug: String,
    pub branding: Branding,
    pub rooms: Vec<PublicRoomView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicRoomView {
    pub room_id: RoomId,
    pub name: String,
    pub price_per_night: i64,
    pub currency: String,
}

impl<E, R> InventoryService<E, R>
where
    E: EstablishmentRepository + 'static,
    R: RoomRepository + 'static,
{
    pub fn new(establishments: Arc<E>, rooms: Arc<R>) -> Self {
        Self {
            establishments,
            rooms,
        }
    }

    /// Register a new establishment. The slug must be well formed; uniqueness
    /// is the backend's constraint and surfaces as a conflict.
    pub fn register_establishment(
        &self,
        submission: NewEstablishment,
    ) -> Result<Establishment, InventoryError> {
        validate_slug(&submission.slug)?;

        let establishment = Establishment {
            id: next_establishment_id(),
            owner_id: submission.owner_id,
            name: submission.name,
            slug: submission.slug,
            public_booking_enabled: submission.public_booking_enabled,
            branding: submission.branding,
        };

        let stored = self.establishments.insert(establishment)?;
        Ok(stored)
    }

    /// Open a room under an existing establishment. New rooms start active.
    pub fn open_room(&self, submission: NewRoom) -> Result<Room, InventoryError> {
        if submission.price_per_night <= 0 {
            return Err(InventoryError::InvalidPrice(submission.price_per_night));
        }

        let establishment = self
            .establishments
            .fetch(&submission.establishment_id)?
            .ok_or_else(|| {
                InventoryError::EstablishmentNotFound(submission.establishment_id.clone())
            })?;

        let room = Room {
            id: next_room_id(),
            establishment_id: establishment.id,
            name: submission.name,
            price_per_night: submission.price_per_night,
            currency: submission.currency,
            status: RoomStatus::Active,
        };

        let stored = self.rooms.insert(room)?;
        Ok(stored)
    }

    /// Move a room between active, maintenance, and inactive.
    pub fn set_room_status(
        &self,
        room_id: &RoomId,
        status: RoomStatus,
    ) -> Result<Room, InventoryError> {
        let mut room = self
            .rooms
            .fetch(room_id)?
            .ok_or_else(|| InventoryError::RoomNotFound(room_id.clone()))?;

        room.status = status;
        self.rooms.update(room.clone())?;
        Ok(room)
    }

    pub fn rooms(&self, establishment_id: &EstablishmentId) -> Result<Vec<Room>, InventoryError> {
        let rooms = self.rooms.for_establishment(establishment_id)?;
        Ok(rooms)
    }

    /// Resolve a public booking page by slug. Establishments that have not
    /// enabled public booking are indistinguishable from unknown slugs.
    pub fn public_profile(&self, slug: &str) -> Result<PublicProfileView, InventoryError> {
        let establishment = self
            .establishments
            .fetch_by_slug(slug)?
            .filter(|establishment| establishment.public_booking_enabled)
            .ok_or_else(|| InventoryError::NotListed(slug.to_string()))?;

        let rooms = self
            .rooms
            .for_establishment(&establishment.id)?
            .into_iter()
            .filter(|room| room.status.is_bookable())
            .map(|room| PublicRoomView {
                room_id: room.id,
                name: room.name,
                price_per_night: room.price_per_night,
                currency: room.currency,
            })
            .collect();

        Ok(PublicProfileView {
            name: establishment.name,
            slug: establishment.slug,
            branding: establishment.branding,
            rooms,
        })
    }
}

/// Slugs are lowercase ASCII alphanumerics joined by single hyphens.
fn validate_slug(slug: &str) -> Result<(), InventoryError> {
    let well_formed = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if well_formed {
        Ok(())
    } else {
        Err(InventoryError::InvalidSlug(slug.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("slug '{0}' must be lowercase alphanumerics joined by single hyphens")]
    InvalidSlug(String),
    #[error("nightly price must be positive, got {0}")]
    InvalidPrice(i64),
    #[error("establishment {0} not found")]
    EstablishmentNotFound(EstablishmentId),
    #[error("room {0} not found")]
    RoomNotFound(RoomId),
    #[error("no public booking page for '{0}'")]
    NotListed(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
