//! Port abstraction for courts and owner-blocked windows.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{BlockedSlot, BlockedSlotId, Court, CourtId, Error, VenueId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by court adapters.
    pub enum CourtRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "court repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "court repository query failed: {message}",
    }
}

impl From<CourtRepositoryError> for Error {
    fn from(value: CourtRepositoryError) -> Self {
        match value {
            CourtRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("court repository unavailable: {message}"))
            }
            CourtRepositoryError::Query { message } => {
                Error::internal(format!("court repository error: {message}"))
            }
        }
    }
}

/// Result of trying to block a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// The block was stored.
    Inserted,
    /// An active booking overlaps the window.
    Conflict,
}

/// Court and blocked-window storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourtRepository: Send + Sync {
    /// Insert a court.
    async fn create(&self, court: &Court) -> Result<(), CourtRepositoryError>;

    /// Persist every mutable field.
    async fn update(&self, court: &Court) -> Result<(), CourtRepositoryError>;

    /// Fetch a court by id.
    async fn find_by_id(&self, id: &CourtId) -> Result<Option<Court>, CourtRepositoryError>;

    /// Courts of a venue ordered by name.
    async fn list_by_venue(
        &self,
        venue_id: &VenueId,
        include_inactive: bool,
    ) -> Result<Vec<Court>, CourtRepositoryError>;

    /// Lock the court row, check the window against active bookings
    /// (pending ones count when created after `hold_cutoff`) and insert the
    /// block when free.
    async fn insert_block_if_free(
        &self,
        block: &BlockedSlot,
        hold_cutoff: DateTime<Utc>,
    ) -> Result<BlockOutcome, CourtRepositoryError>;

    /// Fetch a block by id.
    async fn find_block(
        &self,
        id: &BlockedSlotId,
    ) -> Result<Option<BlockedSlot>, CourtRepositoryError>;

    /// Remove a block. Returns `false` when missing.
    async fn delete_block(&self, id: &BlockedSlotId) -> Result<bool, CourtRepositoryError>;

    /// Blocks on `court_id` for `date` ordered by start.
    async fn blocks_on(
        &self,
        court_id: &CourtId,
        date: NaiveDate,
    ) -> Result<Vec<BlockedSlot>, CourtRepositoryError>;
}
