//! Port abstraction for the amenity catalogue.

use async_trait::async_trait;

use crate::domain::{Amenity, AmenityId, Error};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by amenity adapters.
    pub enum AmenityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "amenity repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "amenity repository query failed: {message}",
        /// An amenity with the same name exists.
        DuplicateName => "amenity name already exists",
    }
}

impl From<AmenityRepositoryError> for Error {
    fn from(value: AmenityRepositoryError) -> Self {
        match value {
            AmenityRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("amenity repository unavailable: {message}"))
            }
            AmenityRepositoryError::Query { message } => {
                Error::internal(format!("amenity repository error: {message}"))
            }
            AmenityRepositoryError::DuplicateName => {
                Error::conflict("an amenity with this name already exists")
            }
        }
    }
}

/// Amenity storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AmenityRepository: Send + Sync {
    /// Every amenity ordered by name.
    async fn list(&self) -> Result<Vec<Amenity>, AmenityRepositoryError>;

    /// Amenities matching `ids`; unknown ids are skipped.
    async fn find_many(&self, ids: &[AmenityId]) -> Result<Vec<Amenity>, AmenityRepositoryError>;

    /// Insert a new amenity.
    async fn create(&self, amenity: &Amenity) -> Result<(), AmenityRepositoryError>;

    /// Delete an amenity and its venue links. Returns `false` when missing.
    async fn delete(&self, id: &AmenityId) -> Result<bool, AmenityRepositoryError>;
}
