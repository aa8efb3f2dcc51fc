use async_trait::async_trait;
use thiserror::Error;

use pricepoint_core::domain::record::{Collection, Patch, Record};
use pricepoint_core::errors::{ApplicationError, DomainError};

pub mod memory;

pub use memory::InMemoryRecordRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{label} `{id}` not found", label = .collection.label())]
    NotFound { collection: Collection, id: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<RepositoryError> for DomainError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound { collection, id } => {
                DomainError::RecordNotFound { collection, id }
            }
            RepositoryError::Domain(error) => error,
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        ApplicationError::Domain(value.into())
    }
}

/// Ordered collection of one record type.
///
/// `list` returns records in append order. `append` assigns identity through
/// [`Record::on_append`] and returns the stored record. `merge_update` shallow-merges
/// `patch` onto the record with the given id and leaves the collection untouched when
/// the id is unknown or the merged record is invalid.
#[async_trait]
pub trait RecordRepository<R: Record>: Send + Sync {
    async fn list(&self) -> Result<Vec<R>, RepositoryError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<R>, RepositoryError>;

    async fn append(&self, record: R) -> Result<R, RepositoryError>;

    async fn merge_update(&self, id: &str, patch: &Patch) -> Result<R, RepositoryError>;

    async fn count(&self) -> Result<usize, RepositoryError>;
}
