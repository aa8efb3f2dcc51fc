use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use pricepoint_core::clock::{Clock, SystemClock};
use pricepoint_core::domain::record::{merge_patch, Patch, Record};
use pricepoint_core::ids::{IdGenerator, UuidIdGenerator};

use super::{RecordRepository, RepositoryError};

/// Process-memory collection. Each operation takes the lock once, so a single
/// merge-update is atomic; clients that read and then PUT whole records back can
/// still overwrite each other.
pub struct InMemoryRecordRepository<R> {
    records: RwLock<Vec<R>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<R: Record> InMemoryRecordRepository<R> {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self::with_records(Vec::new(), ids, clock)
    }

    /// Seeded records keep the ids they were loaded with.
    pub fn with_records(records: Vec<R>, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { records: RwLock::new(records), ids, clock }
    }
}

impl<R: Record> Default for InMemoryRecordRepository<R> {
    fn default() -> Self {
        Self::new(Arc::new(UuidIdGenerator), Arc::new(SystemClock))
    }
}

#[async_trait::async_trait]
impl<R: Record> RecordRepository<R> for InMemoryRecordRepository<R> {
    async fn list(&self) -> Result<Vec<R>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<R>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id() == id).cloned())
    }

    async fn append(&self, mut record: R) -> Result<R, RepositoryError> {
        let id = self.ids.generate(R::ID_SCHEME);
        record.on_append(id, self.clock.now());

        let mut records = self.records.write().await;
        records.push(record.clone());
        debug!(
            event_name = "store.record.appended",
            collection = %R::COLLECTION,
            record_id = %record.id(),
            size = records.len(),
            "record appended"
        );
        Ok(record)
    }

    async fn merge_update(&self, id: &str, patch: &Patch) -> Result<R, RepositoryError> {
        let mut records = self.records.write().await;
        let Some(slot) = records.iter_mut().find(|record| record.id() == id) else {
            return Err(RepositoryError::NotFound { collection: R::COLLECTION, id: id.to_string() });
        };

        let merged = merge_patch(slot, patch)?;
        *slot = merged.clone();
        debug!(
            event_name = "store.record.merged",
            collection = %R::COLLECTION,
            record_id = %id,
            fields = patch.len(),
            "record merge-updated"
        );
        Ok(merged)
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.records.read().await.len())
    }
}
