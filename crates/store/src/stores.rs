use std::sync::Arc;

use pricepoint_core::catalog::ProductCatalog;
use pricepoint_core::clock::Clock;
use pricepoint_core::domain::quote::Quote;
use pricepoint_core::domain::record::Collection;
use pricepoint_core::domain::rules::{ConfigRule, WorkflowRule};
use pricepoint_core::domain::user::User;
use pricepoint_core::ids::IdGenerator;

use crate::fixtures::SeedDataset;
use crate::repositories::{InMemoryRecordRepository, RecordRepository, RepositoryError};

/// Every collection the service exposes, built once at startup and shared by handlers.
#[derive(Clone)]
pub struct RecordStores {
    pub products: Arc<ProductCatalog>,
    pub quotes: Arc<dyn RecordRepository<Quote>>,
    pub users: Arc<dyn RecordRepository<User>>,
    pub workflow_rules: Arc<dyn RecordRepository<WorkflowRule>>,
    pub config_rules: Arc<dyn RecordRepository<ConfigRule>>,
}

impl RecordStores {
    pub fn in_memory(
        dataset: SeedDataset,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            products: Arc::new(ProductCatalog::new(dataset.products)),
            quotes: Arc::new(InMemoryRecordRepository::with_records(
                dataset.quotes,
                Arc::clone(&ids),
                Arc::clone(&clock),
            )),
            users: Arc::new(InMemoryRecordRepository::with_records(
                dataset.users,
                Arc::clone(&ids),
                Arc::clone(&clock),
            )),
            workflow_rules: Arc::new(InMemoryRecordRepository::with_records(
                dataset.workflow_rules,
                Arc::clone(&ids),
                Arc::clone(&clock),
            )),
            config_rules: Arc::new(InMemoryRecordRepository::with_records(
                dataset.config_rules,
                ids,
                clock,
            )),
        }
    }

    /// Record count per collection, in [`Collection::ALL`] order.
    pub async fn counts(&self) -> Result<Vec<(Collection, usize)>, RepositoryError> {
        Ok(vec![
            (Collection::Products, self.products.len()),
            (Collection::Quotes, self.quotes.count().await?),
            (Collection::Users, self.users.count().await?),
            (Collection::WorkflowRules, self.workflow_rules.count().await?),
            (Collection::ConfigRules, self.config_rules.count().await?),
        ])
    }
}
