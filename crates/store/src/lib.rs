pub mod fixtures;
pub mod repositories;
pub mod stores;

pub use fixtures::{SeedCounts, SeedDataset, SeedError, DEMO_SEED_JSON};
pub use repositories::{InMemoryRecordRepository, RecordRepository, RepositoryError};
pub use stores::RecordStores;
