use std::sync::Arc;

use axum::Router;
use pricepoint_core::config::{AppConfig, ConfigError};
use pricepoint_core::{SystemClock, UuidIdGenerator};
use pricepoint_store::{RecordStores, SeedDataset, SeedError};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{api, health};

pub struct Application {
    pub config: AppConfig,
    pub stores: RecordStores,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("seed data could not be loaded: {0}")]
    Seed(#[source] SeedError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        seed_path = ?config.catalog.seed_path,
        seed_demo_data = config.catalog.seed_demo_data,
        "starting application bootstrap"
    );

    let dataset =
        SeedDataset::load(config.catalog.seed_path.as_deref()).map_err(BootstrapError::Seed)?;
    let dataset = if config.catalog.seed_demo_data { dataset } else { dataset.catalog_only() };

    let counts = dataset.counts();
    info!(
        event_name = "system.bootstrap.seed_loaded",
        correlation_id = "bootstrap",
        products = counts.products,
        quotes = counts.quotes,
        users = counts.users,
        workflow_rules = counts.workflow_rules,
        config_rules = counts.config_rules,
        "record stores seeded"
    );

    let stores =
        RecordStores::in_memory(dataset, Arc::new(UuidIdGenerator), Arc::new(SystemClock));
    if stores.products.is_empty() {
        warn!(
            event_name = "system.bootstrap.empty_catalog",
            correlation_id = "bootstrap",
            "seed data has no products; the storefront will show an empty catalog"
        );
    }
    Ok(Application { config, stores })
}

impl Application {
    pub fn router(&self) -> Router {
        Router::new()
            .merge(health::router(self.stores.clone()))
            .merge(api::router(self.stores.clone(), &self.config.cors))
            .layer(TraceLayer::new_for_http())
    }
}
