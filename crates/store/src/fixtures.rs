use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pricepoint_core::domain::product::Product;
use pricepoint_core::domain::quote::Quote;
use pricepoint_core::domain::record::{Collection, Record};
use pricepoint_core::domain::rules::{ConfigRule, WorkflowRule};
use pricepoint_core::domain::user::User;

/// Demo catalog and records the storefront ships with.
pub const DEMO_SEED_JSON: &str = include_str!("../seed/demo.json");
const DEMO_SOURCE: &str = "embedded demo dataset";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("could not read seed file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse {source_name}: {source}")]
    Parse { source_name: String, source: serde_json::Error },
    #[error("{source_name} has a {collection} record without an id")]
    MissingId { source_name: String, collection: Collection },
    #[error("{source_name} has duplicate {collection} id `{id}`")]
    DuplicateId { source_name: String, collection: Collection, id: String },
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedDataset {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub workflow_rules: Vec<WorkflowRule>,
    #[serde(default)]
    pub config_rules: Vec<ConfigRule>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SeedCounts {
    pub products: usize,
    pub quotes: usize,
    pub users: usize,
    pub workflow_rules: usize,
    pub config_rules: usize,
}

impl SeedDataset {
    pub fn demo() -> Result<Self, SeedError> {
        Self::parse(DEMO_SOURCE, DEMO_SEED_JSON)
    }

    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| SeedError::ReadFile { path: path.to_path_buf(), source })?;
        Self::parse(&format!("seed file `{}`", path.display()), &raw)
    }

    /// Loads `path` when given, the embedded demo dataset otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, SeedError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::demo(),
        }
    }

    pub fn parse(source_name: &str, raw: &str) -> Result<Self, SeedError> {
        let dataset: Self = serde_json::from_str(raw).map_err(|source| SeedError::Parse {
            source_name: source_name.to_string(),
            source,
        })?;
        dataset.verify(source_name)?;
        Ok(dataset)
    }

    /// Drops every mutable record and keeps only the product catalog.
    pub fn catalog_only(self) -> Self {
        Self { products: self.products, ..Self::default() }
    }

    pub fn counts(&self) -> SeedCounts {
        SeedCounts {
            products: self.products.len(),
            quotes: self.quotes.len(),
            users: self.users.len(),
            workflow_rules: self.workflow_rules.len(),
            config_rules: self.config_rules.len(),
        }
    }

    fn verify(&self, source_name: &str) -> Result<(), SeedError> {
        ensure_unique(
            source_name,
            Collection::Products,
            self.products.iter().map(|product| product.id.0.as_str()),
        )?;
        ensure_unique_records(source_name, &self.quotes)?;
        ensure_unique_records(source_name, &self.users)?;
        ensure_unique_records(source_name, &self.workflow_rules)?;
        ensure_unique_records(source_name, &self.config_rules)?;
        Ok(())
    }
}

fn ensure_unique_records<R: Record>(source_name: &str, records: &[R]) -> Result<(), SeedError> {
    ensure_unique(source_name, R::COLLECTION, records.iter().map(|record| record.id()))
}

fn ensure_unique<'a>(
    source_name: &str,
    collection: Collection,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), SeedError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(SeedError::MissingId { source_name: source_name.to_string(), collection });
        }
        if !seen.insert(id) {
            return Err(SeedError::DuplicateId {
                source_name: source_name.to_string(),
                collection,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
