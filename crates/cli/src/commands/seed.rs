use pricepoint_core::config::{AppConfig, LoadOptions};
use pricepoint_store::{SeedCounts, SeedDataset};
use serde::Serialize;

use crate::commands::{CommandResult, FailureClass};

/// What `pricepoint seed` found, as emitted under `data`.
#[derive(Debug, Serialize)]
pub struct SeedReport {
    pub source: String,
    pub mode: SeedMode,
    pub counts: SeedCounts,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    Full,
    CatalogOnly,
}

pub fn run() -> CommandResult {
    run_with(LoadOptions::default())
}

pub fn run_with(options: LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                FailureClass::ConfigValidation,
                format!("configuration issue: {error}"),
            );
        }
    };

    let dataset = match SeedDataset::load(config.catalog.seed_path.as_deref()) {
        Ok(dataset) => dataset,
        Err(error) => return CommandResult::failure("seed", FailureClass::SeedLoad, error.to_string()),
    };
    let (dataset, mode) = if config.catalog.seed_demo_data {
        (dataset, SeedMode::Full)
    } else {
        (dataset.catalog_only(), SeedMode::CatalogOnly)
    };

    let source = config
        .catalog
        .seed_path
        .as_ref()
        .map(|path| format!("seed file `{}`", path.display()))
        .unwrap_or_else(|| "embedded demo dataset".to_string());
    let report = SeedReport { source, mode, counts: dataset.counts() };
    CommandResult::success("seed", summary(&report), report)
}

fn summary(report: &SeedReport) -> String {
    let total = report.counts.quotes
        + report.counts.users
        + report.counts.workflow_rules
        + report.counts.config_rules;
    format!(
        "{} is valid: {} products, {total} mutable records",
        report.source, report.counts.products
    )
}

#[cfg(test)]
mod tests {
    use pricepoint_store::SeedCounts;

    use super::{summary, SeedMode, SeedReport};

    #[test]
    fn summary_separates_catalog_from_mutable_records() {
        let report = SeedReport {
            source: "embedded demo dataset".to_string(),
            mode: SeedMode::Full,
            counts: SeedCounts { products: 3, quotes: 1, users: 3, workflow_rules: 2, config_rules: 1 },
        };

        assert_eq!(
            summary(&report),
            "embedded demo dataset is valid: 3 products, 7 mutable records"
        );
    }
}
