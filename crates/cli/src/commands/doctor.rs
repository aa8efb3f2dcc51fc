use std::net::{SocketAddr, ToSocketAddrs};

use anyhow::{anyhow, Context};
use pricepoint_core::config::{AppConfig, LoadOptions};
use pricepoint_core::{ProductCatalog, ProductId, TypedField};
use pricepoint_store::SeedDataset;
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    run_with(LoadOptions::default(), json_output)
}

pub fn run_with(options: LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options);
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            serde_json::json!({
                "overall_status": "fail",
                "summary": "doctor serialization failed",
                "error": error.to_string(),
            })
            .to_string()
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.extend(check_seed_dataset(&config));
            checks.push(check_listen_address(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["seed_dataset", "rule_products", "listen_address"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_seed_dataset(config: &AppConfig) -> Vec<DoctorCheck> {
    let dataset = match SeedDataset::load(config.catalog.seed_path.as_deref()) {
        Ok(dataset) if config.catalog.seed_demo_data => dataset,
        Ok(dataset) => dataset.catalog_only(),
        Err(error) => {
            return vec![
                DoctorCheck { name: "seed_dataset", status: CheckStatus::Fail, details: error.to_string() },
                DoctorCheck {
                    name: "rule_products",
                    status: CheckStatus::Skipped,
                    details: "skipped because the seed dataset did not load".to_string(),
                },
            ];
        }
    };

    let counts = dataset.counts();
    let mode = if config.catalog.seed_demo_data { "full" } else { "catalog only" };
    let loaded = DoctorCheck {
        name: "seed_dataset",
        status: CheckStatus::Pass,
        details: format!(
            "{} products, {} quotes, {} users ({mode})",
            counts.products, counts.quotes, counts.users
        ),
    };

    vec![loaded, check_rule_products(&dataset)]
}

/// Config rules only fire for products the storefront can show.
fn check_rule_products(dataset: &SeedDataset) -> DoctorCheck {
    let catalog = ProductCatalog::new(dataset.products.clone());
    let dangling: Vec<&str> = dataset
        .config_rules
        .iter()
        .filter_map(|rule| rule.product_id.typed())
        .filter(|product_id| catalog.find(&ProductId((*product_id).clone())).is_none())
        .map(String::as_str)
        .collect();

    if dangling.is_empty() {
        DoctorCheck {
            name: "rule_products",
            status: CheckStatus::Pass,
            details: format!(
                "{} config rules reference catalog products",
                dataset.config_rules.len()
            ),
        }
    } else {
        DoctorCheck {
            name: "rule_products",
            status: CheckStatus::Fail,
            details: format!("config rules reference unknown products: {}", dangling.join(", ")),
        }
    }
}

fn check_listen_address(config: &AppConfig) -> DoctorCheck {
    match resolve_listen_address(config) {
        Ok(address) => DoctorCheck {
            name: "listen_address",
            status: CheckStatus::Pass,
            details: format!("server will listen on {address}"),
        },
        Err(error) => DoctorCheck {
            name: "listen_address",
            status: CheckStatus::Fail,
            details: format!("{error:#}"),
        },
    }
}

fn resolve_listen_address(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    let address = config.server.listen_address();
    address
        .to_socket_addrs()
        .with_context(|| format!("`{address}` is not a resolvable socket address"))?
        .next()
        .ok_or_else(|| anyhow!("`{address}` resolved to no socket addresses"))
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
