use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use pricepoint_cli::commands::{config, doctor, seed};
use pricepoint_core::config::LoadOptions;
use serde_json::Value;

fn isolated() -> LoadOptions {
    LoadOptions {
        config_path: Some(PathBuf::from("/nonexistent/pricepoint.toml")),
        ..LoadOptions::default()
    }
}

#[test]
fn seed_reports_demo_counts_with_default_config() {
    with_env(&[], || {
        let result = seed::run_with(isolated());
        assert_eq!(result.exit_code, 0, "expected demo dataset to validate");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");

        assert_eq!(payload["message"], "embedded demo dataset is valid: 3 products, 7 mutable records");
        assert_eq!(payload["data"]["mode"], "full");
        assert_eq!(payload["data"]["counts"]["products"], 3);
        assert_eq!(payload["data"]["counts"]["quotes"], 1);
    });
}

#[test]
fn seed_respects_catalog_only_mode() {
    with_env(&[("PRICEPOINT_CATALOG_SEED_DEMO_DATA", "false")], || {
        let result = seed::run_with(isolated());
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["mode"], "catalog_only");
        assert_eq!(payload["data"]["counts"]["products"], 3);
        assert_eq!(payload["data"]["counts"]["users"], 0);
    });
}

#[test]
fn seed_returns_seed_load_failure_for_malformed_file() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let path = dir.path().join("seed.json");
    fs::write(&path, "{ broken").expect("write seed");
    let path = path.display().to_string();

    with_env(&[("PRICEPOINT_CATALOG_SEED_PATH", path.as_str())], || {
        let result = seed::run_with(isolated());
        assert_eq!(result.exit_code, 3, "expected seed load failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "seed_load");
    });
}

#[test]
fn seed_returns_config_failure_for_invalid_env() {
    with_env(&[("PRICEPOINT_SERVER_PORT", "not-a-port")], || {
        let result = seed::run_with(isolated());
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn doctor_passes_with_default_config() {
    with_env(&[], || {
        let result = doctor::run_with(isolated(), true);
        assert_eq!(result.exit_code, 0);

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "pass");
        let names: Vec<&str> = report["checks"]
            .as_array()
            .expect("checks array")
            .iter()
            .filter_map(|check| check["name"].as_str())
            .collect();
        assert_eq!(names, ["config_validation", "seed_dataset", "rule_products", "listen_address"]);
    });
}

#[test]
fn doctor_skips_dependent_checks_when_config_fails() {
    with_env(&[("PRICEPOINT_LOG_LEVEL", "chatty")], || {
        let result = doctor::run_with(isolated(), true);
        assert_eq!(result.exit_code, 1);

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][0]["status"], "fail");
        assert_eq!(report["checks"][1]["status"], "skipped");
        assert_eq!(report["checks"][2]["status"], "skipped");
        assert_eq!(report["checks"][3]["status"], "skipped");
    });
}

#[test]
fn doctor_human_output_marks_each_check() {
    with_env(&[], || {
        let result = doctor::run_with(isolated(), false);
        assert!(result.output.starts_with("doctor: all readiness checks passed"));
        assert!(result.output.contains("- [ok] seed_dataset: 3 products, 1 quotes, 3 users (full)"));
        assert!(result.output.contains("- [ok] rule_products: "));
    });
}

#[test]
fn config_attributes_env_values() {
    with_env(&[("PORT", "8080"), ("PRICEPOINT_LOG_FORMAT", "json")], || {
        let output = config::run();
        assert!(output.contains("- server.port = 8080 (source: env (PORT))"), "{output}");
        assert!(output.contains("- logging.format = json (source: env (PRICEPOINT_LOG_FORMAT))"));
    });
}

#[test]
fn config_ignores_blank_env_values_when_attributing() {
    with_env(&[("PRICEPOINT_SERVER_PORT", "  "), ("PORT", "8080")], || {
        let output = config::run();
        assert!(output.contains("- server.port = 8080 (source: env (PORT))"), "{output}");
    });

    with_env(&[("PORT", ""), ("PRICEPOINT_LOG_FORMAT", "")], || {
        let output = config::run();
        assert!(output.contains("- server.port = 5000 (source: default)"), "{output}");
        assert!(output.contains("- logging.format = compact (source: default)"), "{output}");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "PORT",
        "PRICEPOINT_SERVER_BIND_ADDRESS",
        "PRICEPOINT_SERVER_PORT",
        "PRICEPOINT_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "PRICEPOINT_CORS_ALLOWED_ORIGINS",
        "PRICEPOINT_CATALOG_SEED_DEMO_DATA",
        "PRICEPOINT_CATALOG_SEED_PATH",
        "PRICEPOINT_LOGGING_LEVEL",
        "PRICEPOINT_LOGGING_FORMAT",
        "PRICEPOINT_LOG_LEVEL",
        "PRICEPOINT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
