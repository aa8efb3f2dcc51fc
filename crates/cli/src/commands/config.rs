use std::env;
use std::fs;
use std::path::Path;

use pricepoint_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let source = FileSource::load(config_file_path.as_deref());
    render(&config, &source)
}

struct FileSource<'a> {
    path: Option<&'a Path>,
    doc: Option<Value>,
}

impl<'a> FileSource<'a> {
    fn load(path: Option<&'a Path>) -> Self {
        let doc = path
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|raw| raw.parse::<Value>().ok());
        Self { path, doc }
    }

    fn attribute(&self, key_path: &str, env_keys: &[&str]) -> String {
        // Blank values are ignored by the loader, so they never count as the source.
        let env_key =
            env_keys.iter().find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
        if let Some(env_key) = env_key {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .path
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn render(config: &AppConfig, source: &FileSource<'_>) -> String {
    let seed_path = config
        .catalog
        .seed_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<embedded demo dataset>".to_string());

    // The first env key that is set wins, as in the loader.
    let fields: [(&str, String, &[&str]); 9] = [
        ("server.bind_address", config.server.bind_address.clone(), &["PRICEPOINT_SERVER_BIND_ADDRESS"]),
        ("server.port", config.server.port.to_string(), &["PRICEPOINT_SERVER_PORT", "PORT"]),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["PRICEPOINT_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        ("cors.allowed_origins", config.cors.allowed_origins.join(","), &["PRICEPOINT_CORS_ALLOWED_ORIGINS"]),
        (
            "catalog.seed_demo_data",
            config.catalog.seed_demo_data.to_string(),
            &["PRICEPOINT_CATALOG_SEED_DEMO_DATA"],
        ),
        ("catalog.seed_path", seed_path, &["PRICEPOINT_CATALOG_SEED_PATH"]),
        (
            "logging.level",
            config.logging.level.clone(),
            &["PRICEPOINT_LOGGING_LEVEL", "PRICEPOINT_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            &["PRICEPOINT_LOGGING_FORMAT", "PRICEPOINT_LOG_FORMAT"],
        ),
        ("server.listen_address", config.server.listen_address(), &[]),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in fields {
        let origin = if env_keys.is_empty() {
            "derived".to_string()
        } else {
            source.attribute(key, env_keys)
        };
        lines.push(render_line(key, &value, origin));
    }
    lines.join("\n")
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pricepoint_core::config::AppConfig;

    use super::{contains_path, render, FileSource};

    #[test]
    fn nested_keys_are_found_in_the_file() {
        let doc: toml::Value = "[server]\nport = 8080\n".parse().expect("toml");

        assert!(contains_path(&doc, "server.port"));
        assert!(!contains_path(&doc, "server.bind_address"));
        assert!(!contains_path(&doc, "logging.level"));
    }

    #[test]
    fn file_keys_are_attributed_to_the_file() {
        let source = FileSource {
            path: Some(Path::new("pricepoint.toml")),
            doc: Some("[catalog]\nseed_demo_data = false\n".parse().expect("toml")),
        };

        assert_eq!(
            source.attribute("catalog.seed_demo_data", &["PRICEPOINT_TEST_UNSET_KEY"]),
            "file (pricepoint.toml)"
        );
        assert_eq!(source.attribute("catalog.seed_path", &["PRICEPOINT_TEST_UNSET_KEY"]), "default");
    }

    #[test]
    fn rendering_lists_every_field() {
        let source = FileSource { path: None, doc: None };
        let output = render(&AppConfig::default(), &source);

        assert!(output.contains("- server.port = 5000 (source: "));
        assert!(output.contains("- catalog.seed_path = <embedded demo dataset>"));
        assert!(output.contains("- logging.format = compact"));
        assert!(output.contains("- server.listen_address = 0.0.0.0:5000 (source: derived)"));
    }
}
