use std::env;
use std::fs;
use std::path::Path;

use storefront_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

struct ConfigField {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in effective_fields(&config) {
        let source = field_source(&field, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(format!("- {} = {} (source: {source})", field.key_path, field.value));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn effective_fields(config: &AppConfig) -> Vec<ConfigField> {
    let function_key = if config.api.function_key.is_some() { "<redacted>" } else { "<unset>" };

    vec![
        ConfigField {
            key_path: "api.base_url",
            env_keys: &["STOREFRONT_API_BASE_URL"],
            value: config.api.base_url.clone(),
        },
        ConfigField {
            key_path: "api.timeout_secs",
            env_keys: &["STOREFRONT_API_TIMEOUT_SECS"],
            value: config.api.timeout_secs.to_string(),
        },
        ConfigField {
            key_path: "api.function_key",
            env_keys: &["STOREFRONT_API_FUNCTION_KEY"],
            value: function_key.to_string(),
        },
        ConfigField {
            key_path: "server.bind_address",
            env_keys: &["STOREFRONT_SERVER_BIND_ADDRESS"],
            value: config.server.bind_address.clone(),
        },
        ConfigField {
            key_path: "server.port",
            env_keys: &["STOREFRONT_SERVER_PORT"],
            value: config.server.port.to_string(),
        },
        ConfigField {
            key_path: "server.max_upload_bytes",
            env_keys: &["STOREFRONT_SERVER_MAX_UPLOAD_BYTES"],
            value: config.server.max_upload_bytes.to_string(),
        },
        ConfigField {
            key_path: "logging.level",
            env_keys: &["STOREFRONT_LOGGING_LEVEL", "STOREFRONT_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        ConfigField {
            key_path: "logging.format",
            env_keys: &["STOREFRONT_LOGGING_FORMAT", "STOREFRONT_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &ConfigField,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = field.env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
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

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::contains_path;

    #[test]
    fn nested_key_paths_are_found_in_config_documents() {
        let doc: Value = "[api]\nbase_url = \"http://x/api/\"\n".parse().expect("toml");

        assert!(contains_path(&doc, "api.base_url"));
        assert!(!contains_path(&doc, "api.function_key"));
        assert!(!contains_path(&doc, "server.port"));
    }
}
