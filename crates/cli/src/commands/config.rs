//! Effective-config inspection with source attribution.
//!
//! Every value is printed alongside where it came from (env, file, or
//! default). Passwords are always redacted; only the credential emails are
//! shown.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use quotedesk_core::config::{AppConfig, LoadOptions};
use toml::Value;

use super::CommandResult;

pub fn run(config_path: Option<PathBuf>) -> CommandResult {
    let require_file = config_path.is_some();
    let load = AppConfig::load(LoadOptions {
        config_path: config_path.clone(),
        require_file,
        ..LoadOptions::default()
    });
    let config = match load {
        Ok(config) => config,
        Err(error) => return CommandResult::failure(format!("config validation failed: {error}"), 2),
    };

    let config_file_path = config_path.or_else(detect_config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let mut push = |key: &str, value: &str, env_key: Option<&str>| {
        lines.push(render_line(
            key,
            value,
            field_source(key, env_key, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    };

    push("service.base_url", &config.service.base_url, Some("QUOTEDESK_SERVICE_BASE_URL"));
    push(
        "service.timeout_secs",
        &config.service.timeout_secs.to_string(),
        Some("QUOTEDESK_SERVICE_TIMEOUT_SECS"),
    );

    let credentials = config
        .auth
        .credentials
        .iter()
        .map(|credential| format!("{}:<redacted>", credential.email))
        .collect::<Vec<_>>()
        .join(", ");
    push("auth.credentials", &credentials, None);

    push("ui.watermark_text", &config.ui.watermark_text, Some("QUOTEDESK_UI_WATERMARK_TEXT"));
    push(
        "ui.startup_delay_ms",
        &config.ui.startup_delay_ms.to_string(),
        Some("QUOTEDESK_UI_STARTUP_DELAY_MS"),
    );
    push(
        "ui.login_delay_ms",
        &config.ui.login_delay_ms.to_string(),
        Some("QUOTEDESK_UI_LOGIN_DELAY_MS"),
    );

    push("logging.level", &config.logging.level, Some("QUOTEDESK_LOGGING_LEVEL"));
    push(
        "logging.format",
        &format!("{:?}", config.logging.format),
        Some("QUOTEDESK_LOGGING_FORMAT"),
    );

    CommandResult::success(lines.join("\n"))
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("quotedesk.toml"), PathBuf::from("config/quotedesk.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
