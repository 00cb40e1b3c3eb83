use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::auth::Credential;

/// Root of the original automation service; overridable per deployment.
pub const DEFAULT_BASE_URL: &str = "https://n8n.automate.ourdept.com";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub auth: AuthConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub credentials: Vec<Credential>,
}

#[derive(Clone, Debug)]
pub struct UiConfig {
    pub watermark_text: String,
    pub startup_delay_ms: u64,
    pub login_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub log_level: Option<String>,
    pub startup_delay_ms: Option<u64>,
    pub login_delay_ms: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: 30,
            },
            auth: AuthConfig {
                credentials: vec![
                    Credential::new("raksha@hrlabs.in", "password123"),
                    Credential::new("vijay@hrlabs.in", "password123"),
                ],
            },
            ui: UiConfig {
                watermark_text: "HRLabs".to_string(),
                startup_delay_ms: 1500,
                login_delay_ms: 500,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    service: Option<ServicePatch>,
    auth: Option<AuthPatch>,
    ui: Option<UiPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServicePatch {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthPatch {
    credentials: Option<Vec<Credential>>,
}

#[derive(Debug, Default, Deserialize)]
struct UiPatch {
    watermark_text: Option<String>,
    startup_delay_ms: Option<u64>,
    login_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    /// Defaults, then the config file (if any), then `QUOTEDESK_*`
    /// environment variables, then programmatic overrides; validated last.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("quotedesk.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(service) = patch.service {
            if let Some(base_url) = service.base_url {
                self.service.base_url = base_url;
            }
            if let Some(timeout_secs) = service.timeout_secs {
                self.service.timeout_secs = timeout_secs;
            }
        }

        if let Some(auth) = patch.auth {
            // Configured credentials replace the built-in pairs wholesale.
            if let Some(credentials) = auth.credentials {
                self.auth.credentials = credentials;
            }
        }

        if let Some(ui) = patch.ui {
            if let Some(watermark_text) = ui.watermark_text {
                self.ui.watermark_text = watermark_text;
            }
            if let Some(startup_delay_ms) = ui.startup_delay_ms {
                self.ui.startup_delay_ms = startup_delay_ms;
            }
            if let Some(login_delay_ms) = ui.login_delay_ms {
                self.ui.login_delay_ms = login_delay_ms;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("QUOTEDESK_SERVICE_BASE_URL") {
            self.service.base_url = value;
        }
        if let Some(value) = read_env("QUOTEDESK_SERVICE_TIMEOUT_SECS") {
            self.service.timeout_secs = parse_u64("QUOTEDESK_SERVICE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("QUOTEDESK_UI_WATERMARK_TEXT") {
            self.ui.watermark_text = value;
        }
        if let Some(value) = read_env("QUOTEDESK_UI_STARTUP_DELAY_MS") {
            self.ui.startup_delay_ms = parse_u64("QUOTEDESK_UI_STARTUP_DELAY_MS", &value)?;
        }
        if let Some(value) = read_env("QUOTEDESK_UI_LOGIN_DELAY_MS") {
            self.ui.login_delay_ms = parse_u64("QUOTEDESK_UI_LOGIN_DELAY_MS", &value)?;
        }

        if let Some(value) = read_env("QUOTEDESK_LOGGING_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("QUOTEDESK_LOGGING_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.service.base_url = base_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(startup_delay_ms) = overrides.startup_delay_ms {
            self.ui.startup_delay_ms = startup_delay_ms;
        }
        if let Some(login_delay_ms) = overrides.login_delay_ms {
            self.ui.login_delay_ms = login_delay_ms;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("service.base_url must not be empty".into()));
        }
        if !self.service.base_url.starts_with("http://")
            && !self.service.base_url.starts_with("https://")
        {
            return Err(ConfigError::Validation(format!(
                "service.base_url must be an http(s) URL, got `{}`",
                self.service.base_url
            )));
        }
        if self.service.timeout_secs == 0 {
            return Err(ConfigError::Validation("service.timeout_secs must be positive".into()));
        }
        if self.auth.credentials.is_empty() {
            return Err(ConfigError::Validation(
                "auth.credentials must contain at least one pair".into(),
            ));
        }
        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Validation(format!(
                "unsupported logging.level `{}`",
                self.logging.level
            )));
        }
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("quotedesk.toml"), PathBuf::from("config/quotedesk.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}
