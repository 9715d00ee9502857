use data_access::ApiConfig;
use secrecy::Secret;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub api: ApiSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Signs the session cookie. Must be at least 64 bytes.
    pub session_secret: Secret<String>,
    /// Mark the session cookie `Secure`. Enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
}

#[derive(Deserialize, Clone)]
pub struct ApiSettings {
    /// Base URL of the orders REST backend, e.g. `http://localhost:3000`.
    pub url: String,
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiSettings {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.url.clone()).with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

fn default_api_timeout_secs() -> u64 {
    10
}

#[derive(Deserialize, Clone)]
pub struct AuthSettings {
    /// Simulated latency of the mock sign-in and sign-up calls.
    #[serde(default = "default_mock_delay_ms")]
    pub mock_delay_ms: u64,
}

impl AuthSettings {
    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            mock_delay_ms: default_mock_delay_ms(),
        }
    }
}

fn default_mock_delay_ms() -> u64 {
    500
}

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector endpoint. Spans are only exported when set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| config::ConfigError::Foreign(e.into()))?;

    // Works from the workspace root and from the crate directory
    let configuration_directory = if base_path.ends_with("mini-crm") {
        base_path.join("config")
    } else {
        base_path.join("mini-crm").join("config")
    };

    load_from(&configuration_directory)
}

/// Read `base.yaml` from `directory`, then apply `APP_` environment overrides
/// such as `APP_API__URL`.
pub fn load_from(directory: &Path) -> Result<Settings, config::ConfigError> {
    let base_file: PathBuf = directory.join("base.yaml");

    let settings = config::Config::builder()
        .add_source(config::File::from(base_file).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
