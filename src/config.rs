//! Application-level configuration: listening port, CORS allow-list and the reset secret.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "WEEKLY_POLL_CONFIG_PATH";
/// Port used when neither `PORT` nor `SERVER_PORT` is set.
pub const DEFAULT_PORT: u16 = 3001;
/// Shared secret gating the manual reset.
pub const DEFAULT_RESET_PASSWORD: &str = "thursday-reset";
/// How often the scheduled reset is checked against the wall clock.
const DEFAULT_RESET_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Browser origins allowed to call the HTTP and WebSocket endpoints.
const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "https://whatchardoing3.netlify.app",
    "https://whatchardoing3-backend.onrender.com",
];

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    allowed_origins: Vec<String>,
    reset_password: String,
    reset_check_interval: Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        origins = app_config.allowed_origins.len(),
                        "loaded configuration file"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Origins accepted by the CORS layer.
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// Exact string comparison against the configured reset secret.
    pub fn reset_password_matches(&self, candidate: &str) -> bool {
        candidate == self.reset_password
    }

    /// Period of the background scheduled-reset check.
    pub fn reset_check_interval(&self) -> Duration {
        self.reset_check_interval
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
            reset_password: DEFAULT_RESET_PASSWORD.into(),
            reset_check_interval: DEFAULT_RESET_CHECK_INTERVAL,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
///
/// Every key is optional; missing keys keep their built-in value.
struct RawConfig {
    #[serde(default)]
    allowed_origins: Option<Vec<String>>,
    #[serde(default)]
    reset_password: Option<String>,
    #[serde(default)]
    reset_check_interval_secs: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            allowed_origins: value.allowed_origins.unwrap_or(defaults.allowed_origins),
            reset_password: value.reset_password.unwrap_or(defaults.reset_password),
            reset_check_interval: value
                .reset_check_interval_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.reset_check_interval),
        }
    }
}

/// Resolve the listening port from `PORT`, then `SERVER_PORT`, then [`DEFAULT_PORT`].
pub fn port_from_env() -> u16 {
    env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
