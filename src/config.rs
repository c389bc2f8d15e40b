//! Server configuration.
//!
//! Loaded from an optional TOML file, then overridden from the environment:
//!
//! | Variable            | Effect                                  |
//! |---------------------|-----------------------------------------|
//! | `SCHEDULER_CONFIG`  | path of the TOML file to load           |
//! | `SCHEDULER_PORT`    | listen port                             |
//! | `SCHEDULER_STORE`   | JSON file for saved schedules           |
//! | `SCHEDULER_SEED`    | fixed tie-break seed (reproducible runs)|
//!
//! ```
//! use shift_scheduling::config::AppConfig;
//!
//! let config = AppConfig::from_toml_str(r#"
//!     port = 8080
//!     random_seed = 7
//!
//!     [work_rules]
//!     daily_staff_base = 2.5
//!     daily_staff_max = 4
//!     work_hours = 8
//!     break_hours = 1
//! "#).unwrap();
//!
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.work_rules.daily_staff_base, 2.5);
//! assert_eq!(config.host, "0.0.0.0");
//! ```

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::WorkRules;
use crate::validation::validate_work_rules;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// JSON file backing the schedule store; in-memory when unset.
    pub store_path: Option<PathBuf>,
    /// Fixed seed for tie-breaking. Unset means OS entropy per request.
    pub random_seed: Option<u64>,
    /// Rules used until a client saves its own.
    pub work_rules: WorkRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
            store_path: None,
            random_seed: None,
            work_rules: WorkRules::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// File named by `SCHEDULER_CONFIG` (defaults if unset), then env overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable lookup.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = match lookup("SCHEDULER_CONFIG") {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup)
    }

    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(port) = lookup("SCHEDULER_PORT") {
            self.port = port.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("SCHEDULER_PORT '{}' is not a port", port))
            })?;
        }
        if let Some(path) = lookup("SCHEDULER_STORE").filter(|p| !p.trim().is_empty()) {
            self.store_path = Some(PathBuf::from(path));
        }
        if let Some(seed) = lookup("SCHEDULER_SEED") {
            let parsed = seed.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "SCHEDULER_SEED '{}' is not an unsigned integer",
                    seed
                ))
            })?;
            self.random_seed = Some(parsed);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            ConfigError::Invalid(format!("host '{}' is not an IP address", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let errors = validate_work_rules(&self.work_rules);
        if errors.is_empty() {
            return Ok(());
        }
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Err(ConfigError::Invalid(format!("work_rules: {}", messages.join("; "))))
    }
}
