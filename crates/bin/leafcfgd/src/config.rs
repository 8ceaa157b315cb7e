//! Daemon settings.
//!
//! Read from `leafcfg.toml` (or the file named by `LEAFCFG_CONFIG`), then
//! patched from `LEAFCFG_*` variables. A missing file means all defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use leafcfg_domain::leaf::{EV_REQUEST_PORTS, LeafDefaults};

const DEFAULT_PATH: &str = "leafcfg.toml";
const DEFAULT_FILTER: &str = "leafcfgd=info,leafcfg_app=info,tower_http=debug";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    /// Vehicle defaults shown by the `features` form.
    pub leaf: LeafDefaults,
    pub events: EventsConfig,
}

/// Listener address.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive.
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Commits buffered per subscriber before it lags.
    pub capacity: usize,
}

impl Config {
    /// Settings for this process: file first, then environment.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, or when the merged
    /// settings are inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        let lookup = |name: &str| std::env::var(name).ok();
        let path = lookup("LEAFCFG_CONFIG")
            .map_or_else(|| PathBuf::from(DEFAULT_PATH), PathBuf::from);

        let mut config = Self::read(&path)?;
        config.override_from(lookup);
        config.check()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `LEAFCFG_*` and `RUST_LOG` values returned by `lookup`.
    ///
    /// `LEAFCFG_BIND` (`host:port`) wins over `LEAFCFG_HOST`/`LEAFCFG_PORT`;
    /// `RUST_LOG` wins over `LEAFCFG_LOG`. Unparsable ports are ignored.
    fn override_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("LEAFCFG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("LEAFCFG_PORT").and_then(|port| port.parse().ok()) {
            self.server.port = port;
        }
        if let Some(bind) = lookup("LEAFCFG_BIND") {
            if let Some((host, port)) = bind.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(filter) = lookup("RUST_LOG").or_else(|| lookup("LEAFCFG_LOG")) {
            self.logging.filter = filter;
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.events.capacity == 0 {
            return Err(ConfigError::Invalid("events.capacity must be non-zero".into()));
        }
        if !EV_REQUEST_PORTS.contains(&self.leaf.ev_request_port.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "leaf.ev_request_port {:?} is not one of {EV_REQUEST_PORTS:?}",
                self.leaf.ev_request_port
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
