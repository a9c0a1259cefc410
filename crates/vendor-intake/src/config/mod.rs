use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    /// Unrecognised values fall back to development.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn flag(key: &str) -> bool {
    var(key).is_some_and(|raw| matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Service configuration assembled from `.env` and the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = var("APP_ENV")
            .map(|raw| AppEnvironment::parse(&raw))
            .unwrap_or_default();

        let port = match var("APP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            None => DEFAULT_PORT,
        };
        let server = ServerConfig {
            host: var("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        };

        let telemetry = TelemetryConfig {
            log_level: var("APP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        };

        let store = StoreConfig {
            backend: var("APP_STORE_URL")
                .map(|url| StoreBackend::from_url(&url))
                .transpose()?,
            seed_on_start: flag("APP_SEED"),
        };

        Ok(Self {
            environment,
            server,
            telemetry,
            store,
        })
    }
}

/// HTTP listener binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Document store selection. A missing backend disables persistence-backed routes
/// while the rest of the service keeps running.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub backend: Option<StoreBackend>,
    pub seed_on_start: bool,
}

impl StoreConfig {
    pub fn persistence_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn require_backend(&self) -> Result<&StoreBackend, ConfigError> {
        self.backend.as_ref().ok_or(ConfigError::PersistenceDisabled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local store, `memory://`.
    Memory,
}

impl StoreBackend {
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let scheme = url.split_once("://").map_or(url, |(scheme, _)| scheme);
        match scheme.to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            _ => Err(ConfigError::UnsupportedStore {
                url: url.to_string(),
            }),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
    UnsupportedStore {
        url: String,
    },
    PersistenceDisabled,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT '{value}' is not a valid port number")
            }
            ConfigError::InvalidHost { host, .. } => {
                write!(f, "APP_HOST '{host}' is neither localhost nor an IP address")
            }
            ConfigError::UnsupportedStore { url } => {
                write!(f, "APP_STORE_URL '{url}' uses an unsupported scheme")
            }
            ConfigError::PersistenceDisabled => {
                write!(f, "APP_STORE_URL must be set for this command")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    const KEYS: [&str; 6] = [
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "APP_STORE_URL",
        "APP_SEED",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn with_env<T>(vars: &[(&str, &str)], check: impl FnOnce() -> T) -> T {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        for key in KEYS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = check();
        for key in KEYS {
            env::remove_var(key);
        }
        result
    }

    #[test]
    fn defaults_leave_persistence_disabled() {
        let config = with_env(&[], || AppConfig::load().expect("defaults load"));
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.telemetry.log_level, DEFAULT_LOG_LEVEL);
        assert!(!config.store.persistence_enabled());
        assert!(matches!(
            config.store.require_backend(),
            Err(ConfigError::PersistenceDisabled)
        ));
        assert!(!config.store.seed_on_start);
    }

    #[test]
    fn localhost_binds_loopback() {
        let config = with_env(&[("APP_HOST", "localhost"), ("APP_PORT", "8088")], || {
            AppConfig::load().expect("config loads")
        });
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8088));
    }

    #[test]
    fn invalid_port_is_reported_with_its_value() {
        let result = with_env(&[("APP_PORT", "eighty")], AppConfig::load);
        match result {
            Err(ConfigError::InvalidPort { value }) => assert_eq!(value, "eighty"),
            other => panic!("expected invalid port, got {other:?}"),
        }
    }

    #[test]
    fn memory_store_url_enables_persistence() {
        let config = with_env(
            &[("APP_STORE_URL", "memory://local"), ("APP_SEED", "true"), ("APP_ENV", "ci")],
            || AppConfig::load().expect("config loads"),
        );
        assert_eq!(config.store.backend, Some(StoreBackend::Memory));
        assert!(config.store.seed_on_start);
        assert_eq!(config.environment, AppEnvironment::Test);
    }

    #[test]
    fn rejects_unknown_store_scheme() {
        let result = with_env(&[("APP_STORE_URL", "postgres://db/vendors")], AppConfig::load);
        match result {
            Err(ConfigError::UnsupportedStore { url }) => assert_eq!(url, "postgres://db/vendors"),
            other => panic!("expected unsupported store, got {other:?}"),
        }
    }
}
