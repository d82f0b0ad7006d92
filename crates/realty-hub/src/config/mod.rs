use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the marketplace service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub marketplace: MarketplaceConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let recent_limit = match env::var("APP_DASHBOARD_RECENT_LIMIT") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => return Err(ConfigError::InvalidRecentLimit { value: raw }),
            },
            Err(_) => MarketplaceConfig::DEFAULT_RECENT_LIMIT,
        };

        let favorites_cleanup = match env::var("APP_FAVORITES_CLEANUP") {
            Ok(raw) => FavoritesCleanup::parse(&raw)
                .ok_or(ConfigError::InvalidFavoritesCleanup { value: raw })?,
            Err(_) => FavoritesCleanup::Lazy,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            marketplace: MarketplaceConfig {
                recent_limit,
                favorites_cleanup,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// How favorites pointing at a deleted property are cleaned up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesCleanup {
    /// Dangling entries stay in storage and are filtered out when read.
    Lazy,
    /// Entries are purged as part of the property deletion.
    Eager,
}

impl FavoritesCleanup {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lazy" => Some(Self::Lazy),
            "eager" => Some(Self::Eager),
            _ => None,
        }
    }
}

/// Engine-level knobs shared by the marketplace services.
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// Upper bound for the "recent" lists on the admin dashboard.
    pub recent_limit: usize,
    pub favorites_cleanup: FavoritesCleanup,
}

impl MarketplaceConfig {
    pub const DEFAULT_RECENT_LIMIT: usize = 5;
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            recent_limit: Self::DEFAULT_RECENT_LIMIT,
            favorites_cleanup: FavoritesCleanup::Lazy,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRecentLimit { value: String },
    InvalidFavoritesCleanup { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRecentLimit { value } => write!(
                f,
                "APP_DASHBOARD_RECENT_LIMIT must be a positive integer, got '{value}'"
            ),
            ConfigError::InvalidFavoritesCleanup { value } => write!(
                f,
                "APP_FAVORITES_CLEANUP must be 'lazy' or 'eager', got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidRecentLimit { .. }
            | ConfigError::InvalidFavoritesCleanup { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_DASHBOARD_RECENT_LIMIT");
        env::remove_var("APP_FAVORITES_CLEANUP");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.marketplace.recent_limit, 5);
        assert_eq!(
            config.marketplace.favorites_cleanup,
            FavoritesCleanup::Lazy
        );
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_marketplace_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DASHBOARD_RECENT_LIMIT", "12");
        env::set_var("APP_FAVORITES_CLEANUP", "Eager");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.marketplace.recent_limit, 12);
        assert_eq!(
            config.marketplace.favorites_cleanup,
            FavoritesCleanup::Eager
        );
        reset_env();
    }

    #[test]
    fn rejects_zero_recent_limit() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DASHBOARD_RECENT_LIMIT", "0");
        let err = AppConfig::load().expect_err("zero limit rejected");
        assert!(matches!(err, ConfigError::InvalidRecentLimit { .. }));
        reset_env();
    }

    #[test]
    fn rejects_unknown_cleanup_mode() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_FAVORITES_CLEANUP", "sometimes");
        let err = AppConfig::load().expect_err("unknown mode rejected");
        assert!(err.to_string().contains("sometimes"));
        reset_env();
    }
}
