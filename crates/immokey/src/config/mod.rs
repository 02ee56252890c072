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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("IMMOKEY_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("IMMOKEY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("IMMOKEY_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("IMMOKEY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let default_currency =
            env::var("IMMOKEY_DEFAULT_CURRENCY").unwrap_or_else(|_| "XOF".to_string());
        if default_currency.len() != 3 || !default_currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::InvalidCurrency {
                value: default_currency,
            });
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig { default_currency },
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

/// Tracing and log-filter controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults applied when provisioning inventory without explicit values.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub default_currency: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCurrency { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "IMMOKEY_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "IMMOKEY_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCurrency { value } => {
                write!(
                    f,
                    "IMMOKEY_DEFAULT_CURRENCY must be a three-letter uppercase code, got '{}'",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidCurrency { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
