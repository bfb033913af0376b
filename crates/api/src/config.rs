//! Environment-driven server configuration.

use core::str::FromStr;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

use crewdash_observability::LogFormat;

pub const ENV_VAR: &str = "CREWDASH_ENV";
pub const HOST_VAR: &str = "CREWDASH_HOST";
pub const PORT_VAR: &str = "PORT";

const DEFAULT_PORT: u16 = 8080;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl core::fmt::Display for Environment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CREWDASH_ENV must be 'development' or 'production', got '{0}'")]
    InvalidEnvironment(String),

    #[error("PORT must be a port number, got '{value}'")]
    InvalidPort {
        value: String,
        #[source]
        source: core::num::ParseIntError,
    },

    #[error("CREWDASH_HOST must be an IP address, got '{value}'")]
    InvalidHost {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: IpAddr,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = match lookup(ENV_VAR) {
            Some(v) => v.parse()?,
            None => defaults.environment,
        };

        let host = match lookup(HOST_VAR) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidHost { value, source })?,
            None => defaults.host,
        };

        let port = match lookup(PORT_VAR) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => defaults.port,
        };

        Ok(Self {
            environment,
            host,
            port,
        })
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            ..Self::default()
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn log_format(&self) -> LogFormat {
        if self.environment.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }

    /// Response headers applied to every response.
    pub fn security_headers(&self) -> &'static [(&'static str, &'static str)] {
        if self.environment.is_production() {
            PRODUCTION_HEADERS
        } else {
            DEVELOPMENT_HEADERS
        }
    }
}

const PRODUCTION_HEADERS: &[(&str, &str)] = &[
    (
        "content-security-policy",
        "default-src 'self'; script-src 'self'; style-src 'self'; img-src 'self' data:; \
         connect-src 'self'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'",
    ),
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
];

// Dev server hot reload needs eval and websocket connections.
const DEVELOPMENT_HEADERS: &[(&str, &str)] = &[
    (
        "content-security-policy",
        "default-src 'self'; script-src 'self' 'unsafe-inline' 'unsafe-eval'; \
         style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self' ws: wss:",
    ),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer-when-downgrade"),
];
