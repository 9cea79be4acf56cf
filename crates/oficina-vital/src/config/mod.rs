use crate::workshop::ValidationPolicy;
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

/// Top-level configuration for the workshop service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub validation: ValidationConfig,
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
        let format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw)?,
            Err(_) => LogFormat::Compact,
        };

        let defaults = ValidationConfig::default();
        let validation = ValidationConfig {
            mileage_advisory_gap: gap_from_env(
                "OFICINA_MILEAGE_ADVISORY_GAP",
                defaults.mileage_advisory_gap,
            )?,
            mileage_hard_gap: gap_from_env("OFICINA_MILEAGE_HARD_GAP", defaults.mileage_hard_gap)?,
            cost_alert_limit: threshold_from_env(
                "OFICINA_COST_ALERT_LIMIT",
                defaults.cost_alert_limit,
            )?,
            item_cost_alert_limit: threshold_from_env(
                "OFICINA_ITEM_COST_ALERT_LIMIT",
                defaults.item_cost_alert_limit,
            )?,
        };

        if validation.mileage_advisory_gap > validation.mileage_hard_gap {
            return Err(ConfigError::InconsistentMileageGaps {
                advisory: validation.mileage_advisory_gap,
                hard: validation.mileage_hard_gap,
            });
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            validation,
        })
    }
}

fn gap_from_env(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(default);
    };

    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidMileageGap { var, value: raw })
}

fn threshold_from_env(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(default);
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidThreshold { var, value: raw }),
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

/// Output layout for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(raw.to_string())),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Thresholds applied before a checklist is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationConfig {
    pub mileage_advisory_gap: u64,
    pub mileage_hard_gap: u64,
    pub cost_alert_limit: f64,
    pub item_cost_alert_limit: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let policy = ValidationPolicy::default();
        Self {
            mileage_advisory_gap: policy.mileage_advisory_gap,
            mileage_hard_gap: policy.mileage_hard_gap,
            cost_alert_limit: policy.cost_alert_limit,
            item_cost_alert_limit: policy.item_cost_alert_limit,
        }
    }
}

impl From<&ValidationConfig> for ValidationPolicy {
    fn from(config: &ValidationConfig) -> Self {
        ValidationPolicy {
            mileage_advisory_gap: config.mileage_advisory_gap,
            mileage_hard_gap: config.mileage_hard_gap,
            cost_alert_limit: config.cost_alert_limit,
            item_cost_alert_limit: config.item_cost_alert_limit,
            ..ValidationPolicy::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidThreshold { var: &'static str, value: String },
    InvalidMileageGap { var: &'static str, value: String },
    InconsistentMileageGaps { advisory: u64, hard: u64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json' (found '{value}')")
            }
            ConfigError::InvalidThreshold { var, value } => {
                write!(f, "{var} must be a non-negative number (found '{value}')")
            }
            ConfigError::InvalidMileageGap { var, value } => {
                write!(f, "{var} must be a whole number of km (found '{value}')")
            }
            ConfigError::InconsistentMileageGaps { advisory, hard } => write!(
                f,
                "OFICINA_MILEAGE_ADVISORY_GAP ({advisory}) must not exceed OFICINA_MILEAGE_HARD_GAP ({hard})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLogFormat(_)
            | ConfigError::InvalidThreshold { .. }
            | ConfigError::InvalidMileageGap { .. }
            | ConfigError::InconsistentMileageGaps { .. } => None,
        }
    }
}
