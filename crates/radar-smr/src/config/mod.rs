use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::scouting::domain::CountryCode;
use crate::workflows::scouting::eligibility::EligibilityRules;

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
    pub eligibility: EligibilityRules,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let engine_log_level = env::var("APP_ENGINE_LOG_LEVEL").ok().or_else(|| {
            (environment == AppEnvironment::Test).then(|| "debug".to_string())
        });

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                engine_log_level,
            },
            eligibility: load_eligibility_rules()?,
        })
    }
}

fn load_eligibility_rules() -> Result<EligibilityRules, ConfigError> {
    let defaults = EligibilityRules::san_marino();

    let target_nation = match env::var("ELIGIBILITY_TARGET_NATION") {
        Ok(raw) => country_var("ELIGIBILITY_TARGET_NATION", &raw)?,
        Err(_) => defaults.target_nation,
    };

    let adjacent_nations = match env::var("ELIGIBILITY_ADJACENT_NATIONS") {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(|code| country_var("ELIGIBILITY_ADJACENT_NATIONS", code))
            .collect::<Result<Vec<_>, _>>()?,
        Err(_) => defaults.adjacent_nations,
    };

    let allow_dual_citizenship = match env::var("ELIGIBILITY_ALLOW_DUAL_CITIZENSHIP") {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => {
                return Err(ConfigError::InvalidFlag {
                    var: "ELIGIBILITY_ALLOW_DUAL_CITIZENSHIP",
                    value: raw,
                })
            }
        },
        Err(_) => defaults.allow_dual_citizenship,
    };

    let majority_age = match env::var("ELIGIBILITY_MAJORITY_AGE") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "ELIGIBILITY_MAJORITY_AGE",
                value: raw,
            })?,
        Err(_) => defaults.majority_age,
    };

    Ok(EligibilityRules {
        target_nation,
        federation_min_residence_years: years_var(
            "ELIGIBILITY_FEDERATION_MIN_RESIDENCE_YEARS",
            defaults.federation_min_residence_years,
        )?,
        majority_age,
        citizenship_min_residence_years: years_var(
            "ELIGIBILITY_CITIZENSHIP_MIN_RESIDENCE_YEARS",
            defaults.citizenship_min_residence_years,
        )?,
        adjacent_nations,
        allow_dual_citizenship,
        naturalization_horizon_years: years_var(
            "ELIGIBILITY_NATURALIZATION_HORIZON_YEARS",
            defaults.naturalization_horizon_years,
        )?,
    })
}

fn country_var(var: &'static str, raw: &str) -> Result<CountryCode, ConfigError> {
    CountryCode::parse(raw).ok_or_else(|| ConfigError::InvalidCountryCode {
        var,
        value: raw.to_string(),
    })
}

fn years_var(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(default);
    };

    match raw.trim().parse::<f64>() {
        Ok(years) if years.is_finite() && years >= 0.0 => Ok(years),
        _ => Err(ConfigError::InvalidNumber { var, value: raw }),
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
    /// Level for the eligibility engine's own spans and events; debug in test environments.
    pub engine_log_level: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { var: &'static str, value: String },
    InvalidFlag { var: &'static str, value: String },
    InvalidCountryCode { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{var} must be a non-negative number (found '{value}')")
            }
            ConfigError::InvalidFlag { var, value } => {
                write!(f, "{var} must be true or false (found '{value}')")
            }
            ConfigError::InvalidCountryCode { var, value } => {
                write!(f, "{var} must contain ISO country codes (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidCountryCode { .. } => None,
        }
    }
}
