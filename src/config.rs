//! Runtime settings, read from the environment (and `.env`) then overridden from the CLI
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use reqwest::Url;

use crate::cli::Cli;

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/";
const DEFAULT_ROUTING_URL: &str = "https://router.project-osrm.org/";
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEZONE: &str = "America/Lima";
const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Clone, Debug)]
pub struct Config {
    /// LizardTrip backend, always ends with '/'
    pub backend_url: Url,
    /// OSRM instance, always ends with '/'
    pub routing_url: Url,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    /// Used when showing when the panels were last updated
    pub timezone: Tz,
    pub log_dir: PathBuf,
    /// Spans are only exported when this is set
    pub otlp_endpoint: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{var} is not a valid url: {value}")]
    InvalidUrl { var: &'static str, value: String },

    #[error("{var} is not a valid number: {value}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be greater than 0")]
    Zero { var: &'static str },

    #[error("unknown timezone {0}")]
    InvalidTimezone(String),
}

impl Config {
    /// Reads the config from the process environment. Call `dotenvy::dotenv` beforehand.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| dotenvy::var(var).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let backend_url = parse_base_url(
            "BACKEND_URL",
            &lookup("BACKEND_URL").unwrap_or(DEFAULT_BACKEND_URL.to_string()),
        )?;
        let routing_url = parse_base_url(
            "ROUTING_URL",
            &lookup("ROUTING_URL").unwrap_or(DEFAULT_ROUTING_URL.to_string()),
        )?;

        let refresh_interval = parse_secs(
            "REFRESH_INTERVAL_SECS",
            lookup("REFRESH_INTERVAL_SECS"),
            DEFAULT_REFRESH_INTERVAL_SECS,
        )?;
        let request_timeout = parse_secs(
            "REQUEST_TIMEOUT_SECS",
            lookup("REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        let timezone = lookup("TIMEZONE").unwrap_or(DEFAULT_TIMEZONE.to_string());
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(timezone))?;

        Ok(Config {
            backend_url,
            routing_url,
            refresh_interval,
            request_timeout,
            timezone,
            log_dir: lookup("LOG_DIR")
                .unwrap_or(DEFAULT_LOG_DIR.to_string())
                .into(),
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|e| !e.trim().is_empty()),
        })
    }

    /// Command line flags win over the environment
    pub fn apply_overrides(&mut self, cli: &Cli) -> Result<(), ConfigError> {
        if let Some(url) = &cli.backend_url {
            self.backend_url = parse_base_url("--backend-url", url)?;
        }
        if let Some(url) = &cli.routing_url {
            self.routing_url = parse_base_url("--routing-url", url)?;
        }

        Ok(())
    }
}

// `Url::join` drops the last path segment unless the base ends with '/'
fn parse_base_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value.trim()).map_err(|_| ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            var,
            value: value.to_string(),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn parse_secs(
    var: &'static str,
    value: Option<String>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let secs = match value {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value })?,
        None => default,
    };

    if secs == 0 {
        return Err(ConfigError::Zero { var });
    }

    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() -> Result<(), anyhow::Error> {
        let config = config_from(&[])?;

        assert_eq!(config.backend_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.routing_url.as_str(), "https://router.project-osrm.org/");
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.timezone, chrono_tz::America::Lima);
        assert!(config.otlp_endpoint.is_none());

        Ok(())
    }

    #[test]
    fn test_base_url_gets_trailing_slash() -> Result<(), anyhow::Error> {
        let config = config_from(&[("BACKEND_URL", "https://lizardtrip.example/puno")])?;

        assert_eq!(config.backend_url.as_str(), "https://lizardtrip.example/puno/");
        assert_eq!(
            config.backend_url.join("api/paraderos/")?.as_str(),
            "https://lizardtrip.example/puno/api/paraderos/"
        );

        Ok(())
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("BACKEND_URL", "lizardtrip")]),
            Err(ConfigError::InvalidUrl { var: "BACKEND_URL", .. })
        ));
        assert!(matches!(
            config_from(&[("REFRESH_INTERVAL_SECS", "0")]),
            Err(ConfigError::Zero { .. })
        ));
        assert!(matches!(
            config_from(&[("REQUEST_TIMEOUT_SECS", "ten")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            config_from(&[("TIMEZONE", "Mars/Olympus")]),
            Err(ConfigError::InvalidTimezone(_))
        ));
    }
}
