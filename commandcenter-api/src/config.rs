//! API Configuration Module
//!
//! Server settings loaded from environment variables with development
//! defaults. Record store credentials live in [`AirtableConfig`] and the
//! digest schedule in [`crate::jobs::DigestConfig`].

use std::net::SocketAddr;

use commandcenter_airtable::AirtableConfig;
use commandcenter_core::ConfigError;

use crate::jobs::DigestConfig;
use crate::telemetry::LogFormat;

pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8888;

// ============================================================================
// API CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub airtable: AirtableConfig,
    pub digest: DigestConfig,
}

impl ApiConfig {
    /// Load all server configuration from the environment.
    ///
    /// Environment variables:
    /// - `COMMANDCENTER_API_BIND`: Bind host (default: 0.0.0.0)
    /// - `PORT` / `COMMANDCENTER_API_PORT`: Listen port (default: 8888)
    /// - `COMMANDCENTER_LOG_FORMAT`: "json" or "pretty" (default: pretty)
    /// - `AIRTABLE_BASE_ID`, `AIRTABLE_PAT`, `AIRTABLE_API_URL`: see [`AirtableConfig::from_env`]
    /// - `COMMANDCENTER_DIGEST_*`: see [`DigestConfig::from_env`]
    ///
    /// Fails when the record store credentials are missing or the port is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_host = lookup("COMMANDCENTER_API_BIND")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());

        let port = match lookup("PORT").or_else(|| lookup("COMMANDCENTER_API_PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                field: "PORT".to_string(),
                value: raw.clone(),
                reason: "must be a port number".to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = lookup("COMMANDCENTER_LOG_FORMAT")
            .map(|s| LogFormat::parse(&s))
            .unwrap_or_default();

        Ok(Self {
            bind_host,
            port,
            log_format,
            airtable: AirtableConfig::from_lookup(&lookup)?,
            digest: DigestConfig::from_lookup(&lookup),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "COMMANDCENTER_API_BIND".to_string(),
                value: addr.clone(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const CREDENTIALS: [(&str, &str); 2] =
        [("AIRTABLE_BASE_ID", "appBase"), ("AIRTABLE_PAT", "pat")];

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup(&CREDENTIALS)).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:8888");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.digest.enabled);
    }

    #[test]
    fn test_port_precedence() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("PORT", "9000"));
        pairs.push(("COMMANDCENTER_API_PORT", "9100"));
        let config = ApiConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("PORT", "eighty"));
        let err = ApiConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        let err = ApiConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRequired {
                field: "AIRTABLE_BASE_ID".to_string()
            }
        );
    }

    #[test]
    fn test_bad_bind_host() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("COMMANDCENTER_API_BIND", "not a host"));
        let config = ApiConfig::from_lookup(lookup(&pairs)).unwrap();
        assert!(config.bind_addr().is_err());
    }
}
