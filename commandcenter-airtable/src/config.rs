//! Record store connection settings.

use commandcenter_core::ConfigError;

/// Default Airtable REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

pub const ENV_BASE_ID: &str = "AIRTABLE_BASE_ID";
pub const ENV_PAT: &str = "AIRTABLE_PAT";
pub const ENV_API_URL: &str = "AIRTABLE_API_URL";

/// Connection settings for one Airtable base.
#[derive(Clone, PartialEq, Eq)]
pub struct AirtableConfig {
    /// Base identifier (e.g. `appXXXXXXXXXXXXXX`).
    pub base_id: String,
    /// Personal access token sent as a bearer token.
    pub api_token: String,
    /// API root without trailing slash.
    pub api_url: String,
}

impl AirtableConfig {
    pub fn new(base_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            api_token: api_token.into(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Override the API root, e.g. to point at a test server.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load from environment variables.
    ///
    /// - `AIRTABLE_BASE_ID` (required)
    /// - `AIRTABLE_PAT` (required)
    /// - `AIRTABLE_API_URL` (default: `https://api.airtable.com/v0`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingRequired {
                    field: key.to_string(),
                })
        };

        let base_id = required(ENV_BASE_ID)?;
        let api_token = required(ENV_PAT)?;
        let api_url = lookup(ENV_API_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: ENV_API_URL.to_string(),
                value: api_url,
                reason: "must be an http(s) URL".to_string(),
            });
        }

        Ok(Self::new(base_id, api_token).with_api_url(api_url))
    }

    /// `<api_url>/<base_id>`
    pub fn base_url(&self) -> String {
        format!("{}/{}", self.api_url, self.base_id)
    }
}

impl std::fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("base_id", &self.base_id)
            .field("api_token", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
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

    #[test]
    fn test_from_lookup_defaults_api_url() {
        let config = AirtableConfig::from_lookup(lookup(&[
            (ENV_BASE_ID, "appBase"),
            (ENV_PAT, "patSecret"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.base_url(), "https://api.airtable.com/v0/appBase");
    }

    #[test]
    fn test_missing_token_fails() {
        let err = AirtableConfig::from_lookup(lookup(&[(ENV_BASE_ID, "appBase")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRequired {
                field: ENV_PAT.to_string()
            }
        );
    }

    #[test]
    fn test_blank_base_id_fails() {
        let err = AirtableConfig::from_lookup(lookup(&[(ENV_BASE_ID, "  "), (ENV_PAT, "pat")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_BASE_ID));
    }

    #[test]
    fn test_api_url_override_is_trimmed() {
        let config = AirtableConfig::from_lookup(lookup(&[
            (ENV_BASE_ID, "appBase"),
            (ENV_PAT, "pat"),
            (ENV_API_URL, "http://localhost:9000/v0/"),
        ]))
        .unwrap();
        assert_eq!(config.base_url(), "http://localhost:9000/v0/appBase");
    }

    #[test]
    fn test_api_url_must_be_http() {
        let err = AirtableConfig::from_lookup(lookup(&[
            (ENV_BASE_ID, "appBase"),
            (ENV_PAT, "pat"),
            (ENV_API_URL, "ftp://example"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = AirtableConfig::new("appBase", "patSuperSecret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("patSuperSecret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
