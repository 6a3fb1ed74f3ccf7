use anyhow::{Context, Result};
use campaign_criteria::ServiceConfig;
use dotenvy::dotenv;
use std::env;
use std::fmt;

/// Ads API settings loaded from environment variables
#[derive(Clone)]
pub struct Config {
    pub endpoint: String,
    pub version: String,
    pub developer_token: String,
    pub client_customer_id: Option<String>,
    pub access_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            endpoint: lookup("ADS_API_ENDPOINT")
                .unwrap_or_else(|| ServiceConfig::DEFAULT_ENDPOINT.to_string()),
            version: lookup("ADS_API_VERSION")
                .unwrap_or_else(|| ServiceConfig::DEFAULT_VERSION.to_string()),
            developer_token: lookup("ADS_API_DEVELOPER_TOKEN")
                .context("ADS_API_DEVELOPER_TOKEN must be set")?,
            client_customer_id: lookup("ADS_API_CLIENT_CUSTOMER_ID"),
            // Missing token is reported as an authorization failure at call time
            access_token: lookup("ADS_API_ACCESS_TOKEN").filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn service_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig::new(&self.developer_token)
            .with_endpoint(&self.endpoint)
            .with_version(&self.version);
        if let Some(id) = &self.client_customer_id {
            config = config.with_client_customer_id(id);
        }
        if let Some(token) = &self.access_token {
            config = config.with_access_token(token);
        }
        config
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("version", &self.version)
            .field("client_customer_id", &self.client_customer_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("ADS_API_DEVELOPER_TOKEN", "dev")])).unwrap();

        assert_eq!(config.endpoint, ServiceConfig::DEFAULT_ENDPOINT);
        assert_eq!(config.version, "v201502");
        assert_eq!(config.client_customer_id, None);
        assert_eq!(config.access_token, None);
    }

    #[test]
    fn test_developer_token_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("ADS_API_DEVELOPER_TOKEN"));
    }

    #[test]
    fn test_blank_access_token_is_ignored() {
        let config = Config::from_lookup(lookup(&[
            ("ADS_API_DEVELOPER_TOKEN", "dev"),
            ("ADS_API_ACCESS_TOKEN", "  "),
        ]))
        .unwrap();
        assert_eq!(config.access_token, None);
    }

    #[test]
    fn test_service_config_uses_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("ADS_API_DEVELOPER_TOKEN", "dev"),
            ("ADS_API_ENDPOINT", "http://localhost:9000/api"),
            ("ADS_API_VERSION", "v201509"),
        ]))
        .unwrap();

        let service = config.service_config();
        assert_eq!(
            service.mutate_url(),
            "http://localhost:9000/api/v201509/CampaignCriterionService/mutate"
        );
    }
}
