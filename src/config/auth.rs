//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Identity provider settings used to verify bearer tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Expected `iss` claim, e.g. `https://securetoken.google.com/cobri-prod`
    pub issuer: String,

    /// Expected `aud` claim (the provider project id)
    pub audience: String,

    /// JWKS endpoint. Defaults to `{issuer}/.well-known/jwks.json`.
    pub jwks_url: Option<String>,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,
}

impl AuthConfig {
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    /// Resolved JWKS endpoint.
    pub fn jwks_endpoint(&self) -> String {
        match &self.jwks_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!("{}/.well-known/jwks.json", self.issuer.trim_end_matches('/')),
        }
    }

    /// In production the issuer must be served over HTTPS.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.issuer.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER"));
        }
        if self.audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__AUDIENCE"));
        }
        if *environment == Environment::Production && !self.issuer.starts_with("https://") {
            return Err(ValidationError::IssuerMustBeHttps);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            audience: String::new(),
            jwks_url: None,
            jwks_cache_ttl_secs: default_jwks_cache_ttl(),
        }
    }
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AuthConfig {
        AuthConfig {
            issuer: "https://securetoken.google.com/cobri".to_string(),
            audience: "cobri".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn jwks_endpoint_defaults_to_well_known_path() {
        assert_eq!(
            valid().jwks_endpoint(),
            "https://securetoken.google.com/cobri/.well-known/jwks.json"
        );
    }

    #[test]
    fn explicit_jwks_url_wins() {
        let config = AuthConfig {
            jwks_url: Some("https://keys.example.com/jwks".to_string()),
            ..valid()
        };
        assert_eq!(config.jwks_endpoint(), "https://keys.example.com/jwks");
    }

    #[test]
    fn missing_fields_are_reported() {
        assert_eq!(
            AuthConfig::default().validate(&Environment::Development),
            Err(ValidationError::MissingRequired("AUTH__ISSUER"))
        );
        let no_audience = AuthConfig {
            audience: String::new(),
            ..valid()
        };
        assert_eq!(
            no_audience.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("AUTH__AUDIENCE"))
        );
    }

    #[test]
    fn production_requires_https_issuer() {
        let config = AuthConfig {
            issuer: "http://localhost:9099/cobri".to_string(),
            ..valid()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::IssuerMustBeHttps)
        );
    }

    #[test]
    fn cache_ttl_converts_to_duration() {
        let config = AuthConfig {
            jwks_cache_ttl_secs: 7200,
            ..valid()
        };
        assert_eq!(config.jwks_cache_ttl(), Duration::from_secs(7200));
    }
}
