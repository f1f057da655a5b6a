//! JWKS-backed ID token validation.
//!
//! Implements `SessionValidator` against a hosted identity provider (Firebase
//! Auth style tokens). Validation:
//!
//! 1. Fetch the provider's JWKS (cached for `jwks_cache_ttl`)
//! 2. Verify the signature with the key named by the token's `kid`
//! 3. Check issuer, audience and expiry
//! 4. Map the claims to an `AuthenticatedUser`
//!
//! Email/password and Google sign-ins produce the same token shape; the
//! `firebase.sign_in_provider` claim tells them apart.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header,
    jwk::{JwkSet, KeyAlgorithm},
    Algorithm, DecodingKey, Header, Validation,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Unknown `kid`s force a refetch at most this often. The header is read
/// before any signature check, so anyone can send one.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Claims carried by the provider's ID tokens.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    iss: String,
    #[serde(default)]
    aud: Audience,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    firebase: Option<ProviderClaims>,
}

#[derive(Debug, Deserialize)]
struct ProviderClaims {
    #[serde(default)]
    sign_in_provider: Option<String>,
}

/// `aud` may be a single string or an array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::None => false,
            Audience::Single(s) => s == expected,
            Audience::Multiple(v) => v.iter().any(|s| s == expected),
        }
    }
}

struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
    ttl: Duration,
}

impl JwksCache {
    fn new(jwks: JwkSet, ttl: Duration) -> Self {
        Self {
            jwks,
            fetched_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > self.ttl
    }

    fn is_refreshable(&self) -> bool {
        self.fetched_at.elapsed() >= MIN_REFRESH_INTERVAL
    }
}

/// Production `SessionValidator`.
///
/// Keys are fetched lazily on the first validation so startup never blocks
/// on the identity provider.
pub struct JwksSessionValidator {
    issuer: String,
    audience: String,
    jwks_url: String,
    cache_ttl: Duration,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl JwksSessionValidator {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::service_unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            jwks_url: config.jwks_endpoint(),
            cache_ttl: config.jwks_cache_ttl(),
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        tracing::debug!(url = %self.jwks_url, "fetching JWKS");

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to fetch JWKS");
                AuthError::service_unavailable(format!("Failed to fetch JWKS: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(%status, "JWKS endpoint returned an error");
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse JWKS");
            AuthError::service_unavailable(format!("Failed to parse JWKS: {}", e))
        })?;

        tracing::debug!(keys = jwks.keys.len(), "fetched JWKS");
        Ok(jwks)
    }

    /// Cached key set, refetched after the TTL.
    async fn jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| !c.is_expired()) {
                return Ok(cached.jwks.clone());
            }
        }
        self.refetch_jwks().await
    }

    /// Fresh key set for an unknown `kid`, or `None` when the cache was
    /// fetched less than `MIN_REFRESH_INTERVAL` ago.
    async fn rotated_jwks(&self) -> Result<Option<JwkSet>, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if cache.as_ref().is_some_and(|c| !c.is_refreshable()) {
                return Ok(None);
            }
        }
        self.refetch_jwks().await.map(Some)
    }

    async fn refetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let jwks = self.fetch_jwks().await?;
        *self.jwks_cache.write().await = Some(JwksCache::new(jwks.clone(), self.cache_ttl));
        Ok(jwks)
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "sub", "aud"]);
        validation
    }

    fn decode_claims(
        &self,
        token: &str,
        key: &DecodingKey,
        algorithm: Algorithm,
    ) -> Result<IdTokenClaims, AuthError> {
        use jsonwebtoken::errors::ErrorKind;

        decode::<IdTokenClaims>(token, key, &self.validation(algorithm))
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::warn!(error = %e, "token validation failed");
                    AuthError::InvalidToken
                }
            })
    }

    fn to_user(&self, claims: IdTokenClaims) -> Result<AuthenticatedUser, AuthError> {
        if claims.iss != self.issuer || !claims.aud.contains(&self.audience) {
            tracing::warn!(iss = %claims.iss, "issuer or audience mismatch");
            return Err(AuthError::InvalidToken);
        }

        let id = UserId::new(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let user = AuthenticatedUser::new(
            id,
            claims.email.unwrap_or_default(),
            claims.name.filter(|n| !n.trim().is_empty()),
            claims.email_verified.unwrap_or(false),
        );

        Ok(match claims.firebase.and_then(|f| f.sign_in_provider) {
            Some(provider) => user.with_provider(provider),
            None => user,
        })
    }
}

fn decoding_key(
    header: &Header,
    jwks: &JwkSet,
) -> Result<Option<(DecodingKey, Algorithm)>, AuthError> {
    let kid = header.kid.as_deref().ok_or_else(|| {
        tracing::warn!("token missing 'kid' header");
        AuthError::InvalidToken
    })?;

    let Some(jwk) = jwks.find(kid) else {
        return Ok(None);
    };

    let algorithm = match jwk.common.key_algorithm {
        Some(KeyAlgorithm::RS256) | None => Algorithm::RS256,
        Some(KeyAlgorithm::RS384) => Algorithm::RS384,
        Some(KeyAlgorithm::RS512) => Algorithm::RS512,
        Some(KeyAlgorithm::ES256) => Algorithm::ES256,
        Some(KeyAlgorithm::ES384) => Algorithm::ES384,
        Some(other) => {
            tracing::warn!(algorithm = ?other, "unsupported signing algorithm");
            return Err(AuthError::InvalidToken);
        }
    };

    let key = DecodingKey::from_jwk(jwk).map_err(|e| {
        tracing::warn!(error = %e, "unusable JWK");
        AuthError::InvalidToken
    })?;

    Ok(Some((key, algorithm)))
}

#[async_trait]
impl SessionValidator for JwksSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "malformed token header");
            AuthError::InvalidToken
        })?;

        // The provider rotates keys; an unknown kid triggers a throttled refetch.
        let found = match decoding_key(&header, &self.jwks().await?)? {
            Some(found) => Some(found),
            None => match self.rotated_jwks().await? {
                Some(jwks) => decoding_key(&header, &jwks)?,
                None => None,
            },
        };
        let (key, algorithm) = found.ok_or_else(|| {
            tracing::warn!(kid = ?header.kid, "no JWK matches token kid");
            AuthError::InvalidToken
        })?;

        let claims = self.decode_claims(token, &key, algorithm)?;
        self.to_user(claims)
    }
}

impl std::fmt::Debug for JwksSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksSessionValidator")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("jwks_url", &self.jwks_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> JwksSessionValidator {
        let config = AuthConfig {
            issuer: "https://securetoken.google.com/cobri".to_string(),
            audience: "cobri".to_string(),
            ..Default::default()
        };
        JwksSessionValidator::new(&config).unwrap()
    }

    /// Points at a closed local port so any fetch fails fast.
    fn offline_validator() -> JwksSessionValidator {
        let config = AuthConfig {
            issuer: "https://securetoken.google.com/cobri".to_string(),
            audience: "cobri".to_string(),
            jwks_url: Some("http://127.0.0.1:9/jwks.json".to_string()),
            ..Default::default()
        };
        JwksSessionValidator::new(&config).unwrap()
    }

    async fn seed_cache(validator: &JwksSessionValidator, age: Duration) {
        let mut cache = JwksCache::new(JwkSet { keys: vec![] }, Duration::from_secs(3600));
        cache.fetched_at = Instant::now().checked_sub(age).unwrap();
        *validator.jwks_cache.write().await = Some(cache);
    }

    /// Header `{"alg":"RS256","typ":"JWT","kid":"rotated"}` with an empty body.
    const UNKNOWN_KID_TOKEN: &str =
        "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCIsImtpZCI6InJvdGF0ZWQifQ.e30.c2ln";

    fn claims(value: serde_json::Value) -> IdTokenClaims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn audience_forms() {
        assert!(Audience::Single("cobri".into()).contains("cobri"));
        assert!(Audience::Multiple(vec!["a".into(), "cobri".into()]).contains("cobri"));
        assert!(!Audience::Multiple(vec!["a".into()]).contains("cobri"));
        assert!(!Audience::None.contains("cobri"));
    }

    #[test]
    fn jwks_cache_expires_after_ttl() {
        let fresh = JwksCache::new(JwkSet { keys: vec![] }, Duration::from_secs(3600));
        assert!(!fresh.is_expired());

        let short = JwksCache::new(JwkSet { keys: vec![] }, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        assert!(short.is_expired());
    }

    #[test]
    fn google_sign_in_claims_map_to_user() {
        let user = validator()
            .to_user(claims(json!({
                "sub": "uid-42",
                "iss": "https://securetoken.google.com/cobri",
                "aud": "cobri",
                "email": "ana@example.com",
                "email_verified": true,
                "name": "Ana Gómez",
                "firebase": { "sign_in_provider": "google.com" }
            })))
            .unwrap();

        assert_eq!(user.id.as_str(), "uid-42");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.display_name.as_deref(), Some("Ana Gómez"));
        assert!(user.is_federated());
    }

    #[test]
    fn password_sign_in_without_name() {
        let user = validator()
            .to_user(claims(json!({
                "sub": "uid-7",
                "iss": "https://securetoken.google.com/cobri",
                "aud": ["cobri"],
                "email": "bo@example.com",
                "firebase": { "sign_in_provider": "password" }
            })))
            .unwrap();

        assert_eq!(user.display_name, None);
        assert!(!user.email_verified);
        assert!(!user.is_federated());
    }

    #[test]
    fn foreign_audience_is_rejected() {
        let result = validator().to_user(claims(json!({
            "sub": "uid-7",
            "iss": "https://securetoken.google.com/cobri",
            "aud": "someone-else",
        })));
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn missing_kid_is_invalid() {
        let header = Header::default();
        let result = decoding_key(&header, &JwkSet { keys: vec![] });
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn unknown_kid_is_not_found() {
        let mut header = Header::default();
        header.kid = Some("rotated".to_string());
        let result = decoding_key(&header, &JwkSet { keys: vec![] }).unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn unknown_kid_does_not_refetch_a_fresh_cache() {
        let validator = offline_validator();
        seed_cache(&validator, Duration::ZERO).await;

        // A fetch would fail with ServiceUnavailable; throttled, the token is just invalid.
        for _ in 0..3 {
            let result = validator.validate(UNKNOWN_KID_TOKEN).await;
            assert!(matches!(result, Err(AuthError::InvalidToken)));
        }
        assert!(validator.rotated_jwks().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_kid_refetches_once_the_interval_has_passed() {
        let validator = offline_validator();
        seed_cache(&validator, MIN_REFRESH_INTERVAL + Duration::from_secs(1)).await;

        let result = validator.validate(UNKNOWN_KID_TOKEN).await;
        assert!(matches!(result, Err(AuthError::ServiceUnavailable(_))));
    }

    #[test]
    fn jwks_cache_refreshable_after_min_interval() {
        let fresh = JwksCache::new(JwkSet { keys: vec![] }, Duration::from_secs(3600));
        assert!(!fresh.is_refreshable());

        let mut old = JwksCache::new(JwkSet { keys: vec![] }, Duration::from_secs(3600));
        old.fetched_at = Instant::now().checked_sub(MIN_REFRESH_INTERVAL).unwrap();
        assert!(old.is_refreshable());
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_without_network() {
        let result = validator().validate("not-a-jwt").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JwksSessionValidator>();
    }
}
