//! Authentication types for the domain layer.
//!
//! An `AuthenticatedUser` is what remains of a verified identity-provider
//! token once the adapter is done with it. Password and federated (Google)
//! sign-ins both arrive here; only `sign_in_provider` tells them apart.

use super::UserId;
use thiserror::Error;

/// Authenticated user extracted from a validated ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Tenant id (the token's `sub`).
    pub id: UserId,

    /// Email address from the token claims; may be empty for phone sign-ins.
    pub email: String,

    /// Display name if the provider supplied one.
    pub display_name: Option<String>,

    /// Whether the provider has verified the email.
    pub email_verified: bool,

    /// `password`, `google.com`, ... as reported by the provider.
    pub sign_in_provider: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        email_verified: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            email_verified,
            sign_in_provider: None,
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.sign_in_provider = Some(provider.into());
        self
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    /// True when the identity came from a federated provider rather than
    /// email/password.
    pub fn is_federated(&self) -> bool {
        matches!(self.sign_in_provider.as_deref(), Some(p) if p != "password")
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
