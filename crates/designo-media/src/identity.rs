//! Session identity.
//!
//! Sign-in itself happens at the hosted identity provider; the site only
//! verifies the session token the provider issued and reads the user from it.
//! A token arrives either as `Authorization: Bearer <jwt>` or in the
//! provider's `__session` cookie.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AuthSettings, TokenAlgorithm};
use crate::error::{MediaError, MediaResult};

/// Name of the session cookie set by the identity provider.
pub const SESSION_COOKIE: &str = "__session";

/// Signed-in user as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<Claims> for User {
    fn from(claims: Claims) -> Self {
        User {
            id: claims.sub,
            first_name: claims.first_name,
            email: claims.email,
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// User behind a session token, or `None` when signed out or invalid.
    async fn current_user(&self, token: Option<&str>) -> Option<User>;
}

// =============================================================================
// JWT verification
// =============================================================================

pub struct JwtIdentity {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentity {
    pub fn new(settings: &AuthSettings) -> MediaResult<Self> {
        if !settings.is_enabled() {
            return Err(MediaError::MissingCredential("DESIGNO_AUTH_SECRET".into()));
        }

        let (key, algorithm) = match settings.algorithm {
            TokenAlgorithm::Hs256 => (
                DecodingKey::from_secret(settings.verification_key.as_bytes()),
                Algorithm::HS256,
            ),
            TokenAlgorithm::Rs256 => (
                DecodingKey::from_rsa_pem(settings.verification_key.as_bytes())?,
                Algorithm::RS256,
            ),
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self { key, validation })
    }

    /// Validate and decode a token.
    pub fn verify(&self, token: &str) -> MediaResult<Claims> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| MediaError::Unauthorized(format!("Invalid token: {}", e)))?;
        Ok(data.claims)
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentity {
    async fn current_user(&self, token: Option<&str>) -> Option<User> {
        let token = token?;
        match self.verify(token) {
            Ok(claims) => Some(claims.into()),
            Err(e) => {
                debug!("Rejected session token: {}", e);
                None
            }
        }
    }
}

/// Provider used when sign-in is not configured: nobody is ever signed in.
#[derive(Debug, Default)]
pub struct SignedOut;

#[async_trait]
impl IdentityProvider for SignedOut {
    async fn current_user(&self, _token: Option<&str>) -> Option<User> {
        None
    }
}

// =============================================================================
// Token extraction
// =============================================================================

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Extract the session token from a `Cookie` header.
pub fn session_from_cookie(cookie_header: &str) -> Option<&str> {
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn settings(issuer: Option<&str>) -> AuthSettings {
        AuthSettings {
            verification_key: "test-secret".into(),
            algorithm: TokenAlgorithm::Hs256,
            issuer: issuer.map(str::to_string),
        }
    }

    fn token(secret: &str, exp_offset_secs: i64, iss: Option<&str>) -> String {
        let claims = Claims {
            sub: "user_2abc".into(),
            exp: (Utc::now() + Duration::seconds(exp_offset_secs)).timestamp(),
            iss: iss.map(str::to_string),
            first_name: Some("Marija".into()),
            email: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_valid_token() {
        let identity = JwtIdentity::new(&settings(None)).unwrap();
        let user = identity
            .current_user(Some(&token("test-secret", 3600, None)))
            .await
            .unwrap();
        assert_eq!(user.id, "user_2abc");
        assert_eq!(user.first_name.as_deref(), Some("Marija"));
    }

    #[tokio::test]
    async fn test_invalid_tokens_are_signed_out() {
        let identity = JwtIdentity::new(&settings(Some("https://clerk.foto-designo.com"))).unwrap();

        assert!(identity.current_user(None).await.is_none());
        assert!(identity.current_user(Some("garbage")).await.is_none());
        // Wrong secret
        assert!(identity
            .current_user(Some(&token("other", 3600, Some("https://clerk.foto-designo.com"))))
            .await
            .is_none());
        // Expired
        assert!(identity
            .current_user(Some(&token("test-secret", -3600, Some("https://clerk.foto-designo.com"))))
            .await
            .is_none());
        // Wrong issuer
        assert!(identity
            .current_user(Some(&token("test-secret", 3600, Some("https://evil.example"))))
            .await
            .is_none());

        assert!(identity
            .current_user(Some(&token("test-secret", 3600, Some("https://clerk.foto-designo.com"))))
            .await
            .is_some());
    }

    #[test]
    fn test_disabled_and_bad_key() {
        assert!(JwtIdentity::new(&AuthSettings::default()).is_err());

        let err = JwtIdentity::new(&AuthSettings {
            verification_key: "not a pem".into(),
            algorithm: TokenAlgorithm::Rs256,
            issuer: None,
        })
        .err()
        .unwrap();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_signed_out_provider() {
        assert!(SignedOut.current_user(Some("anything")).await.is_none());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }

    #[test]
    fn test_session_from_cookie() {
        assert_eq!(
            session_from_cookie("theme=dark; __session=abc.def; lang=hr"),
            Some("abc.def")
        );
        assert_eq!(session_from_cookie("__session_other=x"), None);
        assert_eq!(session_from_cookie(""), None);
    }
}
