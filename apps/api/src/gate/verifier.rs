//! Credential verification behind the auth gate.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::GateInitError;

/// Caller identity attached to request extensions once a credential verifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token is invalid or expired: {0}")]
    Invalid(String),
}

/// Capability the gate delegates token validation to.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// HS256 verifier for tokens issued by the auth module with the shared secret.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn hs256(secret: &str) -> Result<Self, GateInitError> {
        if secret.trim().is_empty() {
            return Err(GateInitError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| VerifyError::Invalid(e.to_string()))?;

        Ok(Identity {
            user_id: data.claims.sub,
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    pub const SECRET: &str = "test-secret-key";

    /// Signs an HS256 token for `sub` expiring `ttl_secs` from now (negative for expired).
    pub fn sign(secret: &str, sub: &str, ttl_secs: i64) -> String {
        let exp = chrono::Utc::now().timestamp() + ttl_secs;
        let claims = json!({ "sub": sub, "email": format!("{sub}@example.com"), "exp": exp });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{sign, SECRET};
    use super::*;

    #[tokio::test]
    async fn test_valid_token_yields_identity() {
        let verifier = JwtVerifier::hs256(SECRET).unwrap();
        let identity = verifier.verify(&sign(SECRET, "42", 3600)).await.unwrap();
        assert_eq!(identity.user_id, "42");
        assert_eq!(identity.email.as_deref(), Some("42@example.com"));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let verifier = JwtVerifier::hs256(SECRET).unwrap();
        assert!(verifier.verify(&sign(SECRET, "42", -3600)).await.is_err());
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        let verifier = JwtVerifier::hs256(SECRET).unwrap();
        assert!(verifier.verify(&sign("other-secret", "42", 3600)).await.is_err());
    }

    #[tokio::test]
    async fn test_garbage_rejected() {
        let verifier = JwtVerifier::hs256(SECRET).unwrap();
        assert!(verifier.verify("not-a-jwt").await.is_err());
    }

    #[test]
    fn test_blank_secret_is_init_error() {
        assert!(matches!(
            JwtVerifier::hs256("  "),
            Err(GateInitError::MissingSecret)
        ));
    }
}
