//! JWT implementation of the TokenService port.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Principal, Role, UserId};
use crate::ports::{TokenError, TokenService};

/// JWT claims for bearer tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject (user id)
    sub: String,
    /// User role
    role: String,
    /// Issued at (Unix timestamp)
    iat: i64,
    /// Expiration (Unix timestamp)
    exp: i64,
}

/// Token service backed by HS256 JWTs.
pub struct JwtTokenService {
    secret: SecretString,
    ttl_secs: u64,
}

impl JwtTokenService {
    pub fn new(secret: SecretString, ttl_secs: u64) -> Self {
        Self { secret, ttl_secs }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: principal.user_id.to_string(),
            role: principal.role.as_str().to_string(),
            iat: now,
            exp: now + self.ttl_secs as i64,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        let user_id: UserId = data.claims.sub.parse().map_err(|_| TokenError::Invalid)?;
        let role = Role::parse(&data.claims.role).ok_or(TokenError::Invalid)?;

        Ok(Principal::new(user_id, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> JwtTokenService {
        JwtTokenService::new(SecretString::new(secret.to_string()), 3600)
    }

    #[test]
    fn issued_token_roundtrips() {
        let service = service("unit-test-secret-key");
        let principal = Principal::new(UserId::new(), Role::Moderator);

        let token = service.issue(&principal).unwrap();
        let verified = service.verify(&token).unwrap();

        assert_eq!(verified, principal);
    }

    #[test]
    fn garbage_token_is_invalid() {
        let service = service("unit-test-secret-key");
        assert_eq!(service.verify("not.a.token"), Err(TokenError::Invalid));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = service("secret-one-aaaaaaa")
            .issue(&Principal::new(UserId::new(), Role::User))
            .unwrap();
        assert_eq!(
            service("secret-two-bbbbbbb").verify(&token),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let service = JwtTokenService::new(
            SecretString::new("unit-test-secret-key".to_string()),
            0,
        );
        let token = service.issue(&Principal::new(UserId::new(), Role::User)).unwrap();
        // Default validation applies a small leeway; step past it.
        let mut validation = Validation::default();
        validation.leeway = 0;
        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret("unit-test-secret-key".as_bytes()),
            &validation,
        );
        assert!(matches!(
            result.unwrap_err().kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }
}
