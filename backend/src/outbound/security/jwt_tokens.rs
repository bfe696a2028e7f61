//! HS256 bearer tokens.
//!
//! Expiry is checked against the caller-supplied instant rather than the
//! system clock, which keeps verification deterministic under a mocked
//! clock.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{TokenService, TokenServiceError};
use crate::domain::{AccessToken, Principal, UserId, UserRole};

/// Token lifetime applied when none is configured.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::days(7);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    role: String,
    iat: i64,
    exp: i64,
}

/// `TokenService` signing HS256 JWTs with a shared secret.
pub struct JwtTokenService {
    secret: Zeroizing<Vec<u8>>,
    ttl: Duration,
}

impl JwtTokenService {
    /// Service signing with `secret`; tokens live for `ttl`.
    #[must_use]
    pub fn new(secret: Zeroizing<Vec<u8>>, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation
    }
}

impl TokenService for JwtTokenService {
    fn issue(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, TokenServiceError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: *principal.user_id.as_uuid(),
            role: principal.role.as_str().to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|error| TokenServiceError::signing(error.to_string()))?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(expires_at);
        Ok(AccessToken { token, expires_at })
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenServiceError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &Self::validation(),
        )
        .map_err(|error| match error.kind() {
            ErrorKind::ExpiredSignature => TokenServiceError::Expired,
            _ => TokenServiceError::Invalid,
        })?;
        let claims = data.claims;
        if claims.exp <= now.timestamp() {
            return Err(TokenServiceError::Expired);
        }
        let role = claims
            .role
            .parse::<UserRole>()
            .map_err(|_| TokenServiceError::Invalid)?;
        Ok(Principal {
            user_id: UserId::from_uuid(claims.sub),
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::{fixture, rstest};

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).single().expect("timestamp")
    }

    #[fixture]
    fn service() -> JwtTokenService {
        JwtTokenService::new(Zeroizing::new(b"test-secret".to_vec()), DEFAULT_TOKEN_TTL)
    }

    #[fixture]
    fn principal() -> Principal {
        Principal {
            user_id: UserId::random(),
            role: UserRole::FacilityOwner,
        }
    }

    #[rstest]
    fn issued_tokens_verify_to_the_same_principal(
        service: JwtTokenService,
        principal: Principal,
    ) {
        let now = at(1_760_000_000);
        let token = service.issue(&principal, now).expect("issue");
        assert_eq!(token.expires_at, now + DEFAULT_TOKEN_TTL);
        let verified = service.verify(&token.token, now).expect("verify");
        assert_eq!(verified, principal);
    }

    #[rstest]
    fn tokens_expire_at_the_ttl_boundary(service: JwtTokenService, principal: Principal) {
        let now = at(1_760_000_000);
        let token = service.issue(&principal, now).expect("issue");
        let later = now + DEFAULT_TOKEN_TTL;
        assert_eq!(
            service.verify(&token.token, later),
            Err(TokenServiceError::Expired)
        );
        assert!(
            service
                .verify(&token.token, later - Duration::seconds(1))
                .is_ok()
        );
    }

    #[rstest]
    fn foreign_signatures_are_invalid(service: JwtTokenService, principal: Principal) {
        let other = JwtTokenService::new(Zeroizing::new(b"other".to_vec()), DEFAULT_TOKEN_TTL);
        let now = at(1_760_000_000);
        let token = other.issue(&principal, now).expect("issue");
        assert_eq!(
            service.verify(&token.token, now),
            Err(TokenServiceError::Invalid)
        );
    }

    #[rstest]
    #[case::garbage("not-a-token")]
    #[case::empty("")]
    fn garbage_is_invalid(service: JwtTokenService, #[case] token: &str) {
        assert_eq!(
            service.verify(token, at(1_760_000_000)),
            Err(TokenServiceError::Invalid)
        );
    }
}
