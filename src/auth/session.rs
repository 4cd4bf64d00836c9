// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance and verification.
//!
//! Session tokens are HMAC-signed JWTs carrying `sub` (normalized email),
//! `iat`, and `exp`. Nothing is stored server-side: a token is valid while
//! its signature checks out, it has not expired, and its subject still
//! resolves to a user in the credential store.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{AuthenticatedUser, SessionClaims};
use super::credentials::CredentialStore;
use super::error::AuthError;

/// Default session lifetime in minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 30;

/// A freshly issued session token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issuer and verifier for session tokens.
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl SessionTokens {
    /// `algorithm` must be one of the HMAC family (HS256/HS384/HS512);
    /// configuration loading enforces this and bounds `ttl_minutes`.
    pub fn new(secret: &[u8], algorithm: Algorithm, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            ttl: Duration::try_minutes(ttl_minutes).unwrap_or(Duration::MAX),
        }
    }

    /// Issue a token for `subject` valid for the configured TTL.
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, AuthError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = issued_at.checked_add_signed(self.ttl).ok_or_else(|| {
            AuthError::InternalError("Session expiry is out of range".to_string())
        })?;
        let claims = SessionClaims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(format!("Failed to sign session token: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature, algorithm, and expiry; return the claims.
    ///
    /// No leeway: the issuer and verifier share one clock.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims)
    }

    /// Full verification: decode, then re-resolve the subject against the
    /// credential store. A token for an unknown user is invalid.
    pub fn verify(
        &self,
        token: &str,
        credentials: &CredentialStore,
    ) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode(token)?;

        let user = credentials
            .get(&claims.sub)
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .ok_or(AuthError::UnknownSubject)?;

        Ok(AuthenticatedUser::from_user(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{BcryptHasher, Role};
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn tokens() -> SessionTokens {
        SessionTokens::new(b"test-session-secret", Algorithm::HS256, DEFAULT_TTL_MINUTES)
    }

    fn credentials_with(email: &str) -> CredentialStore {
        let creds =
            CredentialStore::new(Arc::new(MemoryStore::new()), Arc::new(BcryptHasher::new(4)));
        creds.register(email, "pw", Role::Client).unwrap();
        creds
    }

    #[test]
    fn fresh_token_is_valid() {
        let tokens = tokens();
        let issued = tokens.issue("client@example.com").unwrap();

        let claims = tokens.decode(&issued.token).unwrap();
        assert_eq!(claims.sub, "client@example.com");
        assert_eq!(claims.exp - claims.iat, DEFAULT_TTL_MINUTES * 60);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn token_expires_after_ttl() {
        let tokens = tokens();
        let issued = tokens
            .issue_at(
                "client@example.com",
                Utc::now() - Duration::minutes(DEFAULT_TTL_MINUTES + 1),
            )
            .unwrap();

        assert_eq!(tokens.decode(&issued.token).unwrap_err(), AuthError::TokenExpired);
    }

    #[test]
    fn token_still_valid_just_before_ttl() {
        let tokens = tokens();
        let issued = tokens
            .issue_at(
                "client@example.com",
                Utc::now() - Duration::minutes(DEFAULT_TTL_MINUTES - 1),
            )
            .unwrap();
        assert!(tokens.decode(&issued.token).is_ok());
    }

    #[test]
    fn out_of_range_ttl_fails_without_panicking() {
        let tokens = SessionTokens::new(b"test-session-secret", Algorithm::HS256, 1_000_000_000_000);
        assert!(matches!(
            tokens.issue("client@example.com").unwrap_err(),
            AuthError::InternalError(_)
        ));
    }

    #[test]
    fn tampering_any_byte_invalidates() {
        let tokens = tokens();
        let token = tokens.issue("client@example.com").unwrap().token;

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert!(tokens.decode(&tampered).is_err(), "byte {i} tampered");
        }
    }

    #[test]
    fn other_secret_is_rejected() {
        let issued = tokens().issue("client@example.com").unwrap();
        let other = SessionTokens::new(b"another-secret", Algorithm::HS256, DEFAULT_TTL_MINUTES);
        assert_eq!(
            other.decode(&issued.token).unwrap_err(),
            AuthError::InvalidSignature
        );
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let secret = b"test-session-secret";
        let hs512 = SessionTokens::new(secret, Algorithm::HS512, DEFAULT_TTL_MINUTES);
        let issued = hs512.issue("client@example.com").unwrap();
        assert!(tokens().decode(&issued.token).is_err());
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(
            tokens().decode("not.a.jwt").unwrap_err(),
            AuthError::MalformedToken
        );
        assert_eq!(tokens().decode("").unwrap_err(), AuthError::MalformedToken);
    }

    #[test]
    fn verify_resolves_subject() {
        let tokens = tokens();
        let creds = credentials_with("client@example.com");
        let issued = tokens.issue("client@example.com").unwrap();

        let user = tokens.verify(&issued.token, &creds).unwrap();
        assert_eq!(user.email, "client@example.com");
        assert_eq!(user.role, Role::Client);
        assert!(!user.is_verified);
    }

    #[test]
    fn verify_rejects_unknown_subject() {
        let tokens = tokens();
        let creds = credentials_with("client@example.com");
        let issued = tokens.issue("ghost@example.com").unwrap();

        assert_eq!(
            tokens.verify(&issued.token, &creds).unwrap_err(),
            AuthError::UnknownSubject
        );
    }
}
