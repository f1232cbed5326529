use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::config::JwtConfig;

pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Single failure kind for every rejected token. Malformed, badly signed and
/// expired tokens are indistinguishable to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid credential")]
pub struct InvalidCredential;

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::minutes(cfg.ttl_minutes),
        }
    }

    pub fn issue(&self, subject: &str) -> anyhow::Result<String> {
        self.issue_with_ttl(subject, self.ttl)
    }

    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> anyhow::Result<String> {
        self.issue_at(subject, ttl, OffsetDateTime::now_utc())
    }

    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Duration,
        now: OffsetDateTime,
    ) -> anyhow::Result<String> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + ttl).unix_timestamp(),
            iat: now.unix_timestamp(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)?;
        debug!(sub = %subject, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, InvalidCredential> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    /// Verifies signature and algorithm, then requires `now < exp`.
    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<Claims, InvalidCredential> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        // Expiry is checked below against `now`, not the wall clock.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            InvalidCredential
        })?;

        // Valid strictly before exp.
        if data.claims.exp <= now.unix_timestamp() {
            debug!(sub = %data.claims.sub, "jwt rejected: expired");
            return Err(InvalidCredential);
        }
        if data.claims.sub.is_empty() {
            debug!("jwt rejected: empty subject");
            return Err(InvalidCredential);
        }

        debug!(sub = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}
