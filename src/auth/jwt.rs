use std::str::FromStr;

use anyhow::Context;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::config::JwtConfig;

/// Why a token was rejected. Both variants end up as 401 for the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// Signing and verification keys, loaded once at startup.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> anyhow::Result<Self> {
        let private_pem = std::fs::read(&cfg.private_key_path).with_context(|| {
            format!("read JWT private key {}", cfg.private_key_path.display())
        })?;
        let public_pem = std::fs::read(&cfg.public_key_path)
            .with_context(|| format!("read JWT public key {}", cfg.public_key_path.display()))?;
        Self::from_pem(&cfg.algorithm, &private_pem, &public_pem, cfg.ttl_minutes)
    }

    pub fn from_pem(
        algorithm: &str,
        private_pem: &[u8],
        public_pem: &[u8],
        ttl_minutes: i64,
    ) -> anyhow::Result<Self> {
        let algorithm = Algorithm::from_str(algorithm)
            .with_context(|| format!("unknown JWT algorithm {algorithm:?}"))?;
        let (encoding, decoding) = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => (
                EncodingKey::from_rsa_pem(private_pem).context("parse RSA private key")?,
                DecodingKey::from_rsa_pem(public_pem).context("parse RSA public key")?,
            ),
            Algorithm::ES256 | Algorithm::ES384 => (
                EncodingKey::from_ec_pem(private_pem).context("parse EC private key")?,
                DecodingKey::from_ec_pem(public_pem).context("parse EC public key")?,
            ),
            Algorithm::EdDSA => (
                EncodingKey::from_ed_pem(private_pem).context("parse Ed25519 private key")?,
                DecodingKey::from_ed_pem(public_pem).context("parse Ed25519 public key")?,
            ),
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                anyhow::bail!("JWT algorithm {algorithm:?} is symmetric; use a key pair algorithm")
            }
        };
        anyhow::ensure!(ttl_minutes > 0, "JWT_TTL_MINUTES must be positive");
        Ok(Self {
            encoding,
            decoding,
            algorithm,
            ttl: Duration::minutes(ttl_minutes),
        })
    }

    pub fn issue(&self, subject: &str) -> anyhow::Result<String> {
        self.issue_at(subject, OffsetDateTime::now_utc())
    }

    fn issue_at(&self, subject: &str, now: OffsetDateTime) -> anyhow::Result<String> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.unix_timestamp(),
            exp: (now + self.ttl).unix_timestamp(),
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .context("sign access token")?;
        debug!(sub = %subject, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        if data.claims.sub.trim().is_empty() {
            return Err(TokenError::Invalid);
        }
        debug!(sub = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}
