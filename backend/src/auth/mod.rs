mod extractors;
mod session;

pub use extractors::{CallerRejection, MobileCaller, SessionCaller};
pub use session::SessionResolver;

use anyhow::{Context, Result};
use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use crates::domain::{
    errors::AuthError,
    value_objects::identity::{DEFAULT_CALLER_TYPE, MobileIdentity},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::debug;

const BEARER_PREFIX: &str = "Bearer ";

/// Payload signed into mobile bearer tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct MobileClaims {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Linked web account.
    #[serde(rename = "userId", default, deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
    #[serde(rename = "type", default)]
    pub caller_type: Option<String>,
    pub exp: usize,
}

/// Verifies RS256 bearer tokens against one public key fixed at construction.
pub struct CredentialVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl CredentialVerifier {
    pub fn new(decoding_key: DecodingKey) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            decoding_key,
            validation,
        }
    }

    pub fn from_rsa_pem(pem: &[u8]) -> Result<Self> {
        let decoding_key =
            DecodingKey::from_rsa_pem(pem).context("public key is not a valid RSA PEM")?;
        Ok(Self::new(decoding_key))
    }

    pub fn from_pem_file(path: &Path) -> Result<Self> {
        let pem = std::fs::read(path)
            .with_context(|| format!("failed to read public key at {}", path.display()))?;
        Self::from_rsa_pem(&pem)
    }

    pub fn verify(&self, token: &str) -> Result<MobileIdentity, AuthError> {
        let token_data =
            decode::<MobileClaims>(token, &self.decoding_key, &self.validation).map_err(|err| {
                debug!(reason = %err, "auth: bearer token rejected");
                AuthError::InvalidOrExpired
            })?;

        let claims = token_data.claims;
        if claims.id.is_empty() {
            debug!("auth: bearer token has an empty id");
            return Err(AuthError::InvalidOrExpired);
        }

        Ok(MobileIdentity {
            id: claims.id,
            account_id: claims.user_id.filter(|id| !id.is_empty()),
            email: claims.email,
            caller_type: claims
                .caller_type
                .filter(|caller_type| !caller_type.is_empty())
                .unwrap_or_else(|| DEFAULT_CALLER_TYPE.to_string()),
        })
    }

    /// Expects `Authorization: Bearer <token>`.
    pub fn verify_authorization(
        &self,
        header: Option<&HeaderValue>,
    ) -> Result<MobileIdentity, AuthError> {
        let token = header
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::InvalidOrExpired)?;

        self.verify(token)
    }

    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<MobileIdentity, AuthError> {
        self.verify_authorization(headers.get(AUTHORIZATION))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(value) => value,
            StringOrNumber::Number(value) => value.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|value| value.map(String::from))
}
