//! OAuth2 access tokens for the service account (JWT-bearer grant).

use besso_core::error::BessoError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::credentials::ServiceAccountKey;

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Claims of the signed assertion sent to the token endpoint.
#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Mints and reuses access tokens for one service account.
pub struct TokenSource {
    client: reqwest::Client,
    key: ServiceAccountKey,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(client: reqwest::Client, key: ServiceAccountKey) -> Self {
        Self {
            client,
            key,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, exchanging a fresh assertion when needed.
    pub async fn access_token(&self) -> Result<String, BessoError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > now {
                return Ok(token.value.clone());
            }
        }

        let assertion = sign_assertion(&self.key, now)?;
        debug!("token: POST {}", self.key.token_uri);

        let resp = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| BessoError::Credential(format!("token request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(BessoError::Credential(format!(
                "token endpoint returned {status}: {text}"
            )));
        }

        let parsed: TokenResponse = resp
            .json()
            .await
            .map_err(|e| BessoError::Credential(format!("failed to parse token response: {e}")))?;

        let lifetime = parsed.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        let value = parsed.access_token;
        *cached = Some(CachedToken {
            value: value.clone(),
            expires_at: now + Duration::seconds(lifetime),
        });
        Ok(value)
    }
}

/// Build the RS256-signed assertion for the token exchange.
fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, BessoError> {
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: DATASTORE_SCOPE.to_string(),
        aud: key.token_uri.clone(),
        iat: now.timestamp(),
        exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    if !key.private_key_id.is_empty() {
        header.kid = Some(key.private_key_id.clone());
    }

    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| BessoError::Credential(format!("invalid private key: {e}")))?;

    encode(&header, &claims, &signing_key)
        .map_err(|e| BessoError::Credential(format!("JWT encoding error: {e}")))
}
