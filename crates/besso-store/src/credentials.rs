//! Service-account credential decoding.
//!
//! The credential arrives as base64-encoded JSON in an environment
//! variable. Deployment tooling sometimes strips the `=` padding or adds a
//! trailing newline, so both are repaired before decoding.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use besso_core::error::BessoError;
use serde::Deserialize;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// The parts of a service-account key the token exchange needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .finish_non_exhaustive()
    }
}

/// Append `=` until the length is a multiple of four.
fn repair_padding(encoded: &str) -> String {
    let mut s = encoded.trim().to_string();
    let missing = s.len() % 4;
    if missing != 0 {
        s.push_str(&"=".repeat(4 - missing));
    }
    s
}

/// Decode a base64 service-account blob into a key.
pub fn decode_service_account(encoded: &str) -> Result<ServiceAccountKey, BessoError> {
    let padded = repair_padding(encoded);
    if padded.is_empty() {
        return Err(BessoError::Credential("credential is empty".into()));
    }

    let bytes = BASE64
        .decode(padded.as_bytes())
        .map_err(|e| BessoError::Credential(format!("invalid base64: {e}")))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| BessoError::Credential(format!("credential is not UTF-8: {e}")))?;

    let key: ServiceAccountKey = serde_json::from_str(json.trim())
        .map_err(|e| BessoError::Credential(format!("invalid service account JSON: {e}")))?;

    if key.key_type != "service_account" {
        return Err(BessoError::Credential(format!(
            "expected a service_account credential, got '{}'",
            key.key_type
        )));
    }
    Ok(key)
}
