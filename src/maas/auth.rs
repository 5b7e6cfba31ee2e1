//! MAAS Authentication
//!
//! MAAS signs API requests with OAuth 1.0 using the PLAINTEXT method. An API
//! key is the colon-separated triple `consumer_key:token_key:token_secret`
//! issued by `maas apikey` or the web UI.

use crate::error::{MaasError, Result};
use std::fmt;

/// OAuth version sent with every request
const OAUTH_VERSION: &str = "1.0";

/// MAAS only supports PLAINTEXT signatures
const SIGNATURE_METHOD: &str = "PLAINTEXT";

/// MAAS API credentials
#[derive(Clone, PartialEq, Eq)]
pub struct MaasCredentials {
    consumer_key: String,
    token_key: String,
    token_secret: String,
}

impl MaasCredentials {
    /// Parse an API key of the form `consumer_key:token_key:token_secret`
    pub fn from_api_key(api_key: &str) -> Result<Self> {
        let parts: Vec<&str> = api_key.trim().split(':').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(MaasError::InvalidApiKey);
        }

        Ok(Self {
            consumer_key: parts[0].to_string(),
            token_key: parts[1].to_string(),
            token_secret: parts[2].to_string(),
        })
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Build the `Authorization` header value for one request.
    ///
    /// Each call gets a fresh nonce and timestamp.
    pub fn authorization_header(&self) -> String {
        let nonce = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().timestamp();
        self.authorization_header_with(&nonce, timestamp)
    }

    fn authorization_header_with(&self, nonce: &str, timestamp: i64) -> String {
        // PLAINTEXT signature is "<consumer_secret>&<token_secret>"; MAAS
        // consumer secrets are always empty.
        let signature = format!("&{}", self.token_secret);

        format!(
            "OAuth oauth_version=\"{}\", oauth_signature_method=\"{}\", \
             oauth_consumer_key=\"{}\", oauth_token=\"{}\", oauth_signature=\"{}\", \
             oauth_nonce=\"{}\", oauth_timestamp=\"{}\"",
            OAUTH_VERSION,
            SIGNATURE_METHOD,
            urlencoding::encode(&self.consumer_key),
            urlencoding::encode(&self.token_key),
            urlencoding::encode(&signature),
            nonce,
            timestamp
        )
    }
}

// Keep the token secret out of logs and panics
impl fmt::Debug for MaasCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaasCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("token_key", &self.token_key)
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

/// Read the API URL from the environment
pub fn get_default_url() -> Option<String> {
    std::env::var("MAAS_API_URL")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read the API key from the environment
/// Security: Rejects malformed keys instead of sending them
pub fn get_default_api_key() -> Option<String> {
    let key = std::env::var("MAAS_API_KEY").ok()?;
    if MaasCredentials::from_api_key(&key).is_ok() {
        return Some(key.trim().to_string());
    }
    tracing::warn!("Invalid API key format in MAAS_API_KEY");
    None
}

/// Read the API version from the environment
pub fn get_default_api_version() -> Option<String> {
    std::env::var("MAAS_API_VERSION")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
