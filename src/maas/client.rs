//! MAAS Client
//!
//! Main client for interacting with the MAAS API, combining authentication
//! and HTTP functionality.

use super::auth::MaasCredentials;
use super::http::{FormParams, MaasHttpClient};
use crate::error::Result;
use serde_json::Value;
use url::Url;

/// API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "2.0";

/// Main MAAS client
#[derive(Clone)]
pub struct MaasClient {
    pub credentials: MaasCredentials,
    pub http: MaasHttpClient,
    base_url: Url,
    pub api_version: String,
}

impl MaasClient {
    /// Create a new MAAS client.
    ///
    /// `api_url` is the MAAS root, e.g. `http://maas.example.com:5240/MAAS`.
    pub fn new(api_url: &str, api_key: &str, api_version: &str) -> Result<Self> {
        let credentials = MaasCredentials::from_api_key(api_key)?;
        let http = MaasHttpClient::new()?;

        // Url::join drops the last segment unless the base ends with '/'
        let mut base = api_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        Ok(Self {
            credentials,
            http,
            base_url,
            api_version: api_version.to_string(),
        })
    }

    /// Make a GET request to the MAAS API
    pub async fn get(&self, url: &Url) -> Result<Value> {
        self.http.get(url.as_str(), &self.credentials).await
    }

    /// Make a POST request to the MAAS API
    pub async fn post(&self, url: &Url, params: &FormParams) -> Result<Value> {
        self.http.post(url.as_str(), &self.credentials, params).await
    }

    /// Make a PUT request to the MAAS API
    pub async fn put(&self, url: &Url, params: &FormParams) -> Result<Value> {
        self.http.put(url.as_str(), &self.credentials, params).await
    }

    /// Make a DELETE request to the MAAS API
    pub async fn delete(&self, url: &Url) -> Result<Value> {
        self.http.delete(url.as_str(), &self.credentials).await
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build a versioned API URL. `path` must end with '/', as MAAS expects.
    pub fn api_url(&self, path: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("api/{}/{}", self.api_version, path))?)
    }

    /// Machine collection URL
    pub fn machines_url(&self) -> Result<Url> {
        self.api_url("machines/")
    }

    /// RAID collection URL for one machine
    pub fn raids_url(&self, system_id: &str) -> Result<Url> {
        self.api_url(&format!("nodes/{}/raids/", urlencoding::encode(system_id)))
    }

    /// Single RAID URL
    pub fn raid_url(&self, system_id: &str, raid_id: i64) -> Result<Url> {
        self.api_url(&format!(
            "nodes/{}/raid/{}/",
            urlencoding::encode(system_id),
            raid_id
        ))
    }
}
