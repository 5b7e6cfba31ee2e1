//! HTTP utilities for MAAS REST API calls
//!
//! MAAS takes form-encoded request bodies and answers with JSON. List
//! parameters are sent by repeating the key once per value.

use super::auth::MaasCredentials;
use crate::error::{MaasError, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Form parameters, in send order. Keys may repeat.
pub type FormParams = Vec<(String, String)>;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for MAAS API calls
#[derive(Clone)]
pub struct MaasHttpClient {
    client: Client,
}

impl MaasHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("maas-raid/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Make a GET request
    pub async fn get(&self, url: &str, credentials: &MaasCredentials) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let request = self.request(Method::GET, url, credentials);
        Self::send(request).await
    }

    /// Make a POST request with a form body
    pub async fn post(
        &self,
        url: &str,
        credentials: &MaasCredentials,
        params: &FormParams,
    ) -> Result<Value> {
        tracing::debug!("POST {} ({} params)", url, params.len());
        let request = self.request(Method::POST, url, credentials).form(params);
        Self::send(request).await
    }

    /// Make a PUT request with a form body
    pub async fn put(
        &self,
        url: &str,
        credentials: &MaasCredentials,
        params: &FormParams,
    ) -> Result<Value> {
        tracing::debug!("PUT {} ({} params)", url, params.len());
        let request = self.request(Method::PUT, url, credentials).form(params);
        Self::send(request).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str, credentials: &MaasCredentials) -> Result<Value> {
        tracing::debug!("DELETE {}", url);
        let request = self.request(Method::DELETE, url, credentials);
        Self::send(request).await
    }

    fn request(&self, method: Method, url: &str, credentials: &MaasCredentials) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, credentials.authorization_header())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            let sanitized = sanitize_for_log(&body);
            tracing::error!("API error: {} - {}", status, sanitized);
            return Err(MaasError::Api {
                status: status.as_u16(),
                body: sanitized,
            });
        }

        // DELETE answers 204 with no body
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Append `key=value` once per value
pub fn push_list(params: &mut FormParams, key: &str, values: &[String]) {
    params.extend(values.iter().map(|v| (key.to_string(), v.clone())));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.ends_with("[truncated, 500 bytes total]"));
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_for_log("bad\nrequest\t!"), "badrequest!");
    }

    #[test]
    fn test_sanitize_respects_char_boundaries() {
        let body = format!("{}é{}", "a".repeat(MAX_LOG_BODY_LENGTH - 1), "b".repeat(10));
        // Must not panic on the multi-byte boundary
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated"));
    }

    #[test]
    fn test_push_list_repeats_key() {
        let mut params = FormParams::new();
        push_list(&mut params, "partitions", &["1".into(), "2".into()]);
        assert_eq!(
            params,
            vec![
                ("partitions".to_string(), "1".to_string()),
                ("partitions".to_string(), "2".to_string())
            ]
        );
    }
}
