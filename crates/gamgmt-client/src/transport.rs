//! Transport seam between the client and the HTTP API.
//!
//! `ManagementTransport` performs one GET and returns the decoded JSON body.
//! The reqwest-backed `HttpTransport` is used in production; tests plug in
//! fixture transports.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{validate_config, ClientConfig};
use crate::error::{ClientError, ClientResult};

/// Query parameters as `(name, value)` pairs.
pub type Query<'a> = &'a [(&'a str, String)];

pub trait ManagementTransport: Send + Sync {
    /// GET `path` (starting with `/`) with the given query parameters.
    fn get_json(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> impl Future<Output = ClientResult<Value>> + Send;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error for an invalid config or when the HTTP client cannot
    /// be built.
    pub fn new(cfg: &ClientConfig) -> ClientResult<Self> {
        validate_config(cfg)?;

        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| ClientError::Init(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            access_token: cfg.access_token.clone(),
        })
    }

    fn url(&self, path: &str, query: Query<'_>) -> ClientResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

impl ManagementTransport for HttpTransport {
    async fn get_json(&self, path: &str, query: Query<'_>) -> ClientResult<Value> {
        let url = self.url(path, query)?;
        debug!(%url, "GET");

        let mut request = self.client.get(url);
        if let Some(ref token) = self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| api_error(&v))
                .map(|(_, message)| message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(ClientError::Api {
                code: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Extract `(code, message)` from an API error payload.
///
/// Accepts both `{"error": {"code", "message"}}` and a bare
/// `{"error": ..., "message": ...}`.
pub fn api_error(body: &Value) -> Option<(u16, String)> {
    let error = body.get("error")?;
    let code = error
        .get("code")
        .or_else(|| body.get("code"))
        .and_then(Value::as_u64)
        .and_then(|c| u16::try_from(c).ok())
        .unwrap_or(0);
    let message = error
        .get("message")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .unwrap_or("unknown API error")
        .to_string();
    Some((code, message))
}

/// Turn an error payload into `ClientError::Api`.
pub(crate) fn check_api_error(body: &Value) -> ClientResult<()> {
    match api_error(body) {
        Some((code, message)) => Err(ClientError::Api { code, message }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_joins_base_path_and_query() {
        let cfg = ClientConfig {
            base_url: "https://example.com/".into(),
            ..ClientConfig::default()
        };
        let t = HttpTransport::new(&cfg).unwrap();
        let url = t
            .url(
                "/analytics/v3/metadata/ga/columns",
                &[("reportType", "ga".to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/analytics/v3/metadata/ga/columns?reportType=ga"
        );
    }

    #[test]
    fn nested_error_payload() {
        let body = json!({"error": {"code": 403, "message": "Insufficient Permission"}});
        assert_eq!(api_error(&body), Some((403, "Insufficient Permission".to_string())));
    }

    #[test]
    fn flat_error_payload() {
        let body = json!({"error": true, "code": 500, "message": "Backend Error"});
        assert_eq!(api_error(&body), Some((500, "Backend Error".to_string())));
    }

    #[test]
    fn success_payload_has_no_error() {
        assert!(check_api_error(&json!({"items": []})).is_ok());
    }
}
