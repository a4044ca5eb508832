//! HTTP implementation of the remote extractor.

use serde::Serialize;

use super::{parse, RemoteError, RemoteExtractor};
use crate::config::RemoteConfig;

/// Request body sent to the remote extraction endpoint.
#[derive(Serialize)]
struct RemoteRequest<'a> {
    texto: &'a str,
    filename: &'a str,
    debug: bool,
}

pub struct HttpRemoteExtractor {
    endpoint: String,
    api_key: Option<String>,
    debug: bool,
    timeout: std::time::Duration,
    client: reqwest::Client,
}

impl HttpRemoteExtractor {
    /// Build from configuration. `None` when no endpoint is configured;
    /// callers treat that the same as a disabled remote path.
    pub fn from_config(config: &RemoteConfig) -> Option<Self> {
        let endpoint = config.endpoint.clone()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .ok()?;
        Some(Self {
            endpoint,
            api_key: config.api_key.clone(),
            debug: config.debug_extraction,
            timeout: config.timeout,
            client,
        })
    }
}

impl RemoteExtractor for HttpRemoteExtractor {
    async fn extract(
        &self,
        text: &str,
        source_file: Option<&str>,
    ) -> Result<serde_json::Value, RemoteError> {
        let body = RemoteRequest {
            texto: text,
            filename: source_file.unwrap_or("documento.txt"),
            debug: self.debug,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Timeout(self.timeout)
            } else {
                RemoteError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;
        parse::scrape_json(&text).ok_or(RemoteError::Malformed)
    }
}
