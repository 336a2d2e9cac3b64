use std::time::Duration;

use async_trait::async_trait;

use super::errors::ApiError;
use crate::config::PudoConfig;

// ============================================================================
// Carrier Transport - HTTP Seam
// ============================================================================
//
// The transport is the only place that touches the network. Keeping it
// behind a trait lets the client, registrar and reconciler run against a
// counting stub in tests.
//
// ============================================================================

/// 30 second cap on every carrier call; nothing blocks longer.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait CarrierTransport: Send + Sync {
    /// POST a JSON body to `{base}/{endpoint}` and return the decoded
    /// JSON response. All failures are normalized into ApiError.
    async fn post(
        &self,
        endpoint: &'static str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError>;
}

pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &PudoConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);

        if !config.verify_tls {
            // Explicit opt-in for the carrier test environment.
            tracing::warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CarrierTransport for HttpTransport {
    async fn post(
        &self,
        endpoint: &'static str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                endpoint,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ApiError::HttpStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::Decode {
                endpoint,
                message: e.to_string(),
            })
    }
}
