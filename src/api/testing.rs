use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::errors::ApiError;
use super::transport::CarrierTransport;

// ============================================================================
// Counting Stub Transport (test support)
// ============================================================================
//
// Returns queued responses in order and records every request body, so
// tests can assert both call counts and wire payloads. Once the queue is
// exhausted, further calls fail with a transport error.
//
// ============================================================================

pub(crate) struct StubTransport {
    calls: AtomicU32,
    responses: Mutex<Vec<Result<serde_json::Value, ApiError>>>,
    pub last_body: Mutex<Option<serde_json::Value>>,
}

impl StubTransport {
    pub fn new(responses: Vec<Result<serde_json::Value, ApiError>>) -> Self {
        let mut responses = responses;
        responses.reverse();
        Self {
            calls: AtomicU32::new(0),
            responses: Mutex::new(responses),
            last_body: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CarrierTransport for StubTransport {
    async fn post(
        &self,
        endpoint: &'static str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_body.lock().unwrap() = Some(body.clone());

        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(ApiError::Transport {
                endpoint,
                message: "stub exhausted".to_string(),
            }))
    }
}
