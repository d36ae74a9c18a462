//! Uniform request layer with bounded retries
//!
//! [`RequestClient`] owns a base endpoint and one transport. Every logical
//! call retries up to a fixed attempt bound and collapses transport and
//! decode failures into a single coarse [`ApiResult`] error; the finer causes
//! are logged, not propagated.

use std::fmt;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::transport::{HttpMethod, RequestPayload, Transport};

/// Total attempts per logical call, including the first.
///
/// Purely attempt-count-bounded with no backoff: observed failures are
/// upstream transients, not load-related congestion.
const MAX_ATTEMPTS: u32 = 4;

/// Coarse error kinds surfaced to API-level callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    ServerConnectionError,
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorCode::ServerConnectionError => f.write_str("SERVER_CONNECTION_ERROR"),
        }
    }
}

/// Uniform outcome of one API call.
///
/// Constructed once per logical call and consumed immediately by the caller;
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult {
    Success { body: Value },
    Error { code: ApiErrorCode, message: String },
}

impl ApiResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success { .. })
    }
}

/// Request client over one transport and one base endpoint
pub struct RequestClient {
    base_url: String,
    transport: Box<dyn Transport>,
    verify_tls: bool,
}

impl RequestClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Box<dyn Transport>,
        verify_tls: bool,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            // Relative paths carry their own leading slash.
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            verify_tls,
        }
    }

    /// Forward an opaque token to the transport for later calls
    pub fn update_token(&mut self, token: &str) {
        self.transport.update_token(token);
    }

    pub fn get(&self, rel_path: &str, payload: &RequestPayload) -> ApiResult {
        self.call(HttpMethod::Get, rel_path, payload)
    }

    pub fn put(&self, rel_path: &str, payload: &RequestPayload) -> ApiResult {
        self.call(HttpMethod::Put, rel_path, payload)
    }

    pub fn post(&self, rel_path: &str, payload: &RequestPayload) -> ApiResult {
        self.call(HttpMethod::Post, rel_path, payload)
    }

    pub fn delete(&self, rel_path: &str, payload: &RequestPayload) -> ApiResult {
        self.call(HttpMethod::Delete, rel_path, payload)
    }

    /// Issue one call with a method picked at runtime
    pub fn call(&self, method: HttpMethod, rel_path: &str, payload: &RequestPayload) -> ApiResult {
        let (decoded, _raw) = self.attempt_loop(method, rel_path, payload);
        match decoded {
            Some(value) => {
                // "0" is the sentinel body when the payload carries no
                // explicit result field.
                let body = value
                    .get("result")
                    .cloned()
                    .unwrap_or_else(|| Value::String("0".to_string()));
                ApiResult::Success { body }
            }
            None => ApiResult::Error {
                code: ApiErrorCode::ServerConnectionError,
                message: "Failed to connect to server!".to_string(),
            },
        }
    }

    /// The unparsed body of the last attempt, even when no attempt decoded;
    /// `None` only when no attempt produced a body at all.
    pub fn get_raw_response(&self, rel_path: &str, payload: &RequestPayload) -> Option<String> {
        self.attempt_loop(HttpMethod::Get, rel_path, payload).1
    }

    fn attempt_loop(
        &self,
        method: HttpMethod,
        rel_path: &str,
        payload: &RequestPayload,
    ) -> (Option<Value>, Option<String>) {
        let url = format!("{}{}", self.base_url, rel_path);
        let mut last_raw: Option<String> = None;
        let mut retries = 0u32;

        for attempt in 0..MAX_ATTEMPTS {
            let outcome = self
                .transport
                .send(method, &url, payload, self.verify_tls)
                .and_then(|raw| {
                    let parsed = serde_json::from_str::<Value>(&raw).map_err(Error::Decode);
                    last_raw = Some(raw);
                    parsed
                });

            match outcome {
                Ok(value) => {
                    if retries > 0 {
                        info!("Success after {} retries.", retries);
                    }
                    return (Some(value), last_raw);
                }
                Err(e) => {
                    error!(
                        "Failed to call API: {}, data: {:?}, error: {}",
                        url, payload, e
                    );
                    if attempt + 1 < MAX_ATTEMPTS {
                        retries += 1;
                        debug!("Retrying...");
                    } else {
                        warn!("Error persisted after {} retries.", MAX_ATTEMPTS - 1);
                    }
                }
            }
        }

        (None, last_raw)
    }
}
