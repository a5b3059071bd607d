//! HTTP Response Utilities
//!
//! Maps `reqwest` outcomes onto [`ProviderError`] so both adapters classify
//! failures the same way.

use crate::constants::ERROR_BODY_MAX_LEN;
use dsw_domain::error::{ProviderError, ProviderOperation};
use dsw_domain::value_objects::ProviderKind;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

/// Utilities for processing HTTP responses
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Check response status and parse the JSON body
    ///
    /// # Returns
    /// The status code and parsed body on 2xx; an unavailable (retryable)
    /// error for 5xx and 429; an application error for other statuses; a
    /// validation error when the body is not JSON. Errors carry the status.
    pub async fn check_and_parse(
        response: Response,
        provider: ProviderKind,
        operation: ProviderOperation,
    ) -> Result<(u16, Value), ProviderError> {
        let status = response.status();
        let code = status.as_u16();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let context = match code {
                401 | 403 => "authentication failed",
                404 => "resource not found",
                429 => "rate limit exceeded",
                500..=599 => "server error",
                _ => "request rejected",
            };
            let message = format!("{context} ({code}): {}", truncate(&error_text));
            if code == 429 || status.is_server_error() {
                return Err(ProviderError::unavailable(provider, operation, code, message));
            }
            return Err(ProviderError::application(provider, operation, Some(code), message));
        }

        let body = response.json::<Value>().await.map_err(|e| {
            ProviderError::validation(provider, operation, format!("response parse failed: {e}"))
        })?;
        Ok((code, body))
    }

    /// Classify a send failure as timeout or transport error
    pub fn send_error(
        error: &reqwest::Error,
        provider: ProviderKind,
        operation: ProviderOperation,
        timeout: Duration,
    ) -> ProviderError {
        if error.is_timeout() {
            ProviderError::timeout(
                provider,
                operation,
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            )
        } else {
            ProviderError::transport(provider, operation, format!("HTTP request failed: {error}"))
        }
    }
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(ERROR_BODY_MAX_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
