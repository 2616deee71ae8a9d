//! HTTP retry helper for transient warehouse errors.
//!
//! Warehouse requests go through [`send_json`] instead of calling
//! `reqwest::RequestBuilder::send()` directly, so every request gets
//! automatic retry with exponential backoff on connection failures,
//! timeouts, rate limiting, and server errors.

use std::time::Duration;

use crate::WarehouseError;

/// Maximum retry attempts for transient errors. With exponential backoff
/// (2s, 4s, 8s) the total wait before giving up is 14 seconds.
const MAX_RETRIES: u32 = 3;

/// Maximum length of the response body included in error messages.
const BODY_PREVIEW_LEN: usize = 500;

fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Sends an HTTP request and parses the response body as JSON.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`], since builders are consumed by
/// `.send()`. Does not retry 4xx responses other than 429; those are
/// permanent.
///
/// # Errors
///
/// Returns [`WarehouseError`] if the request still fails after all retries
/// or the server returns a non-retryable error status.
pub async fn send_json<F>(build_request: F) -> Result<serde_json::Value, WarehouseError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt: u32 = 0;

    loop {
        let result = build_request().send().await;

        match result {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(response.json().await?);
                }

                let body = response.text().await.unwrap_or_default();
                let message: String = body.chars().take(BODY_PREVIEW_LEN).collect();

                if is_retryable_status(status) && attempt < MAX_RETRIES {
                    attempt += 1;
                    let backoff = Duration::from_secs(1 << attempt);
                    log::warn!(
                        "Warehouse request returned {status}, retrying in {backoff:?} \
                         (attempt {attempt}/{MAX_RETRIES})"
                    );
                    tokio::time::sleep(backoff).await;
                    continue;
                }

                return Err(WarehouseError::Upstream {
                    status: status.as_u16(),
                    message,
                });
            }
            Err(e) if (e.is_connect() || e.is_timeout()) && attempt < MAX_RETRIES => {
                attempt += 1;
                let backoff = Duration::from_secs(1 << attempt);
                log::warn!(
                    "Warehouse request failed ({e}), retrying in {backoff:?} \
                     (attempt {attempt}/{MAX_RETRIES})"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => return Err(WarehouseError::Http(e)),
        }
    }
}
