use anyhow::{Context, bail};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use reqwest::{RequestBuilder, Response};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::warn;

#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub fallback_delay: Duration,
    /// Upper bound on any server-requested wait; search is interactive.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            fallback_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

pub async fn send_with_retry<F>(policy: RetryPolicy, mut build: F) -> anyhow::Result<Response>
where
    F: FnMut() -> anyhow::Result<RequestBuilder>,
{
    for attempt in 1..=policy.max_attempts {
        let response = build()?.send().await.context("send request")?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if is_retryable(status) && attempt < policy.max_attempts {
            let delay = retry_delay_from_headers(response.headers())
                .unwrap_or(policy.fallback_delay)
                .min(policy.max_delay);
            warn!(
                status = status.as_u16(),
                attempt,
                delay_ms = delay.as_millis() as u64,
                "request throttled; retrying"
            );
            let _ = response.bytes().await;
            tokio::time::sleep(delay).await;
            continue;
        }
        return response
            .error_for_status()
            .map_err(anyhow::Error::from)
            .context("unexpected response status");
    }
    bail!("request failed after {} attempts", policy.max_attempts);
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
    )
}

fn retry_delay_from_headers(headers: &HeaderMap) -> Option<Duration> {
    retry_after_seconds(headers)
        .or_else(|| ratelimit_reset_seconds(headers))
        .map(Duration::from_secs)
}

fn retry_after_seconds(headers: &HeaderMap) -> Option<u64> {
    header_u64(headers, "retry-after")
}

fn ratelimit_reset_seconds(headers: &HeaderMap) -> Option<u64> {
    let reset = header_u64(headers, "x-ratelimit-reset")?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    reset.checked_sub(now).filter(|delay| *delay > 0)
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}
