use std::time::Duration;

use reqwest::{header, StatusCode};

use crate::{
    response::{decode_payload, error_message},
    Payload, RequestDescriptor, Result, RetryPolicy, SolomonError,
};

struct Exchange {
    status: StatusCode,
    content_type: Option<String>,
    body: String,
}

/// Issues `descriptor`, retrying transport failures with exponential backoff.
///
/// - Transport failures (connect, reset, timeout, body read) are retried
///   until `policy.max_attempts` is spent, then surfaced as
///   [`SolomonError::Transport`] carrying the last error.
/// - Non-2xx responses are surfaced at once as [`SolomonError::Http`] unless
///   the status is listed in [`RetryPolicy::retry_statuses`].
/// - 2xx bodies are decoded by content type and never retried.
pub async fn send(
    http: &reqwest::Client,
    descriptor: &RequestDescriptor,
    policy: &RetryPolicy,
) -> Result<Payload> {
    let mut attempt = 0usize;
    loop {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = %descriptor.method(),
            origin = %log_origin(descriptor.url()),
            attempt,
            "sending request"
        );

        let err = match exchange(http, descriptor).await? {
            Ok(exchange) if exchange.status.is_success() => {
                return decode_payload(exchange.content_type.as_deref(), exchange.body);
            }
            Ok(exchange) => {
                let status = exchange.status;
                if policy.retries_status(status.as_u16()) && policy.allows_retry_after(attempt) {
                    wait_before_retry(policy, attempt).await;
                    attempt += 1;
                    continue;
                }
                return Err(SolomonError::Http {
                    status: status.as_u16(),
                    message: error_message(
                        status,
                        exchange.content_type.as_deref(),
                        &exchange.body,
                    ),
                });
            }
            Err(err) => err,
        };

        if should_retry_transport(&err) && policy.allows_retry_after(attempt) {
            wait_before_retry(policy, attempt).await;
            attempt += 1;
            continue;
        }
        return Err(SolomonError::Transport(err));
    }
}

/// One network round trip. The outer error is a descriptor that cannot be
/// turned into a request; the inner one is a transport failure.
async fn exchange(
    http: &reqwest::Client,
    descriptor: &RequestDescriptor,
) -> Result<std::result::Result<Exchange, reqwest::Error>> {
    let request = descriptor.to_request(http)?;
    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => return Ok(Err(err)),
    };

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    Ok(response.text().await.map(|body| Exchange {
        status,
        content_type,
        body,
    }))
}

fn should_retry_transport(err: &reqwest::Error) -> bool {
    err.is_timeout()
        || err.is_request()
        || err.is_body()
        || err.is_decode()
        // is_connect() is not available on wasm32 targets (no TCP)
        || {
            #[cfg(not(target_arch = "wasm32"))]
            { err.is_connect() }
            #[cfg(target_arch = "wasm32")]
            { false }
        }
}

async fn wait_before_retry(policy: &RetryPolicy, attempt: usize) {
    let delay = policy.delay_for(attempt);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        attempt,
        delay_ms = delay.as_millis() as u64,
        "retrying request after backoff"
    );

    sleep(delay).await;
}

/// Scheme, host and port only; paths can carry the consumer key.
#[cfg(feature = "tracing")]
fn log_origin(url: &reqwest::Url) -> String {
    url.origin().ascii_serialization()
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(delay: Duration) {
    tokio::time::sleep(delay).await;
}

/// Browser runtimes have no tokio timer; wait on a `setTimeout` promise.
#[cfg(target_arch = "wasm32")]
async fn sleep(delay: Duration) {
    use wasm_bindgen::{JsCast, JsValue};

    let millis = delay.as_millis().min(i32::MAX as u128) as i32;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let global = js_sys::global();
        let scheduled = js_sys::Reflect::get(&global, &JsValue::from_str("setTimeout"))
            .ok()
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
            .map(|set_timeout| set_timeout.call2(&global, &resolve, &JsValue::from(millis)));

        if !matches!(scheduled, Some(Ok(_))) {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}
