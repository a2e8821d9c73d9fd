//! Single-shot HTTP helpers.
//!
//! Every request is sent exactly once. A failed import is re-run as a
//! whole by the caller, so nothing here sleeps or retries.
//!
//! ```ignore
//! let body = http::send_json(client.post(&url).json(&payload)).await?;
//! ```

use crate::TelraamError;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Sends a request and parses the response body as JSON.
///
/// # Errors
///
/// Returns [`TelraamError::Http`] if the request cannot be sent,
/// [`TelraamError::Response`] on any status other than `200 OK`, and
/// [`TelraamError::Json`] if the body is not valid JSON.
pub async fn send_json(request: reqwest::RequestBuilder) -> Result<serde_json::Value, TelraamError> {
    let text = send_text(request).await?;

    serde_json::from_str(&text).map_err(|e| {
        log::error!(
            "JSON parse failed: {e}\n  received: {} bytes\n  body preview: {}",
            text.len(),
            preview(&text),
        );
        TelraamError::Json(e)
    })
}

/// Sends a request and returns the response body as text.
///
/// # Errors
///
/// Returns [`TelraamError::Http`] if the request cannot be sent or the body
/// cannot be read, and [`TelraamError::Response`] on any status other than
/// `200 OK`.
pub async fn send_text(request: reqwest::RequestBuilder) -> Result<String, TelraamError> {
    let response = request.send().await?;

    let url = response.url().to_string();
    let status = response.status();

    if !is_accepted(status) {
        let body = response.text().await.unwrap_or_default();
        log::error!(
            "HTTP {status} from {url}\n  body preview: {}",
            preview(&body)
        );
        return Err(TelraamError::Response {
            message: format!("HTTP {status} from {url}"),
        });
    }

    Ok(response.text().await?)
}

/// Only `200 OK` carries a report; other 2xx answers are errors too.
fn is_accepted(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::OK
}

fn preview(text: &str) -> String {
    if text.len() > BODY_PREVIEW_LEN {
        let cut = (0..=BODY_PREVIEW_LEN)
            .rev()
            .find(|i| text.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}...", &text[..cut])
    } else {
        text.to_string()
    }
}
