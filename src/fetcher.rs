//! Fetches the latest-news list through a browser-emulation proxy.
//!
//! The publisher sits behind bot detection, so the request is routed through
//! a FlareSolverr-style proxy: we POST a command, the proxy loads the target
//! URL in a real browser engine and hands the page body back inside a JSON
//! envelope. The envelope's schema has drifted across proxy versions, so
//! everything past the transport call treats field presence as advisory:
//!
//! 1. `status` must be the `"ok"` sentinel, otherwise the proxy's own
//!    message is surfaced as [`FetchError::Proxy`].
//! 2. The body is taken from the first present, non-null of
//!    `solution.response`, `solution.body`, `solution.html`.
//! 3. The body is parsed as a JSON item list directly; if that fails and the
//!    body looks like HTML, the first `<pre>...</pre>` block is unwrapped
//!    and parsed instead (some proxy versions return the browser's JSON
//!    viewer markup rather than the raw response).
//!
//! An empty or whitespace-only body is not a failure: upstream may
//! legitimately have nothing to report, and the run produces an empty feed.

use crate::error::FetchError;
use crate::models::{FetchCommand, NewsItem};
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Body fields probed on the envelope's `solution` object, in order.
const BODY_FIELDS: &[&str] = &["response", "body", "html"];

/// Envelope status value that means the proxy solved the page.
const STATUS_OK: &str = "ok";

/// Extra headroom on top of the proxy's own page-load budget, so the
/// transport timeout fires only when the proxy itself has gone away.
const TRANSPORT_HEADROOM: Duration = Duration::from_secs(15);

/// How much offending payload text to carry in an error message.
const PREVIEW_LEN: usize = 200;

static PRE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<pre[^>]*>(.*?)</pre>").unwrap());

/// Fetch the latest-news list for `target_url` via the proxy at `proxy_url`.
///
/// Returns the items in upstream order, or an empty vector when upstream
/// returned nothing. Structurally hollow items (no headline, no link) are
/// *not* filtered here; that is the feed renderer's concern.
///
/// # Errors
///
/// Any [`FetchError`]. There is no retry: transient transport failures
/// surface immediately and the scheduler's next run tries again.
#[instrument(level = "info", skip_all, fields(%target_url))]
pub async fn fetch_news_items(
    client: &Client,
    proxy_url: &str,
    target_url: &str,
    max_timeout_ms: u64,
) -> Result<Vec<NewsItem>, FetchError> {
    let command = FetchCommand::get(target_url, max_timeout_ms);

    debug!(%proxy_url, max_timeout_ms, "Sending fetch command to proxy");
    let response = client
        .post(proxy_url)
        .json(&command)
        .timeout(Duration::from_millis(max_timeout_ms) + TRANSPORT_HEADROOM)
        .send()
        .await?;
    let raw = response.text().await?;
    debug!(bytes = raw.len(), "Received proxy envelope");

    let envelope: Value = serde_json::from_str(&raw).map_err(FetchError::Envelope)?;
    check_proxy_status(&envelope)?;
    let body = extract_body(&envelope)?;

    let items = parse_news_body(body)?;
    info!(count = items.len(), "Parsed news items from proxy body");
    Ok(items)
}

/// Fail unless the envelope's `status` is the success sentinel.
fn check_proxy_status(envelope: &Value) -> Result<(), FetchError> {
    let status = envelope
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("(missing)");
    if status == STATUS_OK {
        return Ok(());
    }
    let message = envelope
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);
    Err(FetchError::Proxy {
        status: status.to_string(),
        message,
    })
}

/// Locate the embedded response body inside `solution`.
///
/// The field name has varied across proxy versions; the first present,
/// non-null string among [`BODY_FIELDS`] wins.
fn extract_body(envelope: &Value) -> Result<&str, FetchError> {
    let solution = envelope.get("solution").unwrap_or(&Value::Null);
    for field in BODY_FIELDS {
        if let Some(body) = solution.get(field).and_then(Value::as_str) {
            debug!(field, bytes = body.len(), "Found response body field");
            return Ok(body);
        }
    }
    Err(FetchError::EnvelopeShape {
        probed: BODY_FIELDS,
    })
}

/// Parse the proxied page body into news items.
///
/// Tries the body as raw JSON first, then falls back to unwrapping the
/// first `<pre>` block when the body is an HTML document. Empty input
/// yields an empty list, not an error.
fn parse_news_body(body: &str) -> Result<Vec<NewsItem>, FetchError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        info!("Proxy body is empty; treating as zero items");
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Vec<NewsItem>>(trimmed) {
        Ok(items) => Ok(items),
        Err(direct_err) if trimmed.starts_with('<') => {
            warn!(error = %direct_err, "Body is not raw JSON; trying HTML <pre> unwrap");
            unwrap_pre_block(trimmed)
        }
        Err(direct_err) => Err(FetchError::MalformedPayload {
            preview: truncate_for_log(trimmed, PREVIEW_LEN),
            source: Some(direct_err),
        }),
    }
}

/// Re-parse the inner text of the first `<pre>` block in an HTML body.
fn unwrap_pre_block(html: &str) -> Result<Vec<NewsItem>, FetchError> {
    let Some(caps) = PRE_BLOCK.captures(html) else {
        return Err(FetchError::MalformedPayload {
            preview: truncate_for_log(html, PREVIEW_LEN),
            source: None,
        });
    };
    let inner = caps[1].trim();
    serde_json::from_str::<Vec<NewsItem>>(inner).map_err(|e| FetchError::MalformedPayload {
        preview: truncate_for_log(inner, PREVIEW_LEN),
        source: Some(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ITEMS_JSON: &str =
        r#"[{"headline":"A","url":"http://x/1"},{"headline":"B","url":"http://x/2"}]"#;

    fn envelope_with_body(field: &str, body: &str) -> Value {
        json!({ "status": "ok", "solution": { field: body } })
    }

    #[test]
    fn test_status_ok_passes() {
        let env = json!({"status": "ok", "solution": {}});
        assert!(check_proxy_status(&env).is_ok());
    }

    #[test]
    fn test_status_error_carries_proxy_message() {
        let env = json!({"status": "error", "message": "blocked"});
        match check_proxy_status(&env).unwrap_err() {
            FetchError::Proxy { status, message } => {
                assert_eq!(status, "error");
                assert_eq!(message.as_deref(), Some("blocked"));
            }
            other => panic!("expected Proxy error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_status_is_a_proxy_failure() {
        let env = json!({"solution": {"response": "[]"}});
        assert!(matches!(
            check_proxy_status(&env),
            Err(FetchError::Proxy { .. })
        ));
    }

    #[test]
    fn test_extract_body_prefers_response_over_later_fields() {
        let env = json!({
            "status": "ok",
            "solution": {"html": "<html>", "response": "[]"}
        });
        assert_eq!(extract_body(&env).unwrap(), "[]");
    }

    #[test]
    fn test_extract_body_accepts_each_known_field() {
        for field in ["response", "body", "html"] {
            let env = envelope_with_body(field, "[]");
            assert_eq!(extract_body(&env).unwrap(), "[]", "field {field}");
        }
    }

    #[test]
    fn test_extract_body_skips_null_fields() {
        let env = json!({
            "status": "ok",
            "solution": {"response": null, "body": "[]"}
        });
        assert_eq!(extract_body(&env).unwrap(), "[]");
    }

    #[test]
    fn test_extract_body_without_any_known_field() {
        let env = json!({"status": "ok", "solution": {"content": "[]"}});
        assert!(matches!(
            extract_body(&env),
            Err(FetchError::EnvelopeShape { .. })
        ));
    }

    #[test]
    fn test_extract_body_without_solution_object() {
        let env = json!({"status": "ok"});
        assert!(matches!(
            extract_body(&env),
            Err(FetchError::EnvelopeShape { .. })
        ));
    }

    #[test]
    fn test_parse_direct_json_preserves_order() {
        let items = parse_news_body(ITEMS_JSON).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].headline, "A");
        assert_eq!(items[1].headline, "B");
    }

    #[test]
    fn test_parse_empty_body_yields_zero_items() {
        assert!(parse_news_body("").unwrap().is_empty());
        assert!(parse_news_body("   \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_empty_array_yields_zero_items() {
        assert!(parse_news_body("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_html_wrapped_json_matches_direct_parse() {
        let html = format!(
            "<html><head></head><body>\n<PRE style=\"word-wrap: break-word\">{ITEMS_JSON}</PRE>\n</body></html>"
        );
        assert_eq!(
            parse_news_body(&html).unwrap(),
            parse_news_body(ITEMS_JSON).unwrap()
        );
    }

    #[test]
    fn test_parse_uses_first_pre_block_only() {
        let html = format!("<html><pre>{ITEMS_JSON}</pre><pre>[]</pre></html>");
        assert_eq!(parse_news_body(&html).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_html_without_pre_block_fails() {
        let err = parse_news_body("<html><body>Checking your browser</body></html>").unwrap_err();
        match err {
            FetchError::MalformedPayload { preview, source } => {
                assert!(source.is_none());
                assert!(preview.contains("Checking your browser"));
            }
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_html_with_garbage_pre_block_fails() {
        let err = parse_news_body("<html><pre>not json at all</pre></html>").unwrap_err();
        match err {
            FetchError::MalformedPayload { preview, source } => {
                assert!(source.is_some());
                assert!(preview.contains("not json"));
            }
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_non_json_non_html_fails_with_parse_error() {
        let err = parse_news_body("definitely not json").unwrap_err();
        assert!(matches!(
            err,
            FetchError::MalformedPayload {
                source: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_preview_is_bounded() {
        let huge = format!("<html><body>{}</body></html>", "x".repeat(5000));
        match parse_news_body(&huge).unwrap_err() {
            FetchError::MalformedPayload { preview, .. } => {
                // preview chars plus the truncation marker, never the full body
                assert!(preview.len() < 300, "preview too long: {}", preview.len());
            }
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_pre_block_matches_across_newlines() {
        let html = "<html>\n<pre>\n[\n  {\"headline\": \"A\", \"url\": \"http://x/1\"}\n]\n</pre>\n</html>";
        let items = parse_news_body(html).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "http://x/1");
    }
}
