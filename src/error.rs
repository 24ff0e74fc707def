//! Error taxonomy for the fetch pipeline.
//!
//! Every failure here is fatal: the run aborts and the previous output file
//! is left untouched. An empty upstream body is deliberately *not* an error
//! (it yields an empty feed), and individual malformed news items are
//! dropped by the feed renderer rather than surfaced here.

use thiserror::Error;

/// Fatal failures produced while fetching the news list through the proxy.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The proxy itself was unreachable or the request timed out.
    #[error("proxy request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The proxy answered, but not with a JSON envelope we can read.
    #[error("proxy response was not valid JSON: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The proxy reached the target but reported failure (blocked,
    /// challenge unsolved, internal error). Its own message is preserved.
    #[error("proxy reported status {status:?}: {}", message.as_deref().unwrap_or("no message"))]
    Proxy {
        status: String,
        message: Option<String>,
    },

    /// The envelope carried none of the known body fields. This usually
    /// means an unsupported proxy version.
    #[error("proxy response carried no recognized body field (probed {probed:?})")]
    EnvelopeShape { probed: &'static [&'static str] },

    /// The body was present but could not be parsed as a JSON item list,
    /// even after attempting the HTML `<pre>` unwrap. `preview` is a
    /// bounded excerpt of the offending text.
    #[error("payload is not a JSON item list (preview: {preview})")]
    MalformedPayload {
        preview: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}
