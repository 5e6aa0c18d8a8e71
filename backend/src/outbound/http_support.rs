//! Shared reqwest helpers for the identity and email adapters.
//!
//! Adapters classify transport and status failures here, then translate the
//! classification into their own port error.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

const PREVIEW_CHAR_LIMIT: usize = 160;

/// Errors raised while constructing an HTTP adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpAdapterError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("base URL {0} cannot carry a path")]
    BaseUrl(Url),
}

/// Build a reqwest client with an explicit request timeout.
pub(crate) fn client(timeout: Duration) -> Result<Client, HttpAdapterError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Append path segments to `base`, ignoring a trailing slash on the base.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, HttpAdapterError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| HttpAdapterError::BaseUrl(base.clone()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Broad classes of upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpstreamFailureKind {
    Timeout,
    RateLimited,
    Rejected,
    Transport,
}

/// Classified upstream failure with a log-safe message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UpstreamFailure {
    pub kind: UpstreamFailureKind,
    pub status: Option<StatusCode>,
    pub message: String,
}

/// Classify a reqwest error raised before a status was available.
pub(crate) fn classify_transport(error: &reqwest::Error) -> UpstreamFailure {
    let kind = if error.is_timeout() {
        UpstreamFailureKind::Timeout
    } else {
        UpstreamFailureKind::Transport
    };
    UpstreamFailure {
        kind,
        status: None,
        message: error.to_string(),
    }
}

/// Classify a non-success status and its body.
pub(crate) fn classify_status(status: StatusCode, body: &[u8]) -> UpstreamFailure {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    let kind = match status {
        StatusCode::TOO_MANY_REQUESTS => UpstreamFailureKind::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => UpstreamFailureKind::Timeout,
        _ if status.is_client_error() => UpstreamFailureKind::Rejected,
        _ => UpstreamFailureKind::Transport,
    };
    UpstreamFailure {
        kind,
        status: Some(status),
        message,
    }
}

/// Whitespace-compacted body prefix for error messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, UpstreamFailureKind::RateLimited)]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, UpstreamFailureKind::Timeout)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, UpstreamFailureKind::Timeout)]
    #[case::bad_request(StatusCode::BAD_REQUEST, UpstreamFailureKind::Rejected)]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, UpstreamFailureKind::Rejected)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, UpstreamFailureKind::Transport)]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY, UpstreamFailureKind::Transport)]
    fn classifies_statuses(#[case] status: StatusCode, #[case] expected: UpstreamFailureKind) {
        let failure = classify_status(status, b"{\"error\":\"nope\"}");
        assert_eq!(failure.kind, expected);
        assert_eq!(failure.status, Some(status));
        assert!(failure.message.starts_with(&format!("status {}", status.as_u16())));
    }

    #[rstest]
    #[case::bare("https://fn.example.com", "https://fn.example.com/send-deal-email")]
    #[case::nested(
        "https://x.supabase.co/functions/v1",
        "https://x.supabase.co/functions/v1/send-deal-email"
    )]
    #[case::trailing_slash(
        "https://x.supabase.co/functions/v1/",
        "https://x.supabase.co/functions/v1/send-deal-email"
    )]
    fn endpoint_appends_segments(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid base");
        let url = endpoint(&base, &["send-deal-email"]).expect("endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn endpoint_rejects_opaque_base() {
        let base = Url::parse("mailto:ops@example.com").expect("valid url");
        assert!(matches!(
            endpoint(&base, &["token"]),
            Err(HttpAdapterError::BaseUrl(_))
        ));
    }

    #[rstest]
    fn empty_body_keeps_bare_status_message() {
        let failure = classify_status(StatusCode::BAD_GATEWAY, b"  \n ");
        assert_eq!(failure.message, "status 502");
    }

    #[rstest]
    fn preview_compacts_whitespace_and_truncates() {
        assert_eq!(body_preview(b"a \n\t b"), "a b");

        let long = "x".repeat(PREVIEW_CHAR_LIMIT + 10);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHAR_LIMIT + 3);
    }
}
