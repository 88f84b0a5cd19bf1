//! Provider client error types.

/// Errors from the Google Maps HTTP client.
///
/// These describe failures to obtain a response at all. A response that
/// arrives with a non-`OK` status is not an error at this layer; callers
/// inspect [`ProviderStatus`](super::ProviderStatus) themselves.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request could not be delivered, for reasons other than HTTP.
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", .body.as_ref().map(|b| format!(" (body: {b})")).unwrap_or_default())]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by Google Maps API")]
    RateLimited,

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// The provider cannot be used (e.g. no API key configured)
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl ProviderError {
    /// Whether this error means the provider is unusable, as opposed to a
    /// single request having failed in flight.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ProviderError::NotConfigured(_) | ProviderError::Unauthorized
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProviderError::Unauthorized;
        assert_eq!(err.to_string(), "unauthorized (invalid API key)");

        let err = ProviderError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = ProviderError::Json {
            message: "expected string".into(),
            body: Some("{}".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("expected string"));
        assert!(err.to_string().contains("(body: {})"));

        let err = ProviderError::Json {
            message: "eof".into(),
            body: None,
        };
        assert_eq!(err.to_string(), "JSON parse error: eof");
    }

    #[test]
    fn unavailable_classification() {
        assert!(ProviderError::NotConfigured("no key".into()).is_unavailable());
        assert!(ProviderError::Unauthorized.is_unavailable());
        assert!(!ProviderError::RateLimited.is_unavailable());
        assert!(!ProviderError::Transport("reset".into()).is_unavailable());
    }
}
