//! Location resolution errors.

use crate::google::{ProviderError, ProviderStatus};

/// Why a query could not be resolved to a location.
///
/// None of these are fatal: the caller keeps whatever it showed before and
/// displays [`user_message`](ResolutionError::user_message).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    /// Nothing matched (or the query was blank)
    #[error("no results for {query:?}")]
    ZeroResults { query: String },

    /// Provider not configured, or it refused the request
    #[error("provider unavailable: {reason}")]
    ProviderUnavailable {
        reason: String,
        status: Option<ProviderStatus>,
    },

    /// The request did not complete
    #[error("request failed: {0}")]
    TransportFailure(String),
}

impl ResolutionError {
    /// Localized message for the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolutionError::ZeroResults { .. } => ProviderStatus::ZeroResults.search_message(),
            ResolutionError::ProviderUnavailable {
                status: Some(status),
                ..
            } => status.search_message(),
            ResolutionError::ProviderUnavailable { status: None, .. } => {
                "検索サービスが利用できません"
            }
            ResolutionError::TransportFailure(_) => "エラーが発生しました",
        }
    }

    /// Classify a non-OK, non-ZERO_RESULTS status.
    pub(super) fn refused(status: ProviderStatus, detail: Option<String>) -> Self {
        let reason = match detail {
            Some(detail) => format!("{status}: {detail}"),
            None => status.to_string(),
        };
        ResolutionError::ProviderUnavailable {
            reason,
            status: Some(status),
        }
    }
}

impl From<ProviderError> for ResolutionError {
    fn from(err: ProviderError) -> Self {
        if err.is_unavailable() {
            ResolutionError::ProviderUnavailable {
                reason: err.to_string(),
                status: None,
            }
        } else {
            ResolutionError::TransportFailure(err.to_string())
        }
    }
}
