//! Routing error types.
//!
//! Three layers of failure, each with its own propagation rule:
//! - [`ValidationError`] rejects a request before any network call.
//! - [`RouteModeError`] is one mode failing; it stays in that mode's slot.
//! - [`CompareError`] is the comparison as a whole failing.

use std::fmt;

use crate::domain::TravelMode;
use crate::google::{NormalizeError, ProviderError, ProviderStatus};

/// Caveat shown whenever a transit route could not be found.
pub const TRANSIT_CAVEAT: &str = "公共交通機関は地域によってデータが利用できない場合があります";

/// A request rejected locally, before reaching the provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Fewer than two points to route between
    #[error("at least 2 points are required, got {count}")]
    InsufficientWaypoints { count: usize },

    /// More points than the provider accepts in one request
    #[error("at most {max} points are allowed, got {count}")]
    TooManyWaypoints { count: usize, max: usize },

    /// Origin or destination is blank
    #[error("{0} must not be empty")]
    EmptyEndpoint(&'static str),
}

impl ValidationError {
    /// Localized message for the user.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::InsufficientWaypoints { .. } => {
                "ルート計算には最低2つのピンが必要です".to_string()
            }
            ValidationError::TooManyWaypoints { max, .. } => {
                format!("ウェイポイントは最大{max}地点までです")
            }
            ValidationError::EmptyEndpoint(_) => "出発地と目的地を入力してください".to_string(),
        }
    }
}

/// Why a single travel mode produced no route.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteModeError {
    /// Provider answered with a non-OK status
    #[error("provider returned {status}{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status {
        status: ProviderStatus,
        detail: Option<String>,
    },

    /// No response was obtained
    #[error("request failed: {message}")]
    Provider { message: String, unavailable: bool },

    /// Response arrived but had no usable route
    #[error("unusable response: {0}")]
    Normalize(#[from] NormalizeError),
}

impl RouteModeError {
    /// Localized message for the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            RouteModeError::Status { status, .. } => status.directions_message(),
            RouteModeError::Provider {
                unavailable: true, ..
            } => "経路検索サービスが利用できません",
            RouteModeError::Provider { .. } => "エラーが発生しました",
            RouteModeError::Normalize(_) => "経路が見つかりませんでした",
        }
    }
}

impl From<ProviderError> for RouteModeError {
    fn from(err: ProviderError) -> Self {
        RouteModeError::Provider {
            unavailable: err.is_unavailable(),
            message: err.to_string(),
        }
    }
}

/// One mode's failure, as reported in aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeFailure {
    pub mode: TravelMode,
    pub error: RouteModeError,
}

impl ModeFailure {
    /// Localized message for this mode's failure, prefixed with its label.
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.mode.label(), self.error.user_message())
    }
}

impl fmt::Display for ModeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.mode, self.error)
    }
}

/// The comparison as a whole could not be produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompareError {
    /// The request named no travel modes at all
    #[error("no travel modes were requested")]
    NoModesRequested,

    /// Every requested mode failed
    #[error("all {} requested modes failed", .failures.len())]
    AllModesFailed { failures: Vec<ModeFailure> },
}

impl CompareError {
    /// Guidance shown to the user, with mode-specific hints.
    ///
    /// Mentions the transit data caveat when transit was among the failed
    /// modes, followed by one line per failed mode.
    pub fn guidance(&self) -> String {
        match self {
            CompareError::NoModesRequested => "移動手段を選択してください".to_string(),
            CompareError::AllModesFailed { failures } => {
                let mut lines = vec!["経路が見つかりませんでした".to_string()];
                if failures.iter().any(|f| f.mode == TravelMode::Transit) {
                    lines.push(TRANSIT_CAVEAT.to_string());
                }
                lines.extend(failures.iter().map(ModeFailure::user_message));
                lines.join("\n")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_and_messages() {
        let err = ValidationError::InsufficientWaypoints { count: 1 };
        assert_eq!(err.to_string(), "at least 2 points are required, got 1");
        assert_eq!(err.user_message(), "ルート計算には最低2つのピンが必要です");

        let err = ValidationError::TooManyWaypoints { count: 26, max: 25 };
        assert_eq!(err.to_string(), "at most 25 points are allowed, got 26");
        assert_eq!(err.user_message(), "ウェイポイントは最大25地点までです");
    }

    #[test]
    fn mode_error_display() {
        let err = RouteModeError::Status {
            status: ProviderStatus::ZeroResults,
            detail: None,
        };
        assert_eq!(err.to_string(), "provider returned ZERO_RESULTS");
        assert_eq!(err.user_message(), "経路が見つかりませんでした");

        let err = RouteModeError::Status {
            status: ProviderStatus::RequestDenied,
            detail: Some("key expired".into()),
        };
        assert_eq!(err.to_string(), "provider returned REQUEST_DENIED: key expired");
    }

    #[test]
    fn provider_errors_keep_availability() {
        let err: RouteModeError = ProviderError::NotConfigured("no key".into()).into();
        assert!(matches!(
            err,
            RouteModeError::Provider {
                unavailable: true,
                ..
            }
        ));

        let err: RouteModeError = ProviderError::RateLimited.into();
        assert_eq!(err.user_message(), "エラーが発生しました");
    }

    #[test]
    fn transit_guidance_mentions_caveat() {
        let err = CompareError::AllModesFailed {
            failures: vec![ModeFailure {
                mode: TravelMode::Transit,
                error: RouteModeError::Status {
                    status: ProviderStatus::ZeroResults,
                    detail: None,
                },
            }],
        };

        let guidance = err.guidance();
        assert!(guidance.contains(TRANSIT_CAVEAT));
        assert!(guidance.contains("公共交通機関: 経路が見つかりませんでした"));
    }

    #[test]
    fn non_transit_guidance_has_no_caveat() {
        let err = CompareError::AllModesFailed {
            failures: vec![ModeFailure {
                mode: TravelMode::Walking,
                error: RouteModeError::Status {
                    status: ProviderStatus::NotFound,
                    detail: None,
                },
            }],
        };

        let guidance = err.guidance();
        assert!(!guidance.contains(TRANSIT_CAVEAT));
        assert!(guidance.contains("徒歩: 指定された場所が見つかりませんでした"));
    }

    #[test]
    fn no_modes_is_distinct() {
        assert_ne!(
            CompareError::NoModesRequested,
            CompareError::AllModesFailed {
                failures: Vec::new()
            }
        );
        assert_eq!(
            CompareError::NoModesRequested.to_string(),
            "no travel modes were requested"
        );
    }
}
