//! Error mapping helpers for the Octocrab gateway implementations.
//!
//! Every transport outcome is classified here into the closed [`BotError`]
//! set; raw status codes do not cross this boundary.

use http::StatusCode;

use crate::github::error::BotError;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if a GitHub error status indicates a conflicting write: a moved
/// revision token (409) or an unprocessable create (422).
pub(super) const fn is_conflict(status: StatusCode) -> bool {
    matches!(status, StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether the GitHub error represents a missing resource.
pub(super) fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::GitHub { source, .. } if source.status_code == StatusCode::NOT_FOUND
    )
}

/// Checks whether the GitHub error is a 422 "unprocessable" outcome, the
/// signal the pulls endpoint uses for a duplicate open pull request.
pub(super) fn is_unprocessable(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::GitHub { source, .. }
            if source.status_code == StatusCode::UNPROCESSABLE_ENTITY
    )
}

/// Checks whether the GitHub error represents a rate limit error based on
/// the HTTP status and message / documentation URL content.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> BotError {
    if let octocrab::Error::GitHub { source, .. } = error {
        if is_rate_limit_error(source) {
            return BotError::RateLimited {
                message: format!("{operation} failed: {message}", message = source.message),
            };
        }
        if is_auth_failure(source.status_code) {
            return BotError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    status = source.status_code,
                    message = source.message
                ),
            };
        }
        if is_conflict(source.status_code) {
            return BotError::Conflict {
                message: format!("{operation} failed: {message}", message = source.message),
            };
        }
        return BotError::Api {
            message: format!(
                "{operation} failed with status {status}: {message}",
                status = source.status_code,
                message = source.message
            ),
        };
    }

    if is_network_error(error) {
        return BotError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    BotError::Api {
        message: format!("{operation} failed: {error}"),
    }
}
