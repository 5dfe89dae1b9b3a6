//! Error types exposed by the GitHub orchestration layer.

use thiserror::Error;

/// Errors surfaced while resolving repository state or publishing changes.
///
/// Transport outcomes are classified into this closed set at the gateway
/// boundary; raw HTTP status codes never leak past it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BotError {
    /// A backing file is absent from the working branch.
    #[error("file not found: {path}")]
    ResourceNotFound {
        /// Repository-relative path of the missing file.
        path: String,
    },

    /// The requested branch does not exist in the repository.
    #[error("branch not found: {branch}")]
    BranchNotFound {
        /// Name of the missing branch.
        branch: String,
    },

    /// A pull request for the working branch is already open.
    ///
    /// This is an expected outcome of re-running the workflow for a pending
    /// contributor, not a defect.
    #[error("Pull request is already open")]
    PullRequestAlreadyOpen,

    /// The remote rejected a write because its revision token moved.
    #[error("GitHub reported a conflicting update: {message}")]
    Conflict {
        /// Error detail returned with the conflict response.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit
    /// message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimited {
        /// Error message from GitHub.
        message: String,
    },

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The options document could not be parsed or serialized.
    #[error("options document at {path} is malformed: {message}")]
    MalformedOptions {
        /// Repository-relative path of the options document.
        path: String,
        /// Parse or serialization error detail.
        message: String,
    },

    /// A batched write stopped partway through the change set.
    ///
    /// File writes carry no multi-file atomicity; the entries already
    /// applied are named so operators can see what the branch now holds.
    #[error("updated {applied:?} before '{path}' failed: {message}")]
    PartialBatch {
        /// Paths written before the failure, in write order.
        applied: Vec<String>,
        /// Path of the entry that failed.
        path: String,
        /// Error detail for the failed entry.
        message: String,
    },

    /// A generated listing could not be rendered.
    #[error("listing generation failed: {message}")]
    Render {
        /// Template engine error detail.
        message: String,
    },

    /// The inbound webhook payload was missing required fields.
    #[error("invalid webhook payload: {message}")]
    InvalidPayload {
        /// Description of the malformed or missing field.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl BotError {
    /// Whether the error carries a message meant for the requesting user.
    ///
    /// User-facing (domain) errors are reported verbatim in the comment
    /// thread and suppress the generic failure reply; everything else is an
    /// infrastructure failure that is logged and re-raised to the host.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::PullRequestAlreadyOpen)
    }
}
