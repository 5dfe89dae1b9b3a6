//! Inbound webhook payload models.
//!
//! The bot consumes `issue_comment` events. Issue comments and pull request
//! comments arrive through the same event name, so one payload shape covers
//! both.

use serde::Deserialize;

use super::error::BotError;
use super::handle::{BranchName, RepositoryHandle, RepositoryName, RepositoryOwner};

/// An `issue_comment` webhook event.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IssueCommentEvent {
    /// Event action (`created`, `edited`, ...).
    pub action: String,
    /// The issue or pull request the comment was posted on.
    pub issue: EventIssue,
    /// The triggering comment.
    pub comment: EventComment,
    /// The repository the event originated from.
    pub repository: EventRepository,
}

impl IssueCommentEvent {
    /// Parses an event payload from raw JSON.
    ///
    /// # Errors
    ///
    /// Returns `BotError::InvalidPayload` when the JSON does not match the
    /// `issue_comment` shape.
    pub fn from_json(raw: &str) -> Result<Self, BotError> {
        serde_json::from_str(raw).map_err(|error| BotError::InvalidPayload {
            message: error.to_string(),
        })
    }

    /// Builds the request-scoped repository handle for this event.
    ///
    /// # Errors
    ///
    /// Returns `BotError::InvalidPayload` when the payload carries blank
    /// repository coordinates.
    pub fn repository_handle(&self) -> Result<RepositoryHandle, BotError> {
        let owner = RepositoryOwner::new(&self.repository.owner.login)?;
        let name = RepositoryName::new(&self.repository.name)?;
        let default_branch = BranchName::new(&self.repository.default_branch)?;
        Ok(RepositoryHandle::new(owner, name, default_branch))
    }
}

/// Issue half of the event payload.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EventIssue {
    /// Issue or pull request number the comment thread belongs to.
    pub number: u64,
}

/// The comment that triggered the event.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EventComment {
    /// Comment identifier.
    pub id: u64,
    /// Comment body text.
    pub body: String,
    /// Direct link to the comment.
    pub html_url: String,
    /// Comment author.
    pub user: EventUser,
}

/// A user reference inside an event payload.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EventUser {
    /// GitHub login.
    pub login: String,
}

/// Repository half of the event payload.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EventRepository {
    /// Repository name.
    pub name: String,
    /// Repository owner.
    pub owner: EventUser,
    /// Default branch name.
    pub default_branch: String,
}
