//! GitHub orchestration layer: handles, models, gateways, and errors.
//!
//! This module wraps Octocrab behind trait-based gateways so that branch
//! resolution, file state, and pull request publication can be exercised
//! against mocks. Transport failures are classified into the closed
//! [`BotError`] set at the gateway boundary; callers never see raw status
//! codes.

pub mod error;
pub mod event;
pub mod gateway;
pub mod handle;
pub mod models;

pub use error::BotError;
pub use event::IssueCommentEvent;
pub use gateway::{OctocrabGateway, RepositoryGateway, UserGateway};
pub use handle::{
    BranchName, PersonalAccessToken, RepositoryHandle, RepositoryName, RepositoryOwner,
};
pub use models::{
    PendingChange, PendingChangeSet, PullRequestIntent, RemoteFile, UserProfile,
};

#[cfg(test)]
pub use gateway::{MockRepositoryGateway, MockUserGateway};
