//! Gateways for repository state and pull request publication.
//!
//! This module provides trait-based gateways for communicating with the
//! GitHub API. The trait-based design enables mocking in tests while the
//! Octocrab implementations handle real HTTP requests.
//!
//! Branch and file existence are explicit queries returning `Option`; error
//! signalling is reserved for genuinely exceptional transport outcomes,
//! which are classified into the closed [`BotError`] set at this boundary.

mod client;
mod contents;
mod error_mapping;
mod pull_request;
mod refs;
mod remote;
mod user;

pub use remote::OctocrabGateway;

use std::collections::BTreeMap;

use async_trait::async_trait;
use url::Url;

use crate::github::error::BotError;
use crate::github::handle::{BranchName, RepositoryHandle};
use crate::github::models::{
    PendingChange, PendingChangeSet, PullRequestIntent, RemoteFile, UserProfile,
};

/// Gateway for branch, file, and pull request operations on one repository.
///
/// Read operations are scoped to the handle's working branch; write
/// operations name their target branch explicitly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Looks up the head commit of `branch`, returning `None` when the
    /// branch does not exist.
    async fn find_branch_head(
        &self,
        handle: &RepositoryHandle,
        branch: &BranchName,
    ) -> Result<Option<String>, BotError>;

    /// Fetches `path` from the working branch, returning `None` when the
    /// file does not exist.
    async fn find_file(
        &self,
        handle: &RepositoryHandle,
        path: &str,
    ) -> Result<Option<RemoteFile>, BotError>;

    /// Fetches `path` from the working branch.
    ///
    /// Fails with [`BotError::ResourceNotFound`] when the file is absent;
    /// any other transport failure propagates as its classified variant.
    async fn get_file(
        &self,
        handle: &RepositoryHandle,
        path: &str,
    ) -> Result<RemoteFile, BotError>;

    /// Fetches several paths concurrently from the working branch.
    ///
    /// There is no partial-success contract: any single failure fails the
    /// whole call, so callers must only request paths expected to exist.
    async fn get_multiple_files(
        &self,
        handle: &RepositoryHandle,
        paths: &[String],
    ) -> Result<BTreeMap<String, RemoteFile>, BotError>;

    /// Creates `branch` pointing at the current head of the repository's
    /// default branch. Fails if the branch already exists.
    async fn create_branch(
        &self,
        handle: &RepositoryHandle,
        branch: &BranchName,
    ) -> Result<(), BotError>;

    /// Writes one staged change to `branch`.
    ///
    /// A change without an original revision token uses create semantics
    /// and fails if the path already exists; a token requests an update
    /// that fails with [`BotError::Conflict`] when the remote token has
    /// moved. Conflicts are not retried here: the working branch is
    /// bot-exclusive, so a moved token means a concurrent writer lost.
    async fn create_or_update_file(
        &self,
        handle: &RepositoryHandle,
        path: &str,
        change: &PendingChange,
        branch: &BranchName,
    ) -> Result<(), BotError>;

    /// Applies every entry of `change_set` to `branch` in path order.
    ///
    /// Entries are independent; there is no multi-file atomicity. A
    /// mid-batch failure surfaces [`BotError::PartialBatch`] naming the
    /// entries already written.
    async fn create_or_update_files(
        &self,
        handle: &RepositoryHandle,
        change_set: &PendingChangeSet,
        branch: &BranchName,
    ) -> Result<(), BotError>;

    /// Opens the pull request described by `intent`.
    ///
    /// A remote duplicate signal maps to
    /// [`BotError::PullRequestAlreadyOpen`], which callers treat as an
    /// already-satisfied terminal state.
    async fn create_pull_request(
        &self,
        handle: &RepositoryHandle,
        intent: &PullRequestIntent,
    ) -> Result<Url, BotError>;

    /// Composite publish step: branch, change set, pull request.
    ///
    /// The branch is created only when `branch` differs from the handle's
    /// working branch; a caller that already redirected the handle to an
    /// existing work-in-progress branch resumes it without re-creating.
    async fn create_pull_request_from_files(
        &self,
        handle: &RepositoryHandle,
        intent: &PullRequestIntent,
        change_set: &PendingChangeSet,
        branch: &BranchName,
    ) -> Result<Url, BotError>;

    /// Posts a comment on the issue or pull request thread.
    async fn create_issue_comment(
        &self,
        handle: &RepositoryHandle,
        issue_number: u64,
        body: &str,
    ) -> Result<(), BotError>;
}

/// Gateway resolving a login to profile data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Fetches profile data for `login`.
    async fn user_profile(&self, login: &str) -> Result<UserProfile, BotError>;
}

#[cfg(test)]
mod tests;
