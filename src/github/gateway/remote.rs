//! Octocrab implementation of the repository and user gateways.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::future::try_join_all;
use octocrab::Octocrab;
use url::Url;

use crate::github::error::BotError;
use crate::github::handle::{BranchName, PersonalAccessToken, RepositoryHandle};
use crate::github::models::{
    PendingChange, PendingChangeSet, PullRequestIntent, RemoteFile, UserProfile,
};

use super::client::build_octocrab_client;
use super::contents::{fetch_file, put_file};
use super::pull_request::{open_pull_request, post_issue_comment};
use super::refs::{create_branch_from_default, fetch_branch_head};
use super::user::fetch_user_profile;
use super::{RepositoryGateway, UserGateway};

/// Octocrab-backed gateway.
pub struct OctocrabGateway {
    client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Configuration` when the base URI cannot be parsed
    /// or `BotError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &str) -> Result<Self, BotError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl RepositoryGateway for OctocrabGateway {
    async fn find_branch_head(
        &self,
        handle: &RepositoryHandle,
        branch: &BranchName,
    ) -> Result<Option<String>, BotError> {
        fetch_branch_head(&self.client, handle, branch).await
    }

    async fn find_file(
        &self,
        handle: &RepositoryHandle,
        path: &str,
    ) -> Result<Option<RemoteFile>, BotError> {
        fetch_file(&self.client, handle, path, handle.working_branch()).await
    }

    async fn get_file(
        &self,
        handle: &RepositoryHandle,
        path: &str,
    ) -> Result<RemoteFile, BotError> {
        self.find_file(handle, path)
            .await?
            .ok_or_else(|| BotError::ResourceNotFound {
                path: path.to_owned(),
            })
    }

    async fn get_multiple_files(
        &self,
        handle: &RepositoryHandle,
        paths: &[String],
    ) -> Result<BTreeMap<String, RemoteFile>, BotError> {
        let fetches = paths.iter().map(|path| async move {
            let file = self.get_file(handle, path).await?;
            Ok::<_, BotError>((path.clone(), file))
        });

        let files = try_join_all(fetches).await?;
        Ok(files.into_iter().collect())
    }

    async fn create_branch(
        &self,
        handle: &RepositoryHandle,
        branch: &BranchName,
    ) -> Result<(), BotError> {
        create_branch_from_default(&self.client, handle, branch).await
    }

    async fn create_or_update_file(
        &self,
        handle: &RepositoryHandle,
        path: &str,
        change: &PendingChange,
        branch: &BranchName,
    ) -> Result<(), BotError> {
        put_file(&self.client, handle, path, change, branch).await
    }

    async fn create_or_update_files(
        &self,
        handle: &RepositoryHandle,
        change_set: &PendingChangeSet,
        branch: &BranchName,
    ) -> Result<(), BotError> {
        // Entries apply one at a time in path order so a failure names a
        // well-defined prefix of applied writes.
        let mut applied: Vec<String> = Vec::with_capacity(change_set.len());
        for (path, change) in change_set.iter() {
            if let Err(error) = self
                .create_or_update_file(handle, path, change, branch)
                .await
            {
                if applied.is_empty() {
                    return Err(error);
                }
                return Err(BotError::PartialBatch {
                    applied,
                    path: path.to_owned(),
                    message: error.to_string(),
                });
            }
            applied.push(path.to_owned());
        }
        Ok(())
    }

    async fn create_pull_request(
        &self,
        handle: &RepositoryHandle,
        intent: &PullRequestIntent,
    ) -> Result<Url, BotError> {
        open_pull_request(&self.client, handle, intent).await
    }

    async fn create_pull_request_from_files(
        &self,
        handle: &RepositoryHandle,
        intent: &PullRequestIntent,
        change_set: &PendingChangeSet,
        branch: &BranchName,
    ) -> Result<Url, BotError> {
        // A handle already redirected to the work-in-progress branch means
        // the branch exists; only a fresh request creates it.
        if branch != handle.working_branch() {
            self.create_branch(handle, branch).await?;
        }

        self.create_or_update_files(handle, change_set, branch)
            .await?;
        self.create_pull_request(handle, intent).await
    }

    async fn create_issue_comment(
        &self,
        handle: &RepositoryHandle,
        issue_number: u64,
        body: &str,
    ) -> Result<(), BotError> {
        post_issue_comment(&self.client, handle, issue_number, body).await
    }
}

#[async_trait]
impl UserGateway for OctocrabGateway {
    async fn user_profile(&self, login: &str) -> Result<UserProfile, BotError> {
        fetch_user_profile(&self.client, login).await
    }
}
