//! Data models for remote file state, staged changes, and pull requests.
//!
//! Types prefixed with `Api` are internal deserialisation targets for the
//! GitHub REST responses the gateways consume; they convert into the public
//! domain types and never escape this module tree.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::handle::BranchName;

#[cfg(feature = "test-support")]
pub mod test_support;

/// A file fetched from the remote repository.
///
/// `sha` is the content-addressed revision token GitHub attaches to the
/// fetched version; it is required for optimistic-concurrency updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Decoded UTF-8 file body.
    pub content: String,
    /// Revision token of the fetched version.
    pub sha: String,
}

/// A staged write for a single path.
///
/// `original_sha` of `None` requests create semantics (the write fails if
/// the path already exists); `Some` requests an update that fails when the
/// remote token has moved since the file was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    /// Replacement file body.
    pub content: String,
    /// Revision token of the version this change was derived from.
    pub original_sha: Option<String>,
}

/// The batch of path-to-content writes produced by one workflow run.
///
/// Entries iterate in path order so writes are applied deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChangeSet {
    changes: BTreeMap<String, PendingChange>,
}

impl PendingChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            changes: BTreeMap::new(),
        }
    }

    /// Stages `change` for `path`, replacing any earlier entry.
    pub fn stage(&mut self, path: impl Into<String>, change: PendingChange) {
        self.changes.insert(path.into(), change);
    }

    /// Folds every entry of `other` into this set.
    pub fn merge(&mut self, other: Self) {
        self.changes.extend(other.changes);
    }

    /// Iterates entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PendingChange)> {
        self.changes
            .iter()
            .map(|(path, change)| (path.as_str(), change))
    }

    /// Looks up the staged change for `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&PendingChange> {
        self.changes.get(path)
    }

    /// Number of staged entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether the set holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<'set> IntoIterator for &'set PendingChangeSet {
    type Item = (&'set String, &'set PendingChange);
    type IntoIter = std::collections::btree_map::Iter<'set, String, PendingChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

/// The pull request a workflow run intends to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestIntent {
    /// Pull request title.
    pub title: String,
    /// Pull request body.
    pub body: String,
    /// Branch carrying the staged changes.
    pub head: BranchName,
    /// Branch the pull request targets.
    pub base: BranchName,
}

/// Profile data resolved for a contributor login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// GitHub login.
    pub login: String,
    /// Display name; falls back to the login when unset on the profile.
    pub name: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Profile URL; the user's blog when present, else their GitHub page.
    pub profile_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(in crate::github) struct ApiContentFile {
    pub(in crate::github) content: Option<String>,
    pub(in crate::github) encoding: Option<String>,
    pub(in crate::github) sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(in crate::github) struct ApiGitRef {
    pub(in crate::github) object: ApiGitObject,
}

#[derive(Debug, Clone, Deserialize)]
pub(in crate::github) struct ApiGitObject {
    pub(in crate::github) sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(in crate::github) struct ApiPullRequest {
    pub(in crate::github) html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(in crate::github) struct ApiUser {
    pub(in crate::github) login: String,
    pub(in crate::github) name: Option<String>,
    pub(in crate::github) avatar_url: String,
    pub(in crate::github) blog: Option<String>,
    pub(in crate::github) html_url: String,
}

impl From<ApiUser> for UserProfile {
    fn from(user: ApiUser) -> Self {
        let name = user
            .name
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| user.login.clone());
        let profile_url = user
            .blog
            .filter(|value| !value.is_empty())
            .unwrap_or(user.html_url);
        Self {
            login: user.login,
            name,
            avatar_url: user.avatar_url,
            profile_url,
        }
    }
}
