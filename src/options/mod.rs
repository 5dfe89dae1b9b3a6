//! The options document: a typed view of the `.rollcallrc` resource.
//!
//! The document lists the project's contributors and the generated listing
//! files derived from them. Mutations are staged in memory; nothing becomes
//! visible to the remote repository until the document is serialized back
//! into a pending change. Unknown JSON keys survive a round-trip untouched
//! so the bot never destroys configuration it does not understand.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::github::error::BotError;
use crate::github::gateway::RepositoryGateway;
use crate::github::handle::RepositoryHandle;
use crate::github::models::{PendingChange, RemoteFile, UserProfile};


/// Well-known repository-relative path of the options document.
pub const OPTIONS_PATH: &str = ".rollcallrc";

fn default_repo_type() -> String {
    "github".to_owned()
}

fn default_repo_host() -> String {
    "https://github.com".to_owned()
}

fn default_files() -> Vec<String> {
    vec!["README.md".to_owned()]
}

const fn default_image_size() -> u32 {
    100
}

const fn default_contributors_per_line() -> usize {
    7
}

/// One contributor in the roll.
///
/// Field names mirror the on-disk JSON shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContributorEntry {
    /// GitHub login.
    pub login: String,
    /// Display name.
    pub name: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Profile URL.
    pub profile: String,
    /// Contribution-type tags; deduplicated, insertion order preserved.
    pub contributions: Vec<String>,
}

/// On-disk shape of the options document.
///
/// `Eq` is unavailable because preserved unknown values may hold JSON
/// numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptionsData {
    /// Project name shown in generated listings.
    #[serde(default)]
    pub project_name: String,
    /// Project owner login.
    #[serde(default)]
    pub project_owner: String,
    /// Repository hosting flavour.
    #[serde(default = "default_repo_type")]
    pub repo_type: String,
    /// Repository host base URL.
    #[serde(default = "default_repo_host")]
    pub repo_host: String,
    /// Files carrying a generated contributor listing.
    #[serde(default = "default_files")]
    pub files: Vec<String>,
    /// Avatar size in pixels in generated listings.
    #[serde(default = "default_image_size")]
    pub image_size: u32,
    /// Contributor cells per listing table row.
    #[serde(default = "default_contributors_per_line")]
    pub contributors_per_line: usize,
    /// The contributor roll, in insertion order.
    #[serde(default)]
    pub contributors: Vec<ContributorEntry>,
    /// Keys this bot does not model, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Typed in-memory view of the `.rollcallrc` file plus its concurrency
/// token.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsDocument {
    data: OptionsData,
    original_sha: Option<String>,
}

impl OptionsDocument {
    /// Parses a fetched options file, retaining its revision token.
    ///
    /// # Errors
    ///
    /// Returns `BotError::MalformedOptions` when the body is not valid JSON
    /// for the expected schema.
    pub fn parse(file: RemoteFile) -> Result<Self, BotError> {
        let data =
            serde_json::from_str(&file.content).map_err(|error| BotError::MalformedOptions {
                path: OPTIONS_PATH.to_owned(),
                message: error.to_string(),
            })?;
        Ok(Self {
            data,
            original_sha: Some(file.sha),
        })
    }

    /// Populates a schema-valid empty document for a repository that has no
    /// backing file yet.
    #[must_use]
    pub fn bootstrap(handle: &RepositoryHandle) -> Self {
        Self {
            data: OptionsData {
                project_name: handle.name().as_str().to_owned(),
                project_owner: handle.owner().as_str().to_owned(),
                repo_type: default_repo_type(),
                repo_host: default_repo_host(),
                files: default_files(),
                image_size: default_image_size(),
                contributors_per_line: default_contributors_per_line(),
                contributors: Vec::new(),
                extra: Map::new(),
            },
            original_sha: None,
        }
    }

    /// Merges a contributor into the roll.
    ///
    /// Logins are matched case-insensitively. An existing entry has the new
    /// contribution tags unioned into its tag list (re-adding a tag is a
    /// no-op); an unknown login is appended, preserving insertion order.
    pub fn add_contributor(&mut self, profile: &UserProfile, contributions: &[String]) {
        let existing = self
            .data
            .contributors
            .iter_mut()
            .find(|entry| entry.login.eq_ignore_ascii_case(&profile.login));

        if let Some(entry) = existing {
            for tag in contributions {
                if !entry
                    .contributions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(tag))
                {
                    entry.contributions.push(tag.clone());
                }
            }
            return;
        }

        let mut tags: Vec<String> = Vec::with_capacity(contributions.len());
        for tag in contributions {
            if !tags.iter().any(|known| known.eq_ignore_ascii_case(tag)) {
                tags.push(tag.clone());
            }
        }
        self.data.contributors.push(ContributorEntry {
            login: profile.login.clone(),
            name: profile.name.clone(),
            avatar_url: profile.avatar_url.clone(),
            profile: profile.profile_url.clone(),
            contributions: tags,
        });
    }

    /// Serializes the current state back to raw text.
    ///
    /// Identical document state always yields identical bytes, which keeps
    /// repeated runs free of spurious diffs.
    ///
    /// # Errors
    ///
    /// Returns `BotError::MalformedOptions` when serialization fails.
    pub fn to_raw(&self) -> Result<String, BotError> {
        let rendered =
            serde_json::to_string_pretty(&self.data).map_err(|error| BotError::MalformedOptions {
                path: OPTIONS_PATH.to_owned(),
                message: error.to_string(),
            })?;
        Ok(format!("{rendered}\n"))
    }

    /// The staged write representing this document's current state.
    ///
    /// # Errors
    ///
    /// Returns `BotError::MalformedOptions` when serialization fails.
    pub fn pending_change(&self) -> Result<PendingChange, BotError> {
        Ok(PendingChange {
            content: self.to_raw()?,
            original_sha: self.original_sha.clone(),
        })
    }

    /// Revision token of the fetched backing file, absent for a fresh
    /// document.
    #[must_use]
    pub fn original_sha(&self) -> Option<&str> {
        self.original_sha.as_deref()
    }

    /// Repository-relative path of the backing file.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        OPTIONS_PATH
    }

    /// Read access to the document state.
    #[must_use]
    pub const fn data(&self) -> &OptionsData {
        &self.data
    }
}

/// Loads the options document from the handle's working branch, or
/// bootstraps a fresh one when no backing file exists.
///
/// # Errors
///
/// Propagates gateway failures and `BotError::MalformedOptions` for an
/// unparsable document; absence of the file is not an error.
pub async fn load_or_bootstrap(
    gateway: &dyn RepositoryGateway,
    handle: &RepositoryHandle,
) -> Result<OptionsDocument, BotError> {
    match gateway.find_file(handle, OPTIONS_PATH).await? {
        Some(file) => OptionsDocument::parse(file),
        None => Ok(OptionsDocument::bootstrap(handle)),
    }
}
