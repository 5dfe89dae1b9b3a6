//! Generated contributor listings derived from the options document.
//!
//! Each file named by the options document carries a contributor table
//! between well-known markers and a count badge between badge markers.
//! Generation is a pure function of the document state, so repeated runs
//! over an unchanged roll produce byte-identical artifacts and the pull
//! request diff stays minimal.

use std::collections::BTreeMap;

use crate::github::error::BotError;
use crate::github::gateway::RepositoryGateway;
use crate::github::handle::RepositoryHandle;
use crate::github::models::{PendingChange, PendingChangeSet};
use crate::options::OptionsDocument;

mod render;


/// Marker opening the generated contributor table.
pub const LIST_START: &str =
    "<!-- ROLLCALL-LIST:START - Do not remove or modify this section -->";
/// Marker closing the generated contributor table.
pub const LIST_END: &str = "<!-- ROLLCALL-LIST:END -->";
/// Marker opening the contributor-count badge.
pub const BADGE_START: &str =
    "<!-- ROLLCALL-BADGE:START - Do not remove or modify this section -->";
/// Marker closing the contributor-count badge.
pub const BADGE_END: &str = "<!-- ROLLCALL-BADGE:END -->";

/// One listing file's remote state and regenerated content.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ListingFile {
    content: Option<String>,
    original_sha: Option<String>,
}

/// The set of generated listing artifacts for one workflow run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingSet {
    files: BTreeMap<String, ListingFile>,
}

impl ListingSet {
    /// Loads the current state of every file the options document names,
    /// tolerating absence per file.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures other than absence.
    pub async fn fetch(
        gateway: &dyn RepositoryGateway,
        handle: &RepositoryHandle,
        options: &OptionsDocument,
    ) -> Result<Self, BotError> {
        let mut files = BTreeMap::new();
        for path in &options.data().files {
            if files.contains_key(path) {
                continue;
            }
            let fetched = gateway.find_file(handle, path).await?;
            let file = fetched.map_or(
                ListingFile {
                    content: None,
                    original_sha: None,
                },
                |remote| ListingFile {
                    content: Some(remote.content),
                    original_sha: Some(remote.sha),
                },
            );
            files.insert(path.clone(), file);
        }
        Ok(Self { files })
    }

    /// Seeds a default skeleton for every configured file that has no
    /// remote content yet. Files that were fetched are left untouched.
    pub fn init(&mut self) {
        for (path, file) in &mut self.files {
            if file.content.is_none() {
                tracing::info!(path = path.as_str(), "seeding default listing skeleton");
                file.content = Some(default_skeleton());
            }
        }
    }

    /// Re-renders every artifact from the document's current state.
    ///
    /// Files missing the listing markers pass through unchanged; the bot
    /// never rewrites content outside its marker blocks.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Render` when table rendering fails.
    pub fn generate(&mut self, options: &OptionsDocument) -> Result<(), BotError> {
        let table = render::render_table(options)?;
        let badge = render::render_badge(options);

        for (path, file) in &mut self.files {
            let Some(content) = file.content.as_ref() else {
                continue;
            };

            let with_list = render::replace_between(content, LIST_START, LIST_END, &table);
            let regenerated = with_list.as_deref().unwrap_or(content);
            let with_badge =
                render::replace_between(regenerated, BADGE_START, BADGE_END, &badge);

            if with_list.is_none() && with_badge.is_none() {
                tracing::warn!(
                    path = path.as_str(),
                    "listing markers missing, leaving file unchanged"
                );
                continue;
            }
            file.content = Some(with_badge.unwrap_or_else(|| regenerated.to_owned()));
        }
        Ok(())
    }

    /// The artifacts as staged writes, ready to merge into a change set.
    #[must_use]
    pub fn into_change_set(self) -> PendingChangeSet {
        let mut change_set = PendingChangeSet::new();
        for (path, file) in self.files {
            if let Some(content) = file.content {
                change_set.stage(
                    path,
                    PendingChange {
                        content,
                        original_sha: file.original_sha,
                    },
                );
            }
        }
        change_set
    }
}

fn default_skeleton() -> String {
    format!(
        "## Contributors\n\n{BADGE_START}\n{BADGE_END}\n\n\
         Thanks goes to these wonderful people:\n\n{LIST_START}\n{LIST_END}\n"
    )
}
