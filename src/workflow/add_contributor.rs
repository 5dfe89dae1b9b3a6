//! The add-contributor orchestration sequence.
//!
//! One request runs end to end over request-scoped state: resolve the
//! working branch, load the options document, merge the contributor,
//! regenerate listings, and publish everything as a single pull request.
//! Re-running the sequence for the same pending contributor converges on
//! the same branch and pull request instead of duplicating work.

use url::Url;

use crate::github::error::BotError;
use crate::github::gateway::{RepositoryGateway, UserGateway};
use crate::github::handle::{BranchName, RepositoryHandle};
use crate::github::models::PullRequestIntent;
use crate::listing::ListingSet;
use crate::options;
use crate::telemetry::{Analytics, TelemetryEvent};

use super::reply::CommentReply;

/// Terminal outcome of a successful add-contributor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new pull request was opened.
    Opened {
        /// HTML URL of the pull request.
        url: Url,
    },
    /// The pull request for this contributor was already open; nothing new
    /// was published.
    AlreadyOpen,
}

/// Derives the work-in-progress branch name for a login.
///
/// Logins are lowercased first (GitHub logins are case-insensitive), then
/// every byte outside `[a-z0-9-]` is replaced by `_` and its two hex
/// digits. The substitution is injective, so repeated requests for one
/// login always target the same branch and distinct logins never collide.
#[must_use]
pub fn branch_name_for_login(login: &str) -> String {
    let lowered = login.to_lowercase();
    let mut safe = String::with_capacity(lowered.len());
    for byte in lowered.bytes() {
        let character = char::from(byte);
        if character.is_ascii_alphanumeric() || character == '-' {
            safe.push(character);
        } else {
            safe.push_str(&format!("_{byte:02x}"));
        }
    }
    format!("add-{safe}")
}

/// Runs the add-contributor sequence for one request.
///
/// # Errors
///
/// Propagates gateway and profile-lookup failures. A duplicate open pull
/// request is not an error here; it resolves to
/// [`AddOutcome::AlreadyOpen`].
pub async fn process_add_contributor(
    gateway: &dyn RepositoryGateway,
    users: &dyn UserGateway,
    handle: &mut RepositoryHandle,
    reply: &mut CommentReply,
    analytics: &mut Analytics,
    login: &str,
    contributions: &[String],
) -> Result<AddOutcome, BotError> {
    let branch = BranchName::new(&branch_name_for_login(login))?;

    // Resolve the working branch: a surviving work-in-progress branch for
    // this login means a prior request is still open, so resume from it.
    if let Some(head) = gateway.find_branch_head(handle, &branch).await? {
        tracing::info!(
            branch = branch.as_str(),
            head = head.as_str(),
            "work-in-progress branch exists, resuming from it"
        );
        handle.redirect_working_branch(branch.clone());
    } else {
        tracing::info!(
            branch = branch.as_str(),
            "no work-in-progress branch, working from the default branch"
        );
    }

    let profile = users.user_profile(login).await?;

    let mut options_document = options::load_or_bootstrap(gateway, handle).await?;
    options_document.add_contributor(&profile, contributions);

    let mut listing = ListingSet::fetch(gateway, handle, &options_document).await?;
    listing.init();
    listing.generate(&options_document)?;

    let mut change_set = listing.into_change_set();
    change_set.stage(options_document.path(), options_document.pending_change()?);

    let intent = PullRequestIntent {
        title: format!("docs: add @{login} as a contributor"),
        body: format!(
            "Adds @{login} as a contributor for {tags}.\n\n\
             This was requested by {who} [in this comment]({location}).",
            tags = contributions.join(", "),
            who = reply.replying_to_who(),
            location = reply.replying_to_where(),
        ),
        head: branch.clone(),
        base: handle.default_branch().clone(),
    };

    match gateway
        .create_pull_request_from_files(handle, &intent, &change_set, &branch)
        .await
    {
        Ok(url) => {
            analytics.track(TelemetryEvent::PullRequestOpened {
                url: url.to_string(),
            });
            reply.reply(format!(
                "I've put up [a pull request]({url}) to add @{login}! :tada:"
            ));
            Ok(AddOutcome::Opened { url })
        }
        Err(BotError::PullRequestAlreadyOpen) => {
            // A human is already looking at the pending change; report the
            // outcome verbatim and finish successfully.
            analytics.track(TelemetryEvent::PullRequestAlreadyOpen);
            reply.reply(BotError::PullRequestAlreadyOpen.to_string());
            Ok(AddOutcome::AlreadyOpen)
        }
        Err(error) => Err(error),
    }
}
