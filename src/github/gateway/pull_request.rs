//! Pull request and comment helpers shared by the Octocrab gateway.

use octocrab::Octocrab;
use serde::Serialize;
use url::Url;

use crate::github::error::BotError;
use crate::github::handle::RepositoryHandle;
use crate::github::models::{ApiPullRequest, PullRequestIntent};

use super::error_mapping::{is_unprocessable, map_octocrab_error};

#[derive(Debug, Serialize)]
struct CreatePullRequestBody<'body> {
    title: &'body str,
    body: &'body str,
    head: &'body str,
    base: &'body str,
    maintainer_can_modify: bool,
}

#[derive(Debug, Serialize)]
struct CreateCommentBody<'body> {
    body: &'body str,
}

/// Opens the pull request described by `intent` and returns its HTML URL.
///
/// The pulls endpoint signals a duplicate open pull request with a 422
/// "unprocessable" outcome; that maps to
/// [`BotError::PullRequestAlreadyOpen`] so callers can treat it as an
/// already-satisfied terminal state.
pub(super) async fn open_pull_request(
    client: &Octocrab,
    handle: &RepositoryHandle,
    intent: &PullRequestIntent,
) -> Result<Url, BotError> {
    let route = format!(
        "/repos/{owner}/{repo}/pulls",
        owner = handle.owner().as_str(),
        repo = handle.name().as_str(),
    );
    let body = CreatePullRequestBody {
        title: &intent.title,
        body: &intent.body,
        head: intent.head.as_str(),
        base: intent.base.as_str(),
        maintainer_can_modify: true,
    };

    let response: ApiPullRequest = client.post(route, Some(&body)).await.map_err(|error| {
        if is_unprocessable(&error) {
            BotError::PullRequestAlreadyOpen
        } else {
            map_octocrab_error("create pull request", &error)
        }
    })?;

    Url::parse(&response.html_url).map_err(|error| BotError::Api {
        message: format!("create pull request returned an invalid URL: {error}"),
    })
}

/// Posts a comment on the issue or pull request thread.
pub(super) async fn post_issue_comment(
    client: &Octocrab,
    handle: &RepositoryHandle,
    issue_number: u64,
    body: &str,
) -> Result<(), BotError> {
    let route = format!(
        "/repos/{owner}/{repo}/issues/{issue_number}/comments",
        owner = handle.owner().as_str(),
        repo = handle.name().as_str(),
    );
    let payload = CreateCommentBody { body };

    let _ignored: serde_json::Value = client
        .post(route, Some(&payload))
        .await
        .map_err(|error| map_octocrab_error("create issue comment", &error))?;
    Ok(())
}
