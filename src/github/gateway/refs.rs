//! Git ref helpers shared by the Octocrab gateway.

use octocrab::Octocrab;
use serde::Serialize;

use crate::github::error::BotError;
use crate::github::handle::{BranchName, RepositoryHandle};
use crate::github::models::ApiGitRef;

use super::error_mapping::{is_not_found, map_octocrab_error};

#[derive(Debug, Serialize)]
struct CreateRefBody {
    r#ref: String,
    sha: String,
}

/// Looks up the head commit sha of `branch`, returning `None` when the
/// branch does not exist.
pub(super) async fn fetch_branch_head(
    client: &Octocrab,
    handle: &RepositoryHandle,
    branch: &BranchName,
) -> Result<Option<String>, BotError> {
    let route = format!(
        "/repos/{owner}/{repo}/git/ref/heads/{branch}",
        owner = handle.owner().as_str(),
        repo = handle.name().as_str(),
        branch = branch.as_str(),
    );
    let response = client.get::<ApiGitRef, _, _>(route, None::<&()>).await;

    match response {
        Ok(reference) => Ok(Some(reference.object.sha)),
        Err(error) if is_not_found(&error) => Ok(None),
        Err(error) => Err(map_octocrab_error("get branch head", &error)),
    }
}

/// Creates `branch` pointing at the current head of the default branch.
pub(super) async fn create_branch_from_default(
    client: &Octocrab,
    handle: &RepositoryHandle,
    branch: &BranchName,
) -> Result<(), BotError> {
    let default_branch = handle.default_branch();
    let head = fetch_branch_head(client, handle, default_branch)
        .await?
        .ok_or_else(|| BotError::BranchNotFound {
            branch: default_branch.as_str().to_owned(),
        })?;

    let route = format!(
        "/repos/{owner}/{repo}/git/refs",
        owner = handle.owner().as_str(),
        repo = handle.name().as_str(),
    );
    let body = CreateRefBody {
        r#ref: format!("refs/heads/{}", branch.as_str()),
        sha: head,
    };

    let _ignored: serde_json::Value = client
        .post(route, Some(&body))
        .await
        .map_err(|error| map_octocrab_error("create branch", &error))?;
    Ok(())
}
