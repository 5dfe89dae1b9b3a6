//! Contents API helpers shared by the Octocrab gateway.
//!
//! File bodies cross the wire base64-encoded in both directions, which
//! keeps the transport binary-safe and reversible.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use octocrab::Octocrab;
use serde::Serialize;

use crate::github::error::BotError;
use crate::github::handle::{BranchName, RepositoryHandle};
use crate::github::models::{ApiContentFile, PendingChange, RemoteFile};

use super::error_mapping::{is_not_found, map_octocrab_error};

#[derive(Debug, Serialize)]
struct RefQuery<'query> {
    r#ref: &'query str,
}

#[derive(Debug, Serialize)]
struct PutContentBody<'body> {
    message: String,
    content: String,
    branch: &'body str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'body str>,
}

fn contents_route(handle: &RepositoryHandle, path: &str) -> String {
    format!(
        "/repos/{owner}/{repo}/contents/{path}",
        owner = handle.owner().as_str(),
        repo = handle.name().as_str(),
    )
}

/// Fetches `path` at `branch`, returning `None` when the remote reports the
/// file absent.
pub(super) async fn fetch_file(
    client: &Octocrab,
    handle: &RepositoryHandle,
    path: &str,
    branch: &BranchName,
) -> Result<Option<RemoteFile>, BotError> {
    let query = RefQuery {
        r#ref: branch.as_str(),
    };
    let response = client
        .get::<ApiContentFile, _, _>(contents_route(handle, path), Some(&query))
        .await;

    match response {
        Ok(file) => decode_content(path, &file).map(Some),
        Err(error) if is_not_found(&error) => Ok(None),
        Err(error) => Err(map_octocrab_error("get file", &error)),
    }
}

/// Writes one staged change to `branch` via the contents endpoint.
///
/// Create vs update is chosen by the change's original revision token, the
/// same way the endpoint itself distinguishes the two.
pub(super) async fn put_file(
    client: &Octocrab,
    handle: &RepositoryHandle,
    path: &str,
    change: &PendingChange,
    branch: &BranchName,
) -> Result<(), BotError> {
    let (verb, operation) = match change.original_sha {
        None => ("create", "create file"),
        Some(_) => ("update", "update file"),
    };
    let body = PutContentBody {
        message: format!("docs: {verb} {path}"),
        content: BASE64.encode(change.content.as_bytes()),
        branch: branch.as_str(),
        sha: change.original_sha.as_deref(),
    };

    let _ignored: serde_json::Value = client
        .put(contents_route(handle, path), Some(&body))
        .await
        .map_err(|error| map_octocrab_error(operation, &error))?;
    Ok(())
}

fn decode_content(path: &str, file: &ApiContentFile) -> Result<RemoteFile, BotError> {
    let Some(encoded) = file.content.as_deref() else {
        return Err(BotError::Api {
            message: format!("get file '{path}' did not return a file body"),
        });
    };
    if file.encoding.as_deref() != Some("base64") {
        return Err(BotError::Api {
            message: format!(
                "get file '{path}' used unsupported encoding {encoding:?}",
                encoding = file.encoding
            ),
        });
    }

    // GitHub wraps base64 bodies in newlines; strip before decoding.
    let compact: String = encoded
        .chars()
        .filter(|character| !character.is_ascii_whitespace())
        .collect();
    let bytes = BASE64.decode(compact).map_err(|error| BotError::Api {
        message: format!("get file '{path}' body is not valid base64: {error}"),
    })?;
    let content = String::from_utf8(bytes).map_err(|error| BotError::Api {
        message: format!("get file '{path}' body is not valid UTF-8: {error}"),
    })?;

    Ok(RemoteFile {
        content,
        sha: file.sha.clone(),
    })
}
