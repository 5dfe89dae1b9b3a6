//! Test helpers for constructing event and profile fixtures.
//!
//! This module provides builder functions for the payload shapes tests need
//! most, reducing boilerplate and keeping fixtures consistent across test
//! modules.

use super::UserProfile;
use crate::github::event::{
    EventComment, EventIssue, EventRepository, EventUser, IssueCommentEvent,
};

/// Constructs an `issue_comment` event with the given comment body.
///
/// The event targets `owner/repo` (default branch `main`), issue number 1,
/// and is authored by `requester`.
#[must_use]
pub fn comment_event(body: &str, requester: &str) -> IssueCommentEvent {
    IssueCommentEvent {
        action: "created".to_owned(),
        issue: EventIssue { number: 1 },
        comment: EventComment {
            id: 99,
            body: body.to_owned(),
            html_url: "https://github.com/owner/repo/issues/1#issuecomment-99".to_owned(),
            user: EventUser {
                login: requester.to_owned(),
            },
        },
        repository: EventRepository {
            name: "repo".to_owned(),
            owner: EventUser {
                login: "owner".to_owned(),
            },
            default_branch: "main".to_owned(),
        },
    }
}

/// Constructs a profile for `login` with derived placeholder URLs.
#[must_use]
pub fn profile_for(login: &str) -> UserProfile {
    UserProfile {
        login: login.to_owned(),
        name: login.to_owned(),
        avatar_url: format!("https://avatars.example/{login}"),
        profile_url: format!("https://github.com/{login}"),
    }
}
