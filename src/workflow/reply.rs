//! Reply buffer for the triggering comment thread.
//!
//! The workflow decides *what* text to send; delivery is a single gateway
//! call made by the handler once the request settles, so one request
//! produces at most one reply comment regardless of how many messages were
//! queued.

use crate::github::event::IssueCommentEvent;

/// Accumulates reply messages for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentReply {
    replying_to_login: String,
    replying_to_url: String,
    issue_number: u64,
    messages: Vec<String>,
}

impl CommentReply {
    /// Creates a buffer addressed at the event's comment author.
    #[must_use]
    pub fn for_event(event: &IssueCommentEvent) -> Self {
        Self {
            replying_to_login: event.comment.user.login.clone(),
            replying_to_url: event.comment.html_url.clone(),
            issue_number: event.issue.number,
            messages: Vec::new(),
        }
    }

    /// Queues one message.
    pub fn reply(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Login of the requester being replied to.
    #[must_use]
    pub fn replying_to_who(&self) -> &str {
        &self.replying_to_login
    }

    /// Direct link to the comment being replied to.
    #[must_use]
    pub fn replying_to_where(&self) -> &str {
        &self.replying_to_url
    }

    /// Issue or pull request number the reply belongs on.
    #[must_use]
    pub const fn issue_number(&self) -> u64 {
        self.issue_number
    }

    /// Composes the queued messages into one comment body.
    ///
    /// Returns `None` when nothing was queued, in which case no comment
    /// should be posted at all.
    #[must_use]
    pub fn compose(&self) -> Option<String> {
        if self.messages.is_empty() {
            return None;
        }
        Some(format!(
            "@{login}\n\n{body}",
            login = self.replying_to_login,
            body = self.messages.join("\n\n")
        ))
    }
}
