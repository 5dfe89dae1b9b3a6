//! The contribution workflow: command parsing, orchestration, and replies.
//!
//! Entry point is [`process_issue_comment_safe`], which screens the event,
//! runs the add-contributor sequence, classifies failures, and settles the
//! request's reply and telemetry regardless of outcome.

mod add_contributor;
mod command;
mod handler;
mod reply;

pub use add_contributor::{AddOutcome, branch_name_for_login, process_add_contributor};
pub use command::{BotCommand, is_message_for_bot, parse_comment};
pub use handler::process_issue_comment_safe;
pub use reply::CommentReply;

#[cfg(test)]
mod tests;
