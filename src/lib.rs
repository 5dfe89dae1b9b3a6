//! Rollcall library crate: a GitHub bot that maintains a contributor roll.
//!
//! The library wraps Octocrab behind trait-based gateways, merges requested
//! contributors into a repository's `.rollcallrc` options document,
//! regenerates the contributor listings that document names, and opens (or
//! resumes) a pull request carrying the changes. Errors are mapped into a
//! closed taxonomy so that callers can distinguish user-facing bot outcomes
//! from infrastructure failures.

pub mod config;
pub mod github;
pub mod listing;
pub mod options;
pub mod telemetry;
pub mod workflow;

pub use config::RollcallConfig;
pub use github::{
    BotError, BranchName, IssueCommentEvent, OctocrabGateway, PendingChange, PendingChangeSet,
    PersonalAccessToken, PullRequestIntent, RemoteFile, RepositoryGateway, RepositoryHandle,
    UserGateway, UserProfile,
};
pub use options::OptionsDocument;
pub use workflow::{AddOutcome, BotCommand, CommentReply, process_issue_comment_safe};
