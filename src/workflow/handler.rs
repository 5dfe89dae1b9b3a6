//! Top-level comment-event handler.
//!
//! Screens inbound events, dispatches parsed commands to the orchestrator,
//! and owns the request's terminal bookkeeping: error classification, the
//! single reply comment, and the telemetry drain that runs regardless of
//! outcome.

use std::sync::Arc;

use crate::github::error::BotError;
use crate::github::event::IssueCommentEvent;
use crate::github::gateway::{RepositoryGateway, UserGateway};
use crate::telemetry::{Analytics, TelemetryEvent, TelemetrySink};

use super::add_contributor::process_add_contributor;
use super::command::{BotCommand, is_message_for_bot, parse_comment};
use super::reply::CommentReply;

async fn process_issue_comment(
    event: &IssueCommentEvent,
    gateway: &dyn RepositoryGateway,
    users: &dyn UserGateway,
    bot_login: &str,
    reply: &mut CommentReply,
    analytics: &mut Analytics,
) -> Result<(), BotError> {
    let mut handle = event.repository_handle()?;
    analytics.track(TelemetryEvent::CommentReceived {
        repository: handle.full_name(),
    });

    match parse_comment(&event.comment.body) {
        BotCommand::AddContributor {
            login,
            contributions,
        } => {
            analytics.track(TelemetryEvent::ContributorAddRequested {
                login: login.clone(),
                contribution_count: contributions.len(),
            });
            process_add_contributor(
                gateway,
                users,
                &mut handle,
                reply,
                analytics,
                &login,
                &contributions,
            )
            .await?;
            Ok(())
        }
        BotCommand::Unknown => {
            reply.reply("I could not determine your intention.");
            reply.reply(format!(
                "Basic usage: @{bot_login} please add @jakebolam for code, doc and infra"
            ));
            reply.reply("For other usage see the documentation.");
            Ok(())
        }
    }
}

/// Whether the handler should react to this event at all.
///
/// Events are screened out when the comment is not newly created, when it
/// does not mention the bot, or when the bot itself wrote it (which would
/// otherwise loop on the bot's own replies).
fn should_process(event: &IssueCommentEvent, bot_login: &str) -> bool {
    event.action == "created"
        && !event.comment.user.login.eq_ignore_ascii_case(bot_login)
        && is_message_for_bot(&event.comment.body, bot_login)
}

/// Processes one `issue_comment` event end to end.
///
/// Domain errors are reported verbatim in the comment thread and consume
/// the error; infrastructure errors produce a generic retry-later reply,
/// are logged in full, and are re-raised so the hosting layer can record
/// them. The reply is delivered and the telemetry queue drained before
/// this function returns, on every path.
///
/// # Errors
///
/// Returns the original infrastructure error after logging and replying.
pub async fn process_issue_comment_safe(
    event: &IssueCommentEvent,
    gateway: &dyn RepositoryGateway,
    users: &dyn UserGateway,
    bot_login: &str,
    sink: Arc<dyn TelemetrySink>,
) -> Result<(), BotError> {
    let mut analytics = Analytics::new(sink);
    if !should_process(event, bot_login) {
        tracing::debug!("ignoring comment event not addressed to the bot");
        return Ok(());
    }

    let mut reply = CommentReply::for_event(event);
    let result = process_issue_comment(
        event,
        gateway,
        users,
        bot_login,
        &mut reply,
        &mut analytics,
    )
    .await;

    let outcome = match result {
        Ok(()) => Ok(()),
        Err(error) if error.is_user_facing() => {
            tracing::info!("bot outcome reported to user: {error}");
            analytics.track(TelemetryEvent::RequestFailed { user_facing: true });
            reply.reply(error.to_string());
            Ok(())
        }
        Err(error) => {
            tracing::error!("request failed: {error}");
            analytics.track(TelemetryEvent::RequestFailed { user_facing: false });
            reply.reply("We had trouble processing your request. Please try again later.");
            Err(error)
        }
    };

    deliver_reply(event, gateway, &reply).await;
    analytics.drain().await;
    outcome
}

/// Delivers the buffered reply as one comment; delivery failures are
/// logged, never allowed to mask the request outcome.
async fn deliver_reply(
    event: &IssueCommentEvent,
    gateway: &dyn RepositoryGateway,
    reply: &CommentReply,
) {
    let Some(body) = reply.compose() else {
        return;
    };
    match event.repository_handle() {
        Ok(handle) => {
            if let Err(error) = gateway
                .create_issue_comment(&handle, reply.issue_number(), &body)
                .await
            {
                tracing::error!("failed to deliver reply comment: {error}");
            }
        }
        Err(error) => tracing::error!("failed to address reply comment: {error}"),
    }
}
