//! Tests for the add-contributor workflow and the safe handler.

use std::sync::{Arc, Mutex};

use rstest::rstest;
use url::Url;

use super::{branch_name_for_login, process_issue_comment_safe};
use crate::github::error::BotError;
use crate::github::event::IssueCommentEvent;
use crate::github::gateway::{MockRepositoryGateway, MockUserGateway};
use crate::github::handle::BranchName;
use crate::github::models::test_support::{comment_event, profile_for};
use crate::github::models::{PendingChangeSet, PullRequestIntent, RemoteFile};
use crate::listing::{LIST_END, LIST_START};
use crate::telemetry::test_support::RecordingSink;
use crate::telemetry::{TelemetryEvent, TelemetrySink};

const BOT_LOGIN: &str = "rollcall";

type PublishCapture = Arc<Mutex<Option<(PullRequestIntent, PendingChangeSet, BranchName)>>>;
type ReplyCapture = Arc<Mutex<Vec<String>>>;

fn capture_publish(gateway: &mut MockRepositoryGateway, url: &'static str) -> PublishCapture {
    let captured: PublishCapture = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&captured);
    gateway
        .expect_create_pull_request_from_files()
        .returning(move |_, intent, change_set, branch| {
            *slot.lock().expect("capture mutex should be available") =
                Some((intent.clone(), change_set.clone(), branch.clone()));
            Ok(Url::parse(url).expect("test url should parse"))
        });
    captured
}

fn capture_replies(gateway: &mut MockRepositoryGateway) -> ReplyCapture {
    let replies: ReplyCapture = Arc::new(Mutex::new(Vec::new()));
    let slot = Arc::clone(&replies);
    gateway
        .expect_create_issue_comment()
        .returning(move |_, _, body| {
            slot.lock()
                .expect("reply mutex should be available")
                .push(body.to_owned());
            Ok(())
        });
    replies
}

async fn run_handler(
    event: &IssueCommentEvent,
    gateway: &MockRepositoryGateway,
    users: &MockUserGateway,
    sink: &Arc<RecordingSink>,
) -> Result<(), BotError> {
    process_issue_comment_safe(
        event,
        gateway,
        users,
        BOT_LOGIN,
        Arc::clone(sink) as Arc<dyn TelemetrySink>,
    )
    .await
}

fn options_raw_for_alice() -> String {
    concat!(
        "{\n",
        "  \"projectName\": \"repo\",\n",
        "  \"projectOwner\": \"owner\",\n",
        "  \"files\": [\"README.md\"],\n",
        "  \"contributors\": [\n",
        "    {\n",
        "      \"login\": \"alice\",\n",
        "      \"name\": \"alice name\",\n",
        "      \"avatar_url\": \"https://avatars.example/alice\",\n",
        "      \"profile\": \"https://github.com/alice\",\n",
        "      \"contributions\": [\"doc\"]\n",
        "    }\n",
        "  ]\n",
        "}\n",
    )
    .to_owned()
}

#[rstest]
#[case("carol", "add-carol")]
#[case("Carol", "add-carol")]
#[case("mr.bot", "add-mr_2ebot")]
#[case("héllo", "add-h_c3_a9llo")]
fn branch_names_are_stable_and_collision_free(#[case] login: &str, #[case] expected: &str) {
    assert_eq!(branch_name_for_login(login), expected);
}

#[tokio::test]
async fn fresh_request_opens_pull_request_with_bootstrapped_state() {
    let event = comment_event("@rollcall please add @carol for doc, design", "maintainer");
    let sink = Arc::new(RecordingSink::default());

    let mut gateway = MockRepositoryGateway::new();
    gateway
        .expect_find_branch_head()
        .returning(|_, _| Ok(None));
    gateway.expect_find_file().returning(|_, _| Ok(None));
    let published = capture_publish(&mut gateway, "https://github.com/owner/repo/pull/7");
    let replies = capture_replies(&mut gateway);

    let mut users = MockUserGateway::new();
    users
        .expect_user_profile()
        .returning(|login| Ok(profile_for(login)));

    run_handler(&event, &gateway, &users, &sink)
        .await
        .expect("fresh request should succeed");

    let (intent, change_set, branch) = published
        .lock()
        .expect("capture mutex should be available")
        .clone()
        .expect("publish should have happened");

    assert_eq!(branch.as_str(), "add-carol");
    assert_eq!(intent.title, "docs: add @carol as a contributor");
    assert_eq!(intent.base.as_str(), "main");
    assert_eq!(change_set.len(), 2);

    let options_change = change_set
        .get(".rollcallrc")
        .expect("options document should be staged");
    assert!(options_change.original_sha.is_none());
    assert!(options_change.content.contains("\"login\": \"carol\""));
    assert!(options_change.content.contains("\"doc\""));
    assert!(options_change.content.contains("\"design\""));

    let readme_change = change_set
        .get("README.md")
        .expect("listing should be staged");
    assert!(readme_change.original_sha.is_none());
    assert!(readme_change.content.contains(LIST_START));
    assert!(readme_change.content.contains("carol"));

    let reply_bodies = replies.lock().expect("reply mutex should be available");
    assert_eq!(reply_bodies.len(), 1);
    assert!(reply_bodies.first().is_some_and(|body| {
        body.starts_with("@maintainer") && body.contains("I've put up")
    }));

    let events = sink.take();
    assert!(events.contains(&TelemetryEvent::ContributorAddRequested {
        login: "carol".to_owned(),
        contribution_count: 2,
    }));
    assert!(events.contains(&TelemetryEvent::PullRequestOpened {
        url: "https://github.com/owner/repo/pull/7".to_owned(),
    }));
}

#[tokio::test]
async fn resumed_request_reads_state_from_wip_branch_and_unions_tags() {
    let event = comment_event("@rollcall please add @alice for code", "maintainer");
    let sink = Arc::new(RecordingSink::default());
    let read_branches: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let mut gateway = MockRepositoryGateway::new();
    gateway
        .expect_find_branch_head()
        .returning(|_, _| Ok(Some("feedbeef".to_owned())));
    let reads = Arc::clone(&read_branches);
    gateway.expect_find_file().returning(move |handle, path| {
        reads
            .lock()
            .expect("reads mutex should be available")
            .push(handle.working_branch().as_str().to_owned());
        if path == ".rollcallrc" {
            Ok(Some(RemoteFile {
                content: options_raw_for_alice(),
                sha: "options-sha".to_owned(),
            }))
        } else {
            Ok(Some(RemoteFile {
                content: format!("{LIST_START}\n{LIST_END}\n"),
                sha: "readme-sha".to_owned(),
            }))
        }
    });
    let published = capture_publish(&mut gateway, "https://github.com/owner/repo/pull/9");
    let _replies = capture_replies(&mut gateway);

    let mut users = MockUserGateway::new();
    users
        .expect_user_profile()
        .returning(|login| Ok(profile_for(login)));

    run_handler(&event, &gateway, &users, &sink)
        .await
        .expect("resumed request should succeed");

    // Every file read happened on the redirected work-in-progress branch.
    let branches = read_branches
        .lock()
        .expect("reads mutex should be available");
    assert!(!branches.is_empty());
    assert!(branches.iter().all(|branch| branch == "add-alice"));

    let (_, change_set, _) = published
        .lock()
        .expect("capture mutex should be available")
        .clone()
        .expect("publish should have happened");
    let options_change = change_set
        .get(".rollcallrc")
        .expect("options document should be staged");
    assert_eq!(options_change.original_sha.as_deref(), Some("options-sha"));
    assert!(options_change.content.contains("\"doc\""));
    assert!(options_change.content.contains("\"code\""));
    // Still exactly one entry for alice.
    assert_eq!(options_change.content.matches("\"login\"").count(), 1);
}

#[tokio::test]
async fn second_invocation_with_open_pull_request_converges() {
    let event = comment_event("@rollcall please add @alice for doc", "maintainer");
    let sink = Arc::new(RecordingSink::default());

    let mut gateway = MockRepositoryGateway::new();
    gateway
        .expect_find_branch_head()
        .returning(|_, _| Ok(Some("feedbeef".to_owned())));
    gateway.expect_find_file().returning(|_, path| {
        if path == ".rollcallrc" {
            Ok(Some(RemoteFile {
                content: options_raw_for_alice(),
                sha: "options-sha".to_owned(),
            }))
        } else {
            Ok(Some(RemoteFile {
                content: format!("{LIST_START}\n{LIST_END}\n"),
                sha: "readme-sha".to_owned(),
            }))
        }
    });
    gateway
        .expect_create_pull_request_from_files()
        .returning(|_, _, _, _| Err(BotError::PullRequestAlreadyOpen));
    let replies = capture_replies(&mut gateway);

    let mut users = MockUserGateway::new();
    users
        .expect_user_profile()
        .returning(|login| Ok(profile_for(login)));

    run_handler(&event, &gateway, &users, &sink)
        .await
        .expect("duplicate pull request should not fail the request");

    let reply_bodies = replies.lock().expect("reply mutex should be available");
    assert!(reply_bodies.first().is_some_and(|body| {
        body.contains("Pull request is already open")
    }));

    let events = sink.take();
    assert!(events.contains(&TelemetryEvent::PullRequestAlreadyOpen));
    assert!(!events.iter().any(|recorded| matches!(
        recorded,
        TelemetryEvent::RequestFailed { .. }
    )));
}

#[tokio::test]
async fn infrastructure_error_replies_generically_and_reraises() {
    let event = comment_event("@rollcall please add @carol for doc", "maintainer");
    let sink = Arc::new(RecordingSink::default());

    let mut gateway = MockRepositoryGateway::new();
    gateway
        .expect_find_branch_head()
        .returning(|_, _| Ok(None));
    let replies = capture_replies(&mut gateway);

    let mut users = MockUserGateway::new();
    users.expect_user_profile().returning(|_| {
        Err(BotError::Api {
            message: "get user failed with status 500".to_owned(),
        })
    });

    let result = run_handler(&event, &gateway, &users, &sink).await;

    assert!(matches!(result, Err(BotError::Api { .. })));

    let reply_bodies = replies.lock().expect("reply mutex should be available");
    assert!(reply_bodies.first().is_some_and(|body| {
        body.contains("We had trouble processing your request")
    }));
    // The queue was drained even though the request failed.
    assert!(sink.take().contains(&TelemetryEvent::RequestFailed {
        user_facing: false
    }));
}

#[tokio::test]
async fn comments_not_addressed_to_the_bot_are_ignored() {
    let event = comment_event("please add @carol for doc", "maintainer");
    let sink = Arc::new(RecordingSink::default());
    let gateway = MockRepositoryGateway::new();
    let users = MockUserGateway::new();

    run_handler(&event, &gateway, &users, &sink)
        .await
        .expect("unaddressed comments should be ignored");

    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn the_bots_own_comments_are_ignored() {
    let event = comment_event("@rollcall please add @carol for doc", BOT_LOGIN);
    let sink = Arc::new(RecordingSink::default());
    let gateway = MockRepositoryGateway::new();
    let users = MockUserGateway::new();

    run_handler(&event, &gateway, &users, &sink)
        .await
        .expect("the bot's own comments should be ignored");

    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn unknown_intent_replies_with_usage_help() {
    let event = comment_event("@rollcall please dance", "maintainer");
    let sink = Arc::new(RecordingSink::default());

    let mut gateway = MockRepositoryGateway::new();
    let replies = capture_replies(&mut gateway);
    let users = MockUserGateway::new();

    run_handler(&event, &gateway, &users, &sink)
        .await
        .expect("unknown intent should not fail");

    let reply_bodies = replies.lock().expect("reply mutex should be available");
    assert_eq!(reply_bodies.len(), 1);
    assert!(reply_bodies.first().is_some_and(|body| {
        body.contains("I could not determine your intention.")
            && body.contains("Basic usage: @rollcall please add @jakebolam")
    }));
}
