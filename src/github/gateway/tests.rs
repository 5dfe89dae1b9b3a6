//! Tests for the Octocrab gateway implementations.

use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{OctocrabGateway, RepositoryGateway, UserGateway};
use crate::github::error::BotError;
use crate::github::handle::{
    BranchName, PersonalAccessToken, RepositoryHandle, RepositoryName, RepositoryOwner,
};
use crate::github::models::{PendingChange, PendingChangeSet, PullRequestIntent};

struct GatewayFixture {
    runtime: Runtime,
    server: MockServer,
    handle: RepositoryHandle,
    gateway: OctocrabGateway,
}

impl GatewayFixture {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

#[fixture]
fn token() -> PersonalAccessToken {
    PersonalAccessToken::new("valid-token").expect("token should be valid")
}

#[fixture]
fn gateway_fixture(token: PersonalAccessToken) -> GatewayFixture {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    let handle = test_handle();
    let gateway = {
        let _guard = runtime.enter();
        OctocrabGateway::for_token(&token, &server.uri()).expect("should create gateway")
    };
    GatewayFixture {
        runtime,
        server,
        handle,
        gateway,
    }
}

fn test_handle() -> RepositoryHandle {
    RepositoryHandle::new(
        RepositoryOwner::new("owner").expect("owner should be valid"),
        RepositoryName::new("repo").expect("name should be valid"),
        BranchName::new("main").expect("branch should be valid"),
    )
}

fn branch(name: &str) -> BranchName {
    BranchName::new(name).expect("branch should be valid")
}

fn not_found_response() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(serde_json::json!({
        "message": "Not Found",
        "documentation_url": "https://docs.github.com/rest"
    }))
}

#[rstest]
fn get_file_decodes_base64_content(gateway_fixture: GatewayFixture) {
    // GitHub wraps base64 bodies in newlines.
    let body = "eyJjb250cmlidXRv\ncnMiOltdfQo=";
    gateway_fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/contents/.rollcallrc"))
            .and(query_param("ref", "main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": body,
                "encoding": "base64",
                "sha": "abc123"
            })))
            .mount(&gateway_fixture.server),
    );

    let file = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .get_file(&gateway_fixture.handle, ".rollcallrc"),
        )
        .expect("file should load");

    assert_eq!(file.content, "{\"contributors\":[]}\n");
    assert_eq!(file.sha, "abc123");
}

#[rstest]
fn get_file_maps_missing_path_to_resource_not_found(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/contents/.rollcallrc"))
            .respond_with(not_found_response())
            .mount(&gateway_fixture.server),
    );

    let error = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .get_file(&gateway_fixture.handle, ".rollcallrc"),
        )
        .expect_err("missing file should fail");

    assert_eq!(
        error,
        BotError::ResourceNotFound {
            path: ".rollcallrc".to_owned()
        }
    );
}

#[rstest]
fn find_file_returns_none_for_missing_path(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/contents/README.md"))
            .respond_with(not_found_response())
            .mount(&gateway_fixture.server),
    );

    let file = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .find_file(&gateway_fixture.handle, "README.md"),
        )
        .expect("absence should not be an error");

    assert!(file.is_none());
}

#[rstest]
fn get_multiple_files_returns_every_requested_path(gateway_fixture: GatewayFixture) {
    for (file, body, sha) in [
        (".rollcallrc", "e30K", "options-sha"),
        ("README.md", "IyBEZW1vCg==", "readme-sha"),
    ] {
        gateway_fixture.block_on(
            Mock::given(method("GET"))
                .and(path(format!("/repos/owner/repo/contents/{file}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "content": body,
                    "encoding": "base64",
                    "sha": sha
                })))
                .mount(&gateway_fixture.server),
        );
    }

    let paths = vec![".rollcallrc".to_owned(), "README.md".to_owned()];
    let files = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .get_multiple_files(&gateway_fixture.handle, &paths),
        )
        .expect("fan-out fetch should succeed");

    assert_eq!(files.len(), 2);
    assert_eq!(
        files.get("README.md").map(|file| file.content.as_str()),
        Some("# Demo\n")
    );
}

#[rstest]
fn get_multiple_files_fails_the_whole_call_on_any_missing_path(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/contents/.rollcallrc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": "e30K",
                "encoding": "base64",
                "sha": "options-sha"
            })))
            .mount(&gateway_fixture.server),
    );
    gateway_fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/contents/README.md"))
            .respond_with(not_found_response())
            .mount(&gateway_fixture.server),
    );

    let paths = vec![".rollcallrc".to_owned(), "README.md".to_owned()];
    let error = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .get_multiple_files(&gateway_fixture.handle, &paths),
        )
        .expect_err("one missing path should fail the whole call");

    assert_eq!(
        error,
        BotError::ResourceNotFound {
            path: "README.md".to_owned()
        }
    );
}

#[rstest]
fn find_branch_head_returns_sha_for_existing_branch(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/git/ref/heads/add-alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ref": "refs/heads/add-alice",
                "object": { "sha": "feedbeef", "type": "commit" }
            })))
            .mount(&gateway_fixture.server),
    );

    let head = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .find_branch_head(&gateway_fixture.handle, &branch("add-alice")),
        )
        .expect("lookup should succeed");

    assert_eq!(head.as_deref(), Some("feedbeef"));
}

#[rstest]
fn find_branch_head_returns_none_for_missing_branch(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/git/ref/heads/add-alice"))
            .respond_with(not_found_response())
            .mount(&gateway_fixture.server),
    );

    let head = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .find_branch_head(&gateway_fixture.handle, &branch("add-alice")),
        )
        .expect("absence should not be an error");

    assert!(head.is_none());
}

#[rstest]
fn update_with_stale_token_maps_to_conflict(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("PUT"))
            .and(path("/repos/owner/repo/contents/.rollcallrc"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "message": ".rollcallrc does not match the expected sha",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&gateway_fixture.server),
    );

    let change = PendingChange {
        content: "{}\n".to_owned(),
        original_sha: Some("stale".to_owned()),
    };
    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.create_or_update_file(
            &gateway_fixture.handle,
            ".rollcallrc",
            &change,
            &branch("add-alice"),
        ))
        .expect_err("stale token should fail");

    assert!(matches!(error, BotError::Conflict { .. }));
}

#[rstest]
fn create_file_sends_create_semantics_without_sha(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("PUT"))
            .and(path("/repos/owner/repo/contents/.rollcallrc"))
            .and(body_partial_json(serde_json::json!({
                "message": "docs: create .rollcallrc",
                "branch": "add-alice"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "content": { "sha": "new" }
            })))
            .expect(1)
            .mount(&gateway_fixture.server),
    );

    let change = PendingChange {
        content: "{}\n".to_owned(),
        original_sha: None,
    };
    gateway_fixture
        .block_on(gateway_fixture.gateway.create_or_update_file(
            &gateway_fixture.handle,
            ".rollcallrc",
            &change,
            &branch("add-alice"),
        ))
        .expect("create should succeed");
}

#[rstest]
fn batched_writes_surface_applied_prefix_on_failure(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("PUT"))
            .and(path("/repos/owner/repo/contents/.rollcallrc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": { "sha": "updated" }
            })))
            .mount(&gateway_fixture.server),
    );
    gateway_fixture.block_on(
        Mock::given(method("PUT"))
            .and(path("/repos/owner/repo/contents/README.md"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "message": "server error"
            })))
            .mount(&gateway_fixture.server),
    );

    let mut change_set = PendingChangeSet::new();
    change_set.stage(
        ".rollcallrc",
        PendingChange {
            content: "{}\n".to_owned(),
            original_sha: Some("old".to_owned()),
        },
    );
    change_set.stage(
        "README.md",
        PendingChange {
            content: "# Demo\n".to_owned(),
            original_sha: Some("old".to_owned()),
        },
    );

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.create_or_update_files(
            &gateway_fixture.handle,
            &change_set,
            &branch("add-alice"),
        ))
        .expect_err("second write should fail");

    match error {
        BotError::PartialBatch { applied, path, .. } => {
            assert_eq!(applied, vec![".rollcallrc".to_owned()]);
            assert_eq!(path, "README.md");
        }
        other => panic!("expected PartialBatch, got {other:?}"),
    }
}

#[rstest]
fn create_pull_request_returns_html_url(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/repos/owner/repo/pulls"))
            .and(body_partial_json(serde_json::json!({
                "head": "add-alice",
                "base": "main",
                "maintainer_can_modify": true
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "html_url": "https://github.com/owner/repo/pull/7"
            })))
            .mount(&gateway_fixture.server),
    );

    let url = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .create_pull_request(&gateway_fixture.handle, &sample_intent()),
        )
        .expect("pull request should open");

    assert_eq!(url.as_str(), "https://github.com/owner/repo/pull/7");
}

#[rstest]
fn duplicate_pull_request_maps_to_already_open(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/repos/owner/repo/pulls"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "message": "Validation Failed",
                "errors": [{ "message": "A pull request already exists for owner:add-alice." }],
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&gateway_fixture.server),
    );

    let error = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .create_pull_request(&gateway_fixture.handle, &sample_intent()),
        )
        .expect_err("duplicate should fail");

    assert_eq!(error, BotError::PullRequestAlreadyOpen);
}

#[rstest]
fn composite_publish_creates_branch_writes_files_and_opens_pr(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/git/ref/heads/main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ref": "refs/heads/main",
                "object": { "sha": "defaulthead", "type": "commit" }
            })))
            .expect(1)
            .mount(&gateway_fixture.server),
    );
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/repos/owner/repo/git/refs"))
            .and(body_partial_json(serde_json::json!({
                "ref": "refs/heads/add-alice",
                "sha": "defaulthead"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "ref": "refs/heads/add-alice",
                "object": { "sha": "defaulthead" }
            })))
            .expect(1)
            .mount(&gateway_fixture.server),
    );
    gateway_fixture.block_on(
        Mock::given(method("PUT"))
            .and(path("/repos/owner/repo/contents/.rollcallrc"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "content": { "sha": "written" }
            })))
            .expect(1)
            .mount(&gateway_fixture.server),
    );
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/repos/owner/repo/pulls"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "html_url": "https://github.com/owner/repo/pull/8"
            })))
            .expect(1)
            .mount(&gateway_fixture.server),
    );

    let mut change_set = PendingChangeSet::new();
    change_set.stage(
        ".rollcallrc",
        PendingChange {
            content: "{}\n".to_owned(),
            original_sha: None,
        },
    );

    let url = gateway_fixture
        .block_on(gateway_fixture.gateway.create_pull_request_from_files(
            &gateway_fixture.handle,
            &sample_intent(),
            &change_set,
            &branch("add-alice"),
        ))
        .expect("composite publish should succeed");

    assert_eq!(url.as_str(), "https://github.com/owner/repo/pull/8");
}

#[rstest]
fn composite_publish_skips_branch_creation_on_resumed_branch(gateway_fixture: GatewayFixture) {
    let mut handle = gateway_fixture.handle.clone();
    handle.redirect_working_branch(branch("add-alice"));

    gateway_fixture.block_on(
        Mock::given(method("PUT"))
            .and(path("/repos/owner/repo/contents/.rollcallrc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": { "sha": "written" }
            })))
            .expect(1)
            .mount(&gateway_fixture.server),
    );
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/repos/owner/repo/pulls"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "html_url": "https://github.com/owner/repo/pull/8"
            })))
            .expect(1)
            .mount(&gateway_fixture.server),
    );

    let mut change_set = PendingChangeSet::new();
    change_set.stage(
        ".rollcallrc",
        PendingChange {
            content: "{}\n".to_owned(),
            original_sha: Some("old".to_owned()),
        },
    );

    let url = gateway_fixture
        .block_on(gateway_fixture.gateway.create_pull_request_from_files(
            &handle,
            &sample_intent(),
            &change_set,
            &branch("add-alice"),
        ))
        .expect("resumed publish should succeed");

    assert_eq!(url.as_str(), "https://github.com/owner/repo/pull/8");
}

#[rstest]
fn user_profile_falls_back_to_login_and_html_url(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/users/carol"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "carol",
                "name": serde_json::Value::Null,
                "avatar_url": "https://avatars.example/carol",
                "blog": "",
                "html_url": "https://github.com/carol"
            })))
            .mount(&gateway_fixture.server),
    );

    let profile = gateway_fixture
        .block_on(gateway_fixture.gateway.user_profile("carol"))
        .expect("profile should load");

    assert_eq!(profile.name, "carol");
    assert_eq!(profile.profile_url, "https://github.com/carol");
}

fn sample_intent() -> PullRequestIntent {
    PullRequestIntent {
        title: "docs: add @alice as a contributor".to_owned(),
        body: "Adds @alice as a contributor for code.".to_owned(),
        head: branch("add-alice"),
        base: branch("main"),
    }
}
