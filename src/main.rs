//! Rollcall entrypoint: processes one webhook event per invocation.
//!
//! The event payload is read from the configured event file or from
//! standard input, which suits a function-as-a-service host that pipes the
//! event in and inspects the exit code.

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoConfig;

use rollcall::telemetry::{StderrJsonlTelemetrySink, TelemetrySink};
use rollcall::{
    BotError, IssueCommentEvent, OctocrabGateway, PersonalAccessToken, RollcallConfig,
    process_issue_comment_safe,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), BotError> {
    let config = load_config()?;

    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let gateway = OctocrabGateway::for_token(&token, config.resolve_api_base())?;
    let event = IssueCommentEvent::from_json(&read_event_payload(config.event_path.as_deref())?)?;
    let sink: Arc<dyn TelemetrySink> = Arc::new(StderrJsonlTelemetrySink);

    process_issue_comment_safe(
        &event,
        &gateway,
        &gateway,
        config.resolve_bot_login(),
        sink,
    )
    .await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`BotError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<RollcallConfig, BotError> {
    RollcallConfig::load().map_err(|error| BotError::Configuration {
        message: error.to_string(),
    })
}

/// Reads the event payload from `event_path`, or from standard input when
/// no path is configured.
fn read_event_payload(event_path: Option<&str>) -> Result<String, BotError> {
    match event_path {
        Some(path) => fs::read_to_string(path).map_err(|error| BotError::Io {
            message: format!("failed to read event payload '{path}': {error}"),
        }),
        None => {
            let mut payload = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut payload)
                .map_err(|error| BotError::Io {
                    message: format!("failed to read event payload from stdin: {error}"),
                })?;
            Ok(payload)
        }
    }
}
