//! Application configuration loaded from CLI, environment, and files.
//!
//! Values merge from command-line arguments, environment variables, and
//! configuration files using ortho-config's layered approach, with the
//! following precedence (lowest to highest):
//!
//! 1. **Defaults** – built-in application defaults
//! 2. **Configuration file** – `.rollcall.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `ROLLCALL_TOKEN`, or legacy
//!    `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--token`/`-t` and friends

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::BotError;

const DEFAULT_BOT_LOGIN: &str = "rollcall";
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `ROLLCALL_TOKEN`, `GITHUB_TOKEN`, or `--token`: authentication token
/// - `ROLLCALL_BOT_LOGIN` or `--bot-login`: login the bot answers to
/// - `ROLLCALL_EVENT_PATH` or `--event-path`: webhook event payload file
/// - `ROLLCALL_API_BASE` or `--api-base`: GitHub API base URL
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "ROLLCALL",
    discovery(
        dotfile_name = ".rollcall.toml",
        config_file_name = "rollcall.toml",
        app_name = "rollcall"
    )
)]
pub struct RollcallConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `ROLLCALL_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Login the bot answers to in comment mentions.
    ///
    /// Can be provided via:
    /// - CLI: `--bot-login <LOGIN>` or `-b <LOGIN>`
    /// - Environment: `ROLLCALL_BOT_LOGIN`
    /// - Config file: `bot_login = "..."`
    #[ortho_config(cli_short = 'b')]
    pub bot_login: Option<String>,

    /// Path of a file holding the webhook event payload JSON.
    ///
    /// When unset, the payload is read from standard input, which suits
    /// function-as-a-service hosts that pipe the event in.
    ///
    /// Can be provided via:
    /// - CLI: `--event-path <PATH>` or `-e <PATH>`
    /// - Environment: `ROLLCALL_EVENT_PATH`
    /// - Config file: `event_path = "..."`
    #[ortho_config(cli_short = 'e')]
    pub event_path: Option<String>,

    /// GitHub API base URL, overridable for GitHub Enterprise hosts.
    ///
    /// Can be provided via:
    /// - CLI: `--api-base <URL>`
    /// - Environment: `ROLLCALL_API_BASE`
    /// - Config file: `api_base = "..."`
    #[ortho_config()]
    pub api_base: Option<String>,
}

impl RollcallConfig {
    /// Resolves the authentication token, falling back to the legacy
    /// `GITHUB_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Configuration` when no token is available.
    pub fn resolve_token(&self) -> Result<String, BotError> {
        if let Some(token) = self.token.as_ref().filter(|value| !value.is_empty()) {
            return Ok(token.clone());
        }
        env::var("GITHUB_TOKEN")
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| BotError::Configuration {
                message: "personal access token is required".to_owned(),
            })
    }

    /// The login the bot answers to.
    #[must_use]
    pub fn resolve_bot_login(&self) -> &str {
        self.bot_login
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BOT_LOGIN)
    }

    /// The GitHub API base URL.
    #[must_use]
    pub fn resolve_api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_API_BASE)
    }
}
