//! User profile helper shared by the Octocrab gateway.

use octocrab::Octocrab;

use crate::github::error::BotError;
use crate::github::models::{ApiUser, UserProfile};

use super::error_mapping::map_octocrab_error;

/// Resolves `login` to profile data via the users endpoint.
pub(super) async fn fetch_user_profile(
    client: &Octocrab,
    login: &str,
) -> Result<UserProfile, BotError> {
    client
        .get::<ApiUser, _, _>(format!("/users/{login}"), None::<&()>)
        .await
        .map(ApiUser::into)
        .map_err(|error| map_octocrab_error("get user", &error))
}
