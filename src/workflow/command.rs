//! Bot command model, mention guard, and the minimal comment parser.
//!
//! The orchestration core consumes only the parsed command; the grammar
//! here is deliberately small. It recognises the documented usage shape
//! (`@bot please add @login for tag, tag and tag`) and classifies anything
//! else as an unknown intent, which the handler answers with usage help.

/// A parsed bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Merge a contributor into the roll.
    AddContributor {
        /// Login of the contributor to add, without the leading `@`.
        login: String,
        /// Contribution-type tags, lowercased and deduplicated downstream.
        contributions: Vec<String>,
    },
    /// The comment addressed the bot but no intent could be determined.
    Unknown,
}

/// Whether a comment body addresses the bot at all.
///
/// Comments that merely contain the bot name without an `@` mention are
/// not for us.
#[must_use]
pub fn is_message_for_bot(body: &str, bot_login: &str) -> bool {
    let mention = format!("@{bot_login}").to_lowercase();
    body.to_lowercase().contains(&mention)
}

/// Parses a comment body into a [`BotCommand`].
#[must_use]
pub fn parse_comment(body: &str) -> BotCommand {
    let tokens: Vec<&str> = body.split_whitespace().collect();

    let Some(add_index) = tokens
        .iter()
        .position(|token| token.eq_ignore_ascii_case("add"))
    else {
        return BotCommand::Unknown;
    };
    let Some(login) = tokens
        .get(add_index + 1)
        .map(|token| clean_login(token))
        .filter(|login| !login.is_empty())
    else {
        return BotCommand::Unknown;
    };

    let Some(for_index) = tokens
        .iter()
        .enumerate()
        .skip(add_index + 2)
        .find_map(|(index, token)| token.eq_ignore_ascii_case("for").then_some(index))
    else {
        return BotCommand::Unknown;
    };
    let Some(tail) = tokens.get(for_index + 1..) else {
        return BotCommand::Unknown;
    };

    let contributions = parse_contributions(&tail.join(" "));
    if contributions.is_empty() {
        return BotCommand::Unknown;
    }

    BotCommand::AddContributor {
        login,
        contributions,
    }
}

fn clean_login(token: &str) -> String {
    token
        .trim_start_matches('@')
        .trim_end_matches(['.', ',', ':', ';', '!'])
        .to_owned()
}

fn parse_contributions(tail: &str) -> Vec<String> {
    let normalised = tail.replace(" and ", ",");
    let mut contributions = Vec::new();
    for part in normalised.split(',') {
        let tag = part
            .trim()
            .trim_end_matches(['.', '!'])
            .to_lowercase();
        if tag.is_empty() {
            continue;
        }
        if !contributions.contains(&tag) {
            contributions.push(tag);
        }
    }
    contributions
}
