//! Deterministic rendering of the contributor table and badge.

use minijinja::{Environment, context};
use serde::Serialize;

use crate::github::error::BotError;
use crate::options::{ContributorEntry, OptionsDocument};

/// Emoji assigned to each known contribution-type tag.
///
/// Unknown tags render with a generic sparkle so new tag vocabularies never
/// break generation; the tag itself is kept in the cell's title attribute.
const CONTRIBUTION_SYMBOLS: &[(&str, &str)] = &[
    ("a11y", "\u{267f}"),
    ("audio", "\u{1f50a}"),
    ("blog", "\u{1f4dd}"),
    ("bug", "\u{1f41b}"),
    ("code", "\u{1f4bb}"),
    ("content", "\u{1f58b}"),
    ("data", "\u{1f523}"),
    ("design", "\u{1f3a8}"),
    ("doc", "\u{1f4d6}"),
    ("example", "\u{1f4a1}"),
    ("ideas", "\u{1f914}"),
    ("infra", "\u{1f687}"),
    ("maintenance", "\u{1f6a7}"),
    ("platform", "\u{1f4e6}"),
    ("plugin", "\u{1f50c}"),
    ("question", "\u{1f4ac}"),
    ("review", "\u{1f440}"),
    ("security", "\u{1f6e1}\u{fe0f}"),
    ("talk", "\u{1f4e2}"),
    ("test", "\u{26a0}\u{fe0f}"),
    ("tool", "\u{1f527}"),
    ("translation", "\u{1f30d}"),
    ("tutorial", "\u{2705}"),
    ("video", "\u{1f4f9}"),
];

const FALLBACK_SYMBOL: &str = "\u{2728}";

/// Grid template: one row per `contributors_per_line` chunk of the roll.
const TABLE_TEMPLATE: &str = "<table>\n\
{%- for row in contributors | batch(per_line) %}\n  <tr>\n\
{%- for contributor in row %}\n    \
<td align=\"center\"><a href=\"{{ contributor.profile }}\">\
<img src=\"{{ contributor.avatar_url }}?s={{ image_size }}\" \
width=\"{{ image_size }}px;\" alt=\"\"/><br />\
<sub><b>{{ contributor.name }}</b></sub></a><br />{{ contributor.symbols }}</td>\
{%- endfor %}\n  </tr>\n\
{%- endfor %}\n</table>";

#[derive(Debug, Serialize)]
struct TemplateContributor {
    name: String,
    profile: String,
    avatar_url: String,
    symbols: String,
}

impl TemplateContributor {
    fn from_entry(entry: &ContributorEntry) -> Self {
        let symbols = entry
            .contributions
            .iter()
            .map(|tag| {
                let symbol = CONTRIBUTION_SYMBOLS
                    .iter()
                    .find(|(known, _)| *known == tag.as_str())
                    .map_or(FALLBACK_SYMBOL, |(_, symbol)| symbol);
                format!("<span title=\"{tag}\">{symbol}</span>")
            })
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            name: entry.name.clone(),
            profile: entry.profile.clone(),
            avatar_url: entry.avatar_url.clone(),
            symbols,
        }
    }
}

/// Renders the contributor table for the document's current state.
///
/// Pure function of the document: identical state yields byte-identical
/// output. An empty roll renders to an empty string.
///
/// # Errors
///
/// Returns `BotError::Render` when the template engine fails.
pub(super) fn render_table(options: &OptionsDocument) -> Result<String, BotError> {
    let data = options.data();
    if data.contributors.is_empty() {
        return Ok(String::new());
    }

    let contributors: Vec<TemplateContributor> = data
        .contributors
        .iter()
        .map(TemplateContributor::from_entry)
        .collect();
    let per_line = data.contributors_per_line.max(1);

    let mut environment = Environment::new();
    environment
        .add_template("contributor_table.md", TABLE_TEMPLATE)
        .map_err(|error| BotError::Render {
            message: error.to_string(),
        })?;
    let template =
        environment
            .get_template("contributor_table.md")
            .map_err(|error| BotError::Render {
                message: error.to_string(),
            })?;

    template
        .render(context! {
            contributors => contributors,
            per_line => per_line,
            image_size => data.image_size,
        })
        .map_err(|error| BotError::Render {
            message: error.to_string(),
        })
}

/// Renders the contributor-count badge for the document's current state.
pub(super) fn render_badge(options: &OptionsDocument) -> String {
    let count = options.data().contributors.len();
    format!(
        "[![Contributors](https://img.shields.io/badge/contributors-{count}-orange.svg)](#contributors)"
    )
}

/// Replaces the text between `start` and `end` markers with `replacement`,
/// returning `None` when either marker is missing.
pub(super) fn replace_between(
    content: &str,
    start: &str,
    end: &str,
    replacement: &str,
) -> Option<String> {
    let start_index = content.find(start)? + start.len();
    let after_start = content.get(start_index..)?;
    let end_index = start_index + after_start.find(end)?;

    let head = content.get(..start_index)?;
    let tail = content.get(end_index..)?;
    Some(format!("{head}\n{replacement}\n{tail}"))
}
