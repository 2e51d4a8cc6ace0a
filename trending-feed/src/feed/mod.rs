//! Feed assembly and rendering.
//!
//! Accepted entries become one [`FeedModel`], which is rendered twice: once
//! as Atom 1.0 and once as RSS 2.0. Both documents carry identical items.

mod atom;
mod error;
mod rss;
mod xml;

pub use error::RenderError;

use crate::dedup::FilteredEntry;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use url::Url;

/// Feed header settings, the `[feed]` section of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FeedSettings {
    /// Feed title.
    pub title: String,
    /// Feed home page.
    pub link: String,
    /// Feed description.
    pub description: String,
    /// Publisher name.
    pub author_name: String,
    /// Publisher email.
    pub author_email: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            title: "github today's trending".to_string(),
            link: "https://github.com/trending".to_string(),
            description: "Github trending feed".to_string(),
            author_name: "trending-feed".to_string(),
            author_email: "trending-feed@users.noreply.github.com".to_string(),
        }
    }
}

/// Output serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedFormat {
    /// Atom 1.0.
    Atom,
    /// RSS 2.0.
    Rss,
}

impl FeedFormat {
    /// Both formats, in persistence order.
    pub const ALL: [FeedFormat; 2] = [FeedFormat::Atom, FeedFormat::Rss];

    /// Suffix appended to the state path for this format.
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Atom => ".atom",
            Self::Rss => ".rss",
        }
    }

    /// MIME type of the rendered document.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Atom => "application/atom+xml",
            Self::Rss => "application/rss+xml",
        }
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Atom => "atom",
            Self::Rss => "rss",
        })
    }
}

/// Fixed publisher identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publisher {
    pub name: String,
    pub email: String,
}

/// Credited author of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAuthor {
    pub name: String,
    /// Profile URL, or the unknown-author placeholder.
    pub url: String,
}

/// One feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub author: ItemAuthor,
    pub created: DateTime<Utc>,
}

/// Canonical feed content shared by both serializations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedModel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author: Publisher,
    pub created: DateTime<Utc>,
    pub items: Vec<FeedItem>,
}

/// Derives an item title.
///
/// The description is the display text, falling back to the identifier when
/// empty. A non-empty language label is appended as ` [<language>]`.
#[must_use]
pub fn derive_title(name: &str, description: &str, language: &str) -> String {
    let text = if description.is_empty() {
        name
    } else {
        description
    };
    if language.is_empty() {
        text.to_string()
    } else {
        format!("{text} [{language}]")
    }
}

/// Maps accepted entries to a feed stamped with `run_time`.
///
/// Every item carries the run time as its creation time: the feed is a
/// snapshot of one batch, not of per-project publish dates.
#[must_use]
pub fn assemble(
    entries: &[FilteredEntry],
    settings: &FeedSettings,
    run_time: DateTime<Utc>,
) -> FeedModel {
    let items = entries
        .iter()
        .map(|entry| FeedItem {
            title: derive_title(&entry.name, &entry.description, &entry.language),
            link: entry.url.clone(),
            author: ItemAuthor {
                name: entry.author.clone(),
                url: entry.author_url.clone(),
            },
            created: run_time,
        })
        .collect();

    FeedModel {
        title: settings.title.clone(),
        link: settings.link.clone(),
        description: settings.description.clone(),
        author: Publisher {
            name: settings.author_name.clone(),
            email: settings.author_email.clone(),
        },
        created: run_time,
        items,
    }
}

/// Renders `model` in `format`.
///
/// # Errors
///
/// Returns [`RenderError`] if the model lacks a title or links, or a link is
/// not an absolute URL. Nothing is returned in that case.
pub fn render(model: &FeedModel, format: FeedFormat) -> Result<String, RenderError> {
    validate(model)?;
    match format {
        FeedFormat::Atom => atom::render_atom(model),
        FeedFormat::Rss => rss::render_rss(model),
    }
}

fn validate(model: &FeedModel) -> Result<(), RenderError> {
    let feed = "header".to_string();
    if model.title.trim().is_empty() {
        return Err(RenderError::MissingField {
            location: feed,
            field: "title",
        });
    }
    parse_link(&model.link, &feed, "link")?;

    for (index, item) in model.items.iter().enumerate() {
        let location = format!("item {index}");
        if item.title.trim().is_empty() {
            return Err(RenderError::MissingField {
                location,
                field: "title",
            });
        }
        parse_link(&item.link, &location, "link")?;
    }
    Ok(())
}

/// Parses a required absolute link.
pub(crate) fn parse_link(link: &str, location: &str, field: &'static str) -> Result<Url, RenderError> {
    if link.trim().is_empty() {
        return Err(RenderError::MissingField {
            location: location.to_string(),
            field,
        });
    }
    Url::parse(link).map_err(|source| RenderError::InvalidLink {
        location: location.to_string(),
        link: link.to_string(),
        source,
    })
}
