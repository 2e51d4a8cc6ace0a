//! GitHub trending page scraper.
//!
//! GitHub offers no API for the trending list, so the public HTML page is
//! fetched and each `article.Box-row` is turned into a [`RawCandidate`].

use super::{CandidateSource, Contributor, Period, RawCandidate, SourceError};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, info_span, Instrument};
use url::Url;

const ROW_SELECTOR: &str = "article.Box-row";
const NAME_SELECTOR: &str = "h2 a";
const DESCRIPTION_SELECTOR: &str = "p";
const LANGUAGE_SELECTOR: &str = r#"[itemprop="programmingLanguage"]"#;
const CONTRIBUTOR_SELECTOR: &str = r#"a[data-hovercard-type="user"]"#;
const AVATAR_SELECTOR: &str = "img";

/// Fetches candidates from `github.com/trending`.
#[derive(Debug, Clone)]
pub struct GithubTrending {
    client: reqwest::Client,
    base_url: Url,
}

impl GithubTrending {
    /// Creates a client for the trending page at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a URL or the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, SourceError> {
        let base_url = Url::parse(base_url).map_err(|source| SourceError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Builds the page URL: `<base>[/<category>]?since=<period>`.
    pub fn trending_url(&self, period: Period, category: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        let category = category.trim();
        if !category.is_empty() && !category.eq_ignore_ascii_case("all") {
            url.path_segments_mut()
                .map_err(|()| SourceError::InvalidUrl {
                    url: self.base_url.to_string(),
                    source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
                })?
                .pop_if_empty()
                .push(category);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("since", period.as_str());
        Ok(url)
    }
}

#[async_trait]
impl CandidateSource for GithubTrending {
    async fn fetch(
        &self,
        period: Period,
        category: &str,
    ) -> Result<Vec<RawCandidate>, SourceError> {
        let url = self.trending_url(period, category)?;
        let span = info_span!("fetch_trending", url = %url);

        async {
            debug!("Requesting trending page");
            let html = self
                .client
                .get(url.clone())
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;

            let candidates = parse_trending_page(&html, &url)?;
            info!(count = candidates.len(), "Fetched trending candidates");
            Ok::<_, SourceError>(candidates)
        }
        .instrument(span)
        .await
    }
}

/// Extracts candidates from a trending page, in page order.
///
/// Relative links are resolved against `page_url`.
///
/// # Errors
///
/// Returns [`SourceError::MissingField`] if a row has no project link.
pub fn parse_trending_page(html: &str, page_url: &Url) -> Result<Vec<RawCandidate>, SourceError> {
    let document = Html::parse_document(html);
    let rows = selector(ROW_SELECTOR)?;
    let name = selector(NAME_SELECTOR)?;
    let description = selector(DESCRIPTION_SELECTOR)?;
    let language = selector(LANGUAGE_SELECTOR)?;
    let contributor = selector(CONTRIBUTOR_SELECTOR)?;
    let avatar = selector(AVATAR_SELECTOR)?;

    document
        .select(&rows)
        .enumerate()
        .map(|(row, element)| {
            let link = element
                .select(&name)
                .next()
                .ok_or(SourceError::MissingField {
                    row,
                    field: "project link",
                })?;
            let project_name = collapsed_text(link);
            if project_name.is_empty() {
                return Err(SourceError::MissingField {
                    row,
                    field: "project name",
                });
            }
            let href = link.value().attr("href").ok_or(SourceError::MissingField {
                row,
                field: "project URL",
            })?;

            let contributors = element
                .select(&contributor)
                .filter_map(|a| parse_contributor(a, &avatar, page_url))
                .collect();

            Ok(RawCandidate {
                name: project_name,
                language: first_text(element, &language),
                description: first_text(element, &description),
                url: resolve(page_url, href)?,
                contributors,
            })
        })
        .collect()
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

fn parse_contributor(link: ElementRef<'_>, avatar: &Selector, page_url: &Url) -> Option<Contributor> {
    let href = link.value().attr("href")?;
    let display_name = link
        .select(avatar)
        .next()
        .and_then(|img| img.value().attr("alt"))
        .map(|alt| alt.trim().trim_start_matches('@').to_string())
        .filter(|alt| !alt.is_empty())
        .unwrap_or_else(|| href.trim_matches('/').to_string());
    if display_name.is_empty() {
        return None;
    }
    let url = resolve(page_url, href).ok()?;
    Some(Contributor { display_name, url })
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(collapsed_text)
        .unwrap_or_default()
}

/// Joins an element's text with single spaces.
fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve(page_url: &Url, href: &str) -> Result<String, SourceError> {
    page_url
        .join(href)
        .map(String::from)
        .map_err(|source| SourceError::InvalidUrl {
            url: href.to_string(),
            source,
        })
}
