//! Atom 1.0 serialization.

use super::xml::XmlDocument;
use super::{parse_link, FeedItem, FeedModel, RenderError};
use crate::dedup::UNKNOWN_AUTHOR;
use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

pub(super) fn render_atom(model: &FeedModel) -> Result<String, RenderError> {
    let mut doc = XmlDocument::new()?;
    let updated = timestamp(&model.created);

    doc.start("feed", &[("xmlns", ATOM_NS)])?;
    doc.text_element("title", &model.title)?;
    doc.text_element("id", &model.link)?;
    doc.empty("link", &[("rel", "alternate"), ("href", model.link.as_str())])?;
    if !model.description.is_empty() {
        doc.text_element("subtitle", &model.description)?;
    }
    doc.text_element("updated", &updated)?;

    doc.start("author", &[])?;
    doc.text_element("name", &model.author.name)?;
    if !model.author.email.is_empty() {
        doc.text_element("email", &model.author.email)?;
    }
    doc.end("author")?;

    for (index, item) in model.items.iter().enumerate() {
        write_entry(&mut doc, item, index)?;
    }

    doc.end("feed")?;
    doc.finish()
}

fn write_entry(doc: &mut XmlDocument, item: &FeedItem, index: usize) -> Result<(), RenderError> {
    let link = parse_link(&item.link, &format!("item {index}"), "link")?;

    doc.start("entry", &[])?;
    doc.text_element("title", &item.title)?;
    doc.empty("link", &[("rel", "alternate"), ("href", item.link.as_str())])?;
    doc.text_element("id", &entry_id(&link, &item.created))?;
    doc.text_element("updated", &timestamp(&item.created))?;

    doc.start("author", &[])?;
    let name = if item.author.name.is_empty() {
        UNKNOWN_AUTHOR
    } else {
        item.author.name.as_str()
    };
    doc.text_element("name", name)?;
    if Url::parse(&item.author.url).is_ok() {
        doc.text_element("uri", &item.author.url)?;
    }
    doc.end("author")?;

    doc.end("entry")
}

/// RFC 3339 timestamp with a `Z` suffix.
fn timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Tag URI (RFC 4151) built from the item link and the run date.
fn entry_id(link: &Url, created: &DateTime<Utc>) -> String {
    match link.host_str() {
        Some(host) => format!("tag:{host},{}:{}", created.format("%Y-%m-%d"), link.path()),
        None => link.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{ItemAuthor, Publisher};
    use chrono::TimeZone;

    fn model(items: Vec<FeedItem>) -> FeedModel {
        FeedModel {
            title: "Trending & <new>".to_string(),
            link: "https://github.com/trending".to_string(),
            description: "Daily".to_string(),
            author: Publisher {
                name: "Bot".to_string(),
                email: "bot@example.com".to_string(),
            },
            created: Utc.with_ymd_and_hms(2024, 5, 17, 6, 30, 0).unwrap(),
            items,
        }
    }

    fn item(author_url: &str) -> FeedItem {
        FeedItem {
            title: "Parser \"fast\" [Rust]".to_string(),
            link: "https://github.com/owner/repo".to_string(),
            author: ItemAuthor {
                name: "mona".to_string(),
                url: author_url.to_string(),
            },
            created: Utc.with_ymd_and_hms(2024, 5, 17, 6, 30, 0).unwrap(),
        }
    }

    #[test]
    fn renders_header() {
        let xml = render_atom(&model(Vec::new())).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#));
        assert!(xml.contains("<title>Trending &amp; &lt;new&gt;</title>"));
        assert!(xml.contains("<id>https://github.com/trending</id>"));
        assert!(xml.contains("<subtitle>Daily</subtitle>"));
        assert!(xml.contains("<updated>2024-05-17T06:30:00Z</updated>"));
        assert!(xml.contains("<email>bot@example.com</email>"));
        assert!(xml.trim_end().ends_with("</feed>"));
    }

    #[test]
    fn renders_entry_with_tag_id_and_author_uri() {
        let xml = render_atom(&model(vec![item("https://github.com/mona")])).unwrap();

        assert!(xml.contains(r#"<link rel="alternate" href="https://github.com/owner/repo"/>"#));
        assert!(xml.contains("<id>tag:github.com,2024-05-17:/owner/repo</id>"));
        assert!(xml.contains("<name>mona</name>"));
        assert!(xml.contains("<uri>https://github.com/mona</uri>"));
    }

    #[test]
    fn placeholder_author_url_is_omitted() {
        let xml = render_atom(&model(vec![item(UNKNOWN_AUTHOR)])).unwrap();
        assert!(!xml.contains("<uri>"));
    }
}
