//! RSS 2.0 serialization.

use super::xml::XmlDocument;
use super::{FeedModel, RenderError};

const DUBLIN_CORE_NS: &str = "http://purl.org/dc/elements/1.1/";

pub(super) fn render_rss(model: &FeedModel) -> Result<String, RenderError> {
    let mut doc = XmlDocument::new()?;
    let pub_date = model.created.to_rfc2822();

    doc.start("rss", &[("version", "2.0"), ("xmlns:dc", DUBLIN_CORE_NS)])?;
    doc.start("channel", &[])?;
    doc.text_element("title", &model.title)?;
    doc.text_element("link", &model.link)?;
    doc.text_element("description", &model.description)?;
    // managingEditor must start with an email; without one the name goes to dc:creator.
    if !model.author.email.is_empty() {
        let editor = format!("{} ({})", model.author.email, model.author.name);
        doc.text_element("managingEditor", &editor)?;
    } else if !model.author.name.is_empty() {
        doc.text_element("dc:creator", &model.author.name)?;
    }
    doc.text_element("pubDate", &pub_date)?;

    for item in &model.items {
        doc.start("item", &[])?;
        doc.text_element("title", &item.title)?;
        doc.text_element("link", &item.link)?;
        doc.text_element_with("guid", &[("isPermaLink", "true")], &item.link)?;
        doc.text_element("pubDate", &item.created.to_rfc2822())?;
        doc.text_element("dc:creator", &item.author.name)?;
        doc.end("item")?;
    }

    doc.end("channel")?;
    doc.end("rss")?;
    doc.finish()
}
