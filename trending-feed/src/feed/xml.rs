//! Thin helpers over the `quick-xml` writer.

use super::RenderError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;

const REPLACEMENT: char = '\u{FFFD}';

/// Indented XML document builder.
pub(super) struct XmlDocument {
    writer: Writer<Vec<u8>>,
}

impl XmlDocument {
    /// Starts a UTF-8 document with an XML declaration.
    pub(super) fn new() -> Result<Self, RenderError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(RenderError::xml)?;
        Ok(Self { writer })
    }

    /// Opens `name` with the given attributes.
    pub(super) fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), RenderError> {
        let values = clean_attributes(attributes);
        self.event(Event::Start(element(name, &values)))
    }

    /// Closes `name`.
    pub(super) fn end(&mut self, name: &str) -> Result<(), RenderError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// Writes a self-closing element.
    pub(super) fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), RenderError> {
        let values = clean_attributes(attributes);
        self.event(Event::Empty(element(name, &values)))
    }

    /// Writes `<name>text</name>`, escaping `text`.
    pub(super) fn text_element(&mut self, name: &str, text: &str) -> Result<(), RenderError> {
        self.text_element_with(name, &[], text)
    }

    /// Writes `<name attrs...>text</name>`, escaping `text`.
    pub(super) fn text_element_with(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> Result<(), RenderError> {
        self.start(name, attributes)?;
        self.event(Event::Text(BytesText::new(&xml_text(text))))?;
        self.end(name)
    }

    /// Returns the finished document.
    pub(super) fn finish(self) -> Result<String, RenderError> {
        String::from_utf8(self.writer.into_inner()).map_err(RenderError::xml)
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        self.writer.write_event(event).map_err(RenderError::xml)
    }
}

/// Returns true for characters allowed by the XML 1.0 `Char` production.
pub(super) fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

/// Replaces characters XML 1.0 cannot carry with U+FFFD.
pub(super) fn xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .map(|c| if is_xml_char(c) { c } else { REPLACEMENT })
                .collect(),
        )
    }
}

fn clean_attributes<'a>(attributes: &[(&'a str, &'a str)]) -> Vec<(&'a str, Cow<'a, str>)> {
    attributes
        .iter()
        .map(|&(key, value)| (key, xml_text(value)))
        .collect()
}

fn element<'a>(name: &'a str, attributes: &'a [(&'a str, Cow<'a, str>)]) -> BytesStart<'a> {
    BytesStart::new(name).with_attributes(
        attributes
            .iter()
            .map(|(key, value)| (*key, value.as_ref())),
    )
}
