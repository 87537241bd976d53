//! Minimal element tree built on the `quick-xml` pull parser.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use rust_decimal::Decimal;

use super::{XmlElement, XmlError};
use crate::core::codes::parse_code;
use crate::core::{Timestamp, WireCode};

/// A parsed XML element. Names keep their prefix; lookups match on local name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Concatenated character data directly inside this element.
    pub text: String,
    /// Verbatim source markup, kept only for [`RAW_ELEMENTS`].
    pub raw: Option<String>,
}

/// Elements whose exact source text is kept alongside the tree.
pub const RAW_ELEMENTS: &[&str] = &["Signature"];

/// Parse a complete document into its root element.
pub fn parse_document(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut starts: Vec<usize> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if root.is_some() {
                    return Err(XmlError::MalformedXml("content after the root element".into()));
                }
                stack.push(open_element(e)?);
                starts.push(start);
            }
            Ok(Event::Empty(ref e)) => {
                let mut el = open_element(e)?;
                keep_raw(&mut el, xml, start, reader.buffer_position() as usize);
                close_element(el, &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                let mut el = stack
                    .pop()
                    .ok_or_else(|| XmlError::MalformedXml("unbalanced end tag".into()))?;
                let opened = starts.pop().unwrap_or(start);
                keep_raw(&mut el, xml, opened, reader.buffer_position() as usize);
                close_element(el, &mut stack, &mut root)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| XmlError::MalformedXml(format!("bad character data: {err}")))?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(XmlError::MalformedXml(
                            "text outside the root element".into(),
                        ));
                    }
                }
            }
            Ok(Event::CData(e)) => {
                let bytes = e.into_inner();
                let text = std::str::from_utf8(&bytes)
                    .map_err(|err| XmlError::MalformedXml(format!("CDATA is not UTF-8: {err}")))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(XmlError::MalformedXml(format!(
                    "XML parse error at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::MalformedXml("unexpected end of document".into()));
    }
    root.ok_or_else(|| XmlError::MalformedXml("document has no root element".into()))
}

fn open_element(e: &BytesStart<'_>) -> Result<Element, XmlError> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| XmlError::MalformedXml(format!("element name is not UTF-8: {err}")))?
        .to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| XmlError::MalformedXml(format!("bad attribute on <{name}>: {err}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| XmlError::MalformedXml(format!("attribute name is not UTF-8: {err}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::MalformedXml(format!("bad attribute value on <{name}>: {err}")))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
        raw: None,
    })
}

fn keep_raw(el: &mut Element, xml: &str, from: usize, to: usize) {
    if RAW_ELEMENTS.contains(&el.local_name()) {
        el.raw = xml.get(from..to).map(str::to_string);
    }
}

fn close_element(
    el: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(el),
        None if root.is_none() => *root = Some(el),
        None => {
            return Err(XmlError::MalformedXml("multiple root elements".into()));
        }
    }
    Ok(())
}

fn local(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, l)| l)
}

impl Element {
    pub fn local_name(&self) -> &str {
        local(&self.name)
    }

    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(p, _)| p)
    }

    /// Namespace URI bound to this element's prefix by its own declarations.
    pub fn namespace(&self) -> Option<&str> {
        let decl = match self.prefix() {
            Some(p) => format!("xmlns:{p}"),
            None => "xmlns".to_string(),
        };
        self.attributes
            .iter()
            .find(|(k, _)| *k == decl)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute by local name, ignoring namespace declarations.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| !k.starts_with("xmlns") && local(k) == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name() == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.local_name() == name)
    }

    /// Raw text of the named child, if present.
    pub fn opt_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|c| c.text.clone())
    }

    pub fn opt_parse<T>(
        &self,
        name: &str,
        parse: impl Fn(&str) -> Result<T, XmlError>,
    ) -> Result<Option<T>, XmlError> {
        self.child(name).map(|c| parse(&c.text)).transpose()
    }

    /// Parse a mandatory child; a missing child is a schema mismatch.
    pub fn req_parse<T>(
        &self,
        name: &str,
        parse: impl Fn(&str) -> Result<T, XmlError>,
    ) -> Result<T, XmlError> {
        let child = self.child(name).ok_or_else(|| {
            XmlError::SchemaMismatch(format!(
                "missing element <{name}> in <{}>",
                self.local_name()
            ))
        })?;
        parse(&child.text)
    }

    pub fn opt_child<T: XmlElement>(&self, name: &str) -> Result<Option<T>, XmlError> {
        self.child(name).map(T::read_from).transpose()
    }

    pub fn req_child<T: XmlElement>(&self, name: &str) -> Result<T, XmlError> {
        let child = self.child(name).ok_or_else(|| {
            XmlError::SchemaMismatch(format!(
                "missing element <{name}> in <{}>",
                self.local_name()
            ))
        })?;
        T::read_from(child)
    }
}

pub fn parse_decimal(s: &str) -> Result<Decimal, XmlError> {
    Decimal::from_str(s.trim())
        .map_err(|e| XmlError::SchemaMismatch(format!("invalid decimal '{s}': {e}")))
}

pub fn parse_u32(s: &str) -> Result<u32, XmlError> {
    s.trim()
        .parse()
        .map_err(|e| XmlError::SchemaMismatch(format!("invalid integer '{s}': {e}")))
}

pub fn parse_wire<T: WireCode>(s: &str) -> Result<T, XmlError> {
    parse_code(s.trim()).map_err(|e| XmlError::SchemaMismatch(e.to_string()))
}

/// Accepts RFC 3339, an offset-less date-time, or a plain date. The last two are taken as UTC.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, XmlError> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc().fixed_offset());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    Err(XmlError::SchemaMismatch(format!("invalid date-time '{s}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RegistrationType;
    use rust_decimal_macros::dec;

    #[test]
    fn builds_tree_with_attributes_and_text() {
        let root = parse_document(
            r#"<?xml version="1.0"?>
<p:Root xmlns:p="urn:x" Id="A1">
  <a>one</a>
  <b/>
  <a>two &amp; three</a>
</p:Root>"#,
        )
        .unwrap();
        assert_eq!(root.local_name(), "Root");
        assert_eq!(root.namespace(), Some("urn:x"));
        assert_eq!(root.attr("Id"), Some("A1"));
        let texts: Vec<_> = root.children_named("a").map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["one", "two & three"]);
        assert!(root.child("b").is_some());
    }

    #[test]
    fn keeps_inner_whitespace_of_leaf_text() {
        let root = parse_document("<r><x>  padded  </x></r>").unwrap();
        assert_eq!(root.opt_text("x").as_deref(), Some("  padded  "));
    }

    #[test]
    fn signature_markup_is_kept_verbatim() {
        let sig = r#"<ds:Signature xmlns:ds="urn:sig"><ds:SignedInfo Id="s"/><ds:SignatureValue>QUJD
RA==</ds:SignatureValue></ds:Signature>"#;
        let root = parse_document(&format!("<r><a>1</a>{sig}</r>")).unwrap();
        let kept = root.child("Signature").unwrap();
        assert_eq!(kept.raw.as_deref(), Some(sig));
        assert_eq!(root.child("a").unwrap().raw, None);

        let empty = parse_document(r#"<r><Signature xmlns="urn:sig"/></r>"#).unwrap();
        assert_eq!(
            empty.child("Signature").unwrap().raw.as_deref(),
            Some(r#"<Signature xmlns="urn:sig"/>"#)
        );
    }

    #[test]
    fn malformed_inputs() {
        for bad in ["", "<a>", "<a></b>", "<a/><b/>", "text", "<a x=1/>"] {
            assert!(
                matches!(parse_document(bad), Err(XmlError::MalformedXml(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn missing_required_child_is_schema_mismatch() {
        let root = parse_document("<valores><vBC>1</vBC></valores>").unwrap();
        let err = root.req_parse("vServ", parse_decimal).unwrap_err();
        assert!(matches!(err, XmlError::SchemaMismatch(ref m) if m.contains("vServ")));
    }

    #[test]
    fn scalar_parsers() {
        assert_eq!(parse_decimal(" 10.50 ").unwrap(), dec!(10.50));
        assert!(parse_decimal("1e5").is_err());
        assert_eq!(parse_u32("3").unwrap(), 3);
        assert_eq!(parse_wire::<RegistrationType>("2").unwrap(), RegistrationType::Cnpj);
        assert!(parse_wire::<RegistrationType>("9").is_err());
    }

    #[test]
    fn timestamp_formats() {
        let with_offset = parse_timestamp("2024-06-15T10:30:00-03:00").unwrap();
        assert_eq!(with_offset.offset().local_minus_utc(), -3 * 3600);
        let naive = parse_timestamp("2024-06-15T10:30:00").unwrap();
        assert_eq!(naive.offset().local_minus_utc(), 0);
        let date = parse_timestamp("2024-06-15").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-06-15T00:00:00+00:00");
        assert!(parse_timestamp("15/06/2024").is_err());
    }
}
