use chrono::SecondsFormat;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Cursor;

use super::{XmlElement, XmlError};
use crate::core::{Timestamp, WireCode};

fn xml_io(e: std::io::Error) -> XmlError {
    XmlError::Serialization(format!("XML write error: {e}"))
}

pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
    /// Default namespace to declare on the next start tag (the root).
    pending_namespace: Option<&'static str>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, XmlError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self {
            writer,
            pending_namespace: None,
        })
    }

    /// Writer whose first element carries `xmlns="{namespace}"`.
    pub fn with_default_namespace(namespace: &'static str) -> Result<Self, XmlError> {
        let mut w = Self::new()?;
        w.pending_namespace = Some(namespace);
        Ok(w)
    }

    pub fn into_string(self) -> Result<String, XmlError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| XmlError::Serialization(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, XmlError> {
        self.start_element_with_attrs(name, &[])
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, XmlError> {
        let mut elem = BytesStart::new(name);
        if let Some(ns) = self.pending_namespace.take() {
            elem.push_attribute(("xmlns", ns));
        }
        for (k, v) in attrs {
            check_chars(&format!("attribute '{name}@{k}'"), v)?;
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, XmlError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    /// Write already-serialized markup unchanged. The caller checks it is well formed.
    pub fn raw_markup(&mut self, name: &str, markup: &str) -> Result<&mut Self, XmlError> {
        check_chars(&format!("element '{name}'"), markup)?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(markup)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, XmlError> {
        check_chars(&format!("element '{name}'"), text)?;
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write `<name>text</name>` only when `text` is present.
    pub fn opt_text_element(&mut self, name: &str, text: Option<&str>) -> Result<&mut Self, XmlError> {
        if let Some(text) = text {
            self.text_element(name, text)?;
        }
        Ok(self)
    }

    /// Write a monetary amount or rate in plain decimal notation.
    pub fn decimal_element(&mut self, name: &str, value: Decimal) -> Result<&mut Self, XmlError> {
        self.text_element(name, &format_decimal(value))
    }

    pub fn timestamp_element(&mut self, name: &str, value: Option<&Timestamp>) -> Result<&mut Self, XmlError> {
        if let Some(ts) = value {
            self.text_element(name, &format_timestamp(ts))?;
        }
        Ok(self)
    }

    pub fn code_element<T: WireCode>(&mut self, name: &str, value: T) -> Result<&mut Self, XmlError> {
        self.text_element(name, value.code())
    }

    /// Write a nested block only when present.
    pub fn opt_child<T: XmlElement>(&mut self, name: &str, value: Option<&T>) -> Result<&mut Self, XmlError> {
        if let Some(v) = value {
            v.write_to(self, name)?;
        }
        Ok(self)
    }
}

/// Format a Decimal for XML output: always include at least 2 decimal places,
/// strip trailing zeros beyond that. Never uses exponent notation and never rounds.
pub fn format_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    if let Some(dot_pos) = s.find('.') {
        let decimals = s.len() - dot_pos - 1;
        if decimals < 2 {
            format!("{s}{}", "0".repeat(2 - decimals))
        } else {
            s
        }
    } else {
        format!("{s}.00")
    }
}

/// RFC 3339 with the original offset; fractional seconds only when non-zero.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Reject characters that XML 1.0 cannot carry, even escaped.
fn check_chars(location: &str, text: &str) -> Result<(), XmlError> {
    let illegal = text.chars().find(|&c| {
        matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
    });
    match illegal {
        Some(c) => Err(XmlError::Serialization(format!(
            "{location} contains character U+{:04X} which is not allowed in XML",
            c as u32
        ))),
        None => Ok(()),
    }
}
