//! NFS-e XML marshaling.
//!
//! Every document type has an explicit mapping to its wire element names,
//! written out by hand in this module's submodules. All roots live in the
//! single [`NFSE_NAMESPACE`]. An enveloped xmldsig `Signature` on a `Dps`,
//! `NFSe`, `Evento` or `pedRegEvento` is kept verbatim and written back unchanged.
//!
//! | Rust type | Root element |
//! |-----------|--------------|
//! | [`Dps`](crate::core::Dps) | `Dps` |
//! | [`Nfse`](crate::core::Nfse) | `NFSe` |
//! | [`NfseResponse`](crate::core::NfseResponse) | `RespostaNFSe` |
//! | [`Event`](crate::core::Event) | `Evento` |
//! | [`EventRegistrationRequest`](crate::core::EventRegistrationRequest) | `pedRegEvento` |
//! | [`EventResponse`](crate::core::EventResponse) | `RespostaEvento` |
//! | [`EventList`](crate::core::EventList) | `ListaEventos` |
//! | [`MunicipalParameters`](crate::core::MunicipalParameters) | `ParametrosMunicipais` |
//! | [`AgreementParameters`](crate::core::AgreementParameters) | `ParametrosConvenio` |
//! | [`ServiceParameters`](crate::core::ServiceParameters) | `ParametrosServico` |
//! | [`WithholdingParameters`](crate::core::WithholdingParameters) | `ParametrosRetencoes` |
//! | [`BenefitParameters`](crate::core::BenefitParameters) | `ParametrosBeneficios` |
//!
//! # Example
//!
//! ```no_run
//! use nfse::core::*;
//! use nfse::xml;
//!
//! let dps: Dps = todo!(); // build via DpsBuilder
//! let wire = xml::to_xml(&dps).unwrap();
//! let back: Dps = xml::from_xml(&wire).unwrap();
//! assert_eq!(back, dps);
//! ```

mod dps;
mod event;
mod nfse;
mod parameters;
mod parties;
pub(crate) mod reader;
mod signature;
pub(crate) mod writer;

use thiserror::Error;

pub use reader::{Element, parse_document};
pub use signature::XMLDSIG_NAMESPACE;
pub use writer::{XmlWriter, format_decimal, format_timestamp};

/// Namespace of every NFS-e document.
pub const NFSE_NAMESPACE: &str = "http://www.sefin.fortaleza.ce.gov.br/nfse";

/// Marshaling failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum XmlError {
    /// The document holds a value the schema cannot represent.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Well-formed XML that does not match the expected schema
    /// (wrong root, wrong namespace, missing or invalid element).
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The bytes are not well-formed XML.
    #[error("malformed XML: {0}")]
    MalformedXml(String),
}

/// A type with a fixed element mapping.
pub trait XmlElement: Sized {
    /// Write this value as an element called `name`.
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError>;

    /// Read this value from an element whose name was already matched.
    fn read_from(el: &Element) -> Result<Self, XmlError>;
}

/// A top-level document with a fixed root element.
pub trait XmlDocument: XmlElement {
    const ROOT: &'static str;
}

/// Serialize a document to a UTF-8 XML string.
pub fn to_xml<T: XmlDocument>(doc: &T) -> Result<String, XmlError> {
    let mut w = XmlWriter::with_default_namespace(NFSE_NAMESPACE)?;
    doc.write_to(&mut w, T::ROOT)?;
    w.into_string()
}

/// Serialize a document to bytes, ready for an HTTP body.
pub fn to_xml_bytes<T: XmlDocument>(doc: &T) -> Result<Vec<u8>, XmlError> {
    to_xml(doc).map(String::into_bytes)
}

/// Parse a document, checking its root element name and namespace.
pub fn from_xml<T: XmlDocument>(xml: &str) -> Result<T, XmlError> {
    let root = parse_document(xml)?;
    if root.local_name() != T::ROOT {
        return Err(XmlError::SchemaMismatch(format!(
            "expected root element <{}>, found <{}>",
            T::ROOT,
            root.local_name()
        )));
    }
    match root.namespace() {
        Some(ns) if ns == NFSE_NAMESPACE => {}
        other => {
            return Err(XmlError::SchemaMismatch(format!(
                "expected namespace '{NFSE_NAMESPACE}' on <{}>, found '{}'",
                T::ROOT,
                other.unwrap_or("")
            )));
        }
    }
    T::read_from(&root)
}

/// Parse a document from raw bytes.
pub fn from_xml_bytes<T: XmlDocument>(bytes: &[u8]) -> Result<T, XmlError> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| XmlError::MalformedXml(format!("document is not UTF-8: {e}")))?;
    from_xml(xml.strip_prefix('\u{feff}').unwrap_or(xml))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventList;

    #[test]
    fn root_name_is_checked() {
        let xml = format!(r#"<Evento xmlns="{NFSE_NAMESPACE}"/>"#);
        let err = from_xml::<EventList>(&xml).unwrap_err();
        assert!(matches!(err, XmlError::SchemaMismatch(ref m) if m.contains("ListaEventos")));
    }

    #[test]
    fn namespace_is_checked() {
        let err = from_xml::<EventList>(r#"<ListaEventos xmlns="urn:other"/>"#).unwrap_err();
        assert!(matches!(err, XmlError::SchemaMismatch(ref m) if m.contains("urn:other")));
        let err = from_xml::<EventList>("<ListaEventos/>").unwrap_err();
        assert!(matches!(err, XmlError::SchemaMismatch(_)));
    }

    #[test]
    fn prefixed_root_is_accepted() {
        let xml = format!(r#"<n:ListaEventos xmlns:n="{NFSE_NAMESPACE}"/>"#);
        let list: EventList = from_xml(&xml).unwrap();
        assert!(list.events.is_empty());
    }

    #[test]
    fn bytes_must_be_utf8() {
        let err = from_xml_bytes::<EventList>(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, XmlError::MalformedXml(_)));
    }

    #[test]
    fn malformed_is_distinct_from_mismatch() {
        let err = from_xml::<EventList>("<ListaEventos>").unwrap_err();
        assert!(matches!(err, XmlError::MalformedXml(_)));
    }
}
