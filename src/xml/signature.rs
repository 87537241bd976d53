//! Enveloped xmldsig `Signature` carried through parse and re-serialization.
//!
//! The signature is kept as the exact source markup. Any change to it would
//! break the digest, so it is never rebuilt from the element tree.

use super::reader::{Element, parse_document};
use super::writer::XmlWriter;
use super::XmlError;

/// Namespace of the xmldsig `Signature` element.
pub const XMLDSIG_NAMESPACE: &str = "http://www.w3.org/2000/09/xmldsig#";

const SIGNATURE: &str = "Signature";

/// Verbatim `Signature` child of `parent`, when it declares the xmldsig namespace itself.
pub(crate) fn read_signature(parent: &Element) -> Option<String> {
    parent
        .children_named(SIGNATURE)
        .find(|c| c.namespace() == Some(XMLDSIG_NAMESPACE))
        .and_then(|c| c.raw.clone())
}

pub(crate) fn write_signature(w: &mut XmlWriter, markup: Option<&str>) -> Result<(), XmlError> {
    let Some(markup) = markup else {
        return Ok(());
    };
    let root = parse_document(markup)
        .map_err(|e| XmlError::Serialization(format!("signature is not well formed: {e}")))?;
    if root.local_name() != SIGNATURE || root.namespace() != Some(XMLDSIG_NAMESPACE) {
        return Err(XmlError::Serialization(format!(
            "signature must be a <{SIGNATURE}> element in {XMLDSIG_NAMESPACE}, found <{}>",
            root.name
        )));
    }
    w.raw_markup(SIGNATURE, markup.trim())?;
    Ok(())
}
