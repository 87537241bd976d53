//! Fixed-width protocol identifiers: the 42-digit DPS id and the 50-character access key.
//!
//! The codec never pads. Every sub-field must already be zero-padded to its
//! fixed width by the producer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::IdentifierError;

/// Total width of a DPS identifier.
pub const DPS_ID_LEN: usize = 42;
/// Total width of an NFS-e access key.
pub const ACCESS_KEY_LEN: usize = 50;
/// Width of an IBGE municipality code.
pub const MUNICIPALITY_CODE_LEN: usize = 7;

/// (name, offset, width) for each DPS id sub-field, in concatenation order.
const DPS_ID_LAYOUT: [(&str, usize, usize); 5] = [
    ("municipality_code", 0, 7),
    ("registration_type", 7, 1),
    ("federal_registration", 8, 14),
    ("series", 22, 5),
    ("number", 27, 15),
];

/// Named sub-fields of a DPS identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DpsIdParts {
    /// IBGE municipality code of the issuer (7 digits).
    pub municipality_code: String,
    /// "1" for CPF, "2" for CNPJ.
    pub registration_type: String,
    /// CPF or CNPJ of the issuer, left-padded with zeros to 14 digits.
    pub federal_registration: String,
    /// DPS series (5 digits).
    pub series: String,
    /// DPS sequence number (15 digits).
    pub number: String,
}

impl DpsIdParts {
    fn fields(&self) -> [&str; 5] {
        [
            &self.municipality_code,
            &self.registration_type,
            &self.federal_registration,
            &self.series,
            &self.number,
        ]
    }
}

/// A validated 42-digit DPS identifier.
///
/// Layout: municipality (7) + registration type (1) + federal registration (14)
/// + series (5) + number (15).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DpsId(String);

impl DpsId {
    /// True iff `id` is exactly 42 ASCII digits with registration type "1" or "2".
    pub fn validate(id: &str) -> bool {
        id.len() == DPS_ID_LEN
            && is_digits(id)
            && matches!(&id[7..8], "1" | "2")
    }

    /// Parse and validate a DPS id.
    pub fn parse(id: &str) -> Result<Self, IdentifierError> {
        if Self::validate(id) {
            Ok(Self(id.to_string()))
        } else {
            Err(IdentifierError::InvalidFormat(format!(
                "DPS id must be {DPS_ID_LEN} digits with registration type 1 or 2, got '{id}'"
            )))
        }
    }

    /// Split a DPS id into its named sub-fields.
    pub fn decompose(id: &str) -> Result<DpsIdParts, IdentifierError> {
        Ok(Self::parse(id)?.parts())
    }

    /// Concatenate sub-fields into a DPS id.
    ///
    /// Fails if any sub-field has the wrong width, contains non-digits, or the
    /// registration type is not "1" or "2".
    pub fn compose(parts: &DpsIdParts) -> Result<Self, IdentifierError> {
        let mut id = String::with_capacity(DPS_ID_LEN);
        for ((name, _, width), value) in DPS_ID_LAYOUT.iter().zip(parts.fields()) {
            if value.len() != *width || !is_digits(value) {
                return Err(IdentifierError::InvalidFormat(format!(
                    "{name} must be exactly {width} digits, got '{value}'"
                )));
            }
            id.push_str(value);
        }
        if !matches!(parts.registration_type.as_str(), "1" | "2") {
            return Err(IdentifierError::InvalidFormat(format!(
                "registration_type must be 1 (CPF) or 2 (CNPJ), got '{}'",
                parts.registration_type
            )));
        }
        Ok(Self(id))
    }

    pub fn parts(&self) -> DpsIdParts {
        let field = |i: usize| {
            let (_, offset, width) = DPS_ID_LAYOUT[i];
            self.0[offset..offset + width].to_string()
        };
        DpsIdParts {
            municipality_code: field(0),
            registration_type: field(1),
            federal_registration: field(2),
            series: field(3),
            number: field(4),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DpsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DpsId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DpsId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DpsId> for String {
    fn from(id: DpsId) -> Self {
        id.0
    }
}

/// Opaque 50-character key assigned to an issued NFS-e.
///
/// The internal structure is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessKey(String);

impl AccessKey {
    /// True iff `key` is exactly 50 characters.
    pub fn validate(key: &str) -> bool {
        key.chars().count() == ACCESS_KEY_LEN
    }

    pub fn parse(key: &str) -> Result<Self, IdentifierError> {
        if Self::validate(key) {
            Ok(Self(key.to_string()))
        } else {
            Err(IdentifierError::InvalidFormat(format!(
                "access key must have {ACCESS_KEY_LEN} characters, got {}",
                key.chars().count()
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccessKey {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccessKey {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccessKey> for String {
    fn from(key: AccessKey) -> Self {
        key.0
    }
}

/// True iff `code` is a 7-digit IBGE municipality code.
pub fn is_municipality_code(code: &str) -> bool {
    code.len() == MUNICIPALITY_CODE_LEN && is_digits(code)
}

/// Strip punctuation from a CPF/CNPJ and check it has 11 or 14 digits.
///
/// Returns the bare digits on success.
pub fn normalize_tax_id(raw: &str) -> Result<String, IdentifierError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        11 | 14 => Ok(digits),
        n => Err(IdentifierError::InvalidFormat(format!(
            "tax id must be a CPF (11 digits) or CNPJ (14 digits), got {n} digits"
        ))),
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
