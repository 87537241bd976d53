//! Core NFS-e types, identifiers, wire codes, and validation.
//!
//! This module has no I/O. Everything here can be used to build and check
//! documents before the transport layer is involved.

mod builder;
pub mod codes;
mod error;
pub mod identifiers;
mod types;
mod validation;

pub use builder::*;
pub use codes::{
    AgreementStatus, EventActor, EventType, NfseStatus, OperationNature, RegistrationType,
    SpecialTaxRegime, TaxIncentive, UnknownCode, WireCode, YesNo,
};
pub use error::*;
pub use identifiers::{AccessKey, DpsId, DpsIdParts};
pub use types::*;
pub use validation::*;
