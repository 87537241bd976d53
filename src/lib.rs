//! # nfse
//!
//! Client library for the Brazilian national NFS-e system (Sistema Nacional
//! NFS-e): DPS issuance, lifecycle events, and municipal parameters over
//! mutually authenticated HTTPS with XML bodies.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::DateTime;
//! use nfse::core::*;
//! use rust_decimal_macros::dec;
//!
//! let at = DateTime::parse_from_rfc3339("2024-06-15T10:30:00-03:00").unwrap();
//! let dps = DpsBuilder::new("1", "42")
//!     .provider(Provider {
//!         cnpj: Some("12345678000195".into()),
//!         municipal_registration: None,
//!         municipality_code: Some("3550308".into()),
//!     })
//!     .recipient(RecipientBuilder::cpf("12345678909", "Maria Souza").build())
//!     .service("01.07", "Suporte técnico")
//!     .values(DpsValues {
//!         service_amount: dec!(1000.00),
//!         deductions: dec!(0),
//!         tax_base: dec!(1000.00),
//!         rate: dec!(5),
//!         iss_amount: dec!(50.00),
//!         net_amount: dec!(950.00),
//!         tax_incentive: TaxIncentive::No,
//!     })
//!     .issued_at(at)
//!     .competence(at)
//!     .build()
//!     .unwrap();
//!
//! let id = dps.inf_dps.as_ref().and_then(|inf| inf.id.as_deref()).unwrap();
//! assert_eq!(DpsId::decompose(id).unwrap().municipality_code, "3550308");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document types, identifiers, wire codes, builders, validation |
//! | `xml` (default) | NFS-e XML marshaling |
//! | `client` (default) | Async HTTP client with mTLS |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "client")]
pub mod client;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;

#[cfg(feature = "client")]
pub use crate::client::{NfseClient, NfseConfig};
