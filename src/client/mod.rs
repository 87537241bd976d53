//! Async client for the national NFS-e API.
//!
//! ## Endpoints
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | `/nfse` | [`IssuanceClient::issue`] |
//! | GET | `/nfse/{accessKey}` | [`IssuanceClient::fetch`] |
//! | GET/HEAD | `/dps/{dpsId}` | [`DpsClient::access_key`], [`DpsClient::nfse_exists`] |
//! | POST | `/nfse/{accessKey}/eventos` | [`EventsClient::register`] |
//! | GET | `/nfse/{accessKey}/eventos[/{type}[/{seq}]]` | [`EventsClient::list`], [`EventsClient::list_by_type`], [`EventsClient::get`] |
//! | GET | `/parametros_municipais/{cMun}/...` | [`ParametersClient`] |
//!
//! Identifiers are checked locally before any request is made.
//!
//! ```no_run
//! use nfse::client::{ClientCertificate, Environment, NfseClient, NfseConfig};
//!
//! # async fn run() -> Result<(), nfse::NfseError> {
//! let config = NfseConfig::builder()
//!     .environment(Environment::Staging)
//!     .certificate(ClientCertificate::from_pem_file("certs/a1.pem")?)
//!     .build()?;
//! let client = NfseClient::new(config)?;
//! let exists = client
//!     .dps()
//!     .nfse_exists("355030821234567800019500001000000000000042")
//!     .await?;
//! client.close();
//! # let _ = exists;
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod config;
mod dps;
mod events;
mod issuance;
mod parameters;

use std::sync::Arc;

pub use channel::{EndpointRequest, EndpointResponse, Method, NfseChannel};
pub use config::{ClientCertificate, Environment, NfseConfig, NfseConfigBuilder};
pub use dps::DpsClient;
pub use events::EventsClient;
pub use issuance::IssuanceClient;
pub use parameters::ParametersClient;

use crate::core::identifiers::{AccessKey, is_municipality_code};
use crate::core::NfseError;

/// Top-level client. Holds one channel shared by every sub-client.
#[derive(Debug, Clone)]
pub struct NfseClient {
    channel: Arc<NfseChannel>,
    issuance: IssuanceClient,
    dps: DpsClient,
    events: EventsClient,
    parameters: ParametersClient,
}

impl NfseClient {
    /// Validate `config` and open the channel.
    pub fn new(config: NfseConfig) -> Result<Self, NfseError> {
        Ok(Self::with_channel(Arc::new(NfseChannel::new(config)?)))
    }

    pub fn with_channel(channel: Arc<NfseChannel>) -> Self {
        Self {
            issuance: IssuanceClient::new(Arc::clone(&channel)),
            dps: DpsClient::new(Arc::clone(&channel)),
            events: EventsClient::new(Arc::clone(&channel)),
            parameters: ParametersClient::new(Arc::clone(&channel)),
            channel,
        }
    }

    /// NFS-e issuance and retrieval.
    pub fn issuance(&self) -> &IssuanceClient {
        &self.issuance
    }

    /// DPS status lookups.
    pub fn dps(&self) -> &DpsClient {
        &self.dps
    }

    /// Lifecycle events.
    pub fn events(&self) -> &EventsClient {
        &self.events
    }

    /// Municipal parameters.
    pub fn parameters(&self) -> &ParametersClient {
        &self.parameters
    }

    pub fn channel(&self) -> &Arc<NfseChannel> {
        &self.channel
    }

    /// Close the shared channel. Later calls through any clone fail.
    pub fn close(&self) {
        self.channel.close();
    }
}

fn check_access_key(key: &str) -> Result<AccessKey, NfseError> {
    AccessKey::parse(key).map_err(|e| e.for_field("access_key"))
}

fn check_municipality(code: &str) -> Result<&str, NfseError> {
    if is_municipality_code(code) {
        Ok(code)
    } else {
        Err(NfseError::invalid(
            "municipality_code",
            format!("municipality code must have 7 digits, got '{code}'"),
        ))
    }
}

fn check_not_blank<'a>(field: &str, value: &'a str) -> Result<&'a str, NfseError> {
    if value.trim().is_empty() {
        Err(NfseError::invalid(field, format!("{field} is required")))
    } else {
        Ok(value)
    }
}
