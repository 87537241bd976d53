use std::sync::Arc;

use super::channel::NfseChannel;
use crate::core::{DpsId, NfseError};

/// Lookups keyed by the 42-digit DPS identifier.
#[derive(Debug, Clone)]
pub struct DpsClient {
    channel: Arc<NfseChannel>,
}

impl DpsClient {
    pub(crate) fn new(channel: Arc<NfseChannel>) -> Self {
        Self { channel }
    }

    /// Access key of the NFS-e generated from a DPS, as returned by the server.
    ///
    /// Calls `GET /dps/{dpsId}`.
    pub async fn access_key(&self, dps_id: &str) -> Result<String, NfseError> {
        let id = check_dps_id(dps_id)?;
        let path = self.channel.path_for(&["dps", id.as_str()])?;
        self.channel.get_text(&path).await
    }

    /// Whether an NFS-e was generated from the DPS.
    ///
    /// Calls `HEAD /dps/{dpsId}`; only HTTP 200 counts as existing.
    pub async fn nfse_exists(&self, dps_id: &str) -> Result<bool, NfseError> {
        let id = check_dps_id(dps_id)?;
        let path = self.channel.path_for(&["dps", id.as_str()])?;
        self.channel.head(&path).await
    }
}

fn check_dps_id(raw: &str) -> Result<DpsId, NfseError> {
    DpsId::parse(raw).map_err(|e| e.for_field("dps_id"))
}
