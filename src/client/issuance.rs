use std::sync::Arc;

use super::channel::NfseChannel;
use super::{check_access_key, check_not_blank};
use crate::core::{Dps, Nfse, NfseError, NfseResponse, validate_dps};

/// Issues NFS-e from declarations and retrieves issued documents.
#[derive(Debug, Clone)]
pub struct IssuanceClient {
    channel: Arc<NfseChannel>,
}

impl IssuanceClient {
    pub(crate) fn new(channel: Arc<NfseChannel>) -> Self {
        Self { channel }
    }

    /// Submit a DPS for issuance.
    ///
    /// Calls `POST /nfse`. The declaration is validated first; on any
    /// violation no request is made and every violation is returned.
    pub async fn issue(&self, dps: &Dps) -> Result<NfseResponse, NfseError> {
        let errors = validate_dps(dps);
        if !errors.is_empty() {
            return Err(NfseError::Validation(errors));
        }
        self.channel.post_document("/nfse", dps).await
    }

    /// Submit an already serialized (typically signed) DPS. Returns the raw reply.
    pub async fn issue_xml(&self, xml: &str) -> Result<String, NfseError> {
        let xml = check_not_blank("xml", xml)?;
        Ok(self.channel.post_xml("/nfse", xml.as_bytes()).await?.body)
    }

    /// Calls `GET /nfse/{accessKey}`.
    pub async fn fetch(&self, access_key: &str) -> Result<Nfse, NfseError> {
        let key = check_access_key(access_key)?;
        let path = self.channel.path_for(&["nfse", key.as_str()])?;
        self.channel.get_document(&path).await
    }

    /// Like [`fetch`](Self::fetch) but returns the document unparsed.
    pub async fn fetch_xml(&self, access_key: &str) -> Result<String, NfseError> {
        let key = check_access_key(access_key)?;
        let path = self.channel.path_for(&["nfse", key.as_str()])?;
        self.channel.get_text(&path).await
    }
}
