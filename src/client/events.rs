use std::sync::Arc;

use super::channel::NfseChannel;
use super::{check_access_key, check_not_blank};
use crate::core::{
    Event, EventList, EventRegistrationRequest, EventResponse, EventType, NfseError, WireCode,
    validate_event_request,
};

/// Registers and queries lifecycle events of an issued NFS-e.
#[derive(Debug, Clone)]
pub struct EventsClient {
    channel: Arc<NfseChannel>,
}

impl EventsClient {
    pub(crate) fn new(channel: Arc<NfseChannel>) -> Self {
        Self { channel }
    }

    /// Calls `POST /nfse/{accessKey}/eventos` after validating the request.
    pub async fn register(
        &self,
        access_key: &str,
        request: &EventRegistrationRequest,
    ) -> Result<EventResponse, NfseError> {
        let key = check_access_key(access_key)?;
        let errors = validate_event_request(request);
        if !errors.is_empty() {
            return Err(NfseError::Validation(errors));
        }
        let path = self.channel.path_for(&["nfse", key.as_str(), "eventos"])?;
        self.channel.post_document(&path, request).await
    }

    /// Register a pre-serialized (typically signed) request. Returns the raw reply.
    pub async fn register_xml(&self, access_key: &str, xml: &str) -> Result<String, NfseError> {
        let key = check_access_key(access_key)?;
        let xml = check_not_blank("xml", xml)?;
        let path = self.channel.path_for(&["nfse", key.as_str(), "eventos"])?;
        Ok(self.channel.post_xml(&path, xml.as_bytes()).await?.body)
    }

    /// Every event registered against the NFS-e.
    pub async fn list(&self, access_key: &str) -> Result<EventList, NfseError> {
        let key = check_access_key(access_key)?;
        let path = self.channel.path_for(&["nfse", key.as_str(), "eventos"])?;
        self.channel.get_document(&path).await
    }

    pub async fn list_by_type(
        &self,
        access_key: &str,
        event_type: EventType,
    ) -> Result<EventList, NfseError> {
        let key = check_access_key(access_key)?;
        let path = self
            .channel
            .path_for(&["nfse", key.as_str(), "eventos", event_type.code()])?;
        self.channel.get_document(&path).await
    }

    /// A single event by type and sequence number (starting at 1).
    pub async fn get(
        &self,
        access_key: &str,
        event_type: EventType,
        sequence: u32,
    ) -> Result<Event, NfseError> {
        let key = check_access_key(access_key)?;
        if sequence == 0 {
            return Err(NfseError::invalid(
                "sequence",
                "event sequence number must be greater than zero",
            ));
        }
        let sequence = sequence.to_string();
        let path = self.channel.path_for(&[
            "nfse",
            key.as_str(),
            "eventos",
            event_type.code(),
            sequence.as_str(),
        ])?;
        self.channel.get_document(&path).await
    }
}
