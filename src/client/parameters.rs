use std::sync::Arc;

use super::channel::NfseChannel;
use super::{check_municipality, check_not_blank};
use crate::core::identifiers::normalize_tax_id;
use crate::core::{
    AgreementParameters, BenefitParameters, NfseError, ServiceParameters, WithholdingParameters,
};

const PREFIX: &str = "parametros_municipais";

/// Municipal parameters published by the national system.
#[derive(Debug, Clone)]
pub struct ParametersClient {
    channel: Arc<NfseChannel>,
}

impl ParametersClient {
    pub(crate) fn new(channel: Arc<NfseChannel>) -> Self {
        Self { channel }
    }

    /// Calls `GET /parametros_municipais/{cMun}/convenio`.
    pub async fn agreement(&self, municipality: &str) -> Result<AgreementParameters, NfseError> {
        let mun = check_municipality(municipality)?;
        let path = self.channel.path_for(&[PREFIX, mun, "convenio"])?;
        self.channel.get_document(&path).await
    }

    /// ISS rates for a service code in a municipality.
    pub async fn service_rates(
        &self,
        municipality: &str,
        service_code: &str,
    ) -> Result<ServiceParameters, NfseError> {
        let mun = check_municipality(municipality)?;
        let code = check_not_blank("service_code", service_code)?.trim();
        let path = self.channel.path_for(&[PREFIX, mun, code])?;
        self.channel.get_document(&path).await
    }

    /// Federal withholdings applicable to a CPF or CNPJ. Punctuation in `tax_id` is ignored.
    pub async fn withholdings(
        &self,
        municipality: &str,
        tax_id: &str,
    ) -> Result<WithholdingParameters, NfseError> {
        let mun = check_municipality(municipality)?;
        let tax_id = normalize_tax_id(tax_id).map_err(|e| e.for_field("tax_id"))?;
        let path = self
            .channel
            .path_for(&[PREFIX, mun, tax_id.as_str(), "retencoes"])?;
        self.channel.get_document(&path).await
    }

    pub async fn benefits(
        &self,
        municipality: &str,
        tax_id: &str,
    ) -> Result<BenefitParameters, NfseError> {
        let mun = check_municipality(municipality)?;
        let tax_id = normalize_tax_id(tax_id).map_err(|e| e.for_field("tax_id"))?;
        let path = self
            .channel
            .path_for(&[PREFIX, mun, tax_id.as_str(), "beneficios"])?;
        self.channel.get_document(&path).await
    }
}
