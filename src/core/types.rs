use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::codes::*;

/// Date-time with the issuer's UTC offset, as carried on the wire.
pub type Timestamp = DateTime<FixedOffset>;

// ---------------------------------------------------------------------------
// DPS: Declaração de Prestação de Serviços
// ---------------------------------------------------------------------------

/// `Dps`: service-provision declaration submitted to obtain an NFS-e.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dps {
    /// `infDps`: declaration content. Mandatory on the wire.
    pub inf_dps: Option<InfDps>,
    /// `Signature`: xmldsig enveloped signature, kept as raw markup.
    pub signature: Option<String>,
}

/// `infDps`: body of a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfDps {
    /// `@Id`: 42-digit DPS identifier.
    pub id: Option<String>,
    /// `substituta`: NFS-e being replaced by this declaration.
    pub substitute: Option<Substitute>,
    /// `prest`: service provider (issuer).
    pub provider: Option<Provider>,
    /// `toma`: service recipient.
    pub recipient: Option<Recipient>,
    /// `interm`: intermediary, if any.
    pub intermediary: Option<Intermediary>,
    /// `serv`: service rendered.
    pub service: Option<Service>,
    /// `valores`: monetary values.
    pub values: Option<DpsValues>,
    /// `competencia`: competence date.
    pub competence: Option<Timestamp>,
    /// `nDps`: declaration number.
    pub number: Option<String>,
    /// `serie`: declaration series.
    pub series: Option<String>,
    /// `dhEmi`: emission date-time.
    pub issued_at: Option<Timestamp>,
    /// `natOp`: nature of the operation.
    pub operation_nature: OperationNature,
}

impl InfDps {
    /// Empty declaration body with the given operation nature.
    pub fn new(operation_nature: OperationNature) -> Self {
        Self {
            id: None,
            substitute: None,
            provider: None,
            recipient: None,
            intermediary: None,
            service: None,
            values: None,
            competence: None,
            number: None,
            series: None,
            issued_at: None,
            operation_nature,
        }
    }
}

/// `substituta`: reference to the NFS-e this declaration replaces.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Substitute {
    /// `chave`: 50-character access key of the replaced NFS-e.
    pub access_key: Option<String>,
}

/// `prest`: service provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Provider {
    /// `CNPJ`.
    pub cnpj: Option<String>,
    /// `IM`: municipal registration.
    pub municipal_registration: Option<String>,
    /// `cMun`: IBGE municipality code (7 digits).
    pub municipality_code: Option<String>,
}

/// `toma`: service recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// `tpInsc`: CPF or CNPJ.
    pub registration_type: RegistrationType,
    /// `nInsc`: CPF or CNPJ digits.
    pub registration_number: Option<String>,
    /// `xNome`: legal or personal name.
    pub name: Option<String>,
    /// `end`: postal address.
    pub address: Option<Address>,
    /// `fone`.
    pub phone: Option<String>,
    /// `email`.
    pub email: Option<String>,
}

impl Recipient {
    pub fn new(registration_type: RegistrationType) -> Self {
        Self {
            registration_type,
            registration_number: None,
            name: None,
            address: None,
            phone: None,
            email: None,
        }
    }
}

/// `interm`: intermediary of the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intermediary {
    /// `tpInsc`.
    pub registration_type: RegistrationType,
    /// `nInsc`.
    pub registration_number: Option<String>,
    /// `xNome`.
    pub name: Option<String>,
    /// `cMun`.
    pub municipality_code: Option<String>,
}

/// `end`: postal address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    /// `tpLog`: street type (Rua, Avenida, ...).
    pub street_type: Option<String>,
    /// `xLog`.
    pub street: Option<String>,
    /// `nro`.
    pub number: Option<String>,
    /// `xCpl`.
    pub complement: Option<String>,
    /// `bairro`.
    pub district: Option<String>,
    /// `cMun`.
    pub municipality_code: Option<String>,
    /// `CEP`.
    pub postal_code: Option<String>,
}

/// `serv`: service rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Service {
    /// `cTribMun`: municipal taxation code.
    pub municipal_tax_code: Option<String>,
    /// `cCnae`.
    pub cnae: Option<String>,
    /// `cServ`: LC 116/2003 service code.
    pub service_code: Option<String>,
    /// `xServ`: service description.
    pub description: Option<String>,
    /// `cMunIncid`: municipality where ISS is due.
    pub incidence_municipality: Option<String>,
}

/// `valores` of a DPS. All amounts in BRL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpsValues {
    /// `vServ`.
    pub service_amount: Decimal,
    /// `vDed`.
    pub deductions: Decimal,
    /// `vBC`: ISS tax base.
    pub tax_base: Decimal,
    /// `aliq`: ISS rate in percent.
    pub rate: Decimal,
    /// `vISS`.
    pub iss_amount: Decimal,
    /// `vLiq`.
    pub net_amount: Decimal,
    /// `indIncentivo`.
    pub tax_incentive: TaxIncentive,
}

// ---------------------------------------------------------------------------
// NFS-e
// ---------------------------------------------------------------------------

/// `NFSe`: an issued electronic service invoice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Nfse {
    /// `infNfse`. Mandatory on the wire.
    pub inf_nfse: Option<InfNfse>,
    /// `Signature`: xmldsig enveloped signature, kept as raw markup.
    pub signature: Option<String>,
}

/// `infNfse`: body of an issued invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfNfse {
    /// `@Id`: 50-character access key.
    pub access_key: Option<String>,
    /// `nNfse`.
    pub number: Option<String>,
    /// `cVerif`: verification code.
    pub verification_code: Option<String>,
    /// `dhEmi`.
    pub issued_at: Option<Timestamp>,
    /// `prest`.
    pub provider: Option<Provider>,
    /// `toma`.
    pub recipient: Option<Recipient>,
    /// `interm`.
    pub intermediary: Option<Intermediary>,
    /// `serv`.
    pub service: Option<Service>,
    /// `valores`.
    pub values: Option<NfseValues>,
    /// `situacao`.
    pub status: NfseStatus,
    /// `competencia`.
    pub competence: Option<Timestamp>,
}

impl InfNfse {
    pub fn new(status: NfseStatus) -> Self {
        Self {
            access_key: None,
            number: None,
            verification_code: None,
            issued_at: None,
            provider: None,
            recipient: None,
            intermediary: None,
            service: None,
            values: None,
            status,
            competence: None,
        }
    }
}

/// `valores` of an issued NFS-e, including federal withholdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfseValues {
    pub service_amount: Decimal,
    pub deductions: Decimal,
    pub tax_base: Decimal,
    pub rate: Decimal,
    pub iss_amount: Decimal,
    pub net_amount: Decimal,
    /// `vPIS`.
    pub pis: Decimal,
    /// `vCOFINS`.
    pub cofins: Decimal,
    /// `vINSS`.
    pub inss: Decimal,
    /// `vIR`.
    pub ir: Decimal,
    /// `vCSLL`.
    pub csll: Decimal,
    pub tax_incentive: TaxIncentive,
}

/// `RespostaNFSe`: reply to an issuance request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NfseResponse {
    /// `status`.
    pub status: Option<String>,
    /// `NFSe`: the issued invoice on success.
    pub nfse: Option<Nfse>,
    /// `mensagens/mensagem`.
    pub messages: Vec<ReturnMessage>,
}

/// `mensagem`: a message returned by the national API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReturnMessage {
    /// `codigo`.
    pub code: Option<String>,
    /// `descricao`.
    pub description: Option<String>,
    /// `correcao`: suggested fix.
    pub correction: Option<String>,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// `Evento`: a registered lifecycle event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Event {
    /// `infEvento`. Mandatory on the wire.
    pub inf_event: Option<InfEvent>,
    /// `Signature`.
    pub signature: Option<String>,
}

/// `infEvento`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfEvent {
    /// `@Id`.
    pub id: Option<String>,
    /// `chNfse`.
    pub access_key: Option<String>,
    /// `tpEvento`.
    pub event_type: Option<EventType>,
    /// `nSeqEvento`.
    pub sequence: u32,
    /// `dhEvento`.
    pub occurred_at: Option<Timestamp>,
    /// `detEvento`.
    pub details: Option<EventDetails>,
}

/// `detEvento`: event-type-specific details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventDetails {
    /// `descEvento`.
    pub description: Option<String>,
    /// `xJust`: justification.
    pub justification: Option<String>,
    /// `cCanc`: cancellation reason code.
    pub cancellation_code: Option<String>,
}

/// `pedRegEvento`: request to register an event against an NFS-e.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventRegistrationRequest {
    /// `infPedReg`. Mandatory on the wire.
    pub inf: Option<EventRegistrationInfo>,
    /// `Signature`.
    pub signature: Option<String>,
}

/// `infPedReg`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRegistrationInfo {
    /// `chNfse`.
    pub access_key: Option<String>,
    /// `tpEvento`.
    pub event_type: EventType,
    /// `nSeqEvento`.
    pub sequence: u32,
    /// `dhEvento`.
    pub occurred_at: Option<Timestamp>,
    /// `detEvento`.
    pub details: Option<EventDetails>,
}

/// `RespostaEvento`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventResponse {
    pub status: Option<String>,
    /// `Evento`: the registered event on success.
    pub event: Option<Event>,
    pub messages: Vec<ReturnMessage>,
}

/// `ListaEventos`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventList {
    pub events: Vec<Event>,
}

// ---------------------------------------------------------------------------
// Municipal parameters
// ---------------------------------------------------------------------------

/// `ParametrosMunicipais`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalParameters {
    /// `cMun`.
    pub municipality_code: Option<String>,
    /// `xMun`.
    pub municipality_name: Option<String>,
    /// `sitConv`.
    pub agreement_status: AgreementStatus,
    /// `dtIniConv`.
    pub agreement_start: Option<Timestamp>,
    /// `dtFimConv`.
    pub agreement_end: Option<Timestamp>,
}

/// `ParametrosConvenio`: the municipality's agreement with the national system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementParameters {
    pub municipality_code: Option<String>,
    pub agreement_status: AgreementStatus,
    pub agreement_start: Option<Timestamp>,
    pub agreement_end: Option<Timestamp>,
    /// `email`.
    pub email: Option<String>,
    /// `fone`.
    pub phone: Option<String>,
}

/// `ParametrosServico`: ISS rates for one service code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceParameters {
    pub municipality_code: Option<String>,
    /// `cServ`.
    pub service_code: Option<String>,
    /// `xServ`.
    pub description: Option<String>,
    /// `aliq`.
    pub rate: Decimal,
    /// `aliqMin`.
    pub min_rate: Decimal,
    /// `aliqMax`.
    pub max_rate: Decimal,
    /// `regEspTrib`.
    pub special_regime: Option<SpecialTaxRegime>,
}

/// `ParametrosRetencoes`: which federal taxes a taxpayer must have withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingParameters {
    pub municipality_code: Option<String>,
    pub registration_type: RegistrationType,
    pub registration_number: Option<String>,
    /// `retPIS`.
    pub pis: YesNo,
    /// `retCOFINS`.
    pub cofins: YesNo,
    /// `retINSS`.
    pub inss: YesNo,
    /// `retIR`.
    pub ir: YesNo,
    /// `retCSLL`.
    pub csll: YesNo,
}

/// `ParametrosBeneficios`: a municipal tax benefit granted to a taxpayer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitParameters {
    pub municipality_code: Option<String>,
    pub registration_type: RegistrationType,
    pub registration_number: Option<String>,
    /// `cBenef`.
    pub benefit_code: Option<String>,
    /// `xBenef`.
    pub description: Option<String>,
    /// `dtInicio`.
    pub start: Option<Timestamp>,
    /// `dtFim`.
    pub end: Option<Timestamp>,
}
