//! Closed wire-code tables.
//!
//! Each enum maps to exactly one wire string and back. Unknown codes are
//! rejected, never defaulted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A closed enumeration with a fixed textual code on the wire.
pub trait WireCode: Copy + PartialEq + 'static {
    /// Name used in error messages.
    const KIND: &'static str;
    /// Every variant, in table order.
    const ALL: &'static [Self];

    fn code(self) -> &'static str;

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }
}

/// Error returned when a wire code is not in its table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code '{code}'")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: String,
}

/// Look up `code` in `T`'s table.
pub fn parse_code<T: WireCode>(code: &str) -> Result<T, UnknownCode> {
    T::from_code(code).ok_or_else(|| UnknownCode {
        kind: T::KIND,
        code: code.to_string(),
    })
}

/// NFS-e lifecycle event type (`tpEvento`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// e101101: Cancellation request.
    CancellationRequest,
    /// e105102: Cancellation by replacement.
    CancellationByReplacement,
    /// e105103: Cancellation analysis request.
    CancellationAnalysisRequest,
    /// e202101: Operation confirmed by the provider.
    ProviderConfirmation,
    /// e202102: Operation confirmed by the recipient.
    RecipientConfirmation,
    /// e202103: Operation confirmed by the intermediary.
    IntermediaryConfirmation,
    /// e203101: Operation rejected by the provider.
    ProviderRejection,
    /// e203102: Operation rejected by the recipient.
    RecipientRejection,
    /// e203103: Operation rejected by the intermediary.
    IntermediaryRejection,
    /// e305101: Cancellation ex officio.
    ExOfficioCancellation,
    /// e305102: Block.
    Block,
    /// e305103: Unblock.
    Unblock,
}

impl WireCode for EventType {
    const KIND: &'static str = "event type";
    const ALL: &'static [Self] = &[
        Self::CancellationRequest,
        Self::CancellationByReplacement,
        Self::CancellationAnalysisRequest,
        Self::ProviderConfirmation,
        Self::RecipientConfirmation,
        Self::IntermediaryConfirmation,
        Self::ProviderRejection,
        Self::RecipientRejection,
        Self::IntermediaryRejection,
        Self::ExOfficioCancellation,
        Self::Block,
        Self::Unblock,
    ];

    fn code(self) -> &'static str {
        match self {
            Self::CancellationRequest => "e101101",
            Self::CancellationByReplacement => "e105102",
            Self::CancellationAnalysisRequest => "e105103",
            Self::ProviderConfirmation => "e202101",
            Self::RecipientConfirmation => "e202102",
            Self::IntermediaryConfirmation => "e202103",
            Self::ProviderRejection => "e203101",
            Self::RecipientRejection => "e203102",
            Self::IntermediaryRejection => "e203103",
            Self::ExOfficioCancellation => "e305101",
            Self::Block => "e305102",
            Self::Unblock => "e305103",
        }
    }
}

impl EventType {
    /// Portuguese description as shown by the national portal.
    pub fn description(self) -> &'static str {
        match self {
            Self::CancellationRequest => "Cancelamento de NFS-e",
            Self::CancellationByReplacement => "Cancelamento por Substituição",
            Self::CancellationAnalysisRequest => "Solicitação de Análise Fiscal para Cancelamento",
            Self::ProviderConfirmation => "Confirmação da Operação pelo Prestador",
            Self::RecipientConfirmation => "Confirmação da Operação pelo Tomador",
            Self::IntermediaryConfirmation => "Confirmação da Operação pelo Intermediário",
            Self::ProviderRejection => "Rejeição da Operação pelo Prestador",
            Self::RecipientRejection => "Rejeição da Operação pelo Tomador",
            Self::IntermediaryRejection => "Rejeição da Operação pelo Intermediário",
            Self::ExOfficioCancellation => "Cancelamento por Ofício",
            Self::Block => "Bloqueio",
            Self::Unblock => "Desbloqueio",
        }
    }

    pub fn confirmation(actor: EventActor) -> Self {
        match actor {
            EventActor::Provider => Self::ProviderConfirmation,
            EventActor::Recipient => Self::RecipientConfirmation,
            EventActor::Intermediary => Self::IntermediaryConfirmation,
        }
    }

    pub fn rejection(actor: EventActor) -> Self {
        match actor {
            EventActor::Provider => Self::ProviderRejection,
            EventActor::Recipient => Self::RecipientRejection,
            EventActor::Intermediary => Self::IntermediaryRejection,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for EventType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s)
    }
}

/// Party that confirms or rejects an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventActor {
    Provider,
    Recipient,
    Intermediary,
}

impl FromStr for EventActor {
    type Err = UnknownCode;

    /// Accepts the Portuguese role names ("prestador", "tomador", "intermediario").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prestador" | "provider" => Ok(Self::Provider),
            "tomador" | "recipient" => Ok(Self::Recipient),
            "intermediario" | "intermediário" | "intermediary" => Ok(Self::Intermediary),
            _ => Err(UnknownCode {
                kind: "event actor",
                code: s.to_string(),
            }),
        }
    }
}

/// Federal registration type (`tpInsc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationType {
    /// 1: CPF (individual, 11 digits).
    Cpf,
    /// 2: CNPJ (company, 14 digits).
    Cnpj,
}

impl WireCode for RegistrationType {
    const KIND: &'static str = "registration type";
    const ALL: &'static [Self] = &[Self::Cpf, Self::Cnpj];

    fn code(self) -> &'static str {
        match self {
            Self::Cpf => "1",
            Self::Cnpj => "2",
        }
    }
}

impl RegistrationType {
    /// Number of digits the registration number must have.
    pub fn digits(self) -> usize {
        match self {
            Self::Cpf => 11,
            Self::Cnpj => 14,
        }
    }
}

/// Nature of the operation (`natOp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationNature {
    /// 1: Taxed in the municipality.
    TaxedInMunicipality,
    /// 2: Taxed outside the municipality.
    TaxedOutsideMunicipality,
    /// 3: Exempt.
    Exempt,
    /// 4: Immune.
    Immune,
    /// 5: Enforceability suspended by court order.
    SuspendedByCourtOrder,
    /// 6: Enforceability suspended by administrative proceeding.
    SuspendedByAdministrativeProceeding,
}

impl WireCode for OperationNature {
    const KIND: &'static str = "operation nature";
    const ALL: &'static [Self] = &[
        Self::TaxedInMunicipality,
        Self::TaxedOutsideMunicipality,
        Self::Exempt,
        Self::Immune,
        Self::SuspendedByCourtOrder,
        Self::SuspendedByAdministrativeProceeding,
    ];

    fn code(self) -> &'static str {
        match self {
            Self::TaxedInMunicipality => "1",
            Self::TaxedOutsideMunicipality => "2",
            Self::Exempt => "3",
            Self::Immune => "4",
            Self::SuspendedByCourtOrder => "5",
            Self::SuspendedByAdministrativeProceeding => "6",
        }
    }
}

/// Tax incentive indicator (`indIncentivo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxIncentive {
    /// 1: No.
    No,
    /// 2: Yes.
    Yes,
}

impl WireCode for TaxIncentive {
    const KIND: &'static str = "tax incentive";
    const ALL: &'static [Self] = &[Self::No, Self::Yes];

    fn code(self) -> &'static str {
        match self {
            Self::No => "1",
            Self::Yes => "2",
        }
    }
}

/// Special taxation regime (`regEspTrib`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialTaxRegime {
    /// 1: Municipal micro-enterprise.
    MunicipalMicroEnterprise,
    /// 2: Estimate.
    Estimate,
    /// 3: Professional partnership.
    ProfessionalPartnership,
    /// 4: Cooperative.
    Cooperative,
    /// 5: MEI (individual micro-entrepreneur).
    Mei,
    /// 6: ME/EPP under Simples Nacional.
    SimplesNacional,
}

impl WireCode for SpecialTaxRegime {
    const KIND: &'static str = "special tax regime";
    const ALL: &'static [Self] = &[
        Self::MunicipalMicroEnterprise,
        Self::Estimate,
        Self::ProfessionalPartnership,
        Self::Cooperative,
        Self::Mei,
        Self::SimplesNacional,
    ];

    fn code(self) -> &'static str {
        match self {
            Self::MunicipalMicroEnterprise => "1",
            Self::Estimate => "2",
            Self::ProfessionalPartnership => "3",
            Self::Cooperative => "4",
            Self::Mei => "5",
            Self::SimplesNacional => "6",
        }
    }
}

/// Status of an issued NFS-e (`situacao`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NfseStatus {
    /// 1: Normal.
    Normal,
    /// 2: Cancelled.
    Cancelled,
    /// 3: Replaced.
    Replaced,
}

impl WireCode for NfseStatus {
    const KIND: &'static str = "NFS-e status";
    const ALL: &'static [Self] = &[Self::Normal, Self::Cancelled, Self::Replaced];

    fn code(self) -> &'static str {
        match self {
            Self::Normal => "1",
            Self::Cancelled => "2",
            Self::Replaced => "3",
        }
    }
}

/// Municipal agreement status (`sitConv`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgreementStatus {
    /// 1: Active.
    Active,
    /// 2: Inactive.
    Inactive,
}

impl WireCode for AgreementStatus {
    const KIND: &'static str = "agreement status";
    const ALL: &'static [Self] = &[Self::Active, Self::Inactive];

    fn code(self) -> &'static str {
        match self {
            Self::Active => "1",
            Self::Inactive => "2",
        }
    }
}

/// Generic 1 = no / 2 = yes flag used by the withholding parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    No,
    Yes,
}

impl WireCode for YesNo {
    const KIND: &'static str = "yes/no flag";
    const ALL: &'static [Self] = &[Self::No, Self::Yes];

    fn code(self) -> &'static str {
        match self {
            Self::No => "1",
            Self::Yes => "2",
        }
    }
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }
}
