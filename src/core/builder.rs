use super::codes::*;
use super::error::{NfseError, ValidationError};
use super::identifiers::{DpsId, DpsIdParts};
use super::types::*;
use super::validation;

/// Builder for constructing valid declarations.
///
/// The DPS id is derived from the provider's municipality and CNPJ plus the
/// series and number, zero-padded to their fixed widths.
///
/// ```
/// use chrono::DateTime;
/// use nfse::core::*;
/// use rust_decimal_macros::dec;
///
/// let now = DateTime::parse_from_rfc3339("2024-06-15T10:30:00-03:00").unwrap();
/// let dps = DpsBuilder::new("1", "42")
///     .provider(Provider {
///         cnpj: Some("12345678000195".into()),
///         municipal_registration: None,
///         municipality_code: Some("3550308".into()),
///     })
///     .recipient(RecipientBuilder::cpf("12345678909", "Maria da Silva").build())
///     .service("010101", "Desenvolvimento de software")
///     .values(DpsValues {
///         service_amount: dec!(1000.00),
///         deductions: dec!(0),
///         tax_base: dec!(1000.00),
///         rate: dec!(5),
///         iss_amount: dec!(50.00),
///         net_amount: dec!(950.00),
///         tax_incentive: TaxIncentive::No,
///     })
///     .issued_at(now)
///     .competence(now)
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     dps.inf_dps.unwrap().id.as_deref(),
///     Some("355030821234567800019500001000000000000042")
/// );
/// ```
pub struct DpsBuilder {
    series: String,
    number: String,
    provider: Option<Provider>,
    recipient: Option<Recipient>,
    intermediary: Option<Intermediary>,
    service: Option<Service>,
    values: Option<DpsValues>,
    substitute: Option<String>,
    issued_at: Option<Timestamp>,
    competence: Option<Timestamp>,
    operation_nature: OperationNature,
}

impl DpsBuilder {
    pub fn new(series: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            series: series.into(),
            number: number.into(),
            provider: None,
            recipient: None,
            intermediary: None,
            service: None,
            values: None,
            substitute: None,
            issued_at: None,
            competence: None,
            operation_nature: OperationNature::TaxedInMunicipality,
        }
    }

    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn recipient(mut self, recipient: Recipient) -> Self {
        self.recipient = Some(recipient);
        self
    }

    pub fn intermediary(mut self, intermediary: Intermediary) -> Self {
        self.intermediary = Some(intermediary);
        self
    }

    /// Set the service by LC 116 code and description.
    pub fn service(mut self, code: impl Into<String>, description: impl Into<String>) -> Self {
        let service = self.service.get_or_insert_with(Service::default);
        service.service_code = Some(code.into());
        service.description = Some(description.into());
        self
    }

    /// Replace the whole service block.
    pub fn service_details(mut self, service: Service) -> Self {
        self.service = Some(service);
        self
    }

    pub fn values(mut self, values: DpsValues) -> Self {
        self.values = Some(values);
        self
    }

    /// Mark this declaration as replacing the NFS-e with the given access key.
    pub fn replaces(mut self, access_key: impl Into<String>) -> Self {
        self.substitute = Some(access_key.into());
        self
    }

    pub fn issued_at(mut self, at: Timestamp) -> Self {
        self.issued_at = Some(at);
        self
    }

    pub fn competence(mut self, at: Timestamp) -> Self {
        self.competence = Some(at);
        self
    }

    pub fn operation_nature(mut self, nature: OperationNature) -> Self {
        self.operation_nature = nature;
        self
    }

    /// Assemble the declaration and run [`validation::validate_dps`] on it.
    ///
    /// A failed id derivation is reported together with every other violation.
    pub fn build(self) -> Result<Dps, NfseError> {
        let (id, id_error) = match self.provider.as_ref().map(|p| self.derive_id(p)) {
            Some(Ok(id)) => (Some(id), None),
            Some(Err(e)) => (None, Some(e)),
            None => (None, None),
        };

        let mut inf = InfDps::new(self.operation_nature);
        inf.id = id;
        inf.substitute = self.substitute.map(|key| Substitute {
            access_key: Some(key),
        });
        inf.provider = self.provider;
        inf.recipient = self.recipient;
        inf.intermediary = self.intermediary;
        inf.service = self.service;
        inf.values = self.values;
        inf.competence = self.competence;
        inf.number = Some(self.number);
        inf.series = Some(self.series);
        inf.issued_at = self.issued_at;

        let dps = Dps {
            inf_dps: Some(inf),
            signature: None,
        };
        let mut errors = validation::validate_dps(&dps);
        if let Some(e) = id_error {
            // The derivation failure replaces the generic missing-id entry.
            errors.retain(|v| v.field != "inf_dps.id");
            if !errors.iter().any(|v| v.field == e.field) {
                errors.insert(0, e);
            }
        }
        if errors.is_empty() {
            Ok(dps)
        } else {
            Err(NfseError::Validation(errors))
        }
    }

    fn derive_id(&self, provider: &Provider) -> Result<String, ValidationError> {
        let missing = |field: &str, rule: &str| {
            ValidationError::with_rule(
                format!("inf_dps.provider.{field}"),
                format!("provider {field} is required to derive the DPS id"),
                rule,
            )
        };
        let municipality = provider
            .municipality_code
            .as_deref()
            .ok_or_else(|| missing("municipality_code", "cMun"))?;
        let cnpj = provider
            .cnpj
            .as_deref()
            .ok_or_else(|| missing("cnpj", "CNPJ"))?;

        let parts = DpsIdParts {
            municipality_code: municipality.to_string(),
            registration_type: RegistrationType::Cnpj.code().to_string(),
            federal_registration: zero_pad(cnpj, 14),
            series: zero_pad(&self.series, 5),
            number: zero_pad(&self.number, 15),
        };
        DpsId::compose(&parts)
            .map(String::from)
            .map_err(|e| ValidationError::with_rule("inf_dps.id", e.to_string(), "Id"))
    }
}

fn zero_pad(value: &str, width: usize) -> String {
    format!("{value:0>width$}")
}

/// Builder for a service recipient.
pub struct RecipientBuilder {
    inner: Recipient,
}

impl RecipientBuilder {
    pub fn cpf(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_type(RegistrationType::Cpf, number, name)
    }

    pub fn cnpj(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_type(RegistrationType::Cnpj, number, name)
    }

    fn with_type(kind: RegistrationType, number: impl Into<String>, name: impl Into<String>) -> Self {
        let mut inner = Recipient::new(kind);
        inner.registration_number = Some(number.into());
        inner.name = Some(name.into());
        Self { inner }
    }

    pub fn address(mut self, address: Address) -> Self {
        self.inner.address = Some(address);
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.inner.phone = Some(phone.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.inner.email = Some(email.into());
        self
    }

    pub fn build(self) -> Recipient {
        self.inner
    }
}

impl EventRegistrationRequest {
    /// Cancellation request (`e101101`) for the NFS-e with `access_key`.
    pub fn cancellation(
        access_key: &str,
        cancellation_code: impl Into<String>,
        justification: &str,
        at: Timestamp,
    ) -> Result<Self, NfseError> {
        require(access_key, "inf.access_key", "chNfse")?;
        require(justification, "inf.details.justification", "xJust")?;
        Ok(Self::first(
            access_key,
            EventType::CancellationRequest,
            at,
            EventDetails {
                description: Some(EventType::CancellationRequest.description().to_string()),
                justification: Some(justification.to_string()),
                cancellation_code: Some(cancellation_code.into()),
            },
        ))
    }

    /// Confirmation of the operation by `actor`.
    pub fn confirmation(access_key: &str, actor: EventActor, at: Timestamp) -> Result<Self, NfseError> {
        require(access_key, "inf.access_key", "chNfse")?;
        let event_type = EventType::confirmation(actor);
        Ok(Self::first(
            access_key,
            event_type,
            at,
            EventDetails {
                description: Some(event_type.description().to_string()),
                ..Default::default()
            },
        ))
    }

    /// Rejection of the operation by `actor`.
    pub fn rejection(
        access_key: &str,
        actor: EventActor,
        justification: &str,
        at: Timestamp,
    ) -> Result<Self, NfseError> {
        require(access_key, "inf.access_key", "chNfse")?;
        require(justification, "inf.details.justification", "xJust")?;
        let event_type = EventType::rejection(actor);
        Ok(Self::first(
            access_key,
            event_type,
            at,
            EventDetails {
                description: Some(event_type.description().to_string()),
                justification: Some(justification.to_string()),
                cancellation_code: None,
            },
        ))
    }

    fn first(access_key: &str, event_type: EventType, at: Timestamp, details: EventDetails) -> Self {
        Self {
            inf: Some(EventRegistrationInfo {
                access_key: Some(access_key.to_string()),
                event_type,
                sequence: 1,
                occurred_at: Some(at),
                details: Some(details),
            }),
            signature: None,
        }
    }
}

fn require(value: &str, field: &str, rule: &str) -> Result<(), NfseError> {
    if value.trim().is_empty() {
        Err(NfseError::Validation(vec![ValidationError::with_rule(
            field,
            "value is required",
            rule,
        )]))
    } else {
        Ok(())
    }
}
