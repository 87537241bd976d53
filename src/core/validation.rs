use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::codes::RegistrationType;
use super::error::ValidationError;
use super::identifiers::{ACCESS_KEY_LEN, AccessKey, DPS_ID_LEN, MUNICIPALITY_CODE_LEN};
use super::types::*;

/// Validate a DPS before submission.
/// Returns all validation errors found (not just the first).
pub fn validate_dps(dps: &Dps) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(inf) = &dps.inf_dps else {
        errors.push(ValidationError::with_rule(
            "inf_dps",
            "declaration body is required",
            "infDps",
        ));
        return errors;
    };

    // Length is checked on the raw value; surrounding whitespace would reach the wire.
    match inf.id.as_deref().filter(|id| !id.trim().is_empty()) {
        None => errors.push(ValidationError::with_rule(
            "inf_dps.id",
            "DPS id is required",
            "Id",
        )),
        Some(id) if id.chars().count() != DPS_ID_LEN => {
            errors.push(ValidationError::with_rule(
                "inf_dps.id",
                format!("DPS id must have {DPS_ID_LEN} characters"),
                "Id",
            ));
        }
        Some(_) => {}
    }

    if let Some(sub) = &inf.substitute {
        match sub.access_key.as_deref() {
            Some(key) if AccessKey::validate(key) => {}
            _ => errors.push(ValidationError::with_rule(
                "inf_dps.substitute.access_key",
                format!("replaced NFS-e access key must have {ACCESS_KEY_LEN} characters"),
                "chave",
            )),
        }
    }

    match &inf.provider {
        None => errors.push(ValidationError::with_rule(
            "inf_dps.provider",
            "provider data is required",
            "prest",
        )),
        Some(p) => validate_provider(p, &mut errors),
    }

    match &inf.recipient {
        None => errors.push(ValidationError::with_rule(
            "inf_dps.recipient",
            "recipient data is required",
            "toma",
        )),
        Some(r) => validate_recipient(r, &mut errors),
    }

    if let Some(i) = &inf.intermediary {
        if let Some(number) = non_blank(&i.registration_number) {
            check_registration_length(
                i.registration_type,
                number,
                "inf_dps.intermediary.registration_number",
                &mut errors,
            );
        }
    }

    match &inf.service {
        None => errors.push(ValidationError::with_rule(
            "inf_dps.service",
            "service data is required",
            "serv",
        )),
        Some(s) => {
            if non_blank(&s.service_code).is_none() {
                errors.push(ValidationError::with_rule(
                    "inf_dps.service.service_code",
                    "service code is required",
                    "cServ",
                ));
            }
            if non_blank(&s.description).is_none() {
                errors.push(ValidationError::with_rule(
                    "inf_dps.service.description",
                    "service description is required",
                    "xServ",
                ));
            }
        }
    }

    match &inf.values {
        None => errors.push(ValidationError::with_rule(
            "inf_dps.values",
            "values are required",
            "valores",
        )),
        Some(v) => validate_values(v, &mut errors),
    }

    if non_blank(&inf.number).is_none() {
        errors.push(ValidationError::with_rule(
            "inf_dps.number",
            "DPS number is required",
            "nDps",
        ));
    }
    if inf.issued_at.is_none() {
        errors.push(ValidationError::with_rule(
            "inf_dps.issued_at",
            "emission date-time is required",
            "dhEmi",
        ));
    }
    if inf.competence.is_none() {
        errors.push(ValidationError::with_rule(
            "inf_dps.competence",
            "competence date is required",
            "competencia",
        ));
    }

    errors
}

fn validate_provider(p: &Provider, errors: &mut Vec<ValidationError>) {
    if non_blank(&p.cnpj).is_none() {
        errors.push(ValidationError::with_rule(
            "inf_dps.provider.cnpj",
            "provider CNPJ is required",
            "CNPJ",
        ));
    }
    match non_blank(&p.municipality_code) {
        None => errors.push(ValidationError::with_rule(
            "inf_dps.provider.municipality_code",
            "provider municipality code is required",
            "cMun",
        )),
        Some(code) if code.chars().count() != MUNICIPALITY_CODE_LEN => {
            errors.push(ValidationError::with_rule(
                "inf_dps.provider.municipality_code",
                format!("municipality code must have {MUNICIPALITY_CODE_LEN} digits"),
                "cMun",
            ));
        }
        Some(_) => {}
    }
}

fn validate_recipient(r: &Recipient, errors: &mut Vec<ValidationError>) {
    match non_blank(&r.registration_number) {
        None => errors.push(ValidationError::with_rule(
            "inf_dps.recipient.registration_number",
            "recipient registration number is required",
            "nInsc",
        )),
        Some(number) => check_registration_length(
            r.registration_type,
            number,
            "inf_dps.recipient.registration_number",
            errors,
        ),
    }
    if non_blank(&r.name).is_none() {
        errors.push(ValidationError::with_rule(
            "inf_dps.recipient.name",
            "recipient name is required",
            "xNome",
        ));
    }
}

fn check_registration_length(
    kind: RegistrationType,
    number: &str,
    field: &str,
    errors: &mut Vec<ValidationError>,
) {
    let expected = kind.digits();
    if number.len() != expected || !number.bytes().all(|b| b.is_ascii_digit()) {
        let label = match kind {
            RegistrationType::Cpf => "CPF",
            RegistrationType::Cnpj => "CNPJ",
        };
        errors.push(ValidationError::with_rule(
            field,
            format!("{label} must have {expected} digits"),
            "nInsc",
        ));
    }
}

fn validate_values(v: &DpsValues, errors: &mut Vec<ValidationError>) {
    if v.service_amount <= Decimal::ZERO {
        errors.push(ValidationError::with_rule(
            "inf_dps.values.service_amount",
            "service amount must be greater than zero",
            "vServ",
        ));
    }
    if v.tax_base < Decimal::ZERO {
        errors.push(ValidationError::with_rule(
            "inf_dps.values.tax_base",
            "tax base must not be negative",
            "vBC",
        ));
    }
    if v.rate < Decimal::ZERO || v.rate > dec!(100) {
        errors.push(ValidationError::with_rule(
            "inf_dps.values.rate",
            "rate must be between 0 and 100",
            "aliq",
        ));
    }
}

/// Validate an event registration request before submission.
pub fn validate_event_request(req: &EventRegistrationRequest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(inf) = &req.inf else {
        errors.push(ValidationError::with_rule(
            "inf",
            "registration body is required",
            "infPedReg",
        ));
        return errors;
    };

    match non_blank(&inf.access_key) {
        None => errors.push(ValidationError::with_rule(
            "inf.access_key",
            "NFS-e access key is required",
            "chNfse",
        )),
        Some(key) if !AccessKey::validate(key) => errors.push(ValidationError::with_rule(
            "inf.access_key",
            format!("access key must have {ACCESS_KEY_LEN} characters"),
            "chNfse",
        )),
        Some(_) => {}
    }
    if inf.sequence == 0 {
        errors.push(ValidationError::with_rule(
            "inf.sequence",
            "event sequence number must be greater than zero",
            "nSeqEvento",
        ));
    }
    if inf.occurred_at.is_none() {
        errors.push(ValidationError::with_rule(
            "inf.occurred_at",
            "event date-time is required",
            "dhEvento",
        ));
    }
    if inf.details.is_none() {
        errors.push(ValidationError::with_rule(
            "inf.details",
            "event details are required",
            "detEvento",
        ));
    }

    errors
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
