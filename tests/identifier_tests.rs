//! Identifier codec properties.
//!
//! Run with: `cargo test --test identifier_tests`

#![cfg(feature = "core")]

use nfse::core::identifiers::{normalize_tax_id, DPS_ID_LEN};
use nfse::core::*;
use proptest::prelude::*;

fn arb_parts() -> impl Strategy<Value = DpsIdParts> {
    (
        "[0-9]{7}",
        prop_oneof![Just("1".to_string()), Just("2".to_string())],
        "[0-9]{14}",
        "[0-9]{5}",
        "[0-9]{15}",
    )
        .prop_map(
            |(municipality_code, registration_type, federal_registration, series, number)| {
                DpsIdParts {
                    municipality_code,
                    registration_type,
                    federal_registration,
                    series,
                    number,
                }
            },
        )
}

proptest! {
    /// compose → decompose is the identity.
    #[test]
    fn compose_then_decompose_is_identity(parts in arb_parts()) {
        let id = DpsId::compose(&parts).unwrap();
        prop_assert_eq!(id.as_str().len(), DPS_ID_LEN);
        prop_assert!(DpsId::validate(id.as_str()));
        prop_assert_eq!(DpsId::decompose(id.as_str()).unwrap(), parts);
    }

    /// Any registration-type digit other than 1 or 2 is rejected.
    #[test]
    fn compose_rejects_other_registration_types(mut parts in arb_parts(), digit in "[03-9]") {
        parts.registration_type = digit;
        prop_assert!(matches!(
            DpsId::compose(&parts),
            Err(IdentifierError::InvalidFormat(_))
        ));
    }

    /// Truncating a valid id by one character invalidates it.
    #[test]
    fn truncated_ids_are_invalid(parts in arb_parts()) {
        let id = DpsId::compose(&parts).unwrap();
        let short = &id.as_str()[..DPS_ID_LEN - 1];
        prop_assert!(!DpsId::validate(short));
        prop_assert!(DpsId::decompose(short).is_err());
    }

    /// Access keys are validated by length alone.
    #[test]
    fn access_key_length_only(key in "[A-Za-z0-9]{50}", short in "[A-Za-z0-9]{0,49}") {
        prop_assert!(AccessKey::validate(&key));
        prop_assert!(!AccessKey::validate(&short));
    }

    /// Punctuation is stripped from tax ids.
    #[test]
    fn tax_id_strips_punctuation(digits in "[0-9]{14}") {
        let formatted = format!(
            "{}.{}.{}/{}-{}",
            &digits[0..2], &digits[2..5], &digits[5..8], &digits[8..12], &digits[12..14]
        );
        prop_assert_eq!(normalize_tax_id(&formatted).unwrap(), digits);
    }
}

#[test]
fn six_digit_municipality_is_rejected() {
    let parts = DpsIdParts {
        municipality_code: "355030".into(),
        registration_type: "2".into(),
        federal_registration: "12345678000195".into(),
        series: "00001".into(),
        number: "000000000000042".into(),
    };
    assert!(matches!(
        DpsId::compose(&parts),
        Err(IdentifierError::InvalidFormat(_))
    ));
}

#[test]
fn well_formed_id_and_its_truncation() {
    let id = "355030821234567890123412345000000000000001";
    assert_eq!(id.len(), 42);
    assert!(DpsId::validate(id));
    assert!(!DpsId::validate(&id[..41]));

    let parts = DpsId::decompose(id).unwrap();
    assert_eq!(parts.municipality_code, "3550308");
    assert_eq!(parts.registration_type, "2");
    assert_eq!(parts.federal_registration, "12345678901234");
    assert_eq!(parts.series, "12345");
    assert_eq!(parts.number, "000000000000001");
}

#[test]
fn display_and_parse_agree() {
    let id = DpsId::compose(&DpsIdParts {
        municipality_code: "3550308".into(),
        registration_type: RegistrationType::Cnpj.code().into(),
        federal_registration: "00012345678000".into(),
        series: "00001".into(),
        number: "000000000000042".into(),
    })
    .unwrap();
    assert_eq!(id.parts().number, "000000000000042");
    assert_eq!(id.to_string().parse::<DpsId>().unwrap(), id);
}
