//! `NFSe` and `RespostaNFSe` mappings.

use super::reader::{Element, parse_decimal, parse_timestamp, parse_wire};
use super::signature::{read_signature, write_signature};
use super::writer::XmlWriter;
use super::{XmlDocument, XmlElement, XmlError};
use crate::core::{InfNfse, Nfse, NfseResponse, NfseValues, ReturnMessage};

impl XmlDocument for Nfse {
    const ROOT: &'static str = "NFSe";
}

impl XmlElement for Nfse {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        let inf = self
            .inf_nfse
            .as_ref()
            .ok_or_else(|| XmlError::Serialization("NFSe has no infNfse".into()))?;
        w.start_element(name)?;
        inf.write_to(w, "infNfse")?;
        write_signature(w, self.signature.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            inf_nfse: Some(el.req_child("infNfse")?),
            signature: read_signature(el),
        })
    }
}

impl XmlElement for InfNfse {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        match self.access_key.as_deref() {
            Some(key) => w.start_element_with_attrs(name, &[("Id", key)])?,
            None => w.start_element(name)?,
        };
        w.opt_text_element("nNfse", self.number.as_deref())?;
        w.opt_text_element("cVerif", self.verification_code.as_deref())?;
        w.timestamp_element("dhEmi", self.issued_at.as_ref())?;
        w.opt_child("prest", self.provider.as_ref())?;
        w.opt_child("toma", self.recipient.as_ref())?;
        w.opt_child("interm", self.intermediary.as_ref())?;
        w.opt_child("serv", self.service.as_ref())?;
        w.opt_child("valores", self.values.as_ref())?;
        w.code_element("situacao", self.status)?;
        w.timestamp_element("competencia", self.competence.as_ref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            access_key: el.attr("Id").map(str::to_string),
            number: el.opt_text("nNfse"),
            verification_code: el.opt_text("cVerif"),
            issued_at: el.opt_parse("dhEmi", parse_timestamp)?,
            provider: el.opt_child("prest")?,
            recipient: el.opt_child("toma")?,
            intermediary: el.opt_child("interm")?,
            service: el.opt_child("serv")?,
            values: el.opt_child("valores")?,
            status: el.req_parse("situacao", parse_wire)?,
            competence: el.opt_parse("competencia", parse_timestamp)?,
        })
    }
}

impl XmlElement for NfseValues {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.decimal_element("vServ", self.service_amount)?;
        w.decimal_element("vDed", self.deductions)?;
        w.decimal_element("vBC", self.tax_base)?;
        w.decimal_element("aliq", self.rate)?;
        w.decimal_element("vISS", self.iss_amount)?;
        w.decimal_element("vLiq", self.net_amount)?;
        w.decimal_element("vPIS", self.pis)?;
        w.decimal_element("vCOFINS", self.cofins)?;
        w.decimal_element("vINSS", self.inss)?;
        w.decimal_element("vIR", self.ir)?;
        w.decimal_element("vCSLL", self.csll)?;
        w.code_element("indIncentivo", self.tax_incentive)?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            service_amount: el.req_parse("vServ", parse_decimal)?,
            deductions: el.req_parse("vDed", parse_decimal)?,
            tax_base: el.req_parse("vBC", parse_decimal)?,
            rate: el.req_parse("aliq", parse_decimal)?,
            iss_amount: el.req_parse("vISS", parse_decimal)?,
            net_amount: el.req_parse("vLiq", parse_decimal)?,
            pis: el.req_parse("vPIS", parse_decimal)?,
            cofins: el.req_parse("vCOFINS", parse_decimal)?,
            inss: el.req_parse("vINSS", parse_decimal)?,
            ir: el.req_parse("vIR", parse_decimal)?,
            csll: el.req_parse("vCSLL", parse_decimal)?,
            tax_incentive: el.req_parse("indIncentivo", parse_wire)?,
        })
    }
}

impl XmlDocument for NfseResponse {
    const ROOT: &'static str = "RespostaNFSe";
}

impl XmlElement for NfseResponse {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("status", self.status.as_deref())?;
        w.opt_child("NFSe", self.nfse.as_ref())?;
        write_messages(w, &self.messages)?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            status: el.opt_text("status"),
            nfse: el.opt_child("NFSe")?,
            messages: read_messages(el)?,
        })
    }
}

impl XmlElement for ReturnMessage {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("codigo", self.code.as_deref())?;
        w.opt_text_element("descricao", self.description.as_deref())?;
        w.opt_text_element("correcao", self.correction.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            code: el.opt_text("codigo"),
            description: el.opt_text("descricao"),
            correction: el.opt_text("correcao"),
        })
    }
}

/// `mensagens` wrapper; omitted when there are no messages.
pub(super) fn write_messages(w: &mut XmlWriter, messages: &[ReturnMessage]) -> Result<(), XmlError> {
    if messages.is_empty() {
        return Ok(());
    }
    w.start_element("mensagens")?;
    for m in messages {
        m.write_to(w, "mensagem")?;
    }
    w.end_element("mensagens")?;
    Ok(())
}

pub(super) fn read_messages(el: &Element) -> Result<Vec<ReturnMessage>, XmlError> {
    match el.child("mensagens") {
        Some(list) => list.children_named("mensagem").map(ReturnMessage::read_from).collect(),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NfseStatus, TaxIncentive};
    use crate::xml::{NFSE_NAMESPACE, from_xml, to_xml};
    use rust_decimal_macros::dec;

    fn values() -> NfseValues {
        NfseValues {
            service_amount: dec!(1000.00),
            deductions: dec!(0.00),
            tax_base: dec!(1000.00),
            rate: dec!(2.5),
            iss_amount: dec!(25.00),
            net_amount: dec!(975.00),
            pis: dec!(6.50),
            cofins: dec!(30.00),
            inss: dec!(0),
            ir: dec!(15.00),
            csll: dec!(10.00),
            tax_incentive: TaxIncentive::No,
        }
    }

    #[test]
    fn federal_withholdings_precede_incentive_flag() {
        let mut inf = InfNfse::new(NfseStatus::Normal);
        inf.values = Some(values());
        let xml = to_xml(&Nfse {
            inf_nfse: Some(inf),
            signature: None,
        })
        .unwrap();
        let pos = |tag: &str| xml.find(tag).unwrap();
        assert!(pos("<vLiq>") < pos("<vPIS>"));
        assert!(pos("<vCSLL>") < pos("<indIncentivo>"));
        assert!(pos("</valores>") < pos("<situacao>1</situacao>"));
    }

    #[test]
    fn response_with_messages_round_trips() {
        let resp = NfseResponse {
            status: Some("REJEITADA".into()),
            nfse: None,
            messages: vec![
                ReturnMessage {
                    code: Some("E001".into()),
                    description: Some("CNPJ inválido".into()),
                    correction: Some("Informe um CNPJ válido".into()),
                },
                ReturnMessage {
                    code: Some("E002".into()),
                    ..ReturnMessage::default()
                },
            ],
        };
        let xml = to_xml(&resp).unwrap();
        assert!(xml.contains("<mensagens>"));
        assert!(!xml.contains("<NFSe>"));
        let back: NfseResponse = from_xml(&xml).unwrap();
        assert_eq!(back, resp);
    }

    #[test]
    fn empty_response_parses() {
        let xml = format!(r#"<RespostaNFSe xmlns="{NFSE_NAMESPACE}"/>"#);
        let resp: NfseResponse = from_xml(&xml).unwrap();
        assert_eq!(resp, NfseResponse::default());
    }

    #[test]
    fn missing_inf_nfse_is_a_serialization_error() {
        assert!(matches!(
            to_xml(&Nfse::default()),
            Err(XmlError::Serialization(_))
        ));
    }

    #[test]
    fn missing_status_is_schema_mismatch() {
        let xml = format!(r#"<NFSe xmlns="{NFSE_NAMESPACE}"><infNfse Id="K"/></NFSe>"#);
        let err = from_xml::<Nfse>(&xml).unwrap_err();
        assert!(matches!(err, XmlError::SchemaMismatch(ref m) if m.contains("situacao")));
    }
}
