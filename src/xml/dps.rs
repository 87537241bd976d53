//! `Dps` mapping.

use super::reader::{Element, parse_decimal, parse_timestamp, parse_wire};
use super::signature::{read_signature, write_signature};
use super::writer::XmlWriter;
use super::{XmlDocument, XmlElement, XmlError};
use crate::core::{Dps, DpsValues, InfDps, Substitute};

impl XmlDocument for Dps {
    const ROOT: &'static str = "Dps";
}

impl XmlElement for Dps {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        let inf = self
            .inf_dps
            .as_ref()
            .ok_or_else(|| XmlError::Serialization("Dps has no infDps".into()))?;
        w.start_element(name)?;
        inf.write_to(w, "infDps")?;
        write_signature(w, self.signature.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            inf_dps: Some(el.req_child("infDps")?),
            signature: read_signature(el),
        })
    }
}

impl XmlElement for InfDps {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        match self.id.as_deref() {
            Some(id) => w.start_element_with_attrs(name, &[("Id", id)])?,
            None => w.start_element(name)?,
        };
        w.opt_child("substituta", self.substitute.as_ref())?;
        w.opt_child("prest", self.provider.as_ref())?;
        w.opt_child("toma", self.recipient.as_ref())?;
        w.opt_child("interm", self.intermediary.as_ref())?;
        w.opt_child("serv", self.service.as_ref())?;
        w.opt_child("valores", self.values.as_ref())?;
        w.timestamp_element("competencia", self.competence.as_ref())?;
        w.opt_text_element("nDps", self.number.as_deref())?;
        w.opt_text_element("serie", self.series.as_deref())?;
        w.timestamp_element("dhEmi", self.issued_at.as_ref())?;
        w.code_element("natOp", self.operation_nature)?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            id: el.attr("Id").map(str::to_string),
            substitute: el.opt_child("substituta")?,
            provider: el.opt_child("prest")?,
            recipient: el.opt_child("toma")?,
            intermediary: el.opt_child("interm")?,
            service: el.opt_child("serv")?,
            values: el.opt_child("valores")?,
            competence: el.opt_parse("competencia", parse_timestamp)?,
            number: el.opt_text("nDps"),
            series: el.opt_text("serie"),
            issued_at: el.opt_parse("dhEmi", parse_timestamp)?,
            operation_nature: el.req_parse("natOp", parse_wire)?,
        })
    }
}

impl XmlElement for Substitute {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("chave", self.access_key.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            access_key: el.opt_text("chave"),
        })
    }
}

impl XmlElement for DpsValues {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.decimal_element("vServ", self.service_amount)?;
        w.decimal_element("vDed", self.deductions)?;
        w.decimal_element("vBC", self.tax_base)?;
        w.decimal_element("aliq", self.rate)?;
        w.decimal_element("vISS", self.iss_amount)?;
        w.decimal_element("vLiq", self.net_amount)?;
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
            tax_incentive: el.req_parse("indIncentivo", parse_wire)?,
        })
    }
}
