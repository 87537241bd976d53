//! Municipal parameter documents.

use super::reader::{Element, parse_decimal, parse_timestamp, parse_wire};
use super::writer::XmlWriter;
use super::{XmlDocument, XmlElement, XmlError};
use crate::core::{
    AgreementParameters, BenefitParameters, MunicipalParameters, ServiceParameters,
    WithholdingParameters,
};

impl XmlDocument for MunicipalParameters {
    const ROOT: &'static str = "ParametrosMunicipais";
}

impl XmlElement for MunicipalParameters {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("cMun", self.municipality_code.as_deref())?;
        w.opt_text_element("xMun", self.municipality_name.as_deref())?;
        w.code_element("sitConv", self.agreement_status)?;
        w.timestamp_element("dtIniConv", self.agreement_start.as_ref())?;
        w.timestamp_element("dtFimConv", self.agreement_end.as_ref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            municipality_code: el.opt_text("cMun"),
            municipality_name: el.opt_text("xMun"),
            agreement_status: el.req_parse("sitConv", parse_wire)?,
            agreement_start: el.opt_parse("dtIniConv", parse_timestamp)?,
            agreement_end: el.opt_parse("dtFimConv", parse_timestamp)?,
        })
    }
}

impl XmlDocument for AgreementParameters {
    const ROOT: &'static str = "ParametrosConvenio";
}

impl XmlElement for AgreementParameters {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("cMun", self.municipality_code.as_deref())?;
        w.code_element("sitConv", self.agreement_status)?;
        w.timestamp_element("dtIniConv", self.agreement_start.as_ref())?;
        w.timestamp_element("dtFimConv", self.agreement_end.as_ref())?;
        w.opt_text_element("email", self.email.as_deref())?;
        w.opt_text_element("fone", self.phone.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            municipality_code: el.opt_text("cMun"),
            agreement_status: el.req_parse("sitConv", parse_wire)?,
            agreement_start: el.opt_parse("dtIniConv", parse_timestamp)?,
            agreement_end: el.opt_parse("dtFimConv", parse_timestamp)?,
            email: el.opt_text("email"),
            phone: el.opt_text("fone"),
        })
    }
}

impl XmlDocument for ServiceParameters {
    const ROOT: &'static str = "ParametrosServico";
}

impl XmlElement for ServiceParameters {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("cMun", self.municipality_code.as_deref())?;
        w.opt_text_element("cServ", self.service_code.as_deref())?;
        w.opt_text_element("xServ", self.description.as_deref())?;
        w.decimal_element("aliq", self.rate)?;
        w.decimal_element("aliqMin", self.min_rate)?;
        w.decimal_element("aliqMax", self.max_rate)?;
        if let Some(regime) = self.special_regime {
            w.code_element("regEspTrib", regime)?;
        }
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            municipality_code: el.opt_text("cMun"),
            service_code: el.opt_text("cServ"),
            description: el.opt_text("xServ"),
            rate: el.req_parse("aliq", parse_decimal)?,
            min_rate: el.req_parse("aliqMin", parse_decimal)?,
            max_rate: el.req_parse("aliqMax", parse_decimal)?,
            special_regime: el.opt_parse("regEspTrib", parse_wire)?,
        })
    }
}

impl XmlDocument for WithholdingParameters {
    const ROOT: &'static str = "ParametrosRetencoes";
}

impl XmlElement for WithholdingParameters {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("cMun", self.municipality_code.as_deref())?;
        w.code_element("tpInsc", self.registration_type)?;
        w.opt_text_element("nInsc", self.registration_number.as_deref())?;
        w.code_element("retPIS", self.pis)?;
        w.code_element("retCOFINS", self.cofins)?;
        w.code_element("retINSS", self.inss)?;
        w.code_element("retIR", self.ir)?;
        w.code_element("retCSLL", self.csll)?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            municipality_code: el.opt_text("cMun"),
            registration_type: el.req_parse("tpInsc", parse_wire)?,
            registration_number: el.opt_text("nInsc"),
            pis: el.req_parse("retPIS", parse_wire)?,
            cofins: el.req_parse("retCOFINS", parse_wire)?,
            inss: el.req_parse("retINSS", parse_wire)?,
            ir: el.req_parse("retIR", parse_wire)?,
            csll: el.req_parse("retCSLL", parse_wire)?,
        })
    }
}

impl XmlDocument for BenefitParameters {
    const ROOT: &'static str = "ParametrosBeneficios";
}

impl XmlElement for BenefitParameters {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("cMun", self.municipality_code.as_deref())?;
        w.code_element("tpInsc", self.registration_type)?;
        w.opt_text_element("nInsc", self.registration_number.as_deref())?;
        w.opt_text_element("cBenef", self.benefit_code.as_deref())?;
        w.opt_text_element("xBenef", self.description.as_deref())?;
        w.timestamp_element("dtInicio", self.start.as_ref())?;
        w.timestamp_element("dtFim", self.end.as_ref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            municipality_code: el.opt_text("cMun"),
            registration_type: el.req_parse("tpInsc", parse_wire)?,
            registration_number: el.opt_text("nInsc"),
            benefit_code: el.opt_text("cBenef"),
            description: el.opt_text("xBenef"),
            start: el.opt_parse("dtInicio", parse_timestamp)?,
            end: el.opt_parse("dtFim", parse_timestamp)?,
        })
    }
}
