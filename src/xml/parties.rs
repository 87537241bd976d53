//! Blocks shared by DPS and NFS-e: parties, address, and service.

use super::reader::{Element, parse_wire};
use super::writer::XmlWriter;
use super::{XmlElement, XmlError};
use crate::core::{Address, Intermediary, Provider, Recipient, Service};

impl XmlElement for Provider {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("CNPJ", self.cnpj.as_deref())?;
        w.opt_text_element("IM", self.municipal_registration.as_deref())?;
        w.opt_text_element("cMun", self.municipality_code.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            cnpj: el.opt_text("CNPJ"),
            municipal_registration: el.opt_text("IM"),
            municipality_code: el.opt_text("cMun"),
        })
    }
}

impl XmlElement for Recipient {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.code_element("tpInsc", self.registration_type)?;
        w.opt_text_element("nInsc", self.registration_number.as_deref())?;
        w.opt_text_element("xNome", self.name.as_deref())?;
        w.opt_child("end", self.address.as_ref())?;
        w.opt_text_element("fone", self.phone.as_deref())?;
        w.opt_text_element("email", self.email.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            registration_type: el.req_parse("tpInsc", parse_wire)?,
            registration_number: el.opt_text("nInsc"),
            name: el.opt_text("xNome"),
            address: el.opt_child("end")?,
            phone: el.opt_text("fone"),
            email: el.opt_text("email"),
        })
    }
}

impl XmlElement for Intermediary {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.code_element("tpInsc", self.registration_type)?;
        w.opt_text_element("nInsc", self.registration_number.as_deref())?;
        w.opt_text_element("xNome", self.name.as_deref())?;
        w.opt_text_element("cMun", self.municipality_code.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            registration_type: el.req_parse("tpInsc", parse_wire)?,
            registration_number: el.opt_text("nInsc"),
            name: el.opt_text("xNome"),
            municipality_code: el.opt_text("cMun"),
        })
    }
}

impl XmlElement for Address {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("tpLog", self.street_type.as_deref())?;
        w.opt_text_element("xLog", self.street.as_deref())?;
        w.opt_text_element("nro", self.number.as_deref())?;
        w.opt_text_element("xCpl", self.complement.as_deref())?;
        w.opt_text_element("bairro", self.district.as_deref())?;
        w.opt_text_element("cMun", self.municipality_code.as_deref())?;
        w.opt_text_element("CEP", self.postal_code.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            street_type: el.opt_text("tpLog"),
            street: el.opt_text("xLog"),
            number: el.opt_text("nro"),
            complement: el.opt_text("xCpl"),
            district: el.opt_text("bairro"),
            municipality_code: el.opt_text("cMun"),
            postal_code: el.opt_text("CEP"),
        })
    }
}

impl XmlElement for Service {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("cTribMun", self.municipal_tax_code.as_deref())?;
        w.opt_text_element("cCnae", self.cnae.as_deref())?;
        w.opt_text_element("cServ", self.service_code.as_deref())?;
        w.opt_text_element("xServ", self.description.as_deref())?;
        w.opt_text_element("cMunIncid", self.incidence_municipality.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            municipal_tax_code: el.opt_text("cTribMun"),
            cnae: el.opt_text("cCnae"),
            service_code: el.opt_text("cServ"),
            description: el.opt_text("xServ"),
            incidence_municipality: el.opt_text("cMunIncid"),
        })
    }
}
