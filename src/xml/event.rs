//! Event documents: `Evento`, `pedRegEvento`, `RespostaEvento`, `ListaEventos`.

use super::nfse::{read_messages, write_messages};
use super::reader::{Element, parse_timestamp, parse_u32, parse_wire};
use super::signature::{read_signature, write_signature};
use super::writer::XmlWriter;
use super::{XmlDocument, XmlElement, XmlError};
use crate::core::{
    Event, EventDetails, EventList, EventRegistrationInfo, EventRegistrationRequest,
    EventResponse, InfEvent,
};

impl XmlDocument for Event {
    const ROOT: &'static str = "Evento";
}

impl XmlElement for Event {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        let inf = self
            .inf_event
            .as_ref()
            .ok_or_else(|| XmlError::Serialization("Evento has no infEvento".into()))?;
        w.start_element(name)?;
        inf.write_to(w, "infEvento")?;
        write_signature(w, self.signature.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            inf_event: Some(el.req_child("infEvento")?),
            signature: read_signature(el),
        })
    }
}

impl XmlElement for InfEvent {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        match self.id.as_deref() {
            Some(id) => w.start_element_with_attrs(name, &[("Id", id)])?,
            None => w.start_element(name)?,
        };
        w.opt_text_element("chNfse", self.access_key.as_deref())?;
        if let Some(kind) = self.event_type {
            w.code_element("tpEvento", kind)?;
        }
        w.text_element("nSeqEvento", &self.sequence.to_string())?;
        w.timestamp_element("dhEvento", self.occurred_at.as_ref())?;
        w.opt_child("detEvento", self.details.as_ref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            id: el.attr("Id").map(str::to_string),
            access_key: el.opt_text("chNfse"),
            event_type: el.opt_parse("tpEvento", parse_wire)?,
            sequence: el.req_parse("nSeqEvento", parse_u32)?,
            occurred_at: el.opt_parse("dhEvento", parse_timestamp)?,
            details: el.opt_child("detEvento")?,
        })
    }
}

impl XmlElement for EventDetails {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("descEvento", self.description.as_deref())?;
        w.opt_text_element("xJust", self.justification.as_deref())?;
        w.opt_text_element("cCanc", self.cancellation_code.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            description: el.opt_text("descEvento"),
            justification: el.opt_text("xJust"),
            cancellation_code: el.opt_text("cCanc"),
        })
    }
}

impl XmlDocument for EventRegistrationRequest {
    const ROOT: &'static str = "pedRegEvento";
}

impl XmlElement for EventRegistrationRequest {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        let inf = self
            .inf
            .as_ref()
            .ok_or_else(|| XmlError::Serialization("pedRegEvento has no infPedReg".into()))?;
        w.start_element(name)?;
        inf.write_to(w, "infPedReg")?;
        write_signature(w, self.signature.as_deref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            inf: Some(el.req_child("infPedReg")?),
            signature: read_signature(el),
        })
    }
}

impl XmlElement for EventRegistrationInfo {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("chNfse", self.access_key.as_deref())?;
        w.code_element("tpEvento", self.event_type)?;
        w.text_element("nSeqEvento", &self.sequence.to_string())?;
        w.timestamp_element("dhEvento", self.occurred_at.as_ref())?;
        w.opt_child("detEvento", self.details.as_ref())?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            access_key: el.opt_text("chNfse"),
            event_type: el.req_parse("tpEvento", parse_wire)?,
            sequence: el.req_parse("nSeqEvento", parse_u32)?,
            occurred_at: el.opt_parse("dhEvento", parse_timestamp)?,
            details: el.opt_child("detEvento")?,
        })
    }
}

impl XmlDocument for EventResponse {
    const ROOT: &'static str = "RespostaEvento";
}

impl XmlElement for EventResponse {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        w.opt_text_element("status", self.status.as_deref())?;
        w.opt_child("Evento", self.event.as_ref())?;
        write_messages(w, &self.messages)?;
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            status: el.opt_text("status"),
            event: el.opt_child("Evento")?,
            messages: read_messages(el)?,
        })
    }
}

impl XmlDocument for EventList {
    const ROOT: &'static str = "ListaEventos";
}

impl XmlElement for EventList {
    fn write_to(&self, w: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
        w.start_element(name)?;
        for event in &self.events {
            event.write_to(w, "Evento")?;
        }
        w.end_element(name)?;
        Ok(())
    }

    fn read_from(el: &Element) -> Result<Self, XmlError> {
        Ok(Self {
            events: el
                .children_named("Evento")
                .map(Event::read_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventType;
    use crate::xml::{NFSE_NAMESPACE, from_xml, to_xml};
    use chrono::DateTime;

    const KEY: &str = "35503082123456780001950000000000000000000000000042";

    fn event(seq: u32, kind: EventType) -> Event {
        Event {
            inf_event: Some(InfEvent {
                id: Some(format!("EVT{seq}")),
                access_key: Some(KEY.into()),
                event_type: Some(kind),
                sequence: seq,
                occurred_at: Some(DateTime::parse_from_rfc3339("2024-07-01T08:00:00-03:00").unwrap()),
                details: Some(EventDetails {
                    description: Some(kind.description().into()),
                    ..EventDetails::default()
                }),
            }),
            signature: None,
        }
    }

    #[test]
    fn registration_request_layout() {
        let req = EventRegistrationRequest {
            inf: Some(EventRegistrationInfo {
                access_key: Some(KEY.into()),
                event_type: EventType::CancellationRequest,
                sequence: 1,
                occurred_at: None,
                details: Some(EventDetails {
                    justification: Some("Erro na emissão".into()),
                    cancellation_code: Some("1".into()),
                    ..EventDetails::default()
                }),
            }),
            signature: None,
        };
        let xml = to_xml(&req).unwrap();
        assert!(xml.contains(&format!(r#"<pedRegEvento xmlns="{NFSE_NAMESPACE}">"#)));
        assert!(xml.contains("<tpEvento>e101101</tpEvento>"));
        assert!(xml.contains("<nSeqEvento>1</nSeqEvento>"));
        assert!(xml.contains("<xJust>Erro na emissão</xJust>"));
        let back: EventRegistrationRequest = from_xml(&xml).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn list_round_trip_keeps_order() {
        let list = EventList {
            events: vec![
                event(1, EventType::RecipientConfirmation),
                event(2, EventType::CancellationRequest),
            ],
        };
        let back: EventList = from_xml(&to_xml(&list).unwrap()).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn response_wraps_event() {
        let resp = EventResponse {
            status: Some("REGISTRADO".into()),
            event: Some(event(1, EventType::Block)),
            messages: Vec::new(),
        };
        let xml = to_xml(&resp).unwrap();
        assert!(!xml.contains("<mensagens>"));
        let back: EventResponse = from_xml(&xml).unwrap();
        assert_eq!(back, resp);
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        let xml = format!(
            r#"<Evento xmlns="{NFSE_NAMESPACE}"><infEvento><tpEvento>e999999</tpEvento><nSeqEvento>1</nSeqEvento></infEvento></Evento>"#
        );
        let err = from_xml::<Event>(&xml).unwrap_err();
        assert!(matches!(err, XmlError::SchemaMismatch(ref m) if m.contains("e999999")));
    }

    #[test]
    fn missing_inner_blocks_fail_to_serialize() {
        assert!(matches!(to_xml(&Event::default()), Err(XmlError::Serialization(_))));
        assert!(matches!(
            to_xml(&EventRegistrationRequest::default()),
            Err(XmlError::Serialization(_))
        ));
    }
}
