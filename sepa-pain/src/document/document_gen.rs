use xml::writer::XmlEvent;

use crate::payment::PaymentInformationString;
use crate::{text_element, ToXml};

pub(crate) struct DocumentString {
    pub(crate) namespace: String,
    pub(crate) schema_location: String,
    pub(crate) message_root_tag: &'static str,
    pub(crate) header: HeaderString,
    pub(crate) payment_blocks: Vec<PaymentInformationString>,
}

impl ToXml for DocumentString {
    fn to_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![
            XmlEvent::start_element("Document")
                .default_ns(self.namespace.as_str())
                .ns("xsi", "http://www.w3.org/2001/XMLSchema-instance")
                .attr("xsi:schemaLocation", &self.schema_location)
                .into(),
            XmlEvent::start_element(self.message_root_tag).into(),
        ];
        v.extend(self.header.to_xml());
        for block in &self.payment_blocks {
            v.extend(block.to_xml());
        }
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v
    }
}

pub(crate) struct HeaderString {
    pub(crate) message_id: String,
    pub(crate) creation_date_time: String,
    /// Version-2 trees carry `BtchBookg` and `Grpg` at this level.
    pub(crate) include_grouping: bool,
    pub(crate) batch_booking: String,
    pub(crate) grouping: String,
    pub(crate) transaction_count: String,
    pub(crate) control_sum: String,
    pub(crate) initiator_name: String,
    pub(crate) organisation_id: Option<String>,
}

impl ToXml for HeaderString {
    fn to_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![XmlEvent::start_element("GrpHdr").into()];
        text_element(&mut v, "MsgId", &self.message_id);
        text_element(&mut v, "CreDtTm", &self.creation_date_time);
        if self.include_grouping {
            text_element(&mut v, "BtchBookg", &self.batch_booking);
        }
        text_element(&mut v, "NbOfTxs", &self.transaction_count);
        text_element(&mut v, "CtrlSum", &self.control_sum);
        if self.include_grouping {
            text_element(&mut v, "Grpg", &self.grouping);
        }
        v.push(XmlEvent::start_element("InitgPty").into());
        text_element(&mut v, "Nm", &self.initiator_name);
        if let Some(organisation_id) = &self.organisation_id {
            v.push(XmlEvent::start_element("Id").into());
            v.push(XmlEvent::start_element("OrgId").into());
            v.push(XmlEvent::start_element("Othr").into());
            text_element(&mut v, "Id", organisation_id);
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
        }
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v
    }
}
