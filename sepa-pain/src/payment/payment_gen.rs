use xml::writer::XmlEvent;

use crate::party::{Party, PartyRole};
use crate::{text_element, ToXml};

/// A party with its role already resolved to concrete element names.
pub(crate) struct PartyBlock {
    party_tag: &'static str,
    account_tag: &'static str,
    agent_tag: &'static str,
    name: String,
    street: String,
    city: String,
    country: String,
    iban: String,
    bic: String,
}

impl PartyBlock {
    pub(crate) fn new(role: PartyRole, party: &Party) -> Self {
        PartyBlock {
            party_tag: role.party_tag(),
            account_tag: role.account_tag(),
            agent_tag: role.agent_tag(),
            name: party.name.clone(),
            street: party.street.clone(),
            city: party.city.clone(),
            country: party.country.clone(),
            iban: party.iban.clone(),
            bic: party.bic.clone(),
        }
    }

    /// `<Cdtr>`/`<Dbtr>`: name plus postal address when any line is set.
    fn party_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![XmlEvent::start_element(self.party_tag).into()];
        text_element(&mut v, "Nm", &self.name);
        if !self.country.is_empty() || !self.street.is_empty() || !self.city.is_empty() {
            v.push(XmlEvent::start_element("PstlAdr").into());
            if !self.country.is_empty() {
                text_element(&mut v, "Ctry", &self.country);
            }
            if !self.street.is_empty() {
                text_element(&mut v, "AdrLine", &self.street);
            }
            if !self.city.is_empty() {
                text_element(&mut v, "AdrLine", &self.city);
            }
            v.push(XmlEvent::end_element().into());
        }
        v.push(XmlEvent::end_element().into());
        v
    }

    fn account_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![
            XmlEvent::start_element(self.account_tag).into(),
            XmlEvent::start_element("Id").into(),
        ];
        text_element(&mut v, "IBAN", &self.iban);
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v
    }

    /// Empty BIC is legal; the agent then carries `Othr/Id` =
    /// `NOTPROVIDED`.
    fn agent_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![
            XmlEvent::start_element(self.agent_tag).into(),
            XmlEvent::start_element("FinInstnId").into(),
        ];
        if self.bic.is_empty() {
            v.push(XmlEvent::start_element("Othr").into());
            text_element(&mut v, "Id", "NOTPROVIDED");
            v.push(XmlEvent::end_element().into());
        } else {
            text_element(&mut v, "BIC", &self.bic);
        }
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v
    }
}

pub(crate) struct TransactionString {
    pub(crate) instr_id: Option<String>,
    pub(crate) end_to_end_id: String,
    pub(crate) currency: String,
    pub(crate) amount: String,
    pub(crate) is_direct_debit: bool,
    pub(crate) mandate_id: String,
    pub(crate) mandate_signature_date: String,
    pub(crate) amendment: Option<String>,
    pub(crate) party: PartyBlock,
    pub(crate) purpose_code: Option<String>,
    pub(crate) remittance_info: String,
}

impl TransactionString {
    fn payment_id_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![XmlEvent::start_element("PmtId").into()];
        if let Some(instr_id) = &self.instr_id {
            text_element(&mut v, "InstrId", instr_id);
        }
        text_element(&mut v, "EndToEndId", &self.end_to_end_id);
        v.push(XmlEvent::end_element().into());
        v
    }

    fn mandate_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![
            XmlEvent::start_element("DrctDbtTx").into(),
            XmlEvent::start_element("MndtRltdInf").into(),
        ];
        text_element(&mut v, "MndtId", &self.mandate_id);
        text_element(&mut v, "DtOfSgntr", &self.mandate_signature_date);
        match &self.amendment {
            Some(details) => {
                text_element(&mut v, "AmdmntInd", "true");
                text_element(&mut v, "AmdmntInfDtls", details);
            }
            None => text_element(&mut v, "AmdmntInd", "false"),
        }
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v
    }
}

impl ToXml for TransactionString {
    fn to_xml(&self) -> Vec<XmlEvent> {
        let tag = if self.is_direct_debit {
            "DrctDbtTxInf"
        } else {
            "CdtTrfTxInf"
        };
        let mut v = vec![XmlEvent::start_element(tag).into()];
        v.extend(self.payment_id_xml());
        if self.is_direct_debit {
            v.push(
                XmlEvent::start_element("InstdAmt")
                    .attr("Ccy", &self.currency)
                    .into(),
            );
            v.push(XmlEvent::characters(&self.amount));
            v.push(XmlEvent::end_element().into());
            v.extend(self.mandate_xml());
        } else {
            v.push(XmlEvent::start_element("Amt").into());
            v.push(
                XmlEvent::start_element("InstdAmt")
                    .attr("Ccy", &self.currency)
                    .into(),
            );
            v.push(XmlEvent::characters(&self.amount));
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
        }
        v.extend(self.party.agent_xml());
        v.extend(self.party.party_xml());
        v.extend(self.party.account_xml());
        if let Some(code) = &self.purpose_code {
            v.push(XmlEvent::start_element("Purp").into());
            text_element(&mut v, "Cd", code);
            v.push(XmlEvent::end_element().into());
        }
        if !self.remittance_info.is_empty() {
            v.push(XmlEvent::start_element("RmtInf").into());
            text_element(&mut v, "Ustrd", &self.remittance_info);
            v.push(XmlEvent::end_element().into());
        }
        v.push(XmlEvent::end_element().into());
        v
    }
}

pub(crate) struct PaymentInformationString {
    pub(crate) id: String,
    pub(crate) method_code: &'static str,
    pub(crate) include_batch_detail: bool,
    pub(crate) batch_booking: String,
    pub(crate) transaction_count: String,
    pub(crate) control_sum: String,
    pub(crate) is_direct_debit: bool,
    pub(crate) local_instrument: &'static str,
    pub(crate) sequence_type: &'static str,
    pub(crate) instruction_priority: &'static str,
    pub(crate) category_purpose: Option<String>,
    pub(crate) due_date_tag: &'static str,
    pub(crate) due_date: String,
    pub(crate) party: PartyBlock,
    pub(crate) creditor_scheme_id: Option<String>,
    pub(crate) transactions: Vec<TransactionString>,
}

impl PaymentInformationString {
    fn payment_type_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![XmlEvent::start_element("PmtTpInf").into()];
        if !self.is_direct_debit {
            text_element(&mut v, "InstrPrty", self.instruction_priority);
        }
        v.push(XmlEvent::start_element("SvcLvl").into());
        text_element(&mut v, "Cd", "SEPA");
        v.push(XmlEvent::end_element().into());
        if self.is_direct_debit {
            v.push(XmlEvent::start_element("LclInstrm").into());
            text_element(&mut v, "Cd", self.local_instrument);
            v.push(XmlEvent::end_element().into());
            text_element(&mut v, "SeqTp", self.sequence_type);
        }
        if let Some(code) = &self.category_purpose {
            v.push(XmlEvent::start_element("CtgyPurp").into());
            text_element(&mut v, "Cd", code);
            v.push(XmlEvent::end_element().into());
        }
        v.push(XmlEvent::end_element().into());
        v
    }

    fn creditor_scheme_xml<'a>(&'a self, id: &'a str) -> Vec<XmlEvent<'a>> {
        let mut v = vec![
            XmlEvent::start_element("CdtrSchmeId").into(),
            XmlEvent::start_element("Id").into(),
            XmlEvent::start_element("PrvtId").into(),
            XmlEvent::start_element("Othr").into(),
        ];
        text_element(&mut v, "Id", id);
        v.push(XmlEvent::start_element("SchmeNm").into());
        text_element(&mut v, "Prtry", "SEPA");
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v
    }
}

impl ToXml for PaymentInformationString {
    fn to_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![XmlEvent::start_element("PmtInf").into()];
        text_element(&mut v, "PmtInfId", &self.id);
        text_element(&mut v, "PmtMtd", self.method_code);
        if self.include_batch_detail {
            text_element(&mut v, "BtchBookg", &self.batch_booking);
            text_element(&mut v, "NbOfTxs", &self.transaction_count);
            text_element(&mut v, "CtrlSum", &self.control_sum);
        }
        v.extend(self.payment_type_xml());
        text_element(&mut v, self.due_date_tag, &self.due_date);
        v.extend(self.party.party_xml());
        v.extend(self.party.account_xml());
        v.extend(self.party.agent_xml());
        text_element(&mut v, "ChrgBr", "SLEV");
        if let Some(scheme_id) = &self.creditor_scheme_id {
            v.extend(self.creditor_scheme_xml(scheme_id));
        }
        for transaction in &self.transactions {
            v.extend(transaction.to_xml());
        }
        v.push(XmlEvent::end_element().into());
        v
    }
}
