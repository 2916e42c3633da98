use crate::error::SepaResult;
use crate::sanitize::{sanitize_text, MAX_COUNTRY, MAX_NAME};
use crate::validate::{assert_bic_country, assert_iban, assert_length, ValidationMode};

/// One side of a payment. Each `PaymentInfo` carries the initiator's own
/// party, each `Transaction` the counterparty; which element family
/// (`Cdtr*` or `Dbtr*`) a party lands in is decided once by its
/// [`PartyRole`], resolved from the payment method at construction.
#[derive(Debug, Clone, Default)]
pub struct Party {
    pub name: String,
    pub street: String,
    pub city: String,
    pub country: String,
    pub iban: String,
    /// May stay empty; the agent node then carries `Othr/Id` =
    /// `NOTPROVIDED` instead of a `BIC`.
    pub bic: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    Creditor,
    Debtor,
}

impl PartyRole {
    pub(crate) fn party_tag(&self) -> &'static str {
        match self {
            PartyRole::Creditor => "Cdtr",
            PartyRole::Debtor => "Dbtr",
        }
    }

    pub(crate) fn account_tag(&self) -> &'static str {
        match self {
            PartyRole::Creditor => "CdtrAcct",
            PartyRole::Debtor => "DbtrAcct",
        }
    }

    pub(crate) fn agent_tag(&self) -> &'static str {
        match self {
            PartyRole::Creditor => "CdtrAgt",
            PartyRole::Debtor => "DbtrAgt",
        }
    }

    /// Prefix for diagnostics, so errors name the field the caller set.
    pub(crate) fn field_prefix(&self) -> &'static str {
        match self {
            PartyRole::Creditor => "creditor",
            PartyRole::Debtor => "debtor",
        }
    }
}

impl Party {
    pub(crate) fn validate(&self, role: PartyRole, mode: ValidationMode) -> SepaResult<()> {
        if !mode.structural() {
            return Ok(());
        }
        let p = role.field_prefix();
        assert_length(&format!("{}Name", p), &self.name, Some(1), Some(MAX_NAME))?;
        assert_length(&format!("{}Street", p), &self.street, None, Some(MAX_NAME))?;
        assert_length(&format!("{}City", p), &self.city, None, Some(MAX_NAME))?;
        if !self.country.is_empty() {
            assert_length(
                &format!("{}Country", p),
                &self.country,
                Some(2),
                Some(MAX_COUNTRY),
            )?;
        }
        assert_iban(&format!("{}IBAN", p), &self.iban)?;
        assert_bic_country(&format!("{}BIC", p), &self.bic, &self.iban)?;
        Ok(())
    }

    /// Charset-clean copy for serialization; the caller's model is left
    /// untouched. IBAN and BIC are structured fields, not free text, and
    /// pass through as-is.
    pub(crate) fn sanitized(&self) -> Party {
        Party {
            name: sanitize_text(&self.name, MAX_NAME),
            street: sanitize_text(&self.street, MAX_NAME),
            city: sanitize_text(&self.city, MAX_NAME),
            country: sanitize_text(&self.country, MAX_COUNTRY),
            iban: self.iban.clone(),
            bic: self.bic.clone(),
        }
    }
}
