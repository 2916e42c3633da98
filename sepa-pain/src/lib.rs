//! Builder for ISO-20022 payment initiation ("pain") documents.
//!
//! Supports the SEPA credit transfer (pain.001.*) and direct debit
//! (pain.008.*) message families. A [`Document`] owns one [`GroupHeader`]
//! and a list of [`PaymentInfo`] blocks, each owning its [`Transaction`]s;
//! serializing recomputes all aggregate counts and control sums, validates
//! every entity against the rules of the selected [`PainFormat`], and emits
//! the version-correct element tree.
//!
//! IBAN and SEPA creditor identifier check digits (ISO 7064 mod-97) live in
//! [`checksum`].

use rand::{thread_rng, Rng};
use sepa_pain_types::Date;
use xml::writer::XmlEvent;

pub mod checksum;
mod document;
mod error;
mod format;
mod party;
mod payment;
pub mod sanitize;
pub mod validate;

pub use document::{Document, DocumentConfig, GroupHeader};
pub use error::{SepaError, SepaResult};
pub use format::{PainFormat, PaymentMethod};
pub use party::{Party, PartyRole};
pub use payment::{
    InstructionPriority, LocalInstrument, PaymentInfo, SequenceType, Transaction,
};
pub use validate::ValidationMode;

/// A reasonably unique `MsgId` value: today's date plus a random 64-bit
/// suffix, using only characters that survive identifier sanitization.
pub fn random_message_id() -> String {
    let id = thread_rng().gen::<u64>();
    format!("{}.{:0>16x}", Date::today().to_string().replace('-', ""), id)
}

trait ToXml {
    fn to_xml(&self) -> Vec<XmlEvent>;
}

/// `<Tag>text</Tag>` as three writer events.
fn text_element<'a>(events: &mut Vec<XmlEvent<'a>>, tag: &'a str, text: &'a str) {
    events.push(XmlEvent::start_element(tag).into());
    events.push(XmlEvent::characters(text));
    events.push(XmlEvent::end_element().into());
}
