use std::str::FromStr;

use sepa_pain_types::{Amount, Date};

use crate::error::{SepaError, SepaResult};
use crate::format::{PainFormat, PaymentMethod};
use crate::party::Party;
use crate::sanitize::{sanitize_text, MAX_IDENTIFIER, MAX_REMITTANCE};
use crate::validate::{
    assert_amount, assert_creditor_id, assert_date, assert_identifier, assert_length,
    ValidationMode,
};

mod payment_gen;

pub(crate) use payment_gen::{PartyBlock, PaymentInformationString, TransactionString};

/// `LclInstrm/Cd` of a direct-debit block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalInstrument {
    #[default]
    Core,
    Cor1,
    B2b,
    Sdcl,
    Oncl,
}

impl LocalInstrument {
    pub fn code(&self) -> &'static str {
        match self {
            LocalInstrument::Core => "CORE",
            LocalInstrument::Cor1 => "COR1",
            LocalInstrument::B2b => "B2B",
            LocalInstrument::Sdcl => "SDCL",
            LocalInstrument::Oncl => "ONCL",
        }
    }
}

impl FromStr for LocalInstrument {
    type Err = SepaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CORE" => Ok(LocalInstrument::Core),
            "COR1" => Ok(LocalInstrument::Cor1),
            "B2B" => Ok(LocalInstrument::B2b),
            "SDCL" => Ok(LocalInstrument::Sdcl),
            "ONCL" => Ok(LocalInstrument::Oncl),
            _ => Err(SepaError::validation(
                "localInstrumentation",
                s,
                "must be one of CORE, COR1, B2B, SDCL, ONCL",
            )),
        }
    }
}

/// `SeqTp` of a direct-debit block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceType {
    #[default]
    Frst,
    Rcur,
    Ooff,
    Fnal,
}

impl SequenceType {
    pub fn code(&self) -> &'static str {
        match self {
            SequenceType::Frst => "FRST",
            SequenceType::Rcur => "RCUR",
            SequenceType::Ooff => "OOFF",
            SequenceType::Fnal => "FNAL",
        }
    }
}

impl FromStr for SequenceType {
    type Err = SepaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FRST" => Ok(SequenceType::Frst),
            "RCUR" => Ok(SequenceType::Rcur),
            "OOFF" => Ok(SequenceType::Ooff),
            "FNAL" => Ok(SequenceType::Fnal),
            _ => Err(SepaError::validation(
                "sequenceType",
                s,
                "must be one of FRST, RCUR, OOFF, FNAL",
            )),
        }
    }
}

/// `InstrPrty` of a transfer block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstructionPriority {
    High,
    #[default]
    Norm,
}

impl InstructionPriority {
    pub fn code(&self) -> &'static str {
        match self {
            InstructionPriority::High => "HIGH",
            InstructionPriority::Norm => "NORM",
        }
    }
}

/// One payment leg: the counterparty, the amount, and for direct debits
/// the mandate it draws on.
///
/// Bound to a payment method at construction (use
/// [`PaymentInfo::create_transaction`]); attaching it to a block of the
/// other method is a structural error.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Serialized as `InstrId`. Left empty, [`PaymentInfo::add_transaction`]
    /// derives it from the block id and the position; a non-empty value is
    /// kept as the suffix.
    pub id: String,
    pub end_to_end_id: String,
    /// ISO 4217 code for `InstdAmt@Ccy`.
    pub currency: String,
    pub amount: Amount,
    /// Optional `Purp/Cd`, 1 to 4 characters.
    pub purpose_code: Option<String>,
    /// Required for direct debits.
    pub mandate_id: Option<String>,
    /// Required for direct debits (`DtOfSgntr`).
    pub mandate_signature_date: Option<Date>,
    /// When set, `AmdmntInd` flips to true and the details are emitted.
    pub amendment: Option<String>,
    /// The counterparty: debtor of a direct debit, creditor of a transfer.
    pub party: Party,
    /// Unstructured remittance information, at most 140 characters.
    pub remittance_info: String,
    method: PaymentMethod,
}

impl Transaction {
    pub fn new(method: PaymentMethod) -> Self {
        Transaction {
            id: String::new(),
            end_to_end_id: String::new(),
            currency: "EUR".to_string(),
            amount: Amount::default(),
            purpose_code: None,
            mandate_id: None,
            mandate_signature_date: None,
            amendment: None,
            party: Party::default(),
            remittance_info: String::new(),
            method,
        }
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn validate(&self, mode: ValidationMode) -> SepaResult<()> {
        if mode.structural() {
            assert_amount("transaction.amount", self.amount)?;
            assert_length("transaction.currency", &self.currency, Some(3), Some(3))?;
            self.party.validate(self.method.other_role(), mode)?;
            if let Some(code) = &self.purpose_code {
                assert_length("transaction.purposeCode", code, Some(1), Some(4))?;
            }
            if self.method == PaymentMethod::DirectDebit {
                if self.mandate_id.is_none() {
                    return Err(SepaError::validation(
                        "transaction.mandateId",
                        "",
                        "mandate id is required for direct debit",
                    ));
                }
                assert_date(
                    "transaction.mandateSignatureDate",
                    self.mandate_signature_date.as_ref(),
                )?;
            }
        }
        if mode.charset_checks() {
            assert_identifier("transaction.endToEndId", &self.end_to_end_id, false)?;
            if let Some(mandate) = &self.mandate_id {
                assert_identifier("transaction.mandateId", mandate, true)?;
            }
        }
        Ok(())
    }

    pub(crate) fn render(&self, mode: ValidationMode) -> SepaResult<TransactionString> {
        self.validate(mode)?;
        let role = self.method.other_role();
        Ok(TransactionString {
            instr_id: (!self.id.is_empty()).then(|| sanitize_text(&self.id, MAX_IDENTIFIER)),
            end_to_end_id: sanitize_text(&self.end_to_end_id, MAX_IDENTIFIER),
            currency: self.currency.clone(),
            amount: self.amount.xml_string(),
            is_direct_debit: self.method == PaymentMethod::DirectDebit,
            mandate_id: self
                .mandate_id
                .as_deref()
                .map(|m| sanitize_text(m, MAX_IDENTIFIER))
                .unwrap_or_default(),
            mandate_signature_date: self
                .mandate_signature_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            amendment: self.amendment.clone(),
            party: PartyBlock::new(role, &self.party.sanitized()),
            purpose_code: self.purpose_code.clone(),
            remittance_info: sanitize_text(&self.remittance_info, MAX_REMITTANCE),
        })
    }
}

/// A batch of transactions sharing payment method, sequencing and the
/// initiator's own identity. Direct-debit blocks carry the creditor and a
/// collection date; transfer blocks the debtor and an execution date.
#[derive(Debug, Clone)]
pub struct PaymentInfo {
    /// Serialized as `PmtInfId`; assigned hierarchically by
    /// [`crate::Document::add_payment_info`].
    pub id: String,
    pub batch_booking: bool,
    pub local_instrument: LocalInstrument,
    pub sequence_type: SequenceType,
    /// `ReqdColltnDt`, required for direct debits.
    pub collection_date: Option<Date>,
    /// `ReqdExctnDt`, required for transfers.
    pub requested_execution_date: Option<Date>,
    /// The initiator's side: creditor of a direct debit, debtor of a
    /// transfer.
    pub party: Party,
    /// The own party's scheme identifier: the SEPA creditor identifier
    /// for direct debits (checksum-validated, required), otherwise an
    /// optional debtor id.
    pub party_id: Option<String>,
    /// Optional `PmtTpInf/CtgyPurp/Cd`.
    pub category_purpose: Option<String>,
    pub instruction_priority: InstructionPriority,
    format: PainFormat,
    separator: char,
    transactions: Vec<Transaction>,
}

impl PaymentInfo {
    pub fn new(format: PainFormat) -> Self {
        Self::with_separator(format, '.')
    }

    pub(crate) fn with_separator(format: PainFormat, separator: char) -> Self {
        PaymentInfo {
            id: String::new(),
            batch_booking: false,
            local_instrument: LocalInstrument::default(),
            sequence_type: SequenceType::default(),
            collection_date: None,
            requested_execution_date: None,
            party: Party::default(),
            party_id: None,
            category_purpose: None,
            instruction_priority: InstructionPriority::default(),
            format,
            separator,
            transactions: Vec::new(),
        }
    }

    pub fn format(&self) -> PainFormat {
        self.format
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.format.payment_method()
    }

    /// A transaction bound to this block's payment method, not yet
    /// attached.
    pub fn create_transaction(&self) -> Transaction {
        Transaction::new(self.payment_method())
    }

    /// Attaches a transaction and assigns its hierarchical id:
    /// this block's id, the separator, then the transaction's own id as
    /// suffix or its position when none was given. The id is fixed at
    /// attach time; insertion order is significant.
    pub fn add_transaction(&mut self, mut transaction: Transaction) -> SepaResult<&mut Transaction> {
        if transaction.method() != self.payment_method() {
            return Err(SepaError::Structural(format!(
                "cannot add a {:?} transaction to a {:?} payment block",
                transaction.method(),
                self.payment_method()
            )));
        }
        let suffix = if transaction.id.is_empty() {
            self.transactions.len().to_string()
        } else {
            transaction.id.clone()
        };
        transaction.id = format!("{}{}{}", self.id, self.separator, suffix);
        self.transactions.push(transaction);
        let last = self.transactions.len() - 1;
        Ok(&mut self.transactions[last])
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transactions_mut(&mut self) -> &mut [Transaction] {
        &mut self.transactions
    }

    /// Sum of the contained transaction amounts. A plain fold: mixed
    /// currencies are not summed separately.
    pub fn control_sum(&self) -> Amount {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn validate(&self, mode: ValidationMode) -> SepaResult<()> {
        if mode.structural() {
            if self.transactions.is_empty() {
                return Err(SepaError::validation(
                    "paymentInfo.transactions",
                    "",
                    "must contain at least one transaction",
                ));
            }
            let role = self.payment_method().own_role();
            self.party.validate(role, mode)?;
            match self.payment_method() {
                PaymentMethod::DirectDebit => {
                    assert_date("paymentInfo.collectionDate", self.collection_date.as_ref())?;
                    match &self.party_id {
                        Some(id) => assert_creditor_id("paymentInfo.creditorId", id)?,
                        None => {
                            return Err(SepaError::validation(
                                "paymentInfo.creditorId",
                                "",
                                "creditor identifier is required for direct debit",
                            ))
                        }
                    }
                }
                PaymentMethod::Transfer => {
                    assert_date(
                        "paymentInfo.requestedExecutionDate",
                        self.requested_execution_date.as_ref(),
                    )?;
                }
            }
            if let Some(code) = &self.category_purpose {
                assert_length("paymentInfo.categoryPurpose", code, Some(1), Some(4))?;
            }
        }
        Ok(())
    }

    pub(crate) fn render(&self, mode: ValidationMode) -> SepaResult<PaymentInformationString> {
        self.validate(mode)?;
        let descriptor = self.format.descriptor();
        let role = descriptor.method.own_role();
        let transactions = self
            .transactions
            .iter()
            .map(|t| t.render(mode))
            .collect::<SepaResult<Vec<_>>>()?;
        let due_date = match descriptor.method {
            PaymentMethod::DirectDebit => self.collection_date,
            PaymentMethod::Transfer => self.requested_execution_date,
        };
        Ok(PaymentInformationString {
            id: sanitize_text(&self.id, MAX_IDENTIFIER),
            method_code: descriptor.method.code(),
            include_batch_detail: descriptor.includes_batch_detail(),
            batch_booking: self.batch_booking.to_string(),
            transaction_count: self.transaction_count().to_string(),
            control_sum: self.control_sum().xml_string(),
            is_direct_debit: descriptor.method == PaymentMethod::DirectDebit,
            local_instrument: self.local_instrument.code(),
            sequence_type: self.sequence_type.code(),
            instruction_priority: self.instruction_priority.code(),
            category_purpose: self.category_purpose.clone(),
            due_date_tag: match descriptor.method {
                PaymentMethod::DirectDebit => "ReqdColltnDt",
                PaymentMethod::Transfer => "ReqdExctnDt",
            },
            due_date: due_date.map(|d| d.to_string()).unwrap_or_default(),
            party: PartyBlock::new(role, &self.party.sanitized()),
            creditor_scheme_id: if descriptor.method == PaymentMethod::DirectDebit {
                self.party_id
                    .as_deref()
                    .map(|id| sanitize_text(id, MAX_IDENTIFIER))
            } else {
                None
            },
            transactions,
        })
    }
}
