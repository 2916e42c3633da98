use std::io::Write;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use sepa_pain_types::Amount;
use serde::{Deserialize, Serialize};
use xml::EmitterConfig;

use crate::error::{SepaError, SepaResult};
use crate::format::{FormatDescriptor, PainFormat};
use crate::payment::PaymentInfo;
use crate::sanitize::{sanitize_text, MAX_IDENTIFIER, MAX_NAME};
use crate::validate::ValidationMode;
use crate::ToXml;

mod document_gen;

use document_gen::{DocumentString, HeaderString};

/// Per-document settings, passed down to children where they matter.
/// Nothing here is process-global: two documents with different separators
/// or validation modes can be assembled side by side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Joins parent and child ids when hierarchical ids are assigned.
    pub separator: char,
    pub validation: ValidationMode,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        DocumentConfig {
            separator: '.',
            validation: ValidationMode::default(),
        }
    }
}

/// Message-level header. Emits unconditionally; the transaction count and
/// control sum are recomputed from the payment blocks at serialization
/// time and cannot be set by the caller.
#[derive(Debug, Clone)]
pub struct GroupHeader {
    /// Serialized as `MsgId`.
    pub id: String,
    /// `CreDtTm`. Defaults to now; set it explicitly for reproducible
    /// output.
    pub created: NaiveDateTime,
    pub initiator_name: String,
    /// Only serialized in version-2 trees.
    pub batch_booking: bool,
    /// Only serialized in version-2 trees (`Grpg`, normally `MIXD`).
    pub grouping: String,
    /// Country-specific organisation id of the initiating party (Italian
    /// CUC, Spanish CIF), emitted as `InitgPty/Id/OrgId/Othr/Id`.
    pub organisation_id: Option<String>,
}

impl GroupHeader {
    pub fn new() -> Self {
        GroupHeader {
            id: String::new(),
            created: chrono::Local::now().naive_local(),
            initiator_name: String::new(),
            batch_booking: true,
            grouping: "MIXD".to_string(),
            organisation_id: None,
        }
    }

    fn render(
        &self,
        descriptor: &FormatDescriptor,
        transaction_count: usize,
        control_sum: Amount,
    ) -> HeaderString {
        HeaderString {
            message_id: sanitize_text(&self.id, MAX_IDENTIFIER),
            creation_date_time: self.created.format("%Y-%m-%dT%H:%M:%S").to_string(),
            include_grouping: descriptor.includes_grouping_nodes(),
            batch_booking: self.batch_booking.to_string(),
            grouping: self.grouping.clone(),
            transaction_count: transaction_count.to_string(),
            control_sum: control_sum.xml_string(),
            initiator_name: sanitize_text(&self.initiator_name, MAX_NAME),
            organisation_id: self
                .organisation_id
                .as_deref()
                .map(|id| sanitize_text(id, MAX_IDENTIFIER)),
        }
    }
}

impl Default for GroupHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// The aggregate root: one group header plus an ordered list of payment
/// blocks. Serialization is a re-enterable pipeline — every call to
/// [`Document::to_xml_string`] renormalizes, revalidates and reserializes
/// from the current model; nothing is cached.
#[derive(Debug, Clone)]
pub struct Document {
    format: PainFormat,
    config: DocumentConfig,
    pub group_header: GroupHeader,
    payment_blocks: Vec<PaymentInfo>,
}

impl Document {
    pub fn new(format: PainFormat) -> Self {
        Self::with_config(format, DocumentConfig::default())
    }

    pub fn with_config(format: PainFormat, config: DocumentConfig) -> Self {
        Document {
            format,
            config,
            group_header: GroupHeader::new(),
            payment_blocks: Vec::new(),
        }
    }

    pub fn format(&self) -> PainFormat {
        self.format
    }

    pub fn config(&self) -> DocumentConfig {
        self.config
    }

    /// A payment block bound to this document's format and separator, not
    /// yet attached.
    pub fn create_payment_info(&self) -> PaymentInfo {
        PaymentInfo::with_separator(self.format, self.config.separator)
    }

    /// Attaches a payment block and assigns its hierarchical id from the
    /// group header id, the separator, and the block's own id as suffix
    /// (or its position when none was given).
    pub fn add_payment_info(&mut self, mut payment_info: PaymentInfo) -> SepaResult<&mut PaymentInfo> {
        if payment_info.format() != self.format {
            return Err(SepaError::Structural(format!(
                "cannot add a {} payment block to a {} document",
                payment_info.format(),
                self.format
            )));
        }
        let suffix = if payment_info.id.is_empty() {
            self.payment_blocks.len().to_string()
        } else {
            payment_info.id.clone()
        };
        payment_info.id = format!(
            "{}{}{}",
            self.group_header.id, self.config.separator, suffix
        );
        self.payment_blocks.push(payment_info);
        let last = self.payment_blocks.len() - 1;
        Ok(&mut self.payment_blocks[last])
    }

    pub fn payment_blocks(&self) -> &[PaymentInfo] {
        &self.payment_blocks
    }

    pub fn payment_blocks_mut(&mut self) -> &mut [PaymentInfo] {
        &mut self.payment_blocks
    }

    /// Total number of transactions across all blocks (`GrpHdr/NbOfTxs`).
    pub fn transaction_count(&self) -> usize {
        self.payment_blocks.iter().map(|p| p.transaction_count()).sum()
    }

    /// Message-level control sum (`GrpHdr/CtrlSum`), folded bottom-up over
    /// every block's own control sum.
    pub fn control_sum(&self) -> Amount {
        self.payment_blocks.iter().map(|p| p.control_sum()).sum()
    }

    fn render(&self) -> SepaResult<DocumentString> {
        let descriptor = self.format.descriptor();
        let payment_blocks = self
            .payment_blocks
            .iter()
            .map(|block| block.render(self.config.validation))
            .collect::<SepaResult<Vec<_>>>()?;
        Ok(DocumentString {
            namespace: self.format.namespace(),
            schema_location: self.format.schema_location(),
            message_root_tag: descriptor.message_root_tag,
            header: self
                .group_header
                .render(descriptor, self.transaction_count(), self.control_sum()),
            payment_blocks,
        })
    }

    /// Serializes the whole document: normalize, validate, emit, then the
    /// consumer-compatibility text fixups. Either fully succeeds or fails
    /// before producing output.
    pub fn to_xml_string(&self) -> SepaResult<String> {
        let shadow = self.render()?;
        let mut buffer = Vec::new();
        let mut writer = EmitterConfig::new()
            .write_document_declaration(false)
            .create_writer(&mut buffer);
        for event in shadow.to_xml() {
            writer.write(event)?;
        }
        let body = String::from_utf8_lossy(&buffer).into_owned();
        // Some bank parsers insist on an explicit declaration even though
        // the writer could emit its own.
        Ok(format!("{}{}", XML_DECLARATION, apply_fixups(&body)))
    }

    pub fn write<W: Write>(&self, mut writer: W) -> SepaResult<()> {
        let serialized = self.to_xml_string()?;
        writer.write_all(serialized.as_bytes())?;
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(PainFormat::default())
    }
}

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

static ATTRIBUTE_REMNANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(:\w+)?='[^']*'").expect("invalid fixup regex"));

/// Bank-side parser workarounds, applied to the serialized text rather
/// than folded into XML escaping. The exact substitutions and their order
/// are load-bearing for existing consumers.
fn apply_fixups(serialized: &str) -> String {
    let fixed = ATTRIBUTE_REMNANT.replace_all(serialized, "");
    fixed
        .replace("&amp;", "+")
        .replace('\'', "")
        .replace('@', "")
}
