use std::fmt::Display;
use std::str::FromStr;

use crate::error::SepaError;
use crate::party::PartyRole;

/// Which side of a payment the document initiator is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// pain.008 family: the initiator collects (`PmtMtd` = `DD`).
    DirectDebit,
    /// pain.001 family: the initiator pays (`PmtMtd` = `TRF`).
    Transfer,
}

impl PaymentMethod {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentMethod::DirectDebit => "DD",
            PaymentMethod::Transfer => "TRF",
        }
    }

    /// The role whose details live on the `PaymentInfo` block.
    pub fn own_role(&self) -> PartyRole {
        match self {
            PaymentMethod::DirectDebit => PartyRole::Creditor,
            PaymentMethod::Transfer => PartyRole::Debtor,
        }
    }

    /// The role of each transaction's counterparty.
    pub fn other_role(&self) -> PartyRole {
        match self {
            PaymentMethod::DirectDebit => PartyRole::Debtor,
            PaymentMethod::Transfer => PartyRole::Creditor,
        }
    }
}

/// A supported ISO-20022 payment-initiation message subtype.
///
/// Each variant maps to a descriptor fixing the message root tag, the
/// payment method and the structural version of the body. The descriptor
/// table replaces the trailing-digit string parsing of older SEPA
/// generators: which nodes appear where is decided by explicit fields, not
/// by re-deriving a version number from the identifier at every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(non_camel_case_types)]
pub enum PainFormat {
    Pain001_001_02,
    Pain001_001_03,
    Pain001_001_08,
    Pain001_001_09,
    Pain001_003_02,
    Pain001_003_03,
    Pain008_001_01,
    #[default]
    Pain008_001_02,
    Pain008_001_08,
    Pain008_003_01,
    Pain008_003_02,
}

pub(crate) struct FormatDescriptor {
    pub id: &'static str,
    pub message_root_tag: &'static str,
    pub method: PaymentMethod,
    /// Trailing two digits of the identifier, plus one for the pain.008
    /// family. Decides the version-conditional parts of the tree.
    pub structural_version: u8,
}

impl FormatDescriptor {
    /// `GrpHdr`-level `BtchBookg`/`Grpg` only exist in version 2 trees.
    pub fn includes_grouping_nodes(&self) -> bool {
        self.structural_version == 2
    }

    /// `PmtInf`-level `BtchBookg`/`NbOfTxs`/`CtrlSum` appear from
    /// version 3 on.
    pub fn includes_batch_detail(&self) -> bool {
        self.structural_version >= 3
    }
}

use PaymentMethod::{DirectDebit, Transfer};

impl PainFormat {
    pub const ALL: &'static [PainFormat] = &[
        PainFormat::Pain001_001_02,
        PainFormat::Pain001_001_03,
        PainFormat::Pain001_001_08,
        PainFormat::Pain001_001_09,
        PainFormat::Pain001_003_02,
        PainFormat::Pain001_003_03,
        PainFormat::Pain008_001_01,
        PainFormat::Pain008_001_02,
        PainFormat::Pain008_001_08,
        PainFormat::Pain008_003_01,
        PainFormat::Pain008_003_02,
    ];

    pub(crate) fn descriptor(&self) -> &'static FormatDescriptor {
        match self {
            PainFormat::Pain001_001_02 => &FormatDescriptor {
                id: "pain.001.001.02",
                message_root_tag: "CstmrCdtTrfInitn",
                method: Transfer,
                structural_version: 2,
            },
            PainFormat::Pain001_001_03 => &FormatDescriptor {
                id: "pain.001.001.03",
                message_root_tag: "CstmrCdtTrfInitn",
                method: Transfer,
                structural_version: 3,
            },
            PainFormat::Pain001_001_08 => &FormatDescriptor {
                id: "pain.001.001.08",
                message_root_tag: "CstmrCdtTrfInitn",
                method: Transfer,
                structural_version: 8,
            },
            PainFormat::Pain001_001_09 => &FormatDescriptor {
                id: "pain.001.001.09",
                message_root_tag: "CstmrCdtTrfInitn",
                method: Transfer,
                structural_version: 9,
            },
            PainFormat::Pain001_003_02 => &FormatDescriptor {
                id: "pain.001.003.02",
                message_root_tag: "CstmrCdtTrfInitn",
                method: Transfer,
                structural_version: 2,
            },
            PainFormat::Pain001_003_03 => &FormatDescriptor {
                id: "pain.001.003.03",
                message_root_tag: "CstmrCdtTrfInitn",
                method: Transfer,
                structural_version: 3,
            },
            PainFormat::Pain008_001_01 => &FormatDescriptor {
                id: "pain.008.001.01",
                message_root_tag: "CstmrDrctDbtInitn",
                method: DirectDebit,
                structural_version: 2,
            },
            PainFormat::Pain008_001_02 => &FormatDescriptor {
                id: "pain.008.001.02",
                message_root_tag: "CstmrDrctDbtInitn",
                method: DirectDebit,
                structural_version: 3,
            },
            PainFormat::Pain008_001_08 => &FormatDescriptor {
                id: "pain.008.001.08",
                message_root_tag: "CstmrDrctDbtInitn",
                method: DirectDebit,
                structural_version: 9,
            },
            PainFormat::Pain008_003_01 => &FormatDescriptor {
                id: "pain.008.003.01",
                message_root_tag: "CstmrDrctDbtInitn",
                method: DirectDebit,
                structural_version: 2,
            },
            PainFormat::Pain008_003_02 => &FormatDescriptor {
                id: "pain.008.003.02",
                message_root_tag: "CstmrDrctDbtInitn",
                method: DirectDebit,
                structural_version: 3,
            },
        }
    }

    /// The ISO identifier, e.g. `pain.008.001.02`.
    pub fn as_str(&self) -> &'static str {
        self.descriptor().id
    }

    pub fn message_root_tag(&self) -> &'static str {
        self.descriptor().message_root_tag
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.descriptor().method
    }

    pub fn structural_version(&self) -> u8 {
        self.descriptor().structural_version
    }

    pub fn namespace(&self) -> String {
        format!("urn:iso:std:iso:20022:tech:xsd:{}", self.as_str())
    }

    pub fn schema_location(&self) -> String {
        format!("{} {}.xsd", self.namespace(), self.as_str())
    }
}

impl Display for PainFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PainFormat {
    type Err = SepaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PainFormat::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| SepaError::Configuration(format!("unknown pain format {:?}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_roundtrip() {
        for format in PainFormat::ALL {
            assert_eq!(format.as_str().parse::<PainFormat>().unwrap(), *format);
        }
    }

    #[test]
    fn unknown_format_is_a_configuration_error() {
        let err = "pain.002.001.03".parse::<PainFormat>().unwrap_err();
        assert!(matches!(err, SepaError::Configuration(_)));
    }

    #[test]
    fn direct_debit_versions_are_bumped() {
        assert_eq!(PainFormat::Pain008_001_01.structural_version(), 2);
        assert_eq!(PainFormat::Pain008_001_02.structural_version(), 3);
        assert_eq!(PainFormat::Pain001_001_02.structural_version(), 2);
        assert_eq!(PainFormat::Pain001_001_03.structural_version(), 3);
    }

    #[test]
    fn grouping_nodes_only_in_version_two() {
        assert!(PainFormat::Pain008_001_01.descriptor().includes_grouping_nodes());
        assert!(!PainFormat::Pain008_001_02.descriptor().includes_grouping_nodes());
        assert!(PainFormat::Pain008_001_02.descriptor().includes_batch_detail());
        assert!(!PainFormat::Pain001_003_02.descriptor().includes_batch_detail());
    }

    #[test]
    fn namespace_and_schema_location() {
        let f = PainFormat::Pain008_001_02;
        assert_eq!(
            f.namespace(),
            "urn:iso:std:iso:20022:tech:xsd:pain.008.001.02"
        );
        assert_eq!(
            f.schema_location(),
            "urn:iso:std:iso:20022:tech:xsd:pain.008.001.02 pain.008.001.02.xsd"
        );
    }

    #[test]
    fn methods_resolve_roles() {
        assert_eq!(
            PainFormat::Pain008_001_02.payment_method().code(),
            "DD"
        );
        assert_eq!(PainFormat::Pain001_001_03.payment_method().code(), "TRF");
    }
}
