use chrono::NaiveDate;
use sepa_pain::{
    Document, DocumentConfig, PainFormat, Party, SepaError, ValidationMode,
};
use sepa_pain_types::{Amount, Date};

fn example_document(format: PainFormat) -> Document {
    let mut doc = Document::new(format);
    doc.group_header.id = "XMPL.20140201.TR0".into();
    doc.group_header.initiator_name = "Example LLC".into();
    doc.group_header.created = NaiveDate::from_ymd_opt(2014, 2, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();

    let mut pi = doc.create_payment_info();
    pi.party = Party {
        name: "Example LLC".into(),
        iban: "DE87123456781234567890".into(),
        bic: "XMPLDEM0XXX".into(),
        ..Party::default()
    };
    pi.party_id = Some("DE98ZZZ09999999999".into());
    pi.collection_date = Date::new(2014, 2, 8);
    pi.requested_execution_date = Date::new(2014, 2, 8);

    let pi = doc.add_payment_info(pi).unwrap();
    let mut tx = pi.create_transaction();
    tx.end_to_end_id = "XMPL.CUST487.INVOICE.54".into();
    tx.amount = Amount::from(50.23);
    tx.mandate_id = Some("XMPL.CUST487.2014".into());
    tx.mandate_signature_date = Date::new(2014, 2, 1);
    tx.remittance_info = "INVOICE 54".into();
    tx.party = Party {
        name: "Example Customer".into(),
        iban: "DE40987654329876543210".into(),
        bic: "CUSTDEM0XXX".into(),
        ..Party::default()
    };
    pi.add_transaction(tx).unwrap();
    doc
}

#[test]
fn direct_debit_scenario() {
    let doc = example_document(PainFormat::Pain008_001_02);
    let xml = doc.to_xml_string().unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("xmlns=\"urn:iso:std:iso:20022:tech:xsd:pain.008.001.02\""));
    assert!(xml.contains(
        "xsi:schemaLocation=\"urn:iso:std:iso:20022:tech:xsd:pain.008.001.02 pain.008.001.02.xsd\""
    ));
    assert!(xml.contains("<CstmrDrctDbtInitn>"));
    assert!(xml.contains("<MsgId>XMPL.20140201.TR0</MsgId>"));
    assert!(xml.contains("<CreDtTm>2014-02-01T09:30:00</CreDtTm>"));
    // once in GrpHdr, once in PmtInf (version 3 carries batch detail)
    assert_eq!(xml.matches("<NbOfTxs>1</NbOfTxs>").count(), 2);
    assert_eq!(xml.matches("<CtrlSum>50.23</CtrlSum>").count(), 2);
    assert!(xml.contains("<PmtInfId>XMPL.20140201.TR0.0</PmtInfId>"));
    assert!(xml.contains("<PmtMtd>DD</PmtMtd>"));
    assert!(xml.contains("<LclInstrm><Cd>CORE</Cd></LclInstrm>"));
    assert!(xml.contains("<SeqTp>FRST</SeqTp>"));
    assert!(xml.contains("<ReqdColltnDt>2014-02-08</ReqdColltnDt>"));
    assert!(xml.contains("<ChrgBr>SLEV</ChrgBr>"));
    assert!(xml.contains(
        "<CdtrSchmeId><Id><PrvtId><Othr><Id>DE98ZZZ09999999999</Id><SchmeNm><Prtry>SEPA</Prtry></SchmeNm></Othr></PrvtId></Id></CdtrSchmeId>"
    ));
    assert!(xml.contains("<InstrId>XMPL.20140201.TR0.0.0</InstrId>"));
    assert!(xml.contains("<EndToEndId>XMPL.CUST487.INVOICE.54</EndToEndId>"));
    assert!(xml.contains("<InstdAmt Ccy=\"EUR\">50.23</InstdAmt>"));
    assert!(xml.contains("<MndtId>XMPL.CUST487.2014</MndtId>"));
    assert!(xml.contains("<DtOfSgntr>2014-02-01</DtOfSgntr>"));
    assert!(xml.contains("<AmdmntInd>false</AmdmntInd>"));
    assert!(xml.contains("<Dbtr><Nm>Example Customer</Nm></Dbtr>"));
    assert!(xml.contains("<DbtrAcct><Id><IBAN>DE40987654329876543210</IBAN></Id></DbtrAcct>"));
    assert!(xml.contains("<Ustrd>INVOICE 54</Ustrd>"));
    // version 3: no Grpg / header-level BtchBookg
    assert!(!xml.contains("<Grpg>"));
}

#[test]
fn serialization_is_deterministic() {
    let doc = example_document(PainFormat::Pain008_001_02);
    assert_eq!(doc.to_xml_string().unwrap(), doc.to_xml_string().unwrap());
}

#[test]
fn serialization_does_not_mutate_the_model() {
    let mut doc = example_document(PainFormat::Pain008_001_02);
    doc.group_header.initiator_name = "Müller & Söhne".into();
    let xml = doc.to_xml_string().unwrap();
    assert!(xml.contains("<Nm>Mller  Shne</Nm>"));
    // the caller's value survives serialization untouched
    assert_eq!(doc.group_header.initiator_name, "Müller & Söhne");
}

#[test]
fn credit_transfer_scenario() {
    let doc = example_document(PainFormat::Pain001_001_03);
    let xml = doc.to_xml_string().unwrap();

    assert!(xml.contains("<CstmrCdtTrfInitn>"));
    assert!(xml.contains("<PmtMtd>TRF</PmtMtd>"));
    assert!(xml.contains("<InstrPrty>NORM</InstrPrty>"));
    assert!(xml.contains("<ReqdExctnDt>2014-02-08</ReqdExctnDt>"));
    // transfers wrap the amount and swap the party roles
    assert!(xml.contains("<CdtTrfTxInf>"));
    assert!(xml.contains("<Amt><InstdAmt Ccy=\"EUR\">50.23</InstdAmt></Amt>"));
    assert!(xml.contains("<Dbtr><Nm>Example LLC</Nm></Dbtr>"));
    assert!(xml.contains("<Cdtr><Nm>Example Customer</Nm></Cdtr>"));
    assert!(xml.contains("<CdtrAcct><Id><IBAN>DE40987654329876543210</IBAN></Id></CdtrAcct>"));
    // no direct-debit nodes in a transfer
    assert!(!xml.contains("<CdtrSchmeId>"));
    assert!(!xml.contains("<MndtRltdInf>"));
    assert!(!xml.contains("<SeqTp>"));
}

#[test]
fn version_two_moves_batch_nodes_into_the_header() {
    let doc = example_document(PainFormat::Pain008_003_01);
    let xml = doc.to_xml_string().unwrap();

    assert!(xml.contains("xmlns=\"urn:iso:std:iso:20022:tech:xsd:pain.008.003.01\""));
    assert!(xml.contains("<BtchBookg>true</BtchBookg>"));
    assert!(xml.contains("<Grpg>MIXD</Grpg>"));
    // PmtInf-level count/sum only exist from version 3 on
    assert_eq!(xml.matches("<NbOfTxs>").count(), 1);
    assert_eq!(xml.matches("<CtrlSum>").count(), 1);
}

#[test]
fn bic_iban_country_mismatch_is_rejected() {
    let mut doc = example_document(PainFormat::Pain008_001_02);
    // valid French IBAN, but the BIC still says DE
    doc.payment_blocks_mut()[0].party.iban = "FR381234567890123456789012345".into();
    match doc.to_xml_string() {
        Err(SepaError::Validation { field, .. }) => assert_eq!(field, "creditorBIC"),
        other => panic!("expected a validation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn three_decimal_amount_is_rejected() {
    let mut doc = example_document(PainFormat::Pain008_001_02);
    doc.payment_blocks_mut()[0].transactions_mut()[0].amount = Amount::from(50.234);
    match doc.to_xml_string() {
        Err(SepaError::Validation { field, .. }) => assert_eq!(field, "transaction.amount"),
        other => panic!("expected a validation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn invalid_iban_is_rejected() {
    let mut doc = example_document(PainFormat::Pain008_001_02);
    doc.payment_blocks_mut()[0].transactions_mut()[0].party.iban =
        "DE41987654329876543210".into();
    match doc.to_xml_string() {
        Err(SepaError::Validation { field, .. }) => assert_eq!(field, "debtorIBAN"),
        other => panic!("expected a validation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn charset_violations_raise_or_are_stripped() {
    let mut doc = example_document(PainFormat::Pain008_001_02);
    doc.payment_blocks_mut()[0].transactions_mut()[0].end_to_end_id = "INVÖICE.54".into();
    assert!(matches!(
        doc.to_xml_string(),
        Err(SepaError::Validation { .. })
    ));

    // same model, charset checks off: the character is stripped instead
    let config = DocumentConfig {
        separator: '.',
        validation: ValidationMode {
            enabled: true,
            charset: false,
        },
    };
    let mut relaxed = Document::with_config(PainFormat::Pain008_001_02, config);
    relaxed.group_header = doc.group_header.clone();
    let source = doc.payment_blocks()[0].clone();
    relaxed.add_payment_info(source).unwrap();
    let xml = relaxed.to_xml_string().unwrap();
    assert!(xml.contains("<EndToEndId>INVICE.54</EndToEndId>"));
}

#[test]
fn empty_payment_block_is_rejected() {
    let mut doc = Document::new(PainFormat::Pain008_001_02);
    doc.group_header.id = "XMPL.20140201.TR0".into();
    doc.group_header.initiator_name = "Example LLC".into();
    let mut pi = doc.create_payment_info();
    pi.party = Party {
        name: "Example LLC".into(),
        iban: "DE87123456781234567890".into(),
        ..Party::default()
    };
    pi.party_id = Some("DE98ZZZ09999999999".into());
    pi.collection_date = Date::new(2014, 2, 8);
    doc.add_payment_info(pi).unwrap();

    match doc.to_xml_string() {
        Err(SepaError::Validation { message, .. }) => {
            assert!(message.contains("at least one transaction"))
        }
        other => panic!("expected a validation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn missing_bic_becomes_notprovided() {
    let mut doc = example_document(PainFormat::Pain008_001_02);
    doc.payment_blocks_mut()[0].transactions_mut()[0].party.bic = String::new();
    let xml = doc.to_xml_string().unwrap();
    assert!(xml.contains(
        "<DbtrAgt><FinInstnId><Othr><Id>NOTPROVIDED</Id></Othr></FinInstnId></DbtrAgt>"
    ));
}

#[test]
fn organisation_id_extension_node() {
    let mut doc = example_document(PainFormat::Pain008_001_02);
    doc.group_header.organisation_id = Some("ABCDE12345".into());
    let xml = doc.to_xml_string().unwrap();
    assert!(xml.contains(
        "<InitgPty><Nm>Example LLC</Nm><Id><OrgId><Othr><Id>ABCDE12345</Id></Othr></OrgId></Id></InitgPty>"
    ));
}

#[test]
fn postal_address_is_emitted_when_present() {
    let mut doc = example_document(PainFormat::Pain008_001_02);
    {
        let party = &mut doc.payment_blocks_mut()[0].transactions_mut()[0].party;
        party.street = "Main Street 1".into();
        party.city = "Example City".into();
        party.country = "DE".into();
    }
    let xml = doc.to_xml_string().unwrap();
    assert!(xml.contains(
        "<PstlAdr><Ctry>DE</Ctry><AdrLine>Main Street 1</AdrLine><AdrLine>Example City</AdrLine></PstlAdr>"
    ));
}

#[test]
fn mismatched_format_is_structural() {
    let mut doc = Document::new(PainFormat::Pain008_001_02);
    let foreign = Document::new(PainFormat::Pain001_001_03).create_payment_info();
    assert!(matches!(
        doc.add_payment_info(foreign),
        Err(SepaError::Structural(_))
    ));
}

#[test]
fn disabled_validation_truncates_instead_of_raising() {
    let config = DocumentConfig {
        separator: '.',
        validation: ValidationMode::disabled(),
    };
    let mut doc = Document::with_config(PainFormat::Pain008_001_02, config);
    doc.group_header.id = "XMPL.20140201.TR0".into();
    doc.group_header.created = NaiveDate::from_ymd_opt(2014, 2, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    doc.group_header.initiator_name = "X".repeat(90);

    let mut pi = doc.create_payment_info();
    pi.party = Party {
        name: "Example LLC".into(),
        // bad checksum, passes because validation is off
        iban: "DE00123456781234567890".into(),
        ..Party::default()
    };
    let pi = doc.add_payment_info(pi).unwrap();
    let mut tx = pi.create_transaction();
    tx.end_to_end_id = "E2E.1".into();
    tx.amount = Amount::from(1.00);
    tx.party = Party {
        name: "Example Customer".into(),
        iban: "DE40987654329876543210".into(),
        ..Party::default()
    };
    pi.add_transaction(tx).unwrap();

    let xml = doc.to_xml_string().unwrap();
    // name truncated to 70 characters on the way out
    assert!(xml.contains(&format!("<Nm>{}</Nm>", "X".repeat(70))));
}
