use serde::{Deserialize, Serialize};

use crate::records::{FieldSpec, FlexDecode, Preamble, RecordSpec};
use crate::uper::UperDecoder;

/// Issuer block of a flexible-content ticket: who issued it, when, and in
/// which currency prices elsewhere in the ticket are expressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuingDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_provider_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_num: Option<u32>,
    pub issuing_year: u16,
    pub issuing_day: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_time: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<String>,
    pub specimen: bool,
    pub secure_paper: bool,
    pub activated: bool,
    /// ISO 4217 code, DEFAULT "EUR" when absent from the wire.
    pub currency: String,
    /// Decimal places of price fields, DEFAULT 2.
    pub currency_fraction: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_pnr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on_train: Option<String>,
}

impl IssuingDetail {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::optional("securityProviderNum"),
        FieldSpec::optional("issuerNum"),
        FieldSpec::required("issuingYear"),
        FieldSpec::required("issuingDay"),
        FieldSpec::optional("issuingTime"),
        FieldSpec::optional("issuerName"),
        FieldSpec::required("specimen"),
        FieldSpec::required("securePaperTicket"),
        FieldSpec::required("activated"),
        FieldSpec::optional("currency"),
        FieldSpec::optional("currencyFract"),
        FieldSpec::optional("issuerPNR"),
        FieldSpec::optional("issuedOnTrainIA5"),
    ]);
}

impl FlexDecode for IssuingDetail {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        let spec = &Self::FIELDS;
        let preamble = Preamble::read(dec, spec);

        let security_provider_num = preamble
            .present(spec, "securityProviderNum")
            .then(|| dec.read_constrained_whole_number(1, 32_000) as u32);
        let issuer_num = preamble
            .present(spec, "issuerNum")
            .then(|| dec.read_constrained_whole_number(1, 32_000) as u32);
        let issuing_year = dec.read_constrained_whole_number(2016, 2269) as u16;
        let issuing_day = dec.read_constrained_whole_number(1, 366) as u16;
        let issuing_time = preamble
            .present(spec, "issuingTime")
            .then(|| dec.read_constrained_whole_number(0, 1439) as u16);
        let issuer_name = preamble
            .present(spec, "issuerName")
            .then(|| dec.read_utf8_string());
        let specimen = dec.read_boolean();
        let secure_paper = dec.read_boolean();
        let activated = dec.read_boolean();
        let currency = if preamble.present(spec, "currency") {
            dec.read_ia5_string(3, 3)
        } else {
            "EUR".to_string()
        };
        let currency_fraction = if preamble.present(spec, "currencyFract") {
            dec.read_constrained_whole_number(1, 3) as u8
        } else {
            2
        };
        let issuer_pnr = preamble
            .present(spec, "issuerPNR")
            .then(|| dec.read_ia5_string(0, 0));
        let issued_on_train = preamble
            .present(spec, "issuedOnTrainIA5")
            .then(|| dec.read_ia5_string(0, 0));

        Self {
            security_provider_num,
            issuer_num,
            issuing_year,
            issuing_day,
            issuing_time,
            issuer_name,
            specimen,
            secure_paper,
            activated,
            currency,
            currency_fraction,
            issuer_pnr,
            issued_on_train,
        }
    }
}
