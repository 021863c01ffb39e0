use serde::{Deserialize, Serialize};

use crate::records::{FieldSpec, FlexDecode, Preamble, RecordSpec};
use crate::uper::UperDecoder;

/// Control block: how conductors are expected to validate the ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDetail {
    pub identification_by_id_card: bool,
    pub identification_by_passport: bool,
    pub online_validation: bool,
    /// Percentage of tickets to pull aside for detailed checks (0..=99).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_detailed_validation: Option<u8>,
    pub passport_validation: bool,
    pub ticket_on_departure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_text: Option<String>,
}

impl ControlDetail {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::required("identificationByIdCard"),
        FieldSpec::required("identificationByPassportId"),
        FieldSpec::required("onlineValidationRequired"),
        FieldSpec::optional("randomDetailedValidationRequired"),
        FieldSpec::required("passportValidationRequired"),
        FieldSpec::required("ticketOnDeparture"),
        FieldSpec::optional("infoText"),
    ]);
}

impl FlexDecode for ControlDetail {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        let spec = &Self::FIELDS;
        let preamble = Preamble::read(dec, spec);

        let identification_by_id_card = dec.read_boolean();
        let identification_by_passport = dec.read_boolean();
        let online_validation = dec.read_boolean();
        let random_detailed_validation = preamble
            .present(spec, "randomDetailedValidationRequired")
            .then(|| dec.read_constrained_whole_number(0, 99) as u8);
        let passport_validation = dec.read_boolean();
        let ticket_on_departure = dec.read_boolean();
        let info_text = preamble
            .present(spec, "infoText")
            .then(|| dec.read_utf8_string());

        Self {
            identification_by_id_card,
            identification_by_passport,
            online_validation,
            random_detailed_validation,
            passport_validation,
            ticket_on_departure,
            info_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ControlDetail;
    use crate::bits::BitView;
    use crate::records::FlexDecode;
    use crate::testbits::BitWriter;
    use crate::uper::UperDecoder;

    #[test]
    fn decodes_control_block() {
        let mut writer = BitWriter::new();
        writer
            .write_bits(0b10, 2) // randomDetailedValidationRequired present
            .write_bit(true)
            .write_bit(false)
            .write_bit(true)
            .write_constrained(25, 0, 99)
            .write_bit(false)
            .write_bit(true); // ticketOnDeparture
        let data = writer.finish();

        let mut dec = UperDecoder::new(BitView::new(&data));
        let control = ControlDetail::decode(&mut dec);
        assert!(!dec.has_error(), "error: {:?}", dec.error());
        assert!(control.identification_by_id_card);
        assert!(!control.identification_by_passport);
        assert!(control.online_validation);
        assert_eq!(control.random_detailed_validation, Some(25));
        assert!(!control.passport_validation);
        assert!(control.ticket_on_departure);
        assert_eq!(control.info_text, None);
    }
}
