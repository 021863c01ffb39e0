use serde::{Deserialize, Serialize};

use crate::records::{FieldSpec, FlexDecode, Preamble, RecordSpec};
use crate::uper::UperDecoder;

use super::transport::{OpenTicket, Pass, Reservation, Voucher};

/// One transport document of a ticket: an optional machine-readable token
/// plus exactly one ticket variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenType>,
    pub ticket: TicketChoice,
}

impl TransportDocument {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::optional("token"),
        FieldSpec::required("ticket"),
    ]);
}

impl FlexDecode for TransportDocument {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        let spec = &Self::FIELDS;
        let preamble = Preamble::read(dec, spec);

        let token = preamble
            .present(spec, "token")
            .then(|| TokenType::decode(dec));
        let ticket = TicketChoice::decode(dec);

        Self { token, ticket }
    }
}

/// Opaque token attached to a document (e.g. for online control systems).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub token: Vec<u8>,
}

impl TokenType {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::optional("tokenProviderIA5"),
        FieldSpec::required("token"),
    ]);
}

impl FlexDecode for TokenType {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        let spec = &Self::FIELDS;
        let preamble = Preamble::read(dec, spec);

        let provider = preamble
            .present(spec, "tokenProviderIA5")
            .then(|| dec.read_ia5_string(0, 0));
        let token = dec.read_octet_string();

        Self { provider, token }
    }
}

/// The ticket variant of a transport document.
///
/// A CHOICE with extension marker: the wire carries the marker bit, then the
/// variant index over the declared list below, in order. A set marker or an
/// index outside the list poisons the decoder ("not implemented" vs.
/// protocol violation) and yields [`TicketChoice::Unsupported`], which only
/// ever appears in discarded trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketChoice {
    Reservation(Reservation),
    OpenTicket(OpenTicket),
    Pass(Pass),
    Voucher(Voucher),
    Unsupported,
}

impl TicketChoice {
    const NAME: &'static str = "TicketChoice";
    const VARIANTS: usize = 4;
}

impl FlexDecode for TicketChoice {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        match dec.read_choice_index(Self::NAME, Self::VARIANTS) {
            Some(0) => Self::Reservation(Reservation::decode(dec)),
            Some(1) => Self::OpenTicket(OpenTicket::decode(dec)),
            Some(2) => Self::Pass(Pass::decode(dec)),
            Some(3) => Self::Voucher(Voucher::decode(dec)),
            Some(_) | None => Self::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TicketChoice, TransportDocument};
    use crate::bits::BitView;
    use crate::records::FlexDecode;
    use crate::testbits::BitWriter;
    use crate::uper::{UperDecoder, UperError};

    fn write_minimal_open_ticket(writer: &mut BitWriter) {
        writer
            .write_bits(0, 7)
            .write_constrained(0, 0, 700)
            .write_constrained(0, 0, 700)
            .write_bit(false);
    }

    #[test]
    fn choice_selects_open_ticket() {
        let mut writer = BitWriter::new();
        writer.write_bit(false).write_constrained(1, 0, 3);
        write_minimal_open_ticket(&mut writer);
        let data = writer.finish();

        let mut dec = UperDecoder::new(BitView::new(&data));
        let choice = TicketChoice::decode(&mut dec);
        assert!(!dec.has_error(), "error: {:?}", dec.error());
        assert!(matches!(choice, TicketChoice::OpenTicket(_)));
    }

    #[test]
    fn choice_selects_last_declared_variant() {
        let mut writer = BitWriter::new();
        writer
            .write_bit(false)
            .write_constrained(3, 0, 3)
            // Voucher with no optionals, amount 1.
            .write_bits(0, 3)
            .write_constrained(1, 0, 999_999_999);
        let data = writer.finish();

        let mut dec = UperDecoder::new(BitView::new(&data));
        let choice = TicketChoice::decode(&mut dec);
        assert!(!dec.has_error(), "error: {:?}", dec.error());
        assert!(matches!(choice, TicketChoice::Voucher(ref v) if v.amount == 1));
    }

    #[test]
    fn choice_extension_marker_yields_unsupported() {
        let data = [0b1000_0000];
        let mut dec = UperDecoder::new(BitView::new(&data));
        let choice = TicketChoice::decode(&mut dec);
        assert_eq!(choice, TicketChoice::Unsupported);
        assert_eq!(
            dec.error(),
            Some(&UperError::ExtensionNotImplemented {
                what: "TicketChoice"
            })
        );
    }

    #[test]
    fn document_with_token() {
        let mut writer = BitWriter::new();
        writer
            .write_bit(true) // token present
            // TokenType: provider present.
            .write_bit(true)
            .write_ia5("VDV", 0, 0)
            .write_octets(&[0x01, 0x02])
            // Ticket: open ticket.
            .write_bit(false)
            .write_constrained(1, 0, 3);
        write_minimal_open_ticket(&mut writer);
        let data = writer.finish();

        let mut dec = UperDecoder::new(BitView::new(&data));
        let document = TransportDocument::decode(&mut dec);
        assert!(!dec.has_error(), "error: {:?}", dec.error());
        let token = document.token.expect("token present");
        assert_eq!(token.provider.as_deref(), Some("VDV"));
        assert_eq!(token.token, vec![0x01, 0x02]);
        assert!(matches!(document.ticket, TicketChoice::OpenTicket(_)));
    }
}
