//! Flexible-content barcode record family.
//!
//! The payload of a flexible-content barcode is one UPER-encoded
//! [`UicRailTicket`] tree: an issuer block, optional traveler and control
//! blocks, and a list of transport documents, each holding exactly one
//! ticket variant (reservation, open ticket, pass or voucher). Every record
//! here follows the protocol in `records`: a const field table, a presence
//! preamble, then fields decoded strictly in declaration order.
//!
//! Decoding performs no semantic validation (a station number is not checked
//! against any station list); it only enforces structural consistency, and
//! any inconsistency poisons the shared decoder.

mod control;
mod document;
mod issuing;
mod transport;
mod traveler;
pub mod types;

pub use control::ControlDetail;
pub use document::{TicketChoice, TokenType, TransportDocument};
pub use issuing::IssuingDetail;
pub use transport::{OpenTicket, Pass, Places, Reservation, Voucher};
pub use traveler::{Traveler, TravelerDetail};

use serde::{Deserialize, Serialize};

use crate::records::{FieldSpec, FlexDecode, Preamble, RecordSpec};
use crate::uper::UperDecoder;

/// Root record of a flexible-content ticket payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UicRailTicket {
    pub issuing: IssuingDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traveler: Option<TravelerDetail>,
    pub documents: Vec<TransportDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control: Option<ControlDetail>,
}

impl UicRailTicket {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::required("issuingDetail"),
        FieldSpec::optional("travelerDetail"),
        FieldSpec::optional("transportDocument"),
        FieldSpec::optional("controlDetail"),
    ]);
}

impl FlexDecode for UicRailTicket {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        let spec = &Self::FIELDS;
        let preamble = Preamble::read(dec, spec);

        let issuing = IssuingDetail::decode(dec);
        let traveler = preamble
            .present(spec, "travelerDetail")
            .then(|| TravelerDetail::decode(dec));
        let documents = if preamble.present(spec, "transportDocument") {
            dec.read_sequence_of()
        } else {
            Vec::new()
        };
        let control = preamble
            .present(spec, "controlDetail")
            .then(|| ControlDetail::decode(dec));

        Self {
            issuing,
            traveler,
            documents,
            control,
        }
    }
}
