use serde::{Deserialize, Serialize};

use crate::records::{FieldSpec, FlexDecode, Preamble, RecordSpec};
use crate::uper::UperDecoder;

use super::types::PassengerType;

/// Traveler block: the people (and accompanying items) the ticket covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelerDetail {
    pub travelers: Vec<Traveler>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

impl TravelerDetail {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::optional("traveler"),
        FieldSpec::optional("preferredLanguage"),
        FieldSpec::optional("groupName"),
    ]);
}

impl FlexDecode for TravelerDetail {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        let spec = &Self::FIELDS;
        let preamble = Preamble::read(dec, spec);

        let travelers = if preamble.present(spec, "traveler") {
            dec.read_sequence_of()
        } else {
            Vec::new()
        };
        let preferred_language = preamble
            .present(spec, "preferredLanguage")
            .then(|| dec.read_ia5_string(2, 2));
        let group_name = preamble
            .present(spec, "groupName")
            .then(|| dec.read_utf8_string());

        Self {
            travelers,
            preferred_language,
            group_name,
        }
    }
}

/// One traveler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traveler {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_card: Option<String>,
    pub ticket_holder: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passenger_type: Option<PassengerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduced_mobility: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_birth: Option<u16>,
}

impl Traveler {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::optional("firstName"),
        FieldSpec::optional("lastName"),
        FieldSpec::optional("idCard"),
        FieldSpec::required("ticketHolder"),
        FieldSpec::optional("passengerType"),
        FieldSpec::optional("passengerWithReducedMobility"),
        FieldSpec::optional("yearOfBirth"),
    ]);
}

impl FlexDecode for Traveler {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        let spec = &Self::FIELDS;
        let preamble = Preamble::read(dec, spec);

        let first_name = preamble
            .present(spec, "firstName")
            .then(|| dec.read_utf8_string());
        let last_name = preamble
            .present(spec, "lastName")
            .then(|| dec.read_utf8_string());
        let id_card = preamble
            .present(spec, "idCard")
            .then(|| dec.read_ia5_string(0, 0));
        let ticket_holder = dec.read_boolean();
        let passenger_type = preamble
            .present(spec, "passengerType")
            .then(|| dec.read_enumerated_with_extension_marker());
        let reduced_mobility = preamble
            .present(spec, "passengerWithReducedMobility")
            .then(|| dec.read_boolean());
        let year_of_birth = preamble
            .present(spec, "yearOfBirth")
            .then(|| dec.read_constrained_whole_number(1901, 2155) as u16);

        Self {
            first_name,
            last_name,
            id_card,
            ticket_holder,
            passenger_type,
            reduced_mobility,
            year_of_birth,
        }
    }
}
