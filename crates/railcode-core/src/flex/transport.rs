use serde::{Deserialize, Serialize};

use crate::records::{FieldSpec, FlexDecode, Preamble, RecordSpec};
use crate::uper::UperDecoder;

use super::types::TravelClass;

/// Open (non-reserved) ticket between two stations, valid over a day range
/// relative to the issuing date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenTicket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// DEFAULT second when absent from the wire.
    pub class: TravelClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_station_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_station: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_station_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_station: Option<String>,
    pub valid_from_day: u16,
    pub valid_until_day: u16,
    pub return_included: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_text: Option<String>,
}

impl OpenTicket {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::optional("referenceIA5"),
        FieldSpec::optional("classCode"),
        FieldSpec::optional("fromStationNum"),
        FieldSpec::optional("fromStationIA5"),
        FieldSpec::optional("toStationNum"),
        FieldSpec::optional("toStationIA5"),
        FieldSpec::required("validFromDay"),
        FieldSpec::required("validUntilDay"),
        FieldSpec::required("returnIncluded"),
        FieldSpec::optional("infoText"),
    ]);
}

impl FlexDecode for OpenTicket {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        let spec = &Self::FIELDS;
        let preamble = Preamble::read(dec, spec);

        let reference = preamble
            .present(spec, "referenceIA5")
            .then(|| dec.read_ia5_string(0, 0));
        let class = if preamble.present(spec, "classCode") {
            dec.read_enumerated_with_extension_marker()
        } else {
            TravelClass::Second
        };
        let from_station_num = preamble
            .present(spec, "fromStationNum")
            .then(|| dec.read_constrained_whole_number(1, 9_999_999) as u32);
        let from_station = preamble
            .present(spec, "fromStationIA5")
            .then(|| dec.read_ia5_string(0, 0));
        let to_station_num = preamble
            .present(spec, "toStationNum")
            .then(|| dec.read_constrained_whole_number(1, 9_999_999) as u32);
        let to_station = preamble
            .present(spec, "toStationIA5")
            .then(|| dec.read_ia5_string(0, 0));
        let valid_from_day = dec.read_constrained_whole_number(0, 700) as u16;
        let valid_until_day = dec.read_constrained_whole_number(0, 700) as u16;
        let return_included = dec.read_boolean();
        let info_text = preamble
            .present(spec, "infoText")
            .then(|| dec.read_utf8_string());

        Self {
            reference,
            class,
            from_station_num,
            from_station,
            to_station_num,
            to_station,
            valid_from_day,
            valid_until_day,
            return_included,
            info_text,
        }
    }
}

/// Seat or berth reservation on a specific train and day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train: Option<String>,
    pub departure_day: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_station_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_station: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_station_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_station: Option<String>,
    /// DEFAULT second when absent from the wire.
    pub class: TravelClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub places: Option<Places>,
}

impl Reservation {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::optional("trainNum"),
        FieldSpec::optional("trainIA5"),
        FieldSpec::required("departureDay"),
        FieldSpec::optional("fromStationNum"),
        FieldSpec::optional("fromStationIA5"),
        FieldSpec::optional("toStationNum"),
        FieldSpec::optional("toStationIA5"),
        FieldSpec::optional("classCode"),
        FieldSpec::optional("places"),
    ]);
}

impl FlexDecode for Reservation {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        let spec = &Self::FIELDS;
        let preamble = Preamble::read(dec, spec);

        let train_num = preamble
            .present(spec, "trainNum")
            .then(|| dec.read_constrained_whole_number(1, 99_999) as u32);
        let train = preamble
            .present(spec, "trainIA5")
            .then(|| dec.read_ia5_string(0, 0));
        let departure_day = dec.read_constrained_whole_number(0, 700) as u16;
        let from_station_num = preamble
            .present(spec, "fromStationNum")
            .then(|| dec.read_constrained_whole_number(1, 9_999_999) as u32);
        let from_station = preamble
            .present(spec, "fromStationIA5")
            .then(|| dec.read_ia5_string(0, 0));
        let to_station_num = preamble
            .present(spec, "toStationNum")
            .then(|| dec.read_constrained_whole_number(1, 9_999_999) as u32);
        let to_station = preamble
            .present(spec, "toStationIA5")
            .then(|| dec.read_ia5_string(0, 0));
        let class = if preamble.present(spec, "classCode") {
            dec.read_enumerated_with_extension_marker()
        } else {
            TravelClass::Second
        };
        let places = preamble
            .present(spec, "places")
            .then(|| Places::decode(dec));

        Self {
            train_num,
            train,
            departure_day,
            from_station_num,
            from_station,
            to_station_num,
            to_station,
            class,
            places,
        }
    }
}

/// Coach and place assignments of a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Places {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach: Option<String>,
    pub places: Vec<String>,
}

impl Places {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::optional("coach"),
        FieldSpec::optional("placeIA5"),
    ]);
}

impl FlexDecode for Places {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        let spec = &Self::FIELDS;
        let preamble = Preamble::read(dec, spec);

        let coach = preamble
            .present(spec, "coach")
            .then(|| dec.read_ia5_string(0, 0));
        let places = if preamble.present(spec, "placeIA5") {
            let count = dec.read_length_determinant();
            let mut items = Vec::new();
            for _ in 0..count {
                if dec.has_error() {
                    break;
                }
                items.push(dec.read_ia5_string(0, 0));
            }
            items
        } else {
            Vec::new()
        };

        Self { coach, places }
    }
}

/// Multi-day pass valid over a day range, optionally restricted to a country
/// list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pass {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub valid_from_day: u16,
    pub valid_until_day: u16,
    pub countries: Vec<u8>,
}

impl Pass {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::optional("passType"),
        FieldSpec::optional("passDescription"),
        FieldSpec::required("validFromDay"),
        FieldSpec::required("validUntilDay"),
        FieldSpec::optional("countries"),
    ]);
}

impl FlexDecode for Pass {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        let spec = &Self::FIELDS;
        let preamble = Preamble::read(dec, spec);

        let pass_type = preamble
            .present(spec, "passType")
            .then(|| dec.read_constrained_whole_number(1, 250) as u8);
        let description = preamble
            .present(spec, "passDescription")
            .then(|| dec.read_utf8_string());
        let valid_from_day = dec.read_constrained_whole_number(0, 700) as u16;
        let valid_until_day = dec.read_constrained_whole_number(0, 700) as u16;
        let countries = if preamble.present(spec, "countries") {
            let count = dec.read_length_determinant();
            let mut items = Vec::new();
            for _ in 0..count {
                if dec.has_error() {
                    break;
                }
                items.push(dec.read_constrained_whole_number(1, 250) as u8);
            }
            items
        } else {
            Vec::new()
        };

        Self {
            pass_type,
            description,
            valid_from_day,
            valid_until_day,
            countries,
        }
    }
}

/// Prepaid voucher redeemable against a later purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Amount in the issuing currency's smallest unit.
    pub amount: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher_type: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_text: Option<String>,
}

impl Voucher {
    const FIELDS: RecordSpec = RecordSpec::new(&[
        FieldSpec::optional("referenceIA5"),
        FieldSpec::required("amount"),
        FieldSpec::optional("type"),
        FieldSpec::optional("infoText"),
    ]);
}

impl FlexDecode for Voucher {
    fn decode(dec: &mut UperDecoder<'_>) -> Self {
        let spec = &Self::FIELDS;
        let preamble = Preamble::read(dec, spec);

        let reference = preamble
            .present(spec, "referenceIA5")
            .then(|| dec.read_ia5_string(0, 0));
        let amount = dec.read_constrained_whole_number(0, 999_999_999) as u32;
        let voucher_type = preamble
            .present(spec, "type")
            .then(|| dec.read_constrained_whole_number(1, 32_000) as u16);
        let info_text = preamble
            .present(spec, "infoText")
            .then(|| dec.read_utf8_string());

        Self {
            reference,
            amount,
            voucher_type,
            info_text,
        }
    }
}
