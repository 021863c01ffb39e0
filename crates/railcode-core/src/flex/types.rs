use serde::{Deserialize, Serialize};

use crate::uper::UperEnum;

/// Travel class of a transport document.
///
/// Wire values are positions in declaration order; the enum is extensible,
/// so unknown classes poison the decode instead of being guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelClass {
    NotApplicable,
    First,
    Second,
    Tourist,
    Comfort,
    Premium,
    Business,
    All,
}

impl UperEnum for TravelClass {
    const NAME: &'static str = "TravelClass";
    const VARIANTS: &'static [Self] = &[
        Self::NotApplicable,
        Self::First,
        Self::Second,
        Self::Tourist,
        Self::Comfort,
        Self::Premium,
        Self::Business,
        Self::All,
    ];
}

/// Category of a traveler, extensible on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerType {
    Adult,
    Senior,
    Child,
    Youth,
    Dog,
    Bicycle,
    FreeAddonPassenger,
    FreeAddonChild,
}

impl UperEnum for PassengerType {
    const NAME: &'static str = "PassengerType";
    const VARIANTS: &'static [Self] = &[
        Self::Adult,
        Self::Senior,
        Self::Child,
        Self::Youth,
        Self::Dog,
        Self::Bicycle,
        Self::FreeAddonPassenger,
        Self::FreeAddonChild,
    ];
}
