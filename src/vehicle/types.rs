use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Vehicle type
// ---------------------------------------------------------------------------

/// Vehicle archetype. Selecting one resets the whole parameter store to its preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    #[default]
    None,
    Sled,
    Car,
    Boat,
    Airplane,
    Balloon,
}

impl VehicleType {
    pub const ALL: [VehicleType; 6] = [
        VehicleType::None,
        VehicleType::Sled,
        VehicleType::Car,
        VehicleType::Boat,
        VehicleType::Airplane,
        VehicleType::Balloon,
    ];

    /// Script-facing integer code.
    pub fn code(self) -> i32 {
        match self {
            VehicleType::None => 0,
            VehicleType::Sled => 1,
            VehicleType::Car => 2,
            VehicleType::Boat => 3,
            VehicleType::Airplane => 4,
            VehicleType::Balloon => 5,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            VehicleType::None => "none",
            VehicleType::Sled => "sled",
            VehicleType::Car => "car",
            VehicleType::Boat => "boat",
            VehicleType::Airplane => "airplane",
            VehicleType::Balloon => "balloon",
        }
    }

    /// `None` disables stepping entirely.
    pub fn is_active(self) -> bool {
        self != VehicleType::None
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vehicle type `{0}` (expected none, sled, car, boat, airplane or balloon)")]
pub struct ParseVehicleTypeError(pub String);

impl FromStr for VehicleType {
    type Err = ParseVehicleTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == lower)
            .ok_or_else(|| ParseVehicleTypeError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Parameter ids
// ---------------------------------------------------------------------------

/// Flat id space shared by the float, vector and rotation setters.
///
/// Each id is meaningful to exactly one setter kind (the float setter also
/// accepts the handful of vector ids that take a uniform broadcast value).
/// Calling any other setter with it is a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    LinearFrictionTimescale,
    AngularFrictionTimescale,
    LinearMotorDirection,
    AngularMotorDirection,
    LinearMotorOffset,
    HoverHeight,
    HoverEfficiency,
    HoverTimescale,
    Buoyancy,
    LinearDeflectionEfficiency,
    LinearDeflectionTimescale,
    LinearMotorTimescale,
    LinearMotorDecayTimescale,
    AngularDeflectionEfficiency,
    AngularDeflectionTimescale,
    AngularMotorTimescale,
    AngularMotorDecayTimescale,
    VerticalAttractionEfficiency,
    VerticalAttractionTimescale,
    BankingEfficiency,
    BankingMix,
    BankingTimescale,
    ReferenceFrame,
    BlockExit,
    RollFrame,
}

impl ParamId {
    pub const ALL: [ParamId; 25] = [
        ParamId::LinearFrictionTimescale,
        ParamId::AngularFrictionTimescale,
        ParamId::LinearMotorDirection,
        ParamId::AngularMotorDirection,
        ParamId::LinearMotorOffset,
        ParamId::HoverHeight,
        ParamId::HoverEfficiency,
        ParamId::HoverTimescale,
        ParamId::Buoyancy,
        ParamId::LinearDeflectionEfficiency,
        ParamId::LinearDeflectionTimescale,
        ParamId::LinearMotorTimescale,
        ParamId::LinearMotorDecayTimescale,
        ParamId::AngularDeflectionEfficiency,
        ParamId::AngularDeflectionTimescale,
        ParamId::AngularMotorTimescale,
        ParamId::AngularMotorDecayTimescale,
        ParamId::VerticalAttractionEfficiency,
        ParamId::VerticalAttractionTimescale,
        ParamId::BankingEfficiency,
        ParamId::BankingMix,
        ParamId::BankingTimescale,
        ParamId::ReferenceFrame,
        ParamId::BlockExit,
        ParamId::RollFrame,
    ];

    /// Script-facing integer code.
    pub fn code(self) -> i32 {
        match self {
            ParamId::LinearFrictionTimescale => 16,
            ParamId::AngularFrictionTimescale => 17,
            ParamId::LinearMotorDirection => 18,
            ParamId::AngularMotorDirection => 19,
            ParamId::LinearMotorOffset => 20,
            ParamId::HoverHeight => 24,
            ParamId::HoverEfficiency => 25,
            ParamId::HoverTimescale => 26,
            ParamId::Buoyancy => 27,
            ParamId::LinearDeflectionEfficiency => 28,
            ParamId::LinearDeflectionTimescale => 29,
            ParamId::LinearMotorTimescale => 30,
            ParamId::LinearMotorDecayTimescale => 31,
            ParamId::AngularDeflectionEfficiency => 32,
            ParamId::AngularDeflectionTimescale => 33,
            ParamId::AngularMotorTimescale => 34,
            ParamId::AngularMotorDecayTimescale => 35,
            ParamId::VerticalAttractionEfficiency => 36,
            ParamId::VerticalAttractionTimescale => 37,
            ParamId::BankingEfficiency => 38,
            ParamId::BankingMix => 39,
            ParamId::BankingTimescale => 40,
            ParamId::ReferenceFrame => 44,
            ParamId::BlockExit => 45,
            ParamId::RollFrame => 46,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    /// Ids whose stored value is a time constant and must stay >= 0.01 s.
    pub fn is_timescale(self) -> bool {
        matches!(
            self,
            ParamId::LinearFrictionTimescale
                | ParamId::AngularFrictionTimescale
                | ParamId::HoverTimescale
                | ParamId::LinearDeflectionTimescale
                | ParamId::LinearMotorTimescale
                | ParamId::LinearMotorDecayTimescale
                | ParamId::AngularDeflectionTimescale
                | ParamId::AngularMotorTimescale
                | ParamId::AngularMotorDecayTimescale
                | ParamId::VerticalAttractionTimescale
                | ParamId::BankingTimescale
        )
    }
}
