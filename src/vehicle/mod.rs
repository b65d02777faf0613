pub mod types;
pub mod flags;
pub mod params;
pub mod presets;

pub use types::{ParamId, ParseVehicleTypeError, VehicleType};
pub use flags::{BehaviorFlags, HoverFlags, VehicleFlags, CLEAR_ALL};
pub use params::{
    AngularParams, AttractorParams, DeflectionParams, HoverParams, LinearParams, VehicleParams,
    MAX_ANGULAR_MOTOR, MIN_TIMESCALE,
};
pub use presets::{preset, Preset, PRESETS};
