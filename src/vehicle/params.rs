use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::types::ParamId;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Smallest storable time constant, s. Keeps every `x / (ts / dt)` finite.
pub const MIN_TIMESCALE: f64 = 0.01;
/// Per-axis cap on the angular motor target, rad/s (two revolutions per second).
pub const MAX_ANGULAR_MOTOR: f64 = 12.56;
/// Ticks over which a fresh angular motor command is ramped in.
pub const ANGULAR_MOTOR_APPLY_TICKS: u32 = 10;
/// Vertical attractor timescales at or above this disable the attractor.
pub const ATTRACTOR_DISABLED_TIMESCALE: f64 = 300.0;

fn clamp_timescale(v: f64) -> f64 {
    // NaN compares false and lands on the floor too.
    if v >= MIN_TIMESCALE {
        v
    } else {
        MIN_TIMESCALE
    }
}

/// Clamp to `[lo, hi]`; NaN becomes `nan`.
fn clamp_or(v: f64, lo: f64, hi: f64, nan: f64) -> f64 {
    if v.is_nan() {
        nan
    } else {
        v.clamp(lo, hi)
    }
}

fn clamp_timescale_vec(v: &Vector3<f64>) -> Vector3<f64> {
    v.map(clamp_timescale)
}

// ---------------------------------------------------------------------------
// Parameter groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    /// Working motor direction, body frame. Decays toward zero every tick.
    pub motor_direction: Vector3<f64>,
    /// Motor direction as last set by a script; caps the accumulator per axis.
    pub motor_target: Vector3<f64>,
    pub motor_timescale: f64,
    pub motor_decay_timescale: f64,
    pub friction_timescale: Vector3<f64>,
    /// Persisted body-frame velocity accumulator.
    pub velocity: Vector3<f64>,
    /// Position at the end of the previous tick.
    pub last_position: Vector3<f64>,
    /// Blocking end point; zero disables the boundary.
    pub block_exit: Vector3<f64>,
    /// -1 doubles gravity, 0 leaves it, 1 cancels it.
    pub buoyancy: f64,
    /// Stored only.
    pub motor_offset: Vector3<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngularParams {
    /// Target angular velocity.
    pub motor_direction: Vector3<f64>,
    pub motor_timescale: f64,
    pub motor_decay_timescale: f64,
    pub friction_timescale: Vector3<f64>,
    /// Ramped motor velocity carried between ticks.
    pub motor_velocity: Vector3<f64>,
    /// Ticks left to ramp toward `motor_direction`.
    pub motor_apply: u32,
    /// Angular velocity written to the body on the previous tick.
    pub last_velocity: Vector3<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverParams {
    pub height: f64,
    pub timescale: f64,
    /// Stored only.
    pub efficiency: f64,
    /// Most recently resolved target height; `None` until hover first engages.
    pub target_height: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttractorParams {
    pub efficiency: f64,
    pub timescale: f64,
}

impl AttractorParams {
    pub fn is_enabled(&self) -> bool {
        self.timescale < ATTRACTOR_DISABLED_TIMESCALE
    }
}

/// Deflection and banking tunables. Accepted and stored; no stage reads them yet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeflectionParams {
    pub linear_efficiency: f64,
    pub linear_timescale: f64,
    pub angular_efficiency: f64,
    pub angular_timescale: f64,
    pub banking_efficiency: f64,
    pub banking_mix: f64,
    pub banking_timescale: f64,
}

// ---------------------------------------------------------------------------
// Parameter store
// ---------------------------------------------------------------------------

/// Every tunable and persisted value of one vehicle controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    pub linear: LinearParams,
    pub angular: AngularParams,
    pub hover: HoverParams,
    pub attractor: AttractorParams,
    pub deflection: DeflectionParams,
    /// Roll/pitch limit reference; identity disables the limiter.
    pub roll_frame: UnitQuaternion<f64>,
    /// Stored only.
    pub reference_frame: UnitQuaternion<f64>,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            linear: LinearParams {
                motor_direction: Vector3::zeros(),
                motor_target: Vector3::zeros(),
                motor_timescale: 0.0,
                motor_decay_timescale: 0.0,
                friction_timescale: Vector3::zeros(),
                velocity: Vector3::zeros(),
                last_position: Vector3::zeros(),
                block_exit: Vector3::zeros(),
                buoyancy: 0.0,
                motor_offset: Vector3::zeros(),
            },
            angular: AngularParams {
                motor_direction: Vector3::zeros(),
                motor_timescale: 0.0,
                motor_decay_timescale: 0.0,
                friction_timescale: Vector3::zeros(),
                motor_velocity: Vector3::zeros(),
                motor_apply: 0,
                last_velocity: Vector3::zeros(),
            },
            hover: HoverParams {
                height: 0.0,
                timescale: 0.0,
                efficiency: 0.0,
                target_height: None,
            },
            attractor: AttractorParams {
                efficiency: 1.0,
                timescale: 500.0,
            },
            deflection: DeflectionParams::default(),
            roll_frame: UnitQuaternion::identity(),
            reference_frame: UnitQuaternion::identity(),
        }
    }
}

impl VehicleParams {
    /// Float setter. Returns `false` when `id` takes no float value.
    ///
    /// Timescale ids are floored at [`MIN_TIMESCALE`]. The vector ids that
    /// accept a float broadcast it to all three axes; the angular motor
    /// broadcast is deliberately *not* capped at [`MAX_ANGULAR_MOTOR`].
    pub fn set_float(&mut self, id: ParamId, value: f64) -> bool {
        let ts = clamp_timescale(value);
        match id {
            ParamId::LinearFrictionTimescale => {
                self.linear.friction_timescale = Vector3::repeat(ts);
            }
            ParamId::AngularFrictionTimescale => {
                self.angular.friction_timescale = Vector3::repeat(ts);
            }
            ParamId::LinearMotorDirection => {
                self.linear.motor_direction = Vector3::repeat(value);
                self.linear.motor_target = Vector3::repeat(value);
            }
            ParamId::AngularMotorDirection => {
                self.angular.motor_direction = Vector3::repeat(value);
                self.angular.motor_apply = ANGULAR_MOTOR_APPLY_TICKS;
            }
            ParamId::LinearMotorOffset => {
                self.linear.motor_offset = Vector3::repeat(value);
            }
            ParamId::HoverHeight => self.hover.height = value,
            ParamId::HoverEfficiency => self.hover.efficiency = clamp_or(value, 0.0, 1.0, 0.0),
            ParamId::HoverTimescale => self.hover.timescale = ts,
            ParamId::Buoyancy => self.linear.buoyancy = clamp_or(value, -1.0, 1.0, 0.0),
            ParamId::LinearDeflectionEfficiency => self.deflection.linear_efficiency = ts,
            ParamId::LinearDeflectionTimescale => self.deflection.linear_timescale = ts,
            ParamId::LinearMotorTimescale => self.linear.motor_timescale = ts,
            ParamId::LinearMotorDecayTimescale => self.linear.motor_decay_timescale = ts,
            ParamId::AngularDeflectionEfficiency => self.deflection.angular_efficiency = ts,
            ParamId::AngularDeflectionTimescale => self.deflection.angular_timescale = ts,
            ParamId::AngularMotorTimescale => self.angular.motor_timescale = ts,
            ParamId::AngularMotorDecayTimescale => self.angular.motor_decay_timescale = ts,
            ParamId::VerticalAttractionEfficiency => {
                // Below 0.1 the attractor goes unstable.
                self.attractor.efficiency = clamp_or(value, 0.1, 1.0, 0.1);
            }
            ParamId::VerticalAttractionTimescale => self.attractor.timescale = ts,
            ParamId::BankingEfficiency => self.deflection.banking_efficiency = ts,
            ParamId::BankingMix => self.deflection.banking_mix = ts,
            ParamId::BankingTimescale => self.deflection.banking_timescale = ts,
            ParamId::ReferenceFrame | ParamId::BlockExit | ParamId::RollFrame => return false,
        }
        true
    }

    /// Vector setter. Returns `false` when `id` takes no vector value.
    pub fn set_vector(&mut self, id: ParamId, value: Vector3<f64>) -> bool {
        match id {
            ParamId::LinearFrictionTimescale => {
                self.linear.friction_timescale = clamp_timescale_vec(&value);
            }
            ParamId::AngularFrictionTimescale => {
                self.angular.friction_timescale = clamp_timescale_vec(&value);
            }
            ParamId::LinearMotorDirection => {
                self.linear.motor_direction = value;
                self.linear.motor_target = value;
            }
            ParamId::AngularMotorDirection => {
                self.angular.motor_direction =
                    value.map(|v| clamp_or(v, -MAX_ANGULAR_MOTOR, MAX_ANGULAR_MOTOR, 0.0));
                self.angular.motor_apply = ANGULAR_MOTOR_APPLY_TICKS;
            }
            ParamId::LinearMotorOffset => self.linear.motor_offset = value,
            ParamId::BlockExit => self.linear.block_exit = value,
            _ => return false,
        }
        true
    }

    /// Rotation setter. Returns `false` when `id` takes no rotation value.
    pub fn set_rotation(&mut self, id: ParamId, value: UnitQuaternion<f64>) -> bool {
        match id {
            ParamId::ReferenceFrame => self.reference_frame = value,
            ParamId::RollFrame => self.roll_frame = value,
            _ => return false,
        }
        true
    }
}
