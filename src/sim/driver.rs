use nalgebra::Vector3;

use super::runner::Sample;
use crate::controller::VehicleController;
use crate::vehicle::ParamId;

/// Trait for scripted vehicle input.
///
/// Implement this to feed commands into a controller between ticks,
/// the way an in-world script would.
pub trait Driver {
    /// Issue commands for the coming tick, given the latest sample.
    fn drive(&mut self, controller: &mut VehicleController, sample: &Sample, dt: f64);

    /// Reset driver internal state.
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Issues no commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl Driver for Idle {
    fn drive(&mut self, _controller: &mut VehicleController, _sample: &Sample, _dt: f64) {}

    fn name(&self) -> &str {
        "idle"
    }
}

/// Holds the stick: re-issues the same motor commands every `every` ticks.
///
/// Motor directions decay once set, so a script keeps refreshing them.
/// Zero vectors are not sent.
#[derive(Debug, Clone)]
pub struct Throttle {
    pub linear: Vector3<f64>,  // m/s, body frame
    pub angular: Vector3<f64>, // rad/s
    pub every: u32,
    tick: u32,
}

impl Throttle {
    pub fn new(linear: Vector3<f64>, angular: Vector3<f64>, every: u32) -> Self {
        Self {
            linear,
            angular,
            every: every.max(1),
            tick: 0,
        }
    }

    /// Forward speed with an optional yaw rate, refreshed every tick.
    pub fn forward(speed: f64, yaw_rate: f64) -> Self {
        Self::new(Vector3::new(speed, 0.0, 0.0), Vector3::new(0.0, 0.0, yaw_rate), 1)
    }
}

impl Driver for Throttle {
    fn drive(&mut self, controller: &mut VehicleController, _sample: &Sample, _dt: f64) {
        if self.tick % self.every == 0 {
            if self.linear != Vector3::zeros() {
                controller.set_vector_param(ParamId::LinearMotorDirection, self.linear);
            }
            if self.angular != Vector3::zeros() {
                controller.set_vector_param(ParamId::AngularMotorDirection, self.angular);
            }
        }
        self.tick = self.tick.wrapping_add(1);
    }

    fn reset(&mut self) {
        self.tick = 0;
    }

    fn name(&self) -> &str {
        "throttle"
    }
}
