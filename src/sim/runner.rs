use nalgebra::{UnitQuaternion, Vector3};
use tracing::info;

use super::body::RigidBody;
use super::driver::{Driver, Idle};
use super::world::FlatWorld;
use crate::config::SimConfig;
use crate::controller::VehicleController;

// ---------------------------------------------------------------------------
// Trajectory sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub time: f64,                        // s
    pub pos: Vector3<f64>,                // m
    pub vel: Vector3<f64>,                // m/s
    pub orientation: UnitQuaternion<f64>, // body→world
    pub omega: Vector3<f64>,              // rad/s
}

impl Sample {
    pub fn of(time: f64, body: &RigidBody) -> Self {
        Self {
            time,
            pos: body.pos,
            vel: body.vel,
            orientation: body.orientation,
            omega: body.omega,
        }
    }

    /// Speed along the body's forward axis.
    pub fn forward_speed(&self) -> f64 {
        self.vel.dot(&(self.orientation * Vector3::x()))
    }

    /// Heading about world Z (rad).
    pub fn yaw(&self) -> f64 {
        self.orientation.euler_angles().2
    }
}

impl Default for Sample {
    fn default() -> Self {
        Self::of(0.0, &RigidBody::default())
    }
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

/// Drive `body` with `controller` in `world` until `config.max_time`.
///
/// The driver is reset first. Per tick: driver input, controller step,
/// integration, ground contact.
/// Returns one sample per tick plus the initial state.
pub fn simulate_with(
    controller: &mut VehicleController,
    body: &mut RigidBody,
    world: &FlatWorld,
    config: &SimConfig,
    driver: &mut dyn Driver,
) -> Vec<Sample> {
    let dt = config.dt;
    let steps = if dt.is_finite() && dt > 0.0 {
        // Tolerate max_time / dt landing a hair above an integer.
        (config.max_time / dt - 1e-9).ceil().max(0.0) as usize
    } else {
        0
    };

    driver.reset();
    let mut samples = Vec::with_capacity(steps.min(200_000) + 1);
    samples.push(Sample::of(0.0, body));

    info!(
        vehicle_type = %controller.vehicle_type(),
        driver = driver.name(),
        dt,
        steps,
        "simulation start"
    );

    for i in 1..=steps {
        if let Some(last) = samples.last() {
            driver.drive(controller, last, dt);
        }
        controller.step(body, world, dt);
        body.integrate(dt);
        world.resolve_ground_contact(body);
        samples.push(Sample::of(i as f64 * dt, body));
    }

    samples
}

/// Simulate with no scripted input (convenience wrapper).
pub fn simulate(
    controller: &mut VehicleController,
    body: &mut RigidBody,
    world: &FlatWorld,
    config: &SimConfig,
) -> Vec<Sample> {
    simulate_with(controller, body, world, config, &mut Idle)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
