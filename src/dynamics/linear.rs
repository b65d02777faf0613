use nalgebra::Vector3;

use super::body::{approx_zero, Environment, PhysicsBody};
use crate::vehicle::{BehaviorFlags, HoverFlags, VehicleFlags, VehicleParams};

/// Below this norm a motor direction or accumulator counts as zero.
const MOTOR_EPSILON: f64 = 0.01;
/// Clearance restored when the body is found below the terrain.
const TERRAIN_MARGIN: f64 = 2.0;
/// Hover errors below this are treated as on target.
const HOVER_DEADBAND: f64 = 0.01;
/// Hover errors above this snap position when the height is locked.
const HOVER_LOCK_TOLERANCE: f64 = 0.2;
/// Gain of the proportional hover correction.
const HOVER_GAIN: f64 = 50.0;

// ---------------------------------------------------------------------------
// Linear motion stage
// ---------------------------------------------------------------------------

/// Advance the linear motor, then write velocity and gravity force to the body.
///
/// Order per tick:
///   1. Motor ramp into the accumulator, capped by the last commanded target
///   2. Body-frame accumulator rotated to world, Z left to the engine
///   3. Position constraints: blocking box, terrain floor
///   4. Hover correction on Z
///   5. Gravity scaling for LIMIT_MOTOR_UP, axis locks
///   6. Friction decay of the accumulator
pub fn move_linear<B, E>(
    params: &mut VehicleParams,
    flags: &VehicleFlags,
    body: &mut B,
    env: &E,
    dt: f64,
) where
    B: PhysicsBody + ?Sized,
    E: Environment + ?Sized,
{
    let lin = &mut params.linear;

    // --- Motor ---
    if !approx_zero(&lin.motor_direction, MOTOR_EPSILON) {
        let add = lin.motor_direction / (lin.motor_timescale / dt);
        lin.velocity += add * 10.0;
        for i in 0..3 {
            if lin.velocity[i].abs() > lin.motor_target[i].abs() {
                lin.velocity[i] = lin.motor_target[i];
            }
        }
        let decay = 1.0 / (lin.motor_decay_timescale / dt);
        lin.motor_direction -= lin.motor_direction * decay * 0.5;
    } else if approx_zero(&lin.velocity, MOTOR_EPSILON) {
        lin.velocity = Vector3::zeros();
    }

    // --- World velocity and gravity ---
    let mut dir = body.orientation() * lin.velocity;
    let mut gravity = Vector3::zeros();
    gravity.z = env.gravity().z * body.mass() * (1.0 - lin.buoyancy);
    // Falling stays with the engine.
    dir.z = body.velocity().z;

    // --- Position constraints ---
    let mut pos = body.position();
    let pos_change = pos - lin.last_position;
    let z_change = pos_change.z.abs();

    if lin.block_exit != Vector3::zeros() {
        let end = lin.block_exit;
        if pos.x >= end.x - 1.0 {
            pos.x -= pos_change.x + 1.0;
            body.set_position(pos);
        }
        if pos.y >= end.y - 1.0 {
            pos.y -= pos_change.y + 1.0;
            body.set_position(pos);
        }
        if pos.z >= end.z - 1.0 {
            pos.z -= pos_change.z + 1.0;
            body.set_position(pos);
        }
        if pos.x <= 0.0 {
            pos.x += pos_change.x + 1.0;
            body.set_position(pos);
        }
        if pos.y <= 0.0 {
            pos.y += pos_change.y + 1.0;
            body.set_position(pos);
        }
    }

    let terrain = env.terrain_height(pos.x, pos.y);
    if pos.z < terrain {
        pos.z = terrain + TERRAIN_MARGIN;
        body.set_position(pos);
    }

    // --- Hover ---
    if flags.hover.intersects(HoverFlags::RESOLVING) {
        let hover = &mut params.hover;
        let mut target = hover.target_height.unwrap_or(pos.z);
        if flags.hover.contains(HoverFlags::WATER_ONLY) {
            target = env.water_level() + hover.height;
        }
        if flags.hover.contains(HoverFlags::TERRAIN_ONLY) {
            target = env.terrain_height(pos.x, pos.y) + hover.height;
        }
        if flags.hover.contains(HoverFlags::GLOBAL_HEIGHT) {
            target = hover.height;
        }
        if flags.hover.contains(HoverFlags::UP_ONLY) && pos.z > target {
            target = pos.z;
        }
        hover.target_height = Some(target);

        let error = pos.z - target;
        if flags.hover.contains(HoverFlags::LOCK_HEIGHT) {
            if error.abs() > HOVER_LOCK_TOLERANCE {
                pos.z = target;
                body.set_position(pos);
            }
        } else if error.abs() > HOVER_DEADBAND {
            dir.z = -(error * dt * HOVER_GAIN) / hover.timescale;
        } else {
            dir.z = 0.0;
        }
    }

    // --- Motor-up limit ---
    if flags.behavior.contains(BehaviorFlags::LIMIT_MOTOR_UP) {
        gravity.z *= motor_up_scale(z_change);
        if pos.z - env.terrain_height(pos.x, pos.y) > 2.5 {
            gravity.z *= 1.037125;
        }
    }

    // --- Axis locks ---
    if flags.behavior.contains(BehaviorFlags::NO_X) {
        dir.x = 0.0;
    }
    if flags.behavior.contains(BehaviorFlags::NO_Y) {
        dir.y = 0.0;
    }
    if flags.behavior.contains(BehaviorFlags::NO_Z) {
        dir.z = 0.0;
    }

    lin.last_position = body.position();
    body.set_velocity(dir);
    body.set_force(gravity);

    // --- Friction ---
    let decay = lin.friction_timescale.map(|ts| 1.0 / (ts / dt));
    lin.velocity -= lin.velocity.component_mul(&decay);
}

/// Gravity multiplier for a vehicle that moved `z_change` vertically last tick.
///
/// The rungs are cumulative, not exclusive.
pub(crate) fn motor_up_scale(z_change: f64) -> f64 {
    let mut scale = 1.0;
    if z_change > 0.3 {
        scale *= 3.0;
    }
    if z_change > 0.15 {
        scale *= 2.0;
    }
    if z_change > 0.75 {
        scale *= 1.5;
    }
    if z_change > 0.05 {
        scale *= 1.25;
    }
    if z_change > 0.025 {
        scale *= 1.125;
    }
    scale
}
