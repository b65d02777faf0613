use nalgebra::{UnitQuaternion, Vector3};

use super::body::{approx_zero, PhysicsBody};
use crate::vehicle::{AttractorParams, BehaviorFlags, VehicleFlags, VehicleParams};

/// Below this norm the summed angular velocity is written as exact zero.
const ANGULAR_EPSILON: f64 = 0.01;

// ---------------------------------------------------------------------------
// Angular motion stage
// ---------------------------------------------------------------------------

/// Ramp the angular motor, add the vertical attractor, apply friction and
/// write the result to the body.
pub fn move_angular<B>(params: &mut VehicleParams, flags: &VehicleFlags, body: &mut B, dt: f64)
where
    B: PhysicsBody + ?Sized,
{
    let ang = &mut params.angular;
    // Includes whatever the engine did to the body since the last tick.
    let body_omega = body.angular_velocity();

    // --- Motor ---
    if ang.motor_apply > 0 {
        // Ramped over several ticks so a script updating slower than the
        // physics rate still reaches the requested speed.
        ang.motor_velocity += (ang.motor_direction - ang.motor_velocity) / (ang.motor_timescale / dt);
        ang.motor_apply -= 1;
    } else {
        ang.motor_velocity -= ang.motor_velocity / (ang.motor_decay_timescale / dt);
    }

    // --- Sum ---
    let attractor = vertical_attractor(&params.attractor, &body.orientation(), &body_omega, dt);
    let mut result = ang.motor_velocity + attractor;

    if flags.behavior.contains(BehaviorFlags::NO_DEFLECTION_UP) {
        result.x = 0.0;
        result.y = 0.0;
    }
    if approx_zero(&result, ANGULAR_EPSILON) {
        result = Vector3::zeros();
    }

    // --- Friction ---
    let decay = ang.friction_timescale.map(|ts| 1.0 / (ts / dt));
    result -= result.component_mul(&decay);

    ang.last_velocity = result;
    body.set_angular_velocity(result);
}

/// Corrective angular velocity pulling the body's up axis toward world up.
///
/// Zero when the attractor is disabled (timescale >= 300).
pub fn vertical_attractor(
    attractor: &AttractorParams,
    orientation: &UnitQuaternion<f64>,
    omega: &Vector3<f64>,
    dt: f64,
) -> Vector3<f64> {
    if !attractor.is_enabled() {
        return Vector3::zeros();
    }

    let servo = 0.2 / (attractor.timescale * dt);
    // World-space error: X/Y are 0 when upright and grow to +-1 lying on a side.
    let mut err = orientation * Vector3::z();
    if err.z < 0.0 {
        // Inverted: push X/Y toward 2 so upside down is not an equilibrium.
        err.x = 2.0 - err.x;
        err.y = 2.0 - err.y;
    }
    err *= servo;

    // Tilt about X shows up in err.y, tilt about Y in err.x.
    let bounce = 1.0 - attractor.efficiency * attractor.efficiency;
    Vector3::new(
        err.y + bounce * omega.x,
        -err.x + bounce * omega.y,
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RigidBody;
    use crate::vehicle::{preset, HoverFlags, ParamId, VehicleType};

    fn unlocked(ty: VehicleType) -> (VehicleParams, VehicleFlags) {
        let p = preset(ty);
        let mut flags = p.flags();
        flags.behavior.remove(BehaviorFlags::NO_DEFLECTION_UP);
        (p.params(), flags)
    }

    #[test]
    fn disabled_attractor_contributes_nothing() {
        let a = AttractorParams { efficiency: 0.2, timescale: 300.0 };
        let tilted = UnitQuaternion::from_euler_angles(2.5, -1.0, 0.3);
        let out = vertical_attractor(&a, &tilted, &Vector3::new(3.0, -2.0, 1.0), 0.1);
        assert_eq!(out, Vector3::zeros());
    }

    #[test]
    fn upright_body_has_no_attractor_error() {
        let a = AttractorParams { efficiency: 1.0, timescale: 2.0 };
        let out = vertical_attractor(&a, &UnitQuaternion::identity(), &Vector3::zeros(), 0.1);
        assert!(out.norm() < 1e-12);
    }

    #[test]
    fn attractor_rolls_body_back_upright() {
        let a = AttractorParams { efficiency: 1.0, timescale: 2.0 };
        // Rolled +0.3 rad about X: correction must be negative about X.
        let rolled = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.3);
        let out = vertical_attractor(&a, &rolled, &Vector3::zeros(), 0.1);
        assert!(out.x < 0.0);
        assert!(out.y.abs() < 1e-12);

        // Pitched +0.3 rad about Y: correction must be negative about Y.
        let pitched = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.3);
        let out = vertical_attractor(&a, &pitched, &Vector3::zeros(), 0.1);
        assert!(out.y < 0.0);
        assert!(out.x.abs() < 1e-12);
    }

    #[test]
    fn inverted_body_is_not_an_equilibrium() {
        let a = AttractorParams { efficiency: 1.0, timescale: 2.0 };
        let flipped = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI);
        let out = vertical_attractor(&a, &flipped, &Vector3::zeros(), 0.1);
        assert!(out.norm() > 0.1);
    }

    #[test]
    fn attractor_damps_with_square_law() {
        let a = AttractorParams { efficiency: 0.5, timescale: 2.0 };
        let omega = Vector3::new(1.0, -2.0, 5.0);
        let out = vertical_attractor(&a, &UnitQuaternion::identity(), &omega, 0.1);
        assert!((out.x - 0.75).abs() < 1e-12);
        assert!((out.y + 1.5).abs() < 1e-12);
        assert_eq!(out.z, 0.0);
    }

    #[test]
    fn motor_ramps_then_decays() {
        let (mut p, f) = unlocked(VehicleType::Airplane);
        p.set_vector(ParamId::AngularMotorDirection, Vector3::new(0.0, 0.0, 2.0));
        let mut body = RigidBody::at(Vector3::new(0.0, 0.0, 50.0));
        let dt = 0.1;

        move_angular(&mut p, &f, &mut body, dt);
        // ts 4 -> one fortieth of the error per tick.
        assert!((p.angular.motor_velocity.z - 2.0 / 40.0).abs() < 1e-12);
        assert_eq!(p.angular.motor_apply, 9);

        for _ in 0..9 {
            move_angular(&mut p, &f, &mut body, dt);
        }
        assert_eq!(p.angular.motor_apply, 0);
        let peak = p.angular.motor_velocity.z;
        assert!(peak > 0.0 && peak < 2.0);

        move_angular(&mut p, &f, &mut body, dt);
        assert!(p.angular.motor_velocity.z < peak);
        assert!(body.omega.z > 0.0);
    }

    #[test]
    fn no_deflection_up_clears_pitch_and_roll() {
        let p = preset(VehicleType::Car);
        let mut params = p.params();
        let flags = p.flags();
        params.angular.motor_velocity = Vector3::new(1.0, 1.0, 1.0);
        let mut body = RigidBody::at(Vector3::new(0.0, 0.0, 5.0));
        body.orientation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.5);
        move_angular(&mut params, &flags, &mut body, 0.1);
        assert_eq!(body.omega.x, 0.0);
        assert_eq!(body.omega.y, 0.0);
        assert!(body.omega.z > 0.0);
    }

    #[test]
    fn small_result_snaps_to_zero() {
        let mut params = VehicleParams::default();
        params.angular.motor_decay_timescale = 1000.0;
        params.angular.friction_timescale = Vector3::repeat(1000.0);
        params.angular.motor_velocity = Vector3::new(0.001, 0.0, 0.002);
        let flags = VehicleFlags::new(HoverFlags::empty(), BehaviorFlags::empty());
        let mut body = RigidBody::at(Vector3::zeros());
        body.omega = Vector3::new(0.3, 0.3, 0.3);
        move_angular(&mut params, &flags, &mut body, 0.1);
        assert_eq!(body.omega, Vector3::zeros());
        assert_eq!(params.angular.last_velocity, Vector3::zeros());
    }
}
