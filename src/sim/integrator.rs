use nalgebra::{Quaternion, UnitQuaternion};

use super::body::RigidBody;

// ---------------------------------------------------------------------------
// Semi-implicit Euler step with constant applied force over the step
// ---------------------------------------------------------------------------

/// Single step: force updates velocity first, then the new velocity moves the body.
pub fn euler_step(body: &mut RigidBody, dt: f64) {
    if body.mass > 0.0 {
        body.vel += body.force / body.mass * dt;
    }
    body.pos += body.vel * dt;

    // World-frame rate: dq/dt = 0.5 * (0, omega) * q
    let w = Quaternion::new(0.0, body.omega.x, body.omega.y, body.omega.z);
    let dquat = w * body.orientation.quaternion() * 0.5;
    let q_raw = body.orientation.quaternion() + dquat * dt;
    body.orientation = UnitQuaternion::new_normalize(q_raw);
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn force_accelerates_before_moving() {
        let mut b = RigidBody::at(Vector3::zeros());
        b.mass = 2.0;
        b.force = Vector3::new(0.0, 0.0, -20.0);
        euler_step(&mut b, 0.1);
        assert!((b.vel.z + 1.0).abs() < 1e-12);
        assert!((b.pos.z + 0.1).abs() < 1e-12);
    }

    #[test]
    fn yaw_rate_turns_body() {
        let mut b = RigidBody::at(Vector3::zeros());
        b.omega = Vector3::new(0.0, 0.0, 0.5);
        for _ in 0..100 {
            euler_step(&mut b, 0.01);
        }
        assert!((b.yaw() - 0.5).abs() < 1e-3, "yaw = {}", b.yaw());
    }

    #[test]
    fn quaternion_stays_unit() {
        let mut b = RigidBody::at(Vector3::zeros());
        b.omega = Vector3::new(1.3, -0.7, 2.1);
        for _ in 0..1000 {
            euler_step(&mut b, 0.01);
            assert!((b.orientation.quaternion().norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn massless_body_ignores_force() {
        let mut b = RigidBody::at(Vector3::zeros());
        b.mass = 0.0;
        b.force = Vector3::new(1.0, 1.0, 1.0);
        euler_step(&mut b, 0.1);
        assert_eq!(b.vel, Vector3::zeros());
    }
}
