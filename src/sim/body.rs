use nalgebra::{UnitQuaternion, Vector3};

use super::integrator::euler_step;
use crate::dynamics::PhysicsBody;

// ---------------------------------------------------------------------------
// Rigid body: the minimal engine-side state a vehicle controller drives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub pos: Vector3<f64>,               // m, world, Z up
    pub vel: Vector3<f64>,               // m/s, world
    pub orientation: UnitQuaternion<f64>, // body→world rotation
    pub omega: Vector3<f64>,             // rad/s, world frame
    pub mass: f64,                       // kg
    pub force: Vector3<f64>,             // N, held over the next integration step
}

impl RigidBody {
    /// Level, resting 1 kg body at `pos`.
    pub fn at(pos: Vector3<f64>) -> Self {
        Self {
            pos,
            vel: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            omega: Vector3::zeros(),
            mass: 1.0,
            force: Vector3::zeros(),
        }
    }

    /// Advance by `dt` under the currently applied force.
    pub fn integrate(&mut self, dt: f64) {
        euler_step(self, dt);
    }

    /// Body X-axis (forward) in world frame.
    pub fn forward(&self) -> Vector3<f64> {
        self.orientation * Vector3::x()
    }

    /// Heading about world Z (rad).
    pub fn yaw(&self) -> f64 {
        let (_, _, yaw) = self.orientation.euler_angles();
        yaw
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::at(Vector3::zeros())
    }
}

impl PhysicsBody for RigidBody {
    fn position(&self) -> Vector3<f64> {
        self.pos
    }

    fn set_position(&mut self, pos: Vector3<f64>) {
        self.pos = pos;
    }

    fn orientation(&self) -> UnitQuaternion<f64> {
        self.orientation
    }

    fn set_orientation(&mut self, rot: UnitQuaternion<f64>) {
        self.orientation = rot;
    }

    fn velocity(&self) -> Vector3<f64> {
        self.vel
    }

    fn set_velocity(&mut self, vel: Vector3<f64>) {
        self.vel = vel;
    }

    fn angular_velocity(&self) -> Vector3<f64> {
        self.omega
    }

    fn set_angular_velocity(&mut self, omega: Vector3<f64>) {
        self.omega = omega;
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn set_force(&mut self, force: Vector3<f64>) {
        self.force = force;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_follows_yaw() {
        let mut b = RigidBody::default();
        b.orientation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2);
        let f = b.forward();
        assert!(f.x.abs() < 1e-12);
        assert!((f.y - 1.0).abs() < 1e-12);
        assert!((b.yaw() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn trait_accessors_hit_fields() {
        let mut b = RigidBody::at(Vector3::new(1.0, 2.0, 3.0));
        b.set_velocity(Vector3::new(4.0, 0.0, 0.0));
        b.set_force(Vector3::new(0.0, 0.0, -9.8));
        assert_eq!(b.position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(b.vel.x, 4.0);
        assert_eq!(b.force.z, -9.8);
        assert_eq!(PhysicsBody::mass(&b), 1.0);
    }
}
