use nalgebra::{UnitQuaternion, Vector3};

/// Mutable state of the physical body a controller drives.
///
/// Frame: world, Z up. The controller reads and overwrites these once per tick.
pub trait PhysicsBody {
    fn position(&self) -> Vector3<f64>;
    fn set_position(&mut self, pos: Vector3<f64>);

    /// Body-to-world rotation.
    fn orientation(&self) -> UnitQuaternion<f64>;
    fn set_orientation(&mut self, rot: UnitQuaternion<f64>);

    fn velocity(&self) -> Vector3<f64>;
    fn set_velocity(&mut self, vel: Vector3<f64>);

    fn angular_velocity(&self) -> Vector3<f64>;
    fn set_angular_velocity(&mut self, omega: Vector3<f64>);

    fn mass(&self) -> f64;

    /// External force the engine applies over the coming tick, N.
    fn set_force(&mut self, force: Vector3<f64>);
}

/// World queries the controller needs from the host engine.
pub trait Environment {
    /// Gravitational acceleration, m/s^2.
    fn gravity(&self) -> Vector3<f64>;

    fn water_level(&self) -> f64;

    fn terrain_height(&self, x: f64, y: f64) -> f64;
}

/// True when `v` is within `tolerance` of the zero vector.
pub(crate) fn approx_zero(v: &Vector3<f64>, tolerance: f64) -> bool {
    v.norm_squared() <= tolerance * tolerance
}
