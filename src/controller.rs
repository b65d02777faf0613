use nalgebra::{UnitQuaternion, Vector3};
use tracing::{debug, trace};

use crate::config::ControllerConfig;
use crate::dynamics::{limit_rotation, move_angular, move_linear, Environment, PhysicsBody};
use crate::vehicle::{preset, ParamId, VehicleFlags, VehicleParams, VehicleType};

// ---------------------------------------------------------------------------
// Vehicle controller
// ---------------------------------------------------------------------------

/// Per-body vehicle controller.
///
/// Owned by exactly one physical body. The host calls [`step`](Self::step)
/// once per physics tick; script bindings call the setters in between.
/// Nothing here can fail: out-of-range values are clamped and unknown ids
/// ignored, so script input cannot break the tick loop.
#[derive(Debug, Clone, Default)]
pub struct VehicleController {
    vehicle_type: VehicleType,
    params: VehicleParams,
    flags: VehicleFlags,
    config: ControllerConfig,
    tick: u64,
}

impl VehicleController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Controller already configured as `vehicle_type`.
    pub fn with_type(vehicle_type: VehicleType, config: ControllerConfig) -> Self {
        let mut c = Self::new(config);
        c.set_type(vehicle_type);
        c
    }

    pub fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    pub fn is_active(&self) -> bool {
        self.vehicle_type.is_active()
    }

    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    pub fn flags(&self) -> VehicleFlags {
        self.flags
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Ticks stepped since creation.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    // --- Script-facing setters ---

    /// Reset every parameter and both flag groups to the preset for `vehicle_type`.
    pub fn set_type(&mut self, vehicle_type: VehicleType) {
        let p = preset(vehicle_type);
        self.vehicle_type = vehicle_type;
        self.params = p.params();
        self.flags = p.flags();
        debug!(vehicle_type = %vehicle_type, "vehicle type applied");
    }

    pub fn set_float_param(&mut self, id: ParamId, value: f64) {
        if !self.params.set_float(id, value) {
            debug!(?id, value, "float setter ignored for non-float parameter");
        }
    }

    pub fn set_vector_param(&mut self, id: ParamId, value: Vector3<f64>) {
        if !self.params.set_vector(id, value) {
            debug!(?id, "vector setter ignored for non-vector parameter");
        }
    }

    pub fn set_rotation_param(&mut self, id: ParamId, value: UnitQuaternion<f64>) {
        if !self.params.set_rotation(id, value) {
            debug!(?id, "rotation setter ignored for non-rotation parameter");
        }
    }

    /// Set (`remove == false`) or clear the given flag bits.
    /// `bits == -1` with `remove` clears both groups.
    pub fn set_flags(&mut self, bits: i32, remove: bool) {
        self.flags.apply(bits, remove, self.config.legacy_flag_merge);
        if remove && bits == crate::vehicle::CLEAR_ALL {
            debug!("all vehicle flags cleared");
        }
    }

    // --- Raw-code entry points for script bindings ---

    pub fn set_type_code(&mut self, code: i32) {
        match VehicleType::from_code(code) {
            Some(t) => self.set_type(t),
            None => debug!(code, "unknown vehicle type code ignored"),
        }
    }

    pub fn set_float_param_code(&mut self, code: i32, value: f64) {
        match ParamId::from_code(code) {
            Some(id) => self.set_float_param(id, value),
            None => debug!(code, "unknown parameter code ignored"),
        }
    }

    pub fn set_vector_param_code(&mut self, code: i32, value: Vector3<f64>) {
        match ParamId::from_code(code) {
            Some(id) => self.set_vector_param(id, value),
            None => debug!(code, "unknown parameter code ignored"),
        }
    }

    pub fn set_rotation_param_code(&mut self, code: i32, value: UnitQuaternion<f64>) {
        match ParamId::from_code(code) {
            Some(id) => self.set_rotation_param(id, value),
            None => debug!(code, "unknown parameter code ignored"),
        }
    }

    // --- Tick ---

    /// Run the linear, angular and rotation-limit stages once.
    ///
    /// No-op for `VehicleType::None` and for a `dt` that is not a finite
    /// positive number.
    pub fn step<B, E>(&mut self, body: &mut B, env: &E, dt: f64)
    where
        B: PhysicsBody + ?Sized,
        E: Environment + ?Sized,
    {
        if !self.is_active() {
            return;
        }
        if !(dt.is_finite() && dt > 0.0) {
            debug!(dt, "vehicle step skipped");
            return;
        }

        move_linear(&mut self.params, &self.flags, body, env, dt);
        move_angular(&mut self.params, &self.flags, body, dt);
        limit_rotation(&self.params.roll_frame, self.flags.behavior, body);

        self.tick += 1;
        if self.tick % self.config.trace_interval.max(1) == 0 {
            let pos = body.position();
            let vel = body.velocity();
            let omega = self.params.angular.last_velocity;
            trace!(
                tick = self.tick,
                vehicle_type = %self.vehicle_type,
                pos = ?(pos.x, pos.y, pos.z),
                vel = ?(vel.x, vel.y, vel.z),
                omega = ?(omega.x, omega.y, omega.z),
                "vehicle step"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FlatWorld, RigidBody};
    use crate::vehicle::{BehaviorFlags, HoverFlags, MIN_TIMESCALE};

    fn world() -> FlatWorld {
        FlatWorld {
            gravity: Vector3::new(0.0, 0.0, -9.8),
            water_level: 20.0,
            terrain_height: 0.0,
        }
    }

    fn moving_body() -> RigidBody {
        let mut b = RigidBody::at(Vector3::new(50.0, 50.0, 25.0));
        b.vel = Vector3::new(1.0, 2.0, -0.5);
        b.omega = Vector3::new(0.1, 0.2, 0.3);
        b.orientation = UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3);
        b.force = Vector3::new(7.0, 7.0, 7.0);
        b
    }

    #[test]
    fn none_type_step_is_a_no_op() {
        let mut c = VehicleController::with_type(VehicleType::Car, ControllerConfig::default());
        c.set_type(VehicleType::None);
        let mut body = moving_body();
        let before = body.clone();
        for dt in [0.1, 1.0, 0.0, 5.0] {
            c.step(&mut body, &world(), dt);
        }
        assert_eq!(body, before);
        assert_eq!(c.tick(), 0);
    }

    #[test]
    fn zero_dt_leaves_body_untouched() {
        let mut c = VehicleController::with_type(VehicleType::Car, ControllerConfig::default());
        let mut body = moving_body();
        let before = body.clone();
        c.step(&mut body, &world(), 0.0);
        c.step(&mut body, &world(), f64::NAN);
        c.step(&mut body, &world(), -0.1);
        assert_eq!(body, before);
        assert!(body.vel.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn set_type_is_a_full_reset() {
        let mut c = VehicleController::with_type(VehicleType::Boat, ControllerConfig::default());
        c.set_vector_param(ParamId::LinearMotorDirection, Vector3::new(5.0, 0.0, 0.0));
        c.set_flags(BehaviorFlags::NO_X.bits() as i32, false);
        let mut body = RigidBody::at(Vector3::new(10.0, 10.0, 20.0));
        for _ in 0..5 {
            c.step(&mut body, &world(), 0.1);
        }
        assert!(c.params().linear.velocity.x > 0.0);

        c.set_type(VehicleType::Boat);
        let fresh = VehicleController::with_type(VehicleType::Boat, ControllerConfig::default());
        assert_eq!(c.params(), fresh.params());
        assert_eq!(c.flags(), fresh.flags());
    }

    #[test]
    fn none_type_clears_flags_and_params() {
        let mut c = VehicleController::with_type(VehicleType::Balloon, ControllerConfig::default());
        c.set_type(VehicleType::None);
        assert!(!c.is_active());
        assert_eq!(c.params(), &VehicleParams::default());
        assert!(c.flags().hover.is_empty());
        assert!(c.flags().behavior.is_empty());
    }

    #[test]
    fn unknown_codes_are_ignored() {
        let mut c = VehicleController::with_type(VehicleType::Car, ControllerConfig::default());
        let params = c.params().clone();
        let flags = c.flags();
        c.set_float_param_code(999, 1.0);
        c.set_vector_param_code(-4, Vector3::repeat(1.0));
        c.set_rotation_param_code(21, UnitQuaternion::identity());
        c.set_type_code(42);
        c.set_flags(1 << 24, false);
        assert_eq!(c.params(), &params);
        assert_eq!(c.flags(), flags);
        assert_eq!(c.vehicle_type(), VehicleType::Car);
    }

    #[test]
    fn code_setters_route_to_typed_setters() {
        let mut c = VehicleController::with_type(VehicleType::Car, ControllerConfig::default());
        c.set_float_param_code(ParamId::LinearMotorTimescale.code(), 0.0);
        assert_eq!(c.params().linear.motor_timescale, MIN_TIMESCALE);
        c.set_vector_param_code(ParamId::AngularMotorDirection.code(), Vector3::new(100.0, 0.0, 0.0));
        assert_eq!(c.params().angular.motor_direction, Vector3::new(12.56, 0.0, 0.0));
        c.set_type_code(3);
        assert_eq!(c.vehicle_type(), VehicleType::Boat);
    }

    #[test]
    fn legacy_config_changes_flag_merge() {
        let config = ControllerConfig { legacy_flag_merge: true, ..Default::default() };
        let mut c = VehicleController::with_type(VehicleType::Airplane, config);
        c.set_flags(HoverFlags::TERRAIN_ONLY.bits() as i32, false);
        assert_eq!(
            c.flags().hover.bits(),
            HoverFlags::TERRAIN_ONLY.bits() | BehaviorFlags::LIMIT_ROLL_ONLY.bits()
        );

        let mut strict = VehicleController::with_type(VehicleType::Airplane, ControllerConfig::default());
        strict.set_flags(HoverFlags::TERRAIN_ONLY.bits() as i32, false);
        assert_eq!(strict.flags().hover, HoverFlags::TERRAIN_ONLY);
    }

    #[test]
    fn idle_accumulator_is_zeroed_in_one_step() {
        let mut c = VehicleController::with_type(VehicleType::Car, ControllerConfig::default());
        c.params.linear.velocity = Vector3::new(0.006, 0.0, -0.007);
        let mut body = RigidBody::at(Vector3::new(10.0, 10.0, 5.0));
        c.step(&mut body, &world(), 0.1);
        assert_eq!(c.params().linear.velocity, Vector3::zeros());
    }

    #[test]
    fn nan_script_input_keeps_body_finite() {
        let mut c = VehicleController::with_type(VehicleType::Car, ControllerConfig::default());
        c.set_float_param(ParamId::Buoyancy, f64::NAN);
        c.set_float_param(ParamId::VerticalAttractionEfficiency, f64::NAN);
        c.set_vector_param(ParamId::AngularMotorDirection, Vector3::new(f64::NAN, 0.0, f64::NAN));
        let mut body = RigidBody::at(Vector3::new(10.0, 10.0, 5.0));
        for _ in 0..5 {
            c.step(&mut body, &world(), 0.1);
            body.integrate(0.1);
        }
        assert!(body.force.iter().all(|v| v.is_finite()));
        assert!(body.pos.iter().all(|v| v.is_finite()));
        assert!(body.omega.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn step_counts_ticks() {
        let mut c = VehicleController::with_type(VehicleType::Sled, ControllerConfig::default());
        let mut body = RigidBody::at(Vector3::new(10.0, 10.0, 2.0));
        for _ in 0..3 {
            c.step(&mut body, &world(), 0.05);
        }
        assert_eq!(c.tick(), 3);
    }
}
