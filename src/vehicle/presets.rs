use nalgebra::Vector3;

use super::flags::{BehaviorFlags, HoverFlags, VehicleFlags};
use super::params::{AttractorParams, DeflectionParams, VehicleParams};
use super::types::VehicleType;

// ---------------------------------------------------------------------------
// Preset records
// ---------------------------------------------------------------------------

/// Literal defaults for one vehicle type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub vehicle_type: VehicleType,
    pub linear_friction: [f64; 3],
    pub angular_friction: [f64; 3],
    pub linear_motor_timescale: f64,
    pub linear_motor_decay: f64,
    pub angular_motor_timescale: f64,
    pub angular_motor_decay: f64,
    pub hover_height: f64,
    pub hover_timescale: f64,
    pub hover_efficiency: f64,
    pub buoyancy: f64,
    /// `None` keeps the store default (attractor off).
    pub attractor: Option<AttractorParams>,
    pub deflection: DeflectionParams,
    pub hover_flags: HoverFlags,
    pub behavior_flags: BehaviorFlags,
}

const fn deflection(
    linear: (f64, f64),
    angular: (f64, f64),
    banking: (f64, f64, f64),
) -> DeflectionParams {
    DeflectionParams {
        linear_efficiency: linear.0,
        linear_timescale: linear.1,
        angular_efficiency: angular.0,
        angular_timescale: angular.1,
        banking_efficiency: banking.0,
        banking_mix: banking.1,
        banking_timescale: banking.2,
    }
}

const GROUND_HANDLING: BehaviorFlags = BehaviorFlags::from_bits_truncate(
    BehaviorFlags::NO_DEFLECTION_UP.bits()
        | BehaviorFlags::LIMIT_ROLL_ONLY.bits()
        | BehaviorFlags::LIMIT_MOTOR_UP.bits(),
);

pub static PRESETS: [Preset; 6] = [
    Preset {
        vehicle_type: VehicleType::None,
        linear_friction: [0.0, 0.0, 0.0],
        angular_friction: [0.0, 0.0, 0.0],
        linear_motor_timescale: 0.0,
        linear_motor_decay: 0.0,
        angular_motor_timescale: 0.0,
        angular_motor_decay: 0.0,
        hover_height: 0.0,
        hover_timescale: 0.0,
        hover_efficiency: 0.0,
        buoyancy: 0.0,
        attractor: None,
        deflection: deflection((0.0, 0.0), (0.0, 0.0), (0.0, 0.0, 0.0)),
        hover_flags: HoverFlags::empty(),
        behavior_flags: BehaviorFlags::empty(),
    },
    Preset {
        vehicle_type: VehicleType::Sled,
        linear_friction: [30.0, 1.0, 1000.0],
        angular_friction: [1000.0, 1000.0, 1000.0],
        linear_motor_timescale: 1000.0,
        linear_motor_decay: 120.0,
        angular_motor_timescale: 1000.0,
        angular_motor_decay: 120.0,
        hover_height: 0.0,
        hover_timescale: 10.0,
        hover_efficiency: 1.0,
        buoyancy: 0.0,
        attractor: None,
        deflection: deflection((1.0, 1.0), (1.0, 1000.0), (0.0, 1.0, 10.0)),
        hover_flags: HoverFlags::empty(),
        behavior_flags: GROUND_HANDLING,
    },
    Preset {
        vehicle_type: VehicleType::Car,
        linear_friction: [100.0, 2.0, 1000.0],
        angular_friction: [1000.0, 1000.0, 1000.0],
        linear_motor_timescale: 1.0,
        linear_motor_decay: 60.0,
        angular_motor_timescale: 1.0,
        angular_motor_decay: 0.8,
        hover_height: 0.0,
        hover_timescale: 1000.0,
        hover_efficiency: 0.0,
        buoyancy: 0.0,
        attractor: Some(AttractorParams { efficiency: 1.0, timescale: 10.0 }),
        deflection: deflection((1.0, 2.0), (0.0, 10.0), (-0.2, 1.0, 1.0)),
        hover_flags: HoverFlags::UP_ONLY,
        behavior_flags: GROUND_HANDLING,
    },
    Preset {
        vehicle_type: VehicleType::Boat,
        linear_friction: [10.0, 3.0, 2.0],
        angular_friction: [10.0, 10.0, 10.0],
        linear_motor_timescale: 5.0,
        linear_motor_decay: 60.0,
        angular_motor_timescale: 4.0,
        angular_motor_decay: 4.0,
        hover_height: 0.0,
        hover_timescale: 2.0,
        hover_efficiency: 0.5,
        buoyancy: 1.0,
        attractor: Some(AttractorParams { efficiency: 0.5, timescale: 5.0 }),
        deflection: deflection((0.5, 3.0), (0.5, 5.0), (-0.3, 0.8, 1.0)),
        hover_flags: HoverFlags::WATER_ONLY,
        behavior_flags: BehaviorFlags::from_bits_truncate(
            BehaviorFlags::NO_DEFLECTION_UP.bits() | BehaviorFlags::LIMIT_MOTOR_UP.bits(),
        ),
    },
    Preset {
        vehicle_type: VehicleType::Airplane,
        linear_friction: [200.0, 10.0, 5.0],
        angular_friction: [20.0, 20.0, 20.0],
        linear_motor_timescale: 2.0,
        linear_motor_decay: 60.0,
        angular_motor_timescale: 4.0,
        angular_motor_decay: 4.0,
        hover_height: 0.0,
        hover_timescale: 1000.0,
        hover_efficiency: 0.5,
        buoyancy: 0.0,
        attractor: Some(AttractorParams { efficiency: 0.9, timescale: 2.0 }),
        deflection: deflection((0.5, 3.0), (1.0, 2.0), (1.0, 0.7, 2.0)),
        hover_flags: HoverFlags::empty(),
        behavior_flags: BehaviorFlags::LIMIT_ROLL_ONLY,
    },
    Preset {
        vehicle_type: VehicleType::Balloon,
        linear_friction: [5.0, 5.0, 5.0],
        angular_friction: [10.0, 10.0, 10.0],
        linear_motor_timescale: 5.0,
        linear_motor_decay: 60.0,
        angular_motor_timescale: 6.0,
        angular_motor_decay: 10.0,
        hover_height: 5.0,
        hover_timescale: 10.0,
        hover_efficiency: 0.8,
        buoyancy: 1.0,
        attractor: Some(AttractorParams { efficiency: 1.0, timescale: 100.0 }),
        deflection: deflection((0.0, 5.0), (0.0, 5.0), (0.0, 0.7, 5.0)),
        hover_flags: HoverFlags::GLOBAL_HEIGHT,
        behavior_flags: BehaviorFlags::LIMIT_ROLL_ONLY,
    },
];

/// Look up the preset for a vehicle type.
pub fn preset(vehicle_type: VehicleType) -> &'static Preset {
    PRESETS
        .iter()
        .find(|p| p.vehicle_type == vehicle_type)
        .unwrap_or(&PRESETS[0])
}

impl Preset {
    /// Fresh parameter store for this type. Nothing carries over from any
    /// previous state, persisted accumulators included.
    pub fn params(&self) -> VehicleParams {
        let mut p = VehicleParams::default();
        p.linear.friction_timescale = Vector3::from(self.linear_friction);
        p.linear.motor_timescale = self.linear_motor_timescale;
        p.linear.motor_decay_timescale = self.linear_motor_decay;
        p.linear.buoyancy = self.buoyancy;
        p.angular.friction_timescale = Vector3::from(self.angular_friction);
        p.angular.motor_timescale = self.angular_motor_timescale;
        p.angular.motor_decay_timescale = self.angular_motor_decay;
        p.hover.height = self.hover_height;
        p.hover.timescale = self.hover_timescale;
        p.hover.efficiency = self.hover_efficiency;
        if let Some(attractor) = self.attractor {
            p.attractor = attractor;
        }
        p.deflection = self.deflection;
        p
    }

    pub fn flags(&self) -> VehicleFlags {
        VehicleFlags::new(self.hover_flags, self.behavior_flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_a_preset() {
        for t in VehicleType::ALL {
            assert_eq!(preset(t).vehicle_type, t);
        }
    }

    #[test]
    fn boat_preset_values() {
        let p = preset(VehicleType::Boat).params();
        assert_eq!(p.linear.friction_timescale, Vector3::new(10.0, 3.0, 2.0));
        assert_eq!(p.angular.friction_timescale, Vector3::repeat(10.0));
        assert_eq!(p.linear.motor_timescale, 5.0);
        assert_eq!(p.linear.motor_decay_timescale, 60.0);
        assert_eq!(p.hover.timescale, 2.0);
        assert_eq!(p.linear.buoyancy, 1.0);
        assert_eq!(p.attractor.efficiency, 0.5);
        assert_eq!(p.attractor.timescale, 5.0);
    }

    #[test]
    fn sled_and_none_leave_attractor_off() {
        assert!(!preset(VehicleType::Sled).params().attractor.is_enabled());
        assert!(!preset(VehicleType::None).params().attractor.is_enabled());
        assert!(preset(VehicleType::Car).params().attractor.is_enabled());
    }

    #[test]
    fn flag_combinations_per_type() {
        let car = preset(VehicleType::Car).flags();
        assert_eq!(car.hover, HoverFlags::UP_ONLY);
        assert!(car.behavior.contains(
            BehaviorFlags::NO_DEFLECTION_UP
                | BehaviorFlags::LIMIT_ROLL_ONLY
                | BehaviorFlags::LIMIT_MOTOR_UP
        ));

        let boat = preset(VehicleType::Boat).flags();
        assert_eq!(boat.hover, HoverFlags::WATER_ONLY);
        assert!(!boat.behavior.contains(BehaviorFlags::LIMIT_ROLL_ONLY));

        let plane = preset(VehicleType::Airplane).flags();
        assert!(plane.hover.is_empty());
        assert_eq!(plane.behavior, BehaviorFlags::LIMIT_ROLL_ONLY);

        let balloon = preset(VehicleType::Balloon).flags();
        assert_eq!(balloon.hover, HoverFlags::GLOBAL_HEIGHT);

        assert_eq!(preset(VehicleType::None).flags(), VehicleFlags::default());
    }
}
