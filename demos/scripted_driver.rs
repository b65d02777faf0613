use nalgebra::Vector3;

use vehicle_dynamics::sim::{self, Driver, FlatWorld, RigidBody, Sample};
use vehicle_dynamics::{ControllerConfig, ParamId, SimConfig, VehicleController, VehicleType};

/// Drives a car toward a waypoint: full throttle, yaw proportional to the
/// heading error, and a slower approach once inside the braking radius.
struct WaypointDriver {
    target: Vector3<f64>,
    cruise: f64,
    yaw_gain: f64,
    brake_radius: f64,
}

impl Driver for WaypointDriver {
    fn drive(&mut self, controller: &mut VehicleController, sample: &Sample, _dt: f64) {
        let to_target = (self.target - sample.pos).xy();
        let distance = to_target.norm();

        let bearing = to_target.y.atan2(to_target.x);
        let mut error = bearing - sample.yaw();
        // Wrap to [-pi, pi]
        error = (error + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU) - std::f64::consts::PI;

        let speed = if distance < self.brake_radius {
            self.cruise * distance / self.brake_radius
        } else {
            self.cruise
        };

        controller.set_vector_param(ParamId::LinearMotorDirection, Vector3::new(speed, 0.0, 0.0));
        controller.set_vector_param(
            ParamId::AngularMotorDirection,
            Vector3::new(0.0, 0.0, self.yaw_gain * error),
        );
    }

    fn name(&self) -> &str {
        "Waypoint"
    }
}

fn main() {
    let config = SimConfig { dt: 0.1, max_time: 40.0, ..Default::default() };
    let world = FlatWorld::from(&config);

    let mut controller = VehicleController::with_type(VehicleType::Car, ControllerConfig::default());
    let mut body = RigidBody::at(Vector3::new(0.0, 0.0, world.terrain_height));
    let mut driver = WaypointDriver {
        target: Vector3::new(60.0, 80.0, 0.0),
        cruise: 12.0,
        yaw_gain: 1.5,
        brake_radius: 15.0,
    };

    println!("Simulating with {} driver...", driver.name());
    let trajectory = sim::simulate_with(&mut controller, &mut body, &world, &config, &mut driver);

    let Some(last) = trajectory.last() else {
        return;
    };
    let miss = (driver.target - last.pos).xy().norm();
    let top_speed = trajectory.iter().map(Sample::forward_speed).fold(0.0_f64, f64::max);

    println!("Final position: ({:.1}, {:.1}) m", last.pos.x, last.pos.y);
    println!("Distance to waypoint: {:.1} m", miss);
    println!("Top speed: {:.1} m/s", top_speed);
    println!("Final heading: {:.0} deg", last.yaw().to_degrees());
    println!("Trajectory points: {}", trajectory.len());
}
