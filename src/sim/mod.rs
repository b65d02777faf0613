pub mod body;
pub mod driver;
pub mod integrator;
pub mod runner;
pub mod world;

pub use body::RigidBody;
pub use driver::{Driver, Idle, Throttle};
pub use integrator::euler_step;
pub use runner::{simulate, simulate_with, Sample};
pub use world::FlatWorld;
