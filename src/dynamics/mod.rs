pub mod body;
pub mod linear;
pub mod angular;
pub mod limiter;

pub use body::{Environment, PhysicsBody};
pub use linear::move_linear;
pub use angular::{move_angular, vertical_attractor};
pub use limiter::limit_rotation;
