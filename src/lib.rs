//! Scripted vehicle dynamics for a rigid-body physics host.
//!
//! A [`VehicleController`] owns one body's vehicle state. Scripts configure it
//! through typed setters (or the raw-code entry points); the host calls
//! [`VehicleController::step`] once per tick with a [`PhysicsBody`] and an
//! [`Environment`]. The [`sim`] module supplies a small stand-in engine.

pub mod config;
pub mod controller;
pub mod dynamics;
pub mod error;
pub mod sim;
pub mod vehicle;

pub use config::{Config, ControllerConfig, SimConfig};
pub use controller::VehicleController;
pub use dynamics::{Environment, PhysicsBody};
pub use error::ConfigError;
pub use vehicle::{BehaviorFlags, HoverFlags, ParamId, VehicleFlags, VehicleParams, VehicleType};
