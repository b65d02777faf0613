use nalgebra::Vector3;

use super::body::RigidBody;
use crate::config::SimConfig;
use crate::dynamics::Environment;

/// Flat world: constant gravity, one water level, level terrain.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatWorld {
    pub gravity: Vector3<f64>, // m/s^2
    pub water_level: f64,      // m
    pub terrain_height: f64,   // m
}

impl FlatWorld {
    /// Stop a body that sank into the ground.
    pub fn resolve_ground_contact(&self, body: &mut RigidBody) {
        if body.pos.z < self.terrain_height {
            body.pos.z = self.terrain_height;
            if body.vel.z < 0.0 {
                body.vel.z = 0.0;
            }
        }
    }
}

impl Default for FlatWorld {
    fn default() -> Self {
        Self::from(&SimConfig::default())
    }
}

impl From<&SimConfig> for FlatWorld {
    fn from(config: &SimConfig) -> Self {
        Self {
            gravity: config.gravity,
            water_level: config.water_level,
            terrain_height: config.terrain_height,
        }
    }
}

impl Environment for FlatWorld {
    fn gravity(&self) -> Vector3<f64> {
        self.gravity
    }

    fn water_level(&self) -> f64 {
        self.water_level
    }

    fn terrain_height(&self, _x: f64, _y: f64) -> f64 {
        self.terrain_height
    }
}
