//! Physics environment shared by every entity in a world

use serde::{Deserialize, Serialize};

/// Baseline physical constants
///
/// Entities copy `friction`, `force` and `mass` when they are created;
/// `gravity` is read at every integration step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Velocity-proportional drag coefficient (negative)
    pub friction: f32,
    /// Default driving force
    pub force: f32,
    /// Default mass
    pub mass: f32,
    /// Restitution coefficient. Collision response does not apply it.
    pub elasticity: f32,
    /// Downward acceleration restored after each step
    pub gravity: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            friction: -0.08,
            force: 0.5,
            mass: 1.0,
            elasticity: 0.9,
            gravity: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let env: Environment = serde_json::from_str(r#"{"gravity": 0.2}"#).unwrap();
        assert_eq!(env.gravity, 0.2);
        assert_eq!(env.friction, -0.08);
        assert_eq!(env.mass, 1.0);
    }
}
