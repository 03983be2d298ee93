//! Straight-line observer walk driving the streamer.

use glam::DVec3;
use terra_config::ObserverConfig;

/// An observer moving at constant velocity on the X/Z plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverWalk {
    position: DVec3,
    step: DVec3,
}

impl ObserverWalk {
    /// Starts at the world origin, heading as configured.
    pub fn new(config: &ObserverConfig) -> Self {
        let heading = config.heading_degrees.to_radians();
        Self {
            position: DVec3::ZERO,
            step: DVec3::new(heading.cos(), 0.0, heading.sin()) * config.speed,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Moves one tick forward and returns the new position.
    pub fn advance(&mut self) -> DVec3 {
        self.position += self.step;
        self.position
    }
}
