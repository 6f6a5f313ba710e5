//! Vehicle pose integration.
//!
//! Movement uses a flat local approximation in degree space: one step moves
//! `step_deg` degrees along the heading, split into latitude and longitude
//! by cosine and sine. It is not a geodesic step and is not meant to be.

use serde::{Deserialize, Serialize};
use speedcam_domain::{Cardinal, GeoPoint};

use crate::config::EngineConfig;
use crate::geodesy::normalize_degrees;

/// Directional controls held at the start of a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFlags {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl InputFlags {
    /// Flags from a WASD key string, e.g. `"wd"`; other characters are ignored.
    #[must_use]
    pub fn from_keys(keys: &str) -> Self {
        let mut flags = Self::default();
        for key in keys.chars().map(|c| c.to_ascii_lowercase()) {
            match key {
                'w' => flags.forward = true,
                's' => flags.backward = true,
                'a' => flags.turn_left = true,
                'd' => flags.turn_right = true,
                _ => {}
            }
        }
        flags
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.turn_left || self.turn_right
    }

    #[must_use]
    pub fn translating(&self) -> bool {
        self.forward || self.backward
    }
}

/// Vehicle position and heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehiclePose {
    pub position: GeoPoint,
    /// Degrees clockwise from north, in `[0, 360)`
    pub heading_deg: f64,
}

impl VehiclePose {
    #[must_use]
    pub fn new(position: GeoPoint, heading_deg: f64) -> Self {
        Self {
            position,
            heading_deg: normalize_degrees(heading_deg),
        }
    }

    #[must_use]
    pub fn cardinal(&self) -> Cardinal {
        Cardinal::from_heading(self.heading_deg)
    }
}

/// Result of one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// No control held; pose untouched
    Idle,
    /// Heading and/or position updated
    Moved,
}

/// Advance `pose` by one tick under `input`.
pub fn step(pose: &mut VehiclePose, input: InputFlags, config: &EngineConfig) -> Motion {
    if !input.any() {
        return Motion::Idle;
    }

    if input.turn_left {
        pose.heading_deg = normalize_degrees(pose.heading_deg - config.turn_rate_deg);
    }
    if input.turn_right {
        pose.heading_deg = normalize_degrees(pose.heading_deg + config.turn_rate_deg);
    }

    if input.translating() {
        // forward wins when both are held
        let sign = if input.forward { 1.0 } else { -1.0 };
        let rad = pose.heading_deg.to_radians();
        pose.position.latitude += rad.cos() * config.step_deg * sign;
        pose.position.longitude += rad.sin() * config.step_deg * sign;
    }

    Motion::Moved
}
