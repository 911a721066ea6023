//! High-level runtime engine settings
//!
//! Selects the force decomposition and the stepping rules used when
//! building and running a `Scenario`

use serde::Deserialize;

use super::error::{SimError, SimResult};

/// Which decomposition splits a scalar repulsion into a move
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ForceModelKind {
    LatLong,    // spherical increments, empirical hemisphere correction
    Cartesian,  // axis-proportional vector, renormalized onto the sphere
    Rotational, // quaternion nudges composed into each node's frame
}

impl ForceModelKind {
    /// Power of the angle in `1 / (dampening * angle^p)`
    pub fn default_exponent(&self) -> u32 {
        match self {
            ForceModelKind::LatLong => 3,
            ForceModelKind::Cartesian | ForceModelKind::Rotational => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    pub force_model: ForceModelKind,   // decomposition used for the whole run
    pub force_exponent: u32,           // 2 or 3
    pub step_size: f64,                // scales every force, replaces frame delta time
    pub max_move_divisor: f64,         // maxStep = minAngleDetected / divisor
    pub max_iterations: Option<u64>,   // cap treated as Rejected
}

impl Engine {
    pub fn new(force_model: ForceModelKind) -> Self {
        Self {
            force_model,
            force_exponent: force_model.default_exponent(),
            step_size: 1.0,
            max_move_divisor: 3.0,
            max_iterations: None,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if !matches!(self.force_exponent, 2 | 3) {
            return Err(SimError::InvalidForceExponent(self.force_exponent));
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(SimError::InvalidStepSize(self.step_size));
        }
        if !(self.max_move_divisor.is_finite() && self.max_move_divisor > 1.0) {
            return Err(SimError::InvalidMoveDivisor(self.max_move_divisor));
        }
        Ok(())
    }
}
