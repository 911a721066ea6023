//! Numerical parameters of a repulsion run
//!
//! `Parameters` holds the problem settings:
//! - node count and sphere radius,
//! - force dampening,
//! - target separation and the "not moving" epsilon,
//! - placement seed

use super::error::{SimError, SimResult};

#[derive(Debug, Clone)]
pub struct Parameters {
    pub node_count: usize,                 // requested number of nodes
    pub radius: f64,                       // sphere radius
    pub dampening: f64,                    // divides every pairwise force
    pub converge_angle_allowed: f64,       // target minimum separation (radians)
    pub converge_angle_moved: Option<f64>, // per-node still epsilon (radians), None disables
    pub seed: Option<u64>,                 // placement seed, drawn when absent
}

impl Parameters {
    /// Parameters with the dampening tied to the node count
    pub fn new(node_count: usize, radius: f64, converge_angle_allowed: f64) -> Self {
        Self {
            node_count,
            radius,
            dampening: node_count as f64,
            converge_angle_allowed,
            converge_angle_moved: None,
            seed: None,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.node_count == 0 {
            return Err(SimError::NoNodes);
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(SimError::InvalidRadius(self.radius));
        }
        if !(self.dampening.is_finite() && self.dampening > 0.0) {
            return Err(SimError::InvalidDampening(self.dampening));
        }
        if !(self.converge_angle_allowed.is_finite() && self.converge_angle_allowed >= 0.0) {
            return Err(SimError::InvalidConvergenceAngle {
                name: "converge_angle_allowed",
                value: self.converge_angle_allowed,
            });
        }
        if let Some(moved) = self.converge_angle_moved {
            if !(moved.is_finite() && moved > 0.0) {
                return Err(SimError::InvalidConvergenceAngle {
                    name: "converge_angle_moved",
                    value: moved,
                });
            }
        }
        Ok(())
    }
}
