//! Configuration errors for the repulsion simulation
//!
//! Everything here is raised before the first iteration runs. A collision
//! during the run is not an error, it is the terminal `Phase::Collided`.

use thiserror::Error;

/// Errors raised while validating a scenario or placing its nodes
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("node count must be greater than zero")]
    NoNodes,

    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("dampening factor must be positive and finite, got {0}")]
    InvalidDampening(f64),

    #[error("convergence angle `{name}` is invalid: {value}")]
    InvalidConvergenceAngle { name: &'static str, value: f64 },

    #[error("step size must be positive and finite, got {0}")]
    InvalidStepSize(f64),

    #[error("max move divisor must be greater than 1, got {0}")]
    InvalidMoveDivisor(f64),

    #[error("force exponent must be 2 or 3, got {0}")]
    InvalidForceExponent(u32),

    #[error("collision epsilon must be non-negative, got {0}")]
    InvalidCollisionEpsilon(f64),

    #[error("grid step `{name}` must be positive, got {value}")]
    InvalidGridStep { name: &'static str, value: f64 },

    #[error("grid scan admitted only {accepted} node(s) with a minimum separation of {min_separation_degrees} degrees")]
    GridTooSparse { accepted: usize, min_separation_degrees: f64 },

    #[error("rejection sampling gave up after {attempts} attempts with {placed} node(s) placed")]
    PlacementExhausted { placed: usize, attempts: usize },
}

/// Result alias for simulation setup
pub type SimResult<T> = Result<T, SimError>;
