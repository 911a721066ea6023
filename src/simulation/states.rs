//! Core state types for the repulsion simulation.
//!
//! - `Node`: one point on the sphere, with position and orientation frame
//! - `SimulationState`: every node plus the per-iteration bookkeeping
//! - `Phase`: where the run is in its lifecycle
//!
//! The state is owned by the driver; force model and integrator borrow it
//! for a single call.

use std::f64::consts::PI;

use nalgebra::{UnitQuaternion, Vector3};

use super::coords::SphereCoords;
use super::forces::Displacement;

pub type NVec3 = Vector3<f64>;
pub type Frame = UnitQuaternion<f64>;

/// Axis of a node's frame that points from the centre at the node
pub fn forward() -> NVec3 {
    NVec3::z()
}

/// Frame whose forward axis points along `dir`
pub fn frame_for(dir: &NVec3) -> Frame {
    UnitQuaternion::rotation_between(&forward(), dir)
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&NVec3::x_axis(), PI))
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: usize,    // placement index
    pub x: NVec3,     // position, |x| == radius
    pub frame: Frame, // orientation, forward axis points at x
}

impl Node {
    pub fn new(id: usize, x: NVec3) -> Self {
        Self { id, x, frame: frame_for(&x) }
    }

    pub fn spherical(&self) -> SphereCoords {
        SphereCoords::from_cartesian(&self.x)
    }

    /// Unit direction derived from the orientation frame
    pub fn heading(&self) -> NVec3 {
        self.frame * forward()
    }
}

/// Why a run ended without reaching the target separation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Converged,      // nodes stopped moving
    IterationLimit, // host-imposed cap reached
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Initializing,
    Running,
    SolutionFound,
    Rejected { reason: RejectReason },
    Collided { i: usize, j: usize },
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Phase::Initializing | Phase::Running)
    }
}

#[derive(Debug, Clone)]
pub struct SimulationState {
    pub nodes: Vec<Node>,              // ordered node set
    pub pending: Vec<Displacement>,    // planned moves, valid within one iteration
    pub min_angle_detected: f64,       // smallest pairwise angle this iteration
    pub min_angle_global: f64,         // best smallest angle seen so far
    pub converged: bool,               // no node moved enough last iteration
    pub iteration: u64,                // completed or in-progress iteration count
    pub phase: Phase,
}

impl SimulationState {
    pub fn new(nodes: Vec<Node>) -> Self {
        let n = nodes.len();
        Self {
            nodes,
            pending: vec![Displacement::None; n],
            min_angle_detected: 2.0 * PI,
            min_angle_global: 0.0,
            converged: false,
            iteration: 0,
            phase: Phase::Initializing,
        }
    }
}
