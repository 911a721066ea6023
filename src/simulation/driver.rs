//! The iteration loop as a small state machine
//!
//! `Initializing -> Running -> {SolutionFound, Rejected, Collided}`
//!
//! One `step()` is one iteration: plan every move from a frozen snapshot,
//! check the record and target, then move every node. Hosts may call
//! `step()` at their own cadence or let `run()` drive to a terminal state.

use tracing::info;

use super::coords::SphereCoords;
use super::engine::Engine;
use super::error::{SimError, SimResult};
use super::events::{Observer, SimEvent};
use super::forces::{Displacement, ForceSet};
use super::integrator::move_nodes;
use super::params::Parameters;
use super::states::{Node, Phase, RejectReason, SimulationState};

/// Final position of one node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeReport {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_degrees: f64,
    pub longitude_degrees: f64,
}

impl NodeReport {
    pub fn from_node(node: &Node) -> Self {
        let s = SphereCoords::from_cartesian(&node.x);
        Self {
            id: node.id,
            x: node.x.x,
            y: node.x.y,
            z: node.x.z,
            latitude: s.latitude,
            longitude: s.longitude,
            latitude_degrees: s.latitude_degrees(),
            longitude_degrees: s.longitude_degrees(),
        }
    }
}

/// Outcome of a run, or a snapshot of one in progress
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub phase: Phase,
    pub iterations: u64,
    pub min_angle: f64, // best separation reached
    pub nodes: Vec<NodeReport>,
}

pub struct Simulation {
    engine: Engine,
    parameters: Parameters,
    forces: ForceSet,
    state: SimulationState,
}

impl Simulation {
    /// Start a run from already placed nodes
    ///
    /// Positions are projected onto the sphere but not checked for
    /// separation, so hosts can inject any configuration.
    pub fn new(engine: Engine, parameters: Parameters, nodes: Vec<Node>) -> SimResult<Self> {
        engine.validate()?;
        parameters.validate()?;
        if nodes.is_empty() {
            return Err(SimError::NoNodes);
        }

        let radius = parameters.radius;
        let nodes = nodes
            .into_iter()
            .map(|n| {
                let len = n.x.norm();
                let x = if len > 0.0 { n.x * (radius / len) } else { n.x };
                Node::new(n.id, x)
            })
            .collect();

        let forces = ForceSet::new(&engine, &parameters);
        let mut state = SimulationState::new(nodes);
        state.phase = Phase::Running;

        info!(
            nodes = state.nodes.len(),
            force_model = ?forces.kind(),
            "repulsion simulation is now in progress"
        );

        Ok(Self {
            engine,
            parameters,
            forces,
            state,
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Run exactly one iteration; a no-op once the run has ended
    pub fn step(&mut self, observer: &mut dyn Observer) -> Phase {
        if self.state.phase.is_terminal() {
            return self.state.phase;
        }
        self.state.iteration += 1;
        let iteration = self.state.iteration;

        let detected = match self.forces.compute(&self.state.nodes, &mut self.state.pending) {
            Ok(angle) => angle,
            Err(collision) => {
                self.state.phase = Phase::Collided {
                    i: collision.i,
                    j: collision.j,
                };
                self.state.pending.fill(Displacement::None);
                observer.on_event(&SimEvent::Collided {
                    iteration,
                    i: collision.i,
                    j: collision.j,
                });
                return self.state.phase;
            }
        };
        self.state.min_angle_detected = detected;

        if detected > self.state.min_angle_global {
            self.state.min_angle_global = detected;
            observer.on_event(&SimEvent::NewRecord {
                iteration,
                min_angle: detected,
                nodes: &self.state.nodes,
            });

            if self.state.min_angle_global > self.parameters.converge_angle_allowed {
                self.state.phase = Phase::SolutionFound;
                observer.on_event(&SimEvent::SolutionFound {
                    iteration,
                    min_angle: self.state.min_angle_global,
                    nodes: &self.state.nodes,
                });
                return self.state.phase;
            }
        }

        let moved = move_nodes(&mut self.state, &self.parameters, &self.engine);

        let reason = if moved.converged {
            Some(RejectReason::Converged)
        } else {
            match self.engine.max_iterations {
                Some(max) if iteration >= max => Some(RejectReason::IterationLimit),
                _ => None,
            }
        };
        if let Some(reason) = reason {
            self.state.phase = Phase::Rejected { reason };
            observer.on_event(&SimEvent::Rejected {
                iteration,
                min_angle: self.state.min_angle_global,
                reason,
            });
        }

        self.state.phase
    }

    /// Step until a terminal state
    ///
    /// Without `max_iterations` this only returns once the nodes either
    /// separate, stop moving or collide.
    pub fn run(&mut self, observer: &mut dyn Observer) -> Report {
        while !self.step(observer).is_terminal() {}
        self.report()
    }

    pub fn report(&self) -> Report {
        Report {
            phase: self.state.phase,
            iterations: self.state.iteration,
            min_angle: self.state.min_angle_global,
            nodes: self.state.nodes.iter().map(NodeReport::from_node).collect(),
        }
    }
}
