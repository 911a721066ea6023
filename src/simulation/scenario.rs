//! Build validated repulsion scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle:
//! - engine settings (`Engine`)
//! - problem parameters (`Parameters`)
//! - placement strategy (`Placement`)
//!
//! Every configuration error surfaces here or at placement, before the
//! first iteration.

use crate::configuration::config::{PlacementConfig, ScenarioConfig};

use super::driver::Simulation;
use super::engine::Engine;
use super::error::SimResult;
use super::params::Parameters;
use super::placement::{Placement, DEFAULT_MAX_ATTEMPTS};
use super::states::Node;

#[derive(Debug, Clone)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub placement: Placement,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> SimResult<Self> {
        // Engine (runtime) from EngineConfig
        let e_cfg = cfg.engine;
        let defaults = Engine::new(e_cfg.force_model);
        let engine = Engine {
            force_model: e_cfg.force_model,
            force_exponent: e_cfg.force_exponent.unwrap_or(defaults.force_exponent),
            step_size: e_cfg.step_size.unwrap_or(defaults.step_size),
            max_move_divisor: e_cfg.max_move_divisor.unwrap_or(defaults.max_move_divisor),
            max_iterations: e_cfg.max_iterations,
        };

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            node_count: p_cfg.node_count,
            radius: p_cfg.radius,
            dampening: p_cfg.dampening.unwrap_or(p_cfg.node_count as f64),
            converge_angle_allowed: p_cfg.converge_angle_allowed,
            converge_angle_moved: p_cfg.converge_angle_moved,
            seed: p_cfg.seed,
        };

        let placement = match cfg.placement {
            PlacementConfig::Random {
                collision_epsilon,
                max_attempts,
            } => Placement::Random {
                collision_epsilon,
                max_attempts: max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            },
            PlacementConfig::Grid {
                lat_step_degrees,
                long_step_degrees,
                min_separation_degrees,
            } => Placement::Grid {
                lat_step_degrees,
                long_step_degrees,
                min_separation_degrees,
            },
        };

        engine.validate()?;
        parameters.validate()?;
        placement.validate()?;

        Ok(Self {
            engine,
            parameters,
            placement,
        })
    }

    pub fn place_nodes(&self) -> SimResult<Vec<Node>> {
        self.placement.place(&self.parameters)
    }

    /// Place the nodes and hand everything to a running simulation
    pub fn into_simulation(self) -> SimResult<Simulation> {
        let nodes = self.place_nodes()?;
        Simulation::new(self.engine, self.parameters, nodes)
    }
}
