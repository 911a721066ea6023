//! Configuration types for loading repulsion scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - [`EngineConfig`]     – force decomposition and stepping rules
//! - [`ParametersConfig`] – node count, sphere, dampening and convergence angles
//! - [`PlacementConfig`]  – how the initial nodes are seeded
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   force_model: lat_long       # lat_long | cartesian | rotational
//!   force_exponent: 3           # optional, 3 for lat_long and 2 otherwise
//!   step_size: 1.0              # optional
//!   max_move_divisor: 3.0       # optional
//!   max_iterations: 200000      # optional
//!
//! parameters:
//!   node_count: 100
//!   radius: 0.5
//!   dampening: 100.0            # optional, defaults to node_count
//!   converge_angle_allowed: 0.5 # radians
//!   converge_angle_moved: 0.001 # radians, omit to disable the still check
//!   seed: 42                    # optional
//!
//! placement:                    # optional, random with epsilon 0 by default
//!   strategy: random
//!   collision_epsilon: 0.0
//! ```
//!
//! Grid placement replaces the last block with:
//!
//! ```yaml
//! placement:
//!   strategy: grid
//!   lat_step_degrees: 15.0
//!   long_step_degrees: 15.0
//!   min_separation_degrees: 40.0
//! ```
//!
//! `Scenario::build_scenario` maps this onto the runtime types and validates it.

use serde::Deserialize;

use crate::simulation::engine::ForceModelKind;

/// Force decomposition and stepping rules
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub force_model: ForceModelKind,  // decomposition used for the whole run
    pub force_exponent: Option<u32>,  // power of the angle in the force law
    pub step_size: Option<f64>,       // explicit step, scales every force
    pub max_move_divisor: Option<f64>, // per-iteration move cap divisor
    pub max_iterations: Option<u64>,  // give up after this many iterations
}

/// Problem settings
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub node_count: usize,
    pub radius: f64,
    pub dampening: Option<f64>,
    pub converge_angle_allowed: f64,
    pub converge_angle_moved: Option<f64>,
    pub seed: Option<u64>,
}

/// Initial placement strategy
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PlacementConfig {
    Random {
        #[serde(default)]
        collision_epsilon: f64,
        max_attempts: Option<usize>,
    },
    Grid {
        lat_step_degrees: f64,
        long_step_degrees: f64,
        min_separation_degrees: f64,
    },
}

impl Default for PlacementConfig {
    fn default() -> Self {
        PlacementConfig::Random {
            collision_epsilon: 0.0,
            max_attempts: None,
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
}

impl ScenarioConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
