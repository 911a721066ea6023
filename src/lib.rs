pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::coords::{angle_between, SphereCoords};
pub use simulation::driver::{NodeReport, Report, Simulation};
pub use simulation::engine::{Engine, ForceModelKind};
pub use simulation::error::{SimError, SimResult};
pub use simulation::events::{Observer, SimEvent, TracingObserver};
pub use simulation::forces::{Collision, Displacement, ForceModel, ForceSet};
pub use simulation::integrator::{move_nodes, MoveReport};
pub use simulation::params::Parameters;
pub use simulation::placement::Placement;
pub use simulation::scenario::Scenario;
pub use simulation::states::{Node, NVec3, Phase, RejectReason, SimulationState};

pub use configuration::config::{EngineConfig, ParametersConfig, PlacementConfig, ScenarioConfig};

pub use benchmark::benchmark::{bench_forces, bench_steps};
