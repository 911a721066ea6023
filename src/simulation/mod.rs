pub mod coords;
pub mod driver;
pub mod engine;
pub mod error;
pub mod events;
pub mod forces;
pub mod integrator;
pub mod params;
pub mod placement;
pub mod scenario;
pub mod states;
