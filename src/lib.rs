pub mod actions;
pub mod agent;
pub mod buildings;
pub mod config;
pub mod engine;
pub mod map;
pub mod rng;

pub use config::Settings;
pub use engine::{AgentCommand, Engine, Observation, TickSummary};
pub use map::position::MapPosition;
pub use map::{AgentId, Map, MAX_AGENTS};
